use crate::errors::Result;
use crate::form::fields::choice_items;
use crate::form::{
    Body, ChoiceItem, ChoiceOption, ErrorMap, FieldSpec, Page, PageContext, PageDefinition,
    Response, TaskDefinition,
};

pub const TASK: &str = "check-your-answers";
pub const CHECK_YOUR_ANSWERS: &str = "check-your-answers";

const CONFIRMED: &str = "confirmed";
const CONFIRMATION: &[ChoiceOption] = &[ChoiceOption::new(
    CONFIRMED,
    "I confirm the information provided is complete, accurate and up to date",
)];
const FIELDS: &[FieldSpec] = &[FieldSpec::checkboxes("confirmation", CONFIRMATION)];

/// Only available once every other task is complete.
pub fn task() -> TaskDefinition {
    TaskDefinition::new(
        TASK,
        "Check your answers",
        vec![PageDefinition::new(CHECK_YOUR_ANSWERS, FIELDS, CheckYourAnswers::build)],
    )
    .with_action_text("Check your answers")
    .after_all_other_tasks()
}

pub struct CheckYourAnswers {
    body: Body,
}

impl CheckYourAnswers {
    pub fn build(body: Body, _context: PageContext) -> Result<Box<dyn Page>> {
        Ok(Box::new(Self { body }))
    }
}

impl Page for CheckYourAnswers {
    fn slug(&self) -> &'static str {
        CHECK_YOUR_ANSWERS
    }

    fn title(&self) -> String {
        "Check your answers".into()
    }

    body_accessors!();

    fn errors(&self) -> ErrorMap {
        let mut errors = ErrorMap::new();
        if !self.body.list("confirmation").contains(&CONFIRMED) {
            errors.insert(
                "confirmation".into(),
                "You must confirm the information provided is complete, accurate and up to date"
                    .into(),
            );
        }
        errors
    }

    /// The confirmation is not part of the submitted document.
    fn response(&self) -> Response {
        Response::new()
    }

    fn next(&self) -> Option<&'static str> {
        None
    }

    fn previous(&self) -> Option<&'static str> {
        None
    }

    fn items(&self) -> Vec<ChoiceItem> {
        choice_items(CONFIRMATION, &self.body.list("confirmation"))
    }
}
