use crate::errors::Result;
use crate::form::fields::{choice_items, label_for};
use crate::form::{
    Body, ChoiceItem, ChoiceOption, ErrorMap, FieldSpec, Page, PageContext, PageDefinition,
    Response, TaskDefinition,
};

pub const TASK: &str = "disability-cultural-and-specific-needs";
pub const NEEDS: &str = "needs";

const NONE: &str = "none";
const OTHER: &str = "other";

pub const NEED_OPTIONS: &[ChoiceOption] = &[
    ChoiceOption::new("learningDisability", "Learning disability"),
    ChoiceOption::new("neurodivergentConditions", "Neurodivergent conditions"),
    ChoiceOption::new("mentalHealth", "Mental health needs"),
    ChoiceOption::new("mobility", "Mobility needs"),
    ChoiceOption::new("visualImpairment", "Visual impairment"),
    ChoiceOption::new("hearingImpairment", "Hearing impairment"),
    ChoiceOption::new("religiousOrCulturalNeeds", "Religious or cultural needs"),
    ChoiceOption::new(OTHER, "Other"),
    ChoiceOption::new(NONE, "None"),
];

const FIELDS: &[FieldSpec] = &[
    FieldSpec::checkboxes("needs", NEED_OPTIONS),
    FieldSpec::text("needsDetail"),
];

pub fn task() -> TaskDefinition {
    TaskDefinition::new(
        TASK,
        "Disability, cultural and specific needs",
        vec![PageDefinition::new(NEEDS, FIELDS, Needs::build)],
    )
}

pub struct Needs {
    body: Body,
    context: PageContext,
}

impl Needs {
    pub fn build(body: Body, context: PageContext) -> Result<Box<dyn Page>> {
        Ok(Box::new(Self { body, context }))
    }

    fn selected(&self) -> Vec<&str> {
        self.body.list("needs")
    }
}

impl Page for Needs {
    fn slug(&self) -> &'static str {
        NEEDS
    }

    fn title(&self) -> String {
        format!(
            "Does {} have any of the following needs?",
            self.context.person_name()
        )
    }

    body_accessors!();

    fn errors(&self) -> ErrorMap {
        let mut errors = ErrorMap::new();
        let selected = self.selected();
        if selected.is_empty() {
            errors.insert("needs".into(), "You must select any needs, or 'None'".into());
        } else if selected.iter().any(|value| label_for(NEED_OPTIONS, value).is_none()) {
            errors.insert("needs".into(), "You must select needs from the list".into());
        } else if selected.contains(&NONE) && selected.len() > 1 {
            errors.insert(
                "needs".into(),
                "You cannot select 'None' together with other needs".into(),
            );
        } else if selected.contains(&OTHER) && self.body.filled("needsDetail").is_none() {
            errors.insert("needsDetail".into(), "You must specify the other needs".into());
        }
        errors
    }

    fn response(&self) -> Response {
        let labels = self
            .selected()
            .into_iter()
            .filter_map(|value| label_for(NEED_OPTIONS, value))
            .collect::<Vec<_>>();
        let mut response = Response::new().with(self.title(), labels.join(", "));
        if self.selected().contains(&OTHER) {
            response.add(
                "Details of other needs",
                self.body.filled("needsDetail").unwrap_or_default(),
            );
        }
        response
    }

    fn next(&self) -> Option<&'static str> {
        None
    }

    fn previous(&self) -> Option<&'static str> {
        None
    }

    fn items(&self) -> Vec<ChoiceItem> {
        choice_items(NEED_OPTIONS, &self.selected())
    }
}
