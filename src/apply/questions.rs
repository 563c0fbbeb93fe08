//! Table-driven yes/no question pages, optionally with a detail field that
//! becomes mandatory on "yes".

use crate::form::fields::{choice_items, yes_no_detail_errors, yes_no_label, require_yes_no};
use crate::form::{Body, ChoiceItem, ErrorMap, Page, PageContext, Response, YES_NO};

pub(crate) struct DetailPrompt {
    pub field: &'static str,
    pub question: &'static str,
    pub message: &'static str,
}

pub(crate) struct YesNoQuestion {
    pub slug: &'static str,
    /// Builds the question from the (possibly anonymised) person name.
    pub title: fn(&str) -> String,
    pub field: &'static str,
    pub message: &'static str,
    pub detail: Option<DetailPrompt>,
    /// Reason the referral cannot go ahead when the answer is "no".
    pub blocked_on_no: Option<&'static str>,
    pub next: fn(&YesNoPage) -> Option<&'static str>,
    pub previous: fn(&YesNoPage) -> Option<&'static str>,
}

pub(crate) struct YesNoPage {
    question: &'static YesNoQuestion,
    body: Body,
    context: PageContext,
}

impl YesNoPage {
    pub fn boxed(question: &'static YesNoQuestion, body: Body, context: PageContext) -> Box<dyn Page> {
        Box::new(Self {
            question,
            body,
            context,
        })
    }

    pub fn answer(&self) -> Option<&str> {
        self.body.filled(self.question.field)
    }

    pub fn answered_yes(&self) -> bool {
        self.answer() == Some("yes")
    }

    pub fn context(&self) -> &PageContext {
        &self.context
    }
}

impl Page for YesNoPage {
    fn slug(&self) -> &'static str {
        self.question.slug
    }

    fn title(&self) -> String {
        (self.question.title)(self.context.person_name())
    }

    body_accessors!();

    fn errors(&self) -> ErrorMap {
        let mut errors = ErrorMap::new();
        match &self.question.detail {
            Some(detail) => yes_no_detail_errors(
                &self.body,
                &mut errors,
                self.question.field,
                detail.field,
                self.question.message,
                detail.message,
            ),
            None => {
                require_yes_no(&self.body, &mut errors, self.question.field, self.question.message);
            }
        }
        errors
    }

    fn response(&self) -> Response {
        let mut response = Response::new().with(self.title(), yes_no_label(self.answer()));
        if let Some(detail) = &self.question.detail {
            if self.answered_yes() {
                response.add(detail.question, self.body.filled(detail.field).unwrap_or_default());
            }
        }
        response
    }

    fn next(&self) -> Option<&'static str> {
        (self.question.next)(self)
    }

    fn previous(&self) -> Option<&'static str> {
        (self.question.previous)(self)
    }

    fn items(&self) -> Vec<ChoiceItem> {
        let selected = self.answer().into_iter().collect::<Vec<_>>();
        choice_items(YES_NO, &selected)
    }

    fn blocking_reason(&self) -> Option<String> {
        match self.answer() {
            Some("no") => self.question.blocked_on_no.map(str::to_string),
            _ => None,
        }
    }
}

/// Navigation for pages at either end of a task.
pub(crate) fn task_list(_: &YesNoPage) -> Option<&'static str> {
    None
}
