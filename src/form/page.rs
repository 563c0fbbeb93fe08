use chrono::NaiveDate;
use uuid::Uuid;

use crate::domain::{AnswerStore, Application, Person};
use crate::errors::{Result, WizardError};
use crate::form::body::Body;
use crate::form::fields::{ChoiceItem, ErrorMap};
use crate::form::response::Response;

/// One screen of a task: its answers, validation, transcript and navigation.
///
/// Navigation is a pure function of the body and the application context, so
/// a page behaves the same whether it was reached by `next()`, by "back", or
/// directly by URL. `None` from [`Page::next`] or [`Page::previous`] means
/// "return to the task list".
pub trait Page: Send + Sync {
    fn slug(&self) -> &'static str;

    fn title(&self) -> String;

    fn body(&self) -> &Body;

    fn set_body(&mut self, body: Body);

    fn errors(&self) -> ErrorMap;

    fn response(&self) -> Response;

    fn next(&self) -> Option<&'static str>;

    fn previous(&self) -> Option<&'static str>;

    /// Options for choice pages, with the current selection marked.
    fn items(&self) -> Vec<ChoiceItem> {
        Vec::new()
    }

    /// Changes to other answer slices that accepting this body implies.
    fn application_patch(&self) -> ApplicationPatch {
        ApplicationPatch::default()
    }

    /// Why the referral cannot be submitted with this answer, if it cannot.
    ///
    /// The answer is still valid and the task still completes; only
    /// submission is refused.
    fn blocking_reason(&self) -> Option<String> {
        None
    }
}

/// Plain constructor registered for pages that need no reference data.
pub type PageConstructor = fn(Body, PageContext) -> Result<Box<dyn Page>>;

/// Read-only snapshot of the owning application handed to every page.
#[derive(Debug, Clone)]
pub struct PageContext {
    pub application_id: Uuid,
    pub person: Person,
    pub answers: AnswerStore,
    pub today: NaiveDate,
}

impl PageContext {
    pub fn new(application: &Application, today: NaiveDate) -> Self {
        Self {
            application_id: application.id,
            person: application.person.clone(),
            answers: application.data.clone(),
            today,
        }
    }

    /// Name to embed in generated text, anonymised for limited access persons.
    pub fn person_name(&self) -> &str {
        self.person.display_name()
    }

    pub fn stored(&self, task: &str, page: &str) -> Option<&Body> {
        self.answers.page(task, page)
    }

    pub fn answer(&self, task: &str, page: &str, field: &str) -> Option<&str> {
        self.stored(task, page).and_then(|body| body.filled(field))
    }

    /// Like [`PageContext::answer`], but a missing value is a session data error.
    pub fn require_answer(&self, task: &str, page: &str, field: &str) -> Result<&str> {
        self.answer(task, page, field).ok_or_else(|| {
            WizardError::SessionData(format!(
                "application {} has no `{}` answer on `{}/{}`",
                self.application_id, field, task, page
            ))
        })
    }
}

/// Reference to a page slice of the answer store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRef {
    pub task: &'static str,
    pub page: &'static str,
}

/// Explicit application changes produced alongside a page body.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ApplicationPatch {
    cleared: Vec<PageRef>,
}

impl ApplicationPatch {
    /// Removes the answers and transcript of a dependent page.
    pub fn clear_page(mut self, task: &'static str, page: &'static str) -> Self {
        self.cleared.push(PageRef { task, page });
        self
    }

    pub fn cleared_pages(&self) -> &[PageRef] {
        &self.cleared
    }

    pub fn is_empty(&self) -> bool {
        self.cleared.is_empty()
    }

    pub fn apply(&self, application: &mut Application) {
        for target in &self.cleared {
            application.data.clear_page(target.task, target.page);
            application.document.clear_page(target.task, target.page);
        }
    }
}
