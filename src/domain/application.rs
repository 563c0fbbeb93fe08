use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::person::Person;
use crate::form::{Body, Response};

/// One referral being completed through the wizard.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Application {
    pub id: Uuid,
    pub person: Person,
    #[serde(default)]
    pub data: AnswerStore,
    #[serde(default)]
    pub document: Document,
    #[serde(default)]
    pub status: ApplicationStatus,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub submitted_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum ApplicationStatus {
    #[default]
    InProgress,
    Submitted,
}

impl Application {
    pub fn new(person: Person) -> Self {
        Self {
            id: Uuid::new_v4(),
            person,
            data: AnswerStore::default(),
            document: Document::default(),
            status: ApplicationStatus::InProgress,
            created_at: Utc::now(),
            submitted_at: None,
        }
    }

    pub fn is_submitted(&self) -> bool {
        self.status == ApplicationStatus::Submitted
    }

    /// Convenience accessor for a single stored answer.
    pub fn answer(&self, task: &str, page: &str, field: &str) -> Option<&str> {
        self.data.field(task, page, field)
    }
}

/// Answers keyed by task slug, then page slug.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct AnswerStore(BTreeMap<String, BTreeMap<String, Body>>);

impl AnswerStore {
    pub fn page(&self, task: &str, page: &str) -> Option<&Body> {
        self.0.get(task).and_then(|pages| pages.get(page))
    }

    pub fn task(&self, task: &str) -> Option<&BTreeMap<String, Body>> {
        self.0.get(task)
    }

    pub fn field(&self, task: &str, page: &str, field: &str) -> Option<&str> {
        self.page(task, page).and_then(|body| body.text(field))
    }

    pub fn set_page(&mut self, task: &str, page: &str, body: Body) {
        self.0
            .entry(task.to_string())
            .or_default()
            .insert(page.to_string(), body);
    }

    pub fn clear_page(&mut self, task: &str, page: &str) -> Option<Body> {
        let pages = self.0.get_mut(task)?;
        let removed = pages.remove(page);
        if pages.is_empty() {
            self.0.remove(task);
        }
        removed
    }

    /// Keeps only the listed pages of a task.
    pub fn retain_pages(&mut self, task: &str, keep: &[&str]) {
        if let Some(pages) = self.0.get_mut(task) {
            pages.retain(|page, _| keep.contains(&page.as_str()));
            if pages.is_empty() {
                self.0.remove(task);
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn tasks(&self) -> impl Iterator<Item = (&String, &BTreeMap<String, Body>)> {
        self.0.iter()
    }
}

/// Response transcript keyed by task slug, then page slug.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct Document(BTreeMap<String, BTreeMap<String, Response>>);

impl Document {
    pub fn page(&self, task: &str, page: &str) -> Option<&Response> {
        self.0.get(task).and_then(|pages| pages.get(page))
    }

    pub fn set_page(&mut self, task: &str, page: &str, response: Response) {
        self.0
            .entry(task.to_string())
            .or_default()
            .insert(page.to_string(), response);
    }

    pub fn clear_page(&mut self, task: &str, page: &str) {
        if let Some(pages) = self.0.get_mut(task) {
            pages.remove(page);
            if pages.is_empty() {
                self.0.remove(task);
            }
        }
    }

    pub fn clear_task(&mut self, task: &str) {
        self.0.remove(task);
    }

    /// Looks up an answer by question text anywhere in the document.
    pub fn answer_to(&self, question: &str) -> Option<&str> {
        self.0
            .values()
            .flat_map(|pages| pages.values())
            .find_map(|response| response.get(question))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
