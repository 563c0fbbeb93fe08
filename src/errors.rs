use std::result::Result as StdResult;

use thiserror::Error;
use uuid::Uuid;

use crate::form::{ErrorMap, RawBody};

/// Error type covering every failure the referral wizard can signal.
#[derive(Debug, Error)]
pub enum WizardError {
    #[error("Unknown page: {}", unknown_page_label(.task, .page, .suggestion))]
    UnknownPage {
        task: String,
        page: Option<String>,
        suggestion: Option<String>,
    },
    #[error("Validation failed on page `{}/{}`", .0.task, .0.page)]
    Validation(ValidationFailure),
    #[error("Session data error: {0}")]
    SessionData(String),
    #[error("Reference data unavailable: {0}")]
    ReferenceData(String),
    #[error("Configuration error: {0}")]
    Configuration(String),
    #[error("Application {0} has already been submitted")]
    AlreadySubmitted(Uuid),
    #[error("Application {id} cannot be submitted, incomplete tasks: {}", .incomplete.join(", "))]
    NotReadyToSubmit { id: Uuid, incomplete: Vec<String> },
    #[error("Application {id} cannot be submitted: {}", .reasons.join("; "))]
    ReferralBlocked { id: Uuid, reasons: Vec<String> },
    #[error("Application not found: {0}")]
    ApplicationNotFound(Uuid),
    #[error("Persistence error: {0}")]
    Storage(String),
}

pub type Result<T> = StdResult<T, WizardError>;

impl WizardError {
    pub fn unknown_task(task: &str, suggestion: Option<String>) -> Self {
        WizardError::UnknownPage {
            task: task.to_string(),
            page: None,
            suggestion,
        }
    }

    pub fn unknown_page(task: &str, page: &str, suggestion: Option<String>) -> Self {
        WizardError::UnknownPage {
            task: task.to_string(),
            page: Some(page.to_string()),
            suggestion,
        }
    }

    /// Errors that an HTTP boundary maps to 404 rather than 500.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            WizardError::UnknownPage { .. } | WizardError::ApplicationNotFound(_)
        )
    }

    pub fn validation(&self) -> Option<&ValidationFailure> {
        match self {
            WizardError::Validation(failure) => Some(failure),
            _ => None,
        }
    }
}

/// Recoverable validation outcome for a single page submission.
///
/// Carries the raw input exactly as submitted so the page can be shown again
/// with what the user typed rather than the normalised body.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationFailure {
    pub task: String,
    pub page: String,
    pub errors: ErrorMap,
    pub user_input: RawBody,
}

fn unknown_page_label(task: &str, page: &Option<String>, suggestion: &Option<String>) -> String {
    let mut label = match page {
        Some(page) => format!("{}/{}", task, page),
        None => task.to_string(),
    };
    if let Some(suggestion) = suggestion {
        label.push_str(&format!(" (did you mean `{}`?)", suggestion));
    }
    label
}

impl From<std::io::Error> for WizardError {
    fn from(err: std::io::Error) -> Self {
        WizardError::Storage(err.to_string())
    }
}

impl From<serde_json::Error> for WizardError {
    fn from(err: serde_json::Error) -> Self {
        WizardError::Storage(err.to_string())
    }
}
