//! Interactive terminal surface over the referral wizard.

pub mod interaction;
pub mod output;
pub mod runner;
mod shell;

use thiserror::Error;

use crate::config::ConfigError;
use crate::errors::WizardError;

pub use interaction::{DialoguerInteraction, FieldPrompt, PageInteraction, PromptResponse};
pub use runner::{TaskOutcome, TaskRunner};
pub use shell::run_cli;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Wizard(#[from] WizardError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Dialoguer(#[from] dialoguer::Error),
    #[error("{0}")]
    Message(String),
}

pub type CliResult<T> = Result<T, CliError>;
