use dialoguer::{theme::ColorfulTheme, Input, MultiSelect, Select};

use crate::cli::output;
use crate::form::{ChoiceItem, ErrorMap, FieldKind, FieldSpec, FieldValue};

/// Everything needed to ask for one field of a page.
#[derive(Debug, Clone)]
pub struct FieldPrompt<'a> {
    pub field: &'a FieldSpec,
    pub label: String,
    /// Current value as the user would type it (dates as `DD/MM/YYYY`).
    pub current: Option<String>,
    /// Options with the current selection marked. Empty for free text.
    pub options: Vec<ChoiceItem>,
    pub error: Option<&'a str>,
}

/// Describes how a field prompt was answered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromptResponse {
    /// Text, a single option value, or `DD/MM/YYYY` for dates.
    Value(FieldValue),
    /// Keep the current value.
    Keep,
    /// Abandon the page and return to the task list.
    Cancel,
}

/// Interaction surface used by the task runner. The CLI provides a dialoguer
/// implementation; tests script their answers.
pub trait PageInteraction {
    fn show_page(&mut self, title: &str, errors: &ErrorMap);

    fn prompt_field(&mut self, prompt: &FieldPrompt<'_>) -> PromptResponse;
}

pub struct DialoguerInteraction {
    theme: ColorfulTheme,
}

impl DialoguerInteraction {
    pub fn new() -> Self {
        Self {
            theme: ColorfulTheme::default(),
        }
    }

    fn prompt_text(&self, prompt: &FieldPrompt<'_>) -> PromptResponse {
        let hint = match prompt.field.kind {
            FieldKind::Date => format!("{} (DD/MM/YYYY)", prompt.label),
            _ => prompt.label.clone(),
        };
        let mut input = Input::<String>::with_theme(&self.theme)
            .with_prompt(hint)
            .allow_empty(true);
        if let Some(current) = &prompt.current {
            input = input.with_initial_text(current.as_str());
        }
        match input.interact_text() {
            Ok(value) => PromptResponse::Value(FieldValue::Text(value)),
            Err(_) => PromptResponse::Cancel,
        }
    }

    fn prompt_choice(&self, prompt: &FieldPrompt<'_>) -> PromptResponse {
        let labels = prompt
            .options
            .iter()
            .map(|item| item.text.as_str())
            .collect::<Vec<_>>();
        let default = prompt.options.iter().position(|item| item.checked).unwrap_or(0);
        let selection = Select::with_theme(&self.theme)
            .with_prompt(prompt.label.as_str())
            .items(&labels)
            .default(default)
            .interact_opt();
        match selection {
            Ok(Some(index)) => PromptResponse::Value(FieldValue::Text(prompt.options[index].value.clone())),
            Ok(None) | Err(_) => PromptResponse::Cancel,
        }
    }

    fn prompt_checkboxes(&self, prompt: &FieldPrompt<'_>) -> PromptResponse {
        let labels = prompt
            .options
            .iter()
            .map(|item| item.text.as_str())
            .collect::<Vec<_>>();
        let defaults = prompt.options.iter().map(|item| item.checked).collect::<Vec<_>>();
        let selection = MultiSelect::with_theme(&self.theme)
            .with_prompt(prompt.label.as_str())
            .items(&labels)
            .defaults(&defaults)
            .interact_opt();
        match selection {
            Ok(Some(indices)) => PromptResponse::Value(FieldValue::List(
                indices
                    .into_iter()
                    .map(|index| prompt.options[index].value.clone())
                    .collect(),
            )),
            Ok(None) | Err(_) => PromptResponse::Cancel,
        }
    }
}

impl Default for DialoguerInteraction {
    fn default() -> Self {
        Self::new()
    }
}

impl PageInteraction for DialoguerInteraction {
    fn show_page(&mut self, title: &str, errors: &ErrorMap) {
        output::section(title);
        if !errors.is_empty() {
            output::error("There is a problem");
            for message in errors.values() {
                output::error(format!("  {}", message));
            }
        }
    }

    fn prompt_field(&mut self, prompt: &FieldPrompt<'_>) -> PromptResponse {
        if let Some(error) = prompt.error {
            output::warning(error);
        }
        match prompt.field.kind {
            FieldKind::Checkboxes(_) => self.prompt_checkboxes(prompt),
            FieldKind::YesNo | FieldKind::Choice(_) | FieldKind::Reference
                if !prompt.options.is_empty() =>
            {
                self.prompt_choice(prompt)
            }
            _ => self.prompt_text(prompt),
        }
    }
}
