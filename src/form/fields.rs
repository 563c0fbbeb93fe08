//! Field declarations and the validation rules shared between pages.
//!
//! Every page declares a closed list of [`FieldSpec`]s. The list is used to
//! strip unknown submitted fields, to normalise composite inputs, and to
//! generate the JSON schema for the whole application document.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::Serialize;

use crate::form::body::Body;
use crate::form::dates::DateInput;

/// Field name to human-readable message. Empty when the page is valid.
pub type ErrorMap = BTreeMap<String, String>;

/// Supported data kinds for page fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    YesNo,
    /// Composite day/month/year input stored as an ISO date.
    Date,
    Choice(&'static [ChoiceOption]),
    /// Choice whose options come from reference data fetched at runtime.
    Reference,
    Checkboxes(&'static [ChoiceOption]),
}

/// Declarative description of a single page field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub kind: FieldKind,
}

impl FieldSpec {
    pub const fn text(name: &'static str) -> Self {
        Self {
            name,
            kind: FieldKind::Text,
        }
    }

    pub const fn yes_no(name: &'static str) -> Self {
        Self {
            name,
            kind: FieldKind::YesNo,
        }
    }

    pub const fn date(name: &'static str) -> Self {
        Self {
            name,
            kind: FieldKind::Date,
        }
    }

    pub const fn choice(name: &'static str, options: &'static [ChoiceOption]) -> Self {
        Self {
            name,
            kind: FieldKind::Choice(options),
        }
    }

    pub const fn reference(name: &'static str) -> Self {
        Self {
            name,
            kind: FieldKind::Reference,
        }
    }

    pub const fn checkboxes(name: &'static str, options: &'static [ChoiceOption]) -> Self {
        Self {
            name,
            kind: FieldKind::Checkboxes(options),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChoiceOption {
    pub value: &'static str,
    pub label: &'static str,
}

impl ChoiceOption {
    pub const fn new(value: &'static str, label: &'static str) -> Self {
        Self { value, label }
    }
}

pub const YES_NO: &[ChoiceOption] = &[ChoiceOption::new("yes", "Yes"), ChoiceOption::new("no", "No")];

pub fn label_for(options: &[ChoiceOption], value: &str) -> Option<&'static str> {
    options
        .iter()
        .find(|option| option.value == value)
        .map(|option| option.label)
}

/// A selectable option with the current selection marked, used for rendering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChoiceItem {
    pub value: String,
    pub text: String,
    pub checked: bool,
}

impl ChoiceItem {
    pub fn new(value: impl Into<String>, text: impl Into<String>, checked: bool) -> Self {
        Self {
            value: value.into(),
            text: text.into(),
            checked,
        }
    }
}

pub fn choice_items(options: &[ChoiceOption], selected: &[&str]) -> Vec<ChoiceItem> {
    options
        .iter()
        .map(|option| ChoiceItem::new(option.value, option.label, selected.contains(&option.value)))
        .collect()
}

/// Transcript text for a stored yes/no answer.
pub fn yes_no_label(value: Option<&str>) -> &'static str {
    match value {
        Some("yes") => "Yes",
        Some("no") => "No",
        _ => "",
    }
}

pub fn require_filled<'a>(
    body: &'a Body,
    errors: &mut ErrorMap,
    field: &str,
    message: &str,
) -> Option<&'a str> {
    let value = body.filled(field);
    if value.is_none() {
        errors.insert(field.to_string(), message.to_string());
    }
    value
}

/// Requires `field` to be exactly `yes` or `no`.
pub fn require_yes_no<'a>(
    body: &'a Body,
    errors: &mut ErrorMap,
    field: &str,
    message: &str,
) -> Option<&'a str> {
    require_choice(body, errors, field, YES_NO, message)
}

pub fn require_choice<'a>(
    body: &'a Body,
    errors: &mut ErrorMap,
    field: &str,
    options: &[ChoiceOption],
    message: &str,
) -> Option<&'a str> {
    match body.filled(field) {
        Some(value) if options.iter().any(|option| option.value == value) => Some(value),
        _ => {
            errors.insert(field.to_string(), message.to_string());
            None
        }
    }
}

/// Yes/no question whose "yes" answer makes a detail field mandatory.
pub fn yes_no_detail_errors(
    body: &Body,
    errors: &mut ErrorMap,
    answer_field: &str,
    detail_field: &str,
    answer_message: &str,
    detail_message: &str,
) {
    if require_yes_no(body, errors, answer_field, answer_message) == Some("yes")
        && body.filled(detail_field).is_none()
    {
        errors.insert(detail_field.to_string(), detail_message.to_string());
    }
}

/// Presence and parse checks for a composite date field.
///
/// Returns the parsed date so callers can add their own temporal rules.
pub fn date_errors(
    body: &Body,
    errors: &mut ErrorMap,
    field: &str,
    label: &str,
) -> Option<NaiveDate> {
    match body.date(field) {
        DateInput::Valid(date) => Some(date),
        DateInput::Blank => {
            errors.insert(field.to_string(), format!("You must specify the {}", label));
            None
        }
        DateInput::Invalid => {
            errors.insert(field.to_string(), format!("You must specify a valid {}", label));
            None
        }
    }
}
