//! Drives one task page by page: prompt, submit, follow `next()`, and show
//! the same page again with its errors when validation fails.

use crate::cli::interaction::{FieldPrompt, PageInteraction, PromptResponse};
use crate::cli::CliResult;
use crate::domain::{Application, UserContext};
use crate::errors::WizardError;
use crate::form::dates::PART_SUFFIXES;
use crate::form::fields::choice_items;
use crate::form::{
    ChoiceItem, FieldKind, FieldSpec, FieldValue, Flash, PageRequest, RawBody, ResolvedPage,
    Transition, YES_NO,
};
use crate::services::ApplicationService;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskOutcome {
    /// The last page of the task was accepted.
    Completed,
    Cancelled,
}

pub struct TaskRunner<'a> {
    service: &'a ApplicationService,
    user: &'a UserContext,
}

impl<'a> TaskRunner<'a> {
    pub fn new(service: &'a ApplicationService, user: &'a UserContext) -> Self {
        Self { service, user }
    }

    pub async fn run<I: PageInteraction>(
        &self,
        application: &mut Application,
        task: &str,
        interaction: &mut I,
    ) -> CliResult<TaskOutcome> {
        let mut page: Option<&'static str> = None;
        let mut flash: Option<Flash> = None;

        loop {
            let request = PageRequest {
                task,
                page,
                flash: flash.take(),
            };
            let mut resolved = self.service.show_page(application, request, self.user).await?;
            interaction.show_page(&resolved.page.title(), &resolved.errors);

            let Some(submitted) = self.collect_answers(&resolved, interaction)? else {
                return Ok(TaskOutcome::Cancelled);
            };

            match self
                .service
                .submit_page(application, &mut resolved, submitted)
                .await
            {
                Ok(Transition {
                    next: Some(next), ..
                }) => page = Some(next),
                Ok(Transition { next: None, .. }) => return Ok(TaskOutcome::Completed),
                Err(WizardError::Validation(failure)) => {
                    page = Some(resolved.slug());
                    flash = Some(Flash::from(failure));
                }
                Err(err) => return Err(err.into()),
            }
        }
    }

    fn collect_answers<I: PageInteraction>(
        &self,
        resolved: &ResolvedPage,
        interaction: &mut I,
    ) -> CliResult<Option<RawBody>> {
        let definition = self
            .service
            .wizard()
            .registry()
            .page(resolved.task, resolved.slug())?;

        let mut raw = RawBody::new();
        for field in definition.fields {
            let prompt = FieldPrompt {
                field,
                label: field_label(field.name),
                current: current_text(resolved, field),
                options: options_for(resolved, field),
                error: resolved.errors.get(field.name).map(String::as_str),
            };
            match interaction.prompt_field(&prompt) {
                PromptResponse::Cancel => return Ok(None),
                PromptResponse::Keep => {
                    if let Some(value) = kept_value(resolved, field) {
                        insert_answer(&mut raw, field, value);
                    }
                }
                PromptResponse::Value(value) => insert_answer(&mut raw, field, value),
            }
        }
        Ok(Some(raw))
    }
}

/// Flashed input wins over the stored body so the user sees what they typed.
fn source<'r>(resolved: &'r ResolvedPage, key: &str) -> Option<&'r FieldValue> {
    resolved
        .user_input
        .as_ref()
        .and_then(|raw| raw.get(key))
        .or_else(|| resolved.page.body().get(key))
}

fn date_parts(resolved: &ResolvedPage, name: &str) -> Option<[String; 3]> {
    let parts = PART_SUFFIXES.map(|suffix| {
        source(resolved, &format!("{}-{}", name, suffix))
            .and_then(FieldValue::as_text)
            .unwrap_or_default()
            .trim()
            .to_string()
    });
    parts.iter().any(|part| !part.is_empty()).then_some(parts)
}

fn current_text(resolved: &ResolvedPage, field: &FieldSpec) -> Option<String> {
    match field.kind {
        FieldKind::Date => date_parts(resolved, field.name).map(|parts| parts.join("/")),
        _ => source(resolved, field.name).map(|value| value.as_list().join(", ")),
    }
}

fn kept_value(resolved: &ResolvedPage, field: &FieldSpec) -> Option<FieldValue> {
    match field.kind {
        FieldKind::Date => current_text(resolved, field).map(FieldValue::Text),
        _ => source(resolved, field.name).cloned(),
    }
}

fn options_for(resolved: &ResolvedPage, field: &FieldSpec) -> Vec<ChoiceItem> {
    let selected = source(resolved, field.name)
        .map(FieldValue::as_list)
        .unwrap_or_default();
    match field.kind {
        FieldKind::YesNo => choice_items(YES_NO, &selected),
        FieldKind::Choice(options) | FieldKind::Checkboxes(options) => {
            choice_items(options, &selected)
        }
        FieldKind::Reference => resolved.page.items(),
        FieldKind::Text | FieldKind::Date => Vec::new(),
    }
}

/// Dates are typed as `DD/MM/YYYY` and submitted as their three parts.
fn insert_answer(raw: &mut RawBody, field: &FieldSpec, value: FieldValue) {
    match (field.kind, value) {
        (FieldKind::Date, FieldValue::Text(text)) => {
            let mut parts = text.split('/').map(str::trim);
            for suffix in PART_SUFFIXES {
                let part = parts.next().unwrap_or_default();
                raw.insert(format!("{}-{}", field.name, suffix), FieldValue::from(part));
            }
        }
        (_, value) => {
            raw.insert(field.name.to_string(), value);
        }
    }
}

/// `accommodationRequiredFromDate` reads as "Accommodation required from date".
pub fn field_label(name: &str) -> String {
    let mut label = String::with_capacity(name.len() + 8);
    for (index, ch) in name.chars().enumerate() {
        if index == 0 {
            label.extend(ch.to_uppercase());
        } else if ch.is_uppercase() {
            label.push(' ');
            label.extend(ch.to_lowercase());
        } else {
            label.push(ch);
        }
    }
    label
}
