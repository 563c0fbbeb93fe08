//! JSON Schema export for the application answer store.

use serde_json::{json, Map, Value};

use crate::form::dates::PART_SUFFIXES;
use crate::form::fields::{ChoiceOption, FieldKind, FieldSpec, YES_NO};
use crate::form::registry::{PageDefinition, PageRegistry, TaskDefinition};

pub const SCHEMA_DRAFT: &str = "https://json-schema.org/draft/2020-12/schema";
const ISO_DATE_PATTERN: &str = r"^\d{4}-\d{2}-\d{2}$";

/// Describes `application.data` as `task -> page -> field`, closed at every
/// level.
pub fn application_schema(registry: &PageRegistry) -> Value {
    let tasks = registry
        .tasks()
        .map(|task| (task.slug.to_string(), task_schema(task)))
        .collect::<Map<_, _>>();

    json!({
        "$schema": SCHEMA_DRAFT,
        "title": "Accommodation referral application data",
        "type": "object",
        "properties": tasks,
        "additionalProperties": false,
    })
}

fn task_schema(task: &TaskDefinition) -> Value {
    let pages = task
        .pages
        .iter()
        .map(|page| (page.slug.to_string(), page_schema(page)))
        .collect::<Map<_, _>>();

    json!({
        "title": task.name,
        "type": "object",
        "properties": pages,
        "additionalProperties": false,
    })
}

fn page_schema(page: &PageDefinition) -> Value {
    let mut properties = Map::new();
    for field in page.fields {
        add_field(&mut properties, field);
    }
    json!({
        "type": "object",
        "properties": properties,
        "additionalProperties": false,
    })
}

fn add_field(properties: &mut Map<String, Value>, field: &FieldSpec) {
    let schema = match field.kind {
        FieldKind::Text | FieldKind::Reference => json!({ "type": "string" }),
        FieldKind::YesNo => enum_schema(YES_NO),
        FieldKind::Choice(options) => enum_schema(options),
        FieldKind::Checkboxes(options) => json!({
            "type": "array",
            "items": enum_schema(options),
            "uniqueItems": true,
        }),
        FieldKind::Date => {
            for suffix in PART_SUFFIXES {
                properties.insert(
                    format!("{}-{}", field.name, suffix),
                    json!({ "type": "string" }),
                );
            }
            json!({ "type": "string", "pattern": ISO_DATE_PATTERN })
        }
    };
    properties.insert(field.name.to_string(), schema);
}

fn enum_schema(options: &[ChoiceOption]) -> Value {
    let values = options.iter().map(|option| option.value).collect::<Vec<_>>();
    json!({ "type": "string", "enum": values })
}
