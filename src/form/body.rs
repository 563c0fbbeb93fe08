use std::collections::BTreeMap;

use chrono::Datelike;
use serde::{Deserialize, Serialize};

use crate::form::dates::{self, DateInput};
use crate::form::fields::{FieldKind, FieldSpec};

/// A submitted form value: a single string or, for checkboxes, a list.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum FieldValue {
    Text(String),
    List(Vec<String>),
}

impl FieldValue {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(value) => Some(value),
            FieldValue::List(_) => None,
        }
    }

    pub fn as_list(&self) -> Vec<&str> {
        match self {
            FieldValue::Text(value) => vec![value.as_str()],
            FieldValue::List(values) => values.iter().map(String::as_str).collect(),
        }
    }

    pub fn is_blank(&self) -> bool {
        match self {
            FieldValue::Text(value) => value.trim().is_empty(),
            FieldValue::List(values) => values.iter().all(|value| value.trim().is_empty()),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Text(value)
    }
}

impl From<Vec<String>> for FieldValue {
    fn from(values: Vec<String>) -> Self {
        FieldValue::List(values)
    }
}

impl From<Vec<&str>> for FieldValue {
    fn from(values: Vec<&str>) -> Self {
        FieldValue::List(values.into_iter().map(str::to_string).collect())
    }
}

/// Untyped field-name to value mapping, exactly as submitted.
pub type RawBody = BTreeMap<String, FieldValue>;

/// Builds a [`RawBody`] from text pairs.
pub fn raw_body<'a>(pairs: impl IntoIterator<Item = (&'a str, &'a str)>) -> RawBody {
    pairs
        .into_iter()
        .map(|(key, value)| (key.to_string(), FieldValue::from(value)))
        .collect()
}

/// Normalised answers for one page, restricted to the page's declared fields.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct Body(BTreeMap<String, FieldValue>);

impl Body {
    /// Strips undeclared fields and normalises composite inputs.
    ///
    /// Date fields accept either `x-day`/`x-month`/`x-year` parts, which are
    /// combined into the canonical ISO value `x`, or a canonical `x` alone,
    /// from which the parts are re-derived for display.
    pub fn from_raw(raw: RawBody, fields: &[FieldSpec]) -> Self {
        let mut values = BTreeMap::new();
        for field in fields {
            match field.kind {
                FieldKind::Date => normalize_date(&raw, field.name, &mut values),
                FieldKind::Checkboxes(_) => {
                    if let Some(value) = raw.get(field.name) {
                        let mut list: Vec<String> = Vec::new();
                        for item in value.as_list() {
                            if !item.trim().is_empty() && !list.iter().any(|seen| seen == item) {
                                list.push(item.to_string());
                            }
                        }
                        values.insert(field.name.to_string(), FieldValue::List(list));
                    }
                }
                _ => {
                    if let Some(value) = raw.get(field.name) {
                        values.insert(field.name.to_string(), value.clone());
                    }
                }
            }
        }
        Self(values)
    }

    pub fn get(&self, key: &str) -> Option<&FieldValue> {
        self.0.get(key)
    }

    pub fn text(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(FieldValue::as_text)
    }

    /// Trimmed text value, `None` when missing or blank.
    pub fn filled(&self, key: &str) -> Option<&str> {
        self.text(key)
            .map(str::trim)
            .filter(|value| !value.is_empty())
    }

    pub fn list(&self, key: &str) -> Vec<&str> {
        self.0
            .get(key)
            .map(FieldValue::as_list)
            .unwrap_or_default()
    }

    pub fn date(&self, field: &str) -> DateInput {
        if let Some(value) = self.filled(field) {
            return match dates::parse_iso(value) {
                Some(date) => DateInput::Valid(date),
                None => DateInput::Invalid,
            };
        }
        let any_part = dates::PART_SUFFIXES
            .iter()
            .any(|suffix| self.filled(&format!("{}-{}", field, suffix)).is_some());
        if any_part {
            DateInput::Invalid
        } else {
            DateInput::Blank
        }
    }

    pub fn insert(&mut self, key: impl Into<String>, value: FieldValue) {
        self.0.insert(key.into(), value);
    }

    pub fn remove(&mut self, key: &str) -> Option<FieldValue> {
        self.0.remove(key)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_raw(&self) -> &RawBody {
        &self.0
    }

    pub fn into_raw(self) -> RawBody {
        self.0
    }
}

fn normalize_date(raw: &RawBody, name: &str, values: &mut BTreeMap<String, FieldValue>) {
    let keys = dates::PART_SUFFIXES.map(|suffix| format!("{}-{}", name, suffix));
    let parts = keys
        .iter()
        .map(|key| raw.get(key).and_then(FieldValue::as_text).map(str::trim))
        .collect::<Vec<_>>();

    if parts.iter().any(Option::is_some) {
        for (key, part) in keys.iter().zip(&parts) {
            if let Some(part) = part {
                values.insert(key.clone(), FieldValue::from(*part));
            }
        }
        let [day, month, year] = [parts[0], parts[1], parts[2]].map(Option::unwrap_or_default);
        if let Some(iso) = dates::parts_to_iso(day, month, year) {
            values.insert(name.to_string(), FieldValue::Text(iso));
        }
        return;
    }

    let Some(canonical) = raw.get(name).and_then(FieldValue::as_text) else {
        return;
    };
    values.insert(name.to_string(), FieldValue::from(canonical));
    if let Some(date) = dates::parse_iso(canonical) {
        let derived = [
            date.day().to_string(),
            date.month().to_string(),
            date.year().to_string(),
        ];
        for (key, part) in keys.into_iter().zip(derived) {
            values.insert(key, FieldValue::Text(part));
        }
    }
}
