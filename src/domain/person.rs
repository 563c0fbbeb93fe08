use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Phrase used in place of a person's name when their identity is withheld.
pub const ANONYMISED_NAME: &str = "the person";

/// The person a referral is made for, as returned by the person lookup.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Person {
    Full(FullPerson),
    Restricted(RestrictedPerson),
}

/// Person record with identifying details available to the caseworker.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct FullPerson {
    pub crn: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_of_birth: Option<NaiveDate>,
    /// Limited access offender flag; the name must not appear in generated text.
    #[serde(default)]
    pub is_restricted: bool,
}

/// Redacted person record carrying only the case reference number.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct RestrictedPerson {
    pub crn: String,
}

impl Person {
    pub fn full(crn: impl Into<String>, name: impl Into<String>) -> Self {
        Person::Full(FullPerson {
            crn: crn.into(),
            name: name.into(),
            date_of_birth: None,
            is_restricted: false,
        })
    }

    pub fn limited_access(crn: impl Into<String>, name: impl Into<String>) -> Self {
        Person::Full(FullPerson {
            crn: crn.into(),
            name: name.into(),
            date_of_birth: None,
            is_restricted: true,
        })
    }

    pub fn restricted(crn: impl Into<String>) -> Self {
        Person::Restricted(RestrictedPerson { crn: crn.into() })
    }

    pub fn crn(&self) -> &str {
        match self {
            Person::Full(person) => &person.crn,
            Person::Restricted(person) => &person.crn,
        }
    }

    pub fn is_limited_access(&self) -> bool {
        match self {
            Person::Full(person) => person.is_restricted,
            Person::Restricted(_) => true,
        }
    }

    /// Name suitable for generated text: the real name for a full person,
    /// [`ANONYMISED_NAME`] otherwise.
    pub fn display_name(&self) -> &str {
        match self {
            Person::Full(person) if !person.is_restricted => &person.name,
            _ => ANONYMISED_NAME,
        }
    }

    /// Replaces every occurrence of a withheld name in `text`.
    pub fn anonymise(&self, text: &str) -> String {
        match self {
            Person::Full(person) if person.is_restricted && !person.name.trim().is_empty() => {
                text.replace(person.name.trim(), ANONYMISED_NAME)
            }
            _ => text.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_person_uses_real_name() {
        let person = Person::full("X123456", "Jane Doe");
        assert_eq!(person.display_name(), "Jane Doe");
        assert_eq!(person.anonymise("Jane Doe's release"), "Jane Doe's release");
    }

    #[test]
    fn limited_access_person_is_anonymised() {
        let person = Person::limited_access("X123456", "Jane Doe");
        assert!(person.is_limited_access());
        assert_eq!(person.display_name(), ANONYMISED_NAME);
        assert_eq!(
            person.anonymise("Does Jane Doe need support? Ask Jane Doe."),
            "Does the person need support? Ask the person."
        );
    }

    #[test]
    fn restricted_person_has_no_name() {
        let person = Person::restricted("X654321");
        assert_eq!(person.crn(), "X654321");
        assert_eq!(person.display_name(), ANONYMISED_NAME);
    }

    #[test]
    fn person_serializes_with_type_tag() {
        let json = serde_json::to_value(Person::restricted("X1")).unwrap();
        assert_eq!(json["type"], "restricted");
        assert_eq!(json["crn"], "X1");
    }
}
