use chrono::NaiveDate;

use crate::errors::{Result, WizardError};
use crate::form::dates::{format_long, parse_iso};
use crate::form::fields::{choice_items, date_errors, label_for, require_choice};
use crate::form::{
    Body, ChoiceItem, ChoiceOption, ErrorMap, FieldSpec, Page, PageContext, PageDefinition,
    Response, TaskDefinition,
};

pub const TASK: &str = "eligibility";
pub const ELIGIBILITY_REASON: &str = "eligibility-reason";
pub const RELEASE_DATE: &str = "release-date";
pub const ACCOMMODATION_REQUIRED_FROM_DATE: &str = "accommodation-required-from-date";

pub const REASONS: &[ChoiceOption] = &[
    ChoiceOption::new(
        "homelessFromCustody",
        "Leaving prison or custody and would otherwise be homeless",
    ),
    ChoiceOption::new(
        "homelessFromApprovedPremises",
        "Leaving an Approved Premises and would otherwise be homeless",
    ),
    ChoiceOption::new(
        "homelessFromBailAccommodation",
        "Leaving bail accommodation and would otherwise be homeless",
    ),
    ChoiceOption::new(
        "homelessFromCommunityOrder",
        "Serving a community order and would otherwise be homeless",
    ),
];

const REASON_FIELDS: &[FieldSpec] = &[FieldSpec::choice("reason", REASONS)];
const RELEASE_DATE_FIELDS: &[FieldSpec] = &[FieldSpec::date("releaseDate")];
const REQUIRED_FROM_FIELDS: &[FieldSpec] = &[FieldSpec::date("accommodationRequiredFromDate")];

pub fn task() -> TaskDefinition {
    TaskDefinition::new(
        TASK,
        "Confirm eligibility reason and dates",
        vec![
            PageDefinition::new(ELIGIBILITY_REASON, REASON_FIELDS, EligibilityReason::build),
            PageDefinition::new(RELEASE_DATE, RELEASE_DATE_FIELDS, ReleaseDate::build),
            PageDefinition::new(
                ACCOMMODATION_REQUIRED_FROM_DATE,
                REQUIRED_FROM_FIELDS,
                AccommodationRequiredFromDate::build,
            ),
        ],
    )
    .with_action_text("Add eligibility details")
}

pub struct EligibilityReason {
    body: Body,
    context: PageContext,
}

impl EligibilityReason {
    pub fn build(body: Body, context: PageContext) -> Result<Box<dyn Page>> {
        Ok(Box::new(Self { body, context }))
    }
}

impl Page for EligibilityReason {
    fn slug(&self) -> &'static str {
        ELIGIBILITY_REASON
    }

    fn title(&self) -> String {
        format!(
            "How is {} eligible for transitional accommodation?",
            self.context.person_name()
        )
    }

    body_accessors!();

    fn errors(&self) -> ErrorMap {
        let mut errors = ErrorMap::new();
        require_choice(&self.body, &mut errors, "reason", REASONS, "You must choose a reason");
        errors
    }

    fn response(&self) -> Response {
        let reason = self
            .body
            .filled("reason")
            .and_then(|value| label_for(REASONS, value))
            .unwrap_or_default();
        Response::new().with("Eligibility reason", reason)
    }

    fn next(&self) -> Option<&'static str> {
        Some(RELEASE_DATE)
    }

    fn previous(&self) -> Option<&'static str> {
        None
    }

    fn items(&self) -> Vec<ChoiceItem> {
        let selected = self.body.filled("reason").into_iter().collect::<Vec<_>>();
        choice_items(REASONS, &selected)
    }
}

pub struct ReleaseDate {
    body: Body,
    context: PageContext,
}

impl ReleaseDate {
    pub fn build(body: Body, context: PageContext) -> Result<Box<dyn Page>> {
        Ok(Box::new(Self { body, context }))
    }
}

impl Page for ReleaseDate {
    fn slug(&self) -> &'static str {
        RELEASE_DATE
    }

    fn title(&self) -> String {
        format!("What is {}'s release date?", self.context.person_name())
    }

    body_accessors!();

    fn errors(&self) -> ErrorMap {
        let mut errors = ErrorMap::new();
        let date = date_errors(&self.body, &mut errors, "releaseDate", "release date");
        if date.is_some_and(|date| date < self.context.today) {
            errors.insert(
                "releaseDate".into(),
                "The release date must not be in the past".into(),
            );
        }
        errors
    }

    fn response(&self) -> Response {
        let date = self
            .body
            .date("releaseDate")
            .valid()
            .map(format_long)
            .unwrap_or_default();
        Response::new().with("Release date", date)
    }

    fn next(&self) -> Option<&'static str> {
        Some(ACCOMMODATION_REQUIRED_FROM_DATE)
    }

    fn previous(&self) -> Option<&'static str> {
        Some(ELIGIBILITY_REASON)
    }
}

/// Requires the release date answer, which bounds the earliest start date.
pub struct AccommodationRequiredFromDate {
    body: Body,
    release_date: NaiveDate,
    today: NaiveDate,
}

impl AccommodationRequiredFromDate {
    pub fn build(body: Body, context: PageContext) -> Result<Box<dyn Page>> {
        let stored = context.require_answer(TASK, RELEASE_DATE, "releaseDate")?;
        let release_date = parse_iso(stored).ok_or_else(|| {
            WizardError::SessionData(format!(
                "application {} has an unreadable release date `{}`",
                context.application_id, stored
            ))
        })?;
        Ok(Box::new(Self {
            body,
            release_date,
            today: context.today,
        }))
    }
}

impl Page for AccommodationRequiredFromDate {
    fn slug(&self) -> &'static str {
        ACCOMMODATION_REQUIRED_FROM_DATE
    }

    fn title(&self) -> String {
        "From what date is accommodation required?".into()
    }

    body_accessors!();

    fn errors(&self) -> ErrorMap {
        let mut errors = ErrorMap::new();
        let field = "accommodationRequiredFromDate";
        let Some(date) = date_errors(&self.body, &mut errors, field, "date accommodation is required from")
        else {
            return errors;
        };
        if date < self.today {
            errors.insert(
                field.into(),
                "The date accommodation is required from must not be in the past".into(),
            );
        } else if date < self.release_date {
            errors.insert(
                field.into(),
                format!(
                    "The date accommodation is required from must not be before the release date ({})",
                    format_long(self.release_date)
                ),
            );
        }
        errors
    }

    fn response(&self) -> Response {
        let date = self
            .body
            .date("accommodationRequiredFromDate")
            .valid()
            .map(format_long)
            .unwrap_or_default();
        Response::new().with("Accommodation required from date", date)
    }

    fn next(&self) -> Option<&'static str> {
        None
    }

    fn previous(&self) -> Option<&'static str> {
        Some(RELEASE_DATE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::apply::test_support::{application, body, context};

    #[test]
    fn release_date_parts_normalise_and_render() {
        let page = ReleaseDate::build(
            body(
                &[
                    ("releaseDate-day", "11"),
                    ("releaseDate-month", "4"),
                    ("releaseDate-year", "2024"),
                ],
                RELEASE_DATE_FIELDS,
            ),
            context(&application()),
        )
        .unwrap();

        assert_eq!(page.body().text("releaseDate"), Some("2024-04-11"));
        assert!(page.errors().is_empty());
        assert_eq!(page.response().get("Release date"), Some("11 April 2024"));
        assert_eq!(page.next(), Some(ACCOMMODATION_REQUIRED_FROM_DATE));
        assert_eq!(page.previous(), Some(ELIGIBILITY_REASON));
    }

    #[test]
    fn release_date_messages_are_field_specific() {
        let cases = [
            (vec![], "You must specify the release date"),
            (
                vec![("releaseDate-day", "31"), ("releaseDate-month", "2"), ("releaseDate-year", "2024")],
                "You must specify a valid release date",
            ),
            (vec![("releaseDate", "2024-03-01")], "The release date must not be in the past"),
        ];
        for (pairs, expected) in cases {
            let page = ReleaseDate::build(body(&pairs, RELEASE_DATE_FIELDS), context(&application()))
                .unwrap();
            assert_eq!(page.errors()["releaseDate"], expected);
        }
    }

    #[test]
    fn missing_reason_has_exact_message() {
        let page = EligibilityReason::build(body(&[], REASON_FIELDS), context(&application())).unwrap();
        let errors = page.errors();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors["reason"], "You must choose a reason");
    }

    #[test]
    fn unknown_reason_is_rejected() {
        let page = EligibilityReason::build(
            body(&[("reason", "somethingElse")], REASON_FIELDS),
            context(&application()),
        )
        .unwrap();
        assert!(page.errors().contains_key("reason"));
    }

    #[test]
    fn required_from_date_needs_release_date() {
        let err = AccommodationRequiredFromDate::build(
            body(&[], REQUIRED_FROM_FIELDS),
            context(&application()),
        )
        .err()
        .unwrap();
        assert!(matches!(err, WizardError::SessionData(_)));
    }

    #[test]
    fn required_from_date_cannot_precede_release() {
        let mut application = application();
        application.data.set_page(
            TASK,
            RELEASE_DATE,
            body(&[("releaseDate", "2024-04-11")], RELEASE_DATE_FIELDS),
        );

        let early = AccommodationRequiredFromDate::build(
            body(&[("accommodationRequiredFromDate", "2024-04-05")], REQUIRED_FROM_FIELDS),
            context(&application),
        )
        .unwrap();
        assert!(early.errors()["accommodationRequiredFromDate"].contains("before the release date"));

        let ok = AccommodationRequiredFromDate::build(
            body(&[("accommodationRequiredFromDate", "2024-04-11")], REQUIRED_FROM_FIELDS),
            context(&application),
        )
        .unwrap();
        assert!(ok.errors().is_empty());
        assert_eq!(
            ok.response().get("Accommodation required from date"),
            Some("11 April 2024")
        );
    }
}
