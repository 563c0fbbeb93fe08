use crate::apply::questions::{task_list, YesNoPage, YesNoQuestion};
use crate::errors::Result;
use crate::form::dates::format_long;
use crate::form::fields::{choice_items, date_errors, require_yes_no, yes_no_label};
use crate::form::{
    Body, ChoiceItem, ErrorMap, FieldSpec, Page, PageContext, PageDefinition, Response,
    TaskDefinition, YES_NO,
};

pub const CONFIRM_ELIGIBILITY: &str = "confirm-eligibility";
pub const CONFIRM_CONSENT: &str = "confirm-consent";

const ELIGIBILITY_FIELDS: &[FieldSpec] = &[FieldSpec::yes_no("isEligible")];
const CONSENT_FIELDS: &[FieldSpec] = &[
    FieldSpec::yes_no("hasGivenConsent"),
    FieldSpec::date("consentDate"),
    FieldSpec::text("consentRefusalDetail"),
];

pub fn confirm_eligibility_task() -> TaskDefinition {
    TaskDefinition::new(
        CONFIRM_ELIGIBILITY,
        "Confirm eligibility",
        vec![PageDefinition::new(
            CONFIRM_ELIGIBILITY,
            ELIGIBILITY_FIELDS,
            confirm_eligibility,
        )],
    )
    .with_action_text("Confirm eligibility")
}

pub fn confirm_consent_task() -> TaskDefinition {
    TaskDefinition::new(
        CONFIRM_CONSENT,
        "Confirm consent",
        vec![PageDefinition::new(CONFIRM_CONSENT, CONSENT_FIELDS, ConfirmConsent::build)],
    )
    .with_action_text("Confirm consent")
}

fn eligibility_title(name: &str) -> String {
    format!("Is {} eligible for transitional accommodation?", name)
}

static IS_ELIGIBLE: YesNoQuestion = YesNoQuestion {
    slug: CONFIRM_ELIGIBILITY,
    title: eligibility_title,
    field: "isEligible",
    message: "You must confirm if the person is eligible",
    detail: None,
    blocked_on_no: Some("The person is not eligible for transitional accommodation"),
    next: task_list,
    previous: task_list,
};

fn confirm_eligibility(body: Body, context: PageContext) -> Result<Box<dyn Page>> {
    Ok(YesNoPage::boxed(&IS_ELIGIBLE, body, context))
}

/// Consent is either dated or refused with an explanation.
pub struct ConfirmConsent {
    body: Body,
    context: PageContext,
}

impl ConfirmConsent {
    fn build(body: Body, context: PageContext) -> Result<Box<dyn Page>> {
        Ok(Box::new(Self { body, context }))
    }

    fn consent(&self) -> Option<&str> {
        self.body.filled("hasGivenConsent")
    }
}

impl Page for ConfirmConsent {
    fn slug(&self) -> &'static str {
        CONFIRM_CONSENT
    }

    fn title(&self) -> String {
        format!(
            "Has {} given consent for a referral to be made?",
            self.context.person_name()
        )
    }

    body_accessors!();

    fn errors(&self) -> ErrorMap {
        let mut errors = ErrorMap::new();
        match require_yes_no(
            &self.body,
            &mut errors,
            "hasGivenConsent",
            "You must specify if consent has been given",
        ) {
            Some("yes") => {
                let date = date_errors(&self.body, &mut errors, "consentDate", "date consent was given");
                if date.is_some_and(|date| date > self.context.today) {
                    errors.insert(
                        "consentDate".into(),
                        "The date consent was given must not be in the future".into(),
                    );
                }
            }
            Some(_) => {
                if self.body.filled("consentRefusalDetail").is_none() {
                    errors.insert(
                        "consentRefusalDetail".into(),
                        "You must explain why consent has not been given".into(),
                    );
                }
            }
            None => {}
        }
        errors
    }

    fn response(&self) -> Response {
        let mut response = Response::new().with(self.title(), yes_no_label(self.consent()));
        match self.consent() {
            Some("yes") => {
                if let Some(date) = self.body.date("consentDate").valid() {
                    response.add("When was consent given?", format_long(date));
                }
            }
            Some("no") => {
                response.add(
                    "Why has consent not been given?",
                    self.body.filled("consentRefusalDetail").unwrap_or_default(),
                );
            }
            _ => {}
        }
        response
    }

    fn next(&self) -> Option<&'static str> {
        None
    }

    fn previous(&self) -> Option<&'static str> {
        None
    }

    fn items(&self) -> Vec<ChoiceItem> {
        let selected = self.consent().into_iter().collect::<Vec<_>>();
        choice_items(YES_NO, &selected)
    }

    fn blocking_reason(&self) -> Option<String> {
        (self.consent() == Some("no"))
            .then(|| "The person has not given consent for a referral".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::apply::test_support::{application, body, context, limited_application};

    fn consent_page(pairs: &[(&str, &str)]) -> Box<dyn Page> {
        ConfirmConsent::build(body(pairs, CONSENT_FIELDS), context(&application())).unwrap()
    }

    #[test]
    fn consent_with_past_date_is_valid() {
        let page = consent_page(&[
            ("hasGivenConsent", "yes"),
            ("consentDate-day", "2"),
            ("consentDate-month", "3"),
            ("consentDate-year", "2024"),
        ]);
        assert!(page.errors().is_empty());
        assert_eq!(page.response().get("When was consent given?"), Some("2 March 2024"));
        assert_eq!(
            page.response().get("Has Jane Doe given consent for a referral to be made?"),
            Some("Yes")
        );
    }

    #[test]
    fn consent_date_in_the_future_is_rejected() {
        let page = consent_page(&[("hasGivenConsent", "yes"), ("consentDate", "2024-05-01")]);
        assert_eq!(
            page.errors()["consentDate"],
            "The date consent was given must not be in the future"
        );
    }

    #[test]
    fn refusal_requires_explanation() {
        let page = consent_page(&[("hasGivenConsent", "no")]);
        assert!(page.errors().contains_key("consentRefusalDetail"));

        let page = consent_page(&[
            ("hasGivenConsent", "no"),
            ("consentRefusalDetail", "Wants to stay with family"),
        ]);
        assert!(page.errors().is_empty());
        assert_eq!(
            page.response().get("Why has consent not been given?"),
            Some("Wants to stay with family")
        );
        assert_eq!(
            page.blocking_reason().as_deref(),
            Some("The person has not given consent for a referral")
        );
    }

    #[test]
    fn only_negative_answers_block_the_referral() {
        let eligible = confirm_eligibility(
            body(&[("isEligible", "yes")], ELIGIBILITY_FIELDS),
            context(&application()),
        )
        .unwrap();
        assert_eq!(eligible.blocking_reason(), None);

        let ineligible = confirm_eligibility(
            body(&[("isEligible", "no")], ELIGIBILITY_FIELDS),
            context(&application()),
        )
        .unwrap();
        assert!(ineligible.errors().is_empty());
        assert_eq!(
            ineligible.blocking_reason().as_deref(),
            Some("The person is not eligible for transitional accommodation")
        );

        let consented = consent_page(&[
            ("hasGivenConsent", "yes"),
            ("consentDate", "2024-03-02"),
        ]);
        assert_eq!(consented.blocking_reason(), None);
    }

    #[test]
    fn eligibility_question_is_anonymised_for_limited_access() {
        let page = confirm_eligibility(
            body(&[("isEligible", "yes")], ELIGIBILITY_FIELDS),
            context(&limited_application()),
        )
        .unwrap();
        assert_eq!(page.title(), "Is the person eligible for transitional accommodation?");
        assert!(page.errors().is_empty());
        assert_eq!(page.next(), None);
    }
}
