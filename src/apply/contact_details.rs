use crate::errors::Result;
use crate::form::fields::require_filled;
use crate::form::{Body, ErrorMap, FieldSpec, Page, PageContext, PageDefinition, Response, TaskDefinition};

pub const TASK: &str = "contact-details";
pub const PROBATION_PRACTITIONER: &str = "probation-practitioner";

const FIELDS: &[FieldSpec] = &[
    FieldSpec::text("name"),
    FieldSpec::text("email"),
    FieldSpec::text("phone"),
];

pub fn task() -> TaskDefinition {
    TaskDefinition::new(
        TASK,
        "Probation practitioner contact details",
        vec![PageDefinition::new(PROBATION_PRACTITIONER, FIELDS, ProbationPractitioner::build)],
    )
    .with_action_text("Add contact details")
}

pub struct ProbationPractitioner {
    body: Body,
}

impl ProbationPractitioner {
    pub fn build(body: Body, _context: PageContext) -> Result<Box<dyn Page>> {
        Ok(Box::new(Self { body }))
    }
}

impl Page for ProbationPractitioner {
    fn slug(&self) -> &'static str {
        PROBATION_PRACTITIONER
    }

    fn title(&self) -> String {
        "Probation practitioner contact details".into()
    }

    body_accessors!();

    fn errors(&self) -> ErrorMap {
        let mut errors = ErrorMap::new();
        require_filled(&self.body, &mut errors, "name", "You must specify a name");
        let email = require_filled(&self.body, &mut errors, "email", "You must specify an email address");
        if email.is_some_and(|email| !looks_like_email(email)) {
            errors.insert("email".into(), "You must specify a valid email address".into());
        }
        require_filled(&self.body, &mut errors, "phone", "You must specify a phone number");
        errors
    }

    fn response(&self) -> Response {
        let value = |field| self.body.filled(field).unwrap_or_default();
        Response::new()
            .with("Name", value("name"))
            .with("Email address", value("email"))
            .with("Phone number", value("phone"))
    }

    fn next(&self) -> Option<&'static str> {
        None
    }

    fn previous(&self) -> Option<&'static str> {
        None
    }
}

fn looks_like_email(value: &str) -> bool {
    match value.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty() && domain.contains('.') && !value.contains(char::is_whitespace)
        }
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::apply::test_support::{application, body, context};

    #[test]
    fn all_contact_fields_are_required() {
        let page = ProbationPractitioner::build(body(&[], FIELDS), context(&application())).unwrap();
        let errors = page.errors();
        assert_eq!(
            errors.keys().map(String::as_str).collect::<Vec<_>>(),
            vec!["email", "name", "phone"]
        );
    }

    #[test]
    fn malformed_email_is_rejected() {
        let page = ProbationPractitioner::build(
            body(
                &[("name", "Sam Officer"), ("email", "sam at example"), ("phone", "0123")],
                FIELDS,
            ),
            context(&application()),
        )
        .unwrap();
        assert_eq!(page.errors()["email"], "You must specify a valid email address");
    }

    #[test]
    fn response_lists_contact_details() {
        let page = ProbationPractitioner::build(
            body(
                &[("name", "Sam Officer"), ("email", "sam@example.gov.uk"), ("phone", "0123 456")],
                FIELDS,
            ),
            context(&application()),
        )
        .unwrap();
        assert!(page.errors().is_empty());
        assert_eq!(page.response().get("Email address"), Some("sam@example.gov.uk"));
        assert_eq!(page.response().len(), 3);
    }
}
