use crate::apply::questions::{task_list, DetailPrompt, YesNoPage, YesNoQuestion};
use crate::errors::Result;
use crate::form::dates::format_long;
use crate::form::fields::{date_errors, require_filled};
use crate::form::{Body, ErrorMap, FieldSpec, Page, PageContext, PageDefinition, Response, TaskDefinition};

pub const TASK: &str = "accommodation-referral-details";
pub const DTR_SUBMITTED: &str = "dtr-submitted";
pub const DTR_DETAILS: &str = "dtr-details";
pub const CRS_SUBMITTED: &str = "crs-submitted";
pub const OTHER_ACCOMMODATION_OPTIONS: &str = "other-accommodation-options";

const DTR_SUBMITTED_FIELDS: &[FieldSpec] = &[FieldSpec::yes_no("dtrSubmitted")];
const DTR_DETAILS_FIELDS: &[FieldSpec] = &[
    FieldSpec::text("reference"),
    FieldSpec::date("date"),
    FieldSpec::text("localAuthority"),
];
const CRS_SUBMITTED_FIELDS: &[FieldSpec] = &[FieldSpec::yes_no("crsSubmitted")];
const OTHER_OPTIONS_FIELDS: &[FieldSpec] = &[
    FieldSpec::yes_no("otherOptions"),
    FieldSpec::text("otherOptionsDetail"),
];

pub fn task() -> TaskDefinition {
    TaskDefinition::new(
        TASK,
        "Accommodation referral details",
        vec![
            PageDefinition::new(DTR_SUBMITTED, DTR_SUBMITTED_FIELDS, dtr_submitted),
            PageDefinition::new(DTR_DETAILS, DTR_DETAILS_FIELDS, DtrDetails::build),
            PageDefinition::new(CRS_SUBMITTED, CRS_SUBMITTED_FIELDS, crs_submitted),
            PageDefinition::new(
                OTHER_ACCOMMODATION_OPTIONS,
                OTHER_OPTIONS_FIELDS,
                other_accommodation_options,
            ),
        ],
    )
    .with_action_text("Add referral details")
}

static DTR_QUESTION: YesNoQuestion = YesNoQuestion {
    slug: DTR_SUBMITTED,
    title: |_| "Has the Duty to Refer (DTR) been submitted?".to_string(),
    field: "dtrSubmitted",
    message: "You must specify if the Duty to Refer (DTR) has been submitted",
    detail: None,
    blocked_on_no: None,
    next: |page| {
        if page.answered_yes() {
            Some(DTR_DETAILS)
        } else {
            Some(CRS_SUBMITTED)
        }
    },
    previous: task_list,
};

static CRS_QUESTION: YesNoQuestion = YesNoQuestion {
    slug: CRS_SUBMITTED,
    title: |_| {
        "Has a referral for Commissioned Rehabilitative Services (CRS) been submitted?".to_string()
    },
    field: "crsSubmitted",
    message: "You must specify if a referral for Commissioned Rehabilitative Services (CRS) has been submitted",
    detail: None,
    blocked_on_no: None,
    next: |_| Some(OTHER_ACCOMMODATION_OPTIONS),
    previous: |page| {
        let dtr = page.context().answer(TASK, DTR_SUBMITTED, "dtrSubmitted");
        if dtr == Some("yes") {
            Some(DTR_DETAILS)
        } else {
            Some(DTR_SUBMITTED)
        }
    },
};

static OTHER_OPTIONS_QUESTION: YesNoQuestion = YesNoQuestion {
    slug: OTHER_ACCOMMODATION_OPTIONS,
    title: |name| {
        format!(
            "Are there other accommodation options for {} after placement?",
            name
        )
    },
    field: "otherOptions",
    message: "You must specify if there are other accommodation options",
    detail: Some(DetailPrompt {
        field: "otherOptionsDetail",
        question: "Details of other accommodation options",
        message: "You must give details of the other accommodation options",
    }),
    blocked_on_no: None,
    next: task_list,
    previous: |_| Some(CRS_SUBMITTED),
};

fn dtr_submitted(body: Body, context: PageContext) -> Result<Box<dyn Page>> {
    Ok(YesNoPage::boxed(&DTR_QUESTION, body, context))
}

fn crs_submitted(body: Body, context: PageContext) -> Result<Box<dyn Page>> {
    Ok(YesNoPage::boxed(&CRS_QUESTION, body, context))
}

fn other_accommodation_options(body: Body, context: PageContext) -> Result<Box<dyn Page>> {
    Ok(YesNoPage::boxed(&OTHER_OPTIONS_QUESTION, body, context))
}

/// Reference, submission date and local authority of a Duty to Refer.
pub struct DtrDetails {
    body: Body,
    context: PageContext,
}

impl DtrDetails {
    pub fn build(body: Body, context: PageContext) -> Result<Box<dyn Page>> {
        Ok(Box::new(Self { body, context }))
    }
}

impl Page for DtrDetails {
    fn slug(&self) -> &'static str {
        DTR_DETAILS
    }

    fn title(&self) -> String {
        "Duty to Refer (DTR) details".into()
    }

    body_accessors!();

    fn errors(&self) -> ErrorMap {
        let mut errors = ErrorMap::new();
        require_filled(
            &self.body,
            &mut errors,
            "reference",
            "You must specify the DTR reference number",
        );
        let date = date_errors(&self.body, &mut errors, "date", "date DTR was submitted");
        if date.is_some_and(|date| date > self.context.today) {
            errors.insert(
                "date".into(),
                "The date DTR was submitted must not be in the future".into(),
            );
        }
        require_filled(
            &self.body,
            &mut errors,
            "localAuthority",
            "You must specify the local authority",
        );
        errors
    }

    fn response(&self) -> Response {
        let date = self
            .body
            .date("date")
            .valid()
            .map(format_long)
            .unwrap_or_default();
        Response::new()
            .with("DTR reference number", self.body.filled("reference").unwrap_or_default())
            .with("Date DTR submitted", date)
            .with("Local authority", self.body.filled("localAuthority").unwrap_or_default())
    }

    fn next(&self) -> Option<&'static str> {
        Some(CRS_SUBMITTED)
    }

    fn previous(&self) -> Option<&'static str> {
        Some(DTR_SUBMITTED)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::apply::test_support::{application, body, context};

    #[test]
    fn dtr_answer_decides_whether_details_are_asked() {
        let yes = dtr_submitted(
            body(&[("dtrSubmitted", "yes")], DTR_SUBMITTED_FIELDS),
            context(&application()),
        )
        .unwrap();
        assert_eq!(yes.next(), Some(DTR_DETAILS));

        let no = dtr_submitted(
            body(&[("dtrSubmitted", "no")], DTR_SUBMITTED_FIELDS),
            context(&application()),
        )
        .unwrap();
        assert_eq!(no.next(), Some(CRS_SUBMITTED));
    }

    #[test]
    fn crs_previous_follows_dtr_branch() {
        let mut answered = application();
        answered.data.set_page(
            TASK,
            DTR_SUBMITTED,
            body(&[("dtrSubmitted", "yes")], DTR_SUBMITTED_FIELDS),
        );
        let page = crs_submitted(Body::default(), context(&answered)).unwrap();
        assert_eq!(page.previous(), Some(DTR_DETAILS));

        let page = crs_submitted(Body::default(), context(&application())).unwrap();
        assert_eq!(page.previous(), Some(DTR_SUBMITTED));
    }

    #[test]
    fn dtr_details_validate_and_render() {
        let page = DtrDetails::build(
            body(
                &[
                    ("reference", "DTR-123"),
                    ("date-day", "20"),
                    ("date-month", "3"),
                    ("date-year", "2024"),
                    ("localAuthority", "Leeds City Council"),
                ],
                DTR_DETAILS_FIELDS,
            ),
            context(&application()),
        )
        .unwrap();
        assert!(page.errors().is_empty());
        assert_eq!(page.response().get("Date DTR submitted"), Some("20 March 2024"));

        let empty = DtrDetails::build(Body::default(), context(&application())).unwrap();
        let errors = empty.errors();
        assert_eq!(errors["date"], "You must specify the date DTR was submitted");
        assert!(errors.contains_key("reference"));
        assert!(errors.contains_key("localAuthority"));
    }
}
