//! Risk questions whose order depends on earlier answers in the task.
//!
//! ```text
//! history-of-sexual-offence --yes--> history-of-arson-offence --yes--> (end)
//!        |no                                ^        |no
//!        v                                  |        v
//! concerning-sexual-behaviour --------------+   concerning-arson-behaviour --> (end)
//! ```

use crate::apply::questions::{task_list, DetailPrompt, YesNoPage, YesNoQuestion};
use crate::errors::Result;
use crate::form::{Body, FieldSpec, Page, PageContext, PageDefinition, TaskDefinition};

pub const TASK: &str = "placement-considerations";
pub const HISTORY_OF_SEXUAL_OFFENCE: &str = "history-of-sexual-offence";
pub const CONCERNING_SEXUAL_BEHAVIOUR: &str = "concerning-sexual-behaviour";
pub const HISTORY_OF_ARSON_OFFENCE: &str = "history-of-arson-offence";
pub const CONCERNING_ARSON_BEHAVIOUR: &str = "concerning-arson-behaviour";

const SEXUAL_OFFENCE_FIELDS: &[FieldSpec] = &[FieldSpec::yes_no("historyOfSexualOffence")];
const SEXUAL_BEHAVIOUR_FIELDS: &[FieldSpec] = &[
    FieldSpec::yes_no("concerningSexualBehaviour"),
    FieldSpec::text("concerningSexualBehaviourDetail"),
];
const ARSON_OFFENCE_FIELDS: &[FieldSpec] = &[FieldSpec::yes_no("historyOfArsonOffence")];
const ARSON_BEHAVIOUR_FIELDS: &[FieldSpec] = &[
    FieldSpec::yes_no("concerningArsonBehaviour"),
    FieldSpec::text("concerningArsonBehaviourDetail"),
];

pub fn task() -> TaskDefinition {
    TaskDefinition::new(
        TASK,
        "Placement considerations",
        vec![
            PageDefinition::new(
                HISTORY_OF_SEXUAL_OFFENCE,
                SEXUAL_OFFENCE_FIELDS,
                history_of_sexual_offence,
            ),
            PageDefinition::new(
                CONCERNING_SEXUAL_BEHAVIOUR,
                SEXUAL_BEHAVIOUR_FIELDS,
                concerning_sexual_behaviour,
            ),
            PageDefinition::new(
                HISTORY_OF_ARSON_OFFENCE,
                ARSON_OFFENCE_FIELDS,
                history_of_arson_offence,
            ),
            PageDefinition::new(
                CONCERNING_ARSON_BEHAVIOUR,
                ARSON_BEHAVIOUR_FIELDS,
                concerning_arson_behaviour,
            ),
        ],
    )
    .with_action_text("Add placement considerations")
}

static SEXUAL_OFFENCE: YesNoQuestion = YesNoQuestion {
    slug: HISTORY_OF_SEXUAL_OFFENCE,
    title: |name| format!("Does {} have a history of sexual offences?", name),
    field: "historyOfSexualOffence",
    message: "You must specify if the person has a history of sexual offences",
    detail: None,
    blocked_on_no: None,
    next: |page| {
        if page.answered_yes() {
            Some(HISTORY_OF_ARSON_OFFENCE)
        } else {
            Some(CONCERNING_SEXUAL_BEHAVIOUR)
        }
    },
    previous: task_list,
};

static SEXUAL_BEHAVIOUR: YesNoQuestion = YesNoQuestion {
    slug: CONCERNING_SEXUAL_BEHAVIOUR,
    title: |name| format!("Has {} shown concerning sexual behaviour?", name),
    field: "concerningSexualBehaviour",
    message: "You must specify if the person has shown concerning sexual behaviour",
    detail: Some(DetailPrompt {
        field: "concerningSexualBehaviourDetail",
        question: "Details of concerning sexual behaviour",
        message: "You must give details of the concerning sexual behaviour",
    }),
    blocked_on_no: None,
    next: |_| Some(HISTORY_OF_ARSON_OFFENCE),
    previous: |_| Some(HISTORY_OF_SEXUAL_OFFENCE),
};

static ARSON_OFFENCE: YesNoQuestion = YesNoQuestion {
    slug: HISTORY_OF_ARSON_OFFENCE,
    title: |name| format!("Does {} have a history of arson offences?", name),
    field: "historyOfArsonOffence",
    message: "You must specify if the person has a history of arson offences",
    detail: None,
    blocked_on_no: None,
    next: |page| {
        if page.answered_yes() {
            None
        } else {
            Some(CONCERNING_ARSON_BEHAVIOUR)
        }
    },
    previous: |page| {
        let sexual_offence = page.context().answer(
            TASK,
            HISTORY_OF_SEXUAL_OFFENCE,
            "historyOfSexualOffence",
        );
        if sexual_offence == Some("yes") {
            Some(HISTORY_OF_SEXUAL_OFFENCE)
        } else {
            Some(CONCERNING_SEXUAL_BEHAVIOUR)
        }
    },
};

static ARSON_BEHAVIOUR: YesNoQuestion = YesNoQuestion {
    slug: CONCERNING_ARSON_BEHAVIOUR,
    title: |name| format!("Has {} shown concerning arson behaviour?", name),
    field: "concerningArsonBehaviour",
    message: "You must specify if the person has shown concerning arson behaviour",
    detail: Some(DetailPrompt {
        field: "concerningArsonBehaviourDetail",
        question: "Details of concerning arson behaviour",
        message: "You must give details of the concerning arson behaviour",
    }),
    blocked_on_no: None,
    next: task_list,
    previous: |_| Some(HISTORY_OF_ARSON_OFFENCE),
};

fn history_of_sexual_offence(body: Body, context: PageContext) -> Result<Box<dyn Page>> {
    Ok(YesNoPage::boxed(&SEXUAL_OFFENCE, body, context))
}

fn concerning_sexual_behaviour(body: Body, context: PageContext) -> Result<Box<dyn Page>> {
    Ok(YesNoPage::boxed(&SEXUAL_BEHAVIOUR, body, context))
}

fn history_of_arson_offence(body: Body, context: PageContext) -> Result<Box<dyn Page>> {
    Ok(YesNoPage::boxed(&ARSON_OFFENCE, body, context))
}

fn concerning_arson_behaviour(body: Body, context: PageContext) -> Result<Box<dyn Page>> {
    Ok(YesNoPage::boxed(&ARSON_BEHAVIOUR, body, context))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::apply::test_support::{application, body, context, limited_application};
    use crate::domain::Application;

    fn with_sexual_offence_answer(answer: &str) -> Application {
        let mut application = application();
        application.data.set_page(
            TASK,
            HISTORY_OF_SEXUAL_OFFENCE,
            body(&[("historyOfSexualOffence", answer)], SEXUAL_OFFENCE_FIELDS),
        );
        application
    }

    #[test]
    fn sexual_offence_branches_on_answer() {
        let yes = history_of_sexual_offence(
            body(&[("historyOfSexualOffence", "yes")], SEXUAL_OFFENCE_FIELDS),
            context(&application()),
        )
        .unwrap();
        assert_eq!(yes.next(), Some(HISTORY_OF_ARSON_OFFENCE));

        let no = history_of_sexual_offence(
            body(&[("historyOfSexualOffence", "no")], SEXUAL_OFFENCE_FIELDS),
            context(&application()),
        )
        .unwrap();
        assert_eq!(no.next(), Some(CONCERNING_SEXUAL_BEHAVIOUR));
    }

    #[test]
    fn arson_previous_depends_on_sexual_offence_answer() {
        let after_yes = history_of_arson_offence(
            Body::default(),
            context(&with_sexual_offence_answer("yes")),
        )
        .unwrap();
        assert_eq!(after_yes.previous(), Some(HISTORY_OF_SEXUAL_OFFENCE));

        let after_no = history_of_arson_offence(
            Body::default(),
            context(&with_sexual_offence_answer("no")),
        )
        .unwrap();
        assert_eq!(after_no.previous(), Some(CONCERNING_SEXUAL_BEHAVIOUR));
    }

    #[test]
    fn arson_offence_yes_ends_task() {
        let page = history_of_arson_offence(
            body(&[("historyOfArsonOffence", "yes")], ARSON_OFFENCE_FIELDS),
            context(&application()),
        )
        .unwrap();
        assert_eq!(page.next(), None);

        let page = history_of_arson_offence(
            body(&[("historyOfArsonOffence", "no")], ARSON_OFFENCE_FIELDS),
            context(&application()),
        )
        .unwrap();
        assert_eq!(page.next(), Some(CONCERNING_ARSON_BEHAVIOUR));
    }

    #[test]
    fn behaviour_detail_appears_only_for_yes() {
        let yes = concerning_arson_behaviour(
            body(
                &[
                    ("concerningArsonBehaviour", "yes"),
                    ("concerningArsonBehaviourDetail", "Set fire to a bin"),
                ],
                ARSON_BEHAVIOUR_FIELDS,
            ),
            context(&application()),
        )
        .unwrap();
        assert!(yes.errors().is_empty());
        assert_eq!(
            yes.response().get("Details of concerning arson behaviour"),
            Some("Set fire to a bin")
        );

        let no = concerning_arson_behaviour(
            body(
                &[
                    ("concerningArsonBehaviour", "no"),
                    ("concerningArsonBehaviourDetail", "Stale detail"),
                ],
                ARSON_BEHAVIOUR_FIELDS,
            ),
            context(&application()),
        )
        .unwrap();
        assert!(no.errors().is_empty());
        assert_eq!(no.response().len(), 1);
    }

    #[test]
    fn question_text_uses_name_only_for_full_access() {
        let full = history_of_sexual_offence(Body::default(), context(&application())).unwrap();
        assert_eq!(full.title(), "Does Jane Doe have a history of sexual offences?");

        let limited =
            history_of_sexual_offence(Body::default(), context(&limited_application())).unwrap();
        assert!(!limited.title().contains("Jane Doe"));
    }
}
