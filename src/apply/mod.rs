//! The accommodation referral: every section, task and page of the
//! application, registered explicitly.

use std::sync::Arc;

use crate::errors::Result;
use crate::form::{SectionDefinition, Wizard};
use crate::services::Clock;

/// Implements `Page::body` and `Page::set_body` for page structs holding a
/// `body: Body` field.
macro_rules! body_accessors {
    () => {
        fn body(&self) -> &$crate::form::Body {
            &self.body
        }

        fn set_body(&mut self, body: $crate::form::Body) {
            self.body = body;
        }
    };
}

pub mod before_you_start;
pub mod check_your_answers;
pub mod contact_details;
pub mod eligibility;
pub mod needs;
pub mod placement_considerations;
pub mod placement_location;
mod questions;
pub mod referral_details;

pub use placement_location::RegionQuestion;

/// All sections in task-list order.
pub fn sections() -> Vec<SectionDefinition> {
    vec![
        SectionDefinition::new(
            "Before you start",
            vec![
                before_you_start::confirm_eligibility_task(),
                before_you_start::confirm_consent_task(),
            ],
        ),
        SectionDefinition::new("Eligibility", vec![eligibility::task()]),
        SectionDefinition::new(
            "About the person",
            vec![contact_details::task(), needs::task()],
        ),
        SectionDefinition::new("Risk and behaviour", vec![placement_considerations::task()]),
        SectionDefinition::new(
            "Accommodation referral details",
            vec![referral_details::task()],
        ),
        SectionDefinition::new("Area and placement", vec![placement_location::task()]),
        SectionDefinition::new("Check your answers", vec![check_your_answers::task()]),
    ]
}

/// Wizard over the full referral.
pub fn wizard(clock: Arc<dyn Clock>) -> Result<Wizard> {
    Wizard::new(sections(), clock)
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::FixedClock;

    #[test]
    fn catalogue_registers_without_conflicts() {
        let wizard = wizard(Arc::new(FixedClock::on(test_support::today()))).unwrap();
        let slugs = wizard
            .registry()
            .tasks()
            .map(|task| task.slug)
            .collect::<Vec<_>>();
        assert_eq!(slugs.first(), Some(&"confirm-eligibility"));
        assert_eq!(slugs.last(), Some(&"check-your-answers"));
        assert_eq!(slugs.len(), 9);
    }
}
