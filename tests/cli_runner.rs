mod common;

use std::collections::VecDeque;

use common::{london_user, person, service};
use referral_core::{
    cli::{FieldPrompt, PageInteraction, PromptResponse, TaskOutcome, TaskRunner},
    form::{ErrorMap, FieldValue},
};

/// Scripted answers, recording every page shown and every prompt asked.
#[derive(Default)]
struct MockInteraction {
    answers: VecDeque<PromptResponse>,
    pages: Vec<(String, ErrorMap)>,
    prompts: Vec<(String, Option<String>, Option<String>)>,
}

impl MockInteraction {
    fn new(answers: impl IntoIterator<Item = PromptResponse>) -> Self {
        Self {
            answers: answers.into_iter().collect(),
            ..Self::default()
        }
    }

    fn titles(&self) -> Vec<&str> {
        self.pages.iter().map(|(title, _)| title.as_str()).collect()
    }
}

impl PageInteraction for MockInteraction {
    fn show_page(&mut self, title: &str, errors: &ErrorMap) {
        self.pages.push((title.to_string(), errors.clone()));
    }

    fn prompt_field(&mut self, prompt: &FieldPrompt<'_>) -> PromptResponse {
        self.prompts.push((
            prompt.field.name.to_string(),
            prompt.current.clone(),
            prompt.error.map(str::to_string),
        ));
        self.answers.pop_front().unwrap_or(PromptResponse::Cancel)
    }
}

fn text(value: &str) -> PromptResponse {
    PromptResponse::Value(FieldValue::from(value))
}

#[tokio::test]
async fn runner_walks_the_task_and_repeats_rejected_pages() {
    let service = service();
    let user = london_user();
    let mut application = service.create(person()).await.unwrap();
    let mut interaction = MockInteraction::new([
        text("homelessFromCustody"),
        text("1/3/2024"),
        text("10/5/2024"),
        text("10/5/2024"),
    ]);

    let outcome = TaskRunner::new(&service, &user)
        .run(&mut application, "eligibility", &mut interaction)
        .await
        .unwrap();

    assert_eq!(outcome, TaskOutcome::Completed);
    assert_eq!(
        interaction.titles(),
        [
            "How is Jane Doe eligible for transitional accommodation?",
            "What is Jane Doe's release date?",
            "What is Jane Doe's release date?",
            "From what date is accommodation required?",
        ]
    );
    assert_eq!(
        interaction.pages[2].1["releaseDate"],
        "The release date must not be in the past"
    );
    // The repeated prompt offers what was typed, with its error.
    assert_eq!(
        interaction.prompts[2],
        (
            "releaseDate".to_string(),
            Some("1/3/2024".to_string()),
            Some("The release date must not be in the past".to_string()),
        )
    );
    assert_eq!(
        application.answer("eligibility", "accommodation-required-from-date", "accommodationRequiredFromDate"),
        Some("2024-05-10")
    );
}

#[tokio::test]
async fn keep_reuses_stored_answers() {
    let service = service();
    let user = london_user();
    let mut application = service.create(person()).await.unwrap();
    let runner = TaskRunner::new(&service, &user);

    let mut first = MockInteraction::new([
        text("Sam Officer"),
        text("sam@example.gov.uk"),
        text("0113 496 0000"),
    ]);
    runner
        .run(&mut application, "contact-details", &mut first)
        .await
        .unwrap();

    let mut second = MockInteraction::new([
        PromptResponse::Keep,
        text("s.officer@example.gov.uk"),
        PromptResponse::Keep,
    ]);
    let outcome = runner
        .run(&mut application, "contact-details", &mut second)
        .await
        .unwrap();

    assert_eq!(outcome, TaskOutcome::Completed);
    assert_eq!(second.prompts[0].1.as_deref(), Some("Sam Officer"));
    assert_eq!(
        application.answer("contact-details", "probation-practitioner", "name"),
        Some("Sam Officer")
    );
    assert_eq!(
        application.answer("contact-details", "probation-practitioner", "email"),
        Some("s.officer@example.gov.uk")
    );
}

#[tokio::test]
async fn cancelling_leaves_the_page_unanswered() {
    let service = service();
    let user = london_user();
    let mut application = service.create(person()).await.unwrap();
    let mut interaction = MockInteraction::new([text("yes")]);

    let outcome = TaskRunner::new(&service, &user)
        .run(&mut application, "accommodation-referral-details", &mut interaction)
        .await
        .unwrap();

    assert_eq!(outcome, TaskOutcome::Cancelled);
    assert_eq!(
        interaction.titles(),
        [
            "Has the Duty to Refer (DTR) been submitted?",
            "Duty to Refer (DTR) details",
        ]
    );
    assert!(application
        .data
        .page("accommodation-referral-details", "dtr-details")
        .is_none());
}

#[tokio::test]
async fn choice_prompts_offer_the_fetched_options() {
    let service = service();
    let user = london_user();
    let mut application = service.create(person()).await.unwrap();
    let mut interaction = MockInteraction::new([text("no"), text("hackney")]);

    let outcome = TaskRunner::new(&service, &user)
        .run(&mut application, "placement-location", &mut interaction)
        .await
        .unwrap();

    assert_eq!(outcome, TaskOutcome::Completed);
    assert_eq!(
        application.answer("placement-location", "placement-pdu", "pduId"),
        Some("hackney")
    );
}
