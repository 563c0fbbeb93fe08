mod common;

use common::{completed_application, london_user, person, service};
use referral_core::form::{application_schema, FieldValue, PageRequest, RawBody};
use serde_json::json;

#[tokio::test]
async fn completed_answers_match_the_exported_schema() {
    let service = service();
    let application = completed_application(&service).await;
    let schema = application_schema(service.wizard().registry());
    let validator = jsonschema::validator_for(&schema).expect("schema compiles");

    let data = serde_json::to_value(&application.data).unwrap();
    let errors = validator
        .iter_errors(&data)
        .map(|error| error.to_string())
        .collect::<Vec<_>>();
    assert!(errors.is_empty(), "{errors:?}");
}

#[tokio::test]
async fn undeclared_pages_and_values_are_rejected() {
    let service = service();
    let schema = application_schema(service.wizard().registry());
    let validator = jsonschema::validator_for(&schema).expect("schema compiles");

    assert!(!validator.is_valid(&json!({ "eligibility": { "no-such-page": {} } })));
    assert!(!validator.is_valid(&json!({
        "confirm-eligibility": { "confirm-eligibility": { "isEligible": "maybe" } }
    })));
    assert!(!validator.is_valid(&json!({
        "eligibility": { "release-date": { "releaseDate": "10/05/2024" } }
    })));
    assert!(validator.is_valid(&json!({
        "disability-cultural-and-specific-needs": { "needs": { "needs": ["mobility", "other"] } }
    })));
}

#[tokio::test]
async fn repeated_checkbox_answers_are_stored_once() {
    let service = service();
    let user = london_user();
    let mut application = service.create(person()).await.unwrap();

    let mut resolved = service
        .show_page(
            &application,
            PageRequest::new("disability-cultural-and-specific-needs", "needs"),
            &user,
        )
        .await
        .unwrap();
    let mut submitted = RawBody::new();
    submitted.insert("needs".into(), FieldValue::from(vec!["mobility", "mobility"]));
    service
        .submit_page(&mut application, &mut resolved, submitted)
        .await
        .unwrap();

    let stored = application
        .data
        .page("disability-cultural-and-specific-needs", "needs")
        .unwrap();
    assert_eq!(stored.list("needs"), vec!["mobility"]);

    let schema = application_schema(service.wizard().registry());
    let validator = jsonschema::validator_for(&schema).expect("schema compiles");
    assert!(validator.is_valid(&serde_json::to_value(&application.data).unwrap()));
}
