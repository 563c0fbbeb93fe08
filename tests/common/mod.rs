#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use referral_core::{
    apply,
    domain::{Application, Person, ProbationRegion, UserContext},
    errors::Result,
    form::{raw_body, PageRequest, RawBody, Transition},
    services::{ApplicationService, FixedClock, StaticReferenceData},
    storage::{ApplicationStore, MemoryApplicationStore},
};
use tempfile::TempDir;

/// Holds TempDir guards so temporary folders live for the duration of the test run.
static TEST_DIRS: Lazy<Mutex<Vec<TempDir>>> = Lazy::new(|| Mutex::new(Vec::new()));

pub type Answers = &'static [(&'static str, &'static str)];

/// One accepted submission per page for a London user, in task-list order.
pub const FULL_PATH: &[(&str, &str, Answers)] = &[
    ("confirm-eligibility", "confirm-eligibility", &[("isEligible", "yes")]),
    (
        "confirm-consent",
        "confirm-consent",
        &[
            ("hasGivenConsent", "yes"),
            ("consentDate-day", "20"),
            ("consentDate-month", "3"),
            ("consentDate-year", "2024"),
        ],
    ),
    ("eligibility", "eligibility-reason", &[("reason", "homelessFromCustody")]),
    (
        "eligibility",
        "release-date",
        &[
            ("releaseDate-day", "10"),
            ("releaseDate-month", "5"),
            ("releaseDate-year", "2024"),
        ],
    ),
    (
        "eligibility",
        "accommodation-required-from-date",
        &[
            ("accommodationRequiredFromDate-day", "10"),
            ("accommodationRequiredFromDate-month", "5"),
            ("accommodationRequiredFromDate-year", "2024"),
        ],
    ),
    (
        "contact-details",
        "probation-practitioner",
        &[
            ("name", "Sam Officer"),
            ("email", "sam.officer@example.gov.uk"),
            ("phone", "0113 496 0000"),
        ],
    ),
    ("disability-cultural-and-specific-needs", "needs", &[("needs", "none")]),
    ("placement-considerations", "history-of-sexual-offence", &[("historyOfSexualOffence", "no")]),
    (
        "placement-considerations",
        "concerning-sexual-behaviour",
        &[("concerningSexualBehaviour", "no")],
    ),
    ("placement-considerations", "history-of-arson-offence", &[("historyOfArsonOffence", "no")]),
    (
        "placement-considerations",
        "concerning-arson-behaviour",
        &[("concerningArsonBehaviour", "no")],
    ),
    ("accommodation-referral-details", "dtr-submitted", &[("dtrSubmitted", "yes")]),
    (
        "accommodation-referral-details",
        "dtr-details",
        &[
            ("reference", "DTR-0042"),
            ("date-day", "1"),
            ("date-month", "3"),
            ("date-year", "2024"),
            ("localAuthority", "Camden"),
        ],
    ),
    ("accommodation-referral-details", "crs-submitted", &[("crsSubmitted", "no")]),
    ("accommodation-referral-details", "other-accommodation-options", &[("otherOptions", "no")]),
    ("placement-location", "alternative-region", &[("alternativeRegion", "no")]),
    ("placement-location", "placement-pdu", &[("pduId", "camden")]),
    ("check-your-answers", "check-your-answers", &[("confirmation", "confirmed")]),
];

pub fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 4, 1).expect("valid fixture date")
}

pub fn temp_dir() -> PathBuf {
    let temp = TempDir::new().expect("create temp dir");
    let path = temp.path().to_path_buf();
    TEST_DIRS.lock().expect("lock temp dir registry").push(temp);
    path
}

pub fn service() -> ApplicationService {
    service_with_store(Arc::new(MemoryApplicationStore::new()))
}

pub fn service_with_store(store: Arc<dyn ApplicationStore>) -> ApplicationService {
    let wizard = apply::wizard(Arc::new(FixedClock::on(today()))).expect("catalogue registers");
    ApplicationService::new(wizard, store, Arc::new(StaticReferenceData::builtin()))
}

pub fn london_user() -> UserContext {
    UserContext::new("officer", ProbationRegion::new("london", "London"))
}

pub fn national_user() -> UserContext {
    UserContext::new("officer", ProbationRegion::new("national", "National"))
}

pub fn person() -> Person {
    Person::full("X320741", "Jane Doe")
}

pub fn raw(pairs: &[(&str, &str)]) -> RawBody {
    raw_body(pairs.iter().copied())
}

/// Resolves a page and submits `pairs` to it.
pub async fn answer(
    service: &ApplicationService,
    application: &mut Application,
    user: &UserContext,
    task: &str,
    page: &str,
    pairs: &[(&str, &str)],
) -> Result<Transition> {
    let mut resolved = service
        .show_page(application, PageRequest::new(task, page), user)
        .await?;
    service
        .submit_page(application, &mut resolved, raw(pairs))
        .await
}

/// Answers every page on `FULL_PATH` whose task passes `include`.
pub async fn answer_path(
    service: &ApplicationService,
    application: &mut Application,
    user: &UserContext,
    include: impl Fn(&str) -> bool,
) {
    for (task, page, pairs) in FULL_PATH {
        if include(task) {
            answer(service, application, user, task, page, pairs)
                .await
                .unwrap_or_else(|err| panic!("{task}/{page} rejected: {err}"));
        }
    }
}

pub async fn completed_application(service: &ApplicationService) -> Application {
    let mut application = service.create(person()).await.expect("create application");
    answer_path(service, &mut application, &london_user(), |_| true).await;
    application
}
