#![doc(test(attr(deny(warnings))))]

//! Referral Core drives multi-page task-list questionnaires for
//! accommodation referrals: page catalogue, traversal, validation,
//! transcripts and submission, with a terminal front end.

pub mod apply;
pub mod cli;
pub mod config;
pub mod domain;
pub mod errors;
pub mod form;
pub mod services;
pub mod storage;
pub mod utils;

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup info log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::info!("Referral Core tracing initialized.");
    });
}
