pub mod application_service;
pub mod clock;
pub mod reference;

pub use application_service::ApplicationService;
pub use clock::{Clock, FixedClock, SystemClock};
pub use reference::{ReferenceData, StaticReferenceData};
