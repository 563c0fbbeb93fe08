pub mod application;
pub mod person;
pub mod reference;

pub use application::{AnswerStore, Application, ApplicationStatus, Document};
pub use person::{FullPerson, Person, RestrictedPerson, ANONYMISED_NAME};
pub use reference::{ProbationDeliveryUnit, ProbationRegion, UserContext};
