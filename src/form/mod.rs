//! Page abstraction, registry, and wizard traversal for multi-page task lists.

pub mod body;
pub mod dates;
pub mod fields;
pub mod page;
pub mod registry;
pub mod response;
pub mod schema;
pub mod traversal;

pub use body::{raw_body, Body, FieldValue, RawBody};
pub use dates::DateInput;
pub use fields::{ChoiceItem, ChoiceOption, ErrorMap, FieldKind, FieldSpec, YES_NO};
pub use page::{ApplicationPatch, Page, PageConstructor, PageContext, PageRef};
pub use registry::{
    PageDefinition, PageInit, PageInitializer, PageRegistry, SectionDefinition, TaskDefinition,
    TaskGate,
};
pub use response::{Response, ResponseEntry};
pub use schema::application_schema;
pub use traversal::{
    Flash, PageRequest, ResolvedPage, SectionStatus, TaskListEntry, TaskStatus, Transition,
    TranscriptSection, Wizard,
};
