pub mod json_backend;
pub mod memory;

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::Application;
use crate::errors::Result;

/// Persistence boundary for applications, saved once per successful page
/// transition.
#[async_trait]
pub trait ApplicationStore: Send + Sync {
    async fn save(&self, application: &Application) -> Result<()>;

    /// Fails with `ApplicationNotFound` when nothing is stored under `id`.
    async fn load(&self, id: Uuid) -> Result<Application>;

    /// Every stored application, oldest first.
    async fn list(&self) -> Result<Vec<Application>>;
}

pub use json_backend::JsonApplicationStore;
pub use memory::MemoryApplicationStore;
