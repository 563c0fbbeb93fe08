use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::Application;
use crate::errors::{Result, WizardError};

use super::ApplicationStore;

#[derive(Debug, Default)]
pub struct MemoryApplicationStore {
    applications: RwLock<HashMap<Uuid, Application>>,
}

impl MemoryApplicationStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ApplicationStore for MemoryApplicationStore {
    async fn save(&self, application: &Application) -> Result<()> {
        self.applications
            .write()
            .await
            .insert(application.id, application.clone());
        Ok(())
    }

    async fn load(&self, id: Uuid) -> Result<Application> {
        self.applications
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or(WizardError::ApplicationNotFound(id))
    }

    async fn list(&self) -> Result<Vec<Application>> {
        let mut applications = self
            .applications
            .read()
            .await
            .values()
            .cloned()
            .collect::<Vec<_>>();
        applications.sort_by_key(|application| application.created_at);
        Ok(applications)
    }
}
