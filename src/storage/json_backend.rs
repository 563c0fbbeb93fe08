use std::fs;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::Application;
use crate::errors::{Result, WizardError};
use crate::utils::persistence::{ensure_dir, read_json, write_json_atomic};

use super::ApplicationStore;

const APPLICATIONS_DIR: &str = "applications";
const EXTENSION: &str = "json";

/// Stores each application as `<root>/applications/<id>.json`.
#[derive(Debug, Clone)]
pub struct JsonApplicationStore {
    applications_dir: PathBuf,
}

impl JsonApplicationStore {
    pub fn new(root: &Path) -> Result<Self> {
        let applications_dir = root.join(APPLICATIONS_DIR);
        ensure_dir(&applications_dir)?;
        Ok(Self { applications_dir })
    }

    pub fn application_path(&self, id: Uuid) -> PathBuf {
        self.applications_dir.join(format!("{}.{}", id, EXTENSION))
    }

    pub fn applications_dir(&self) -> &Path {
        &self.applications_dir
    }
}

#[async_trait]
impl ApplicationStore for JsonApplicationStore {
    async fn save(&self, application: &Application) -> Result<()> {
        let path = self.application_path(application.id);
        write_json_atomic::<_, WizardError>(&path, application)?;
        tracing::debug!(application = %application.id, path = %path.display(), "saved application");
        Ok(())
    }

    async fn load(&self, id: Uuid) -> Result<Application> {
        let path = self.application_path(id);
        if !path.exists() {
            return Err(WizardError::ApplicationNotFound(id));
        }
        read_json(&path)
    }

    async fn list(&self) -> Result<Vec<Application>> {
        let mut applications = Vec::new();
        for entry in fs::read_dir(&self.applications_dir)? {
            let path = entry?.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some(EXTENSION) {
                continue;
            }
            match read_json::<Application, WizardError>(&path) {
                Ok(application) => applications.push(application),
                Err(err) => {
                    tracing::warn!(path = %path.display(), error = %err, "skipping unreadable application file");
                }
            }
        }
        applications.sort_by_key(|application| application.created_at);
        Ok(applications)
    }
}
