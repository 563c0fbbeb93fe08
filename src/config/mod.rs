//! User configuration for the interactive referral shell.

use std::env;
use std::path::{Path, PathBuf};

use dirs::home_dir;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::{ProbationRegion, UserContext};
use crate::utils::persistence::{ensure_dir, read_json, write_json_atomic};

const DEFAULT_DIR_NAME: &str = ".referral_core";
const HOME_ENV: &str = "REFERRAL_CORE_HOME";
const CONFIG_DIR: &str = "config";
const CONFIG_FILE: &str = "config.json";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Configuration is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Returns the application data directory, defaulting to `~/.referral_core`.
pub fn app_data_dir() -> PathBuf {
    if let Some(custom) = env::var_os(HOME_ENV) {
        return PathBuf::from(custom);
    }
    home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(DEFAULT_DIR_NAME)
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    pub username: String,
    pub probation_region_id: String,
    /// Where applications are stored. Defaults to the app data directory.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<PathBuf>,
    /// JSON reference data catalogue. The built-in catalogue is used when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference_data: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            username: "probation-practitioner".into(),
            probation_region_id: "london".into(),
            data_dir: None,
            reference_data: None,
        }
    }
}

impl Config {
    pub fn data_dir_or(&self, base: &Path) -> PathBuf {
        self.data_dir.clone().unwrap_or_else(|| base.to_path_buf())
    }

    /// Caller identity for reference-data lookups, given the resolved region.
    pub fn user_context(&self, region: ProbationRegion) -> UserContext {
        UserContext::new(self.username.clone(), region)
    }
}

pub struct ConfigManager {
    base: PathBuf,
    path: PathBuf,
}

impl ConfigManager {
    pub fn new() -> Result<Self, ConfigError> {
        Self::with_base_dir(app_data_dir())
    }

    pub fn with_base_dir(base: PathBuf) -> Result<Self, ConfigError> {
        ensure_dir(&base)?;
        let config_root = base.join(CONFIG_DIR);
        ensure_dir(&config_root)?;
        Ok(Self {
            path: config_root.join(CONFIG_FILE),
            base,
        })
    }

    /// Missing file yields the defaults.
    pub fn load(&self) -> Result<Config, ConfigError> {
        if self.path.exists() {
            read_json(&self.path)
        } else {
            Ok(Config::default())
        }
    }

    pub fn save(&self, config: &Config) -> Result<(), ConfigError> {
        write_json_atomic::<_, ConfigError>(&self.path, config)?;
        tracing::info!(path = %self.path.display(), "saved configuration");
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn base_dir(&self) -> &Path {
        &self.base
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn load_defaults_when_missing() {
        let temp = TempDir::new().unwrap();
        let manager = ConfigManager::with_base_dir(temp.path().to_path_buf()).unwrap();
        assert_eq!(manager.load().unwrap(), Config::default());
    }

    #[test]
    fn save_then_load_roundtrip() {
        let temp = TempDir::new().unwrap();
        let manager = ConfigManager::with_base_dir(temp.path().to_path_buf()).unwrap();
        let config = Config {
            username: "jsmith".into(),
            probation_region_id: "national".into(),
            data_dir: Some(temp.path().join("data")),
            reference_data: None,
        };
        manager.save(&config).unwrap();

        assert!(manager.path().ends_with("config/config.json"));
        assert_eq!(manager.load().unwrap(), config);
    }

    #[test]
    fn invalid_json_is_a_parse_error() {
        let temp = TempDir::new().unwrap();
        let manager = ConfigManager::with_base_dir(temp.path().to_path_buf()).unwrap();
        std::fs::write(manager.path(), "not json").unwrap();
        assert!(matches!(manager.load(), Err(ConfigError::Parse(_))));
    }
}
