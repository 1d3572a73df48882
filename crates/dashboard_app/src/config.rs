use std::env;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use dashboard_engine::{ApiSettings, ExportOptions, DEFAULT_API_BASE};
use dashboard_logging::{dash_debug, dash_info};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const DEFAULT_CONFIG_FILE: &str = "recruit_dashboard.ron";
pub const API_BASE_ENV: &str = "RECRUIT_API_BASE";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("could not parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: ron::error::SpannedError,
    },
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub api_base: String,
    pub request_timeout_secs: u64,
    pub matches_timeout_secs: u64,
    pub upload_timeout_secs: u64,
    pub connect_timeout_secs: u64,
    pub jobs_limit: u32,
    /// Where exports and saved view preferences are written.
    pub output_dir: PathBuf,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            request_timeout_secs: 30,
            matches_timeout_secs: 15,
            upload_timeout_secs: 30,
            connect_timeout_secs: 10,
            jobs_limit: 50,
            output_dir: PathBuf::from("."),
        }
    }
}

impl AppConfig {
    /// Loads `path`, or `recruit_dashboard.ron` in the working directory when
    /// no path is given. Only the default file may be missing.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => Self::read(path)?,
            None => {
                let default_path = Path::new(DEFAULT_CONFIG_FILE);
                if default_path.exists() {
                    Self::read(default_path)?
                } else {
                    dash_debug!("No {DEFAULT_CONFIG_FILE}; using defaults");
                    Self::default()
                }
            }
        };
        config.apply_api_base_override(env::var(API_BASE_ENV).ok());
        config.validate()?;
        Ok(config)
    }

    fn read(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_ron(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        dash_info!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    pub fn from_ron(text: &str) -> Result<Self, ron::error::SpannedError> {
        ron::from_str(text)
    }

    pub fn apply_api_base_override(&mut self, value: Option<String>) {
        if let Some(value) = value.map(|v| v.trim().to_string()) {
            if !value.is_empty() {
                dash_info!("API base overridden by {API_BASE_ENV}");
                self.api_base = value;
            }
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.api_base.trim().is_empty() {
            return Err(ConfigError::Invalid("api_base is empty".to_string()));
        }
        let timeouts = [
            ("request_timeout_secs", self.request_timeout_secs),
            ("matches_timeout_secs", self.matches_timeout_secs),
            ("upload_timeout_secs", self.upload_timeout_secs),
            ("connect_timeout_secs", self.connect_timeout_secs),
        ];
        if let Some((name, _)) = timeouts.iter().find(|(_, secs)| *secs == 0) {
            return Err(ConfigError::Invalid(format!("{name} must be positive")));
        }
        if self.jobs_limit == 0 {
            return Err(ConfigError::Invalid("jobs_limit must be positive".to_string()));
        }
        Ok(())
    }

    pub fn api_settings(&self) -> ApiSettings {
        ApiSettings {
            base_url: self.api_base.clone(),
            connect_timeout: Duration::from_secs(self.connect_timeout_secs),
            request_timeout: Duration::from_secs(self.request_timeout_secs),
            matches_timeout: Duration::from_secs(self.matches_timeout_secs),
            upload_timeout: Duration::from_secs(self.upload_timeout_secs),
            jobs_limit: self.jobs_limit,
        }
    }

    pub fn export_options(&self, generated_at: Option<String>) -> ExportOptions {
        ExportOptions {
            output_dir: self.output_dir.clone(),
            generated_at,
            ..ExportOptions::default()
        }
    }

    /// Longest time a single backend call may take before its own deadline fires.
    pub fn longest_call(&self) -> Duration {
        let slowest = self
            .request_timeout_secs
            .max(self.matches_timeout_secs)
            .max(self.upload_timeout_secs);
        Duration::from_secs(slowest + self.connect_timeout_secs)
    }
}
