//! Configuration types for the Blitz reference gateway.
//!
//! All settings live in one YAML file (`blitz.yaml` by default):
//!
//! ```yaml
//! server:
//!   host: 0.0.0.0
//!   port: 8080
//! key:
//!   key_env: BLITZ_KEY
//! auth:
//!   users:
//!     - username: admin
//!       password_env: BLITZ_ADMIN_PASSWORD
//!       role: admin
//! uploads:
//!   base_dir: uploads
//! config_store:
//!   backend: sqlite
//!   database_url: sqlite://data/blitz.db
//! logging:
//!   level: info
//! ```

pub mod key;
pub mod server;
pub mod store;
pub mod uploads;

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub use key::KeyConfig;
pub use server::{AuthConfig, AuthUser, ServerConfig, UserRole};
pub use store::{ConfigStoreConfig, StoreBackend};
pub use uploads::UploadsConfig;

/// Complete Blitz configuration loaded from a YAML file.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct BlitzConfig {
    /// HTTP listener settings.
    #[serde(default)]
    pub server: ServerConfig,

    /// Where the reference key comes from.
    #[serde(default)]
    pub key: KeyConfig,

    /// Users allowed to open a session.
    #[serde(default)]
    pub auth: AuthConfig,

    /// Attachment storage and the base directory for relative references.
    #[serde(default)]
    pub uploads: UploadsConfig,

    /// Backend for decoy-key lookups.
    #[serde(default)]
    pub config_store: ConfigStoreConfig,

    /// Log filtering.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Default filter directive when `RUST_LOG` is not set (e.g. "info", "blitz_gateway=debug").
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Error type for configuration loading.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl BlitzConfig {
    /// Load configuration from a YAML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path.as_ref())?;
        Self::from_yaml(&content)
    }

    /// Parse configuration from YAML content.
    pub fn from_yaml(content: &str) -> Result<Self, ConfigError> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(content).map_err(ConfigError::from)
    }

    /// Load configuration and resolve file references relative to the config file.
    ///
    /// Only `key.key_file` is rebased; `uploads.base_dir` stays relative to the
    /// working directory of the process, which is where references are resolved.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let mut config = Self::from_file(path)?;

        let base_dir = path
            .parent()
            .map(|p| p.to_path_buf())
            .unwrap_or_else(|| PathBuf::from("."));

        if let Some(key_file) = &config.key.key_file
            && key_file.is_relative()
        {
            config.key.key_file = Some(base_dir.join(key_file));
        }

        config.validate()?;
        Ok(config)
    }

    /// Check cross-field constraints serde cannot express.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.config_store.backend == StoreBackend::Sqlite
            && self.config_store.database_url.is_none()
        {
            return Err(ConfigError::Config(
                "config_store.database_url is required for the sqlite backend".to_string(),
            ));
        }

        for user in &self.auth.users {
            if user.username.trim().is_empty() {
                return Err(ConfigError::Config("auth user with empty username".to_string()));
            }
        }

        if self.uploads.max_size_bytes == 0 {
            return Err(ConfigError::Config(
                "uploads.max_size_bytes must be greater than zero".to_string(),
            ));
        }

        Ok(())
    }
}
