//! Reference key configuration.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Where the symmetric key for reference tokens is loaded from.
///
/// Resolution order: `key_env`, then `key_file`, then inline `hex`.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct KeyConfig {
    /// Hex-encoded key inline in the config file (development only).
    #[serde(default)]
    pub hex: Option<String>,

    /// Environment variable containing the hex-encoded key.
    #[serde(default)]
    pub key_env: Option<String>,

    /// Path to a file containing the hex-encoded key.
    #[serde(default)]
    pub key_file: Option<PathBuf>,
}

impl KeyConfig {
    /// Resolve the hex-encoded key from environment, file, or inline value.
    ///
    /// Returns `Ok(None)` only when no source is configured. A `key_file` that
    /// cannot be read, or a `key_env` that is unset with nothing after it, is a
    /// `NotFound` error.
    pub fn resolve_key_hex(&self) -> Result<Option<String>, std::io::Error> {
        // Try environment variable first
        if let Some(env_var) = &self.key_env
            && let Ok(key) = std::env::var(env_var)
        {
            return Ok(Some(key.trim().to_string()));
        }

        if let Some(path) = &self.key_file {
            let key = std::fs::read_to_string(path).map_err(|e| {
                std::io::Error::new(
                    e.kind(),
                    format!("key file {}: {}", path.display(), e),
                )
            })?;
            return Ok(Some(key.trim().to_string()));
        }

        if let Some(hex) = &self.hex {
            return Ok(Some(hex.trim().to_string()));
        }

        match &self.key_env {
            Some(env_var) => Err(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("environment variable {} is not set", env_var),
            )),
            None => Ok(None),
        }
    }
}
