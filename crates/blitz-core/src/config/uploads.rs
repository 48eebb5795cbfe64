//! Attachment upload configuration.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Configuration for stored attachments.
///
/// `base_dir` doubles as the root for references that do not start with `/`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadsConfig {
    /// Directory attachments are written to and relative references resolve against.
    #[serde(default = "default_base_dir")]
    pub base_dir: PathBuf,

    /// Largest accepted attachment, in bytes.
    #[serde(default = "default_max_size_bytes")]
    pub max_size_bytes: usize,

    /// File extensions (without the dot, lowercase) accepted for attachments.
    #[serde(default = "default_allowed_extensions")]
    pub allowed_extensions: Vec<String>,
}

impl Default for UploadsConfig {
    fn default() -> Self {
        Self {
            base_dir: default_base_dir(),
            max_size_bytes: default_max_size_bytes(),
            allowed_extensions: default_allowed_extensions(),
        }
    }
}

fn default_base_dir() -> PathBuf {
    PathBuf::from("uploads")
}

fn default_max_size_bytes() -> usize {
    16 * 1024 * 1024
}

fn default_allowed_extensions() -> Vec<String> {
    vec!["pdf".to_string()]
}
