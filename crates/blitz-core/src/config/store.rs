//! Configuration store backend selection.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Which backend serves `system_config` lookups.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    /// Values from the `values` map in this file.
    #[default]
    Static,
    /// A SQLite database with a `system_config` table.
    Sqlite,
}

/// Configuration for the key/value store behind decoy references.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ConfigStoreConfig {
    #[serde(default)]
    pub backend: StoreBackend,

    /// Static values, also used to seed missing keys in the sqlite backend.
    #[serde(default)]
    pub values: HashMap<String, String>,

    /// SQLite URL, e.g. "sqlite://data/blitz.db" or "sqlite::memory:".
    #[serde(default)]
    pub database_url: Option<String>,
}
