//! Configuration store backends.
//!
//! Decoy references resolve to a value in a `system_config` key/value store
//! instead of a file. The gateway only ever reads from it.

use async_trait::async_trait;
use blitz_core::{ConfigStoreConfig, StoreBackend};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::collections::HashMap;
use std::str::FromStr;
use std::sync::Arc;
use thiserror::Error;

/// Errors from a configuration store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Database failure.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Backend misconfigured.
    #[error("store configuration error: {0}")]
    Config(String),
}

/// Trait for configuration store backends.
#[async_trait]
pub trait ConfigStore: Send + Sync {
    /// Read a single value by key.
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError>;
}

/// Create a store based on configuration.
pub async fn create_store(config: &ConfigStoreConfig) -> Result<Arc<dyn ConfigStore>, StoreError> {
    match config.backend {
        StoreBackend::Static => {
            tracing::info!(keys = config.values.len(), "Using static configuration store");
            Ok(Arc::new(StaticConfigStore::new(config.values.clone())))
        }
        StoreBackend::Sqlite => {
            let url = config.database_url.as_deref().ok_or_else(|| {
                StoreError::Config("database_url is required for the sqlite backend".to_string())
            })?;
            let store = SqliteConfigStore::connect(url).await?;
            store.ensure_schema().await?;
            for (key, value) in &config.values {
                store.seed(key, value).await?;
            }
            tracing::info!(url = %url, "Using sqlite configuration store");
            Ok(Arc::new(store))
        }
    }
}

/// Values held in memory, fixed at construction.
#[derive(Debug, Clone, Default)]
pub struct StaticConfigStore {
    values: HashMap<String, String>,
}

impl StaticConfigStore {
    /// Create a store over the given values.
    pub fn new(values: HashMap<String, String>) -> Self {
        Self { values }
    }
}

#[async_trait]
impl ConfigStore for StaticConfigStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.values.get(key).cloned())
    }
}

/// `system_config` table in a SQLite database.
#[derive(Debug, Clone)]
pub struct SqliteConfigStore {
    pool: SqlitePool,
}

impl SqliteConfigStore {
    /// Connect to a SQLite database, creating the file if needed.
    pub async fn connect(url: &str) -> Result<Self, StoreError> {
        let options = SqliteConnectOptions::from_str(url)?.create_if_missing(true);
        let pool = if url.contains(":memory:") {
            // Every connection to an in-memory database gets its own database,
            // so pin a single connection that never expires.
            SqlitePoolOptions::new()
                .max_connections(1)
                .min_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
                .connect_with(options)
                .await?
        } else {
            SqlitePoolOptions::new()
                .max_connections(5)
                .connect_with(options)
                .await?
        };
        Ok(Self { pool })
    }

    /// Create the `system_config` table if it does not exist.
    pub async fn ensure_schema(&self) -> Result<(), StoreError> {
        sqlx::query(
            "CREATE TABLE IF NOT EXISTS system_config (
                config_key TEXT PRIMARY KEY NOT NULL,
                config_value TEXT NOT NULL
            )",
        )
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    /// Insert a value unless the key already exists.
    pub async fn seed(&self, key: &str, value: &str) -> Result<(), StoreError> {
        sqlx::query("INSERT OR IGNORE INTO system_config (config_key, config_value) VALUES (?, ?)")
            .bind(key)
            .bind(value)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}

#[async_trait]
impl ConfigStore for SqliteConfigStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let value = sqlx::query_scalar::<_, String>(
            "SELECT config_value FROM system_config WHERE config_key = ?",
        )
        .bind(key)
        .fetch_optional(&self.pool)
        .await?;
        Ok(value)
    }
}
