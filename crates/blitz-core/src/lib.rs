//! # blitz-core
//!
//! Configuration types and caller identity shared by the Blitz crates.
//!
//! Configuration is loaded from a single YAML file (`blitz.yaml`) into
//! [`BlitzConfig`]. Every section has defaults, so an empty file is a valid
//! development configuration.

// Configuration types shared across all Blitz crates
pub mod config;
pub mod privilege;

pub use config::{
    AuthConfig, AuthUser, BlitzConfig, ConfigError, ConfigStoreConfig, KeyConfig, LoggingConfig,
    ServerConfig, StoreBackend, UploadsConfig, UserRole,
};
pub use privilege::Privilege;
