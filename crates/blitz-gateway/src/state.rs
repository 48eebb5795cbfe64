//! Gateway application state.

use blitz_core::{AuthConfig, BlitzConfig};
use blitz_token::{SecretKey, TokenCodec, load_key};
use std::sync::Arc;

use crate::error::StartupError;
use crate::gateway::Gateway;
use crate::policy::PolicyTable;
use crate::resource::ResourceReader;
use crate::session::SessionStore;
use crate::store::{ConfigStore, create_store};
use crate::upload::AttachmentStore;

/// Shared application state for the HTTP handlers.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    gateway: Gateway,
    attachments: AttachmentStore,
    sessions: SessionStore,
    auth: AuthConfig,
}

impl AppState {
    /// Build the state from its parts.
    pub fn new(
        gateway: Gateway,
        attachments: AttachmentStore,
        sessions: SessionStore,
        auth: AuthConfig,
    ) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                gateway,
                attachments,
                sessions,
                auth,
            }),
        }
    }

    /// Load the key, open the configuration store and wire everything up.
    pub async fn from_config(config: &BlitzConfig) -> Result<Self, StartupError> {
        let key = load_key(&config.key)?;
        let store = create_store(&config.config_store).await?;
        Ok(Self::with_parts(config, key, store))
    }

    /// Wire up state with an explicit key and store.
    pub fn with_parts(config: &BlitzConfig, key: SecretKey, store: Arc<dyn ConfigStore>) -> Self {
        let codec = Arc::new(TokenCodec::new(key));
        let gateway = Gateway::new(
            codec,
            PolicyTable::builtin(),
            store,
            ResourceReader::new(config.uploads.base_dir.clone()),
        );
        let attachments = AttachmentStore::new(gateway.clone(), &config.uploads);

        tracing::info!(
            uploads = %config.uploads.base_dir.display(),
            users = config.auth.users.len(),
            "Gateway state initialized"
        );

        Self::new(gateway, attachments, SessionStore::new(), config.auth.clone())
    }

    /// The reference gateway.
    pub fn gateway(&self) -> &Gateway {
        &self.inner.gateway
    }

    /// The attachment store.
    pub fn attachments(&self) -> &AttachmentStore {
        &self.inner.attachments
    }

    /// Open sessions.
    pub fn sessions(&self) -> &SessionStore {
        &self.inner.sessions
    }

    /// Users allowed to log in.
    pub fn auth(&self) -> &AuthConfig {
        &self.inner.auth
    }
}
