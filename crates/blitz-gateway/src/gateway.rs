//! Reference resolution.

use blitz_core::Privilege;
use blitz_token::TokenCodec;
use std::sync::Arc;

use crate::error::GatewayError;
use crate::policy::PolicyTable;
use crate::resource::{Resource, ResourceReader};
use crate::store::ConfigStore;

/// Turns caller-held tokens into content.
///
/// Stateless per call; every collaborator is shared read-only.
#[derive(Clone)]
pub struct Gateway {
    codec: Arc<TokenCodec>,
    policy: Arc<PolicyTable>,
    store: Arc<dyn ConfigStore>,
    reader: ResourceReader,
}

impl Gateway {
    /// Create a gateway from its collaborators.
    pub fn new(
        codec: Arc<TokenCodec>,
        policy: PolicyTable,
        store: Arc<dyn ConfigStore>,
        reader: ResourceReader,
    ) -> Self {
        Self {
            codec,
            policy: Arc::new(policy),
            store,
            reader,
        }
    }

    /// Mint a token for a reference. `resolve` is its inverse.
    pub fn issue(&self, reference: &str) -> String {
        self.codec.encode(reference)
    }

    /// Resolve a token on behalf of a caller.
    ///
    /// Privilege is checked before the token is touched, so callers without
    /// admin rights learn nothing about the codec.
    pub async fn resolve(
        &self,
        token: &str,
        privilege: Privilege,
    ) -> Result<Resource, GatewayError> {
        if !privilege.is_admin() {
            tracing::debug!(%privilege, "Refusing to resolve reference");
            return Err(GatewayError::Forbidden);
        }

        let reference = self.codec.decode(token).map_err(|e| {
            tracing::debug!(error = %e, "Reference token failed to decode");
            GatewayError::Decode(e)
        })?;
        tracing::debug!(reference = %reference, "Decoded reference");

        match self.policy.lookup(&reference) {
            Some(key) => self.lookup_config(key).await,
            None => self.reader.read(&reference).await,
        }
    }

    async fn lookup_config(&self, key: &str) -> Result<Resource, GatewayError> {
        match self.store.get(key).await {
            Ok(Some(value)) => {
                tracing::info!(key, "Decoy reference served from configuration store");
                Ok(Resource::text(value))
            }
            Ok(None) => {
                tracing::warn!(key, "Decoy reference has no configuration value");
                Err(GatewayError::NotFound)
            }
            Err(e) => {
                tracing::error!(key, error = %e, "Configuration store lookup failed");
                Err(GatewayError::Internal(e.to_string()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resource::ContentKind;
    use crate::store::{StaticConfigStore, StoreError};
    use async_trait::async_trait;
    use blitz_token::{DecodeError, SecretKey};
    use std::collections::HashMap;
    use std::path::Path;

    struct FailingStore;

    #[async_trait]
    impl ConfigStore for FailingStore {
        async fn get(&self, _key: &str) -> Result<Option<String>, StoreError> {
            Err(StoreError::Config("unreachable".to_string()))
        }
    }

    fn gateway(base_dir: &Path, values: &[(&str, &str)]) -> Gateway {
        let values: HashMap<String, String> = values
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Gateway::new(
            Arc::new(TokenCodec::new(SecretKey::development())),
            PolicyTable::builtin(),
            Arc::new(StaticConfigStore::new(values)),
            ResourceReader::new(base_dir),
        )
    }

    #[tokio::test]
    async fn test_non_admin_is_forbidden_before_decode() {
        let dir = tempfile::tempdir().unwrap();
        let gateway = gateway(dir.path(), &[]);

        for privilege in [Privilege::Anonymous, Privilege::User] {
            assert!(matches!(
                gateway.resolve("!!!not-base64!!!", privilege).await,
                Err(GatewayError::Forbidden)
            ));
            let valid = gateway.issue("flag.txt");
            assert!(matches!(
                gateway.resolve(&valid, privilege).await,
                Err(GatewayError::Forbidden)
            ));
        }
    }

    #[tokio::test]
    async fn test_decode_errors_surface() {
        let dir = tempfile::tempdir().unwrap();
        let gateway = gateway(dir.path(), &[]);
        assert!(matches!(
            gateway.resolve("!!!not-base64!!!", Privilege::Admin).await,
            Err(GatewayError::Decode(DecodeError::InvalidEncoding))
        ));
        assert!(matches!(
            gateway.resolve("AAAA", Privilege::Admin).await,
            Err(GatewayError::Decode(DecodeError::InvalidCiphertextLength))
        ));
    }

    #[tokio::test]
    async fn test_decoy_wins_over_existing_file() {
        // Nest the base dir two levels down so "../../flag.txt" exists on disk.
        let root = tempfile::tempdir().unwrap();
        let base = root.path().join("a/b");
        std::fs::create_dir_all(&base).unwrap();
        std::fs::write(root.path().join("flag.txt"), "from disk").unwrap();

        let gateway = gateway(&base, &[("flag", "FLAG{from_store}")]);
        let token = gateway.issue("../../flag.txt");
        let resource = gateway.resolve(&token, Privilege::Admin).await.unwrap();

        assert_eq!(resource.kind, ContentKind::Text);
        assert_eq!(resource.as_text(), Some("FLAG{from_store}"));
    }

    #[tokio::test]
    async fn test_decoy_missing_key_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let gateway = gateway(dir.path(), &[]);
        let token = gateway.issue("/flag.txt");
        assert!(matches!(
            gateway.resolve(&token, Privilege::Admin).await,
            Err(GatewayError::NotFound)
        ));
    }

    #[tokio::test]
    async fn test_store_failure_is_internal() {
        let dir = tempfile::tempdir().unwrap();
        let gateway = Gateway::new(
            Arc::new(TokenCodec::new(SecretKey::development())),
            PolicyTable::builtin(),
            Arc::new(FailingStore),
            ResourceReader::new(dir.path()),
        );
        let token = gateway.issue("flag.txt");
        assert!(matches!(
            gateway.resolve(&token, Privilege::Admin).await,
            Err(GatewayError::Internal(_))
        ));
    }

    #[tokio::test]
    async fn test_content_dispatch() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("report.pdf"), b"%PDF-1.4 \xff\xfe").unwrap();
        std::fs::write(dir.path().join("notes.txt"), "plain notes").unwrap();
        std::fs::write(dir.path().join("image.bin"), [0x89, 0x50, 0xff, 0x00]).unwrap();
        let gateway = gateway(dir.path(), &[]);

        let pdf = gateway
            .resolve(&gateway.issue("report.pdf"), Privilege::Admin)
            .await
            .unwrap();
        assert_eq!(pdf.content_type(), "application/pdf");

        let text = gateway
            .resolve(&gateway.issue("notes.txt"), Privilege::Admin)
            .await
            .unwrap();
        assert_eq!(text.content_type(), "text/plain");
        assert_eq!(text.as_text(), Some("plain notes"));

        let binary = gateway
            .resolve(&gateway.issue("image.bin"), Privilege::Admin)
            .await
            .unwrap();
        assert_eq!(binary.content_type(), "application/octet-stream");
        assert_eq!(binary.body, vec![0x89, 0x50, 0xff, 0x00]);
    }

    #[tokio::test]
    async fn test_absolute_reference_bypasses_base_dir() {
        let base = tempfile::tempdir().unwrap();
        let elsewhere = tempfile::tempdir().unwrap();
        let outside = elsewhere.path().join("outside.txt");
        std::fs::write(&outside, "outside base").unwrap();

        let gateway = gateway(base.path(), &[]);
        let token = gateway.issue(&outside.to_string_lossy());
        let resource = gateway.resolve(&token, Privilege::Admin).await.unwrap();
        assert_eq!(resource.as_text(), Some("outside base"));
    }

    #[tokio::test]
    async fn test_missing_file_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let gateway = gateway(dir.path(), &[]);
        assert!(matches!(
            gateway
                .resolve(&gateway.issue("ghost.pdf"), Privilege::Admin)
                .await,
            Err(GatewayError::NotFound)
        ));
    }
}
