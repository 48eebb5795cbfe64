//! Attachment uploads.
//!
//! Stores an attachment under the uploads directory and hands back a token for
//! it, so the real path never leaves the server.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use blitz_core::UploadsConfig;
use serde::Serialize;
use std::path::PathBuf;
use thiserror::Error;

use crate::gateway::Gateway;

/// Errors storing an attachment.
#[derive(Debug, Error)]
pub enum UploadError {
    /// No session.
    #[error("login required")]
    Unauthenticated,

    /// Nothing usable left after sanitizing the filename.
    #[error("invalid filename")]
    InvalidFilename,

    /// Extension not in the allow list.
    #[error("file type not allowed: {0}")]
    NotAllowed(String),

    /// Payload larger than the configured maximum.
    #[error("file too large: {size} bytes (maximum {max})")]
    TooLarge { size: usize, max: usize },

    /// Body could not be read within the configured maximum.
    #[error("file too large (maximum {max} bytes)")]
    OverLimit { max: usize },

    /// Empty payload.
    #[error("empty attachment")]
    Empty,

    /// IO error writing the file.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl IntoResponse for UploadError {
    fn into_response(self) -> Response {
        let status = match &self {
            UploadError::Unauthenticated => StatusCode::UNAUTHORIZED,
            UploadError::InvalidFilename | UploadError::NotAllowed(_) | UploadError::Empty => {
                StatusCode::BAD_REQUEST
            }
            UploadError::TooLarge { .. } | UploadError::OverLimit { .. } => {
                StatusCode::PAYLOAD_TOO_LARGE
            }
            UploadError::Io(e) => {
                tracing::error!(error = %e, "Failed to store attachment");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        let body = match &self {
            UploadError::Io(_) => "Server error".to_string(),
            other => other.to_string(),
        };

        (status, body).into_response()
    }
}

/// Result of storing an attachment.
#[derive(Debug, Clone, Serialize)]
pub struct AttachmentReceipt {
    /// Sanitized filename the attachment was stored under.
    pub original_name: String,
    /// Size in bytes.
    pub size: usize,
    /// Opaque token for the stored file.
    pub token: String,
    /// Gateway URL serving the attachment.
    pub view_url: String,
}

/// Writes attachments and mints tokens for them.
#[derive(Clone)]
pub struct AttachmentStore {
    gateway: Gateway,
    base_dir: PathBuf,
    max_size_bytes: usize,
    allowed_extensions: Vec<String>,
}

impl AttachmentStore {
    /// Create a store from the uploads configuration.
    ///
    /// Tokens are minted by `gateway`, so they resolve through it.
    pub fn new(gateway: Gateway, config: &UploadsConfig) -> Self {
        Self {
            gateway,
            base_dir: config.base_dir.clone(),
            max_size_bytes: config.max_size_bytes,
            allowed_extensions: config
                .allowed_extensions
                .iter()
                .map(|e| e.trim_start_matches('.').to_ascii_lowercase())
                .collect(),
        }
    }

    /// Largest accepted attachment.
    pub fn max_size_bytes(&self) -> usize {
        self.max_size_bytes
    }

    /// Validate, persist and tokenize an attachment.
    ///
    /// The token encodes the filename relative to the uploads directory, which
    /// is where the gateway resolves relative references. A second upload with
    /// the same name replaces the first.
    pub async fn store(&self, filename: &str, contents: &[u8]) -> Result<AttachmentReceipt, UploadError> {
        let name = sanitize_filename(filename).ok_or(UploadError::InvalidFilename)?;

        let extension = name
            .rsplit_once('.')
            .map(|(_, ext)| ext.to_ascii_lowercase())
            .unwrap_or_default();
        if !self.allowed_extensions.contains(&extension) {
            return Err(UploadError::NotAllowed(name));
        }

        if contents.is_empty() {
            return Err(UploadError::Empty);
        }
        if contents.len() > self.max_size_bytes {
            return Err(UploadError::TooLarge {
                size: contents.len(),
                max: self.max_size_bytes,
            });
        }

        tokio::fs::create_dir_all(&self.base_dir).await?;
        let path = self.base_dir.join(&name);
        tokio::fs::write(&path, contents).await?;

        let token = self.gateway.issue(&name);
        tracing::info!(
            filename = %name,
            size = contents.len(),
            path = %path.display(),
            "Stored attachment"
        );

        Ok(AttachmentReceipt {
            original_name: name,
            size: contents.len(),
            view_url: format!("/view?id={}", token),
            token,
        })
    }
}

/// Reduce a client-supplied filename to `[A-Za-z0-9._-]`.
///
/// Directory components are dropped, whitespace becomes `_`, other characters
/// are removed and leading dots are stripped.
pub fn sanitize_filename(filename: &str) -> Option<String> {
    let base = filename
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or_default();

    let cleaned: String = base
        .chars()
        .filter_map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                Some(c)
            } else if c.is_whitespace() {
                Some('_')
            } else {
                None
            }
        })
        .collect();

    let cleaned = cleaned.trim_start_matches('.').to_string();
    if cleaned.is_empty() { None } else { Some(cleaned) }
}
