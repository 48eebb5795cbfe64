//! Filesystem-backed resources and content-type dispatch.

use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::error::GatewayError;

/// How a resource is served.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentKind {
    /// `.pdf` files, served inline.
    Pdf,
    /// Anything that decodes as UTF-8.
    Text,
    /// Everything else.
    Binary,
}

impl ContentKind {
    /// MIME type for this kind.
    pub fn content_type(self) -> &'static str {
        match self {
            ContentKind::Pdf => "application/pdf",
            ContentKind::Text => "text/plain",
            ContentKind::Binary => "application/octet-stream",
        }
    }
}

/// Resolved content ready to be sent to the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resource {
    pub body: Vec<u8>,
    pub kind: ContentKind,
}

impl Resource {
    /// A text resource, e.g. a configuration value.
    pub fn text(value: impl Into<String>) -> Self {
        Self {
            body: value.into().into_bytes(),
            kind: ContentKind::Text,
        }
    }

    /// Classify file contents by extension first, then by UTF-8 validity.
    pub fn from_file(path: &Path, body: Vec<u8>) -> Self {
        let is_pdf = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("pdf"));

        let kind = if is_pdf {
            ContentKind::Pdf
        } else if std::str::from_utf8(&body).is_ok() {
            ContentKind::Text
        } else {
            ContentKind::Binary
        };

        Self { body, kind }
    }

    /// MIME type of this resource.
    pub fn content_type(&self) -> &'static str {
        self.kind.content_type()
    }

    /// Body as text, for text resources.
    pub fn as_text(&self) -> Option<&str> {
        match self.kind {
            ContentKind::Text => std::str::from_utf8(&self.body).ok(),
            _ => None,
        }
    }
}

impl IntoResponse for Resource {
    fn into_response(self) -> Response {
        match self.kind {
            ContentKind::Pdf => (
                StatusCode::OK,
                [
                    (header::CONTENT_TYPE, "application/pdf"),
                    (header::CONTENT_DISPOSITION, "inline"),
                ],
                self.body,
            )
                .into_response(),
            ContentKind::Text => (
                StatusCode::OK,
                [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
                self.body,
            )
                .into_response(),
            ContentKind::Binary => (
                StatusCode::OK,
                [(header::CONTENT_TYPE, "application/octet-stream")],
                self.body,
            )
                .into_response(),
        }
    }
}

/// Reads referenced files from disk.
///
/// References not starting with `/` are resolved under `base_dir`. Absolute
/// references are used unchanged; there is no containment check.
#[derive(Debug, Clone)]
pub struct ResourceReader {
    base_dir: PathBuf,
}

impl ResourceReader {
    /// Create a reader rooted at `base_dir`.
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    /// Filesystem path a reference points at.
    pub fn locate(&self, reference: &str) -> PathBuf {
        if reference.starts_with('/') {
            PathBuf::from(reference)
        } else {
            self.base_dir.join(reference)
        }
    }

    /// Read and classify the file behind a reference.
    pub async fn read(&self, reference: &str) -> Result<Resource, GatewayError> {
        let path = self.locate(reference);

        match tokio::fs::read(&path).await {
            Ok(body) => {
                let resource = Resource::from_file(&path, body);
                tracing::debug!(
                    path = %path.display(),
                    content_type = resource.content_type(),
                    bytes = resource.body.len(),
                    "Read referenced file"
                );
                Ok(resource)
            }
            // A path the OS cannot even name (e.g. an embedded NUL) does not exist.
            Err(e) if matches!(e.kind(), ErrorKind::NotFound | ErrorKind::InvalidInput) => {
                Err(GatewayError::NotFound)
            }
            Err(e) => {
                tracing::error!(path = %path.display(), error = %e, "Failed to read referenced file");
                Err(GatewayError::Internal(e.to_string()))
            }
        }
    }
}
