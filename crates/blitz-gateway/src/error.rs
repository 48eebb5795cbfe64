//! Error types for the gateway crate.

use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use blitz_token::{DecodeError, KeyError};
use thiserror::Error;

use crate::store::StoreError;

/// Terminal outcome of a failed resolution.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// Caller is not an administrator.
    #[error("forbidden")]
    Forbidden,

    /// Request carried no token.
    #[error("missing reference")]
    MissingReference,

    /// Token did not decode. The message is returned to the caller as-is.
    #[error("{0}")]
    Decode(#[from] DecodeError),

    /// Neither the configuration store nor the filesystem has the reference.
    #[error("File not found")]
    NotFound,

    /// Store or filesystem failure; details are logged, not returned.
    #[error("internal error: {0}")]
    Internal(String),
}

impl GatewayError {
    /// HTTP status for this error.
    ///
    /// Decode failures are answered with 200 so clients read the message as
    /// ordinary content.
    pub fn status(&self) -> StatusCode {
        match self {
            GatewayError::Forbidden => StatusCode::FORBIDDEN,
            GatewayError::MissingReference => StatusCode::BAD_REQUEST,
            GatewayError::Decode(_) => StatusCode::OK,
            GatewayError::NotFound => StatusCode::NOT_FOUND,
            GatewayError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let body = match &self {
            GatewayError::Forbidden => "Forbidden".to_string(),
            GatewayError::MissingReference => "Bad request".to_string(),
            GatewayError::Decode(err) => err.message().to_string(),
            GatewayError::NotFound => "File not found".to_string(),
            GatewayError::Internal(_) => "Server error".to_string(),
        };

        (
            self.status(),
            [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
            body,
        )
            .into_response()
    }
}

/// Errors building the gateway at startup.
#[derive(Debug, Error)]
pub enum StartupError {
    /// Reference key could not be loaded.
    #[error("failed to load reference key: {0}")]
    Key(#[from] KeyError),

    /// Configuration store could not be opened.
    #[error("failed to open configuration store: {0}")]
    Store(#[from] StoreError),

    /// Listener could not be bound or the server failed.
    #[error("failed to start gateway: {0}")]
    Server(String),
}
