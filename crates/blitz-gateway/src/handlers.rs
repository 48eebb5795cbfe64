//! Request handlers for the gateway.

use axum::body::{Body, to_bytes};
use axum::extract::{RawQuery, State};
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::{Form, Json};
use blitz_core::Privilege;
use serde::Deserialize;
use serde_json::json;

use crate::error::GatewayError;
use crate::resource::Resource;
use crate::session::{Caller, cleared_session_cookie, session_cookie};
use crate::state::AppState;
use crate::upload::{AttachmentReceipt, UploadError};

/// `GET /view?id=<token>`
///
/// The query string is parsed by hand after the privilege check so that no
/// extractor can reject a request before authorization runs.
pub async fn view(
    State(state): State<AppState>,
    caller: Caller,
    RawQuery(query): RawQuery,
) -> Result<Resource, GatewayError> {
    let privilege = caller.privilege();
    if !privilege.is_admin() {
        return Err(GatewayError::Forbidden);
    }

    let token = query
        .as_deref()
        .and_then(|q| query_param(q, "id"))
        .filter(|t| !t.is_empty())
        .ok_or(GatewayError::MissingReference)?;

    state.gateway().resolve(&token, privilege).await
}

/// First value of a query parameter.
fn query_param(query: &str, name: &str) -> Option<String> {
    url::form_urlencoded::parse(query.as_bytes())
        .find(|(key, _)| key == name)
        .map(|(_, value)| value.into_owned())
}

/// Login form data
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

/// `POST /login`
pub async fn login(State(state): State<AppState>, Form(form): Form<LoginForm>) -> Response {
    let Some(user) = state
        .auth()
        .validate_credentials(&form.username, &form.password)
    else {
        tracing::info!(username = %form.username, "Rejected login");
        return (StatusCode::UNAUTHORIZED, "Invalid username or password").into_response();
    };

    let session = state
        .sessions()
        .create(&user.username, user.role.privilege());
    tracing::info!(username = %session.username, privilege = %session.privilege, "Opened session");

    (
        StatusCode::NO_CONTENT,
        [(header::SET_COOKIE, session_cookie(&session.id))],
    )
        .into_response()
}

/// `POST /logout`
pub async fn logout(State(state): State<AppState>, caller: Caller) -> Response {
    if let Some(id) = caller.session_id() {
        state.sessions().remove(id);
    }

    (
        StatusCode::NO_CONTENT,
        [(header::SET_COOKIE, cleared_session_cookie())],
    )
        .into_response()
}

/// `POST /attachments?filename=<name>` with the raw file as body.
///
/// Any logged-in caller may upload. The session is checked before the query
/// or the body is looked at.
pub async fn upload_attachment(
    State(state): State<AppState>,
    caller: Caller,
    RawQuery(query): RawQuery,
    body: Body,
) -> Result<Json<AttachmentReceipt>, UploadError> {
    if caller.privilege() == Privilege::Anonymous {
        return Err(UploadError::Unauthenticated);
    }

    let filename = query
        .as_deref()
        .and_then(|q| query_param(q, "filename"))
        .ok_or(UploadError::InvalidFilename)?;

    let max = state.attachments().max_size_bytes();
    let contents = to_bytes(body, max).await.map_err(|e| {
        tracing::debug!(error = %e, max, "Rejected attachment body");
        UploadError::OverLimit { max }
    })?;

    let receipt = state.attachments().store(&filename, &contents).await?;
    Ok(Json(receipt))
}

/// `GET /healthz`
pub async fn healthz() -> Json<serde_json::Value> {
    Json(json!({ "ok": true, "service": "blitz-gateway" }))
}
