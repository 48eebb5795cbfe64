//! Route definitions for the gateway.

use axum::Router;
use axum::routing::{get, post};
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::state::AppState;

/// Create the gateway router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/view", get(handlers::view))
        .route("/login", post(handlers::login))
        .route("/logout", post(handlers::logout))
        .route("/attachments", post(handlers::upload_attachment))
        .route("/healthz", get(handlers::healthz))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
