//! Serve command for starting the gateway.
//!
//! `blitz serve` - Start the HTTP gateway.

use anyhow::Context;
use blitz_core::BlitzConfig;
use blitz_gateway::{AppState, GatewayServer};

/// Build the gateway from configuration and serve until Ctrl-C.
pub async fn run(config: &BlitzConfig) -> anyhow::Result<()> {
    if config.auth.users.is_empty() {
        tracing::warn!("No users configured, nobody can log in to view references");
    }

    let state = AppState::from_config(config)
        .await
        .context("Failed to initialize gateway")?;

    GatewayServer::new(config.server.clone(), state)
        .run()
        .await
        .context("Gateway server failed")?;

    Ok(())
}
