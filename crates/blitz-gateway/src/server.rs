//! Gateway server implementation.

use blitz_core::ServerConfig;
use tokio::net::TcpListener;

use crate::error::StartupError;
use crate::routes;
use crate::state::AppState;

/// The gateway HTTP server.
pub struct GatewayServer {
    config: ServerConfig,
    state: AppState,
}

impl GatewayServer {
    /// Create a new server with the given configuration and state.
    pub fn new(config: ServerConfig, state: AppState) -> Self {
        Self { config, state }
    }

    /// Bind and serve until `shutdown` resolves.
    pub async fn run_until<F>(self, shutdown: F) -> Result<(), StartupError>
    where
        F: std::future::Future<Output = ()> + Send + 'static,
    {
        let addr = self.config.bind_addr();
        tracing::info!(address = %addr, "Starting Blitz gateway");

        let app = routes::create_router(self.state);

        let listener = TcpListener::bind(&addr)
            .await
            .map_err(|e| StartupError::Server(e.to_string()))?;

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown)
            .await
            .map_err(|e| StartupError::Server(e.to_string()))?;

        tracing::info!("Blitz gateway stopped");
        Ok(())
    }

    /// Bind and serve until Ctrl-C.
    pub async fn run(self) -> Result<(), StartupError> {
        self.run_until(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!(error = %e, "Failed to listen for shutdown signal");
            }
        })
        .await
    }

    /// Get the configured listen port.
    pub fn listen_port(&self) -> u16 {
        self.config.port
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::StaticConfigStore;
    use blitz_core::BlitzConfig;
    use blitz_token::SecretKey;
    use std::sync::Arc;

    #[test]
    fn test_server_creation() {
        let config = BlitzConfig::default();
        let state = AppState::with_parts(
            &config,
            SecretKey::development(),
            Arc::new(StaticConfigStore::default()),
        );
        let server = GatewayServer::new(config.server.clone(), state);
        assert_eq!(server.listen_port(), 8080);
    }
}
