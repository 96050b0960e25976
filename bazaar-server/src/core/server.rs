//! HTTP server bootstrap

use std::net::SocketAddr;

use crate::core::{AppState, Config};
use crate::routes;

/// The HTTP server
pub struct Server {
    config: Config,
    state: AppState,
}

impl Server {
    /// Create a server over already-initialized state
    pub fn with_state(config: Config, state: AppState) -> Self {
        Self { config, state }
    }

    /// Serve until a shutdown signal arrives
    pub async fn run(self) -> anyhow::Result<()> {
        let app = routes::build_app(&self.state);

        let addr = SocketAddr::from(([0, 0, 0, 0], self.config.http_port));
        let listener = tokio::net::TcpListener::bind(addr).await?;
        tracing::info!(
            addr = %addr,
            environment = %self.config.environment,
            "HTTP server listening"
        );

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        return;
    }
    tracing::info!("Shutdown signal received");
}
