//! HTTP server for the mdpress editor.
//!
//! Serves the single-page editor and three endpoints:
//! - `POST /preview`: form-encoded Markdown in, HTML fragment out
//! - `POST /export?type=docx|pdf`: form-encoded Markdown in, document out
//! - `GET /api/config`: capabilities of the running pipeline
//!
//! # Quick Start
//!
//! ```ignore
//! use mdpress_config::Config;
//! use mdpress_pipeline::Pipeline;
//! use mdpress_server::{run_server, server_config_from_config};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::load(None, None)?;
//!     let pipeline = Pipeline::from_config(&config);
//!     run_server(server_config_from_config(&config, false), pipeline).await
//! }
//! ```

mod app;
mod error;
mod handlers;
mod middleware;
mod state;

use std::net::SocketAddr;
use std::str::FromStr;
use std::sync::Arc;

use mdpress_pipeline::Pipeline;
use state::AppState;

pub use error::ServerError;

/// Server configuration.
#[derive(Clone, Debug)]
pub struct ServerConfig {
    /// Host address to bind to.
    pub host: String,
    /// Port to listen on.
    pub port: u16,
    /// Enable verbose output.
    pub verbose: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_owned(),
            port: 8055,
            verbose: false,
        }
    }
}

/// Run the server until Ctrl-C.
///
/// # Errors
///
/// Returns an error if the address is invalid or the listener cannot bind.
pub async fn run_server(
    config: ServerConfig,
    pipeline: Pipeline,
) -> Result<(), Box<dyn std::error::Error>> {
    let state = Arc::new(AppState {
        pipeline,
        verbose: config.verbose,
    });

    let app = app::create_router(state);

    let addr = SocketAddr::from_str(&format!("{}:{}", config.host, config.port))?;
    tracing::info!(address = %addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

/// Wait for shutdown signal (Ctrl-C).
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for Ctrl+C");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received, stopping server...");
}

/// Create server configuration from mdpress config.
#[must_use]
pub fn server_config_from_config(config: &mdpress_config::Config, verbose: bool) -> ServerConfig {
    ServerConfig {
        host: config.server.host.clone(),
        port: config.server.port,
        verbose,
    }
}
