//! HTTP server startup logic.

use std::net::SocketAddr;

use axum::Router;
use axum_server::Handle;

use crate::config::AppConfig;

use super::shutdown;

/// Server startup error
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("Failed to bind server: {0}")]
    Bind(#[from] std::io::Error),

    #[error("Invalid http.host or http.port: {0}")]
    Addr(String),

    #[error("Server error: {0}")]
    Server(String),
}

/// Start the HTTP server.
///
/// This function blocks until the server shuts down.
pub async fn start_server(app: Router, config: &AppConfig) -> Result<(), ServerError> {
    let addr: SocketAddr = format!("{}:{}", config.http.host, config.http.port)
        .parse()
        .map_err(|e| ServerError::Addr(format!("{}", e)))?;

    tracing::info!(%addr, "Starting HTTP server");

    let handle = Handle::new();

    // Setup graceful shutdown
    shutdown::setup_shutdown_handler(handle.clone(), config.http.shutdown_grace_seconds);

    axum_server::bind(addr)
        .handle(handle)
        .serve(app.into_make_service())
        .await
        .map_err(|e| ServerError::Server(e.to_string()))
}
