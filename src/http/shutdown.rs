//! Graceful shutdown and signal handling.
//!
//! Kubernetes sends SIGTERM when a pod is evicted or its deployment rolls;
//! the server stops accepting connections and drains in-flight requests
//! before exiting.

use axum_server::Handle;

/// Setup graceful shutdown on SIGTERM and SIGINT.
///
/// When either signal is received, the server will:
/// 1. Stop accepting new connections
/// 2. Wait up to `grace_seconds` for existing connections to complete
/// 3. Shutdown
pub fn setup_shutdown_handler(handle: Handle, grace_seconds: u64) {
    tokio::spawn(async move {
        let ctrl_c = async {
            tokio::signal::ctrl_c()
                .await
                .expect("Failed to install Ctrl+C handler");
        };

        #[cfg(unix)]
        let terminate = async {
            tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
                .expect("Failed to install SIGTERM handler")
                .recv()
                .await;
        };

        #[cfg(not(unix))]
        let terminate = std::future::pending::<()>();

        tokio::select! {
            _ = ctrl_c => {
                tracing::info!("Received Ctrl+C, initiating graceful shutdown");
            }
            _ = terminate => {
                tracing::info!("Received SIGTERM, initiating graceful shutdown");
            }
        }

        // Trigger graceful shutdown
        handle.graceful_shutdown(Some(std::time::Duration::from_secs(grace_seconds)));
        tracing::info!(
            grace_seconds,
            "Graceful shutdown initiated, waiting for connections to close"
        );
    });
}
