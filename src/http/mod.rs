//! HTTP server module.
//!
//! The service runs plain HTTP behind the orchestrator's ingress; TLS
//! termination is not its job. The server includes graceful shutdown on
//! SIGTERM/SIGINT so the pod drains in-flight requests before exiting.

mod server;
mod shutdown;

pub use server::start_server;
