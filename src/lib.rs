//! podview: a Kubernetes environment display web service.
//!
//! Renders pod/environment metadata as an HTML page, exposes the same data as
//! JSON under `/api/env`, serves orchestrator health probes at
//! `/healthcheck.html`, and exports Prometheus metrics at `/metrics`.

pub mod config;
pub mod error;
pub mod http;
pub mod metrics;
pub mod middleware;
pub mod report;
pub mod routes;
pub mod state;
pub mod sysmon;
pub mod templates;

pub use error::AppError;
