//! Health check endpoint for container orchestration.
//!
//! Serves `/healthcheck.html` for Kubernetes liveness, readiness, and startup
//! probes (and the Docker HEALTHCHECK). The probe variant arrives as
//! `?probe=live|ready|startup|docker` and is echoed back in the page so the
//! probe being exercised is visible in the response body.

use axum::{
    extract::{Query, State},
    response::Html,
};
use chrono::Utc;
use serde::Deserialize;
use tracing::instrument;

use crate::config::UNKNOWN_VALUE;
use crate::error::AppError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct HealthParams {
    probe: Option<String>,
}

/// Health check handler.
///
/// Returns 200 with a body containing "healthy" while the process can serve
/// requests. Anything else (5xx, timeout, refused connection) is read by the
/// orchestrator as a probe failure.
#[instrument(name = "health::health", skip(state, params), fields(probe = tracing::field::Empty))]
pub async fn health(
    State(state): State<AppState>,
    Query(params): Query<HealthParams>,
) -> Result<Html<String>, AppError> {
    let probe = params.probe.unwrap_or_else(|| UNKNOWN_VALUE.to_string());
    tracing::Span::current().record("probe", probe.as_str());

    let snapshot = state.monitor.snapshot();
    let status = serde_json::json!({
        "status": "healthy",
        "probe": probe,
        "timestamp": Utc::now().to_rfc3339(),
        "uptime": state.monitor.uptime_seconds(),
        "memory_usage": format!("{:.1}%", snapshot.memory.percent),
        "pid": snapshot.process.pid,
        "server": format!("podview/{}", state.config.ui.version),
    });

    let mut context = tera::Context::new();
    context.insert("probe", &probe);
    context.insert(
        "status_json",
        &serde_json::to_string_pretty(&status).unwrap_or_default(),
    );

    let html = state.tera.render("healthcheck.html", &context)?;
    Ok(Html(html))
}
