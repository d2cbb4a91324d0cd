//! Prometheus metrics endpoint.

use axum::extract::State;
use axum::http::header::CONTENT_TYPE;
use axum::response::{IntoResponse, Response};
use prometheus::{Encoder, TextEncoder};
use tracing::instrument;

use crate::error::AppError;
use crate::metrics::update_process_gauges;
use crate::state::AppState;

/// `GET /metrics` - text exposition of all registered metrics.
///
/// Process gauges are refreshed from the monitor snapshot at scrape time so
/// the scraper always sees the latest sample.
#[instrument(name = "metrics::metrics", skip(state))]
pub async fn metrics(State(state): State<AppState>) -> Result<Response, AppError> {
    update_process_gauges(&state.monitor);

    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();
    encoder.encode(&metric_families, &mut buffer)?;

    Ok(([(CONTENT_TYPE, encoder.format_type().to_string())], buffer).into_response())
}
