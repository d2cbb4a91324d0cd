//! Request ID and metrics middleware.
//!
//! Generates a UUID v4 for each incoming request and creates a tracing span
//! that wraps the entire request lifecycle. All logs emitted during request
//! processing will include the request_id field for correlation.
//!
//! A second layer records Prometheus request metrics (count, duration, active
//! requests).

use std::time::Instant;

use axum::{
    extract::{MatchedPath, Request},
    middleware::Next,
    response::Response,
};
use tracing::Instrument;
use uuid::Uuid;

use crate::metrics::{ACTIVE_REQUESTS, REQUEST_COUNT, REQUEST_DURATION};

/// Path label for requests that matched no route. Unmatched URIs must share
/// one label so scans cannot mint unbounded time series.
pub const UNMATCHED_PATH_LABEL: &str = "unknown";

/// Extension type for accessing request ID in handlers if needed.
#[derive(Clone, Debug)]
pub struct RequestId(pub Uuid);

/// Middleware that generates a request ID and creates a request span.
///
/// This should be the outermost middleware layer so the span wraps
/// all request processing, including other middleware and handlers.
pub async fn request_id_layer(request: Request, next: Next) -> Response {
    let request_id = Uuid::new_v4();
    let method = request.method().clone();
    let uri = request.uri().clone();
    let path = uri.path();

    // Create the request span with key fields for correlation
    let span = tracing::info_span!(
        "request",
        request_id = %request_id,
        method = %method,
        path = %path,
        duration_ms = tracing::field::Empty,
    );

    let start = Instant::now();

    // Add request ID to extensions for access in handlers if needed
    let mut request = request;
    request.extensions_mut().insert(RequestId(request_id));

    // Process the request within the span
    async move {
        let response = next.run(request).await;
        let duration_ms = start.elapsed().as_millis() as u64;

        // Record duration and log completion with status code
        tracing::Span::current().record("duration_ms", duration_ms);
        tracing::info!(
            status = response.status().as_u16(),
            duration_ms,
            "Request completed"
        );

        response
    }
    .instrument(span)
    .await
}

/// Middleware that records Prometheus metrics for every request.
///
/// The path label is the matched route template, not the raw request URI.
pub async fn metrics_layer(request: Request, next: Next) -> Response {
    let method = request.method().as_str().to_string();
    let path = request
        .extensions()
        .get::<MatchedPath>()
        .map(|matched| matched.as_str().to_string())
        .unwrap_or_else(|| UNMATCHED_PATH_LABEL.to_string());

    ACTIVE_REQUESTS.inc();
    let start = Instant::now();

    let response = next.run(request).await;

    REQUEST_DURATION
        .with_label_values(&[method.as_str(), path.as_str()])
        .observe(start.elapsed().as_secs_f64());
    REQUEST_COUNT
        .with_label_values(&[method.as_str(), path.as_str(), response.status().as_str()])
        .inc();
    ACTIVE_REQUESTS.dec();

    response
}
