//! HTTP route handlers.
//!
//! Everything this service serves reflects live process state, so all routes
//! carry a `no-store` Cache-Control header; only error responses get a short
//! TTL to blunt thundering herds. Request tracing is enabled via middleware
//! that generates a unique request ID for each incoming request, allowing
//! correlation of all logs within a request.

pub mod api;
pub mod health;
pub mod home;
pub mod metrics;

use axum::{http::Uri, middleware, response::IntoResponse, routing::get, Json, Router};
use chrono::Utc;
use http::header::{HeaderValue, CACHE_CONTROL};
use http::StatusCode;
use tower_http::set_header::SetResponseHeaderLayer;

use crate::config::{CACHE_CONTROL_DYNAMIC, CACHE_CONTROL_ERROR};
use crate::middleware::{metrics_layer, request_id_layer};
use crate::state::AppState;

/// JSON 404 for unknown paths, consumed by probes and curl alike.
/// Error responses carry a short cache TTL instead of `no-store`.
async fn not_found(uri: Uri) -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        [(CACHE_CONTROL, HeaderValue::from_static(CACHE_CONTROL_ERROR))],
        Json(serde_json::json!({
            "error": "Not Found",
            "path": uri.path(),
            "timestamp": Utc::now().to_rfc3339(),
        })),
    )
}

/// Creates the Axum router with all routes and cache headers.
pub fn create_router(state: AppState) -> Router {
    // Index page - rendered fresh per request
    let page_routes = Router::new().route("/", get(home::index));

    // Health check - always fresh for liveness/readiness/startup probes
    let health_routes = Router::new().route("/healthcheck.html", get(health::health));

    // JSON API
    let api_routes = Router::new().route("/api/env", get(api::env));

    // Prometheus exposition
    let metrics_routes = Router::new().route("/metrics", get(metrics::metrics));

    Router::new()
        .merge(page_routes)
        .merge(health_routes)
        .merge(api_routes)
        .merge(metrics_routes)
        .fallback(not_found)
        .layer(SetResponseHeaderLayer::if_not_present(
            CACHE_CONTROL,
            HeaderValue::from_static(CACHE_CONTROL_DYNAMIC),
        ))
        .with_state(state)
        // Metrics layer - counts and times every request
        .layer(middleware::from_fn(metrics_layer))
        // Request ID middleware - creates root span with request_id for correlation
        .layer(middleware::from_fn(request_id_layer))
}
