use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::Utc;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Template rendering error: {0}")]
    Template(#[from] tera::Error),

    #[error("Metrics encoding error: {0}")]
    Metrics(#[from] prometheus::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        tracing::error!("Internal error: {:?}", self);

        // Probes and API consumers both read this, so errors are JSON
        let body = serde_json::json!({
            "error": "Internal Server Error",
            "message": self.to_string(),
            "timestamp": Utc::now().to_rfc3339(),
        });

        (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
    }
}
