//! JSON API endpoint exposing environment metadata.

use axum::{extract::State, Json};
use chrono::Utc;
use tracing::instrument;

use crate::report::{os_description, KubernetesInfo, ServerInfo};
use crate::state::AppState;

/// `GET /api/env` - machine-readable environment summary.
#[instrument(name = "api::env", skip(state))]
pub async fn env(State(state): State<AppState>) -> Json<serde_json::Value> {
    let snapshot = state.monitor.snapshot();
    let ui = &state.config.ui;

    Json(serde_json::json!({
        "environment": ui.environment,
        "bg_color": ui.bg_color,
        "font_color": ui.font_color,
        "server": ServerInfo::new(&state.config, &snapshot),
        "kubernetes": KubernetesInfo::from_env(),
        "uptime": state.monitor.uptime_seconds(),
        "timestamp": Utc::now().to_rfc3339(),
        "version": ui.version,
        "os": os_description(),
    }))
}
