//! Index page handler.
//!
//! Renders the full environment report as an HTML page, themed by the
//! configured background and font colors.

use axum::{extract::State, response::Html};
use tracing::instrument;

use crate::error::AppError;
use crate::report::EnvReport;
use crate::state::AppState;

/// Index page handler showing environment metadata, system metrics,
/// mounted volumes, and environment variables. Theme color variants are
/// derived in the template via the `shade` filter.
#[instrument(name = "home::index", skip(state))]
pub async fn index(State(state): State<AppState>) -> Result<Html<String>, AppError> {
    let report = EnvReport::build(&state.config, &state.monitor);

    let ui = &state.config.ui;
    let mut context = tera::Context::new();
    context.insert("config", ui);
    context.insert("report", &report);
    context.insert("environment_upper", &ui.environment.to_uppercase());
    context.insert(
        "production_status",
        if report.server.is_production {
            "PRODUCTION MODE"
        } else {
            "DEVELOPMENT MODE"
        },
    );

    let html = state.tera.render("index.html", &context)?;
    Ok(Html(html))
}
