//! Shared application state for request handlers.

use std::sync::Arc;
use tera::Tera;

use crate::config::AppConfig;
use crate::sysmon::SystemMonitor;

/// Shared application state, cloneable across handlers via Arc-wrapped fields.
///
/// Contains the application configuration, Tera template engine, and the
/// system monitor providing host and process metrics.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub tera: Arc<Tera>,
    pub monitor: SystemMonitor,
}

impl AppState {
    /// Creates a new application state from the given configuration, templates, and monitor.
    pub fn new(config: AppConfig, tera: Tera, monitor: SystemMonitor) -> Self {
        Self {
            config: Arc::new(config),
            tera: Arc::new(tera),
            monitor,
        }
    }
}
