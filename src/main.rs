//! Application entry point. It initializes tracing, loads configuration from
//! TOML plus environment overrides, takes the first system snapshot, spawns
//! the background collector, sets up the Axum router with all routes, and
//! starts the HTTP server.

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use podview::config::{AppConfig, DEFAULT_CONFIG_PATH, DEFAULT_LOG_FILTER};
use podview::http::start_server;
use podview::routes::create_router;
use podview::state::AppState;
use podview::sysmon::SystemMonitor;
use podview::templates::init_templates;

/// podview: Kubernetes environment display web service
#[derive(Parser, Debug)]
#[command(name = "podview", version, about)]
struct Args {
    /// Path to configuration file
    #[arg(short, long, default_value = DEFAULT_CONFIG_PATH)]
    config: String,

    /// Log level filter (e.g., "podview=debug,tower_http=info")
    #[arg(short, long)]
    log_level: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Parse command line arguments
    let args = Args::parse();

    // Initialize tracing with priority: CLI > env > default
    let log_filter = args
        .log_level
        .or_else(|| std::env::var("RUST_LOG").ok())
        .unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string());

    // Load configuration before installing the subscriber so the log format
    // setting can take effect
    let config = AppConfig::load(&args.config)?;

    let registry =
        tracing_subscriber::registry().with(tracing_subscriber::EnvFilter::new(&log_filter));
    if config.logging.format == "json" {
        registry
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }

    tracing::info!(
        environment = %config.ui.environment,
        bg_color = %config.ui.bg_color,
        font_color = %config.ui.font_color,
        "Loaded configuration"
    );

    // Initialize Tera templates
    let tera = init_templates()?;
    tracing::info!("Initialized templates");

    // Take the first system snapshot and start the background collector
    let monitor = SystemMonitor::new(&config.monitor);
    monitor.spawn_collector();
    tracing::info!(
        refresh_interval_seconds = config.monitor.refresh_interval_seconds,
        "Started system monitor"
    );

    // Create application state
    let state = AppState::new(config.clone(), tera, monitor);

    // Create router
    let app = create_router(state);

    // Start server (blocks until shutdown)
    start_server(app, &config).await?;

    Ok(())
}
