//! Configuration loading and constants.
//!
//! Loads application configuration from a TOML file and applies environment
//! variable overrides on top, since the container is usually configured
//! through the pod spec rather than a mounted file. `AppConfig` is the root
//! configuration struct containing all settings.

use const_format::formatcp;
use serde::{Deserialize, Serialize};
use std::path::Path;

// =============================================================================
// HTTP Response Cache Control
// =============================================================================
// Everything this service renders reflects live process state, so upstream
// caches must not hold onto responses. Probes in particular must always see
// a fresh answer.

/// Error responses - short TTL to prevent thundering herd while allowing quick recovery
pub const HTTP_CACHE_ERROR_MAX_AGE: u32 = 5;

/// Dynamic pages and probes - never cached
pub const CACHE_CONTROL_DYNAMIC: &str = "no-store";

pub const CACHE_CONTROL_ERROR: &str = formatcp!("public, max-age={}", HTTP_CACHE_ERROR_MAX_AGE);

// =============================================================================
// Default Paths and Strings
// =============================================================================

/// Default configuration file path
pub const DEFAULT_CONFIG_PATH: &str = "config/default.toml";

/// Glob pattern for template files
pub const TEMPLATE_GLOB: &str = "templates/**/*";

/// Default log filter when RUST_LOG is not set
pub const DEFAULT_LOG_FILTER: &str = "podview=debug,tower_http=info";

/// Default log format (text or json)
pub const DEFAULT_LOG_FORMAT: &str = "text";

/// Default background color (matches the base deployment values)
pub const DEFAULT_BG_COLOR: &str = "#1e3a8a";

/// Default font color
pub const DEFAULT_FONT_COLOR: &str = "#ffffff";

/// Default mount point for the shared-files volume
pub const DEFAULT_SHARED_DIR: &str = "/app/share";

/// Default mount point for the secret-store volume
pub const DEFAULT_SECRET_STORE_DIR: &str = "/mnt/secret-store";

/// Placeholder for environment values that are not set
pub const UNKNOWN_VALUE: &str = "unknown";

#[derive(Debug, Clone, Deserialize, Default)]
pub struct AppConfig {
    /// HTTP server configuration
    #[serde(default)]
    pub http: HttpServerConfig,
    /// Display settings (environment name, theme colors)
    #[serde(default)]
    pub ui: UiConfig,
    /// Mounted volume paths listed on the index page
    #[serde(default)]
    pub volumes: VolumesConfig,
    /// System monitor settings
    #[serde(default)]
    pub monitor: MonitorConfig,
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// HTTP server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct HttpServerConfig {
    #[serde(default = "HttpServerConfig::default_host")]
    pub host: String,
    #[serde(default = "HttpServerConfig::default_port")]
    pub port: u16,
    /// Seconds to wait for in-flight connections to drain on shutdown
    #[serde(default = "HttpServerConfig::default_shutdown_grace")]
    pub shutdown_grace_seconds: u64,
}

impl Default for HttpServerConfig {
    fn default() -> Self {
        Self {
            host: Self::default_host(),
            port: Self::default_port(),
            shutdown_grace_seconds: Self::default_shutdown_grace(),
        }
    }
}

impl HttpServerConfig {
    fn default_host() -> String {
        "0.0.0.0".to_string()
    }

    fn default_port() -> u16 {
        3000
    }

    fn default_shutdown_grace() -> u64 {
        30
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct UiConfig {
    /// Site title shown in the page header
    #[serde(default = "UiConfig::default_site_name")]
    pub site_name: String,
    /// Deployment environment name (dev/staging/production)
    #[serde(default = "UiConfig::default_environment")]
    pub environment: String,
    /// Page background color (hex)
    #[serde(default = "UiConfig::default_bg_color")]
    pub bg_color: String,
    /// Page font color (hex)
    #[serde(default = "UiConfig::default_font_color")]
    pub font_color: String,
    /// Debug flag, reported on the page and in the API
    #[serde(default)]
    pub debug: bool,
    /// Version string, populated at runtime
    #[serde(skip_deserializing, default = "UiConfig::default_version")]
    pub version: String,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            site_name: Self::default_site_name(),
            environment: Self::default_environment(),
            bg_color: Self::default_bg_color(),
            font_color: Self::default_font_color(),
            debug: false,
            version: Self::default_version(),
        }
    }
}

impl UiConfig {
    fn default_site_name() -> String {
        "Kubernetes Environment Display".to_string()
    }

    fn default_environment() -> String {
        UNKNOWN_VALUE.to_string()
    }

    fn default_bg_color() -> String {
        DEFAULT_BG_COLOR.to_string()
    }

    fn default_font_color() -> String {
        DEFAULT_FONT_COLOR.to_string()
    }

    fn default_version() -> String {
        env!("CARGO_PKG_VERSION").to_string()
    }
}

/// Volume mount paths whose contents are listed on the index page.
#[derive(Debug, Clone, Deserialize)]
pub struct VolumesConfig {
    #[serde(default = "VolumesConfig::default_shared_dir")]
    pub shared_dir: String,
    #[serde(default = "VolumesConfig::default_secret_store_dir")]
    pub secret_store_dir: String,
}

impl Default for VolumesConfig {
    fn default() -> Self {
        Self {
            shared_dir: Self::default_shared_dir(),
            secret_store_dir: Self::default_secret_store_dir(),
        }
    }
}

impl VolumesConfig {
    fn default_shared_dir() -> String {
        DEFAULT_SHARED_DIR.to_string()
    }

    fn default_secret_store_dir() -> String {
        DEFAULT_SECRET_STORE_DIR.to_string()
    }
}

/// System monitor configuration
#[derive(Debug, Clone, Deserialize)]
pub struct MonitorConfig {
    /// Seconds between system/process metric refreshes
    #[serde(default = "MonitorConfig::default_refresh_interval")]
    pub refresh_interval_seconds: u64,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            refresh_interval_seconds: Self::default_refresh_interval(),
        }
    }
}

impl MonitorConfig {
    fn default_refresh_interval() -> u64 {
        5
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log format: "text" (human-readable, default) or "json" (structured)
    #[serde(default = "LoggingConfig::default_format")]
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            format: DEFAULT_LOG_FORMAT.to_string(),
        }
    }
}

impl LoggingConfig {
    fn default_format() -> String {
        DEFAULT_LOG_FORMAT.to_string()
    }
}

impl AppConfig {
    /// Load configuration from a TOML file, then apply environment overrides.
    ///
    /// A missing file is not an error: the container is normally configured
    /// entirely through the pod spec's environment variables.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let mut config = if path.as_ref().exists() {
            let contents = std::fs::read_to_string(path)?;
            toml::from_str(&contents)?
        } else {
            AppConfig::default()
        };

        config.apply_env_overrides()?;
        Ok(config)
    }

    /// Environment variables take precedence over file values.
    fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        if let Ok(port) = std::env::var("PORT") {
            self.http.port = port.parse().map_err(|_| {
                ConfigError::Validation(format!("PORT is not a valid port number: {}", port))
            })?;
        }
        if let Ok(environment) = std::env::var("ENVIRONMENT") {
            self.ui.environment = environment;
        }
        if let Ok(bg_color) = std::env::var("BG_COLOR") {
            self.ui.bg_color = bg_color;
        }
        if let Ok(font_color) = std::env::var("FONT_COLOR") {
            self.ui.font_color = font_color;
        }
        if let Ok(debug) = std::env::var("DEBUG") {
            self.ui.debug = debug.eq_ignore_ascii_case("true");
        }
        Ok(())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Configuration error: {0}")]
    Validation(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::sync::Mutex;

    // `load` reads the process environment, which is global; tests touching
    // it (or observing its absence) must not interleave.
    static ENV_LOCK: Mutex<()> = Mutex::new(());

    #[test]
    fn test_defaults_when_file_missing() {
        let _guard = ENV_LOCK.lock().unwrap();
        let config = AppConfig::load("/nonexistent/podview.toml").unwrap();
        assert_eq!(config.http.host, "0.0.0.0");
        assert_eq!(config.ui.bg_color, DEFAULT_BG_COLOR);
        assert_eq!(config.volumes.shared_dir, DEFAULT_SHARED_DIR);
        assert_eq!(config.logging.format, "text");
    }

    #[test]
    fn test_load_from_file() {
        let _guard = ENV_LOCK.lock().unwrap();
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r##"
[http]
host = "127.0.0.1"
port = 8080

[ui]
environment = "staging"
bg_color = "#000000"
"##
        )
        .unwrap();

        let config = AppConfig::load(file.path()).unwrap();
        assert_eq!(config.http.host, "127.0.0.1");
        assert_eq!(config.http.port, 8080);
        assert_eq!(config.ui.environment, "staging");
        assert_eq!(config.ui.bg_color, "#000000");
        // Unspecified sections keep their defaults
        assert_eq!(config.ui.font_color, DEFAULT_FONT_COLOR);
        assert_eq!(config.monitor.refresh_interval_seconds, 5);
    }

    #[test]
    fn test_invalid_toml_is_an_error() {
        let _guard = ENV_LOCK.lock().unwrap();
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[http\nport = not a number").unwrap();
        assert!(matches!(
            AppConfig::load(file.path()),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_env_overrides_beat_file_values() {
        let _guard = ENV_LOCK.lock().unwrap();
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r##"
[http]
port = 8080

[ui]
environment = "from-file"
bg_color = "#111111"
"##
        )
        .unwrap();

        std::env::set_var("PORT", "9090");
        std::env::set_var("ENVIRONMENT", "from-env");
        std::env::set_var("BG_COLOR", "#222222");

        let result = AppConfig::load(file.path());

        std::env::remove_var("PORT");
        std::env::remove_var("ENVIRONMENT");
        std::env::remove_var("BG_COLOR");

        let config = result.unwrap();
        assert_eq!(config.http.port, 9090);
        assert_eq!(config.ui.environment, "from-env");
        assert_eq!(config.ui.bg_color, "#222222");
    }

    #[test]
    fn test_invalid_port_env_is_an_error() {
        let _guard = ENV_LOCK.lock().unwrap();

        std::env::set_var("PORT", "not-a-port");
        let result = AppConfig::load("/nonexistent/podview.toml");
        std::env::remove_var("PORT");

        assert!(matches!(result, Err(ConfigError::Validation(_))));
    }
}
