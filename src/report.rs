//! Environment report assembly.
//!
//! Builds the [`EnvReport`] served by the index page and `/api/env`: pod
//! metadata from the downward API, server/process details, the latest system
//! snapshot, mounted volume listings, and the (redacted) environment map.

use std::collections::BTreeMap;
use std::path::Path;

use chrono::Utc;
use serde::Serialize;
use sysinfo::System;

use crate::config::{AppConfig, UNKNOWN_VALUE};
use crate::sysmon::{SystemMonitor, SystemSnapshot};

/// Environment variable keys whose values must never be shown.
const SENSITIVE_MARKERS: [&str; 4] = ["SECRET", "PASSWORD", "TOKEN", "KEY"];

/// Replacement value for redacted environment variables.
const HIDDEN_VALUE: &str = "[HIDDEN]";

/// Pod identity from the Kubernetes downward API.
#[derive(Debug, Clone, Serialize)]
pub struct KubernetesInfo {
    pub pod_name: String,
    pub pod_namespace: String,
    pub host_ip: String,
}

impl KubernetesInfo {
    pub fn from_env() -> Self {
        Self {
            pod_name: env_or_unknown("POD_NAME"),
            pod_namespace: env_or_unknown("POD_NAMESPACE"),
            host_ip: env_or_unknown("FROM_FIELD"),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ApplicationInfo {
    pub environment: String,
    pub uptime: f64,
    pub timestamp: String,
    pub version: String,
    pub os: String,
    pub architecture: String,
    pub pid: u32,
    pub ppid: Option<u32>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ServerInfo {
    pub server_software: String,
    pub is_production: bool,
    pub debug_mode: bool,
    pub worker_pid: u32,
    pub worker_ppid: Option<u32>,
}

impl ServerInfo {
    pub fn new(config: &AppConfig, snapshot: &SystemSnapshot) -> Self {
        Self {
            server_software: std::env::var("SERVER_SOFTWARE")
                .unwrap_or_else(|_| format!("podview/{}", env!("CARGO_PKG_VERSION"))),
            is_production: is_production(&config.ui.environment),
            debug_mode: config.ui.debug,
            worker_pid: snapshot.process.pid,
            worker_ppid: snapshot.process.ppid,
        }
    }
}

/// Directory listings for the volume mounts shown on the index page.
#[derive(Debug, Clone, Serialize)]
pub struct VolumeListings {
    pub shared_files: Vec<String>,
    pub secret_store: Vec<String>,
}

/// The complete environment report.
#[derive(Debug, Clone, Serialize)]
pub struct EnvReport {
    pub kubernetes: KubernetesInfo,
    pub application: ApplicationInfo,
    pub server: ServerInfo,
    pub system: SystemSnapshot,
    pub volumes: VolumeListings,
    pub environment_variables: BTreeMap<String, String>,
}

impl EnvReport {
    pub fn build(config: &AppConfig, monitor: &SystemMonitor) -> Self {
        let snapshot = monitor.snapshot();
        let uptime = monitor.uptime_seconds();

        let application = ApplicationInfo {
            environment: config.ui.environment.clone(),
            uptime,
            timestamp: Utc::now().to_rfc3339(),
            version: config.ui.version.clone(),
            os: os_description(),
            architecture: std::env::consts::ARCH.to_string(),
            pid: snapshot.process.pid,
            ppid: snapshot.process.ppid,
        };

        let server = ServerInfo::new(config, &snapshot);

        let volumes = VolumeListings {
            shared_files: safe_read_dir(&config.volumes.shared_dir),
            secret_store: safe_read_dir(&config.volumes.secret_store_dir),
        };

        Self {
            kubernetes: KubernetesInfo::from_env(),
            application,
            server,
            system: snapshot,
            volumes,
            environment_variables: redacted_env(std::env::vars()),
        }
    }
}

/// Whether this deployment counts as production: the configured environment
/// name, the legacy `FLASK_ENV` variable, or a `SERVER_SOFTWARE` value from a
/// production app server.
pub fn is_production(environment: &str) -> bool {
    environment.eq_ignore_ascii_case("production")
        || std::env::var("FLASK_ENV")
            .map(|v| v.eq_ignore_ascii_case("production"))
            .unwrap_or(false)
        || std::env::var("SERVER_SOFTWARE")
            .map(|s| s.contains("gunicorn") || s.contains("uwsgi"))
            .unwrap_or(false)
}

/// OS name and version, e.g. "Ubuntu 24.04".
pub fn os_description() -> String {
    let name = System::name().unwrap_or_else(|| std::env::consts::OS.to_string());
    match System::os_version() {
        Some(version) => format!("{} {}", name, version),
        None => name,
    }
}

fn env_or_unknown(key: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| UNKNOWN_VALUE.to_string())
}

/// List a directory's entry names. Missing directories yield an empty list;
/// a read failure yields a single error entry, matching what the page shows.
pub fn safe_read_dir<P: AsRef<Path>>(dir: P) -> Vec<String> {
    let dir = dir.as_ref();
    if !dir.is_dir() {
        return Vec::new();
    }

    match std::fs::read_dir(dir) {
        Ok(entries) => entries
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.file_name().to_string_lossy().into_owned())
            .collect(),
        Err(err) => {
            tracing::warn!(dir = %dir.display(), error = %err, "Error reading directory");
            vec![format!("Error reading directory: {}", err)]
        }
    }
}

/// Sort the environment map and hide values for sensitive keys.
pub fn redacted_env<I>(vars: I) -> BTreeMap<String, String>
where
    I: IntoIterator<Item = (String, String)>,
{
    vars.into_iter()
        .map(|(key, value)| {
            let upper = key.to_uppercase();
            if SENSITIVE_MARKERS.iter().any(|marker| upper.contains(marker)) {
                (key, HIDDEN_VALUE.to_string())
            } else {
                (key, value)
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn env(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_redacts_sensitive_keys() {
        let vars = env(&[
            ("API_TOKEN", "abc123"),
            ("DB_PASSWORD", "hunter2"),
            ("my_secret_thing", "shh"),
            ("SSH_KEY_PATH", "/root/.ssh/id_ed25519"),
            ("HOME", "/root"),
        ]);

        let redacted = redacted_env(vars);
        assert_eq!(redacted["API_TOKEN"], HIDDEN_VALUE);
        assert_eq!(redacted["DB_PASSWORD"], HIDDEN_VALUE);
        assert_eq!(redacted["my_secret_thing"], HIDDEN_VALUE);
        assert_eq!(redacted["SSH_KEY_PATH"], HIDDEN_VALUE);
        assert_eq!(redacted["HOME"], "/root");
    }

    #[test]
    fn test_env_map_is_sorted() {
        let vars = env(&[("ZED", "1"), ("ALPHA", "2"), ("MID", "3")]);
        let keys: Vec<_> = redacted_env(vars).into_keys().collect();
        assert_eq!(keys, vec!["ALPHA", "MID", "ZED"]);
    }

    #[test]
    fn test_safe_read_dir_missing_is_empty() {
        assert!(safe_read_dir("/nonexistent/podview-test-dir").is_empty());
    }

    #[test]
    fn test_safe_read_dir_lists_entries() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("config.yaml"), "x").unwrap();
        std::fs::write(dir.path().join("data.txt"), "y").unwrap();

        let mut entries = safe_read_dir(dir.path());
        entries.sort();
        assert_eq!(entries, vec!["config.yaml", "data.txt"]);
    }

    // is_production reads FLASK_ENV and SERVER_SOFTWARE from the process
    // environment; these tests must not interleave.
    static ENV_LOCK: std::sync::Mutex<()> = std::sync::Mutex::new(());

    #[test]
    fn test_is_production() {
        let _guard = ENV_LOCK.lock().unwrap();
        assert!(is_production("production"));
        assert!(is_production("PRODUCTION"));
        assert!(!is_production("staging"));
        assert!(!is_production("unknown"));
    }

    #[test]
    fn test_is_production_from_flask_env() {
        let _guard = ENV_LOCK.lock().unwrap();

        std::env::set_var("FLASK_ENV", "production");
        let production = is_production("development");
        std::env::remove_var("FLASK_ENV");

        assert!(production);
    }

    #[test]
    fn test_is_production_from_server_software() {
        let _guard = ENV_LOCK.lock().unwrap();

        std::env::set_var("SERVER_SOFTWARE", "gunicorn/21.2.0");
        let production = is_production("development");
        std::env::remove_var("SERVER_SOFTWARE");

        assert!(production);
    }
}
