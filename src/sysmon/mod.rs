//! System and process metric sampling.
//!
//! `SystemMonitor` keeps the latest [`SystemSnapshot`] behind a lock, refreshed
//! by a background collector task rather than per request. CPU usage in
//! particular needs two spaced refreshes to produce a meaningful figure, which
//! must not happen inside a request handler.

mod collector;

use std::sync::{Arc, Mutex, RwLock};
use std::time::Instant;

use serde::Serialize;
use sysinfo::System;

use crate::config::MonitorConfig;

/// Memory figures in MB, matching what the index page displays.
#[derive(Debug, Clone, Serialize, Default)]
pub struct MemoryInfo {
    pub total_mb: u64,
    pub available_mb: u64,
    pub used_mb: u64,
    pub percent: f32,
}

/// Host-wide CPU figures.
#[derive(Debug, Clone, Serialize, Default)]
pub struct CpuInfo {
    pub count: usize,
    pub percent: f32,
    pub load_avg: [f64; 3],
}

/// Figures for this process.
#[derive(Debug, Clone, Serialize, Default)]
pub struct ProcessInfo {
    pub pid: u32,
    pub ppid: Option<u32>,
    pub memory_percent: f32,
    pub cpu_percent: f32,
    pub memory_bytes: u64,
    /// Process start time, RFC 3339
    pub create_time: String,
    /// Seconds since process start
    pub uptime: f64,
}

/// One refresh of host and process metrics.
#[derive(Debug, Clone, Serialize, Default)]
pub struct SystemSnapshot {
    pub hostname: String,
    pub memory: MemoryInfo,
    pub cpu: CpuInfo,
    pub process: ProcessInfo,
}

struct Inner {
    snapshot: RwLock<SystemSnapshot>,
    sys: Mutex<System>,
    started_at: Instant,
    refresh_interval_seconds: u64,
}

/// Cloneable handle to the sampled system state.
#[derive(Clone)]
pub struct SystemMonitor {
    inner: Arc<Inner>,
}

impl SystemMonitor {
    /// Creates the monitor and takes a first synchronous sample so handlers
    /// never observe an empty snapshot.
    pub fn new(config: &MonitorConfig) -> Self {
        let started_at = Instant::now();
        let mut sys = System::new_all();

        // A second refresh after the minimum interval makes the first CPU
        // reading non-zero.
        std::thread::sleep(sysinfo::MINIMUM_CPU_UPDATE_INTERVAL);
        sys.refresh_all();

        let snapshot = collector::take_snapshot(&mut sys, started_at);

        Self {
            inner: Arc::new(Inner {
                snapshot: RwLock::new(snapshot),
                sys: Mutex::new(sys),
                started_at,
                refresh_interval_seconds: config.refresh_interval_seconds,
            }),
        }
    }

    /// Spawns the background refresh task.
    pub fn spawn_collector(&self) {
        collector::spawn(self.clone());
    }

    /// Returns the most recent snapshot.
    pub fn snapshot(&self) -> SystemSnapshot {
        self.inner
            .snapshot
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    /// Seconds since the monitor (and effectively the process) started.
    pub fn uptime_seconds(&self) -> f64 {
        self.inner.started_at.elapsed().as_secs_f64()
    }

    fn refresh(&self) {
        let snapshot = {
            let mut sys = self
                .inner
                .sys
                .lock()
                .unwrap_or_else(|poisoned| poisoned.into_inner());
            collector::take_snapshot(&mut sys, self.inner.started_at)
        };

        let mut guard = self
            .inner
            .snapshot
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        *guard = snapshot;
    }

    fn refresh_interval_seconds(&self) -> u64 {
        self.inner.refresh_interval_seconds
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_snapshot_is_populated() {
        let monitor = SystemMonitor::new(&MonitorConfig::default());
        let snapshot = monitor.snapshot();

        assert!(snapshot.memory.total_mb > 0);
        assert!(snapshot.cpu.count > 0);
        assert_eq!(snapshot.process.pid, std::process::id());
        assert!(!snapshot.process.create_time.is_empty());
    }

    #[test]
    fn test_memory_percent_in_range() {
        let monitor = SystemMonitor::new(&MonitorConfig::default());
        let memory = monitor.snapshot().memory;

        assert!(memory.percent >= 0.0 && memory.percent <= 100.0);
        assert!(memory.used_mb <= memory.total_mb);
    }

    #[test]
    fn test_uptime_advances() {
        let monitor = SystemMonitor::new(&MonitorConfig::default());
        let first = monitor.uptime_seconds();
        std::thread::sleep(std::time::Duration::from_millis(10));
        assert!(monitor.uptime_seconds() > first);
    }
}
