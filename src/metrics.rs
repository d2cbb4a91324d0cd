//! Prometheus metrics for the HTTP surface and the process itself.
//!
//! Request counters and histograms are updated by the middleware; the process
//! gauges are refreshed from the system monitor's snapshot at scrape time.

use lazy_static::lazy_static;
use prometheus::{
    register_gauge, register_histogram_vec, register_int_counter_vec, register_int_gauge, Gauge,
    HistogramVec, IntCounterVec, IntGauge,
};

use crate::sysmon::SystemMonitor;

lazy_static! {
    pub static ref REQUEST_COUNT: IntCounterVec = register_int_counter_vec!(
        "podview_requests_total",
        "Total number of requests",
        &["method", "path", "status"]
    )
    .unwrap();

    pub static ref REQUEST_DURATION: HistogramVec = register_histogram_vec!(
        "podview_request_duration_seconds",
        "Request latency",
        &["method", "path"]
    )
    .unwrap();

    pub static ref ACTIVE_REQUESTS: IntGauge = register_int_gauge!(
        "podview_active_requests",
        "Number of requests currently being handled"
    )
    .unwrap();

    pub static ref PROCESS_MEMORY: IntGauge = register_int_gauge!(
        "podview_memory_usage_bytes",
        "Current process memory usage in bytes"
    )
    .unwrap();

    pub static ref PROCESS_CPU: Gauge = register_gauge!(
        "podview_cpu_usage_percent",
        "Current process CPU usage percentage"
    )
    .unwrap();

    pub static ref UPTIME: Gauge = register_gauge!(
        "podview_uptime_seconds",
        "Application uptime in seconds"
    )
    .unwrap();
}

/// Refresh the process gauges from the latest snapshot.
pub fn update_process_gauges(monitor: &SystemMonitor) {
    let snapshot = monitor.snapshot();
    PROCESS_MEMORY.set(snapshot.process.memory_bytes as i64);
    PROCESS_CPU.set(snapshot.process.cpu_percent as f64);
    UPTIME.set(monitor.uptime_seconds());
}
