//! Background refresh task for the system monitor.

use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use sysinfo::System;
use tokio::time;

use super::{CpuInfo, MemoryInfo, ProcessInfo, SystemMonitor, SystemSnapshot};

const BYTES_PER_MB: u64 = 1024 * 1024;

/// Spawns the periodic refresh loop.
pub(super) fn spawn(monitor: SystemMonitor) {
    let interval_secs = monitor.refresh_interval_seconds();

    tokio::spawn(async move {
        let mut interval = time::interval(Duration::from_secs(interval_secs));
        // First tick fires immediately; the constructor already sampled.
        interval.tick().await;

        loop {
            interval.tick().await;
            monitor.refresh();

            let snapshot = monitor.snapshot();
            tracing::debug!(
                cpu_percent = snapshot.cpu.percent,
                memory_percent = snapshot.memory.percent,
                process_memory_bytes = snapshot.process.memory_bytes,
                "Refreshed system snapshot"
            );
        }
    });
}

/// Refreshes the `System` and derives a snapshot from it.
pub(super) fn take_snapshot(sys: &mut System, started_at: Instant) -> SystemSnapshot {
    sys.refresh_all();

    let total = sys.total_memory();
    let memory = MemoryInfo {
        total_mb: total / BYTES_PER_MB,
        available_mb: sys.available_memory() / BYTES_PER_MB,
        used_mb: sys.used_memory() / BYTES_PER_MB,
        percent: if total > 0 {
            (sys.used_memory() as f32 / total as f32) * 100.0
        } else {
            0.0
        },
    };

    let load = System::load_average();
    let cpu = CpuInfo {
        count: sys.cpus().len(),
        percent: sys.global_cpu_info().cpu_usage(),
        load_avg: [load.one, load.five, load.fifteen],
    };

    let process = current_process_info(sys, total, started_at);

    SystemSnapshot {
        hostname: System::host_name().unwrap_or_else(|| "unknown".to_string()),
        memory,
        cpu,
        process,
    }
}

fn current_process_info(sys: &System, total_memory: u64, started_at: Instant) -> ProcessInfo {
    let pid = match sysinfo::get_current_pid() {
        Ok(pid) => pid,
        Err(err) => {
            tracing::warn!(error = %err, "Unable to determine current pid");
            return ProcessInfo {
                pid: std::process::id(),
                uptime: started_at.elapsed().as_secs_f64(),
                ..Default::default()
            };
        }
    };

    let Some(process) = sys.process(pid) else {
        return ProcessInfo {
            pid: pid.as_u32(),
            uptime: started_at.elapsed().as_secs_f64(),
            ..Default::default()
        };
    };

    let memory_bytes = process.memory();
    let create_time = DateTime::<Utc>::from_timestamp(process.start_time() as i64, 0)
        .map(|dt| dt.to_rfc3339())
        .unwrap_or_default();

    ProcessInfo {
        pid: pid.as_u32(),
        ppid: process.parent().map(|p| p.as_u32()),
        memory_percent: if total_memory > 0 {
            (memory_bytes as f32 / total_memory as f32) * 100.0
        } else {
            0.0
        },
        cpu_percent: process.cpu_usage(),
        memory_bytes,
        create_time,
        uptime: started_at.elapsed().as_secs_f64(),
    }
}
