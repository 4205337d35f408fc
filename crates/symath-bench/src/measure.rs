//! Stage timing and resident-memory sampling for benchmark runs.

use std::time::{Duration, Instant};
use sysinfo::System;

/// Errors produced by memory sampling.
#[derive(Debug, Clone)]
pub enum MemoryError {
    ProcessNotFound { pid: u32 },
}

impl std::fmt::Display for MemoryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MemoryError::ProcessNotFound { pid } => {
                write!(f, "failed to locate process {pid}")
            }
        }
    }
}

impl std::error::Error for MemoryError {}

/// Resident set size of the current process, in bytes.
///
/// # Errors
///
/// Returns an error if the current process cannot be located.
pub fn resident_bytes() -> Result<u64, MemoryError> {
    let pid = sysinfo::Pid::from(std::process::id() as usize);

    let mut sys = System::new();
    sys.refresh_processes_specifics(
        sysinfo::ProcessesToUpdate::Some(&[pid]),
        true,
        sysinfo::ProcessRefreshKind::nothing().with_memory(),
    );

    sys.process(pid)
        .map(sysinfo::Process::memory)
        .ok_or(MemoryError::ProcessNotFound {
            pid: std::process::id(),
        })
}

/// Like [`resident_bytes`], logging and discarding failures.
pub fn capture_rss_bytes(stage: &str) -> Option<u64> {
    match resident_bytes() {
        Ok(bytes) => Some(bytes),
        Err(err) => {
            tracing::debug!(
                component = "bench",
                operation = "capture_rss",
                status = "error",
                stage,
                error = %err,
                "Failed to sample resident memory"
            );
            None
        }
    }
}

pub fn rss_delta(before: Option<u64>, after: Option<u64>) -> Option<i64> {
    match (before, after) {
        (Some(before), Some(after)) => Some(after as i64 - before as i64),
        _ => None,
    }
}

/// Timing and memory of one named stage.
#[derive(Debug, Clone)]
pub struct StageMeasurement {
    pub stage: String,
    pub duration: Duration,
    pub rss_before_bytes: Option<u64>,
    pub rss_after_bytes: Option<u64>,
    pub rss_delta_bytes: Option<i64>,
}

/// Handle returned by [`MeasurementRecorder::begin_stage`].
#[derive(Debug)]
pub struct StageStart {
    stage: String,
    started: Instant,
    rss_before_bytes: Option<u64>,
}

/// Collects stage measurements in execution order.
#[derive(Debug, Default)]
pub struct MeasurementRecorder {
    stages: Vec<StageMeasurement>,
}

impl MeasurementRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn begin_stage(&mut self, stage: &str) -> StageStart {
        StageStart {
            stage: stage.to_string(),
            rss_before_bytes: capture_rss_bytes(stage),
            started: Instant::now(),
        }
    }

    pub fn end_stage(&mut self, start: StageStart) {
        let duration = start.started.elapsed();
        let rss_after_bytes = capture_rss_bytes(&start.stage);
        tracing::trace!(
            component = "bench",
            operation = "end_stage",
            status = "success",
            stage = start.stage.as_str(),
            duration_ms = duration.as_secs_f64() * 1000.0,
            "Finished benchmark stage"
        );
        self.stages.push(StageMeasurement {
            rss_delta_bytes: rss_delta(start.rss_before_bytes, rss_after_bytes),
            stage: start.stage,
            duration,
            rss_before_bytes: start.rss_before_bytes,
            rss_after_bytes,
        });
    }

    pub fn into_stages(self) -> Vec<StageMeasurement> {
        self.stages
    }
}
