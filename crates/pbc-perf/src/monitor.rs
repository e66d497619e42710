//! Start/stop instrumentation around one command run.

use std::time::Instant;

use chrono::Utc;
use tracing::debug;

use crate::error::PerfError;
use crate::memory::{MemoryProbe, SysinfoProbe};
use crate::metrics::{PerformanceMetrics, RunExtras, RunStatus};

enum MonitorState {
    Idle,
    Running {
        metrics: PerformanceMetrics,
        started: Instant,
        start_memory: Option<u64>,
    },
    Completed(PerformanceMetrics),
}

/// Idle → running → completed. Each monitor measures exactly one run.
pub struct PerformanceMonitor<P: MemoryProbe = SysinfoProbe> {
    probe: P,
    state: MonitorState,
}

impl PerformanceMonitor<SysinfoProbe> {
    pub fn new() -> Self {
        Self::with_probe(SysinfoProbe::new())
    }
}

impl Default for PerformanceMonitor<SysinfoProbe> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P: MemoryProbe> PerformanceMonitor<P> {
    pub fn with_probe(probe: P) -> Self {
        Self {
            probe,
            state: MonitorState::Idle,
        }
    }

    pub fn start_monitoring(&mut self, project: &str, target: &str) -> Result<(), PerfError> {
        if !matches!(self.state, MonitorState::Idle) {
            return Err(PerfError::InvalidState("already started"));
        }

        let start_memory = self.probe.snapshot();
        debug!("monitoring {}:{} (start memory {:?})", project, target, start_memory);
        self.state = MonitorState::Running {
            metrics: PerformanceMetrics {
                project: project.to_string(),
                target: target.to_string(),
                start_time: Utc::now(),
                end_time: None,
                duration: 0,
                memory_peak: None,
                memory_delta: None,
                test_count: None,
                build_time: None,
                coverage_time: None,
                status: RunStatus::Running,
            },
            started: Instant::now(),
            start_memory,
        };
        Ok(())
    }

    /// Finalises the metrics. Build time is the duration for `build*`
    /// targets; coverage time is the duration when the run collected
    /// coverage.
    pub fn end_monitoring(
        &mut self,
        status: RunStatus,
        extras: RunExtras,
    ) -> Result<&PerformanceMetrics, PerfError> {
        let (mut metrics, started, start_memory) =
            match std::mem::replace(&mut self.state, MonitorState::Idle) {
                MonitorState::Running {
                    metrics,
                    started,
                    start_memory,
                } => (metrics, started, start_memory),
                other => {
                    self.state = other;
                    return Err(PerfError::InvalidState("not running"));
                }
            };

        let duration = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);
        let end_memory = self.probe.snapshot();

        metrics.end_time = Some(Utc::now());
        metrics.duration = duration;
        metrics.memory_peak = match (start_memory, end_memory) {
            (Some(start), Some(end)) => Some(start.max(end)),
            (start, end) => start.or(end),
        };
        metrics.memory_delta = match (start_memory, end_memory) {
            (Some(start), Some(end)) => Some(end as i64 - start as i64),
            _ => None,
        };
        metrics.test_count = extras.test_count;
        metrics.build_time = metrics.target.starts_with("build").then_some(duration);
        metrics.coverage_time = extras.coverage.then_some(duration);
        metrics.status = status;

        debug!("{}:{} finished in {}ms", metrics.project, metrics.target, duration);
        self.state = MonitorState::Completed(metrics);
        self.metrics().ok_or(PerfError::InvalidState("not completed"))
    }

    /// The final metrics, once the run has completed.
    pub fn metrics(&self) -> Option<&PerformanceMetrics> {
        match &self.state {
            MonitorState::Completed(metrics) => Some(metrics),
            _ => None,
        }
    }
}
