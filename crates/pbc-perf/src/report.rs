//! Human-readable and persisted performance reports.

use std::fmt::{Display, Formatter};
use std::fs::{self, OpenOptions};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::analysis::Analysis;
use crate::baseline::PerformanceBaseline;
use crate::error::PerfError;
use crate::metrics::PerformanceMetrics;
use crate::store::{sanitize, write_json};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PerformanceReport {
    pub metrics: PerformanceMetrics,
    pub baseline: Option<PerformanceBaseline>,
    pub analysis: Analysis,
    pub generated_at: DateTime<Utc>,
}

impl Display for PerformanceReport {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let m = &self.metrics;
        writeln!(f, "Performance report: {}:{}", m.project, m.target)?;
        writeln!(f, "  status:    {}", self.analysis.status.as_str())?;
        writeln!(
            f,
            "  duration:  {}{}",
            format_ms(m.duration),
            format_deviation(self.analysis.duration_deviation)
        )?;
        if let Some(peak) = m.memory_peak {
            writeln!(
                f,
                "  memory:    {}{}",
                format_bytes(peak),
                format_deviation(self.analysis.memory_deviation)
            )?;
        }
        if let Some(build) = m.build_time {
            writeln!(
                f,
                "  build:     {}{}",
                format_ms(build),
                format_deviation(self.analysis.build_time_deviation)
            )?;
        }
        if let Some(baseline) = &self.baseline {
            writeln!(
                f,
                "  baseline:  {} (updated {})",
                format_ms(baseline.baseline_metrics.duration),
                baseline.last_updated.format("%Y-%m-%d %H:%M:%S UTC")
            )?;
        }
        for recommendation in &self.analysis.recommendations {
            writeln!(f, "  - {recommendation}")?;
        }
        Ok(())
    }
}

/// Directory of timestamped reports. Existing files are never overwritten.
#[derive(Debug, Clone)]
pub struct ReportStore {
    dir: PathBuf,
}

impl ReportStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn save(&self, report: &PerformanceReport) -> Result<PathBuf, PerfError> {
        let stem = format!(
            "{}__{}__{}",
            sanitize(&report.metrics.project),
            sanitize(&report.metrics.target),
            report.generated_at.format("%Y%m%dT%H%M%S%.3fZ")
        );

        let path = self.claim(&stem)?;
        write_json(&path, report)?;
        Ok(path)
    }

    /// Creates an empty file under the first free name for `stem`. Creation
    /// is exclusive, so concurrent savers never share a name.
    fn claim(&self, stem: &str) -> Result<PathBuf, PerfError> {
        let io_error = |path: &Path, source: std::io::Error| PerfError::Io {
            path: path.to_path_buf(),
            source,
        };
        fs::create_dir_all(&self.dir).map_err(|e| io_error(&self.dir, e))?;

        let mut attempt = 0;
        loop {
            let path = if attempt == 0 {
                self.dir.join(format!("{stem}.json"))
            } else {
                self.dir.join(format!("{stem}-{attempt}.json"))
            };
            match OpenOptions::new().write(true).create_new(true).open(&path) {
                Ok(_) => return Ok(path),
                Err(e) if e.kind() == ErrorKind::AlreadyExists => attempt += 1,
                Err(e) => return Err(io_error(&path, e)),
            }
        }
    }
}

fn format_ms(ms: u64) -> String {
    if ms >= 1_000 {
        format!("{:.2}s", ms as f64 / 1_000.0)
    } else {
        format!("{ms}ms")
    }
}

fn format_bytes(bytes: u64) -> String {
    format!("{:.1}MB", bytes as f64 / (1024.0 * 1024.0))
}

fn format_deviation(value: Option<f64>) -> String {
    match value {
        Some(v) => format!(" ({v:+.1}%)"),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::analyze;
    use crate::metrics::RunStatus;

    fn report() -> PerformanceReport {
        let metrics = PerformanceMetrics {
            project: "@fux/ghost-writer-ext".to_string(),
            target: "test:full".to_string(),
            start_time: Utc::now(),
            end_time: Some(Utc::now()),
            duration: 2_500,
            memory_peak: Some(32 * 1024 * 1024),
            memory_delta: Some(0),
            test_count: None,
            build_time: None,
            coverage_time: None,
            status: RunStatus::Success,
        };
        let mut baseline = PerformanceBaseline::from_metrics(&metrics);
        baseline.baseline_metrics.duration = 2_000;
        let analysis = analyze(&metrics, Some(&baseline));
        PerformanceReport {
            metrics,
            baseline: Some(baseline),
            analysis,
            generated_at: Utc::now(),
        }
    }

    #[test]
    fn renders_status_deviation_and_recommendations() {
        let text = report().to_string();
        assert!(text.contains("Performance report: @fux/ghost-writer-ext:test:full"));
        assert!(text.contains("status:    regression"));
        assert!(text.contains("2.50s (+25.0%)"));
        assert!(text.contains("32.0MB (+0.0%)"));
        assert!(text.contains("  - Duration increased by 25.0%"));
    }

    #[test]
    fn reports_never_overwrite_each_other() {
        let dir = tempfile::tempdir().unwrap();
        let store = ReportStore::new(dir.path().join("performance-reports"));
        let report = report();

        let first = store.save(&report).unwrap();
        let second = store.save(&report).unwrap();
        assert_ne!(first, second);
        assert!(first.exists() && second.exists());

        let name = first.file_name().unwrap().to_string_lossy().to_string();
        assert!(name.starts_with("fux-ghost-writer-ext__test-full__"));

        let back: PerformanceReport =
            serde_json::from_str(&std::fs::read_to_string(&first).unwrap()).unwrap();
        assert_eq!(back.analysis, report.analysis);
    }

    #[test]
    fn concurrent_saves_get_distinct_files() {
        let dir = tempfile::tempdir().unwrap();
        let store = ReportStore::new(dir.path());
        let report = report();

        let paths: Vec<PathBuf> = std::thread::scope(|scope| {
            let handles: Vec<_> = (0..8)
                .map(|_| scope.spawn(|| store.save(&report).unwrap()))
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });

        let distinct: std::collections::BTreeSet<_> = paths.iter().collect();
        assert_eq!(distinct.len(), 8);
        for path in &paths {
            let back: PerformanceReport =
                serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap();
            assert_eq!(back.metrics.project, report.metrics.project);
        }
    }
}
