//! Per project/target performance baselines.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::error::PerfError;
use crate::metrics::PerformanceMetrics;
use crate::store::{read_json, sanitize, write_json};

/// Reference values a run is compared against.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BaselineMetrics {
    pub duration: u64,
    pub test_count: Option<u64>,
    pub memory_peak: Option<u64>,
    pub build_time: Option<u64>,
    pub coverage_time: Option<u64>,
}

/// Allowed increase over the baseline, in percent, before a run counts as
/// a regression.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Thresholds {
    pub duration: f64,
    pub memory_peak: f64,
    pub build_time: f64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            duration: 20.0,
            memory_peak: 30.0,
            build_time: 25.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PerformanceBaseline {
    pub project: String,
    pub target: String,
    pub baseline_metrics: BaselineMetrics,
    pub thresholds: Thresholds,
    pub last_updated: DateTime<Utc>,
    pub version: String,
}

impl PerformanceBaseline {
    /// A fresh baseline from one run, with default thresholds.
    pub fn from_metrics(metrics: &PerformanceMetrics) -> Self {
        Self {
            project: metrics.project.clone(),
            target: metrics.target.clone(),
            baseline_metrics: BaselineMetrics {
                duration: metrics.duration,
                test_count: metrics.test_count,
                memory_peak: metrics.memory_peak,
                build_time: metrics.build_time,
                coverage_time: metrics.coverage_time,
            },
            thresholds: Thresholds::default(),
            last_updated: Utc::now(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

/// Directory of baseline files, one per project/target pair.
///
/// Saving overwrites; concurrent writers race and the last one wins. File
/// names are not injective, so `load` only returns a baseline recorded for
/// the exact project/target it was asked for.
#[derive(Debug, Clone)]
pub struct BaselineStore {
    dir: PathBuf,
}

impl BaselineStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_for(&self, project: &str, target: &str) -> PathBuf {
        self.dir
            .join(format!("{}__{}.json", sanitize(project), sanitize(target)))
    }

    #[instrument(skip(self))]
    pub fn load(&self, project: &str, target: &str) -> Result<Option<PerformanceBaseline>, PerfError> {
        let path = self.path_for(project, target);
        let baseline: Option<PerformanceBaseline> = read_json(&path)?;
        let baseline = baseline.filter(|b| b.project == project && b.target == target);
        debug!("baseline at {} present: {}", path.display(), baseline.is_some());
        Ok(baseline)
    }

    pub fn save(&self, baseline: &PerformanceBaseline) -> Result<PathBuf, PerfError> {
        let path = self.path_for(&baseline.project, &baseline.target);
        write_json(&path, baseline)?;
        Ok(path)
    }
}
