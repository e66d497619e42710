use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Outcome of the monitored command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunStatus {
    Running,
    Success,
    Failure,
}

impl RunStatus {
    pub fn from_exit_code(code: i32) -> Self {
        if code == 0 {
            Self::Success
        } else {
            Self::Failure
        }
    }
}

/// Measurements for a single invocation. Durations are milliseconds,
/// memory is bytes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PerformanceMetrics {
    pub project: String,
    pub target: String,
    pub start_time: DateTime<Utc>,
    pub end_time: Option<DateTime<Utc>>,
    pub duration: u64,
    pub memory_peak: Option<u64>,
    pub memory_delta: Option<i64>,
    pub test_count: Option<u64>,
    pub build_time: Option<u64>,
    pub coverage_time: Option<u64>,
    pub status: RunStatus,
}

/// Facts about the run only the caller knows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunExtras {
    pub test_count: Option<u64>,
    /// The run collected coverage, so its duration counts as coverage time.
    pub coverage: bool,
}
