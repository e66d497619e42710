//! Comparison of a run against its baseline.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::baseline::{BaselineStore, PerformanceBaseline};
use crate::error::PerfError;
use crate::metrics::PerformanceMetrics;
use crate::report::PerformanceReport;

/// Duration deviation (percent) below which a run counts as an improvement.
const DURATION_IMPROVEMENT: f64 = -10.0;
/// Memory deviation (percent) below which a run counts as an improvement.
const MEMORY_IMPROVEMENT: f64 = -15.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PerformanceStatus {
    NoBaseline,
    Regression,
    Improvement,
    WithinThreshold,
}

impl PerformanceStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::NoBaseline => "no_baseline",
            Self::Regression => "regression",
            Self::Improvement => "improvement",
            Self::WithinThreshold => "within_threshold",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Analysis {
    pub duration_deviation: Option<f64>,
    pub memory_deviation: Option<f64>,
    pub build_time_deviation: Option<f64>,
    pub status: PerformanceStatus,
    pub recommendations: Vec<String>,
}

/// Loads the baseline for the run's project/target and analyses against it.
#[instrument(skip_all, fields(project = %metrics.project, target = %metrics.target))]
pub fn analyze_performance(
    store: &BaselineStore,
    metrics: &PerformanceMetrics,
) -> Result<PerformanceReport, PerfError> {
    let baseline = store.load(&metrics.project, &metrics.target)?;
    let analysis = analyze(metrics, baseline.as_ref());
    Ok(PerformanceReport {
        metrics: metrics.clone(),
        baseline,
        analysis,
        generated_at: Utc::now(),
    })
}

/// Percent deviation of each metric from the baseline and the resulting
/// classification.
pub fn analyze(metrics: &PerformanceMetrics, baseline: Option<&PerformanceBaseline>) -> Analysis {
    let Some(baseline) = baseline else {
        return Analysis {
            duration_deviation: None,
            memory_deviation: None,
            build_time_deviation: None,
            status: PerformanceStatus::NoBaseline,
            recommendations: vec![format!(
                "No baseline found for {}:{}. Run with --performance-baseline to establish one.",
                metrics.project, metrics.target
            )],
        };
    };

    let reference = &baseline.baseline_metrics;
    let thresholds = &baseline.thresholds;

    let duration = deviation(Some(metrics.duration), Some(reference.duration));
    let memory = deviation(metrics.memory_peak, reference.memory_peak);
    let build_time = deviation(metrics.build_time, reference.build_time);

    let checks = [
        ("Duration", duration, thresholds.duration),
        ("Peak memory", memory, thresholds.memory_peak),
        ("Build time", build_time, thresholds.build_time),
    ];

    let mut recommendations = Vec::new();
    for (label, value, threshold) in checks {
        if let Some(value) = value.filter(|v| *v > threshold) {
            recommendations.push(format!(
                "{label} increased by {value:.1}% (threshold {threshold:.0}%). Investigate recent changes to {}:{}.",
                metrics.project, metrics.target
            ));
        }
    }
    let regressed = !recommendations.is_empty();

    let status = if regressed {
        PerformanceStatus::Regression
    } else {
        let improvements = [
            ("Duration", duration, DURATION_IMPROVEMENT),
            ("Peak memory", memory, MEMORY_IMPROVEMENT),
        ];
        for (label, value, limit) in improvements {
            if let Some(value) = value.filter(|v| *v < limit) {
                recommendations.push(format!(
                    "{label} improved by {:.1}% (threshold {limit:.0}%). Consider refreshing the baseline with --performance-baseline.",
                    value.abs()
                ));
            }
        }
        if recommendations.is_empty() {
            PerformanceStatus::WithinThreshold
        } else {
            PerformanceStatus::Improvement
        }
    };

    Analysis {
        duration_deviation: duration,
        memory_deviation: memory,
        build_time_deviation: build_time,
        status,
        recommendations,
    }
}

/// `(current - baseline) / baseline * 100`, when both exist and the
/// baseline is non-zero.
fn deviation(current: Option<u64>, baseline: Option<u64>) -> Option<f64> {
    match (current, baseline) {
        (Some(current), Some(baseline)) if baseline > 0 => {
            Some((current as f64 - baseline as f64) / baseline as f64 * 100.0)
        }
        _ => None,
    }
}
