//! Wraps one execution with performance monitoring.

use anyhow::Result;
use tracing::{debug, warn};

use pbc_core::{DispatchError, Plan};
use pbc_perf::{
    analyze_performance, BaselineStore, PerformanceBaseline, PerformanceMonitor,
    PerformanceStatus, ReportStore, RunExtras, RunStatus,
};

use crate::control::PerformanceMode;
use crate::executor::{Executor, ProcessRunner};

/// Where baselines are read from and reports written to.
pub struct PerfStores {
    pub baselines: BaselineStore,
    pub reports: ReportStore,
}

/// Runs `plan` under a [`PerformanceMonitor`].
///
/// Persistence failures are logged and never change the exit code. In
/// `Validate` mode a regression on an otherwise successful run exits 1.
pub fn run_with_performance<R: ProcessRunner>(
    executor: &Executor<R>,
    plan: &Plan,
    mode: PerformanceMode,
    stores: &PerfStores,
) -> Result<i32> {
    if executor.is_dry_run() {
        debug!("dry run, performance monitoring skipped");
        return executor.run(&plan.action);
    }

    let mut monitor = PerformanceMonitor::new();
    if let Err(e) = monitor.start_monitoring(&plan.project, &plan.target) {
        warn!("performance monitoring unavailable: {}", e);
        return executor.run(&plan.action);
    }

    let code = executor.run(&plan.action)?;

    let extras = RunExtras {
        test_count: None,
        coverage: plan.action.args.iter().any(|arg| arg == "--coverage"),
    };
    let metrics = match monitor.end_monitoring(RunStatus::from_exit_code(code), extras) {
        Ok(metrics) => metrics.clone(),
        Err(e) => {
            warn!("performance monitoring failed: {}", e);
            return Ok(code);
        }
    };

    match mode {
        PerformanceMode::Baseline => {
            if code != 0 {
                warn!(
                    "{}:{} failed, baseline not updated",
                    metrics.project, metrics.target
                );
                return Ok(code);
            }
            let baseline = PerformanceBaseline::from_metrics(&metrics);
            match stores.baselines.save(&baseline) {
                Ok(path) => println!("Performance baseline saved to {}", path.display()),
                Err(e) => warn!("failed to save performance baseline: {:#}", anyhow::Error::from(e)),
            }
            Ok(code)
        }
        PerformanceMode::Check | PerformanceMode::Validate => {
            let report = match analyze_performance(&stores.baselines, &metrics) {
                Ok(report) => report,
                Err(e) => {
                    warn!("performance analysis failed: {:#}", anyhow::Error::from(e));
                    return Ok(code);
                }
            };
            print!("{report}");
            match stores.reports.save(&report) {
                Ok(path) => debug!("performance report written to {}", path.display()),
                Err(e) => warn!("failed to save performance report: {:#}", anyhow::Error::from(e)),
            }

            let regressed = report.analysis.status == PerformanceStatus::Regression;
            if mode == PerformanceMode::Validate && regressed && code == 0 {
                return Err(DispatchError::PerformanceRegression {
                    project: metrics.project,
                    target: metrics.target,
                }
                .into());
            }
            Ok(code)
        }
    }
}
