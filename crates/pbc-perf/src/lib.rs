//! Performance regression monitoring for `pbc` invocations.
//!
//! A [`PerformanceMonitor`] wraps one command run and produces
//! [`PerformanceMetrics`]. Metrics are compared against a per
//! project/target [`PerformanceBaseline`] kept on disk by a
//! [`BaselineStore`], yielding a [`PerformanceReport`] that can be printed
//! and persisted through a [`ReportStore`].

pub mod analysis;
pub mod baseline;
pub mod error;
pub mod memory;
pub mod metrics;
pub mod monitor;
pub mod report;
mod store;

pub use analysis::{analyze, analyze_performance, Analysis, PerformanceStatus};
pub use baseline::{BaselineMetrics, BaselineStore, PerformanceBaseline, Thresholds};
pub use error::PerfError;
pub use memory::{MemoryProbe, SysinfoProbe};
pub use metrics::{PerformanceMetrics, RunExtras, RunStatus};
pub use monitor::PerformanceMonitor;
pub use report::{PerformanceReport, ReportStore};
