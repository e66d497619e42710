//! Control tokens that steer `pbc` itself and are never forwarded.

use pbc_core::constants::{ECHO_FLAG, PERF_BASELINE_FLAG, PERF_CHECK_FLAG, PERF_VALIDATE_FLAG};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PerformanceMode {
    /// Record the run as the new baseline.
    Baseline,
    /// Compare against the baseline and report.
    Check,
    /// Like `Check`, and a regression fails the invocation.
    Validate,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ControlFlags {
    pub echo: bool,
    pub performance: Option<PerformanceMode>,
}

/// Splits control tokens out of `args`. When several performance flags are
/// given the last one wins.
pub fn extract_control_flags(args: &[String]) -> (ControlFlags, Vec<String>) {
    let mut flags = ControlFlags::default();
    let mut forwarded = Vec::with_capacity(args.len());

    for arg in args {
        match arg.as_str() {
            ECHO_FLAG => flags.echo = true,
            PERF_BASELINE_FLAG => flags.performance = Some(PerformanceMode::Baseline),
            PERF_CHECK_FLAG => flags.performance = Some(PerformanceMode::Check),
            PERF_VALIDATE_FLAG => flags.performance = Some(PerformanceMode::Validate),
            _ => forwarded.push(arg.clone()),
        }
    }

    (flags, forwarded)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| (*s).to_string()).collect()
    }

    #[test]
    fn control_tokens_are_stripped() {
        let (flags, forwarded) = extract_control_flags(&args(&[
            "dc",
            "--aka-echo",
            "b",
            "--performance-check",
            "-f",
        ]));
        assert!(flags.echo);
        assert_eq!(flags.performance, Some(PerformanceMode::Check));
        assert_eq!(forwarded, args(&["dc", "b", "-f"]));
    }

    #[test]
    fn last_performance_flag_wins() {
        let (flags, _) = extract_control_flags(&args(&[
            "--performance-validate",
            "--performance-baseline",
        ]));
        assert_eq!(flags.performance, Some(PerformanceMode::Baseline));
    }

    #[test]
    fn plain_arguments_leave_flags_unset() {
        let input = args(&["dc", "build", "--skip-nx-cache"]);
        let (flags, forwarded) = extract_control_flags(&input);
        assert_eq!(flags, ControlFlags::default());
        assert_eq!(forwarded, input);
    }
}
