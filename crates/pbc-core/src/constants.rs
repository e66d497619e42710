//! Constants used across the pbc workspace.

/// Config file names probed, in order, in every directory from the current
/// one up to the filesystem root.
pub const CONFIG_FILES: &[&str] = &[
    ".pbc.json",
    ".pbc.jsonc",
    ".pbc.yaml",
    ".pbc.yml",
    ".pbc.toml",
];

/// Scope prefixed to package names that do not carry one.
pub const DEFAULT_SCOPE: &str = "@fux";

/// The monorepo build tool binary.
pub const NX_BIN: &str = "nx";

/// Tokens that print usage instead of dispatching.
pub const HELP_TOKENS: &[&str] = &["-h", "--help", "help", ""];

/// Control token toggling dry-run mode for a single invocation.
pub const ECHO_FLAG: &str = "--aka-echo";

pub const PERF_BASELINE_FLAG: &str = "--performance-baseline";
pub const PERF_CHECK_FLAG: &str = "--performance-check";
pub const PERF_VALIDATE_FLAG: &str = "--performance-validate";

/// Workspace-relative directory holding one baseline file per project/target.
pub const BASELINES_DIR: &str = "performance-baselines";

/// Workspace-relative directory holding timestamped performance reports.
pub const REPORTS_DIR: &str = "performance-reports";

/// Target that forces the extension variant of a package.
pub const INTEGRATION_TARGET: &str = "test:integration";

/// Fan-out targets that stream their output unless told otherwise.
pub const STREAMED_TARGETS: &[&str] = &["test:full", "validate:full", "lint:full"];

/// Fan-out target that must run sequentially.
pub const SEQUENTIAL_TARGET: &str = "validate:full";
