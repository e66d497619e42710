use std::path::PathBuf;

use thiserror::Error;

/// Failures while locating or parsing the alias configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found: {0}")]
    NotFound(PathBuf),
    #[error("failed to read config file '{path}'")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config file '{path}': {message}")]
    Parse { path: PathBuf, message: String },
    #[error("config file '{0}' has no 'packages' section")]
    MissingPackages(PathBuf),
}

/// Failures while turning an alias into something runnable.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DispatchError {
    #[error("Alias '{0}' is not defined.")]
    UnknownAlias(String),
    #[error("No command provided.")]
    NoCommandProvided,
    #[error("No {0} projects found.")]
    EmptyFanoutGroup(String),
    #[error("command exited with code {code}")]
    ChildProcessFailure { code: i32 },
    #[error("performance regression in {project}:{target}")]
    PerformanceRegression { project: String, target: String },
}
