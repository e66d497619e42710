use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PerfError {
    #[error("i/o failure on '{path}'")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid performance JSON in '{path}'")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("performance monitor is {0}")]
    InvalidState(&'static str),
}
