use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::PerfError;

/// Reads a JSON file, `Ok(None)` if it does not exist.
pub(crate) fn read_json<T: DeserializeOwned>(path: &Path) -> Result<Option<T>, PerfError> {
    let text = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(source) => {
            return Err(PerfError::Io {
                path: path.to_path_buf(),
                source,
            })
        }
    };
    serde_json::from_str(&text)
        .map(Some)
        .map_err(|source| PerfError::Json {
            path: path.to_path_buf(),
            source,
        })
}

/// Writes pretty JSON through a temporary sibling and a rename, creating
/// parent directories as needed.
pub(crate) fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<(), PerfError> {
    let io_error = |source: std::io::Error| PerfError::Io {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(io_error)?;
    }
    let content = serde_json::to_string_pretty(value).map_err(|source| PerfError::Json {
        path: path.to_path_buf(),
        source,
    })?;

    let tmp = temp_sibling(path);
    if let Err(source) = fs::write(&tmp, content) {
        let _ = fs::remove_file(&tmp);
        return Err(io_error(source));
    }
    fs::rename(&tmp, path).map_err(|source| {
        let _ = fs::remove_file(&tmp);
        io_error(source)
    })
}

/// A temporary path next to `path`, unique per process and per call.
fn temp_sibling(path: &Path) -> PathBuf {
    static NEXT: AtomicU64 = AtomicU64::new(0);
    let n = NEXT.fetch_add(1, Ordering::Relaxed);
    let name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    path.with_file_name(format!(".{name}.{}.{n}.tmp", std::process::id()))
}

/// File-name safe form of a project or target id.
pub(crate) fn sanitize(value: &str) -> String {
    value
        .trim_start_matches('@')
        .chars()
        .map(|c| match c {
            '/' | ':' | '\\' | '@' | ' ' => '-',
            other => other,
        })
        .collect()
}
