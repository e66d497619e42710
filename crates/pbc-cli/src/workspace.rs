use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::debug;

use pbc_core::constants::{BASELINES_DIR, CONFIG_FILES, REPORTS_DIR};
use pbc_core::{AliasConfig, ConfigError};
use pbc_perf::{BaselineStore, ReportStore};

/// The loaded config and the directory it was found in.
#[derive(Debug)]
pub struct Workspace {
    pub root: PathBuf,
    pub config: AliasConfig,
}

impl Workspace {
    /// Loads `explicit` if given, otherwise the nearest config file above
    /// the current directory.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let path = match explicit {
            Some(path) => path.to_path_buf(),
            None => {
                let cwd = std::env::current_dir().context("failed to read current directory")?;
                AliasConfig::discover(&cwd)
                    .ok_or_else(|| ConfigError::NotFound(cwd.join(CONFIG_FILES[0])))?
            }
        };

        let config = AliasConfig::load_from_file(&path)?;
        let root = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        debug!("workspace root {}", root.display());

        Ok(Self { root, config })
    }

    pub fn baselines(&self) -> BaselineStore {
        BaselineStore::new(self.root.join(BASELINES_DIR))
    }

    pub fn reports(&self) -> ReportStore {
        ReportStore::new(self.root.join(REPORTS_DIR))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn explicit_path_sets_root_to_its_directory() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("aliases.yml");
        std::fs::write(&path, "packages:\n  dc: dynamicons\n").unwrap();

        let ws = Workspace::load(Some(&path)).unwrap();
        assert_eq!(ws.root, dir.path());
        assert_eq!(ws.config.packages.len(), 1);
        assert_eq!(ws.baselines().dir(), dir.path().join("performance-baselines"));
        assert_eq!(ws.reports().dir(), dir.path().join("performance-reports"));
    }

    #[test]
    fn missing_explicit_path_is_config_not_found() {
        let dir = tempdir().unwrap();
        let err = Workspace::load(Some(&dir.path().join("nope.json"))).expect_err("must fail");
        assert!(matches!(
            err.downcast_ref::<ConfigError>(),
            Some(ConfigError::NotFound(_))
        ));
    }
}
