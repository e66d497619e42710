use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::constants::{CONFIG_FILES, DEFAULT_SCOPE};
use crate::error::ConfigError;

/// The alias configuration for one invocation.
///
/// Loaded once, then only ever borrowed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AliasConfig {
    pub scope: Option<String>,
    pub packages: BTreeMap<String, AliasValue>,
    pub targets: BTreeMap<String, String>,
    pub not_nx_targets: BTreeMap<String, String>,
    pub expandables: BTreeMap<String, String>,
}

/// On-disk shape. `packages` is optional here only so its absence can be
/// reported as its own error instead of a generic parse failure.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "kebab-case")]
struct RawConfig {
    scope: Option<String>,
    packages: Option<BTreeMap<String, AliasValue>>,
    #[serde(default)]
    targets: BTreeMap<String, String>,
    #[serde(default)]
    not_nx_targets: BTreeMap<String, String>,
    #[serde(default)]
    expandables: BTreeMap<String, String>,
}

/// What an alias in `packages` points to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AliasValue {
    /// Bare package name, with or without a scope.
    Simple(String),
    Structured(AliasRecord),
}

impl AliasValue {
    /// The package name without its scope.
    pub fn package_name(&self) -> &str {
        let name = match self {
            Self::Simple(name) => name,
            Self::Structured(record) => &record.name,
        };
        name.rsplit('/').next().unwrap_or(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AliasRecord {
    pub name: String,
    #[serde(default)]
    pub suffix: Option<ProjectSuffix>,
    #[serde(default)]
    pub full: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProjectSuffix {
    Core,
    Ext,
}

impl ProjectSuffix {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Core => "core",
            Self::Ext => "ext",
        }
    }
}

/// Serialization format of a config file, picked from its extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    JsonWithComments,
    Yaml,
    Toml,
}

impl ConfigFormat {
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("yaml") | Some("yml") => Self::Yaml,
            Some("toml") => Self::Toml,
            _ => Self::JsonWithComments,
        }
    }
}

impl AliasConfig {
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        if !path.is_file() {
            return Err(ConfigError::NotFound(path.to_path_buf()));
        }
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        debug!("loaded config text from {}", path.display());
        Self::parse(&text, ConfigFormat::from_path(path), path)
    }

    /// Parses config text; `origin` is only used in error messages.
    pub fn parse(text: &str, format: ConfigFormat, origin: &Path) -> Result<Self, ConfigError> {
        let parse_error = |message: String| ConfigError::Parse {
            path: origin.to_path_buf(),
            message,
        };

        let raw: RawConfig = match format {
            ConfigFormat::JsonWithComments => {
                serde_json5::from_str(text).map_err(|e| parse_error(e.to_string()))?
            }
            ConfigFormat::Yaml => {
                serde_yaml::from_str(text).map_err(|e| parse_error(e.to_string()))?
            }
            ConfigFormat::Toml => toml::from_str(text).map_err(|e| parse_error(e.to_string()))?,
        };

        let packages = raw
            .packages
            .ok_or_else(|| ConfigError::MissingPackages(origin.to_path_buf()))?;

        Ok(Self {
            scope: raw.scope,
            packages,
            targets: raw.targets,
            not_nx_targets: raw.not_nx_targets,
            expandables: raw.expandables,
        })
    }

    /// Walks from `start` up to the filesystem root and returns the first
    /// config file found.
    pub fn discover(start: &Path) -> Option<PathBuf> {
        start.ancestors().find_map(|dir| {
            CONFIG_FILES
                .iter()
                .map(|name| dir.join(name))
                .find(|candidate| candidate.is_file())
        })
    }

    pub fn scope(&self) -> &str {
        self.scope.as_deref().unwrap_or(DEFAULT_SCOPE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn parses_json_with_comments_and_defaults_missing_sections() {
        let text = r#"{
            // short aliases
            "packages": {
                "pbc": "project-alias-expander",
                "dc": { "name": "dynamicons", "suffix": "core" },
                "gw": { "name": "ghost-writer", "suffix": "ext", "full": true },
            },
        }"#;
        let cfg = AliasConfig::parse(text, ConfigFormat::JsonWithComments, Path::new("x.json"))
            .expect("jsonc should parse");

        assert_eq!(
            cfg.packages.get("pbc"),
            Some(&AliasValue::Simple("project-alias-expander".to_string()))
        );
        assert_eq!(
            cfg.packages.get("gw"),
            Some(&AliasValue::Structured(AliasRecord {
                name: "ghost-writer".to_string(),
                suffix: Some(ProjectSuffix::Ext),
                full: true,
            }))
        );
        assert!(cfg.targets.is_empty());
        assert!(cfg.not_nx_targets.is_empty());
        assert!(cfg.expandables.is_empty());
        assert_eq!(cfg.scope(), DEFAULT_SCOPE);
    }

    #[test]
    fn parses_yaml_sections() {
        let text = r#"
packages:
  dc:
    name: dynamicons
    suffix: core
targets:
  b: build
  tc: test --coverage
not-nx-targets:
  esv: npx esv {project}
expandables:
  f: fix
"#;
        let cfg = AliasConfig::parse(text, ConfigFormat::Yaml, Path::new("x.yaml"))
            .expect("yaml should parse");
        assert_eq!(cfg.targets.get("tc").map(String::as_str), Some("test --coverage"));
        assert_eq!(
            cfg.not_nx_targets.get("esv").map(String::as_str),
            Some("npx esv {project}")
        );
        assert_eq!(cfg.expandables.get("f").map(String::as_str), Some("fix"));
    }

    #[test]
    fn parses_toml_with_custom_scope() {
        let text = r#"
scope = "@acme"

[packages]
ui = "ui-kit"
"#;
        let cfg = AliasConfig::parse(text, ConfigFormat::Toml, Path::new("x.toml"))
            .expect("toml should parse");
        assert_eq!(cfg.scope(), "@acme");
        assert_eq!(cfg.packages.len(), 1);
    }

    #[test]
    fn missing_packages_is_rejected() {
        let err = AliasConfig::parse(r#"{ "targets": {} }"#, ConfigFormat::JsonWithComments, Path::new("x.json"))
            .expect_err("must fail");
        assert!(matches!(err, ConfigError::MissingPackages(_)));
    }

    #[test]
    fn malformed_content_is_a_parse_error() {
        let err = AliasConfig::parse("{ packages: ", ConfigFormat::JsonWithComments, Path::new("x.json"))
            .expect_err("must fail");
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn missing_file_is_not_found() {
        let dir = tempdir().unwrap();
        let err = AliasConfig::load_from_file(&dir.path().join(".pbc.json")).expect_err("must fail");
        assert!(matches!(err, ConfigError::NotFound(_)));
    }

    #[test]
    fn discover_walks_up_to_workspace_root() {
        let dir = tempdir().unwrap();
        let nested = dir.path().join("packages").join("dynamicons").join("core");
        std::fs::create_dir_all(&nested).unwrap();
        std::fs::write(dir.path().join(".pbc.yaml"), "packages: {}\n").unwrap();

        let found = AliasConfig::discover(&nested).expect("config should be found");
        assert_eq!(found, dir.path().join(".pbc.yaml"));

        let cfg = AliasConfig::load_from_file(&found).expect("config should load");
        assert!(cfg.packages.is_empty());
    }
}
