use crate::config::{AliasValue, ProjectSuffix};
use crate::constants::INTEGRATION_TARGET;

/// A fully-qualified project id plus whether the alias asked for the
/// `:full` target variants.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedProject {
    pub project: String,
    pub is_full: bool,
}

/// Resolves an alias value to `<scope>/<name>[-<suffix>]`.
pub fn resolve_project(value: &AliasValue, scope: &str) -> ResolvedProject {
    resolve_project_with_target(value, scope, None)
}

/// Like [`resolve_project`], but `test:integration` always runs against the
/// `-ext` variant of a structured alias.
pub fn resolve_project_with_target(
    value: &AliasValue,
    scope: &str,
    target: Option<&str>,
) -> ResolvedProject {
    match value {
        AliasValue::Simple(name) => ResolvedProject {
            project: scoped(name, scope),
            is_full: false,
        },
        AliasValue::Structured(record) => {
            let suffix = if target == Some(INTEGRATION_TARGET) {
                Some(ProjectSuffix::Ext)
            } else {
                record.suffix
            };
            let base = scoped(&record.name, scope);
            let project = match suffix {
                Some(suffix) => format!("{base}-{}", suffix.as_str()),
                None => base,
            };
            ResolvedProject {
                project,
                is_full: record.full,
            }
        }
    }
}

fn scoped(name: &str, scope: &str) -> String {
    if name.starts_with('@') {
        name.to_string()
    } else {
        format!("{scope}/{name}")
    }
}
