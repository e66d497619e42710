//! Turns a classified alias plus its trailing arguments into an
//! [`ExecutionAction`].

use tracing::{debug, instrument};

use crate::action::ExecutionAction;
use crate::config::{AliasConfig, AliasValue};
use crate::error::DispatchError;
use crate::expand::{expand_flags, expand_target_shortcuts, normalize_full_semantics};
use crate::resolve::resolve_project_with_target;

/// A resolved invocation together with the identity the performance
/// monitor records it under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Plan {
    pub project: String,
    pub target: String,
    pub action: ExecutionAction,
}

/// Plans `<alias> <target> [flags...]` for a package alias.
///
/// The target goes through shortcut expansion and the `full` rewrite; if the
/// final target names a `not-nx-targets` entry, that command template runs
/// instead of the build tool.
#[instrument(skip(value, config))]
pub fn plan_package(
    value: &AliasValue,
    args: &[String],
    config: &AliasConfig,
) -> Result<Plan, DispatchError> {
    let args = expand_target_shortcuts(args, &config.targets);
    let (raw_target, rest) = args
        .split_first()
        .ok_or(DispatchError::NoCommandProvided)?;

    let resolved = resolve_project_with_target(value, config.scope(), Some(raw_target));
    let target = normalize_full_semantics(resolved.is_full, raw_target);
    let flags = expand_flags(rest, &config.expandables);

    let action = match config.not_nx_targets.get(&target) {
        Some(template) => {
            debug!("target '{}' runs as a workspace command", target);
            ExecutionAction::from_template(template, &resolved.project, value.package_name())
                .ok_or(DispatchError::NoCommandProvided)?
                .with_args(flags)
        }
        None => ExecutionAction::nx(vec![target.clone(), resolved.project.clone()]).with_args(flags),
    };

    Ok(Plan {
        project: resolved.project,
        target,
        action,
    })
}

/// Plans an alias that names a `not-nx-targets` entry directly.
pub fn plan_workspace_command(
    name: &str,
    template: &str,
    args: &[String],
    config: &AliasConfig,
) -> Result<Plan, DispatchError> {
    let flags = expand_flags(args, &config.expandables);
    let action = ExecutionAction::from_template(template, "", name)
        .ok_or(DispatchError::NoCommandProvided)?
        .with_args(flags);

    Ok(Plan {
        project: "workspace".to_string(),
        target: name.to_string(),
        action,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{AliasRecord, ProjectSuffix};

    fn args(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| (*s).to_string()).collect()
    }

    fn config() -> AliasConfig {
        let mut cfg = AliasConfig::default();
        cfg.scope = Some("@fux".to_string());
        cfg.targets.insert("b".to_string(), "build".to_string());
        cfg.targets.insert("l".to_string(), "lint".to_string());
        cfg.targets
            .insert("tc".to_string(), "test --coverage".to_string());
        cfg.not_nx_targets.insert(
            "audit".to_string(),
            "npx tsx scripts/audit.ts {project}".to_string(),
        );
        cfg.expandables.insert("f".to_string(), "fix".to_string());
        cfg.expandables
            .insert("s".to_string(), "skip-nx-cache".to_string());
        cfg
    }

    fn dynamicons(full: bool) -> AliasValue {
        AliasValue::Structured(AliasRecord {
            name: "dynamicons".to_string(),
            suffix: Some(ProjectSuffix::Core),
            full,
        })
    }

    #[test]
    fn package_alias_becomes_nx_invocation() {
        let plan = plan_package(&dynamicons(false), &args(&["b", "-fs", "--verbose"]), &config())
            .expect("plan should resolve");
        assert_eq!(plan.project, "@fux/dynamicons-core");
        assert_eq!(plan.target, "build");
        assert_eq!(
            plan.action.to_string(),
            "nx build @fux/dynamicons-core --fix --skip-nx-cache --verbose"
        );
    }

    #[test]
    fn full_alias_rewrites_expanded_target() {
        let plan = plan_package(&dynamicons(true), &args(&["l"]), &config())
            .expect("plan should resolve");
        assert_eq!(plan.target, "lint:full");
        assert_eq!(plan.action.args, args(&["lint:full", "@fux/dynamicons-core"]));
    }

    #[test]
    fn compound_shortcut_contributes_flags() {
        let plan = plan_package(&dynamicons(false), &args(&["tc"]), &config())
            .expect("plan should resolve");
        assert_eq!(
            plan.action.args,
            args(&["test", "@fux/dynamicons-core", "--coverage"])
        );
    }

    #[test]
    fn integration_target_runs_against_ext_variant() {
        let plan = plan_package(&dynamicons(false), &args(&["test:integration"]), &config())
            .expect("plan should resolve");
        assert_eq!(plan.project, "@fux/dynamicons-ext");
    }

    #[test]
    fn non_nx_target_uses_command_template() {
        let plan = plan_package(&dynamicons(false), &args(&["audit", "-f"]), &config())
            .expect("plan should resolve");
        assert_eq!(
            plan.action.to_string(),
            "npx tsx scripts/audit.ts @fux/dynamicons-core --fix"
        );
    }

    #[test]
    fn missing_target_is_reported() {
        let err = plan_package(&dynamicons(false), &[], &config()).expect_err("must fail");
        assert_eq!(err, DispatchError::NoCommandProvided);
    }

    #[test]
    fn workspace_command_drops_project_placeholder() {
        let plan = plan_workspace_command(
            "audit",
            "npx tsx scripts/audit.ts {project}",
            &args(&["-s"]),
            &config(),
        )
        .expect("plan should resolve");
        assert_eq!(
            plan.action.to_string(),
            "npx tsx scripts/audit.ts --skip-nx-cache"
        );
        assert_eq!(plan.target, "audit");
    }
}
