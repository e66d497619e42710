//! Fan-out groups (`core`, `ext`, `all`): one target across many projects.
//!
//! Parallel scheduling is left to the build tool; this module only decides
//! which projects take part and which flags it is given.

use std::collections::BTreeSet;

use tracing::{debug, instrument};

use crate::action::ExecutionAction;
use crate::classify::FanoutKind;
use crate::config::AliasConfig;
use crate::constants::{SEQUENTIAL_TARGET, STREAMED_TARGETS};
use crate::error::DispatchError;
use crate::expand::{expand_flags, expand_target_shortcuts};
use crate::plan::Plan;
use crate::resolve::resolve_project;

const OUTPUT_STREAM_FLAG: &str = "--output-style=stream";
const SEQUENTIAL_FLAG: &str = "--parallel=false";

/// Every distinct configured project that belongs to `kind`, sorted.
pub fn collect_projects(kind: FanoutKind, config: &AliasConfig) -> Vec<String> {
    config
        .packages
        .values()
        .map(|value| resolve_project(value, config.scope()).project)
        .filter(|project| kind.matches(project))
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Adds the output-style and sequential flags some long-running targets
/// need. Applying it to its own output changes nothing.
pub fn inject_fanout_flags(target: &str, flags: &[String]) -> Vec<String> {
    let mut out = flags.to_vec();

    if STREAMED_TARGETS.contains(&target) && !has_flag(&out, "--output-style") {
        out.push(OUTPUT_STREAM_FLAG.to_string());
    }
    if target == SEQUENTIAL_TARGET && !has_flag(&out, "--parallel") {
        out.push(SEQUENTIAL_FLAG.to_string());
    }

    out
}

/// Plans `<core|ext|all> <target> [flags...]`.
#[instrument(skip(config))]
pub fn plan_run_many(
    kind: FanoutKind,
    args: &[String],
    config: &AliasConfig,
) -> Result<Plan, DispatchError> {
    let args = expand_target_shortcuts(args, &config.targets);
    let (target, rest) = args
        .split_first()
        .ok_or(DispatchError::NoCommandProvided)?;

    let projects = collect_projects(kind, config);
    if projects.is_empty() {
        return Err(DispatchError::EmptyFanoutGroup(kind.to_string()));
    }

    let flags = inject_fanout_flags(target, &expand_flags(rest, &config.expandables));
    let mut nx_args = vec![
        "run-many".to_string(),
        format!("--target={target}"),
        format!("--projects={}", projects.join(",")),
    ];
    if !has_flag(&flags, "--parallel") {
        nx_args.push(format!("--parallel={}", projects.len()));
    }
    debug!("{} {} projects selected for {}", projects.len(), kind, target);

    Ok(Plan {
        project: kind.to_string(),
        target: target.clone(),
        action: ExecutionAction::nx(nx_args).with_args(flags),
    })
}

/// True when `flags` carries `name` either bare or as `name=value`.
fn has_flag(flags: &[String], name: &str) -> bool {
    flags.iter().any(|flag| {
        flag.strip_prefix(name)
            .is_some_and(|rest| rest.is_empty() || rest.starts_with('='))
    })
}
