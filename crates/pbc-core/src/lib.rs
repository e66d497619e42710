//! Core logic for the `pbc` workspace-command dispatcher.
//!
//! This crate loads the alias configuration, expands shorthand targets and
//! flags, classifies the alias token and turns it into an [`ExecutionAction`]
//! ready to be handed to the monorepo build tool or a workspace command.

pub mod action;
pub mod classify;
pub mod config;
pub mod constants;
pub mod error;
pub mod expand;
pub mod fanout;
pub mod plan;
pub mod resolve;

pub use action::ExecutionAction;
pub use classify::{classify, Classification, FanoutKind};
pub use config::{AliasConfig, AliasRecord, AliasValue, ConfigFormat, ProjectSuffix};
pub use error::{ConfigError, DispatchError};
pub use expand::{expand_flags, expand_target_shortcuts, normalize_full_semantics};
pub use fanout::{collect_projects, inject_fanout_flags, plan_run_many};
pub use plan::{plan_package, plan_workspace_command, Plan};
pub use resolve::{resolve_project, resolve_project_with_target, ResolvedProject};
