//! Single-step classification of the alias token.
//!
//! Matchers are tried in order; the first one that recognises the token
//! decides the branch. An unrecognised token is an [`DispatchError::UnknownAlias`].

use std::fmt::{Display, Formatter};
use std::str::FromStr;

use tracing::debug;

use crate::config::{AliasConfig, AliasValue};
use crate::constants::HELP_TOKENS;
use crate::error::DispatchError;

/// A fan-out group: every package of one variant, or all of them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FanoutKind {
    Core,
    Ext,
    All,
}

impl FanoutKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Core => "core",
            Self::Ext => "ext",
            Self::All => "all",
        }
    }

    /// Whether a resolved project id belongs to this group.
    pub fn matches(self, project: &str) -> bool {
        match self {
            Self::Core => project.ends_with("-core"),
            Self::Ext => project.ends_with("-ext"),
            Self::All => true,
        }
    }
}

impl Display for FanoutKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FanoutKind {
    type Err = ();

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "core" => Ok(Self::Core),
            "ext" => Ok(Self::Ext),
            "all" => Ok(Self::All),
            _ => Err(()),
        }
    }
}

/// What an alias token denotes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Classification {
    Fanout(FanoutKind),
    Help,
    Package { alias: String, value: AliasValue },
    /// A workspace-level command named directly by the alias.
    WorkspaceCommand { name: String, template: String },
}

type Matcher = fn(&str, &AliasConfig) -> Option<Classification>;

/// Priority order: fan-out, help, package, workspace command.
const MATCHERS: &[(&str, Matcher)] = &[
    ("fanout", match_fanout),
    ("help", match_help),
    ("package", match_package),
    ("workspace-command", match_workspace_command),
];

pub fn classify(alias: &str, config: &AliasConfig) -> Result<Classification, DispatchError> {
    for (name, matcher) in MATCHERS {
        if let Some(found) = matcher(alias, config) {
            debug!("alias '{}' classified by {} matcher", alias, name);
            return Ok(found);
        }
    }
    Err(DispatchError::UnknownAlias(alias.to_string()))
}

fn match_fanout(alias: &str, _config: &AliasConfig) -> Option<Classification> {
    FanoutKind::from_str(alias).ok().map(Classification::Fanout)
}

fn match_help(alias: &str, _config: &AliasConfig) -> Option<Classification> {
    HELP_TOKENS.contains(&alias).then_some(Classification::Help)
}

fn match_package(alias: &str, config: &AliasConfig) -> Option<Classification> {
    config
        .packages
        .get(alias)
        .map(|value| Classification::Package {
            alias: alias.to_string(),
            value: value.clone(),
        })
}

fn match_workspace_command(alias: &str, config: &AliasConfig) -> Option<Classification> {
    config
        .not_nx_targets
        .get(alias)
        .map(|template| Classification::WorkspaceCommand {
            name: alias.to_string(),
            template: template.clone(),
        })
}
