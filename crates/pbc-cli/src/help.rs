use std::fmt::Write as _;

use anyhow::Result;
use clap::CommandFactory;

use pbc_core::{resolve_project, AliasConfig};

use crate::styles::{paint, ALIAS, DESC, HEADER};
use crate::Cli;

/// Prints usage, followed by the configured aliases when a config is known.
pub fn print_help(config: Option<&AliasConfig>) -> Result<()> {
    Cli::command().print_help()?;
    println!();
    if let Some(config) = config {
        print!("{}", render_aliases(config));
    }
    Ok(())
}

/// Alias → project table plus the target shortcuts.
pub fn render_aliases(config: &AliasConfig) -> String {
    let mut out = String::new();
    let width = config
        .packages
        .keys()
        .chain(config.targets.keys())
        .chain(config.not_nx_targets.keys())
        .map(String::len)
        .max()
        .unwrap_or(0);

    let _ = writeln!(out, "\n{}", paint(HEADER, "Aliases:"));
    for (alias, value) in &config.packages {
        let resolved = resolve_project(value, config.scope());
        let full = if resolved.is_full { " (full)" } else { "" };
        let _ = writeln!(
            out,
            "  {}  {}{}",
            paint(ALIAS, &format!("{alias:<width$}")),
            resolved.project,
            paint(DESC, full)
        );
    }

    if !config.targets.is_empty() {
        let _ = writeln!(out, "\n{}", paint(HEADER, "Targets:"));
        for (short, target) in &config.targets {
            let _ = writeln!(out, "  {}  {}", paint(ALIAS, &format!("{short:<width$}")), target);
        }
    }

    if !config.not_nx_targets.is_empty() {
        let _ = writeln!(out, "\n{}", paint(HEADER, "Workspace commands:"));
        for (name, template) in &config.not_nx_targets {
            let _ = writeln!(
                out,
                "  {}  {}",
                paint(ALIAS, &format!("{name:<width$}")),
                paint(DESC, template)
            );
        }
    }

    out
}
