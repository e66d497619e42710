use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;

use pbc_core::{
    classify, plan_package, plan_run_many, plan_workspace_command, AliasConfig, Classification,
    DispatchError,
};
use tracing::debug;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod control;
mod executor;
mod help;
mod perf;
mod styles;
mod workspace;

use control::extract_control_flags;
use executor::{ExecutionContext, Executor, SystemRunner};
use perf::PerfStores;
use styles as s;
use workspace::Workspace;

/// The command-line interface for pbc.
#[derive(Debug, Parser)]
#[command(name = "pbc")]
#[command(version)]
#[command(styles = s::get_clap_styles())]
#[command(disable_help_flag = true)]
#[command(
    help_template = "{bin} {version}\n\n{about-with-newline}{usage-heading} {usage}\n\n{all-args}{after-help}"
)]
#[command(about = "Short aliases for monorepo build targets")]
#[command(
    override_usage = "pbc <alias> <target> [flags...]\n       pbc <core|ext|all> <target> [flags...]\n       pbc help"
)]
#[command(
    after_help = "\x1b[1;32mExamples:\x1b[0m\n  \x1b[36mpbc dc b\x1b[0m                  \x1b[2m# build the package aliased 'dc'\x1b[0m\n  \x1b[36mpbc dc t -fs\x1b[0m              \x1b[2m# test with expanded short flags\x1b[0m\n  \x1b[36mpbc core lint\x1b[0m             \x1b[2m# lint every core package\x1b[0m\n  \x1b[36mpbc dc b --aka-echo\x1b[0m       \x1b[2m# print the command instead of running it\x1b[0m\n  \x1b[36mpbc dc b --performance-check\x1b[0m \x1b[2m# compare against the saved baseline\x1b[0m"
)]
pub(crate) struct Cli {
    /// Alias, target and flags, e.g. `dc b -fs`
    #[arg(trailing_var_arg = true, allow_hyphen_values = true, value_name = "ARGS")]
    args: Vec<String>,
    /// Path to the alias config file; by default the nearest `.pbc.*` file
    /// above the current directory.
    #[arg(long, env = "PBC_CONFIG")]
    config: Option<PathBuf>,
    /// Print the resolved command instead of running it.
    #[arg(long = "aka-echo", default_value_t = false)]
    echo: bool,
}

fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_env("PBC_LOG").unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();

    let cli = Cli::parse();
    debug!("parsed cli arguments: {:?}", cli);

    match run(&cli) {
        Ok(code) => exit_code(code),
        Err(err) => {
            // The child has already reported its own failure.
            if let Some(DispatchError::ChildProcessFailure { code }) =
                err.downcast_ref::<DispatchError>()
            {
                return exit_code(*code);
            }
            eprintln!("{} {err:#}", s::paint(s::ERROR, "error:"));
            ExitCode::FAILURE
        }
    }
}

fn exit_code(code: i32) -> ExitCode {
    match u8::try_from(code) {
        Ok(code) => ExitCode::from(code),
        Err(_) => ExitCode::FAILURE,
    }
}

/// Resolves and runs one invocation, returning the exit code to report.
fn run(cli: &Cli) -> Result<i32> {
    let (control, forwarded) = extract_control_flags(&cli.args);
    let (alias, rest) = match forwarded.split_first() {
        Some((alias, rest)) => (alias.as_str(), rest),
        None => ("", &[][..]),
    };

    let workspace = Workspace::load(cli.config.as_deref());

    // Help must work without a config.
    if classify(alias, &AliasConfig::default()) == Ok(Classification::Help) {
        help::print_help(workspace.as_ref().ok().map(|ws| &ws.config))?;
        return Ok(0);
    }

    let workspace = workspace?;
    let config = &workspace.config;

    let plan = match classify(alias, config)? {
        Classification::Fanout(kind) => plan_run_many(kind, rest, config)?,
        Classification::Package { value, .. } => plan_package(&value, rest, config)?,
        Classification::WorkspaceCommand { name, template } => {
            plan_workspace_command(&name, &template, rest, config)?
        }
        Classification::Help => {
            help::print_help(Some(config))?;
            return Ok(0);
        }
    };
    debug!("planned {}:{} as '{}'", plan.project, plan.target, plan.action);

    let executor = Executor::new(
        SystemRunner,
        ExecutionContext {
            dry_run: cli.echo || control.echo,
        },
    );

    let code = match control.performance {
        Some(mode) => {
            let stores = PerfStores {
                baselines: workspace.baselines(),
                reports: workspace.reports(),
            };
            perf::run_with_performance(&executor, &plan, mode, &stores)?
        }
        None => executor.run(&plan.action)?,
    };

    if code != 0 {
        return Err(DispatchError::ChildProcessFailure { code }.into());
    }
    Ok(0)
}
