use std::process::Command;

use anyhow::{Context, Result};
use tracing::{debug, info, instrument};

use pbc_core::ExecutionAction;

use crate::styles::{paint, DRY_RUN};

/// Spawns a process and waits for its exit code.
pub trait ProcessRunner {
    fn spawn_and_wait(&self, action: &ExecutionAction) -> Result<i32>;
}

/// Runs commands on the host with inherited standard streams.
///
/// On Windows the command goes through `cmd /C` so `.cmd` shims on PATH
/// resolve the same way they do in a terminal.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemRunner;

impl ProcessRunner for SystemRunner {
    fn spawn_and_wait(&self, action: &ExecutionAction) -> Result<i32> {
        let status = platform_command(action)
            .status()
            .with_context(|| format!("failed to start command '{}'", action.command_line()))?;

        // A child killed by a signal has no code.
        Ok(status.code().unwrap_or(1))
    }
}

fn platform_command(action: &ExecutionAction) -> Command {
    if cfg!(windows) {
        let mut command = Command::new("cmd");
        command.arg("/C").arg(&action.program).args(&action.args);
        command
    } else {
        let mut command = Command::new(&action.program);
        command.args(&action.args);
        command
    }
}

/// Per-invocation execution settings.
#[derive(Debug, Default, Clone, Copy)]
pub struct ExecutionContext {
    /// Print the command line instead of spawning it.
    pub dry_run: bool,
}

pub struct Executor<R: ProcessRunner = SystemRunner> {
    runner: R,
    context: ExecutionContext,
}

impl<R: ProcessRunner> Executor<R> {
    pub fn new(runner: R, context: ExecutionContext) -> Self {
        Self { runner, context }
    }

    pub fn is_dry_run(&self) -> bool {
        self.context.dry_run
    }

    /// Runs the action and returns the child's exit code; 0 in dry-run mode.
    #[instrument(skip(self, action), fields(command = %action))]
    pub fn run(&self, action: &ExecutionAction) -> Result<i32> {
        if self.context.dry_run {
            println!("{} {}", paint(DRY_RUN, "[dry-run]"), action.command_line());
            return Ok(0);
        }

        info!(target: "pbc", "run {}", action.command_line());
        let code = self.runner.spawn_and_wait(action)?;
        debug!("{} exited with {}", action.program, code);
        Ok(code)
    }
}
