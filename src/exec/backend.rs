// src/exec/backend.rs

//! Pluggable process backend.
//!
//! The executor never spawns processes itself; it hands every recipe line to
//! a [`CommandRunner`]. Production code uses [`ShellRunner`], tests can
//! provide a runner that records invocations without touching the OS.

use std::future::Future;
use std::path::PathBuf;
use std::pin::Pin;

use tokio::process::Command;
use tracing::{debug, warn};

use crate::errors::RecipeError;
use crate::exec::output::{RuleOutput, pump};
use crate::rules::Target;

/// One recipe line, already expanded, ready to run.
#[derive(Debug, Clone)]
pub struct RecipeInvocation {
    pub target: Target,
    pub command: String,
    pub output: RuleOutput,
}

pub type RunFuture<'a> = Pin<Box<dyn Future<Output = Result<(), RecipeError>> + Send + 'a>>;

/// Trait abstracting how a single recipe command is executed.
pub trait CommandRunner: Send + Sync {
    /// Run the command to completion. `Ok` means it exited successfully.
    fn run_command<'a>(&'a self, invocation: &'a RecipeInvocation) -> RunFuture<'a>;
}

/// Runs each recipe line as an independent shell invocation
/// (`sh -c`, or `cmd /C` on Windows).
#[derive(Debug, Clone, Default)]
pub struct ShellRunner {
    working_dir: Option<PathBuf>,
}

impl ShellRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run recipes from `dir` instead of the current directory.
    ///
    /// Only set through [`crate::engine::Maker::with_working_dir`], which
    /// roots the file system at the same place.
    pub(crate) fn with_working_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.working_dir = Some(dir.into());
        self
    }

    fn command(&self, line: &str) -> Command {
        let mut cmd = if cfg!(windows) {
            let mut c = Command::new("cmd");
            c.arg("/C").arg(line);
            c
        } else {
            let mut c = Command::new("sh");
            c.arg("-c").arg(line);
            c
        };
        if let Some(dir) = &self.working_dir {
            cmd.current_dir(dir);
        }
        cmd
    }
}

impl CommandRunner for ShellRunner {
    fn run_command<'a>(&'a self, invocation: &'a RecipeInvocation) -> RunFuture<'a> {
        Box::pin(async move {
            let output = &invocation.output;
            let mut cmd = self.command(&invocation.command);
            cmd.stdin(std::process::Stdio::null())
                .stdout(output.stdout.stdio())
                .stderr(output.stderr.stdio())
                .kill_on_drop(true);

            let mut child = cmd.spawn().map_err(RecipeError::Spawn)?;

            let stdout = child.stdout.take().map(|out| {
                tokio::spawn(pump(
                    out,
                    output.stdout.clone(),
                    invocation.target.clone(),
                    "stdout",
                ))
            });
            let stderr = child.stderr.take().map(|err| {
                tokio::spawn(pump(
                    err,
                    output.stderr.clone(),
                    invocation.target.clone(),
                    "stderr",
                ))
            });

            let status = child.wait().await.map_err(RecipeError::Wait)?;

            // Let the pumps reach EOF so captured output is complete.
            for handle in [stdout, stderr].into_iter().flatten() {
                if let Err(e) = handle.await {
                    warn!(target = %invocation.target, error = %e, "output pump task failed");
                }
            }

            debug!(
                target = %invocation.target,
                exit_code = ?status.code(),
                success = status.success(),
                "recipe process exited"
            );

            if status.success() {
                Ok(())
            } else {
                match status.code() {
                    Some(code) => Err(RecipeError::ExitCode(code)),
                    None => Err(RecipeError::Signal),
                }
            }
        })
    }
}
