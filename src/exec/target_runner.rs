// src/exec/target_runner.rs

//! Runs the recipes of a single target.

use std::path::Path;

use tracing::{debug, error, info, warn};

use crate::errors::RecipeFailure;
use crate::exec::backend::{CommandRunner, RecipeInvocation};
use crate::exec::output::RuleOutput;
use crate::fs::FileSystem;
use crate::rules::Target;

/// Everything needed to build one target, detached from the rule set so it
/// can move into a spawned task.
#[derive(Debug, Clone)]
pub struct TargetJob {
    pub target: Target,
    /// Recipe lines with automatic variables already expanded.
    pub recipes: Vec<String>,
    pub output: RuleOutput,
}

/// Run `job`'s recipes in order, stopping at the first failure.
///
/// On failure, whatever now exists at the target path is removed so a
/// half-written artifact is not mistaken for an up-to-date one next time.
/// A failed removal is logged and does not replace the recipe failure.
pub async fn run_target(
    job: TargetJob,
    runner: &dyn CommandRunner,
    fs: &dyn FileSystem,
    verbose: bool,
) -> Result<(), RecipeFailure> {
    let TargetJob {
        target,
        recipes,
        output,
    } = job;

    for command in recipes {
        if verbose {
            info!("[{}] {}", target, command);
        } else {
            debug!(target = %target, cmd = %command, "running recipe");
        }

        let invocation = RecipeInvocation {
            target: target.clone(),
            command,
            output: output.clone(),
        };

        let result = runner.run_command(&invocation).await;
        if let Err(source) = result {
            remove_partial_artifact(fs, &target);
            error!(
                target = %target,
                cmd = %invocation.command,
                error = %source,
                "recipe failed"
            );
            return Err(RecipeFailure {
                target,
                command: invocation.command,
                source,
            });
        }
    }

    debug!(target = %target, "target built");
    Ok(())
}

fn remove_partial_artifact(fs: &dyn FileSystem, target: &str) {
    let path = Path::new(target);
    match fs.exists(path) {
        Ok(true) => match fs.remove_file(path) {
            Ok(()) => info!(target = %target, "removed partial artifact after failure"),
            Err(e) => warn!(
                target = %target,
                error = %e,
                "failed removing target after error"
            ),
        },
        Ok(false) => {}
        Err(e) => warn!(
            target = %target,
            error = %e,
            "could not check for partial artifact after error"
        ),
    }
}
