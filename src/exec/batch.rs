// src/exec/batch.rs

//! Bounded worker pool for one batch.

use std::sync::Arc;

use tokio::sync::Semaphore;
use tracing::{debug, info, warn};

use crate::errors::{BatchFailure, RecipeError, RecipeFailure};
use crate::exec::backend::CommandRunner;
use crate::exec::target_runner::{TargetJob, run_target};
use crate::fs::FileSystem;
use crate::rules::Target;

/// Shared, per-run state handed to every target task.
#[derive(Clone)]
pub struct BatchContext {
    pub runner: Arc<dyn CommandRunner>,
    pub fs: Arc<dyn FileSystem>,
    /// `None` means every target in the batch may run at once.
    pub max_parallel_jobs: Option<usize>,
    pub verbose: bool,
}

/// Build every job of one batch concurrently and wait for all of them.
///
/// A failing target never cancels its siblings: the whole batch is drained
/// first, then every failure is returned together.
pub async fn run_batch(
    index: usize,
    jobs: Vec<TargetJob>,
    ctx: &BatchContext,
) -> Result<(), BatchFailure> {
    let limiter = ctx
        .max_parallel_jobs
        .map(|n| Arc::new(Semaphore::new(n.max(1))));

    info!(
        batch = index,
        targets = jobs.len(),
        max_parallel_jobs = ?ctx.max_parallel_jobs,
        "starting batch"
    );

    let mut handles: Vec<(Target, tokio::task::JoinHandle<Result<(), RecipeFailure>>)> =
        Vec::with_capacity(jobs.len());

    for job in jobs {
        let target = job.target.clone();
        let runner = Arc::clone(&ctx.runner);
        let fs = Arc::clone(&ctx.fs);
        let limiter = limiter.clone();
        let verbose = ctx.verbose;

        let handle = tokio::spawn(async move {
            // Held until the target finishes; dropping it frees a slot.
            let _permit = match limiter {
                Some(sem) => Some(sem.acquire_owned().await.map_err(|e| RecipeFailure {
                    target: job.target.clone(),
                    command: String::new(),
                    source: RecipeError::Aborted(e.to_string()),
                })?),
                None => None,
            };
            run_target(job, runner.as_ref(), fs.as_ref(), verbose).await
        });
        handles.push((target, handle));
    }

    let mut failures = Vec::new();
    for (target, handle) in handles {
        match handle.await {
            Ok(Ok(())) => debug!(batch = index, target = %target, "target finished"),
            Ok(Err(failure)) => failures.push(failure),
            Err(join_err) => {
                warn!(batch = index, target = %target, error = %join_err, "target task aborted");
                failures.push(RecipeFailure {
                    target,
                    command: String::new(),
                    source: RecipeError::Aborted(join_err.to_string()),
                });
            }
        }
    }

    if failures.is_empty() {
        info!(batch = index, "batch finished");
        return Ok(());
    }

    failures.sort_by(|a, b| a.target.cmp(&b.target));
    warn!(
        batch = index,
        failed = failures.len(),
        "batch failed; not starting later batches"
    );
    Err(BatchFailure {
        batch: index,
        failures,
    })
}
