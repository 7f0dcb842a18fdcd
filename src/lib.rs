// src/lib.rs

pub mod cli;
pub mod config;
pub mod dag;
pub mod engine;
pub mod errors;
pub mod exec;
pub mod expand;
pub mod fs;
pub mod logging;
pub mod plan;
pub mod rules;

use std::io::Write;
use std::sync::Arc;

use anyhow::Result;
use tracing::debug;

use crate::cli::CliArgs;
use crate::config::{BuildFile, MakeOptions, load_and_validate};
use crate::engine::{Maker, write_target_sets};
use crate::errors::MakeError;

/// High-level entry point used by `main.rs`.
///
/// Loads the build file, applies CLI overrides, then either lists the full
/// batch sequence, prints a dry run, or builds.
pub async fn run(args: CliArgs) -> Result<()> {
    let build = load_and_validate(&args.file)?;
    let options = effective_options(&build, &args)?;
    let goals = effective_goals(&build, &args);

    debug!(file = ?args.file, ?goals, ?options, "build file loaded");

    let maker = Maker::new(Arc::new(build.rule_book()), goals, options)?;

    if args.list {
        let mut out = std::io::stdout().lock();
        write_target_sets(&mut out, maker.all_target_sets(), "No targets.")?;
        out.flush()?;
        return Ok(());
    }

    if args.dry_run {
        let mut out = std::io::stdout().lock();
        maker.dry_run(&mut out)?;
        out.flush()?;
        return Ok(());
    }

    maker.run().await?;
    Ok(())
}

/// `[config]` values with `-j` / `-v` applied on top.
fn effective_options(build: &BuildFile, args: &CliArgs) -> Result<MakeOptions, MakeError> {
    let mut options = build.options();
    if let Some(jobs) = args.jobs {
        if jobs == 0 {
            return Err(MakeError::ConfigError(
                "--jobs must be >= 1 (got 0)".to_string(),
            ));
        }
        options.max_parallel_jobs = Some(jobs);
    }
    if args.verbose {
        options.verbose = true;
    }
    Ok(options)
}

/// Goals from the command line, falling back to `[config].default_goals`.
fn effective_goals(build: &BuildFile, args: &CliArgs) -> Vec<String> {
    if args.goals.is_empty() {
        build.config.default_goals.clone()
    } else {
        args.goals.clone()
    }
}
