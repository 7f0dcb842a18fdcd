// src/cli.rs

//! CLI argument parsing using `clap`.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use crate::config::loader::default_build_file_path;

/// Command-line arguments for `makedag`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "makedag",
    version,
    about = "Build stale targets in dependency order, in parallel batches.",
    long_about = None
)]
pub struct CliArgs {
    /// Targets to build. Defaults to `[config].default_goals`.
    #[arg(value_name = "GOAL")]
    pub goals: Vec<String>,

    /// Path to the build file (TOML).
    #[arg(
        short = 'f',
        long,
        value_name = "PATH",
        default_value_os_t = default_build_file_path()
    )]
    pub file: PathBuf,

    /// Maximum number of targets built at the same time.
    ///
    /// Overrides `[config].max_parallel_jobs`.
    #[arg(short = 'j', long, value_name = "N")]
    pub jobs: Option<usize>,

    /// Print the batches that would be built, but don't run any recipe.
    #[arg(short = 'n', long)]
    pub dry_run: bool,

    /// Print every batch of the dependency graph, ignoring staleness.
    #[arg(long)]
    pub list: bool,

    /// Log each recipe before running it.
    #[arg(short = 'v', long)]
    pub verbose: bool,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, the `MAKEDAG_LOG` filter or `info` is used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    /// Filter directive enabling this level and everything above it.
    pub fn as_directive(self) -> &'static str {
        match self {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}
