// src/logging.rs

//! Logging setup for `makedag` using `tracing` + `tracing-subscriber`.
//!
//! The active filter comes from, in order:
//! 1. `--log-level` on the command line
//! 2. the `MAKEDAG_LOG` environment variable, which accepts full
//!    `EnvFilter` directives (`debug`, `makedag::exec=trace,warn`, ...)
//! 3. `info`
//!
//! Everything goes to STDERR; recipe output and dry-run reports own STDOUT.

use anyhow::{Context, Result, anyhow};
use tracing_subscriber::{EnvFilter, fmt};

use crate::cli::LogLevel;

/// Environment variable holding the default log filter.
pub const LOG_ENV: &str = "MAKEDAG_LOG";

/// Install the global subscriber. Fails if one is already installed.
pub fn init_logging(cli_level: Option<LogLevel>) -> Result<()> {
    let env = std::env::var(LOG_ENV).ok();
    let filter = build_filter(cli_level, env.as_deref())?;

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| anyhow!("initialising logging: {e}"))
}

/// Resolve the filter from an explicit level and the raw `MAKEDAG_LOG` value.
pub fn build_filter(cli_level: Option<LogLevel>, env: Option<&str>) -> Result<EnvFilter> {
    if let Some(level) = cli_level {
        return Ok(EnvFilter::new(level.as_directive()));
    }
    match env.map(str::trim).filter(|s| !s.is_empty()) {
        Some(directives) => EnvFilter::try_new(directives)
            .with_context(|| format!("invalid {LOG_ENV} value {directives:?}")),
        None => Ok(EnvFilter::new("info")),
    }
}
