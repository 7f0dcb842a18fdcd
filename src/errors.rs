// src/errors.rs

//! Crate-wide error types.

use std::fmt;

use thiserror::Error;

use crate::rules::Target;

#[derive(Error, Debug)]
pub enum MakeError {
    #[error("no rule to make target {0:?}")]
    NoRuleToMakeTarget(Target),

    #[error("circular dependency for target {target:?}: {deps:?}")]
    CircularDependency { target: Target, deps: Vec<Target> },

    #[error(transparent)]
    RecipeFailed(#[from] RecipeFailure),

    #[error(transparent)]
    BatchFailed(#[from] BatchFailure),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Why a single recipe invocation did not succeed.
#[derive(Error, Debug)]
pub enum RecipeError {
    #[error("exit status {0}")]
    ExitCode(i32),

    #[error("terminated by signal")]
    Signal,

    #[error("failed to spawn: {0}")]
    Spawn(#[source] std::io::Error),

    #[error("failed waiting for process: {0}")]
    Wait(#[source] std::io::Error),

    #[error("target runner aborted: {0}")]
    Aborted(String),
}

/// A recipe command of one target that failed.
#[derive(Error, Debug)]
#[error("[{target}] command {command:?} failed: {source}")]
pub struct RecipeFailure {
    pub target: Target,
    pub command: String,
    #[source]
    pub source: RecipeError,
}

/// Every recipe failure collected from one batch.
///
/// Sibling targets in a batch are allowed to finish before this is reported,
/// so `failures` can hold more than one entry.
#[derive(Debug)]
pub struct BatchFailure {
    /// Index of the batch in the filtered batch sequence.
    pub batch: usize,
    /// Failures ordered by target.
    pub failures: Vec<RecipeFailure>,
}

impl BatchFailure {
    /// Targets that failed in this batch.
    pub fn failed_targets(&self) -> impl Iterator<Item = &str> {
        self.failures.iter().map(|f| f.target.as_str())
    }
}

impl fmt::Display for BatchFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} target(s) failed in batch {}:",
            self.failures.len(),
            self.batch
        )?;
        for failure in &self.failures {
            write!(f, "\n  {failure}")?;
        }
        Ok(())
    }
}

impl std::error::Error for BatchFailure {}

pub type Result<T> = std::result::Result<T, MakeError>;
