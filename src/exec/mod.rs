// src/exec/mod.rs

//! Recipe execution layer.
//!
//! - [`batch`] runs one batch of targets on a bounded pool and aggregates
//!   failures.
//! - [`target_runner`] runs one target's recipes in order and cleans up its
//!   artifact on failure.
//! - [`backend`] provides the `CommandRunner` trait and the production
//!   `ShellRunner`; tests swap in a fake runner.
//! - [`output`] decides where recipe stdout/stderr end up.

pub mod backend;
pub mod batch;
pub mod output;
pub mod target_runner;

pub use backend::{CommandRunner, RecipeInvocation, ShellRunner};
pub use batch::{BatchContext, run_batch};
pub use output::{CaptureBuffer, InheritOutput, OutputRouter, OutputSink, RuleOutput};
pub use target_runner::{TargetJob, run_target};
