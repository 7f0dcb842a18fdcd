// src/engine/mod.rs

//! Build orchestration.
//!
//! [`Maker`] ties together the dependency graph, batcher, staleness filter
//! and executor behind the four public operations: `all_target_sets`,
//! `target_sets_needing_build`, `dry_run` and `run`. Report rendering for
//! dry runs lives in [`report`].

pub mod maker;
pub mod report;

pub use maker::Maker;
pub use report::write_target_sets;
