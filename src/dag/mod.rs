// src/dag/mod.rs

//! Dependency graph construction and topological batching.
//!
//! - [`graph`] collects every target reachable from the goals.
//! - [`batcher`] orders that graph into batches of mutually independent
//!   targets and records any cycle it cannot drain.

pub mod batcher;
pub mod graph;

pub use batcher::{Batches, CycleSet, TargetSet, batch};
pub use graph::DependencyGraph;
