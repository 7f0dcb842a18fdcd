// src/plan/mod.rs

//! Build planning: which batches still have work in them.
//!
//! - [`staleness`] holds the pluggable "is this target out of date" check.
//! - [`filter`] validates goals and reduces the full batch sequence to the
//!   outstanding targets.

pub mod filter;
pub mod staleness;

pub use filter::batches_needing_build;
pub use staleness::{ArtifactExists, StalenessPolicy};
