// src/plan/staleness.rs

//! Pluggable staleness predicate.
//!
//! Batching never looks at the filesystem; deciding whether a target must be
//! (re)built is left entirely to a [`StalenessPolicy`]. The default,
//! [`ArtifactExists`], only checks that something exists at the target path.
//! It does not compare timestamps, so a prerequisite that is newer than an
//! already-built target does not make that target stale.

use std::fmt::Debug;
use std::path::Path;
use std::sync::Arc;

use crate::errors::Result;
use crate::fs::{FileSystem, RealFileSystem};
use crate::rules::Target;

/// Decides whether a target's artifact is missing or out of date.
pub trait StalenessPolicy: Send + Sync + Debug {
    /// `prerequisites` is empty for targets without a rule.
    fn is_stale(&self, target: &str, prerequisites: &[Target]) -> Result<bool>;
}

/// A target is stale iff nothing exists at its path.
#[derive(Debug, Clone)]
pub struct ArtifactExists {
    fs: Arc<dyn FileSystem>,
}

impl ArtifactExists {
    pub fn new(fs: Arc<dyn FileSystem>) -> Self {
        Self { fs }
    }
}

impl Default for ArtifactExists {
    fn default() -> Self {
        Self::new(Arc::new(RealFileSystem::new()))
    }
}

impl StalenessPolicy for ArtifactExists {
    fn is_stale(&self, target: &str, _prerequisites: &[Target]) -> Result<bool> {
        Ok(!self.fs.exists(Path::new(target))?)
    }
}
