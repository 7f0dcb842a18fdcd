// src/fs/mod.rs

//! Filesystem access used for staleness checks and failure cleanup.
//!
//! Recipes themselves run as real processes and touch the real disk; only
//! the executor's own reads and writes go through [`FileSystem`], so tests can
//! swap in [`mock::MockFileSystem`].

use std::borrow::Cow;
use std::fmt::Debug;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

pub mod mock;

/// Abstract filesystem interface.
pub trait FileSystem: Send + Sync + Debug {
    fn write(&self, path: &Path, contents: &[u8]) -> Result<()>;

    /// Whether anything exists at `path`.
    ///
    /// Errors other than "not found" (e.g. permission denied on a parent
    /// directory) are returned instead of being read as "missing".
    fn exists(&self, path: &Path) -> Result<bool>;

    fn remove_file(&self, path: &Path) -> Result<()>;
}

/// Implementation that uses `std::fs`.
///
/// Relative paths resolve against the process's current directory, or
/// against `root` when built with [`RealFileSystem::rooted`]. Absolute paths
/// are used as given.
#[derive(Debug, Clone, Default)]
pub struct RealFileSystem {
    root: Option<PathBuf>,
}

impl RealFileSystem {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve relative paths against `root`.
    pub fn rooted(root: impl Into<PathBuf>) -> Self {
        Self {
            root: Some(root.into()),
        }
    }

    pub fn root(&self) -> Option<&Path> {
        self.root.as_deref()
    }

    fn resolve<'a>(&self, path: &'a Path) -> Cow<'a, Path> {
        match &self.root {
            Some(root) if path.is_relative() => Cow::Owned(root.join(path)),
            _ => Cow::Borrowed(path),
        }
    }
}

impl FileSystem for RealFileSystem {
    fn write(&self, path: &Path, contents: &[u8]) -> Result<()> {
        let path = self.resolve(path);
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).with_context(|| format!("creating dir {:?}", parent))?;
            }
        }
        fs::write(&path, contents).with_context(|| format!("writing to file {:?}", path))
    }

    fn exists(&self, path: &Path) -> Result<bool> {
        let path = self.resolve(path);
        fs::exists(&path).with_context(|| format!("checking existence of {:?}", path))
    }

    fn remove_file(&self, path: &Path) -> Result<()> {
        let path = self.resolve(path);
        fs::remove_file(&path).with_context(|| format!("removing file {:?}", path))
    }
}
