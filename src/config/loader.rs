// src/config/loader.rs

use std::fs;
use std::path::{Path, PathBuf};

use crate::config::model::{BuildFile, RawBuildFile};
use crate::errors::Result;

/// Load a build file from a given path and return the raw `RawBuildFile`.
///
/// This only performs TOML deserialization; it does **not** perform semantic
/// validation. Use [`load_and_validate`] for that.
pub fn load_from_path(path: impl AsRef<Path>) -> Result<RawBuildFile> {
    let contents = fs::read_to_string(path.as_ref())?;
    parse_str(&contents)
}

/// Deserialize a build file from TOML text.
pub fn parse_str(contents: &str) -> Result<RawBuildFile> {
    let raw: RawBuildFile = toml::from_str(contents)?;
    Ok(raw)
}

/// Load a build file from path and run validation.
///
/// - Reads TOML.
/// - Applies defaults (handled by `serde` + `Default` impls).
/// - Checks the invariants listed in `validate.rs`.
///
/// Cycles between rules are *not* rejected here; they are reported per goal
/// when the build plan is computed.
pub fn load_and_validate(path: impl AsRef<Path>) -> Result<BuildFile> {
    let raw = load_from_path(&path)?;
    BuildFile::try_from(raw)
}

/// Default build file location: `Makedag.toml` in the current directory.
pub fn default_build_file_path() -> PathBuf {
    PathBuf::from("Makedag.toml")
}
