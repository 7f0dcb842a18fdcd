// src/config/mod.rs

//! Build file loading and validation.
//!
//! - [`model`] defines the TOML-backed data model and the file-backed
//!   [`FileRule`] provider.
//! - [`loader`] reads a build file from disk.
//! - [`validate`] checks basic invariants (non-empty names, sane job count).

pub mod loader;
pub mod model;
pub mod validate;

pub use loader::{load_and_validate, load_from_path, parse_str};
pub use model::{BuildFile, ConfigSection, FileRule, MakeOptions, RawBuildFile, RuleConfig};
pub use validate::validate_build_file;
