// src/config/validate.rs

use crate::config::model::{BuildFile, RawBuildFile};
use crate::errors::{MakeError, Result};

impl TryFrom<RawBuildFile> for BuildFile {
    type Error = MakeError;

    fn try_from(raw: RawBuildFile) -> std::result::Result<Self, Self::Error> {
        validate_build_file(&raw)?;
        Ok(BuildFile::new_unchecked(raw.config, raw.rule))
    }
}

/// Run every build file check, stopping at the first failure.
pub fn validate_build_file(raw: &RawBuildFile) -> Result<()> {
    ensure_has_rules(raw)?;
    validate_global_config(raw)?;
    validate_rule_names(raw)?;
    validate_default_goals(raw)?;
    Ok(())
}

fn ensure_has_rules(raw: &RawBuildFile) -> Result<()> {
    if raw.rule.is_empty() {
        return Err(MakeError::ConfigError(
            "build file must contain at least one [rule.\"<target>\"] section".to_string(),
        ));
    }
    Ok(())
}

fn validate_global_config(raw: &RawBuildFile) -> Result<()> {
    if raw.config.max_parallel_jobs == Some(0) {
        return Err(MakeError::ConfigError(
            "[config].max_parallel_jobs must be >= 1 (got 0)".to_string(),
        ));
    }
    Ok(())
}

fn validate_rule_names(raw: &RawBuildFile) -> Result<()> {
    for (target, rule) in raw.rule.iter() {
        if target.trim().is_empty() {
            return Err(MakeError::ConfigError(
                "rule target must not be empty".to_string(),
            ));
        }
        if rule.prereqs.iter().any(|p| p.trim().is_empty()) {
            return Err(MakeError::ConfigError(format!(
                "rule '{target}' has an empty prerequisite name"
            )));
        }
    }
    Ok(())
}

fn validate_default_goals(raw: &RawBuildFile) -> Result<()> {
    for goal in raw.config.default_goals.iter() {
        if !raw.rule.contains_key(goal) {
            return Err(MakeError::ConfigError(format!(
                "default goal '{goal}' has no rule"
            )));
        }
    }
    Ok(())
}
