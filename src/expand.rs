// src/expand.rs

//! Automatic-variable expansion for recipe text.
//!
//! Recipes are expanded on the coordinator just before dispatch, so an
//! expander only ever sees one rule and one recipe line at a time.

use std::path::Path;
use std::sync::LazyLock;

use regex::{Captures, Regex};

use crate::rules::Rule;

/// Rewrites a recipe line before it is handed to the shell.
pub trait VariableExpander: Send + Sync {
    fn expand(&self, rule: &dyn Rule, recipe: &str) -> String;
}

impl<F> VariableExpander for F
where
    F: Fn(&dyn Rule, &str) -> String + Send + Sync,
{
    fn expand(&self, rule: &dyn Rule, recipe: &str) -> String {
        self(rule, recipe)
    }
}

/// Make-style automatic variables.
///
/// | Token   | Expansion                                  |
/// |---------|--------------------------------------------|
/// | `$@`    | the target                                 |
/// | `$<`    | the first prerequisite                     |
/// | `$^`    | all prerequisites, de-duplicated           |
/// | `$(@D)` | directory part of the target (`.` if none) |
/// | `$(@F)` | file part of the target                    |
/// | `$$`    | a literal `$`                              |
///
/// Anything else (including `${HOME}` style shell variables) is left alone.
#[derive(Debug, Clone, Copy, Default)]
pub struct AutoVars;

static AUTO_VAR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\$(?:([@<^$])|\((@[DF])\))").expect("automatic variable pattern is valid")
});

impl VariableExpander for AutoVars {
    fn expand(&self, rule: &dyn Rule, recipe: &str) -> String {
        AUTO_VAR
            .replace_all(recipe, |caps: &Captures<'_>| {
                let token = caps
                    .get(1)
                    .or_else(|| caps.get(2))
                    .map(|m| m.as_str())
                    .unwrap_or_default();
                expand_token(rule, token)
            })
            .into_owned()
    }
}

fn expand_token(rule: &dyn Rule, token: &str) -> String {
    let target = rule.target();
    match token {
        "@" => target.to_string(),
        "<" => rule.prerequisites().first().cloned().unwrap_or_default(),
        "^" => {
            let mut seen: Vec<&str> = Vec::new();
            for prereq in rule.prerequisites() {
                if !seen.contains(&prereq.as_str()) {
                    seen.push(prereq.as_str());
                }
            }
            seen.join(" ")
        }
        "@D" => match Path::new(target).parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir.to_string_lossy().into_owned(),
            _ => ".".to_string(),
        },
        "@F" => Path::new(target)
            .file_name()
            .map(|f| f.to_string_lossy().into_owned())
            .unwrap_or_else(|| target.to_string()),
        "$" => "$".to_string(),
        other => format!("${other}"),
    }
}

/// Passes recipes through unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoExpansion;

impl VariableExpander for NoExpansion {
    fn expand(&self, _rule: &dyn Rule, recipe: &str) -> String {
        recipe.to_string()
    }
}
