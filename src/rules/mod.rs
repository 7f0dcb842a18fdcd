// src/rules/mod.rs

//! Rule model.
//!
//! The scheduler only ever talks to rules through the [`Rule`] and
//! [`RuleSet`] traits, so rules can come from anywhere:
//!
//! - [`StaticRule`] is built programmatically.
//! - [`crate::config::FileRule`] is deserialised from a build file.
//! - [`RuleBook`] owns a collection of boxed rules and is the usual
//!   [`RuleSet`] handed to the [`crate::engine::Maker`].

use std::collections::HashMap;
use std::fmt::Debug;

pub mod book;

pub use book::RuleBook;

/// Canonical target identifier (conventionally a file path).
pub type Target = String;

/// A target bound to its prerequisites and recipe commands.
pub trait Rule: Send + Sync + Debug {
    fn target(&self) -> &str;

    /// Direct prerequisites, in declared order.
    fn prerequisites(&self) -> &[Target];

    /// Shell commands run in order to produce the target.
    fn recipes(&self) -> &[String];
}

/// Lookup of the (at most one) rule producing a target.
pub trait RuleSet: Send + Sync {
    fn rule_for(&self, target: &str) -> Option<&dyn Rule>;
}

impl<R: Rule> RuleSet for HashMap<Target, R> {
    fn rule_for(&self, target: &str) -> Option<&dyn Rule> {
        self.get(target).map(|r| r as &dyn Rule)
    }
}

/// A rule assembled in code.
///
/// ```
/// use makedag::rules::{Rule, StaticRule};
///
/// let rule = StaticRule::new("app")
///     .prereq("main.o")
///     .recipe("cc -o $@ $^");
/// assert_eq!(rule.prerequisites(), ["main.o".to_string()]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaticRule {
    target: Target,
    prerequisites: Vec<Target>,
    recipes: Vec<String>,
}

impl StaticRule {
    pub fn new(target: impl Into<Target>) -> Self {
        Self {
            target: target.into(),
            prerequisites: Vec::new(),
            recipes: Vec::new(),
        }
    }

    pub fn prereq(mut self, prereq: impl Into<Target>) -> Self {
        self.prerequisites.push(prereq.into());
        self
    }

    pub fn prereqs<I, S>(mut self, prereqs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<Target>,
    {
        self.prerequisites.extend(prereqs.into_iter().map(Into::into));
        self
    }

    pub fn recipe(mut self, recipe: impl Into<String>) -> Self {
        self.recipes.push(recipe.into());
        self
    }
}

impl Rule for StaticRule {
    fn target(&self) -> &str {
        &self.target
    }

    fn prerequisites(&self) -> &[Target] {
        &self.prerequisites
    }

    fn recipes(&self) -> &[String] {
        &self.recipes
    }
}
