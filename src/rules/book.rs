// src/rules/book.rs

use std::collections::BTreeMap;

use crate::errors::{MakeError, Result};
use crate::rules::{Rule, RuleSet, Target};

/// Owned collection of rules keyed by target.
///
/// Holds at most one rule per target; [`RuleBook::insert`] rejects a second
/// rule for the same target instead of silently replacing it.
#[derive(Debug, Default)]
pub struct RuleBook {
    rules: BTreeMap<Target, Box<dyn Rule>>,
}

impl RuleBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a rule, failing if its target already has one.
    pub fn insert(&mut self, rule: impl Rule + 'static) -> Result<()> {
        let target = rule.target().to_string();
        if self.rules.contains_key(&target) {
            return Err(MakeError::ConfigError(format!(
                "duplicate rule for target '{target}'"
            )));
        }
        self.rules.insert(target, Box::new(rule));
        Ok(())
    }

    /// Builder-style [`RuleBook::insert`].
    pub fn with_rule(mut self, rule: impl Rule + 'static) -> Result<Self> {
        self.insert(rule)?;
        Ok(self)
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Targets that have a rule, in sorted order.
    pub fn targets(&self) -> impl Iterator<Item = &str> {
        self.rules.keys().map(|s| s.as_str())
    }
}

impl RuleSet for RuleBook {
    fn rule_for(&self, target: &str) -> Option<&dyn Rule> {
        self.rules.get(target).map(|r| r.as_ref())
    }
}

impl<R: Rule + 'static> FromIterator<R> for RuleBook {
    /// Collect rules; for duplicate targets the last rule wins.
    fn from_iter<I: IntoIterator<Item = R>>(iter: I) -> Self {
        let rules = iter
            .into_iter()
            .map(|r| (r.target().to_string(), Box::new(r) as Box<dyn Rule>))
            .collect();
        Self { rules }
    }
}
