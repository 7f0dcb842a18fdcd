#![allow(dead_code)]

use std::collections::BTreeMap;

use makedag::config::{BuildFile, ConfigSection, RawBuildFile, RuleConfig};
use makedag::rules::{RuleBook, StaticRule};

/// Builder for `BuildFile` to simplify test setup.
pub struct BuildFileBuilder {
    raw: RawBuildFile,
}

impl BuildFileBuilder {
    pub fn new() -> Self {
        Self {
            raw: RawBuildFile {
                config: ConfigSection::default(),
                rule: BTreeMap::new(),
            },
        }
    }

    pub fn with_rule(mut self, target: &str, rule: RuleConfig) -> Self {
        self.raw.rule.insert(target.to_string(), rule);
        self
    }

    pub fn max_parallel_jobs(mut self, jobs: usize) -> Self {
        self.raw.config.max_parallel_jobs = Some(jobs);
        self
    }

    pub fn verbose(mut self, val: bool) -> Self {
        self.raw.config.verbose = val;
        self
    }

    pub fn default_goal(mut self, goal: &str) -> Self {
        self.raw.config.default_goals.push(goal.to_string());
        self
    }

    pub fn raw(self) -> RawBuildFile {
        self.raw
    }

    pub fn build(self) -> BuildFile {
        BuildFile::try_from(self.raw).expect("Failed to build valid build file from builder")
    }
}

impl Default for BuildFileBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for `RuleConfig`.
pub struct RuleConfigBuilder {
    rule: RuleConfig,
}

impl RuleConfigBuilder {
    pub fn new() -> Self {
        Self {
            rule: RuleConfig::default(),
        }
    }

    pub fn prereq(mut self, dep: &str) -> Self {
        self.rule.prereqs.push(dep.to_string());
        self
    }

    pub fn recipe(mut self, cmd: &str) -> Self {
        self.rule.recipes.push(cmd.to_string());
        self
    }

    pub fn build(self) -> RuleConfig {
        self.rule
    }
}

impl Default for RuleConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// A rule with a single `touch $@` recipe.
pub fn touch_rule(target: &str, prereqs: &[&str]) -> StaticRule {
    StaticRule::new(target)
        .prereqs(prereqs.iter().copied())
        .recipe("touch $@")
}

/// The diamond `A <- []`, `B <- [A]`, `C <- [A]`, `D <- [B, C]`.
pub fn diamond() -> RuleBook {
    [
        touch_rule("A", &[]),
        touch_rule("B", &["A"]),
        touch_rule("C", &["A"]),
        touch_rule("D", &["B", "C"]),
    ]
    .into_iter()
    .collect()
}
