// src/config/model.rs

use std::collections::BTreeMap;

use serde::Deserialize;

use crate::rules::{Rule, RuleBook, Target};

/// Build file as read from TOML, before validation.
///
/// ```toml
/// [config]
/// max_parallel_jobs = 4
/// verbose = false
/// default_goals = ["app"]
///
/// [rule."app"]
/// prereqs = ["main.o"]
/// recipes = ["cc -o $@ $^"]
///
/// [rule."main.o"]
/// prereqs = ["main.c"]
/// recipes = ["cc -c -o $@ $<"]
/// ```
///
/// `main.c` has no rule, so it is treated as an external input.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawBuildFile {
    #[serde(default)]
    pub config: ConfigSection,

    /// All rules from `[rule."<target>"]`, keyed by target.
    #[serde(default)]
    pub rule: BTreeMap<Target, RuleConfig>,
}

/// `[config]` section.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ConfigSection {
    /// Maximum number of targets built at the same time within a batch.
    ///
    /// Unset means unbounded.
    #[serde(default)]
    pub max_parallel_jobs: Option<usize>,

    /// Log every expanded recipe before running it.
    #[serde(default)]
    pub verbose: bool,

    /// Goals used when none are given on the command line.
    #[serde(default)]
    pub default_goals: Vec<Target>,
}

/// `[rule."<target>"]` section.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct RuleConfig {
    #[serde(default)]
    pub prereqs: Vec<Target>,

    #[serde(default)]
    pub recipes: Vec<String>,
}

/// A rule that came from a build file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileRule {
    target: Target,
    config: RuleConfig,
}

impl FileRule {
    pub fn new(target: Target, config: RuleConfig) -> Self {
        Self { target, config }
    }
}

impl Rule for FileRule {
    fn target(&self) -> &str {
        &self.target
    }

    fn prerequisites(&self) -> &[Target] {
        &self.config.prereqs
    }

    fn recipes(&self) -> &[String] {
        &self.config.recipes
    }
}

/// Validated build file.
///
/// Only constructible through `TryFrom<RawBuildFile>` (see `validate.rs`),
/// so holding one means the invariants checked there hold.
#[derive(Debug, Clone)]
pub struct BuildFile {
    pub config: ConfigSection,
    pub rule: BTreeMap<Target, RuleConfig>,
}

impl BuildFile {
    pub(crate) fn new_unchecked(config: ConfigSection, rule: BTreeMap<Target, RuleConfig>) -> Self {
        Self { config, rule }
    }

    /// Convert the `[rule]` table into a [`RuleBook`].
    pub fn rule_book(&self) -> RuleBook {
        self.rule
            .iter()
            .map(|(target, cfg)| FileRule::new(target.clone(), cfg.clone()))
            .collect()
    }

    /// Runtime options from `[config]`.
    pub fn options(&self) -> MakeOptions {
        MakeOptions {
            max_parallel_jobs: self.config.max_parallel_jobs,
            verbose: self.config.verbose,
        }
    }
}

/// Runtime options for a [`crate::engine::Maker`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MakeOptions {
    /// Upper bound on concurrently running targets in one batch.
    /// `None` means unbounded.
    pub max_parallel_jobs: Option<usize>,
    /// Log each expanded recipe at `info` before dispatch.
    pub verbose: bool,
}
