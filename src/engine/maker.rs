// src/engine/maker.rs

use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;

use tracing::{debug, info};

use crate::config::MakeOptions;
use crate::dag::{Batches, CycleSet, DependencyGraph, TargetSet, batch};
use crate::engine::report::write_target_sets;
use crate::errors::{MakeError, Result};
use crate::exec::{
    BatchContext, CommandRunner, InheritOutput, OutputRouter, ShellRunner, TargetJob, run_batch,
};
use crate::expand::{AutoVars, VariableExpander};
use crate::fs::{FileSystem, RealFileSystem};
use crate::plan::{ArtifactExists, StalenessPolicy, batches_needing_build};
use crate::rules::{RuleSet, Target};

/// Scheduler and executor for one set of goals.
///
/// The dependency graph and batch sequence are computed once, in
/// [`Maker::new`], and never change afterwards. Staleness is re-evaluated on
/// every call, so repeated `dry_run`/`run` calls see the current filesystem.
pub struct Maker {
    rules: Arc<dyn RuleSet>,
    goals: Vec<Target>,
    graph: DependencyGraph,
    batches: Batches,
    options: MakeOptions,
    fs: Arc<dyn FileSystem>,
    /// `None` means [`ArtifactExists`] over `fs`.
    staleness: Option<Arc<dyn StalenessPolicy>>,
    expander: Arc<dyn VariableExpander>,
    output: Arc<dyn OutputRouter>,
    runner: Arc<dyn CommandRunner>,
}

impl Maker {
    /// Build the graph and batch sequence for `goals`.
    ///
    /// Fails only if `goals` is empty; missing rules and cycles are reported
    /// by [`Maker::target_sets_needing_build`].
    pub fn new(rules: Arc<dyn RuleSet>, goals: Vec<Target>, options: MakeOptions) -> Result<Self> {
        if goals.is_empty() {
            return Err(MakeError::ConfigError(
                "no goals given and no default goals configured".to_string(),
            ));
        }

        let graph = DependencyGraph::build(rules.as_ref(), &goals);
        let batches = batch(&graph);

        info!(
            goals = ?goals,
            targets = graph.len(),
            batches = batches.sets.len(),
            complete = batches.is_complete(),
            "build graph ready"
        );

        Ok(Self {
            rules,
            goals,
            graph,
            batches,
            options,
            fs: Arc::new(RealFileSystem::new()),
            staleness: None,
            expander: Arc::new(AutoVars),
            output: Arc::new(InheritOutput),
            runner: Arc::new(ShellRunner::new()),
        })
    }

    /// Build from `dir` instead of the current directory.
    ///
    /// Recipes run with `dir` as their working directory, and relative
    /// targets are resolved against it for the staleness check and failure
    /// cleanup. Replaces the file system and runner, so call it before
    /// [`Maker::with_file_system`] or [`Maker::with_runner`].
    pub fn with_working_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        let dir = dir.into();
        self.fs = Arc::new(RealFileSystem::rooted(dir.clone()));
        self.runner = Arc::new(ShellRunner::new().with_working_dir(dir));
        self
    }

    /// Filesystem used for the default staleness check and failure cleanup.
    pub fn with_file_system(mut self, fs: Arc<dyn FileSystem>) -> Self {
        self.fs = fs;
        self
    }

    pub fn with_staleness(mut self, policy: Arc<dyn StalenessPolicy>) -> Self {
        self.staleness = Some(policy);
        self
    }

    pub fn with_expander(mut self, expander: Arc<dyn VariableExpander>) -> Self {
        self.expander = expander;
        self
    }

    pub fn with_output_routing(mut self, router: Arc<dyn OutputRouter>) -> Self {
        self.output = router;
        self
    }

    pub fn with_runner(mut self, runner: Arc<dyn CommandRunner>) -> Self {
        self.runner = runner;
        self
    }

    pub fn goals(&self) -> &[Target] {
        &self.goals
    }

    pub fn options(&self) -> MakeOptions {
        self.options
    }

    pub fn graph(&self) -> &DependencyGraph {
        &self.graph
    }

    /// Full batch sequence, without staleness filtering.
    ///
    /// Incomplete if the graph has a cycle, see [`Maker::cycles`].
    pub fn all_target_sets(&self) -> &[TargetSet] {
        &self.batches.sets
    }

    pub fn cycles(&self) -> &CycleSet {
        &self.batches.cycles
    }

    /// Batches that still contain targets needing a build, in build order.
    pub fn target_sets_needing_build(&self) -> Result<Vec<TargetSet>> {
        match &self.staleness {
            Some(policy) => batches_needing_build(
                self.rules.as_ref(),
                &self.goals,
                &self.batches,
                policy.as_ref(),
            ),
            None => {
                let policy = ArtifactExists::new(Arc::clone(&self.fs));
                batches_needing_build(self.rules.as_ref(), &self.goals, &self.batches, &policy)
            }
        }
    }

    /// Write what [`Maker::run`] would build, without building anything.
    pub fn dry_run<W: Write>(&self, w: &mut W) -> Result<()> {
        let sets = self.target_sets_needing_build()?;
        write_target_sets(w, &sets, "No target sets need building.")?;
        Ok(())
    }

    /// Build every outstanding batch in order.
    ///
    /// A batch only starts once the previous one has fully finished. If any
    /// target of a batch fails, the remaining targets of that batch still
    /// finish, then [`MakeError::BatchFailed`] is returned and no later batch
    /// is started.
    pub async fn run(&self) -> Result<()> {
        let sets = self.target_sets_needing_build()?;
        if sets.is_empty() {
            info!(goals = ?self.goals, "nothing to be done");
            return Ok(());
        }

        let ctx = BatchContext {
            runner: Arc::clone(&self.runner),
            fs: Arc::clone(&self.fs),
            max_parallel_jobs: self.options.max_parallel_jobs,
            verbose: self.options.verbose,
        };

        let total = sets.len();
        for (index, set) in sets.iter().enumerate() {
            let jobs = set
                .iter()
                .map(|target| self.prepare(target))
                .collect::<Result<Vec<_>>>()?;

            run_batch(index, jobs, &ctx).await?;
            debug!(batch = index, of = total, "batch complete");
        }

        info!(goals = ?self.goals, batches = total, "build finished");
        Ok(())
    }

    /// Expand recipes and pick output sinks for one target.
    fn prepare(&self, target: &str) -> Result<TargetJob> {
        let rule = self
            .rules
            .rule_for(target)
            .ok_or_else(|| MakeError::NoRuleToMakeTarget(target.to_string()))?;

        let recipes = rule
            .recipes()
            .iter()
            .map(|recipe| self.expander.expand(rule, recipe))
            .collect();

        Ok(TargetJob {
            target: target.to_string(),
            recipes,
            output: self.output.route(rule),
        })
    }
}

impl std::fmt::Debug for Maker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Maker")
            .field("goals", &self.goals)
            .field("batches", &self.batches)
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}
