// src/dag/batcher.rs

//! Leveled topological sort.
//!
//! A variant of Kahn's algorithm that emits whole "levels" instead of single
//! nodes: every pass collects all nodes whose prerequisites have all been
//! emitted, and that set becomes one batch. Members of a batch never depend
//! on each other, so a batch can be built concurrently.
//!
//! The pass works on an owned counter of unresolved prerequisites per node;
//! the [`DependencyGraph`] itself is left untouched.

use std::collections::{BTreeMap, BTreeSet};

use petgraph::Direction;
use petgraph::graph::NodeIndex;
use tracing::{debug, warn};

use crate::dag::graph::DependencyGraph;
use crate::rules::Target;

/// Targets that can be built concurrently.
pub type TargetSet = Vec<Target>;

/// Targets stuck in a cycle, mapped to their unresolved prerequisites.
pub type CycleSet = BTreeMap<Target, Vec<Target>>;

/// Output of [`batch`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Batches {
    /// Batches in build order. Incomplete if `cycles` is non-empty.
    pub sets: Vec<TargetSet>,
    /// Empty when the whole graph was drained.
    pub cycles: CycleSet,
}

impl Batches {
    pub fn is_complete(&self) -> bool {
        self.cycles.is_empty()
    }
}

/// Drain `graph` into an ordered batch sequence.
///
/// Stops at the first pass that finds no ready node while nodes remain; the
/// batches emitted so far are kept and the stuck nodes are recorded in
/// [`Batches::cycles`].
pub fn batch(graph: &DependencyGraph) -> Batches {
    let g = graph.inner();
    let total = g.node_count();

    // Unresolved prerequisite count per node index.
    let mut remaining: Vec<usize> = g
        .node_indices()
        .map(|idx| g.neighbors_directed(idx, Direction::Outgoing).count())
        .collect();
    let mut emitted = vec![false; total];
    let mut drained = 0usize;

    let mut out = Batches::default();

    while drained < total {
        let zero: Vec<_> = g
            .node_indices()
            .filter(|idx| !emitted[idx.index()] && remaining[idx.index()] == 0)
            .collect();

        if zero.is_empty() {
            out.cycles = collect_cycles(graph, &emitted);
            warn!(
                stuck = total - drained,
                cycle_members = out.cycles.len(),
                "dependency cycle; batch sequence is incomplete"
            );
            break;
        }

        for idx in &zero {
            emitted[idx.index()] = true;
            for dependent in g.neighbors_directed(*idx, Direction::Incoming) {
                remaining[dependent.index()] -= 1;
            }
        }
        drained += zero.len();

        let mut set: TargetSet = zero.iter().map(|idx| g[*idx].clone()).collect();
        set.sort();
        debug!(batch = out.sets.len(), members = set.len(), "batch ready");
        out.sets.push(set);
    }

    out
}

/// Every undrained node still referenced as an unresolved prerequisite of
/// another undrained node, with its own unresolved prerequisites.
fn collect_cycles(graph: &DependencyGraph, emitted: &[bool]) -> CycleSet {
    let g = graph.inner();

    let unresolved = |idx: NodeIndex| -> Vec<Target> {
        let mut deps: BTreeSet<Target> = BTreeSet::new();
        for dep in g.neighbors_directed(idx, Direction::Outgoing) {
            if !emitted[dep.index()] {
                deps.insert(g[dep].clone());
            }
        }
        deps.into_iter().collect()
    };

    let mut referenced: BTreeSet<Target> = BTreeSet::new();
    for idx in g.node_indices().filter(|idx| !emitted[idx.index()]) {
        referenced.extend(unresolved(idx));
    }

    g.node_indices()
        .filter(|idx| !emitted[idx.index()] && referenced.contains(&g[*idx]))
        .map(|idx| (g[idx].clone(), unresolved(idx)))
        .collect()
}
