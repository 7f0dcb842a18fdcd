// src/dag/graph.rs

use std::collections::{HashMap, HashSet, VecDeque};

use petgraph::Direction;
use petgraph::graph::{DiGraph, NodeIndex};
use tracing::{debug, trace};

use crate::rules::{RuleSet, Target};

/// Dependency graph over every target reachable from a set of goals.
///
/// Edge direction: target -> prerequisite. For
///
/// ```toml
/// [rule."B"]
/// prereqs = ["A"]
/// ```
///
/// there is an edge `B -> A`.
///
/// Prerequisites without a rule still get a node (external inputs such as
/// source files); they simply have no outgoing edges. No cycle detection
/// happens here, see [`crate::dag::batcher`].
#[derive(Debug, Clone, Default)]
pub struct DependencyGraph {
    graph: DiGraph<Target, ()>,
    index: HashMap<Target, NodeIndex>,
}

impl DependencyGraph {
    /// Breadth-first expansion from `goals` through `rules`.
    ///
    /// Goals without a rule become isolated nodes; they are reported as
    /// missing later, when the build plan is computed.
    pub fn build(rules: &dyn RuleSet, goals: &[Target]) -> Self {
        let mut graph = Self::default();
        let mut seen: HashSet<Target> = HashSet::new();
        let mut queue: VecDeque<Target> = goals.iter().cloned().collect();

        while let Some(target) = queue.pop_front() {
            if !seen.insert(target.clone()) {
                continue;
            }

            let node = graph.node(&target);
            let Some(rule) = rules.rule_for(&target) else {
                trace!(target = %target, "no rule; leaf node");
                continue;
            };

            let mut linked: HashSet<&str> = HashSet::new();
            for prereq in rule.prerequisites() {
                // Repeated prerequisites collapse into one edge.
                if !linked.insert(prereq.as_str()) {
                    continue;
                }
                let dep = graph.node(prereq);
                graph.graph.add_edge(node, dep, ());
                queue.push_back(prereq.clone());
            }
        }

        debug!(
            goals = goals.len(),
            nodes = graph.len(),
            edges = graph.graph.edge_count(),
            "dependency graph built"
        );

        graph
    }

    /// Node for `target`, created on first use.
    fn node(&mut self, target: &str) -> NodeIndex {
        if let Some(idx) = self.index.get(target) {
            return *idx;
        }
        let idx = self.graph.add_node(target.to_string());
        self.index.insert(target.to_string(), idx);
        idx
    }

    pub fn len(&self) -> usize {
        self.graph.node_count()
    }

    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }

    pub fn contains(&self, target: &str) -> bool {
        self.index.contains_key(target)
    }

    /// All targets in the graph, in insertion (BFS) order.
    pub fn targets(&self) -> impl Iterator<Item = &str> {
        self.graph.node_indices().map(|idx| self.graph[idx].as_str())
    }

    /// Direct prerequisites of `target`, in declared order.
    pub fn prerequisites_of(&self, target: &str) -> Vec<&str> {
        self.neighbors(target, Direction::Outgoing)
    }

    /// Targets that list `target` as a direct prerequisite.
    pub fn dependents_of(&self, target: &str) -> Vec<&str> {
        self.neighbors(target, Direction::Incoming)
    }

    fn neighbors(&self, target: &str, dir: Direction) -> Vec<&str> {
        let Some(&idx) = self.index.get(target) else {
            return Vec::new();
        };
        // petgraph walks edges newest first.
        let mut out: Vec<&str> = self
            .graph
            .neighbors_directed(idx, dir)
            .map(|n| self.graph[n].as_str())
            .collect();
        out.reverse();
        out
    }

    /// Index-based view used by the batcher.
    pub(crate) fn inner(&self) -> &DiGraph<Target, ()> {
        &self.graph
    }
}
