// src/plan/filter.rs

use tracing::{debug, trace};

use crate::dag::{Batches, TargetSet};
use crate::errors::{MakeError, Result};
use crate::plan::staleness::StalenessPolicy;
use crate::rules::{RuleSet, Target};

/// Reduce `batches` to the targets that actually need building for `goals`.
///
/// Fails before anything is built if a goal has no rule, if a goal (or
/// anything reachable from the goals) sits on a cycle, or if a stale target
/// has no rule to produce it. Batches with nothing outstanding are dropped;
/// the order of the remaining batches is preserved.
///
/// The filesystem is re-read on every call through `policy`.
pub fn batches_needing_build(
    rules: &dyn RuleSet,
    goals: &[Target],
    batches: &Batches,
    policy: &dyn StalenessPolicy,
) -> Result<Vec<TargetSet>> {
    for goal in goals {
        if rules.rule_for(goal).is_none() {
            return Err(MakeError::NoRuleToMakeTarget(goal.clone()));
        }
        if let Some(deps) = batches.cycles.get(goal) {
            return Err(MakeError::CircularDependency {
                target: goal.clone(),
                deps: deps.clone(),
            });
        }
    }

    // The graph only holds targets reachable from the goals, so any cycle at
    // all blocks some goal.
    if let Some((target, deps)) = batches.cycles.iter().next() {
        return Err(MakeError::CircularDependency {
            target: target.clone(),
            deps: deps.clone(),
        });
    }

    let mut needed = Vec::new();
    for (i, set) in batches.sets.iter().enumerate() {
        let mut outstanding = TargetSet::new();
        for target in set {
            let rule = rules.rule_for(target);
            let prereqs = rule.map(|r| r.prerequisites()).unwrap_or(&[]);

            if !policy.is_stale(target, prereqs)? {
                trace!(target = %target, "up to date");
                continue;
            }
            if rule.is_none() {
                return Err(MakeError::NoRuleToMakeTarget(target.clone()));
            }
            outstanding.push(target.clone());
        }

        if outstanding.is_empty() {
            trace!(batch = i, "nothing outstanding; skipping batch");
        } else {
            needed.push(outstanding);
        }
    }

    debug!(
        batches = needed.len(),
        targets = needed.iter().map(Vec::len).sum::<usize>(),
        "computed targets needing build"
    );

    Ok(needed)
}
