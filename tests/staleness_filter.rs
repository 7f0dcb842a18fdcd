// tests/staleness_filter.rs

use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use makedag::config::MakeOptions;
use makedag::engine::Maker;
use makedag::errors::{MakeError, Result};
use makedag::fs::mock::MockFileSystem;
use makedag::plan::StalenessPolicy;
use makedag::rules::{RuleBook, Target};
use makedag_test_utils::builders::{diamond, touch_rule};

fn maker_on(fs: &MockFileSystem, rules: RuleBook, goals: &[&str]) -> Maker {
    let goals = goals.iter().map(|s| s.to_string()).collect();
    Maker::new(Arc::new(rules), goals, MakeOptions::default())
        .unwrap()
        .with_file_system(Arc::new(fs.clone()))
}

fn sets(raw: &[&[&str]]) -> Vec<Vec<String>> {
    raw.iter()
        .map(|set| set.iter().map(|s| s.to_string()).collect())
        .collect()
}

#[test]
fn nothing_built_means_every_batch_is_needed() {
    let fs = MockFileSystem::new();
    let maker = maker_on(&fs, diamond(), &["D"]);

    let needed = maker.target_sets_needing_build().unwrap();
    assert_eq!(needed, sets(&[&["A"], &["B", "C"], &["D"]]));
}

#[test]
fn existing_artifact_drops_its_batch() {
    let fs = MockFileSystem::new();
    fs.add_file("A", "built");
    let maker = maker_on(&fs, diamond(), &["D"]);

    let needed = maker.target_sets_needing_build().unwrap();
    assert_eq!(needed, sets(&[&["B", "C"], &["D"]]));
}

#[test]
fn batches_shrink_instead_of_disappearing() {
    let fs = MockFileSystem::new();
    fs.add_file("A", "");
    fs.add_file("B", "");
    let maker = maker_on(&fs, diamond(), &["D"]);

    let needed = maker.target_sets_needing_build().unwrap();
    assert_eq!(needed, sets(&[&["C"], &["D"]]));
}

#[test]
fn repeated_calls_without_changes_are_identical() {
    let fs = MockFileSystem::new();
    fs.add_file("B", "");
    let maker = maker_on(&fs, diamond(), &["D"]);

    let first = maker.target_sets_needing_build().unwrap();
    let second = maker.target_sets_needing_build().unwrap();
    assert_eq!(first, second);
}

#[test]
fn creating_an_artifact_between_calls_is_picked_up() {
    let fs = MockFileSystem::new();
    let maker = maker_on(&fs, diamond(), &["D"]);

    let before = maker.target_sets_needing_build().unwrap();
    fs.add_file("C", "");
    let after = maker.target_sets_needing_build().unwrap();

    assert_eq!(before, sets(&[&["A"], &["B", "C"], &["D"]]));
    assert_eq!(after, sets(&[&["A"], &["B"], &["D"]]));
}

#[test]
fn everything_built_means_nothing_needed() {
    let fs = MockFileSystem::new();
    for t in ["A", "B", "C", "D"] {
        fs.add_file(t, "");
    }
    let maker = maker_on(&fs, diamond(), &["D"]);

    assert!(maker.target_sets_needing_build().unwrap().is_empty());
}

#[test]
fn goal_without_rule_is_rejected() {
    let fs = MockFileSystem::new();
    let maker = maker_on(&fs, diamond(), &["nope"]);

    match maker.target_sets_needing_build() {
        Err(MakeError::NoRuleToMakeTarget(target)) => assert_eq!(target, "nope"),
        other => panic!("expected NoRuleToMakeTarget, got {other:?}"),
    }
}

#[test]
fn goal_without_rule_is_rejected_even_if_the_file_exists() {
    let fs = MockFileSystem::new();
    fs.add_file("source.c", "");
    let maker = maker_on(&fs, diamond(), &["source.c"]);

    assert!(matches!(
        maker.target_sets_needing_build(),
        Err(MakeError::NoRuleToMakeTarget(_))
    ));
}

#[test]
fn missing_input_without_rule_is_reported() {
    let rules: RuleBook = [touch_rule("main.o", &["main.c"])].into_iter().collect();
    let fs = MockFileSystem::new();
    let maker = maker_on(&fs, rules, &["main.o"]);

    let err = maker.target_sets_needing_build().unwrap_err();
    assert!(matches!(&err, MakeError::NoRuleToMakeTarget(t) if t == "main.c"));
    assert_eq!(err.to_string(), "no rule to make target \"main.c\"");
}

#[test]
fn present_input_without_rule_is_satisfied() {
    let rules: RuleBook = [touch_rule("main.o", &["main.c"])].into_iter().collect();
    let fs = MockFileSystem::new();
    fs.add_file("main.c", "int main() {}");
    let maker = maker_on(&fs, rules, &["main.o"]);

    assert_eq!(
        maker.target_sets_needing_build().unwrap(),
        sets(&[&["main.o"]])
    );
}

#[test]
fn cyclic_goal_is_rejected() {
    let rules: RuleBook = [touch_rule("X", &["Y"]), touch_rule("Y", &["X"])]
        .into_iter()
        .collect();
    let fs = MockFileSystem::new();
    let maker = maker_on(&fs, rules, &["X"]);

    match maker.target_sets_needing_build() {
        Err(MakeError::CircularDependency { target, deps }) => {
            assert_eq!(target, "X");
            assert_eq!(deps, vec!["Y".to_string()]);
        }
        other => panic!("expected CircularDependency, got {other:?}"),
    }
}

#[test]
fn goal_depending_on_a_cycle_is_rejected() {
    let rules: RuleBook = [
        touch_rule("top", &["X"]),
        touch_rule("X", &["Y"]),
        touch_rule("Y", &["X"]),
    ]
    .into_iter()
    .collect();
    let fs = MockFileSystem::new();
    let maker = maker_on(&fs, rules, &["top"]);

    let err = maker.target_sets_needing_build().unwrap_err();
    match &err {
        MakeError::CircularDependency { target, .. } => {
            assert!(target == "X" || target == "Y", "unexpected target {target}");
        }
        other => panic!("expected CircularDependency, got {other:?}"),
    }
    assert!(err.to_string().starts_with("circular dependency for target"));
}

#[test]
fn missing_goal_rule_is_reported_before_cycles() {
    let rules: RuleBook = [touch_rule("X", &["X"])].into_iter().collect();
    let fs = MockFileSystem::new();
    let maker = maker_on(&fs, rules, &["missing", "X"]);

    assert!(matches!(
        maker.target_sets_needing_build(),
        Err(MakeError::NoRuleToMakeTarget(t)) if t == "missing"
    ));
}

/// Marks a fixed set of targets as fresh and records every query.
#[derive(Debug, Default)]
struct FreshList {
    fresh: HashSet<String>,
    asked: Mutex<Vec<(String, Vec<Target>)>>,
}

impl StalenessPolicy for FreshList {
    fn is_stale(&self, target: &str, prerequisites: &[Target]) -> Result<bool> {
        self.asked
            .lock()
            .unwrap()
            .push((target.to_string(), prerequisites.to_vec()));
        Ok(!self.fresh.contains(target))
    }
}

#[test]
fn staleness_policy_is_pluggable() {
    let policy = Arc::new(FreshList {
        fresh: ["A", "C"].iter().map(|s| s.to_string()).collect(),
        asked: Mutex::new(Vec::new()),
    });

    let fs = MockFileSystem::new();
    let maker = maker_on(&fs, diamond(), &["D"]).with_staleness(policy.clone());

    assert_eq!(
        maker.target_sets_needing_build().unwrap(),
        sets(&[&["B"], &["D"]])
    );

    let asked = policy.asked.lock().unwrap();
    let d = asked.iter().find(|(t, _)| t == "D").unwrap();
    assert_eq!(d.1, vec!["B".to_string(), "C".to_string()]);
}
