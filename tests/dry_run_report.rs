// tests/dry_run_report.rs

use std::sync::Arc;

use makedag::config::MakeOptions;
use makedag::engine::{Maker, write_target_sets};
use makedag::errors::MakeError;
use makedag::fs::mock::MockFileSystem;
use makedag::rules::RuleBook;
use makedag_test_utils::builders::{diamond, touch_rule};

fn maker(rules: RuleBook, goal: &str, fs: &MockFileSystem) -> Maker {
    Maker::new(Arc::new(rules), vec![goal.to_string()], MakeOptions::default())
        .unwrap()
        .with_file_system(Arc::new(fs.clone()))
}

fn dry_run_text(maker: &Maker) -> Result<String, MakeError> {
    let mut out = Vec::new();
    maker.dry_run(&mut out)?;
    Ok(String::from_utf8(out).unwrap())
}

#[test]
fn dry_run_lists_every_outstanding_batch() {
    let fs = MockFileSystem::new();
    let text = dry_run_text(&maker(diamond(), "D", &fs)).unwrap();

    assert_eq!(
        text,
        "========= TARGET SET 0 (1 targets)\n - A\n\n\
         ========= TARGET SET 1 (2 targets)\n - B\n - C\n\n\
         ========= TARGET SET 2 (1 targets)\n - D\n"
    );
}

#[test]
fn dry_run_renumbers_after_filtering() {
    let fs = MockFileSystem::new();
    fs.add_file("A", "");
    fs.add_file("B", "");
    let text = dry_run_text(&maker(diamond(), "D", &fs)).unwrap();

    assert_eq!(
        text,
        "========= TARGET SET 0 (1 targets)\n - C\n\n\
         ========= TARGET SET 1 (1 targets)\n - D\n"
    );
}

#[test]
fn dry_run_with_nothing_to_do() {
    let fs = MockFileSystem::new();
    for t in ["A", "B", "C", "D"] {
        fs.add_file(t, "");
    }
    let text = dry_run_text(&maker(diamond(), "D", &fs)).unwrap();
    assert_eq!(text, "No target sets need building.\n");
}

#[test]
fn dry_run_surfaces_cycles() {
    let rules: RuleBook = [touch_rule("X", &["Y"]), touch_rule("Y", &["X"])]
        .into_iter()
        .collect();
    let fs = MockFileSystem::new();
    let err = dry_run_text(&maker(rules, "X", &fs)).unwrap_err();
    assert_eq!(err.to_string(), r#"circular dependency for target "X": ["Y"]"#);
}

#[test]
fn dry_run_does_not_touch_the_filesystem() {
    let fs = MockFileSystem::new();
    let m = maker(diamond(), "D", &fs);
    dry_run_text(&m).unwrap();
    dry_run_text(&m).unwrap();
    assert!(fs.paths().is_empty());
}

#[test]
fn report_for_an_empty_sequence_uses_the_message() {
    let mut out = Vec::new();
    write_target_sets(&mut out, &[], "No targets.").unwrap();
    assert_eq!(out, b"No targets.\n");
}
