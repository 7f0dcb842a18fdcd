// tests/shell_runner.rs

#![cfg(unix)]

use std::error::Error;
use std::fs;
use std::sync::Arc;

use makedag::config::MakeOptions;
use makedag::engine::Maker;
use makedag::errors::{MakeError, RecipeError};
use makedag::exec::{CaptureBuffer, CommandRunner, RecipeInvocation, RuleOutput, ShellRunner};
use makedag::rules::{Rule, RuleBook, StaticRule};
use makedag_test_utils::{init_tracing, with_timeout};
use tempfile::TempDir;

type TestResult = Result<(), Box<dyn Error>>;

fn invocation(command: &str, output: RuleOutput) -> RecipeInvocation {
    RecipeInvocation {
        target: "t".to_string(),
        command: command.to_string(),
        output,
    }
}

#[tokio::test]
async fn successful_command_is_ok() -> TestResult {
    init_tracing();
    let runner = ShellRunner::new();
    with_timeout(runner.run_command(&invocation("true", RuleOutput::default()))).await?;
    Ok(())
}

#[tokio::test]
async fn nonzero_exit_reports_the_code() {
    init_tracing();
    let runner = ShellRunner::new();
    let err = with_timeout(runner.run_command(&invocation("exit 7", RuleOutput::default())))
        .await
        .unwrap_err();
    assert!(matches!(err, RecipeError::ExitCode(7)), "got {err:?}");
}

#[tokio::test]
async fn captured_output_is_complete_when_the_command_returns() -> TestResult {
    init_tracing();
    let stdout = CaptureBuffer::new();
    let stderr = CaptureBuffer::new();
    let runner = ShellRunner::new();

    with_timeout(runner.run_command(&invocation(
        "echo hello; echo oops >&2",
        RuleOutput::capture(&stdout, &stderr),
    )))
    .await?;

    assert_eq!(stdout.contents(), "hello\n");
    assert_eq!(stderr.contents(), "oops\n");
    Ok(())
}

fn abs(dir: &TempDir, name: &str) -> String {
    dir.path().join(name).to_string_lossy().into_owned()
}

#[tokio::test]
async fn builds_a_chain_of_real_files() -> TestResult {
    init_tracing();
    let dir = TempDir::new()?;
    let src = abs(&dir, "main.c");
    let obj = abs(&dir, "main.o");
    let app = abs(&dir, "app");
    fs::write(&src, "int main() {}\n")?;

    let rules: RuleBook = [
        StaticRule::new(obj.as_str())
            .prereq(src.as_str())
            .recipe("cp $< $@"),
        StaticRule::new(app.as_str())
            .prereq(obj.as_str())
            .recipe("cat $^ > $@")
            .recipe("echo linked >> $@"),
    ]
    .into_iter()
    .collect();

    let maker = Maker::new(Arc::new(rules), vec![app.clone()], MakeOptions::default())?;
    with_timeout(maker.run()).await?;

    assert_eq!(fs::read_to_string(&obj)?, "int main() {}\n");
    assert_eq!(fs::read_to_string(&app)?, "int main() {}\nlinked\n");
    assert!(maker.target_sets_needing_build()?.is_empty());
    Ok(())
}

#[tokio::test]
async fn failing_recipe_removes_the_half_written_target() -> TestResult {
    init_tracing();
    let dir = TempDir::new()?;
    let out = abs(&dir, "out.txt");

    let rules: RuleBook = [StaticRule::new(out.as_str()).recipe("echo partial > $@ && exit 3")]
        .into_iter()
        .collect();

    let maker = Maker::new(Arc::new(rules), vec![out.clone()], MakeOptions::default())?;
    let err = with_timeout(maker.run()).await.unwrap_err();

    assert!(!dir.path().join("out.txt").exists());
    let MakeError::BatchFailed(batch) = &err else {
        panic!("expected BatchFailed, got {err:?}");
    };
    let failure = &batch.failures[0];
    assert!(matches!(failure.source, RecipeError::ExitCode(3)));
    assert_eq!(failure.command, format!("echo partial > {out} && exit 3"));
    assert!(err.to_string().contains("exit status 3"));
    Ok(())
}

#[tokio::test]
async fn output_router_decides_per_rule() -> TestResult {
    init_tracing();
    let dir = TempDir::new()?;
    let loud = abs(&dir, "loud");
    let quiet = abs(&dir, "quiet");

    let rules: RuleBook = [
        StaticRule::new(loud.as_str())
            .recipe("echo building loud")
            .recipe("touch $@"),
        StaticRule::new(quiet.as_str())
            .recipe("echo building quiet")
            .recipe("touch $@"),
    ]
    .into_iter()
    .collect();

    let captured = CaptureBuffer::new();
    let discard = CaptureBuffer::new();
    let loud_target = loud.clone();
    let (c, d) = (captured.clone(), discard.clone());
    let router = move |rule: &dyn Rule| {
        if rule.target() == loud_target {
            RuleOutput::capture(&c, &c)
        } else {
            RuleOutput::capture(&d, &d)
        }
    };

    let maker = Maker::new(Arc::new(rules), vec![loud, quiet], MakeOptions::default())?
        .with_output_routing(Arc::new(router));
    with_timeout(maker.run()).await?;

    assert_eq!(captured.contents(), "building loud\n");
    assert_eq!(discard.contents(), "building quiet\n");
    Ok(())
}

#[tokio::test]
async fn missing_working_dir_is_a_spawn_error() -> TestResult {
    init_tracing();
    let dir = TempDir::new()?;
    let rules: RuleBook = [StaticRule::new("out.txt").recipe("touch $@")]
        .into_iter()
        .collect();

    let maker = Maker::new(Arc::new(rules), vec!["out.txt".to_string()], MakeOptions::default())?
        .with_working_dir(dir.path().join("does-not-exist"));
    let err = with_timeout(maker.run()).await.unwrap_err();

    let MakeError::BatchFailed(batch) = &err else {
        panic!("expected BatchFailed, got {err:?}");
    };
    assert!(matches!(batch.failures[0].source, RecipeError::Spawn(_)));
    Ok(())
}

#[tokio::test]
async fn working_dir_failure_removes_the_artifact_there() -> TestResult {
    init_tracing();
    let dir = TempDir::new()?;
    let rules: RuleBook = [StaticRule::new("out.txt").recipe("echo partial > $@ && exit 3")]
        .into_iter()
        .collect();

    let maker = Maker::new(Arc::new(rules), vec!["out.txt".to_string()], MakeOptions::default())?
        .with_working_dir(dir.path());
    let err = with_timeout(maker.run()).await.unwrap_err();

    assert!(err.to_string().contains("exit status 3"));
    assert!(!dir.path().join("out.txt").exists());
    Ok(())
}

#[tokio::test]
async fn working_dir_artifacts_count_as_up_to_date() -> TestResult {
    init_tracing();
    let dir = TempDir::new()?;
    let rules: RuleBook = [
        StaticRule::new("src.txt").recipe("echo source > $@"),
        StaticRule::new("out.txt").prereq("src.txt").recipe("cp $< $@"),
    ]
    .into_iter()
    .collect();

    let maker = Maker::new(Arc::new(rules), vec!["out.txt".to_string()], MakeOptions::default())?
        .with_working_dir(dir.path());

    fs::write(dir.path().join("src.txt"), "given\n")?;
    assert_eq!(
        maker.target_sets_needing_build()?,
        vec![vec!["out.txt".to_string()]]
    );

    with_timeout(maker.run()).await?;

    assert_eq!(fs::read_to_string(dir.path().join("out.txt"))?, "given\n");
    assert!(maker.target_sets_needing_build()?.is_empty());
    Ok(())
}
