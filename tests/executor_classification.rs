// tests/executor_classification.rs

#![cfg(unix)]

use std::error::Error;
use std::fs;

use tempfile::tempdir;

use reprowatch::exec::{execute, PipelineCommand};
use reprowatch_test_utils::init_tracing;

type TestResult = Result<(), Box<dyn Error>>;

fn sh(script: &str, workdir: &std::path::Path) -> PipelineCommand {
    PipelineCommand::new(
        vec!["sh".to_string(), "-c".to_string(), script.to_string()],
        workdir,
    )
}

#[tokio::test]
async fn exit_zero_is_success_with_captured_stdout() -> TestResult {
    init_tracing();
    let dir = tempdir()?;

    let result = execute(&sh("echo pipeline done", dir.path())).await?;

    assert_eq!(result.exit_code, 0);
    assert!(result.success());
    assert!(result.stdout.contains("pipeline done"));
    assert!(result.stderr.is_empty());

    Ok(())
}

#[tokio::test]
async fn nonzero_exit_is_a_result_not_an_error() -> TestResult {
    init_tracing();
    let dir = tempdir()?;

    let result = execute(&sh("echo boom 1>&2; exit 7", dir.path())).await?;

    assert_eq!(result.exit_code, 7);
    assert!(!result.success());
    assert!(result.stderr.contains("boom"));

    Ok(())
}

#[tokio::test]
async fn nonexistent_binary_is_a_launch_error() -> TestResult {
    init_tracing();
    let dir = tempdir()?;

    let command = PipelineCommand::new(
        vec!["reprowatch-no-such-binary-a61f".to_string()],
        dir.path(),
    );

    let err = execute(&command)
        .await
        .expect_err("spawning a nonexistent binary must fail");
    assert!(err.command.contains("reprowatch-no-such-binary-a61f"));

    Ok(())
}

#[tokio::test]
async fn killed_process_reports_synthetic_failure_code() -> TestResult {
    init_tracing();
    let dir = tempdir()?;

    // The shell kills itself; no exit code is available, so the executor
    // must report a well-formed failure with a synthetic -1.
    let result = execute(&sh("kill -9 $$", dir.path())).await?;

    assert_eq!(result.exit_code, -1);
    assert!(!result.success());

    Ok(())
}

#[tokio::test]
async fn working_directory_is_honoured() -> TestResult {
    init_tracing();
    let dir = tempdir()?;
    fs::write(dir.path().join("marker.txt"), "from the workdir")?;

    let result = execute(&sh("cat marker.txt", dir.path())).await?;

    assert_eq!(result.exit_code, 0);
    assert!(result.stdout.contains("from the workdir"));

    Ok(())
}
