// src/exec/command.rs

use std::io;
use std::path::PathBuf;
use std::process::Stdio;

use thiserror::Error;
use tokio::process::Command;
use tokio::sync::mpsc;
use tracing::{error, info};

use crate::engine::{RunOutcome, RuntimeEvent};

/// The external pipeline invocation: a fixed argument list plus a working
/// directory (e.g. `["dvc", "repro"]` in the repo root).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineCommand {
    pub argv: Vec<String>,
    pub workdir: PathBuf,
}

impl PipelineCommand {
    pub fn new(argv: Vec<String>, workdir: impl Into<PathBuf>) -> Self {
        Self {
            argv,
            workdir: workdir.into(),
        }
    }

    pub fn display(&self) -> String {
        self.argv.join(" ")
    }
}

/// One accepted run handed to the runner loop.
#[derive(Debug, Clone)]
pub struct PipelineRun {
    pub dedup_key: String,
    pub command: PipelineCommand,
}

/// The command could not be started at all (e.g. binary not found).
///
/// A non-zero exit code is *not* a launch error; it comes back as a normal
/// [`ExecutionResult`].
#[derive(Debug, Error)]
#[error("failed to launch pipeline command `{command}`: {source}")]
pub struct LaunchError {
    pub command: String,
    #[source]
    pub source: io::Error,
}

/// Outcome of exactly one pipeline invocation. Immutable once produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionResult {
    pub exit_code: i32,
    pub stdout: String,
    pub stderr: String,
}

impl ExecutionResult {
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }
}

/// Run the pipeline command once, capturing stdout and stderr in full.
///
/// - stdin is not inherited.
/// - A process killed by a signal has no exit code; we report a synthetic -1
///   so the caller always gets a well-formed failure.
/// - No retry, no timeout: one invocation per call.
pub async fn execute(command: &PipelineCommand) -> Result<ExecutionResult, LaunchError> {
    let (program, args) = command.argv.split_first().ok_or_else(|| LaunchError {
        command: String::new(),
        source: io::Error::new(io::ErrorKind::InvalidInput, "empty pipeline command"),
    })?;

    info!(
        cmd = %command.display(),
        workdir = %command.workdir.display(),
        "starting pipeline process"
    );

    let output = Command::new(program)
        .args(args)
        .current_dir(&command.workdir)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true)
        .output()
        .await
        .map_err(|source| LaunchError {
            command: command.display(),
            source,
        })?;

    let exit_code = output.status.code().unwrap_or(-1);

    info!(
        exit_code,
        success = output.status.success(),
        "pipeline process exited"
    );

    Ok(ExecutionResult {
        exit_code,
        stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
        stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
    })
}

/// Spawn the background runner loop.
///
/// The returned sender is what [`super::ProcessRunner`] dispatches runs on.
/// Runs are executed strictly one at a time here; the runtime additionally
/// never dispatches while another run is in flight, so at most one pipeline
/// process exists system-wide.
pub fn spawn_runner(runtime_tx: mpsc::Sender<RuntimeEvent>) -> mpsc::Sender<PipelineRun> {
    let (tx, mut rx) = mpsc::channel::<PipelineRun>(8);

    tokio::spawn(async move {
        info!("pipeline runner loop started");

        while let Some(run) = rx.recv().await {
            let outcome = match execute(&run.command).await {
                Ok(result) if result.success() => RunOutcome::Success {
                    stdout: result.stdout,
                },
                Ok(result) => RunOutcome::Failed {
                    exit_code: result.exit_code,
                    stderr: result.stderr,
                },
                Err(err) => {
                    error!(run = %run.dedup_key, error = %err, "pipeline launch failed");
                    RunOutcome::LaunchFailed {
                        message: err.to_string(),
                    }
                }
            };

            if runtime_tx
                .send(RuntimeEvent::RunCompleted {
                    dedup_key: run.dedup_key,
                    outcome,
                })
                .await
                .is_err()
            {
                break;
            }
        }

        info!("pipeline runner loop finished (channel closed)");
    });

    tx
}
