// src/engine/runtime.rs

use std::fmt;

use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

use crate::errors::Result;
use crate::exec::{PipelineCommand, PipelineRun, RunnerBackend};

use super::core::{CoreCommand, CoreRuntime};
use super::gate::RunRecord;
use super::{RunOutcome, RuntimeEvent};

/// Drives the dedup gate and run lifecycle in response to `RuntimeEvent`s,
/// and delegates actual pipeline execution to a `RunnerBackend`.
///
/// This is an IO shell around [`CoreRuntime`], which contains all the
/// semantics. The shell reads events from the channel, surfaces run output
/// to the logs, and dispatches accepted runs.
pub struct Runtime<R: RunnerBackend> {
    core: CoreRuntime,
    command: PipelineCommand,
    event_rx: mpsc::Receiver<RuntimeEvent>,
    runner: R,
}

impl<R: RunnerBackend> fmt::Debug for Runtime<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Runtime")
            .field("core", &self.core)
            .field("command", &self.command)
            .finish_non_exhaustive()
    }
}

impl<R: RunnerBackend> Runtime<R> {
    pub fn new(
        core: CoreRuntime,
        command: PipelineCommand,
        event_rx: mpsc::Receiver<RuntimeEvent>,
        runner: R,
    ) -> Self {
        Self {
            core,
            command,
            event_rx,
            runner,
        }
    }

    /// Main event loop.
    ///
    /// Returns the records of all completed runs once the loop exits (channel
    /// closed, shutdown requested, or idle in `--once` mode).
    pub async fn run(mut self) -> Result<Vec<RunRecord>> {
        info!("reprowatch runtime started");

        loop {
            let event = match self.event_rx.recv().await {
                Some(event) => event,
                None => {
                    info!("runtime event channel closed; exiting");
                    break;
                }
            };

            debug!(?event, "runtime received event");

            if let RuntimeEvent::RunCompleted { dedup_key, outcome } = &event {
                log_outcome(dedup_key, outcome);
            }

            let step = self.core.step(event);

            for command in step.commands {
                self.execute_command(command).await?;
            }

            if !step.keep_running {
                break;
            }
        }

        info!("runtime exiting");
        Ok(self.core.into_completed())
    }

    async fn execute_command(&mut self, command: CoreCommand) -> Result<()> {
        match command {
            CoreCommand::DispatchRun { dedup_key } => {
                let run = PipelineRun {
                    dedup_key,
                    command: self.command.clone(),
                };
                self.runner.dispatch(run).await?;
            }
        }
        Ok(())
    }
}

/// Surface a run outcome to the host logs.
///
/// Success stdout is informational; failures carry stderr and the exit code.
/// A failure never terminates the loops, it only closes this one record.
fn log_outcome(dedup_key: &str, outcome: &RunOutcome) {
    match outcome {
        RunOutcome::Success { stdout } => {
            info!(run = %dedup_key, "pipeline run succeeded");
            if !stdout.is_empty() {
                info!(run = %dedup_key, "pipeline output:\n{stdout}");
            }
        }
        RunOutcome::Failed { exit_code, stderr } => {
            warn!(run = %dedup_key, exit_code, "pipeline run failed");
            if !stderr.is_empty() {
                error!(run = %dedup_key, "pipeline stderr:\n{stderr}");
            }
        }
        RunOutcome::LaunchFailed { message } => {
            error!(run = %dedup_key, "pipeline could not be launched: {message}");
        }
    }
}
