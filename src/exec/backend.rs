// src/exec/backend.rs

//! Pluggable runner backend abstraction.
//!
//! The runtime talks to a `RunnerBackend` instead of a raw mpsc sender. This
//! makes it easy to swap in a fake runner in tests while keeping the real
//! process execution in [`command`].

use std::future::Future;
use std::pin::Pin;

use anyhow::anyhow;
use tokio::sync::mpsc;

use crate::engine::RuntimeEvent;
use crate::errors::Result;

use super::command::{spawn_runner, PipelineRun};

/// Trait abstracting how accepted runs are executed.
///
/// Production code uses [`ProcessRunner`]; tests can provide their own
/// implementation that records dispatches and emits `RunCompleted` events
/// without spawning processes.
pub trait RunnerBackend: Send {
    fn dispatch(
        &mut self,
        run: PipelineRun,
    ) -> Pin<Box<dyn Future<Output = Result<()>> + Send + '_>>;
}

/// Real runner backend used in production.
///
/// Wraps the background runner loop in [`spawn_runner`]; `dispatch` forwards
/// the run over an mpsc channel.
pub struct ProcessRunner {
    tx: mpsc::Sender<PipelineRun>,
}

impl ProcessRunner {
    /// Create a new process runner, wiring it to the given runtime event
    /// sender. This spawns the background runner loop immediately.
    pub fn new(runtime_tx: mpsc::Sender<RuntimeEvent>) -> Self {
        let tx = spawn_runner(runtime_tx);
        Self { tx }
    }
}

impl RunnerBackend for ProcessRunner {
    fn dispatch(
        &mut self,
        run: PipelineRun,
    ) -> Pin<Box<dyn Future<Output = Result<()>> + Send + '_>> {
        Box::pin(async move {
            self.tx
                .send(run)
                .await
                .map_err(|err| anyhow!("sending run to pipeline runner: {err}"))?;
            Ok(())
        })
    }
}
