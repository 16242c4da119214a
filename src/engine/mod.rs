// src/engine/mod.rs

//! Trigger orchestration engine.
//!
//! This module ties together:
//! - the dedup gate (at-most-once execution per dedup key)
//! - the busy policy (what happens to triggers while a run is in flight)
//! - the main runtime event loop that reacts to:
//!   - change-detector and cron triggers
//!   - pipeline run completions
//!   - shutdown signals
//!
//! The pure core state machine lives in [`core`]; the async/IO shell is
//! implemented in [`runtime`].

use crate::types::Trigger;

/// Outcome of one pipeline run, as reported back to the runtime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    /// Exit code 0; stdout is surfaced as informational log.
    Success { stdout: String },
    /// Non-zero exit code; stderr is surfaced as error log.
    Failed { exit_code: i32, stderr: String },
    /// The command could not be started at all.
    LaunchFailed { message: String },
}

impl RunOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, RunOutcome::Success { .. })
    }
}

/// Runtime options used by both the core and the async shell.
#[derive(Debug, Clone, Copy)]
pub struct RuntimeOptions {
    /// If true, exit the runtime once no run is active and nothing is
    /// pending (used for `--once`).
    pub exit_when_idle: bool,
    /// Policy for triggers arriving while a run is in flight.
    pub on_busy: crate::types::OnBusy,
}

impl Default for RuntimeOptions {
    fn default() -> Self {
        Self {
            exit_when_idle: false,
            on_busy: crate::types::OnBusy::default(),
        }
    }
}

/// Events flowing into the runtime from the trigger sources and the runner.
#[derive(Debug, Clone)]
pub enum RuntimeEvent {
    /// A trigger arrived from the change detector or the cron schedule.
    TriggerArrived(Trigger),
    /// The pipeline run for `dedup_key` finished with a concrete outcome.
    RunCompleted {
        dedup_key: String,
        outcome: RunOutcome,
    },
    /// Graceful shutdown requested (e.g. Ctrl-C).
    ShutdownRequested,
}

pub mod core;
pub mod gate;
pub mod runtime;

pub use self::core::{CoreCommand, CoreRuntime, CoreStep};
pub use gate::{DedupGate, RunRecord, Submission};
pub use runtime::Runtime;
pub use crate::types::OnBusy;
