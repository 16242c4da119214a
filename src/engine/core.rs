// src/engine/core.rs

//! Pure core runtime state machine.
//!
//! This module contains a synchronous, deterministic "core runtime" that
//! consumes [`RuntimeEvent`]s and produces:
//! - an updated core state
//! - a list of "commands" describing what the IO shell should do next
//!
//! The async/IO-heavy shell (`engine::runtime::Runtime`) is responsible for:
//! - reading events from channels
//! - handing accepted runs to the runner backend
//! - handling Ctrl-C / shutdown
//!
//! The core can be unit tested without any Tokio, channels, filesystem, or
//! processes. It is also where the concurrency discipline lives: because all
//! triggers pass through this single state machine, near-simultaneous
//! identical triggers from the detector and the cron schedule can never both
//! be accepted, and at most one run is in flight at a time.

use tracing::{debug, info, warn};

use crate::engine::gate::{DedupGate, RunRecord, Submission};
use crate::engine::{RunOutcome, RuntimeEvent, RuntimeOptions};
use crate::types::{OnBusy, Trigger};

/// Command produced by the pure core, to be executed by the outer IO shell.
#[derive(Debug, Clone)]
pub enum CoreCommand {
    /// Hand the run with this dedup key to the runner backend.
    DispatchRun { dedup_key: String },
}

/// Decision returned by the core after handling a single `RuntimeEvent`.
#[derive(Debug, Clone)]
pub struct CoreStep {
    pub commands: Vec<CoreCommand>,
    /// Whether the outer runtime loop should keep running.
    pub keep_running: bool,
}

/// Pure core runtime state.
///
/// Owns the dedup gate, the single active-run slot, the (optional) pending
/// trigger slot, and the completed run records. No channels, no Tokio types,
/// no IO.
#[derive(Debug)]
pub struct CoreRuntime {
    gate: DedupGate,
    options: RuntimeOptions,
    active: Option<RunRecord>,
    pending: Option<Trigger>,
    completed: Vec<RunRecord>,
}

impl CoreRuntime {
    pub fn new(options: RuntimeOptions) -> Self {
        Self {
            gate: DedupGate::new(),
            options,
            active: None,
            pending: None,
            completed: Vec::new(),
        }
    }

    /// Whether no run is currently in flight.
    pub fn is_idle(&self) -> bool {
        self.active.is_none()
    }

    /// Records of all completed runs so far, in completion order.
    pub fn completed(&self) -> &[RunRecord] {
        &self.completed
    }

    pub fn into_completed(self) -> Vec<RunRecord> {
        self.completed
    }

    /// Feed one event into the state machine.
    pub fn step(&mut self, event: RuntimeEvent) -> CoreStep {
        match event {
            RuntimeEvent::TriggerArrived(trigger) => self.handle_trigger(trigger),
            RuntimeEvent::RunCompleted { dedup_key, outcome } => {
                self.handle_completion(dedup_key, outcome)
            }
            RuntimeEvent::ShutdownRequested => {
                info!("shutdown requested, stopping runtime");
                CoreStep {
                    commands: Vec::new(),
                    keep_running: false,
                }
            }
        }
    }

    fn handle_trigger(&mut self, trigger: Trigger) -> CoreStep {
        if self.active.is_some() {
            match self.options.on_busy {
                OnBusy::Reject => {
                    info!(
                        key = %trigger.dedup_key,
                        "run in flight, busy skip (trigger dropped)"
                    );
                }
                OnBusy::Queue => {
                    if let Some(replaced) = self.pending.replace(trigger) {
                        debug!(
                            key = %replaced.dedup_key,
                            "pending trigger replaced by a newer one"
                        );
                    }
                }
            }

            return CoreStep {
                commands: Vec::new(),
                keep_running: true,
            };
        }

        let commands = self.submit_trigger(trigger).into_iter().collect();
        CoreStep {
            commands,
            keep_running: true,
        }
    }

    fn handle_completion(&mut self, dedup_key: String, outcome: RunOutcome) -> CoreStep {
        match self.active.take() {
            Some(mut record) if record.dedup_key == dedup_key => {
                record.outcome = Some(outcome);
                self.completed.push(record);
            }
            other => {
                // Completion for a run we don't consider active; keep state.
                warn!(key = %dedup_key, "completion for unknown run, ignoring");
                self.active = other;
            }
        }

        let mut commands = Vec::new();

        if self.active.is_none() {
            if let Some(pending) = self.pending.take() {
                commands.extend(self.submit_trigger(pending));
            }
        }

        let idle = self.active.is_none() && self.pending.is_none();
        let keep_running = !(self.options.exit_when_idle && idle);
        if !keep_running {
            info!("runtime idle and exit_when_idle=true, stopping");
        }

        CoreStep {
            commands,
            keep_running,
        }
    }

    /// Run the trigger through the gate; on acceptance, mark the run active
    /// and emit a dispatch command.
    fn submit_trigger(&mut self, trigger: Trigger) -> Option<CoreCommand> {
        let origin = trigger.origin().unwrap_or("unknown").to_string();

        match self.gate.submit(trigger) {
            Submission::Duplicate => None,
            Submission::Accepted(record) => {
                info!(
                    key = %record.dedup_key,
                    origin = %origin,
                    "trigger accepted, dispatching pipeline run"
                );
                let dedup_key = record.dedup_key.clone();
                self.active = Some(record);
                Some(CoreCommand::DispatchRun { dedup_key })
            }
        }
    }
}
