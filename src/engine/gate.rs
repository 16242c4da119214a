// src/engine/gate.rs

use std::collections::{BTreeMap, HashSet};

use tracing::debug;

use crate::engine::RunOutcome;
use crate::types::Trigger;

/// One accepted, non-duplicate execution attempt.
///
/// Created by the gate when a trigger is accepted; the outcome is filled in
/// once the runner reports back, and the record is terminal from then on.
#[derive(Debug, Clone)]
pub struct RunRecord {
    pub dedup_key: String,
    pub tags: BTreeMap<String, String>,
    pub outcome: Option<RunOutcome>,
}

impl RunRecord {
    fn from_trigger(trigger: Trigger) -> Self {
        Self {
            dedup_key: trigger.dedup_key,
            tags: trigger.tags,
            outcome: None,
        }
    }

    pub fn succeeded(&self) -> bool {
        matches!(self.outcome, Some(RunOutcome::Success { .. }))
    }
}

/// Verdict of the dedup gate for one submitted trigger.
#[derive(Debug, Clone)]
pub enum Submission {
    Accepted(RunRecord),
    /// A run for this key was already created. Not an error; the trigger is
    /// silently dropped.
    Duplicate,
}

/// At-most-once gate over dedup keys.
///
/// The seen-key set is scoped to the gate's lifetime. The gate itself is a
/// plain synchronous structure; serialization across trigger sources comes
/// from it living inside the single-threaded runtime core.
#[derive(Debug, Default)]
pub struct DedupGate {
    seen: HashSet<String>,
}

impl DedupGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Accept the trigger unless its dedup key has already produced a run.
    pub fn submit(&mut self, trigger: Trigger) -> Submission {
        if !self.seen.insert(trigger.dedup_key.clone()) {
            debug!(key = %trigger.dedup_key, "duplicate trigger dropped");
            return Submission::Duplicate;
        }

        Submission::Accepted(RunRecord::from_trigger(trigger))
    }

    /// Number of distinct keys that have produced a run.
    pub fn len(&self) -> usize {
        self.seen.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }
}
