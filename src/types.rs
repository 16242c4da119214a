// src/types.rs

//! Cross-cutting value types: triggers, their origins, and busy behaviour.

use std::collections::BTreeMap;
use std::path::Path;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::sensor::Fingerprint;

/// Behaviour when a trigger arrives while a pipeline run is already in flight.
///
/// - `Reject` (default): drop the trigger with a "busy" skip. The change
///   detector re-evaluates content on its next poll anyway.
/// - `Queue`: keep exactly one pending trigger (latest wins) and submit it
///   through the dedup gate once the active run completes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OnBusy {
    Reject,
    Queue,
}

impl Default for OnBusy {
    fn default() -> Self {
        OnBusy::Reject
    }
}

impl FromStr for OnBusy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "reject" => Ok(OnBusy::Reject),
            "queue" => Ok(OnBusy::Queue),
            other => Err(format!(
                "invalid on_busy: {other} (expected \"reject\" or \"queue\")"
            )),
        }
    }
}

/// Where a trigger came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriggerOrigin {
    ContentChange,
    Schedule,
}

impl TriggerOrigin {
    pub fn as_str(&self) -> &'static str {
        match self {
            TriggerOrigin::ContentChange => "content-change",
            TriggerOrigin::Schedule => "schedule",
        }
    }
}

/// A request for one pipeline run.
///
/// The dedup key identifies the triggering state; the gate guarantees at most
/// one accepted run per key. Key namespaces for the two origins are disjoint
/// by construction (`content:` vs `schedule:` prefix), so a content trigger
/// can never collide with a scheduled one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Trigger {
    pub dedup_key: String,
    pub tags: BTreeMap<String, String>,
}

impl Trigger {
    /// Trigger for a changed watched artifact.
    pub fn content_change(fingerprint: &Fingerprint, artifact: &Path) -> Self {
        let mut tags = BTreeMap::new();
        tags.insert(
            "origin".to_string(),
            TriggerOrigin::ContentChange.as_str().to_string(),
        );
        tags.insert("artifact".to_string(), artifact.display().to_string());
        tags.insert("fingerprint".to_string(), fingerprint.to_string());

        Self {
            dedup_key: format!("content:{fingerprint}"),
            tags,
        }
    }

    /// Trigger for a cron boundary at the given (UTC) instant.
    pub fn scheduled(at: DateTime<Utc>) -> Self {
        let mut tags = BTreeMap::new();
        tags.insert(
            "origin".to_string(),
            TriggerOrigin::Schedule.as_str().to_string(),
        );
        tags.insert("scheduled_for".to_string(), at.to_rfc3339());

        Self {
            dedup_key: format!("schedule:{}", at.to_rfc3339()),
            tags,
        }
    }

    /// The `origin` tag, if present.
    pub fn origin(&self) -> Option<&str> {
        self.tags.get("origin").map(String::as_str)
    }
}
