// src/sensor/detector.rs

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::sensor::fingerprint::{fingerprint, Fingerprint};
use crate::types::Trigger;

/// Last-observed fingerprint of the watched artifact.
///
/// `None` means "no prior observation"; the first readable poll will always
/// produce a trigger. The cursor is passed into [`ChangeDetector::poll`] and
/// a new value is handed back on change, so the caller decides how (and
/// whether) to persist it.
pub type Cursor = Option<Fingerprint>;

/// Why a poll produced no trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// The artifact does not exist or could not be read. Recoverable; the
    /// next poll retries.
    ArtifactMissing,
    /// Content fingerprint matches the cursor.
    Unchanged,
}

impl SkipReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            SkipReason::ArtifactMissing => "artifact missing",
            SkipReason::Unchanged => "unchanged",
        }
    }
}

/// Result of a single detector poll.
#[derive(Debug, Clone)]
pub enum Poll {
    Skip(SkipReason),
    /// Content differs from the cursor. The caller must commit `fingerprint`
    /// as the new cursor *before* submitting `trigger`, so a crash in between
    /// cannot re-trigger the same content on restart.
    Changed {
        fingerprint: Fingerprint,
        trigger: Trigger,
    },
}

/// Edge-triggered change detector for a single watched artifact.
///
/// Detection compares only against the immediately preceding cursor value,
/// not full history: a content sequence A, B, A produces three triggers.
#[derive(Debug, Clone)]
pub struct ChangeDetector {
    artifact: PathBuf,
}

impl ChangeDetector {
    pub fn new(artifact: impl Into<PathBuf>) -> Self {
        Self {
            artifact: artifact.into(),
        }
    }

    pub fn artifact(&self) -> &Path {
        &self.artifact
    }

    /// Evaluate the artifact once against the given cursor.
    ///
    /// Never fails: an unreadable artifact is a skip, not an error, and the
    /// cursor is left untouched in every skip case.
    pub fn poll(&self, cursor: &Cursor) -> Poll {
        let bytes = match fs::read(&self.artifact) {
            Ok(bytes) => bytes,
            Err(err) => {
                debug!(
                    artifact = %self.artifact.display(),
                    error = %err,
                    "watched artifact unreadable, skipping"
                );
                return Poll::Skip(SkipReason::ArtifactMissing);
            }
        };

        let current = fingerprint(&bytes);

        if cursor.as_ref() == Some(&current) {
            return Poll::Skip(SkipReason::Unchanged);
        }

        let trigger = Trigger::content_change(&current, &self.artifact);
        Poll::Changed {
            fingerprint: current,
            trigger,
        }
    }
}
