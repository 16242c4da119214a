// src/sensor/fingerprint.rs

use std::fmt;

use serde::{Deserialize, Serialize};

/// Deterministic content digest of a watched artifact.
///
/// Only equality matters: two fingerprints are compared to decide whether
/// content changed, and the hex form doubles as the dedup key material. The
/// value is stable across process restarts, so persisted cursors stay
/// meaningful.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Fingerprint(String);

impl Fingerprint {
    /// Wrap an already-computed hex digest (e.g. loaded from the cursor store).
    pub fn from_hex(hex: impl Into<String>) -> Self {
        Fingerprint(hex.into())
    }

    pub fn as_hex(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Compute the fingerprint of a byte sequence.
///
/// Pure function, no side effects. blake3 gives us a collision-resistant
/// digest whose hex encoding is stable across runs.
pub fn fingerprint(bytes: &[u8]) -> Fingerprint {
    Fingerprint(blake3::hash(bytes).to_hex().to_string())
}
