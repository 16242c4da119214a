// src/sensor/mod.rs

//! Change detection for the watched parameters artifact.
//!
//! - [`fingerprint`] computes the deterministic content digest.
//! - [`detector`] implements the edge-triggered poll against the cursor.
//! - [`store`] persists the cursor under `.reprowatch/` so restarts do not
//!   re-trigger on unchanged content.
//! - [`poller`] owns the periodic poll loop that feeds the runtime.

pub mod detector;
pub mod fingerprint;
pub mod poller;
pub mod store;

pub use detector::{ChangeDetector, Cursor, Poll, SkipReason};
pub use fingerprint::{fingerprint, Fingerprint};
pub use poller::spawn_poller;
pub use store::CursorStore;
