// src/sensor/store.rs

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use tracing::info;

use crate::errors::Result;
use crate::sensor::detector::Cursor;
use crate::sensor::fingerprint::Fingerprint;

/// Path to the cursor file, relative to the project root.
///
/// The file holds a single line: the hex fingerprint last observed by the
/// change detector. It is an opaque value compared only for equality; the
/// round trip through this file must (and does) preserve it unchanged.
pub const CURSOR_FILE_PATH: &str = ".reprowatch/cursor";

/// File-backed persistence for the detector cursor.
///
/// This plays the "host storage" role: the detector itself never touches the
/// filesystem for state, it only receives and returns cursor values.
#[derive(Debug, Clone)]
pub struct CursorStore {
    path: PathBuf,
}

impl CursorStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The conventional store location under the given project root.
    pub fn default_in(root: &Path) -> Self {
        Self::new(root.join(CURSOR_FILE_PATH))
    }

    /// Load the persisted cursor, if any.
    ///
    /// A missing file is a fresh start (`None`), not an error.
    pub fn load(&self) -> Result<Cursor> {
        if !self.path.exists() {
            return Ok(None);
        }

        let contents = fs::read_to_string(&self.path)
            .with_context(|| format!("reading cursor file at {:?}", self.path))?;

        let trimmed = contents.trim();
        if trimmed.is_empty() {
            return Ok(None);
        }

        Ok(Some(Fingerprint::from_hex(trimmed)))
    }

    /// Persist the cursor, creating the parent directory if needed.
    pub fn save(&self, fingerprint: &Fingerprint) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("creating cursor directory at {parent:?}"))?;
        }

        fs::write(&self.path, format!("{fingerprint}\n"))
            .with_context(|| format!("writing cursor file at {:?}", self.path))?;

        info!(cursor = %fingerprint, "stored cursor");
        Ok(())
    }
}
