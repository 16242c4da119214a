// src/config/model.rs

use std::path::PathBuf;

use serde::Deserialize;

use crate::types::OnBusy;

/// Top-level configuration as read from a TOML file.
///
/// ```toml
/// [watch]
/// params = "params.yaml"
/// poll_interval_secs = 10
///
/// [schedule]
/// cadence = "0 */2 * * * *"
/// timezone = "Asia/Kolkata"
///
/// [pipeline]
/// cmd = ["dvc", "repro"]
/// workdir = "."
///
/// [runs]
/// on_busy = "reject"
/// ```
///
/// `[watch]` and `[schedule]` are each optional, but at least one must be
/// present (enforced by validation). `[pipeline]` is required.
#[derive(Debug, Clone, Deserialize)]
pub struct ConfigFile {
    /// Watched-artifact settings from `[watch]`.
    #[serde(default)]
    pub watch: Option<WatchSection>,

    /// Cron cadence settings from `[schedule]`.
    #[serde(default)]
    pub schedule: Option<ScheduleSection>,

    /// The pipeline invocation from `[pipeline]`.
    pub pipeline: PipelineSection,

    /// Run behaviour from `[runs]`.
    #[serde(default)]
    pub runs: RunsSection,
}

/// `[watch]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct WatchSection {
    /// Path of the watched parameters artifact, relative to the project root.
    #[serde(default = "default_params_path")]
    pub params: PathBuf,

    /// Minimum interval between detector polls, in seconds. Sub-second
    /// polling is not supported.
    #[serde(default = "default_poll_interval_secs")]
    pub poll_interval_secs: u64,
}

impl Default for WatchSection {
    fn default() -> Self {
        Self {
            params: default_params_path(),
            poll_interval_secs: default_poll_interval_secs(),
        }
    }
}

fn default_params_path() -> PathBuf {
    PathBuf::from("params.yaml")
}

fn default_poll_interval_secs() -> u64 {
    10
}

/// `[schedule]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct ScheduleSection {
    /// Cron expression with a seconds field, e.g. `"0 */2 * * * *"`.
    pub cadence: String,

    /// IANA timezone the cadence is evaluated in.
    #[serde(default = "default_timezone")]
    pub timezone: String,
}

fn default_timezone() -> String {
    "UTC".to_string()
}

/// `[pipeline]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct PipelineSection {
    /// Fixed argument list for the pipeline invocation. Must not be empty.
    pub cmd: Vec<String>,

    /// Working directory for the invocation.
    #[serde(default = "default_workdir")]
    pub workdir: PathBuf,
}

fn default_workdir() -> PathBuf {
    PathBuf::from(".")
}

/// `[runs]` section.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct RunsSection {
    /// Policy for triggers arriving while a run is in flight.
    #[serde(default)]
    pub on_busy: OnBusy,
}
