// src/config/validate.rs

use crate::config::model::ConfigFile;
use crate::errors::{ReprowatchError, Result};
use crate::schedule::Cadence;

/// Validate a loaded config.
///
/// Everything here is checked eagerly at startup so that the detector and
/// schedule loops can assume a well-formed setup and never die mid-flight.
pub fn validate_config(cfg: &ConfigFile) -> Result<()> {
    if cfg.watch.is_none() && cfg.schedule.is_none() {
        return Err(ReprowatchError::ConfigError(
            "at least one of [watch] or [schedule] must be configured".to_string(),
        ));
    }

    if let Some(watch) = &cfg.watch {
        if watch.poll_interval_secs == 0 {
            return Err(ReprowatchError::ConfigError(
                "[watch].poll_interval_secs must be >= 1 (got 0)".to_string(),
            ));
        }
    }

    if cfg.pipeline.cmd.is_empty() {
        return Err(ReprowatchError::ConfigError(
            "[pipeline].cmd must not be empty".to_string(),
        ));
    }

    if let Some(schedule) = &cfg.schedule {
        // Parse-only: the result is rebuilt by the caller when wiring the loop.
        Cadence::parse(&schedule.cadence, &schedule.timezone)?;
    }

    Ok(())
}
