// src/schedule/cron.rs

use std::str::FromStr;

use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use cron::Schedule as CronSchedule;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::engine::RuntimeEvent;
use crate::errors::{ReprowatchError, Result};
use crate::types::Trigger;

/// A parsed cron cadence plus the timezone it is evaluated in.
///
/// Parsing happens eagerly at startup: a malformed expression or unknown
/// timezone is a configuration error, never a failure at first fire.
/// Expressions use the `cron` crate's syntax with a seconds field, e.g.
/// `"0 */2 * * * *"` for every two minutes.
#[derive(Debug, Clone)]
pub struct Cadence {
    schedule: CronSchedule,
    timezone: Tz,
    expression: String,
}

impl Cadence {
    pub fn parse(expression: &str, timezone: &str) -> Result<Self> {
        let schedule = CronSchedule::from_str(expression).map_err(|err| {
            ReprowatchError::InvalidCadence {
                expression: expression.to_string(),
                reason: err.to_string(),
            }
        })?;

        let timezone: Tz = timezone
            .parse()
            .map_err(|_| ReprowatchError::InvalidTimezone(timezone.to_string()))?;

        Ok(Self {
            schedule,
            timezone,
            expression: expression.to_string(),
        })
    }

    pub fn expression(&self) -> &str {
        &self.expression
    }

    pub fn timezone(&self) -> Tz {
        self.timezone
    }

    /// Next boundary strictly after the given instant, in UTC.
    ///
    /// The expression is evaluated on the wall clock of `self.timezone` and
    /// the result converted back.
    pub fn next_after(&self, after: DateTime<Utc>) -> Option<DateTime<Utc>> {
        let local = after.with_timezone(&self.timezone);
        self.schedule
            .after(&local)
            .next()
            .map(|next| next.with_timezone(&Utc))
    }
}

/// Spawn the cron loop.
///
/// Each iteration computes the next boundary from `Utc::now()` and sleeps
/// until then, so boundaries that passed while the process was not running
/// are simply skipped: no backfill. The dedup key is derived from the
/// scheduled instant, so distinct firings never collide.
pub fn spawn_schedule(
    cadence: Cadence,
    runtime_tx: mpsc::Sender<RuntimeEvent>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        info!(
            cadence = %cadence.expression(),
            timezone = %cadence.timezone(),
            "cron schedule started"
        );

        loop {
            let now = Utc::now();
            let Some(next) = cadence.next_after(now) else {
                info!("cadence has no further occurrences, stopping");
                return;
            };

            let wait = (next - now).to_std().unwrap_or_default();
            debug!(next = %next.to_rfc3339(), wait_secs = wait.as_secs(), "sleeping until next boundary");
            tokio::time::sleep(wait).await;

            let trigger = Trigger::scheduled(next);
            if runtime_tx
                .send(RuntimeEvent::TriggerArrived(trigger))
                .await
                .is_err()
            {
                debug!("runtime channel closed, stopping cron schedule");
                return;
            }
        }
    })
}
