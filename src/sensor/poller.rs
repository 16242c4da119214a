// src/sensor/poller.rs

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

use crate::engine::RuntimeEvent;
use crate::sensor::detector::{ChangeDetector, Cursor, Poll};
use crate::sensor::store::CursorStore;

/// Spawn the periodic poll loop for the change detector.
///
/// Each tick is a discrete unit of work; `MissedTickBehavior::Delay` ensures
/// a new tick never starts while the previous one is still being evaluated.
/// The loop never terminates because of a skip or a failed run; it only stops
/// when the runtime channel closes.
pub fn spawn_poller(
    detector: ChangeDetector,
    store: CursorStore,
    mut cursor: Cursor,
    interval: Duration,
    runtime_tx: mpsc::Sender<RuntimeEvent>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        info!(
            artifact = %detector.artifact().display(),
            interval_secs = interval.as_secs(),
            cursor_set = cursor.is_some(),
            "change detector started"
        );

        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            ticker.tick().await;

            match detector.poll(&cursor) {
                Poll::Skip(reason) => {
                    debug!(reason = reason.as_str(), "poll skipped");
                }
                Poll::Changed {
                    fingerprint,
                    trigger,
                } => {
                    // Commit the cursor before handing the trigger over; a
                    // crash in between must not re-trigger this content.
                    if let Err(err) = store.save(&fingerprint) {
                        warn!(error = %err, "failed to persist cursor");
                    }
                    cursor = Some(fingerprint);

                    if runtime_tx
                        .send(RuntimeEvent::TriggerArrived(trigger))
                        .await
                        .is_err()
                    {
                        debug!("runtime channel closed, stopping change detector");
                        return;
                    }
                }
            }
        }
    })
}
