use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex};

use tokio::sync::mpsc;

use reprowatch::engine::{RunOutcome, RuntimeEvent};
use reprowatch::errors::Result;
use reprowatch::exec::{PipelineRun, RunnerBackend};

/// A fake runner that:
/// - records the dedup keys of runs it was asked to execute
/// - in auto mode, immediately reports `RunCompleted(Success)` per run
/// - in manual mode, reports nothing; the test drives completions itself,
///   which makes "run in flight" windows deterministic.
pub struct FakeRunner {
    runtime_tx: Option<mpsc::Sender<RuntimeEvent>>,
    executed: Arc<Mutex<Vec<String>>>,
}

impl FakeRunner {
    /// Auto-completing runner: every dispatched run succeeds immediately.
    pub fn new(
        runtime_tx: mpsc::Sender<RuntimeEvent>,
        executed: Arc<Mutex<Vec<String>>>,
    ) -> Self {
        Self {
            runtime_tx: Some(runtime_tx),
            executed,
        }
    }

    /// Recording-only runner; completions are sent by the test.
    pub fn manual(executed: Arc<Mutex<Vec<String>>>) -> Self {
        Self {
            runtime_tx: None,
            executed,
        }
    }
}

impl RunnerBackend for FakeRunner {
    fn dispatch(
        &mut self,
        run: PipelineRun,
    ) -> Pin<Box<dyn Future<Output = Result<()>> + Send + '_>> {
        let tx = self.runtime_tx.clone();
        let executed = Arc::clone(&self.executed);

        Box::pin(async move {
            {
                let mut guard = executed.lock().unwrap();
                guard.push(run.dedup_key.clone());
            }

            if let Some(tx) = tx {
                tx.send(RuntimeEvent::RunCompleted {
                    dedup_key: run.dedup_key,
                    outcome: RunOutcome::Success {
                        stdout: String::new(),
                    },
                })
                .await
                .map_err(|err| anyhow::anyhow!("sending fake completion: {err}"))?;
            }

            Ok(())
        })
    }
}
