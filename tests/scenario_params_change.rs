// tests/scenario_params_change.rs

//! End-to-end scenario with real processes:
//!
//! 1. params.yaml holds good content -> trigger h1 -> pipeline exits 0.
//! 2. Unchanged content -> skip.
//! 3. params.yaml changes to bad content -> trigger h2 -> pipeline exits 1
//!    with captured stderr.

#![cfg(unix)]

use std::error::Error;
use std::fs;

use tempfile::tempdir;
use tokio::sync::mpsc;
use tokio::time::{timeout, Duration};

use reprowatch::engine::{
    CoreRuntime, OnBusy, RunOutcome, Runtime, RuntimeEvent, RuntimeOptions,
};
use reprowatch::exec::{PipelineCommand, ProcessRunner};
use reprowatch::sensor::{ChangeDetector, Cursor, Poll, SkipReason};
use reprowatch_test_utils::init_tracing;

type TestResult = Result<(), Box<dyn Error>>;

#[tokio::test]
async fn content_change_drives_success_then_failure() -> TestResult {
    init_tracing();

    let dir = tempdir()?;
    let params = dir.path().join("params.yaml");
    fs::write(&params, "quality: good\n")?;

    // The "pipeline" inspects the params artifact, like `dvc repro` would.
    let command = PipelineCommand::new(
        vec![
            "sh".to_string(),
            "-c".to_string(),
            "grep -q good params.yaml && echo fine || { echo bad params 1>&2; exit 1; }"
                .to_string(),
        ],
        dir.path(),
    );

    let detector = ChangeDetector::new(&params);
    let mut cursor: Cursor = None;

    // Poll 1: first observation triggers.
    let t1 = match detector.poll(&cursor) {
        Poll::Changed {
            fingerprint,
            trigger,
        } => {
            cursor = Some(fingerprint);
            trigger
        }
        other => panic!("expected trigger, got {other:?}"),
    };

    // Poll 2: unchanged content is a skip.
    assert!(matches!(
        detector.poll(&cursor),
        Poll::Skip(SkipReason::Unchanged)
    ));

    // Poll 3: changed content triggers again with a new key.
    fs::write(&params, "quality: bad\n")?;
    let t2 = match detector.poll(&cursor) {
        Poll::Changed { trigger, .. } => trigger,
        other => panic!("expected trigger, got {other:?}"),
    };
    assert_ne!(t1.dedup_key, t2.dedup_key);
    assert!(t2.dedup_key.starts_with("content:"));

    // Drive both triggers through the runtime with the real process runner.
    // t2 arrives while t1's run is in flight, so queue it for afterwards.
    let (rt_tx, rt_rx) = mpsc::channel::<RuntimeEvent>(16);
    let runner = ProcessRunner::new(rt_tx.clone());

    rt_tx.send(RuntimeEvent::TriggerArrived(t1)).await?;
    rt_tx.send(RuntimeEvent::TriggerArrived(t2)).await?;
    drop(rt_tx);

    let options = RuntimeOptions {
        exit_when_idle: true,
        on_busy: OnBusy::Queue,
    };
    let runtime = Runtime::new(CoreRuntime::new(options), command, rt_rx, runner);

    let records = timeout(Duration::from_secs(10), runtime.run()).await??;

    assert_eq!(records.len(), 2);

    match records[0].outcome.as_ref() {
        Some(RunOutcome::Success { stdout }) => assert!(stdout.contains("fine")),
        other => panic!("expected success for first run, got {other:?}"),
    }

    match records[1].outcome.as_ref() {
        Some(RunOutcome::Failed { exit_code, stderr }) => {
            assert_eq!(*exit_code, 1);
            assert!(stderr.contains("bad params"));
        }
        other => panic!("expected failure for second run, got {other:?}"),
    }

    Ok(())
}
