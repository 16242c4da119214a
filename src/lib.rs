// src/lib.rs

pub mod cli;
pub mod config;
pub mod engine;
pub mod errors;
pub mod exec;
pub mod logging;
pub mod schedule;
pub mod sensor;
pub mod types;

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::anyhow;
use tokio::sync::mpsc;
use tracing::info;

use crate::cli::CliArgs;
use crate::config::loader::load_and_validate;
use crate::config::model::ConfigFile;
use crate::engine::{CoreRuntime, Runtime, RuntimeEvent, RuntimeOptions, RunOutcome};
use crate::errors::{ReprowatchError, Result};
use crate::exec::{PipelineCommand, ProcessRunner};
use crate::schedule::Cadence;
use crate::sensor::{ChangeDetector, CursorStore, Poll};

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - config loading + eager validation
/// - the change-detector poll loop and the cron loop
/// - the dedup gate / runtime
/// - the process runner
/// - Ctrl-C handling
pub async fn run(args: CliArgs) -> Result<()> {
    let config_path = PathBuf::from(&args.config);
    let cfg = load_and_validate(&config_path)?;

    if args.dry_run {
        print_dry_run(&cfg);
        return Ok(());
    }

    let root = config_root_dir(&config_path);
    let command = PipelineCommand::new(cfg.pipeline.cmd.clone(), root.join(&cfg.pipeline.workdir));

    if args.once {
        return run_once(&cfg, &root, command).await;
    }

    // Runtime event channel.
    let (rt_tx, rt_rx) = mpsc::channel::<RuntimeEvent>(64);

    // Process runner backend (real implementation in production).
    let runner = ProcessRunner::new(rt_tx.clone());

    // Change detector poll loop.
    let _poller_handle = match &cfg.watch {
        Some(watch) => {
            let detector = ChangeDetector::new(root.join(&watch.params));
            let store = CursorStore::default_in(&root);
            let cursor = store.load()?;
            let interval = Duration::from_secs(watch.poll_interval_secs);
            Some(sensor::spawn_poller(
                detector,
                store,
                cursor,
                interval,
                rt_tx.clone(),
            ))
        }
        None => None,
    };

    // Cron loop.
    let _schedule_handle = match &cfg.schedule {
        Some(schedule) => {
            let cadence = Cadence::parse(&schedule.cadence, &schedule.timezone)?;
            Some(schedule::spawn_schedule(cadence, rt_tx.clone()))
        }
        None => None,
    };

    // Ctrl-C → graceful shutdown.
    {
        let tx = rt_tx.clone();
        tokio::spawn(async move {
            if let Err(e) = tokio::signal::ctrl_c().await {
                eprintln!("failed to listen for Ctrl+C: {e}");
                return;
            }
            let _ = tx.send(RuntimeEvent::ShutdownRequested).await;
        });
    }

    let options = RuntimeOptions {
        exit_when_idle: false,
        on_busy: cfg.runs.on_busy,
    };

    let core = CoreRuntime::new(options);
    let runtime = Runtime::new(core, command, rt_rx, runner);
    let records = runtime.run().await?;

    info!(completed_runs = records.len(), "reprowatch exiting");
    Ok(())
}

/// `--once` mode: a single detector poll; if the artifact changed, run the
/// pipeline to completion and report its outcome through the exit status.
async fn run_once(cfg: &ConfigFile, root: &Path, command: PipelineCommand) -> Result<()> {
    let watch = cfg.watch.as_ref().ok_or_else(|| {
        ReprowatchError::ConfigError("--once requires a [watch] section".to_string())
    })?;

    let detector = ChangeDetector::new(root.join(&watch.params));
    let store = CursorStore::default_in(root);
    let cursor = store.load()?;

    let (fingerprint, trigger) = match detector.poll(&cursor) {
        Poll::Skip(reason) => {
            info!(reason = reason.as_str(), "nothing to do");
            return Ok(());
        }
        Poll::Changed {
            fingerprint,
            trigger,
        } => (fingerprint, trigger),
    };

    store.save(&fingerprint)?;

    let (rt_tx, rt_rx) = mpsc::channel::<RuntimeEvent>(16);
    let runner = ProcessRunner::new(rt_tx.clone());

    rt_tx.send(RuntimeEvent::TriggerArrived(trigger)).await.ok();
    drop(rt_tx);

    let options = RuntimeOptions {
        exit_when_idle: true,
        on_busy: cfg.runs.on_busy,
    };

    let core = CoreRuntime::new(options);
    let runtime = Runtime::new(core, command, rt_rx, runner);
    let records = runtime.run().await?;

    match records.last().and_then(|record| record.outcome.as_ref()) {
        Some(RunOutcome::Success { .. }) | None => Ok(()),
        Some(RunOutcome::Failed { exit_code, .. }) => {
            Err(anyhow!("pipeline run failed with exit code {exit_code}").into())
        }
        Some(RunOutcome::LaunchFailed { message }) => {
            Err(anyhow!("pipeline could not be launched: {message}").into())
        }
    }
}

/// Figure out the project root.
///
/// - If the config path has a non-empty parent (e.g. "configs/Reprowatch.toml"),
///   we use that directory.
/// - If it's just a bare filename like "Reprowatch.toml" (parent = ""),
///   we fall back to the current working directory.
fn config_root_dir(config_path: &Path) -> PathBuf {
    match config_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
    }
}

/// Simple dry-run output: print the effective setup without executing.
fn print_dry_run(cfg: &ConfigFile) {
    println!("reprowatch dry-run");
    println!("  pipeline.cmd = {:?}", cfg.pipeline.cmd);
    println!("  pipeline.workdir = {}", cfg.pipeline.workdir.display());
    println!("  runs.on_busy = {:?}", cfg.runs.on_busy);

    match &cfg.watch {
        Some(watch) => {
            println!("  watch.params = {}", watch.params.display());
            println!("  watch.poll_interval_secs = {}", watch.poll_interval_secs);
        }
        None => println!("  watch: disabled"),
    }

    match &cfg.schedule {
        Some(schedule) => {
            println!("  schedule.cadence = {}", schedule.cadence);
            println!("  schedule.timezone = {}", schedule.timezone);
        }
        None => println!("  schedule: disabled"),
    }
}
