// tests/config_behaviour.rs

use std::error::Error;
use std::fs;
use std::path::PathBuf;

use tempfile::tempdir;

use reprowatch::config::{load_and_validate, load_from_path, validate_config};
use reprowatch::errors::ReprowatchError;
use reprowatch::types::OnBusy;

type TestResult = Result<(), Box<dyn Error>>;

fn load_str(toml: &str) -> Result<reprowatch::config::ConfigFile, ReprowatchError> {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("Reprowatch.toml");
    fs::write(&path, toml).expect("write config");
    load_and_validate(&path)
}

#[test]
fn demo_config_loads_and_validates() -> TestResult {
    let manifest_dir = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    let cfg = load_and_validate(manifest_dir.join("demos/reprowatch.toml"))?;

    let watch = cfg.watch.as_ref().unwrap();
    assert_eq!(watch.params, PathBuf::from("params.yaml"));
    assert_eq!(watch.poll_interval_secs, 10);

    let schedule = cfg.schedule.as_ref().unwrap();
    assert_eq!(schedule.cadence, "0 */2 * * * *");
    assert_eq!(schedule.timezone, "Asia/Kolkata");

    assert_eq!(cfg.pipeline.cmd, vec!["dvc", "repro"]);
    assert_eq!(cfg.runs.on_busy, OnBusy::Reject);

    Ok(())
}

#[test]
fn watch_section_defaults_apply() -> TestResult {
    let cfg = load_str(
        r#"
        [watch]

        [pipeline]
        cmd = ["dvc", "repro"]
        "#,
    )?;

    let watch = cfg.watch.as_ref().unwrap();
    assert_eq!(watch.params, PathBuf::from("params.yaml"));
    assert_eq!(watch.poll_interval_secs, 10);
    assert_eq!(cfg.pipeline.workdir, PathBuf::from("."));
    assert!(cfg.schedule.is_none());
    assert_eq!(cfg.runs.on_busy, OnBusy::Reject);

    Ok(())
}

#[test]
fn schedule_only_config_is_valid() -> TestResult {
    let cfg = load_str(
        r#"
        [schedule]
        cadence = "0 0 * * * *"

        [pipeline]
        cmd = ["dvc", "repro"]
        "#,
    )?;

    assert!(cfg.watch.is_none());
    // Timezone defaults to UTC.
    assert_eq!(cfg.schedule.as_ref().unwrap().timezone, "UTC");

    Ok(())
}

#[test]
fn missing_trigger_sources_are_rejected() {
    let err = load_str(
        r#"
        [pipeline]
        cmd = ["dvc", "repro"]
        "#,
    )
    .unwrap_err();
    assert!(matches!(err, ReprowatchError::ConfigError(_)));
}

#[test]
fn empty_pipeline_command_is_rejected() {
    let err = load_str(
        r#"
        [watch]

        [pipeline]
        cmd = []
        "#,
    )
    .unwrap_err();
    assert!(matches!(err, ReprowatchError::ConfigError(_)));
}

#[test]
fn zero_poll_interval_is_rejected() {
    let err = load_str(
        r#"
        [watch]
        poll_interval_secs = 0

        [pipeline]
        cmd = ["dvc", "repro"]
        "#,
    )
    .unwrap_err();
    assert!(matches!(err, ReprowatchError::ConfigError(_)));
}

#[test]
fn malformed_cadence_fails_at_load_not_first_fire() {
    let err = load_str(
        r#"
        [schedule]
        cadence = "every two minutes"

        [pipeline]
        cmd = ["dvc", "repro"]
        "#,
    )
    .unwrap_err();
    assert!(matches!(err, ReprowatchError::InvalidCadence { .. }));
}

#[test]
fn invalid_on_busy_is_a_parse_error() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("Reprowatch.toml");
    fs::write(
        &path,
        r#"
        [watch]

        [pipeline]
        cmd = ["dvc", "repro"]

        [runs]
        on_busy = "retry"
        "#,
    )
    .expect("write config");

    let err = load_from_path(&path).unwrap_err();
    assert!(matches!(err, ReprowatchError::TomlError(_)));
}

#[test]
fn queue_on_busy_deserialises() -> TestResult {
    let cfg = load_str(
        r#"
        [watch]

        [pipeline]
        cmd = ["dvc", "repro"]

        [runs]
        on_busy = "queue"
        "#,
    )?;

    assert_eq!(cfg.runs.on_busy, OnBusy::Queue);
    validate_config(&cfg)?;

    Ok(())
}
