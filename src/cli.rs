// src/cli.rs

//! CLI argument parsing using `clap`.

use clap::{Parser, ValueEnum};

/// Command-line arguments for `reprowatch`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "reprowatch",
    version,
    about = "Re-run a data pipeline when its parameters change or on a cron cadence.",
    long_about = None
)]
pub struct CliArgs {
    /// Path to the config file (TOML).
    ///
    /// Default: `Reprowatch.toml` in the current working directory.
    #[arg(long, value_name = "PATH", default_value = "Reprowatch.toml")]
    pub config: String,

    /// Evaluate the watched artifact once; if it changed, run the pipeline
    /// to completion and exit with its outcome. No polling, no cron.
    #[arg(long)]
    pub once: bool,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `REPROWATCH_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    /// Parse + validate, print the effective setup, but don't execute anything.
    #[arg(long)]
    pub dry_run: bool,
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}
