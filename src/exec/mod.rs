// src/exec/mod.rs

//! Pipeline process execution layer.
//!
//! - [`command`] owns the single-invocation executor (`execute`) and the
//!   background runner loop that consumes [`PipelineRun`]s.
//! - [`backend`] abstracts the runner behind a trait so tests can swap in a
//!   fake that never spawns real processes.

pub mod backend;
pub mod command;

pub use backend::{ProcessRunner, RunnerBackend};
pub use command::{execute, ExecutionResult, LaunchError, PipelineCommand, PipelineRun};
