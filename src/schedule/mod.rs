// src/schedule/mod.rs

//! Calendar-cadence trigger source.
//!
//! Fires a trigger at each cron boundary, evaluated in a configured IANA
//! timezone. Purely time-driven: it knows nothing about the watched artifact.

pub mod cron;

pub use cron::{spawn_schedule, Cadence};
