//! Event log replay
//!
//! Loads recorded runs and drives an [`ExecutionListener`] with their
//! events, either in order or with per-node event chains in parallel.
//!
//! [`ExecutionListener`]: crate::listener::ExecutionListener

mod event_log;
mod parallel;
mod runner;

pub use event_log::{EventLog, PlanEntry, RunEvent};
pub use parallel::ParallelReplayer;
pub use runner::{summarize, Replayer};

use std::path::PathBuf;
use thiserror::Error;

use crate::listener::InvalidStateError;
use crate::models::{PlanError, UniqueId};

/// Replay errors
#[derive(Error, Debug)]
pub enum ReplayError {
    #[error("Failed to access event log {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse YAML event log: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Failed to parse JSON event log: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid test plan: {0}")]
    Plan(#[from] PlanError),

    #[error("Invalid event sequence: {0}")]
    Lifecycle(#[from] InvalidStateError),

    #[error("Event references unknown identifier: {0}")]
    UnknownIdentifier(UniqueId),

    #[error("Replay task failed: {0}")]
    TaskFailed(String),
}
