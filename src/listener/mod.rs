//! Execution listeners
//!
//! Consumers of the lifecycle event stream produced while a test plan runs.

mod aggregator;
mod shared;

pub use aggregator::SummaryAggregator;
pub use shared::SharedAggregator;

use std::fmt;
use thiserror::Error;

use crate::models::{Outcome, TestIdentifier, TestPlan, UniqueId};

/// Lifecycle state of a single node
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NodeState {
    Registered,
    Skipped,
    Started,
    Finished,
}

impl fmt::Display for NodeState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeState::Registered => write!(f, "registered"),
            NodeState::Skipped => write!(f, "skipped"),
            NodeState::Started => write!(f, "started"),
            NodeState::Finished => write!(f, "finished"),
        }
    }
}

/// Per-node lifecycle event
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LifecycleEvent {
    Skip,
    Start,
    Finish,
}

impl fmt::Display for LifecycleEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LifecycleEvent::Skip => write!(f, "skip"),
            LifecycleEvent::Start => write!(f, "start"),
            LifecycleEvent::Finish => write!(f, "finish"),
        }
    }
}

/// Illegal lifecycle transitions. A rejected call leaves the listener unchanged.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InvalidStateError {
    #[error("Test plan execution already started")]
    RunAlreadyStarted,

    #[error("Test plan execution has not started")]
    RunNotStarted,

    #[error("Test plan execution already finished")]
    RunAlreadyFinished,

    #[error("Identifier {0} is already registered")]
    AlreadyRegistered(UniqueId),

    #[error("Cannot {event} {id}: node is {from}")]
    IllegalTransition {
        id: UniqueId,
        from: NodeState,
        event: LifecycleEvent,
    },
}

/// Receiver of test plan lifecycle events
pub trait ExecutionListener {
    fn on_run_started(&mut self, plan: &TestPlan) -> Result<(), InvalidStateError>;

    fn on_run_finished(&mut self, plan: &TestPlan) -> Result<(), InvalidStateError>;

    /// A node discovered while the plan is running
    fn on_dynamic_test_registered(
        &mut self,
        identifier: &TestIdentifier,
    ) -> Result<(), InvalidStateError>;

    fn on_skipped(
        &mut self,
        identifier: &TestIdentifier,
        reason: &str,
    ) -> Result<(), InvalidStateError>;

    fn on_started(&mut self, identifier: &TestIdentifier) -> Result<(), InvalidStateError>;

    fn on_finished(
        &mut self,
        identifier: &TestIdentifier,
        outcome: &Outcome,
    ) -> Result<(), InvalidStateError>;
}
