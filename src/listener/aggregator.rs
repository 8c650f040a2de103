//! Summary aggregator
//!
//! Turns the ordered lifecycle event stream of one run into per-kind
//! counters and a failure list.

use chrono::{DateTime, Utc};
use std::collections::HashMap;
use tracing::{debug, info, warn};

use super::{ExecutionListener, InvalidStateError, LifecycleEvent, NodeState};
use crate::models::{NodeKind, Outcome, TestIdentifier, TestPlan, UniqueId};
use crate::summary::{Counts, FailureRecord, RunSummary};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum RunPhase {
    NotStarted,
    Running,
    Finished,
}

/// Listener collecting a [`RunSummary`] for a single run.
///
/// Every node moves either `Registered -> Skipped` or
/// `Registered -> Started -> Finished`. Any other transition is rejected with
/// [`InvalidStateError`] before any counter is touched. A new aggregator is
/// needed for every run.
#[derive(Debug)]
pub struct SummaryAggregator {
    phase: RunPhase,
    time_started: Option<DateTime<Utc>>,
    time_finished: Option<DateTime<Utc>>,
    counts: [Counts; 2],
    nodes: HashMap<UniqueId, NodeState>,
    failures: Vec<FailureRecord>,
}

impl SummaryAggregator {
    pub fn new() -> Self {
        Self {
            phase: RunPhase::NotStarted,
            time_started: None,
            time_finished: None,
            counts: [Counts::default(); 2],
            nodes: HashMap::new(),
            failures: Vec::new(),
        }
    }

    /// Counters for one node kind
    pub fn counts(&self, kind: NodeKind) -> &Counts {
        &self.counts[kind.index()]
    }

    /// Current lifecycle state of a node, if it has been seen
    pub fn state_of(&self, id: &UniqueId) -> Option<NodeState> {
        self.nodes.get(id).copied()
    }

    pub fn failures(&self) -> &[FailureRecord] {
        &self.failures
    }

    pub fn is_finished(&self) -> bool {
        self.phase == RunPhase::Finished
    }

    /// Owned copy of the current state. Timestamps not yet recorded read as now.
    pub fn snapshot(&self) -> RunSummary {
        let now = Utc::now();
        let time_started = self.time_started.unwrap_or(now);

        RunSummary {
            time_started,
            time_finished: self.time_finished.unwrap_or(now),
            containers: self.counts[NodeKind::Container.index()],
            tests: self.counts[NodeKind::Test.index()],
            failures: self.failures.clone(),
        }
    }

    fn ensure_running(&self) -> Result<(), InvalidStateError> {
        match self.phase {
            RunPhase::NotStarted => Err(InvalidStateError::RunNotStarted),
            RunPhase::Running => Ok(()),
            RunPhase::Finished => Err(InvalidStateError::RunAlreadyFinished),
        }
    }

    /// Validate and apply a node transition. Counters are left to the caller.
    fn transition(
        &mut self,
        identifier: &TestIdentifier,
        event: LifecycleEvent,
    ) -> Result<(), InvalidStateError> {
        self.ensure_running()?;

        let from = self
            .nodes
            .get(&identifier.unique_id)
            .copied()
            .unwrap_or(NodeState::Registered);

        let to = match (from, event) {
            (NodeState::Registered, LifecycleEvent::Skip) => NodeState::Skipped,
            (NodeState::Registered, LifecycleEvent::Start) => NodeState::Started,
            (NodeState::Started, LifecycleEvent::Finish) => NodeState::Finished,
            _ => {
                warn!(
                    "Rejected {} of {} while {}",
                    event, identifier.unique_id, from
                );
                return Err(InvalidStateError::IllegalTransition {
                    id: identifier.unique_id.clone(),
                    from,
                    event,
                });
            }
        };

        self.nodes.insert(identifier.unique_id.clone(), to);
        Ok(())
    }
}

impl Default for SummaryAggregator {
    fn default() -> Self {
        Self::new()
    }
}

impl ExecutionListener for SummaryAggregator {
    fn on_run_started(&mut self, plan: &TestPlan) -> Result<(), InvalidStateError> {
        if self.phase != RunPhase::NotStarted {
            return Err(InvalidStateError::RunAlreadyStarted);
        }

        for identifier in plan {
            self.counts[identifier.kind.index()].found += 1;
            self.nodes
                .insert(identifier.unique_id.clone(), NodeState::Registered);
        }

        self.time_started = Some(Utc::now());
        self.phase = RunPhase::Running;

        info!(
            "Test plan execution started: {} containers, {} tests found",
            self.counts(NodeKind::Container).found,
            self.counts(NodeKind::Test).found
        );
        Ok(())
    }

    fn on_run_finished(&mut self, _plan: &TestPlan) -> Result<(), InvalidStateError> {
        self.ensure_running()?;

        self.time_finished = Some(Utc::now());
        self.phase = RunPhase::Finished;

        info!(
            "Test plan execution finished: {} failures",
            self.failures.len()
        );
        Ok(())
    }

    fn on_dynamic_test_registered(
        &mut self,
        identifier: &TestIdentifier,
    ) -> Result<(), InvalidStateError> {
        self.ensure_running()?;
        if self.nodes.contains_key(&identifier.unique_id) {
            return Err(InvalidStateError::AlreadyRegistered(
                identifier.unique_id.clone(),
            ));
        }

        self.nodes
            .insert(identifier.unique_id.clone(), NodeState::Registered);
        self.counts[identifier.kind.index()].found += 1;

        debug!("Registered dynamic {} {}", identifier.kind, identifier.unique_id);
        Ok(())
    }

    fn on_skipped(
        &mut self,
        identifier: &TestIdentifier,
        reason: &str,
    ) -> Result<(), InvalidStateError> {
        self.transition(identifier, LifecycleEvent::Skip)?;
        self.counts[identifier.kind.index()].skipped += 1;

        debug!("Skipped {}: {}", identifier.unique_id, reason);
        Ok(())
    }

    fn on_started(&mut self, identifier: &TestIdentifier) -> Result<(), InvalidStateError> {
        self.transition(identifier, LifecycleEvent::Start)?;
        self.counts[identifier.kind.index()].started += 1;

        debug!("Started {}", identifier.unique_id);
        Ok(())
    }

    fn on_finished(
        &mut self,
        identifier: &TestIdentifier,
        outcome: &Outcome,
    ) -> Result<(), InvalidStateError> {
        self.transition(identifier, LifecycleEvent::Finish)?;
        self.counts[identifier.kind.index()].record_outcome(outcome.status);

        if outcome.status.is_failure() {
            let record = FailureRecord {
                identifier: identifier.clone(),
                cause: outcome.cause.clone(),
            };
            debug!("Recorded failure: {}", record);
            self.failures.push(record);
        }

        debug!("Finished {}: {}", identifier.unique_id, outcome);
        Ok(())
    }
}
