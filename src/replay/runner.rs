//! Sequential replay
//!
//! Delivers a recorded run to a listener event by event, in log order.

use std::collections::HashMap;
use tracing::{debug, info};

use super::{EventLog, ReplayError, RunEvent};
use crate::listener::{ExecutionListener, SummaryAggregator};
use crate::models::{Outcome, TestIdentifier, TestPlan, UniqueId};
use crate::summary::RunSummary;

/// Replays events against a plan, resolving ids to identifiers
pub struct Replayer<'a> {
    plan: &'a TestPlan,
    dynamic: HashMap<UniqueId, TestIdentifier>,
}

impl<'a> Replayer<'a> {
    pub fn new(plan: &'a TestPlan) -> Self {
        Self {
            plan,
            dynamic: HashMap::new(),
        }
    }

    /// Identifier for `id`, from the plan or from earlier dynamic registrations
    pub fn resolve(&self, id: &UniqueId) -> Result<&TestIdentifier, ReplayError> {
        self.plan
            .get(id)
            .or_else(|| self.dynamic.get(id))
            .ok_or_else(|| ReplayError::UnknownIdentifier(id.clone()))
    }

    /// Deliver a single event
    pub fn apply<L: ExecutionListener + ?Sized>(
        &mut self,
        listener: &mut L,
        event: &RunEvent,
    ) -> Result<(), ReplayError> {
        match event {
            RunEvent::RunStarted => listener.on_run_started(self.plan)?,
            RunEvent::RunFinished => listener.on_run_finished(self.plan)?,
            RunEvent::DynamicRegistered(entry) => {
                let identifier = TestIdentifier::from(entry.clone());
                listener.on_dynamic_test_registered(&identifier)?;
                self.dynamic.insert(identifier.unique_id.clone(), identifier);
            }
            RunEvent::Skipped { id, reason } => {
                let identifier = self.resolve(id)?;
                listener.on_skipped(identifier, reason)?;
            }
            RunEvent::Started { id } => {
                let identifier = self.resolve(id)?;
                listener.on_started(identifier)?;
            }
            RunEvent::Finished { id, status, cause } => {
                let identifier = self.resolve(id)?;
                listener.on_finished(identifier, &Outcome::new(*status, cause.clone()))?;
            }
        }
        Ok(())
    }

    /// Deliver all events in order, stopping at the first rejected one
    pub fn replay_all<L: ExecutionListener + ?Sized>(
        &mut self,
        listener: &mut L,
        events: &[RunEvent],
    ) -> Result<(), ReplayError> {
        for (index, event) in events.iter().enumerate() {
            debug!("Replaying event {}: {:?}", index, event);
            self.apply(listener, event)?;
        }
        Ok(())
    }
}

/// Replay a log sequentially into a fresh aggregator and return its summary
pub fn summarize(log: &EventLog) -> Result<RunSummary, ReplayError> {
    let plan = log.build_plan()?;
    info!(
        "Replaying {} events over {} identifiers",
        log.events.len(),
        plan.len()
    );

    let mut aggregator = SummaryAggregator::new();
    Replayer::new(&plan).replay_all(&mut aggregator, &log.events)?;

    Ok(aggregator.snapshot())
}
