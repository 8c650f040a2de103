//! Parallel replay
//!
//! Delivers each node's event chain from its own task while run-level
//! events stay in order. Counts match sequential replay; the order of
//! recorded failures may not.

use futures::future::join_all;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::Semaphore;
use tracing::{debug, info};

use super::{EventLog, ReplayError, RunEvent};
use crate::listener::SharedAggregator;
use crate::models::{Outcome, TestIdentifier, TestPlan, UniqueId};
use crate::summary::RunSummary;

/// Node event with its identifier already resolved
#[derive(Clone, Debug)]
enum NodeEvent {
    Skip(String),
    Start,
    Finish(Outcome),
}

/// Ordered events of one node
#[derive(Debug)]
struct Chain {
    identifier: TestIdentifier,
    events: Vec<NodeEvent>,
}

/// Parallel event log replayer
pub struct ParallelReplayer {
    max_concurrent: usize,
}

impl ParallelReplayer {
    pub fn new(max_concurrent: usize) -> Self {
        Self {
            max_concurrent: max_concurrent.max(1),
        }
    }

    /// Replay a log into a fresh shared aggregator and return its summary
    pub async fn summarize(&self, log: &EventLog) -> Result<RunSummary, ReplayError> {
        let plan = Arc::new(log.build_plan()?);
        let aggregator = SharedAggregator::new();

        info!(
            "Replaying {} events over {} identifiers (max {} concurrent)",
            log.events.len(),
            plan.len(),
            self.max_concurrent
        );

        let start = Instant::now();
        self.replay(&plan, &aggregator, &log.events).await?;

        debug!(
            "Parallel replay completed in {}ms",
            start.elapsed().as_millis()
        );
        Ok(aggregator.snapshot())
    }

    /// Replay events into `aggregator`.
    ///
    /// Node events are buffered per identifier and flushed concurrently
    /// before every run-level event and at the end of the log.
    pub async fn replay(
        &self,
        plan: &Arc<TestPlan>,
        aggregator: &SharedAggregator,
        events: &[RunEvent],
    ) -> Result<(), ReplayError> {
        let mut dynamic: HashMap<UniqueId, TestIdentifier> = HashMap::new();
        let mut chains: Vec<Chain> = Vec::new();
        let mut chain_index: HashMap<UniqueId, usize> = HashMap::new();

        for event in events {
            let (id, node_event) = match event {
                RunEvent::RunStarted => {
                    self.flush(aggregator, std::mem::take(&mut chains)).await?;
                    chain_index.clear();
                    aggregator.run_started(plan)?;
                    continue;
                }
                RunEvent::RunFinished => {
                    self.flush(aggregator, std::mem::take(&mut chains)).await?;
                    chain_index.clear();
                    aggregator.run_finished(plan)?;
                    continue;
                }
                RunEvent::DynamicRegistered(entry) => {
                    let identifier = TestIdentifier::from(entry.clone());
                    aggregator.dynamic_test_registered(&identifier)?;
                    dynamic.insert(identifier.unique_id.clone(), identifier);
                    continue;
                }
                RunEvent::Skipped { id, reason } => (id, NodeEvent::Skip(reason.clone())),
                RunEvent::Started { id } => (id, NodeEvent::Start),
                RunEvent::Finished { id, status, cause } => {
                    (id, NodeEvent::Finish(Outcome::new(*status, cause.clone())))
                }
            };

            match chain_index.get(id) {
                Some(&index) => chains[index].events.push(node_event),
                None => {
                    let identifier = plan
                        .get(id)
                        .or_else(|| dynamic.get(id))
                        .cloned()
                        .ok_or_else(|| ReplayError::UnknownIdentifier(id.clone()))?;
                    chain_index.insert(id.clone(), chains.len());
                    chains.push(Chain {
                        identifier,
                        events: vec![node_event],
                    });
                }
            }
        }

        self.flush(aggregator, chains).await
    }

    /// Deliver buffered chains concurrently and wait for all of them
    async fn flush(
        &self,
        aggregator: &SharedAggregator,
        chains: Vec<Chain>,
    ) -> Result<(), ReplayError> {
        if chains.is_empty() {
            return Ok(());
        }
        debug!("Delivering {} event chains", chains.len());

        let semaphore = Arc::new(Semaphore::new(self.max_concurrent));
        let mut handles = Vec::with_capacity(chains.len());

        for chain in chains {
            let semaphore = semaphore.clone();
            let aggregator = aggregator.clone();

            handles.push(tokio::spawn(async move {
                let _permit = semaphore
                    .acquire_owned()
                    .await
                    .map_err(|e| ReplayError::TaskFailed(e.to_string()))?;

                for event in &chain.events {
                    match event {
                        NodeEvent::Skip(reason) => aggregator.skipped(&chain.identifier, reason)?,
                        NodeEvent::Start => aggregator.started(&chain.identifier)?,
                        NodeEvent::Finish(outcome) => {
                            aggregator.finished(&chain.identifier, outcome)?
                        }
                    }
                }
                Ok::<(), ReplayError>(())
            }));
        }

        for result in join_all(handles).await {
            result.map_err(|e| ReplayError::TaskFailed(e.to_string()))??;
        }
        Ok(())
    }
}

impl Default for ParallelReplayer {
    fn default() -> Self {
        Self::new(4)
    }
}
