//! Shared summary aggregator
//!
//! Cloneable handle serializing events delivered from concurrent tasks.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use super::{ExecutionListener, InvalidStateError, SummaryAggregator};
use crate::models::{Outcome, TestIdentifier, TestPlan};
use crate::summary::RunSummary;

/// Thread-safe handle to a [`SummaryAggregator`].
///
/// Each call holds the lock for a single transition only.
#[derive(Clone, Debug, Default)]
pub struct SharedAggregator {
    inner: Arc<Mutex<SummaryAggregator>>,
}

impl SharedAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    // The aggregator validates before mutating, so a poisoned lock still guards consistent state.
    fn lock(&self) -> MutexGuard<'_, SummaryAggregator> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn run_started(&self, plan: &TestPlan) -> Result<(), InvalidStateError> {
        self.lock().on_run_started(plan)
    }

    pub fn run_finished(&self, plan: &TestPlan) -> Result<(), InvalidStateError> {
        self.lock().on_run_finished(plan)
    }

    pub fn dynamic_test_registered(
        &self,
        identifier: &TestIdentifier,
    ) -> Result<(), InvalidStateError> {
        self.lock().on_dynamic_test_registered(identifier)
    }

    pub fn skipped(&self, identifier: &TestIdentifier, reason: &str) -> Result<(), InvalidStateError> {
        self.lock().on_skipped(identifier, reason)
    }

    pub fn started(&self, identifier: &TestIdentifier) -> Result<(), InvalidStateError> {
        self.lock().on_started(identifier)
    }

    pub fn finished(
        &self,
        identifier: &TestIdentifier,
        outcome: &Outcome,
    ) -> Result<(), InvalidStateError> {
        self.lock().on_finished(identifier, outcome)
    }

    pub fn snapshot(&self) -> RunSummary {
        self.lock().snapshot()
    }
}

impl ExecutionListener for SharedAggregator {
    fn on_run_started(&mut self, plan: &TestPlan) -> Result<(), InvalidStateError> {
        self.run_started(plan)
    }

    fn on_run_finished(&mut self, plan: &TestPlan) -> Result<(), InvalidStateError> {
        self.run_finished(plan)
    }

    fn on_dynamic_test_registered(
        &mut self,
        identifier: &TestIdentifier,
    ) -> Result<(), InvalidStateError> {
        self.dynamic_test_registered(identifier)
    }

    fn on_skipped(
        &mut self,
        identifier: &TestIdentifier,
        reason: &str,
    ) -> Result<(), InvalidStateError> {
        self.skipped(identifier, reason)
    }

    fn on_started(&mut self, identifier: &TestIdentifier) -> Result<(), InvalidStateError> {
        self.started(identifier)
    }

    fn on_finished(
        &mut self,
        identifier: &TestIdentifier,
        outcome: &Outcome,
    ) -> Result<(), InvalidStateError> {
        self.finished(identifier, outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Cause;
    use futures::future::join_all;

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_delivery() {
        let tests: Vec<_> = (0..64)
            .map(|i| TestIdentifier::test(format!("t{i}"), format!("test {i}")))
            .collect();
        let plan = TestPlan::from_identifiers(tests.clone()).unwrap();

        let shared = SharedAggregator::new();
        shared.run_started(&plan).unwrap();

        let handles = tests.into_iter().enumerate().map(|(i, test)| {
            let shared = shared.clone();
            tokio::spawn(async move {
                shared.started(&test).unwrap();
                let outcome = if i % 4 == 0 {
                    Outcome::failed(Cause::new("AssertionError", format!("case {i}")))
                } else {
                    Outcome::successful()
                };
                shared.finished(&test, &outcome).unwrap();
            })
        });
        for result in join_all(handles).await {
            result.unwrap();
        }

        shared.run_finished(&plan).unwrap();
        let summary = shared.snapshot();
        assert_eq!(summary.tests.found, 64);
        assert_eq!(summary.tests.started, 64);
        assert_eq!(summary.tests.failed, 16);
        assert_eq!(summary.tests.succeeded, 48);
        assert_eq!(summary.failures.len(), summary.tests.failed);
    }

    #[test]
    fn test_listener_through_handle() {
        let test = TestIdentifier::test("t", "t");
        let plan = TestPlan::from_identifiers([test.clone()]).unwrap();

        let mut listener = SharedAggregator::new();
        let observer = listener.clone();
        listener.on_run_started(&plan).unwrap();
        listener.on_skipped(&test, "disabled").unwrap();
        assert!(listener.on_started(&test).is_err());
        listener.on_run_finished(&plan).unwrap();

        assert_eq!(observer.snapshot().tests.skipped, 1);
        assert_eq!(observer.snapshot().tests.started, 0);
    }
}
