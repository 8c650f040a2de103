//! Run summary snapshot
//!
//! Point-in-time, read-only view of an aggregated run: per-kind counters,
//! recorded failures and wall-clock timestamps.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::models::{Cause, NodeKind, OutcomeStatus, TestIdentifier};

/// Counters for one node kind
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Counts {
    pub found: usize,
    pub skipped: usize,
    pub started: usize,
    pub succeeded: usize,
    pub aborted: usize,
    pub failed: usize,
}

impl Counts {
    /// Number of started nodes that reported an outcome
    pub fn finished(&self) -> usize {
        self.succeeded + self.aborted + self.failed
    }

    /// Number of started nodes still waiting for an outcome
    pub fn pending(&self) -> usize {
        self.started.saturating_sub(self.finished())
    }

    pub(crate) fn record_outcome(&mut self, status: OutcomeStatus) {
        match status {
            OutcomeStatus::Successful => self.succeeded += 1,
            OutcomeStatus::Aborted => self.aborted += 1,
            OutcomeStatus::Failed => self.failed += 1,
        }
    }
}

/// A node that finished with a failed outcome
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailureRecord {
    pub identifier: TestIdentifier,
    pub cause: Option<Cause>,
}

impl fmt::Display for FailureRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.identifier.display_name)?;
        if let Some(cause) = &self.cause {
            write!(f, " => {cause}")?;
        }
        Ok(())
    }
}

/// Snapshot of an aggregated run
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunSummary {
    pub time_started: DateTime<Utc>,
    pub time_finished: DateTime<Utc>,
    pub containers: Counts,
    pub tests: Counts,
    pub failures: Vec<FailureRecord>,
}

impl RunSummary {
    /// Summary of a run that has not seen any event
    pub fn empty(at: DateTime<Utc>) -> Self {
        Self {
            time_started: at,
            time_finished: at,
            containers: Counts::default(),
            tests: Counts::default(),
            failures: Vec::new(),
        }
    }

    pub fn counts(&self, kind: NodeKind) -> &Counts {
        match kind {
            NodeKind::Container => &self.containers,
            NodeKind::Test => &self.tests,
        }
    }

    /// Wall-clock duration of the run, never negative
    pub fn duration(&self) -> Duration {
        (self.time_finished - self.time_started).max(Duration::zero())
    }

    pub fn duration_millis(&self) -> i64 {
        self.duration().num_milliseconds()
    }

    pub fn total_found(&self) -> usize {
        self.containers.found + self.tests.found
    }

    /// Failed containers plus failed tests. Aborted nodes are not failures.
    pub fn total_failure_count(&self) -> usize {
        self.containers.failed + self.tests.failed
    }

    pub fn is_successful(&self) -> bool {
        self.total_failure_count() == 0
    }

    /// Process exit code for a finished run
    pub fn exit_code(&self) -> i32 {
        if self.is_successful() {
            0
        } else {
            1
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Cause;

    fn summary_with(containers: Counts, tests: Counts) -> RunSummary {
        RunSummary {
            containers,
            tests,
            ..RunSummary::empty(Utc::now())
        }
    }

    #[test]
    fn test_counts_pending() {
        let counts = Counts {
            found: 5,
            started: 4,
            succeeded: 1,
            aborted: 1,
            failed: 1,
            ..Default::default()
        };
        assert_eq!(counts.finished(), 3);
        assert_eq!(counts.pending(), 1);
    }

    #[test]
    fn test_record_outcome() {
        let mut counts = Counts::default();
        counts.record_outcome(OutcomeStatus::Aborted);
        counts.record_outcome(OutcomeStatus::Failed);
        assert_eq!(counts.aborted, 1);
        assert_eq!(counts.failed, 1);
        assert_eq!(counts.succeeded, 0);
    }

    #[test]
    fn test_duration_clamped() {
        let now = Utc::now();
        let summary = RunSummary {
            time_started: now,
            time_finished: now - Duration::milliseconds(5),
            ..RunSummary::empty(now)
        };
        assert_eq!(summary.duration_millis(), 0);
    }

    #[test]
    fn test_total_failure_count() {
        let summary = summary_with(
            Counts {
                failed: 1,
                aborted: 2,
                ..Default::default()
            },
            Counts {
                failed: 2,
                ..Default::default()
            },
        );
        assert_eq!(summary.total_failure_count(), 3);
        assert!(!summary.is_successful());
        assert_eq!(summary.exit_code(), 1);
    }

    #[test]
    fn test_aborted_only_is_successful() {
        let summary = summary_with(
            Counts::default(),
            Counts {
                found: 1,
                started: 1,
                aborted: 1,
                ..Default::default()
            },
        );
        assert!(summary.is_successful());
        assert_eq!(summary.exit_code(), 0);
    }

    #[test]
    fn test_failure_record_display() {
        let record = FailureRecord {
            identifier: TestIdentifier::test("t", "failingTest"),
            cause: Some(Cause::new("RuntimeException", "failed")),
        };
        assert_eq!(record.to_string(), "failingTest => RuntimeException: failed");
    }
}
