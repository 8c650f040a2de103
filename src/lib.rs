//! Run Summary - test plan execution summaries
//!
//! Aggregates the lifecycle events of a test run (skipped, started and
//! finished nodes) into per-kind counters and a failure list, then renders
//! them as the familiar overview and failures report.
//!
//! ## Example
//!
//! ```
//! use run_summary::listener::{ExecutionListener, SummaryAggregator};
//! use run_summary::models::{Outcome, TestIdentifier, TestPlan};
//! use run_summary::output::render_overview;
//!
//! let test = TestIdentifier::test("calc/add", "add()");
//! let plan = TestPlan::from_identifiers(vec![test.clone()]).unwrap();
//!
//! let mut aggregator = SummaryAggregator::new();
//! aggregator.on_run_started(&plan).unwrap();
//! aggregator.on_started(&test).unwrap();
//! aggregator.on_finished(&test, &Outcome::successful()).unwrap();
//! aggregator.on_run_finished(&plan).unwrap();
//!
//! let summary = aggregator.snapshot();
//! assert_eq!(summary.tests.succeeded, 1);
//! assert!(render_overview(&summary).contains("1 tests successful"));
//! ```

pub mod config;
pub mod listener;
pub mod models;
pub mod output;
pub mod replay;
pub mod summary;
pub mod utils;

pub use listener::{ExecutionListener, InvalidStateError, SharedAggregator, SummaryAggregator};
pub use summary::{Counts, FailureRecord, RunSummary};
