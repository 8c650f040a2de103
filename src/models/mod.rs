//! Data models for test plan execution
//!
//! Identifiers, the test plan they form, and the outcomes reported for them.

mod identifier;
mod outcome;
mod plan;

pub use identifier::{NodeKind, TestIdentifier, TestSource, UniqueId};
pub use outcome::{Cause, Outcome, OutcomeStatus};
pub use plan::{PlanError, TestPlan};
