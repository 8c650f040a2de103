//! Execution outcome models
//!
//! Defines the outcome reported when a node finishes and the opaque cause
//! carried by aborted and failed outcomes.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Outcome status of a finished node
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutcomeStatus {
    Successful,
    Aborted,
    Failed,
}

impl OutcomeStatus {
    /// Only failed outcomes are recorded as failures; aborted ones are not
    pub fn is_failure(&self) -> bool {
        matches!(self, OutcomeStatus::Failed)
    }
}

impl fmt::Display for OutcomeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutcomeStatus::Successful => write!(f, "SUCCESSFUL"),
            OutcomeStatus::Aborted => write!(f, "ABORTED"),
            OutcomeStatus::Failed => write!(f, "FAILED"),
        }
    }
}

/// Error value attached to an aborted or failed outcome.
///
/// Renders as `<type_name>: <message>`, or just the type name when there is
/// no message.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cause {
    pub type_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl Cause {
    pub fn new(type_name: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            message: Some(message.into()),
        }
    }

    pub fn without_message(type_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            message: None,
        }
    }

    /// Capture an error using its Rust type name and message
    pub fn from_error<E: std::error::Error>(error: &E) -> Self {
        Self::new(std::any::type_name::<E>(), error.to_string())
    }
}

impl fmt::Display for Cause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.message {
            Some(message) => write!(f, "{}: {}", self.type_name, message),
            None => write!(f, "{}", self.type_name),
        }
    }
}

/// Outcome of a finished node
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Outcome {
    pub status: OutcomeStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cause: Option<Cause>,
}

impl Outcome {
    pub fn successful() -> Self {
        Self {
            status: OutcomeStatus::Successful,
            cause: None,
        }
    }

    pub fn aborted(cause: Cause) -> Self {
        Self::new(OutcomeStatus::Aborted, Some(cause))
    }

    pub fn failed(cause: Cause) -> Self {
        Self::new(OutcomeStatus::Failed, Some(cause))
    }

    pub fn new(status: OutcomeStatus, cause: Option<Cause>) -> Self {
        Self { status, cause }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.status)?;
        if let Some(cause) = &self.cause {
            write!(f, " ({cause})")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, thiserror::Error)]
    #[error("disk full")]
    struct DiskFull;

    #[test]
    fn test_cause_display() {
        let cause = Cause::new("java.lang.RuntimeException", "failed");
        assert_eq!(cause.to_string(), "java.lang.RuntimeException: failed");
        assert_eq!(Cause::without_message("Timeout").to_string(), "Timeout");
    }

    #[test]
    fn test_cause_from_error() {
        let cause = Cause::from_error(&DiskFull);
        assert!(cause.type_name.ends_with("DiskFull"));
        assert_eq!(cause.message.as_deref(), Some("disk full"));
        assert!(cause.to_string().ends_with("DiskFull: disk full"));
    }

    #[test]
    fn test_outcome_constructors() {
        assert_eq!(Outcome::successful().status, OutcomeStatus::Successful);
        assert!(Outcome::successful().cause.is_none());

        let aborted = Outcome::aborted(Cause::new("Assumption", "not on CI"));
        assert_eq!(aborted.status, OutcomeStatus::Aborted);
        assert!(!aborted.status.is_failure());

        let failed = Outcome::new(OutcomeStatus::Failed, None);
        assert!(failed.status.is_failure());
        assert_eq!(failed.to_string(), "FAILED");
    }
}
