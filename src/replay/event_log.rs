//! Event log file model
//!
//! A recorded run: the plan's identifiers followed by the lifecycle events
//! delivered for them. Stored as YAML or JSON.

use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

use super::ReplayError;
use crate::models::{Cause, NodeKind, Outcome, OutcomeStatus, PlanError, TestIdentifier, TestPlan, TestSource, UniqueId};

/// One identifier of a recorded plan
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanEntry {
    pub id: UniqueId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<UniqueId>,
    pub display_name: String,
    pub kind: NodeKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<TestSource>,
}

impl From<PlanEntry> for TestIdentifier {
    fn from(entry: PlanEntry) -> Self {
        TestIdentifier {
            unique_id: entry.id,
            parent_id: entry.parent,
            display_name: entry.display_name,
            kind: entry.kind,
            source: entry.source,
        }
    }
}

impl From<&TestIdentifier> for PlanEntry {
    fn from(identifier: &TestIdentifier) -> Self {
        PlanEntry {
            id: identifier.unique_id.clone(),
            parent: identifier.parent_id.clone(),
            display_name: identifier.display_name.clone(),
            kind: identifier.kind,
            source: identifier.source.clone(),
        }
    }
}

/// Recorded lifecycle event
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum RunEvent {
    RunStarted,
    RunFinished,
    DynamicRegistered(PlanEntry),
    Skipped {
        id: UniqueId,
        #[serde(default)]
        reason: String,
    },
    Started {
        id: UniqueId,
    },
    Finished {
        id: UniqueId,
        status: OutcomeStatus,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        cause: Option<Cause>,
    },
}

impl RunEvent {
    pub fn skipped(id: impl Into<UniqueId>, reason: impl Into<String>) -> Self {
        RunEvent::Skipped {
            id: id.into(),
            reason: reason.into(),
        }
    }

    pub fn started(id: impl Into<UniqueId>) -> Self {
        RunEvent::Started { id: id.into() }
    }

    pub fn finished(id: impl Into<UniqueId>, outcome: Outcome) -> Self {
        RunEvent::Finished {
            id: id.into(),
            status: outcome.status,
            cause: outcome.cause,
        }
    }
}

/// Recorded run
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventLog {
    #[serde(default)]
    pub plan: Vec<PlanEntry>,
    #[serde(default)]
    pub events: Vec<RunEvent>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an identifier to the recorded plan
    pub fn with_identifier(mut self, identifier: &TestIdentifier) -> Self {
        self.plan.push(identifier.into());
        self
    }

    pub fn with_event(mut self, event: RunEvent) -> Self {
        self.events.push(event);
        self
    }

    /// Load an event log. `.yaml`/`.yml` files are parsed as YAML, anything else as JSON.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ReplayError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ReplayError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let log = if is_yaml_file(path) {
            Self::from_yaml(&content)?
        } else {
            Self::from_json(&content)?
        };

        debug!(
            "Loaded event log {}: {} identifiers, {} events",
            path.display(),
            log.plan.len(),
            log.events.len()
        );
        Ok(log)
    }

    pub fn from_yaml(content: &str) -> Result<Self, ReplayError> {
        Ok(serde_yaml::from_str(content)?)
    }

    pub fn from_json(content: &str) -> Result<Self, ReplayError> {
        Ok(serde_json::from_str(content)?)
    }

    /// Save the log, format chosen by extension as in [`EventLog::load`]
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ReplayError> {
        let path = path.as_ref();
        let content = if is_yaml_file(path) {
            serde_yaml::to_string(self)?
        } else {
            serde_json::to_string_pretty(self)?
        };

        std::fs::write(path, content).map_err(|source| ReplayError::Io {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Build the test plan described by the log
    pub fn build_plan(&self) -> Result<TestPlan, PlanError> {
        TestPlan::from_identifiers(self.plan.iter().cloned().map(TestIdentifier::from))
    }
}

/// Check if file is YAML based on extension
fn is_yaml_file(path: &Path) -> bool {
    path.extension()
        .map(|e| e == "yaml" || e == "yml")
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    const SAMPLE_YAML: &str = r#"
plan:
  - id: "[engine:demo]"
    display_name: demo
    kind: container
  - id: "[engine:demo]/[class:Calc]"
    parent: "[engine:demo]"
    display_name: Calc
    kind: container
    source:
      class:
        name: com.example.Calc
  - id: "[engine:demo]/[class:Calc]/[method:adds]"
    parent: "[engine:demo]/[class:Calc]"
    display_name: adds
    kind: test
events:
  - event: run_started
  - event: started
    id: "[engine:demo]/[class:Calc]/[method:adds]"
  - event: finished
    id: "[engine:demo]/[class:Calc]/[method:adds]"
    status: failed
    cause:
      type_name: AssertionError
      message: "expected 4, got 5"
  - event: skipped
    id: "[engine:demo]"
    reason: disabled
  - event: run_finished
"#;

    #[test]
    fn test_parse_yaml() {
        let log = EventLog::from_yaml(SAMPLE_YAML).unwrap();
        assert_eq!(log.plan.len(), 3);
        assert_eq!(log.events.len(), 5);
        assert_eq!(log.events[0], RunEvent::RunStarted);
        assert_eq!(
            log.events[2],
            RunEvent::finished(
                "[engine:demo]/[class:Calc]/[method:adds]",
                Outcome::failed(Cause::new("AssertionError", "expected 4, got 5"))
            )
        );
        assert_eq!(log.events[3], RunEvent::skipped("[engine:demo]", "disabled"));
    }

    #[test]
    fn test_build_plan() {
        let plan = EventLog::from_yaml(SAMPLE_YAML).unwrap().build_plan().unwrap();
        assert_eq!(plan.count(NodeKind::Container), 2);
        assert_eq!(plan.count(NodeKind::Test), 1);

        let calc = plan.get(&UniqueId::new("[engine:demo]/[class:Calc]")).unwrap();
        assert_eq!(calc.source, Some(TestSource::class("com.example.Calc")));
    }

    #[test]
    fn test_parse_json_dynamic_event() {
        let json = r#"{
            "plan": [{"id": "c", "display_name": "factory", "kind": "container"}],
            "events": [
                {"event": "run_started"},
                {"event": "dynamic_registered", "id": "c/1", "parent": "c", "display_name": "dyn", "kind": "test"},
                {"event": "started", "id": "c/1"},
                {"event": "finished", "id": "c/1", "status": "successful"},
                {"event": "run_finished"}
            ]
        }"#;
        let log = EventLog::from_json(json).unwrap();
        match &log.events[1] {
            RunEvent::DynamicRegistered(entry) => {
                assert_eq!(entry.kind, NodeKind::Test);
                assert_eq!(entry.parent, Some(UniqueId::new("c")));
            }
            other => panic!("Expected dynamic registration, got {other:?}"),
        }
    }

    #[test]
    fn test_save_load() {
        let dir = tempdir().unwrap();
        let test = TestIdentifier::test("t", "t");
        let log = EventLog::new()
            .with_identifier(&test)
            .with_event(RunEvent::RunStarted)
            .with_event(RunEvent::started("t"))
            .with_event(RunEvent::finished("t", Outcome::successful()))
            .with_event(RunEvent::RunFinished);

        for name in ["log.yaml", "log.json"] {
            let path = dir.path().join(name);
            log.save(&path).unwrap();
            assert_eq!(EventLog::load(&path).unwrap(), log);
        }
    }

    #[test]
    fn test_load_missing_file() {
        let err = EventLog::load("/nonexistent/run.yaml").unwrap_err();
        assert!(matches!(err, ReplayError::Io { .. }));
    }

    #[test]
    fn test_invalid_event_rejected() {
        let err = EventLog::from_yaml("events:\n  - event: exploded\n").unwrap_err();
        assert!(matches!(err, ReplayError::Yaml(_)));
    }
}
