//! Test identifier models
//!
//! Defines unique ids, node kinds, source descriptors and the identifiers
//! that make up a test plan.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque unique key of a node in a test plan
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UniqueId(String);

impl UniqueId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UniqueId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for UniqueId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for UniqueId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// Kind of a test plan node
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    Container,
    Test,
}

impl NodeKind {
    /// Plural label used in summary tables
    pub fn plural(&self) -> &'static str {
        match self {
            NodeKind::Container => "containers",
            NodeKind::Test => "tests",
        }
    }

    /// Slot of this kind in per-kind lookup tables
    pub(crate) fn index(self) -> usize {
        match self {
            NodeKind::Container => 0,
            NodeKind::Test => 1,
        }
    }

    pub fn all() -> [NodeKind; 2] {
        [NodeKind::Container, NodeKind::Test]
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeKind::Container => write!(f, "container"),
            NodeKind::Test => write!(f, "test"),
        }
    }
}

/// Where a node was declared
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TestSource {
    /// A type or module holding tests
    Class { name: String },

    /// A single function inside a type or module
    Method { class: String, method: String },

    /// A location in a file
    File {
        path: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        line: Option<u32>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        column: Option<u32>,
    },
}

impl TestSource {
    pub fn class(name: impl Into<String>) -> Self {
        TestSource::Class { name: name.into() }
    }

    pub fn method(class: impl Into<String>, method: impl Into<String>) -> Self {
        TestSource::Method {
            class: class.into(),
            method: method.into(),
        }
    }

    pub fn file(path: impl Into<String>) -> Self {
        TestSource::File {
            path: path.into(),
            line: None,
            column: None,
        }
    }

    /// Attach a line (and optional column) to a file source. Other sources are returned as-is.
    pub fn at(self, line: u32, column: Option<u32>) -> Self {
        match self {
            TestSource::File { path, .. } => TestSource::File {
                path,
                line: Some(line),
                column,
            },
            other => other,
        }
    }
}

impl fmt::Display for TestSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TestSource::Class { name } => write!(f, "ClassSource [className = '{name}']"),
            TestSource::Method { class, method } => write!(
                f,
                "MethodSource [className = '{class}', methodName = '{method}']"
            ),
            TestSource::File { path, line, column } => {
                write!(f, "FileSource [path = '{path}'")?;
                if let Some(line) = line {
                    write!(f, ", line = {line}")?;
                }
                if let Some(column) = column {
                    write!(f, ", column = {column}")?;
                }
                write!(f, "]")
            }
        }
    }
}

/// Immutable description of one container or test in a plan
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestIdentifier {
    pub unique_id: UniqueId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<UniqueId>,
    pub display_name: String,
    pub kind: NodeKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<TestSource>,
}

impl TestIdentifier {
    pub fn new(unique_id: impl Into<UniqueId>, display_name: impl Into<String>, kind: NodeKind) -> Self {
        Self {
            unique_id: unique_id.into(),
            parent_id: None,
            display_name: display_name.into(),
            kind,
            source: None,
        }
    }

    pub fn container(unique_id: impl Into<UniqueId>, display_name: impl Into<String>) -> Self {
        Self::new(unique_id, display_name, NodeKind::Container)
    }

    pub fn test(unique_id: impl Into<UniqueId>, display_name: impl Into<String>) -> Self {
        Self::new(unique_id, display_name, NodeKind::Test)
    }

    pub fn with_parent(mut self, parent_id: impl Into<UniqueId>) -> Self {
        self.parent_id = Some(parent_id.into());
        self
    }

    pub fn with_source(mut self, source: TestSource) -> Self {
        self.source = Some(source);
        self
    }

    pub fn is_container(&self) -> bool {
        self.kind == NodeKind::Container
    }

    pub fn is_test(&self) -> bool {
        self.kind == NodeKind::Test
    }
}

impl fmt::Display for TestIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({} {})", self.display_name, self.kind, self.unique_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_kind_plural() {
        assert_eq!(NodeKind::Container.plural(), "containers");
        assert_eq!(NodeKind::Test.plural(), "tests");
    }

    #[test]
    fn test_source_display() {
        assert_eq!(
            TestSource::class("java.lang.Object").to_string(),
            "ClassSource [className = 'java.lang.Object']"
        );
        assert_eq!(
            TestSource::file("src/lib.rs").at(12, Some(5)).to_string(),
            "FileSource [path = 'src/lib.rs', line = 12, column = 5]"
        );
        assert_eq!(TestSource::class("A").at(3, None), TestSource::class("A"));
    }

    #[test]
    fn test_identifier_builders() {
        let id = TestIdentifier::test("[test:t1]", "t1")
            .with_parent("[container:c1]")
            .with_source(TestSource::method("Calc", "adds"));

        assert!(id.is_test());
        assert!(!id.is_container());
        assert_eq!(id.parent_id, Some(UniqueId::new("[container:c1]")));
        assert_eq!(id.to_string(), "t1 (test [test:t1])");
    }

    #[test]
    fn test_identifier_yaml() {
        let yaml = "unique_id: a\ndisplay_name: A\nkind: container\nsource:\n  class:\n    name: com.example.A\n";
        let id: TestIdentifier = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(id.kind, NodeKind::Container);
        assert_eq!(id.source, Some(TestSource::class("com.example.A")));
        assert!(id.parent_id.is_none());
    }
}
