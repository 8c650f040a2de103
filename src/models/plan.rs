//! Test plan model
//!
//! An insertion-ordered set of identifiers forming a forest of containers
//! and tests. Built once before a run and only read afterwards.

use std::collections::HashMap;
use thiserror::Error;

use super::identifier::{NodeKind, TestIdentifier, UniqueId};

/// Test plan construction errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PlanError {
    #[error("Duplicate identifier in test plan: {0}")]
    DuplicateIdentifier(UniqueId),

    #[error("Identifier {id} references unknown parent {parent}")]
    UnknownParent { id: UniqueId, parent: UniqueId },
}

/// Test plan: identifiers in insertion order, keyed by unique id
#[derive(Clone, Debug, Default)]
pub struct TestPlan {
    identifiers: Vec<TestIdentifier>,
    index: HashMap<UniqueId, usize>,
}

impl TestPlan {
    /// Create an empty test plan
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a plan from identifiers, parents first
    pub fn from_identifiers(
        identifiers: impl IntoIterator<Item = TestIdentifier>,
    ) -> Result<Self, PlanError> {
        let mut plan = Self::new();
        for identifier in identifiers {
            plan.add(identifier)?;
        }
        Ok(plan)
    }

    /// Add an identifier. Its parent, if any, must already be present.
    pub fn add(&mut self, identifier: TestIdentifier) -> Result<(), PlanError> {
        if self.index.contains_key(&identifier.unique_id) {
            return Err(PlanError::DuplicateIdentifier(identifier.unique_id));
        }
        if let Some(parent) = &identifier.parent_id {
            if !self.index.contains_key(parent) {
                return Err(PlanError::UnknownParent {
                    id: identifier.unique_id.clone(),
                    parent: parent.clone(),
                });
            }
        }

        self.index
            .insert(identifier.unique_id.clone(), self.identifiers.len());
        self.identifiers.push(identifier);
        Ok(())
    }

    /// Look up an identifier by id
    pub fn get(&self, id: &UniqueId) -> Option<&TestIdentifier> {
        self.index.get(id).map(|&i| &self.identifiers[i])
    }

    pub fn contains(&self, id: &UniqueId) -> bool {
        self.index.contains_key(id)
    }

    /// Identifiers without a parent, in insertion order
    pub fn roots(&self) -> impl Iterator<Item = &TestIdentifier> {
        self.identifiers.iter().filter(|i| i.parent_id.is_none())
    }

    /// Direct children of `id`, in insertion order
    pub fn children<'a>(&'a self, id: &'a UniqueId) -> impl Iterator<Item = &'a TestIdentifier> {
        self.identifiers
            .iter()
            .filter(move |i| i.parent_id.as_ref() == Some(id))
    }

    /// Number of identifiers of the given kind
    pub fn count(&self, kind: NodeKind) -> usize {
        self.identifiers.iter().filter(|i| i.kind == kind).count()
    }

    pub fn contains_tests(&self) -> bool {
        self.identifiers.iter().any(TestIdentifier::is_test)
    }

    pub fn iter(&self) -> impl Iterator<Item = &TestIdentifier> {
        self.identifiers.iter()
    }

    pub fn len(&self) -> usize {
        self.identifiers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.identifiers.is_empty()
    }
}

impl<'a> IntoIterator for &'a TestPlan {
    type Item = &'a TestIdentifier;
    type IntoIter = std::slice::Iter<'a, TestIdentifier>;

    fn into_iter(self) -> Self::IntoIter {
        self.identifiers.iter()
    }
}
