//! Per-execution workflow variables.

use crate::constants::variables;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

/// Variables the host workflow engine hands to one automated task execution.
///
/// Read-only from the task's point of view: tasks take `&WorkflowContext` and
/// never write back.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WorkflowContext {
    variables: HashMap<String, Value>,
}

impl WorkflowContext {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Context for a process instance about `entity_link`
    #[must_use]
    pub fn for_entity(entity_link: impl Into<String>) -> Self {
        Self::new().with_variable(
            variables::RELATED_ENTITY_VARIABLE,
            Value::String(entity_link.into()),
        )
    }

    #[must_use]
    pub fn with_variable(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(name, value);
        self
    }

    #[must_use]
    pub fn with_resolved_by(self, user: impl Into<String>) -> Self {
        self.with_variable(variables::RESOLVED_BY_VARIABLE, Value::String(user.into()))
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.variables.insert(name.into(), value.into());
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.variables.get(name)
    }

    /// String variable, `None` when absent or not a string
    #[must_use]
    pub fn get_str(&self, name: &str) -> Option<&str> {
        self.variables.get(name).and_then(Value::as_str)
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.variables.contains_key(name)
    }

    /// Raw `relatedEntityLink` value
    #[must_use]
    pub fn related_entity_link(&self) -> Option<&str> {
        self.get_str(variables::RELATED_ENTITY_VARIABLE)
    }

    /// `resolvedByUser` exactly as supplied, treating blank values as absent
    #[must_use]
    pub fn resolved_by(&self) -> Option<&str> {
        self.get_str(variables::RESOLVED_BY_VARIABLE)
            .filter(|user| !user.trim().is_empty())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.variables.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.variables.is_empty()
    }
}

impl From<HashMap<String, Value>> for WorkflowContext {
    fn from(variables: HashMap<String, Value>) -> Self {
        Self { variables }
    }
}

impl FromIterator<(String, Value)> for WorkflowContext {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Self {
            variables: iter.into_iter().collect(),
        }
    }
}
