//! The callback contract between the host workflow engine and automated tasks.

use super::actor::AttributionPolicy;
use super::context::WorkflowContext;
use crate::error::TaskResult;
use crate::patch::JsonPatch;
use crate::storage::{EntityStore, InMemoryEntityStore, RepositoryProvider};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;

/// An automated step of a governance workflow.
///
/// The host engine builds one instance per task node of a workflow definition
/// and calls [`execute`](AutomatedTask::execute) once per process instance
/// reaching that node. Implementations hold only their static configuration
/// and shared boundaries, so a single instance serves concurrent executions.
#[async_trait]
pub trait AutomatedTask: Send + Sync {
    async fn execute(&self, context: &WorkflowContext) -> TaskResult<TaskOutcome>;

    /// Name under which the task is registered
    fn name(&self) -> &str;
}

/// What an execution did
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum TaskOutcome {
    /// A patch was persisted
    Applied {
        entity_id: Uuid,
        actor: String,
        from: String,
        to: String,
        patch: JsonPatch,
    },
    /// Entity was already in the target state
    Unchanged { entity_id: Uuid, status: String },
}

impl TaskOutcome {
    pub fn entity_id(&self) -> Uuid {
        match self {
            Self::Applied { entity_id, .. } | Self::Unchanged { entity_id, .. } => *entity_id,
        }
    }

    pub fn is_applied(&self) -> bool {
        matches!(self, Self::Applied { .. })
    }
}

/// Static initialization block bound to a task node in the workflow definition
///
/// ```rust
/// use governance_core::workflow::TaskConfig;
/// use serde_json::json;
///
/// let config = TaskConfig::from_value(json!({"status": "Approved"})).unwrap();
/// assert_eq!(config.get_string("status"), Some("Approved".to_string()));
/// assert!(!config.has("reviewers"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskConfig {
    pub data: HashMap<String, Value>,
}

impl TaskConfig {
    #[must_use]
    pub fn new(data: HashMap<String, Value>) -> Self {
        Self { data }
    }

    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build from a JSON object; anything else is rejected
    pub fn from_value(value: Value) -> Result<Self, serde_json::Error> {
        serde_json::from_value(value)
    }

    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.data.insert(key.into(), value.into());
        self
    }

    #[must_use]
    pub fn get_string(&self, key: &str) -> Option<String> {
        self.data
            .get(key)
            .and_then(|v| v.as_str().map(ToString::to_string))
    }

    #[must_use]
    pub fn get_bool(&self, key: &str) -> Option<bool> {
        self.data.get(key).and_then(Value::as_bool)
    }

    #[must_use]
    pub fn get_value(&self, key: &str) -> Option<&Value> {
        self.data.get(key)
    }

    #[must_use]
    pub fn has(&self, key: &str) -> bool {
        self.data.contains_key(key)
    }
}

/// Boundaries and policies shared by every task a registry builds
#[derive(Clone)]
pub struct TaskServices {
    pub store: Arc<dyn EntityStore>,
    pub repositories: Arc<dyn RepositoryProvider>,
    pub attribution_policy: AttributionPolicy,
}

impl std::fmt::Debug for TaskServices {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TaskServices")
            .field("attribution_policy", &self.attribution_policy)
            .finish_non_exhaustive()
    }
}

impl TaskServices {
    pub fn new(store: Arc<dyn EntityStore>, repositories: Arc<dyn RepositoryProvider>) -> Self {
        Self {
            store,
            repositories,
            attribution_policy: AttributionPolicy::default(),
        }
    }

    /// Use one in-memory store for both hydration and persistence
    pub fn in_memory(store: Arc<InMemoryEntityStore>) -> Self {
        Self::new(store.clone(), store)
    }

    #[must_use]
    pub fn with_attribution_policy(mut self, policy: AttributionPolicy) -> Self {
        self.attribution_policy = policy;
        self
    }
}
