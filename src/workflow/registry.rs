//! # Automated Task Registry
//!
//! Maps the task names used in workflow definitions to factories that build a
//! configured task instance. The host engine builds one task per task node,
//! passing the node's initialization block as [`TaskConfig`].
//!
//! ```rust
//! use governance_core::storage::InMemoryEntityStore;
//! use governance_core::workflow::{AutomatedTaskRegistry, TaskConfig, TaskServices};
//! use std::sync::Arc;
//!
//! let services = TaskServices::in_memory(Arc::new(InMemoryEntityStore::new()));
//! let registry = AutomatedTaskRegistry::new(services);
//!
//! let config = TaskConfig::empty().with("status", "Approved");
//! let task = registry.build("setGlossaryTermStatusTask", &config).unwrap();
//! assert_eq!(task.name(), "setGlossaryTermStatusTask");
//! ```

use super::set_status::SetGlossaryTermStatusTask;
use super::task::{AutomatedTask, TaskConfig, TaskServices};
use crate::constants::task_names;
use crate::error::{TaskError, TaskResult};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info};

/// Builds a task instance from its initialization block
pub type TaskFactory =
    Arc<dyn Fn(&TaskConfig, TaskServices) -> TaskResult<Arc<dyn AutomatedTask>> + Send + Sync>;

pub struct AutomatedTaskRegistry {
    services: TaskServices,
    factories: HashMap<String, TaskFactory>,
}

impl std::fmt::Debug for AutomatedTaskRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AutomatedTaskRegistry")
            .field("task_count", &self.factories.len())
            .field("task_names", &self.task_names())
            .finish()
    }
}

impl AutomatedTaskRegistry {
    /// Create a registry with the built-in tasks pre-registered
    #[must_use]
    pub fn new(services: TaskServices) -> Self {
        let mut registry = Self::empty(services);
        registry.register_builtin_tasks();
        registry
    }

    #[must_use]
    pub fn empty(services: TaskServices) -> Self {
        Self {
            services,
            factories: HashMap::new(),
        }
    }

    fn register_builtin_tasks(&mut self) {
        self.register(
            task_names::SET_GLOSSARY_TERM_STATUS,
            Arc::new(
                |config: &TaskConfig, services: TaskServices| -> TaskResult<Arc<dyn AutomatedTask>> {
                    let task = SetGlossaryTermStatusTask::from_config(config, services)?
                        .with_name(task_names::SET_GLOSSARY_TERM_STATUS);
                    Ok(Arc::new(task))
                },
            ),
        );

        info!(
            task_count = self.factories.len(),
            "Registered built-in automated tasks"
        );
    }

    /// Register (or replace) the factory for `name`
    pub fn register(&mut self, name: impl Into<String>, factory: TaskFactory) {
        let name = name.into();
        debug!(task_name = %name, "Registering automated task");
        self.factories.insert(name, factory);
    }

    /// Build the task registered under `name`
    pub fn build(&self, name: &str, config: &TaskConfig) -> TaskResult<Arc<dyn AutomatedTask>> {
        let factory = self
            .factories
            .get(name)
            .ok_or_else(|| TaskError::UnknownTask(name.to_string()))?;

        factory(config, self.services.clone())
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.factories.contains_key(name)
    }

    /// Registered names, sorted
    #[must_use]
    pub fn task_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.factories.keys().cloned().collect();
        names.sort();
        names
    }

    pub fn services(&self) -> &TaskServices {
        &self.services
    }
}
