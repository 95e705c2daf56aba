use crate::common::*;
use async_trait::async_trait;
use governance_core::models::{GlossaryTerm, GlossaryTermStatus};
use governance_core::workflow::{
    AutomatedTask, AutomatedTaskRegistry, TaskConfig, TaskOutcome, TaskServices, WorkflowContext,
};
use governance_core::{TaskError, TaskResult};
use serde_json::json;
use std::sync::Arc;
use uuid::Uuid;

struct NoopTask;

#[async_trait]
impl AutomatedTask for NoopTask {
    async fn execute(&self, _context: &WorkflowContext) -> TaskResult<TaskOutcome> {
        Ok(TaskOutcome::Unchanged {
            entity_id: Uuid::nil(),
            status: "n/a".to_string(),
        })
    }

    fn name(&self) -> &str {
        "noopTask"
    }
}

#[tokio::test]
async fn test_registry_builds_working_glossary_task() -> anyhow::Result<()> {
    let revenue = term("Revenue", GlossaryTermStatus::InReview);
    let store = store_with(&[&revenue]);
    let registry = AutomatedTaskRegistry::new(TaskServices::in_memory(store.clone()));

    let config = TaskConfig::from_value(json!({"status": "Approved"}))?;
    let task = registry.build("setGlossaryTermStatusTask", &config)?;
    assert_eq!(task.name(), "setGlossaryTermStatusTask");

    task.execute(&context_for(&revenue).with_resolved_by("alice"))
        .await?;
    let stored: GlossaryTerm = store
        .get(revenue.id)
        .ok_or_else(|| anyhow::anyhow!("term disappeared from the store"))?;
    assert_eq!(stored.status, GlossaryTermStatus::Approved);
    Ok(())
}

#[test]
fn test_status_must_be_a_string() {
    let registry = AutomatedTaskRegistry::new(TaskServices::in_memory(store_with(&[])));
    let config = TaskConfig::from_value(json!({"status": 3})).unwrap();
    let err = registry
        .build("setGlossaryTermStatusTask", &config)
        .err()
        .unwrap();
    assert!(matches!(err, TaskError::Configuration(_)));
}

#[tokio::test]
async fn test_custom_task_registration() {
    let mut registry = AutomatedTaskRegistry::new(TaskServices::in_memory(store_with(&[])));
    assert!(!registry.contains("noopTask"));

    registry.register(
        "noopTask",
        Arc::new(
            |_config: &TaskConfig, _services: TaskServices| -> TaskResult<Arc<dyn AutomatedTask>> {
                Ok(Arc::new(NoopTask))
            },
        ),
    );

    assert_eq!(
        registry.task_names(),
        vec!["noopTask", "setGlossaryTermStatusTask"]
    );
    let task = registry.build("noopTask", &TaskConfig::empty()).unwrap();
    let outcome = task.execute(&WorkflowContext::new()).await.unwrap();
    assert!(!outcome.is_applied());
}

#[test]
fn test_empty_registry_knows_no_tasks() {
    let registry = AutomatedTaskRegistry::empty(TaskServices::in_memory(store_with(&[])));
    assert!(registry.task_names().is_empty());
    assert!(matches!(
        registry.build("setGlossaryTermStatusTask", &TaskConfig::empty()),
        Err(TaskError::UnknownTask(_))
    ));
}
