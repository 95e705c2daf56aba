//! # Set Entity Status Task
//!
//! Automated task that moves the workflow's related entity to a fixed target
//! status. Typically wired after an approval step, e.g. "glossary term reached
//! reviewer consensus, mark it Approved".
//!
//! One execution:
//!
//! 1. hydrates the entity named by `relatedEntityLink`, soft-deleted or not
//! 2. picks the acting user (`resolvedByUser`, else the last updater)
//! 3. diffs the entity against a copy carrying the target status
//! 4. persists that patch through the entity's repository, exactly once
//!
//! When the entity already has the target status, nothing is persisted.

use super::actor::ActorResolver;
use super::context::WorkflowContext;
use super::resolver::EntityReferenceResolver;
use super::status_diff::{StatusChange, StatusDiffComputer};
use super::task::{AutomatedTask, TaskConfig, TaskOutcome, TaskServices};
use crate::constants::config_keys;
use crate::error::{TaskError, TaskResult};
use crate::logging::{log_error, log_task_operation};
use crate::models::{GlossaryTerm, GovernedEntity, LifecycleStatus};
use crate::storage::RepositoryProvider;
use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, info, instrument};

/// Sets a [`GovernedEntity`]'s status to a target bound at construction time
pub struct SetEntityStatusTask<E: GovernedEntity> {
    name: String,
    target_status: E::Status,
    resolver: EntityReferenceResolver<E>,
    actor_resolver: ActorResolver,
    diff: StatusDiffComputer,
    repositories: Arc<dyn RepositoryProvider>,
}

/// The glossary-term flavour registered as `setGlossaryTermStatusTask`
pub type SetGlossaryTermStatusTask = SetEntityStatusTask<GlossaryTerm>;

impl<E: GovernedEntity> std::fmt::Debug for SetEntityStatusTask<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SetEntityStatusTask")
            .field("name", &self.name)
            .field("entity_type", &E::ENTITY_TYPE)
            .field("target_status", &self.target_status)
            .field("attribution_policy", &self.actor_resolver.policy())
            .finish()
    }
}

impl<E: GovernedEntity> SetEntityStatusTask<E> {
    pub fn new(target_status: E::Status, services: TaskServices) -> Self {
        Self {
            name: format!("set{}StatusTask", capitalize(E::ENTITY_TYPE)),
            target_status,
            resolver: EntityReferenceResolver::new(services.store),
            actor_resolver: ActorResolver::new(services.attribution_policy),
            diff: StatusDiffComputer,
            repositories: services.repositories,
        }
    }

    /// Build from the task node's initialization block, reading the `status` key.
    ///
    /// Fails with [`TaskError::Configuration`] when the key is missing and with
    /// [`TaskError::InvalidStatus`] when the value is not a known status.
    pub fn from_config(config: &TaskConfig, services: TaskServices) -> TaskResult<Self> {
        let raw = config.get_string(config_keys::STATUS).ok_or_else(|| {
            TaskError::Configuration(format!(
                "{} task requires a string '{}' parameter",
                E::ENTITY_TYPE,
                config_keys::STATUS
            ))
        })?;
        let target_status = StatusDiffComputer::parse_target::<E>(&raw)?;
        Ok(Self::new(target_status, services))
    }

    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn target_status(&self) -> E::Status {
        self.target_status
    }

    async fn run(&self, context: &WorkflowContext) -> TaskResult<TaskOutcome> {
        let entity = self.resolver.resolve(context).await?;
        let entity_id = entity.id();
        let actor = self.actor_resolver.resolve(context, entity.updated_by())?;

        let change = self.diff.compute(&entity, self.target_status)?;
        let (from, to, patch) = match change {
            StatusChange::Unchanged { status } => {
                debug!(
                    entity_id = %entity_id,
                    status = %status,
                    "Entity already in target status, nothing to persist"
                );
                return Ok(TaskOutcome::Unchanged {
                    entity_id,
                    status: status.value().to_string(),
                });
            }
            StatusChange::Transition { from, to, patch } => (from, to, patch),
        };

        let repository = self.repositories.repository_for(E::ENTITY_TYPE)?;
        repository.apply_patch(entity_id, &actor, &patch).await?;

        info!(
            entity_id = %entity_id,
            from = %from,
            to = %to,
            actor = %actor,
            "Entity status updated"
        );

        Ok(TaskOutcome::Applied {
            entity_id,
            actor,
            from: from.value().to_string(),
            to: to.value().to_string(),
            patch,
        })
    }
}

#[async_trait]
impl<E: GovernedEntity> AutomatedTask for SetEntityStatusTask<E> {
    #[instrument(
        name = "automated_task",
        skip(self, context),
        fields(
            task = %self.name,
            entity_link = context.related_entity_link().unwrap_or_default(),
            target_status = %self.target_status,
        )
    )]
    async fn execute(&self, context: &WorkflowContext) -> TaskResult<TaskOutcome> {
        let result = self.run(context).await;

        match &result {
            Ok(outcome) => log_task_operation(
                "execute",
                &self.name,
                Some(outcome.entity_id()),
                if outcome.is_applied() { "applied" } else { "unchanged" },
                None,
            ),
            Err(err) => log_error(
                &self.name,
                "execute",
                &err.to_string(),
                Some(err.error_type()),
            ),
        }

        result
    }

    fn name(&self) -> &str {
        &self.name
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
