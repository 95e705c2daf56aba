//! End-to-end behaviour of the status transition task against fakes and the
//! in-memory store.

use crate::common::*;
use governance_core::constants::{Fields, Include};
use governance_core::models::{GlossaryTerm, GlossaryTermStatus};
use governance_core::patch::{apply, PatchOperation};
use governance_core::storage::errors::PersistenceError;
use governance_core::workflow::{
    AttributionPolicy, AutomatedTask, ResolutionError, SetGlossaryTermStatusTask, TaskOutcome,
    TaskServices, WorkflowContext,
};
use governance_core::TaskError;
use serde_json::json;
use std::sync::Arc;
use uuid::Uuid;

struct Harness {
    store: Arc<governance_core::storage::InMemoryEntityStore>,
    repository: Arc<RecordingRepository>,
    provider: Arc<RecordingProvider>,
}

impl Harness {
    fn new(terms: &[&GlossaryTerm]) -> Self {
        Self::with_repository(terms, RecordingRepository::new())
    }

    fn with_repository(terms: &[&GlossaryTerm], repository: Arc<RecordingRepository>) -> Self {
        Self {
            store: store_with(terms),
            provider: RecordingProvider::new(repository.clone()),
            repository,
        }
    }

    fn services(&self) -> TaskServices {
        TaskServices::new(self.store.clone(), self.provider.clone())
    }

    fn task(&self, target: GlossaryTermStatus) -> SetGlossaryTermStatusTask {
        SetGlossaryTermStatusTask::new(target, self.services())
    }
}

#[tokio::test]
async fn test_in_review_to_approved_attributed_to_resolver() {
    let revenue = term("Revenue", GlossaryTermStatus::InReview);
    let harness = Harness::new(&[&revenue]);
    let task = harness.task(GlossaryTermStatus::Approved);

    let ctx = context_for(&revenue).with_resolved_by("alice");
    let outcome = task.execute(&ctx).await.unwrap();

    let calls = harness.repository.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].entity_id, revenue.id);
    assert_eq!(calls[0].acting_user, "alice");
    assert_eq!(
        serde_json::to_value(&calls[0].patch).unwrap(),
        json!([{"op": "replace", "path": "/status", "value": "Approved"}])
    );
    assert_eq!(harness.provider.lookups(), vec!["glossaryTerm"]);

    match outcome {
        TaskOutcome::Applied {
            entity_id,
            actor,
            from,
            to,
            patch,
        } => {
            assert_eq!(entity_id, revenue.id);
            assert_eq!(actor, "alice");
            assert_eq!(from, "In Review");
            assert_eq!(to, "Approved");
            assert_eq!(patch, calls[0].patch);
        }
        other => panic!("expected an applied outcome, got {other:?}"),
    }
}

#[tokio::test]
async fn test_already_in_target_status_is_a_no_op() {
    let revenue = term("Revenue", GlossaryTermStatus::Approved);
    let harness = Harness::new(&[&revenue]);
    let task = harness.task(GlossaryTermStatus::Approved);

    let outcome = task
        .execute(&context_for(&revenue).with_resolved_by("alice"))
        .await
        .unwrap();

    assert_eq!(
        outcome,
        TaskOutcome::Unchanged {
            entity_id: revenue.id,
            status: "Approved".to_string(),
        }
    );
    assert_eq!(harness.repository.call_count(), 0);
    assert!(harness.provider.lookups().is_empty());
}

#[tokio::test]
async fn test_second_execution_is_idempotent() {
    let revenue = term("Revenue", GlossaryTermStatus::InReview);
    let store = store_with(&[&revenue]);
    let task = SetGlossaryTermStatusTask::new(
        GlossaryTermStatus::Approved,
        TaskServices::in_memory(store.clone()),
    );
    let ctx = context_for(&revenue).with_resolved_by("alice");

    assert!(task.execute(&ctx).await.unwrap().is_applied());
    assert!(!task.execute(&ctx).await.unwrap().is_applied());

    assert_eq!(store.change_count(), 1);
    let stored: GlossaryTerm = store.get(revenue.id).unwrap();
    assert_eq!(stored.status, GlossaryTermStatus::Approved);
    assert_eq!(stored.updated_by, "alice");
}

#[tokio::test]
async fn test_falls_back_to_last_updater_without_resolved_by() {
    let revenue = term("Revenue", GlossaryTermStatus::InReview);
    let harness = Harness::new(&[&revenue]);
    let task = harness.task(GlossaryTermStatus::Rejected);

    task.execute(&context_for(&revenue)).await.unwrap();
    task.execute(&context_for(&revenue).with_resolved_by("  "))
        .await
        .unwrap();

    let actors: Vec<String> = harness
        .repository
        .calls()
        .into_iter()
        .map(|call| call.acting_user)
        .collect();
    assert_eq!(actors, vec!["owner", "owner"]);
}

#[tokio::test]
async fn test_require_resolved_by_policy() {
    let revenue = term("Revenue", GlossaryTermStatus::InReview);
    let harness = Harness::new(&[&revenue]);
    let task = SetGlossaryTermStatusTask::new(
        GlossaryTermStatus::Approved,
        harness
            .services()
            .with_attribution_policy(AttributionPolicy::RequireResolvedBy),
    );

    let err = task.execute(&context_for(&revenue)).await.unwrap_err();
    assert!(matches!(err, TaskError::Attribution(_)));
    assert_eq!(harness.repository.call_count(), 0);

    task.execute(&context_for(&revenue).with_resolved_by("alice"))
        .await
        .unwrap();
    assert_eq!(harness.repository.calls()[0].acting_user, "alice");
}

#[tokio::test]
async fn test_entity_without_any_actor_is_rejected() {
    let mut orphan = term("Orphan", GlossaryTermStatus::Draft);
    orphan.updated_by = String::new();
    let harness = Harness::new(&[&orphan]);
    let task = harness.task(GlossaryTermStatus::InReview);

    let err = task.execute(&context_for(&orphan)).await.unwrap_err();
    assert!(matches!(err, TaskError::Attribution(_)));
    assert_eq!(harness.repository.call_count(), 0);
}

#[tokio::test]
async fn test_unresolvable_references_make_no_persistence_calls() {
    let revenue = term("Revenue", GlossaryTermStatus::InReview);
    let harness = Harness::new(&[&revenue]);
    let task = harness.task(GlossaryTermStatus::Approved);

    let contexts = [
        WorkflowContext::new(),
        WorkflowContext::new().with_variable("relatedEntityLink", json!(7)),
        WorkflowContext::for_entity("Business.Revenue"),
        WorkflowContext::for_entity("<#E::glossaryTerm::Business.Missing>"),
        WorkflowContext::for_entity("<#E::table::Business.Revenue>"),
    ];
    for ctx in &contexts {
        let err = task.execute(ctx).await.unwrap_err();
        assert!(
            matches!(err, TaskError::Resolution(_)),
            "unexpected error {err:?}"
        );
        assert!(!err.is_retryable());
    }

    assert_eq!(harness.repository.call_count(), 0);
    assert!(harness.provider.lookups().is_empty());
}

#[tokio::test]
async fn test_store_outage_is_retryable() {
    let repository = RecordingRepository::new();
    let services = TaskServices::new(
        FailingStore::unavailable(),
        RecordingProvider::new(repository.clone()),
    );
    let task = SetGlossaryTermStatusTask::new(GlossaryTermStatus::Approved, services);

    let err = task
        .execute(&WorkflowContext::for_entity(
            "<#E::glossaryTerm::Business.Revenue>",
        ))
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        TaskError::Resolution(ResolutionError::Unavailable { .. })
    ));
    assert!(err.is_retryable());
    assert_eq!(repository.call_count(), 0);
}

#[tokio::test]
async fn test_hydrates_all_fields_including_deleted() {
    let revenue = term("Revenue", GlossaryTermStatus::InReview);
    let store = SpyStore::returning(serde_json::to_value(&revenue).unwrap());
    let repository = RecordingRepository::new();
    let task = SetGlossaryTermStatusTask::new(
        GlossaryTermStatus::Approved,
        TaskServices::new(store.clone(), RecordingProvider::new(repository.clone())),
    );

    task.execute(&context_for(&revenue)).await.unwrap();

    assert_eq!(
        store.requests(),
        vec![(
            "<#E::glossaryTerm::Business.Revenue>".to_string(),
            Fields::All,
            Include::All
        )]
    );
}

#[tokio::test]
async fn test_soft_deleted_term_is_still_transitioned() {
    let retired = term("Retired", GlossaryTermStatus::Approved).soft_deleted();
    let store = store_with(&[&retired]);
    let task = SetGlossaryTermStatusTask::new(
        GlossaryTermStatus::Deprecated,
        TaskServices::in_memory(store.clone()),
    );

    task.execute(&context_for(&retired).with_resolved_by("steward"))
        .await
        .unwrap();

    let stored: GlossaryTerm = store.get(retired.id).unwrap();
    assert_eq!(stored.status, GlossaryTermStatus::Deprecated);
    assert!(stored.deleted);
}

#[tokio::test]
async fn test_conflict_propagates_unchanged() {
    let revenue = term("Revenue", GlossaryTermStatus::InReview);
    let conflict = PersistenceError::Conflict {
        entity_id: revenue.id,
        reason: "version 0.2 does not match 0.1".to_string(),
    };
    let harness =
        Harness::with_repository(&[&revenue], RecordingRepository::failing_with(conflict.clone()));
    let task = harness.task(GlossaryTermStatus::Approved);

    let err = task
        .execute(&context_for(&revenue).with_resolved_by("alice"))
        .await
        .unwrap_err();

    assert!(matches!(&err, TaskError::Persistence(e) if *e == conflict));
    assert!(err.is_retryable());
    assert_eq!(err.error_type(), "ConflictError");
    assert_eq!(harness.repository.call_count(), 1);
}

#[tokio::test]
async fn test_repository_validation_failure_is_not_retryable() {
    let revenue = term("Revenue", GlossaryTermStatus::InReview);
    let rejected = PersistenceError::Validation {
        entity_id: revenue.id,
        reason: "status is not allowed for this glossary".to_string(),
    };
    let harness =
        Harness::with_repository(&[&revenue], RecordingRepository::failing_with(rejected.clone()));
    let task = harness.task(GlossaryTermStatus::Approved);

    let err = task
        .execute(&context_for(&revenue).with_resolved_by("alice"))
        .await
        .unwrap_err();

    assert!(matches!(&err, TaskError::Persistence(e) if *e == rejected));
    assert!(!err.is_retryable());
    assert_eq!(err.error_type(), "ValidationError");
    assert_eq!(harness.repository.call_count(), 1);
}

#[tokio::test]
async fn test_resolved_by_is_recorded_verbatim() {
    let revenue = term("Revenue", GlossaryTermStatus::InReview);
    let harness = Harness::new(&[&revenue]);
    let task = harness.task(GlossaryTermStatus::Approved);

    task.execute(&context_for(&revenue).with_resolved_by(" alice "))
        .await
        .unwrap();

    assert_eq!(harness.repository.calls()[0].acting_user, " alice ");
}

#[tokio::test]
async fn test_patch_changes_only_status() {
    let revenue = term("Revenue", GlossaryTermStatus::Draft).with_synonyms(["income", "sales"]);
    let harness = Harness::new(&[&revenue]);
    let task = harness.task(GlossaryTermStatus::InReview);

    task.execute(&context_for(&revenue)).await.unwrap();

    let patch = harness.repository.calls()[0].patch.clone();
    assert!(patch
        .iter()
        .all(|op| matches!(op, PatchOperation::Replace { path, .. } if path == "/status")));

    let before = serde_json::to_value(&revenue).unwrap();
    let mut after = before.clone();
    apply(&mut after, &patch).unwrap();

    let (mut before_rest, mut after_rest) = (before.clone(), after.clone());
    before_rest.as_object_mut().unwrap().remove("status");
    after_rest.as_object_mut().unwrap().remove("status");
    assert_eq!(before_rest, after_rest);
    assert_eq!(after["status"], "In Review");
}

#[tokio::test]
async fn test_context_is_not_mutated() {
    let revenue = term("Revenue", GlossaryTermStatus::InReview);
    let harness = Harness::new(&[&revenue]);
    let task = harness.task(GlossaryTermStatus::Approved);

    let ctx = context_for(&revenue).with_resolved_by("alice");
    let snapshot = ctx.clone();
    task.execute(&ctx).await.unwrap();
    assert_eq!(ctx, snapshot);
}

#[tokio::test]
async fn test_one_task_serves_concurrent_executions() {
    let terms: Vec<GlossaryTerm> = (0..8)
        .map(|i| term(&format!("Term{i}"), GlossaryTermStatus::InReview))
        .collect();
    let refs: Vec<&GlossaryTerm> = terms.iter().collect();
    let store = store_with(&refs);
    let task = Arc::new(SetGlossaryTermStatusTask::new(
        GlossaryTermStatus::Approved,
        TaskServices::in_memory(store.clone()),
    ));

    let executions = terms.iter().map(|t| {
        let task = task.clone();
        let ctx = context_for(t).with_resolved_by("alice");
        async move { task.execute(&ctx).await }
    });
    let outcomes = futures::future::join_all(executions).await;

    assert!(outcomes.iter().all(|o| matches!(o, Ok(TaskOutcome::Applied { .. }))));
    assert_eq!(store.change_count(), terms.len());
    let ids: Vec<Uuid> = outcomes
        .into_iter()
        .map(|o| o.unwrap().entity_id())
        .collect();
    assert_eq!(ids, terms.iter().map(|t| t.id).collect::<Vec<_>>());
}
