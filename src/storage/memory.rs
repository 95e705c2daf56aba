//! In-memory implementation of the storage boundaries.
//!
//! Entities are kept serialized, one table per entity type, guarded by a
//! `parking_lot::RwLock`. Every applied patch bumps the entity's minor version,
//! stamps `updatedBy`/`updatedAt` and is recorded in a change history so
//! callers can audit who changed what.
//!
//! Optimistic concurrency: a patch may carry `test` operations (typically on
//! `/version`). When one fails against the current state the patch is rejected
//! with [`PersistenceError::Conflict`] and nothing is written.

use super::errors::{PersistenceError, PersistenceResult, StoreError, StoreResult};
use super::{EntityRepository, EntityStore, RepositoryProvider};
use crate::constants::{fields, system, Fields, Include};
use crate::models::{EntityLink, GovernedEntity};
use crate::patch::{apply, JsonPatch, PatchError};
use async_trait::async_trait;
use chrono::Utc;
use dashmap::DashMap;
use parking_lot::{Mutex, RwLock};
use serde::Serialize;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, warn};
use uuid::Uuid;

/// Fields returned regardless of the requested field list
const BASE_FIELDS: &[&str] = &[
    "id",
    "name",
    "fullyQualifiedName",
    "displayName",
    "description",
    fields::VERSION,
    fields::UPDATED_AT,
    fields::UPDATED_BY,
    "deleted",
];

/// Identity fields a patch may never change
const IMMUTABLE_FIELDS: &[&str] = &["/id", "/fullyQualifiedName"];

type Validator = Arc<dyn Fn(&Value) -> Result<(), String> + Send + Sync>;

/// One applied patch
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangeRecord {
    pub entity_type: String,
    pub entity_id: Uuid,
    pub acting_user: String,
    pub patch: JsonPatch,
    pub previous_version: f64,
    pub version: f64,
    pub updated_at: i64,
}

#[derive(Default)]
struct EntityTable {
    by_id: HashMap<Uuid, Value>,
    fqn_index: HashMap<String, Uuid>,
    validator: Option<Validator>,
}

/// In-memory [`EntityStore`] and [`RepositoryProvider`]
#[derive(Default)]
pub struct InMemoryEntityStore {
    tables: DashMap<String, Arc<RwLock<EntityTable>>>,
    history: Arc<Mutex<Vec<ChangeRecord>>>,
}

impl std::fmt::Debug for InMemoryEntityStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryEntityStore")
            .field(
                "entity_types",
                &self.tables.iter().map(|t| t.key().clone()).collect::<Vec<_>>(),
            )
            .field("change_count", &self.history.lock().len())
            .finish()
    }
}

impl InMemoryEntityStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `E` so patched documents are checked against its schema
    pub fn register_entity_type<E: GovernedEntity>(&self) {
        let validator: Validator = Arc::new(|doc: &Value| {
            serde_json::from_value::<E>(doc.clone())
                .map(|_| ())
                .map_err(|e| e.to_string())
        });
        self.table(E::ENTITY_TYPE).write().validator = Some(validator);
    }

    /// Store (or overwrite) an entity
    pub fn insert<E: GovernedEntity>(&self, entity: &E) -> PersistenceResult<()> {
        let value = serde_json::to_value(entity)?;
        let table = self.table(E::ENTITY_TYPE);
        if table.read().validator.is_none() {
            self.register_entity_type::<E>();
        }
        let mut table = table.write();
        let id = entity.id();
        table.fqn_index.retain(|_, mapped| *mapped != id);
        table
            .fqn_index
            .insert(entity.fully_qualified_name().to_string(), id);
        table.by_id.insert(entity.id(), value);
        Ok(())
    }

    /// Current state of an entity, decoded
    pub fn get<E: GovernedEntity>(&self, entity_id: Uuid) -> Option<E> {
        self.get_value(E::ENTITY_TYPE, entity_id)
            .and_then(|value| serde_json::from_value(value).ok())
    }

    /// Current state of an entity, serialized
    pub fn get_value(&self, entity_type: &str, entity_id: Uuid) -> Option<Value> {
        let table = Arc::clone(self.tables.get(entity_type)?.value());
        let table = table.read();
        table.by_id.get(&entity_id).cloned()
    }

    /// Every applied patch, oldest first
    pub fn change_history(&self) -> Vec<ChangeRecord> {
        self.history.lock().clone()
    }

    pub fn change_count(&self) -> usize {
        self.history.lock().len()
    }

    fn table(&self, entity_type: &str) -> Arc<RwLock<EntityTable>> {
        Arc::clone(self.tables.entry(entity_type.to_string()).or_default().value())
    }

    fn project(value: &Value, requested: &Fields) -> Value {
        match (requested, value) {
            (Fields::All, _) => value.clone(),
            (Fields::Only(_), Value::Object(map)) => Value::Object(
                map.iter()
                    .filter(|(key, _)| {
                        BASE_FIELDS.contains(&key.as_str()) || requested.includes(key)
                    })
                    .map(|(key, v)| (key.clone(), v.clone()))
                    .collect(),
            ),
            _ => value.clone(),
        }
    }
}

#[async_trait]
impl EntityStore for InMemoryEntityStore {
    async fn hydrate(
        &self,
        link: &EntityLink,
        requested: &Fields,
        include: Include,
    ) -> StoreResult<Value> {
        let not_found = || StoreError::NotFound {
            entity_type: link.entity_type().to_string(),
            fqn: link.entity_fqn().to_string(),
        };

        let table = self
            .tables
            .get(link.entity_type())
            .map(|t| Arc::clone(t.value()))
            .ok_or_else(not_found)?;
        let table = table.read();
        let value = table
            .fqn_index
            .get(link.entity_fqn())
            .and_then(|id| table.by_id.get(id))
            .ok_or_else(not_found)?;

        let deleted = value.get("deleted").and_then(Value::as_bool).unwrap_or(false);
        if !include.admits(deleted) {
            debug!(
                entity_link = %link,
                include = %include,
                "Entity hidden by visibility mode"
            );
            return Err(not_found());
        }

        Ok(Self::project(value, requested))
    }
}

impl RepositoryProvider for InMemoryEntityStore {
    fn repository_for(&self, entity_type: &str) -> PersistenceResult<Arc<dyn EntityRepository>> {
        let table = self
            .tables
            .get(entity_type)
            .map(|t| Arc::clone(t.value()))
            .ok_or_else(|| PersistenceError::UnknownEntityType {
                entity_type: entity_type.to_string(),
            })?;
        Ok(Arc::new(InMemoryRepository {
            entity_type: entity_type.to_string(),
            table,
            history: Arc::clone(&self.history),
        }))
    }
}

/// Repository handed out by [`InMemoryEntityStore`] for one entity type
struct InMemoryRepository {
    entity_type: String,
    table: Arc<RwLock<EntityTable>>,
    history: Arc<Mutex<Vec<ChangeRecord>>>,
}

impl InMemoryRepository {
    fn next_version(previous: f64) -> f64 {
        ((previous + system::MINOR_VERSION_STEP) * system::VERSION_PRECISION).round()
            / system::VERSION_PRECISION
    }

    fn patched_document(
        entity_id: Uuid,
        current: &Value,
        acting_user: &str,
        patch: &JsonPatch,
    ) -> PersistenceResult<(Value, f64, f64, i64)> {
        if let Some(path) = patch
            .touched_paths()
            .into_iter()
            .find(|p| IMMUTABLE_FIELDS.contains(p))
        {
            return Err(PersistenceError::Validation {
                entity_id,
                reason: format!("{path} is immutable"),
            });
        }

        let mut doc = current.clone();
        apply(&mut doc, patch).map_err(|e| match e {
            PatchError::TestFailed { path } => PersistenceError::Conflict {
                entity_id,
                reason: format!("precondition on {path} no longer holds"),
            },
            other => PersistenceError::Validation {
                entity_id,
                reason: other.to_string(),
            },
        })?;

        let previous_version = current
            .get(fields::VERSION)
            .and_then(Value::as_f64)
            .unwrap_or_default();
        let version = Self::next_version(previous_version);
        let updated_at = Utc::now().timestamp_millis();

        let object = doc
            .as_object_mut()
            .ok_or_else(|| PersistenceError::Validation {
                entity_id,
                reason: "patched entity is not a JSON object".to_string(),
            })?;
        object.insert(fields::VERSION.to_string(), json!(version));
        object.insert(fields::UPDATED_BY.to_string(), json!(acting_user));
        object.insert(fields::UPDATED_AT.to_string(), json!(updated_at));

        Ok((doc, previous_version, version, updated_at))
    }
}

#[async_trait]
impl EntityRepository for InMemoryRepository {
    async fn apply_patch(
        &self,
        entity_id: Uuid,
        acting_user: &str,
        patch: &JsonPatch,
    ) -> PersistenceResult<()> {
        if acting_user.trim().is_empty() {
            return Err(PersistenceError::Validation {
                entity_id,
                reason: "acting user must not be empty".to_string(),
            });
        }
        if patch.is_empty() {
            return Ok(());
        }

        let mut table = self.table.write();
        let current = table
            .by_id
            .get(&entity_id)
            .ok_or(PersistenceError::NotFound { entity_id })?;

        let (doc, previous_version, version, updated_at) =
            Self::patched_document(entity_id, current, acting_user, patch).inspect_err(|e| {
                warn!(
                    entity_type = %self.entity_type,
                    entity_id = %entity_id,
                    error = %e,
                    "Rejected patch"
                );
            })?;

        if let Some(validate) = &table.validator {
            validate(&doc).map_err(|reason| PersistenceError::Validation { entity_id, reason })?;
        }

        table.by_id.insert(entity_id, doc);
        drop(table);

        debug!(
            entity_type = %self.entity_type,
            entity_id = %entity_id,
            acting_user = %acting_user,
            version = version,
            operations = patch.len(),
            "Patch applied"
        );

        self.history.lock().push(ChangeRecord {
            entity_type: self.entity_type.clone(),
            entity_id,
            acting_user: acting_user.to_string(),
            patch: patch.clone(),
            previous_version,
            version,
            updated_at,
        });
        Ok(())
    }
}
