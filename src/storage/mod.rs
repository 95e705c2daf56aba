//! # Entity Storage Boundaries
//!
//! Automated tasks never talk to a database directly. They depend on two
//! narrow capabilities:
//!
//! - [`EntityStore`] hydrates the entity an entity link points at
//! - [`RepositoryProvider`] hands out the [`EntityRepository`] that applies an
//!   attributed patch for a given entity type
//!
//! Versioning, transactions and conflict detection belong to the
//! implementations. [`InMemoryEntityStore`] implements both capabilities with
//! optimistic versioning and is what the test suites run against.

pub mod errors;
pub mod memory;

pub use errors::{PersistenceError, PersistenceResult, StoreError, StoreResult};
pub use memory::InMemoryEntityStore;

use crate::constants::{Fields, Include};
use crate::models::EntityLink;
use crate::patch::JsonPatch;
use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;
use uuid::Uuid;

/// Hydration boundary: entity link → serialized entity
#[async_trait]
pub trait EntityStore: Send + Sync {
    /// Load the entity `link` points at, restricted to `fields` and filtered by `include`
    async fn hydrate(&self, link: &EntityLink, fields: &Fields, include: Include)
        -> StoreResult<Value>;
}

/// Persistence boundary for a single entity type
#[async_trait]
pub trait EntityRepository: Send + Sync {
    /// Apply `patch` to the stored entity, attributing the change to `acting_user`
    async fn apply_patch(
        &self,
        entity_id: Uuid,
        acting_user: &str,
        patch: &JsonPatch,
    ) -> PersistenceResult<()>;
}

/// Looks up the repository responsible for an entity type
pub trait RepositoryProvider: Send + Sync {
    fn repository_for(&self, entity_type: &str) -> PersistenceResult<Arc<dyn EntityRepository>>;
}
