//! Turns the workflow's opaque entity link into a hydrated entity.

use super::context::WorkflowContext;
use super::errors::ResolutionError;
use crate::constants::{variables, Fields, Include};
use crate::models::{EntityLink, EntityLinkError, GovernedEntity};
use crate::storage::EntityStore;
use std::marker::PhantomData;
use std::sync::Arc;
use tracing::debug;

/// Resolves `relatedEntityLink` into an `E`
pub struct EntityReferenceResolver<E: GovernedEntity> {
    store: Arc<dyn EntityStore>,
    _entity: PhantomData<fn() -> E>,
}

impl<E: GovernedEntity> Clone for EntityReferenceResolver<E> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            _entity: PhantomData,
        }
    }
}

impl<E: GovernedEntity> std::fmt::Debug for EntityReferenceResolver<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EntityReferenceResolver")
            .field("entity_type", &E::ENTITY_TYPE)
            .finish()
    }
}

impl<E: GovernedEntity> EntityReferenceResolver<E> {
    pub fn new(store: Arc<dyn EntityStore>) -> Self {
        Self {
            store,
            _entity: PhantomData,
        }
    }

    /// Parse the link carried in the context. Pure, no storage access.
    pub fn parse_link(context: &WorkflowContext) -> Result<EntityLink, ResolutionError> {
        let raw = context
            .related_entity_link()
            .ok_or_else(|| ResolutionError::MissingReference {
                variable: variables::RELATED_ENTITY_VARIABLE.to_string(),
            })?;

        let link: EntityLink = raw
            .parse()
            .map_err(|e: EntityLinkError| ResolutionError::MalformedReference {
                link: raw.to_string(),
                reason: e.to_string(),
            })?;

        if link.entity_type() != E::ENTITY_TYPE {
            return Err(ResolutionError::EntityTypeMismatch {
                expected: E::ENTITY_TYPE.to_string(),
                actual: link.entity_type().to_string(),
            });
        }
        Ok(link)
    }

    /// Hydrate every field of the linked entity, soft-deleted or not
    pub async fn resolve(&self, context: &WorkflowContext) -> Result<E, ResolutionError> {
        let link = Self::parse_link(context)?;
        let value = self.store.hydrate(&link, &Fields::All, Include::All).await?;

        debug!(entity_link = %link, "Hydrated related entity");

        serde_json::from_value(value).map_err(|e| ResolutionError::Hydration {
            entity_type: E::ENTITY_TYPE.to_string(),
            reason: e.to_string(),
        })
    }
}
