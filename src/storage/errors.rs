use thiserror::Error;
use uuid::Uuid;

/// Failures raised by the entity hydration boundary
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StoreError {
    #[error("{entity_type} instance for {fqn} not found")]
    NotFound { entity_type: String, fqn: String },

    #[error("Entity store unavailable: {reason}")]
    Unavailable { reason: String },
}

/// Failures raised by the entity persistence boundary
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PersistenceError {
    #[error("Concurrent modification detected for entity {entity_id}: {reason}")]
    Conflict { entity_id: Uuid, reason: String },

    #[error("Invalid patch for entity {entity_id}: {reason}")]
    Validation { entity_id: Uuid, reason: String },

    #[error("Entity {entity_id} not found")]
    NotFound { entity_id: Uuid },

    #[error("No repository registered for entity type {entity_type}")]
    UnknownEntityType { entity_type: String },

    #[error("Serialization error: {reason}")]
    Serialization { reason: String },
}

impl From<serde_json::Error> for PersistenceError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization {
            reason: err.to_string(),
        }
    }
}

pub type StoreResult<T> = Result<T, StoreError>;
pub type PersistenceResult<T> = Result<T, PersistenceError>;
