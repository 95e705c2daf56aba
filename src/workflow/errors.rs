use crate::storage::errors::StoreError;
use thiserror::Error;

/// Failure to turn the related-entity variable into a hydrated entity
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ResolutionError {
    #[error("Workflow variable {variable} is missing or not a string")]
    MissingReference { variable: String },

    #[error("Malformed entity link {link:?}: {reason}")]
    MalformedReference { link: String, reason: String },

    #[error("Entity link points at {actual}, task operates on {expected}")]
    EntityTypeMismatch { expected: String, actual: String },

    #[error("{entity_type} instance for {fqn} not found")]
    NotFound { entity_type: String, fqn: String },

    #[error("Entity store unavailable: {reason}")]
    Unavailable { reason: String },

    #[error("Hydrated {entity_type} could not be decoded: {reason}")]
    Hydration { entity_type: String, reason: String },
}

impl From<StoreError> for ResolutionError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound { entity_type, fqn } => Self::NotFound { entity_type, fqn },
            StoreError::Unavailable { reason } => Self::Unavailable { reason },
        }
    }
}

/// Configured target status is not one of the entity's lifecycle values
#[derive(Error, Debug, Clone, PartialEq)]
#[error("'{value}' is not a valid {entity_type} status")]
pub struct InvalidStatusError {
    pub value: String,
    pub entity_type: String,
}
