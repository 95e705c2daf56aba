//! Error types for governance automated tasks.
//!
//! [`TaskError`] is what a host workflow engine sees when an execution fails.
//! Each concern keeps its own error enum next to the code that raises it and
//! converts into [`TaskError`] via `From`.

use crate::config::ConfigurationError;
use crate::storage::errors::{PersistenceError, StoreError};
use crate::workflow::errors::{InvalidStatusError, ResolutionError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TaskError {
    #[error("Resolution error: {0}")]
    Resolution(#[from] ResolutionError),
    #[error("Invalid status: {0}")]
    InvalidStatus(#[from] InvalidStatusError),
    #[error("Persistence error: {0}")]
    Persistence(#[from] PersistenceError),
    #[error("Attribution error: {0}")]
    Attribution(String),
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("Configuration error: {0}")]
    Configuration(String),
    #[error("Unknown automated task: {0}")]
    UnknownTask(String),
}

impl TaskError {
    /// Whether the host engine may reasonably retry the whole execution.
    ///
    /// Only transient boundary failures qualify. Everything else points at bad
    /// input or a misconfigured workflow definition.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            TaskError::Persistence(PersistenceError::Conflict { .. })
                | TaskError::Resolution(ResolutionError::Unavailable { .. })
        )
    }

    /// Stable error class name for workflow variables and structured logs
    pub fn error_type(&self) -> &'static str {
        match self {
            TaskError::Resolution(_) => "ResolutionError",
            TaskError::InvalidStatus(_) => "InvalidStatusError",
            TaskError::Persistence(PersistenceError::Conflict { .. }) => "ConflictError",
            TaskError::Persistence(PersistenceError::Validation { .. }) => "ValidationError",
            TaskError::Persistence(_) => "PersistenceError",
            TaskError::Attribution(_) => "AttributionError",
            TaskError::Serialization(_) => "SerializationError",
            TaskError::Configuration(_) => "ConfigurationError",
            TaskError::UnknownTask(_) => "UnknownTaskError",
        }
    }
}

impl From<ConfigurationError> for TaskError {
    fn from(err: ConfigurationError) -> Self {
        TaskError::Configuration(err.to_string())
    }
}

impl From<StoreError> for TaskError {
    fn from(err: StoreError) -> Self {
        TaskError::Resolution(err.into())
    }
}

pub type TaskResult<T> = std::result::Result<T, TaskError>;
