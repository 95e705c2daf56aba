//! # System Constants
//!
//! Workflow variable names, entity type identifiers and well-known field names
//! shared between the governance workflow engine and the automated tasks it runs.
//!
//! The variable names must match what the host engine writes into the
//! per-execution context, so they are kept here rather than next to the tasks.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Per-execution workflow variables read by automated tasks
pub mod variables {
    /// Opaque entity link for the entity the process instance is about
    pub const RELATED_ENTITY_VARIABLE: &str = "relatedEntityLink";
    /// User who resolved the preceding approval step, if any
    pub const RESOLVED_BY_VARIABLE: &str = "resolvedByUser";
}

/// Entity type names as they appear in entity links and repository lookups
pub mod entity_types {
    pub const GLOSSARY: &str = "glossary";
    pub const GLOSSARY_TERM: &str = "glossaryTerm";
}

/// Serialized field names the tasks care about
pub mod fields {
    /// Wildcard field selector: hydrate every field
    pub const ALL: &str = "*";
    pub const VERSION: &str = "version";
    pub const UPDATED_BY: &str = "updatedBy";
    pub const UPDATED_AT: &str = "updatedAt";
}

/// Names under which automated tasks are registered
pub mod task_names {
    pub const SET_GLOSSARY_TERM_STATUS: &str = "setGlossaryTermStatusTask";
}

/// Keys of the static task configuration block
pub mod config_keys {
    /// Target status bound when the task is wired into a workflow definition
    pub const STATUS: &str = "status";
}

/// System-level constants
pub mod system {
    /// Version increment applied by stores for a minor (patch) change
    pub const MINOR_VERSION_STEP: f64 = 0.1;
    /// Precision versions are rounded to after arithmetic, absorbing float error
    pub const VERSION_PRECISION: f64 = 1e9;
}

/// Visibility mode used when hydrating an entity from storage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Include {
    /// Only entities that have not been soft-deleted
    #[default]
    NonDeleted,
    /// Only soft-deleted entities
    Deleted,
    /// Every entity regardless of deletion state
    All,
}

impl Include {
    /// Whether an entity with the given deletion flag is visible in this mode
    pub fn admits(&self, deleted: bool) -> bool {
        match self {
            Self::NonDeleted => !deleted,
            Self::Deleted => deleted,
            Self::All => true,
        }
    }
}

impl fmt::Display for Include {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NonDeleted => write!(f, "non-deleted"),
            Self::Deleted => write!(f, "deleted"),
            Self::All => write!(f, "all"),
        }
    }
}

/// Field selection used when hydrating an entity from storage
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Fields {
    /// `"*"`: every field, including relationship fields
    #[default]
    All,
    /// An explicit list of field names
    Only(Vec<String>),
}

impl Fields {
    /// Parse a comma separated field list, where `"*"` selects everything
    pub fn parse(list: &str) -> Self {
        let list = list.trim();
        if list == fields::ALL {
            return Self::All;
        }
        Self::Only(
            list.split(',')
                .map(str::trim)
                .filter(|f| !f.is_empty())
                .map(ToString::to_string)
                .collect(),
        )
    }

    pub fn includes(&self, field: &str) -> bool {
        match self {
            Self::All => true,
            Self::Only(list) => list.iter().any(|f| f == field),
        }
    }
}

impl fmt::Display for Fields {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => write!(f, "{}", fields::ALL),
            Self::Only(list) => write!(f, "{}", list.join(",")),
        }
    }
}
