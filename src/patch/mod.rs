//! # JSON Patch
//!
//! RFC 6902 patch documents built by diffing two serialized snapshots of the
//! same entity. The diff is computed generically over `serde_json::Value`, so
//! any single-field transition gets a minimal patch without hand-writing
//! operations, and the patch keeps working when the entity's serialized shape
//! grows new fields.
//!
//! ```rust
//! use governance_core::patch::{apply, diff, PatchOperation};
//! use serde_json::json;
//!
//! let before = json!({"name": "Revenue", "status": "Draft"});
//! let after = json!({"name": "Revenue", "status": "Approved"});
//!
//! let patch = diff(&before, &after);
//! assert_eq!(
//!     patch.operations(),
//!     &[PatchOperation::Replace { path: "/status".to_string(), value: json!("Approved") }]
//! );
//!
//! let mut doc = before.clone();
//! apply(&mut doc, &patch).unwrap();
//! assert_eq!(doc, after);
//! ```

mod apply;
mod diff;
pub mod pointer;

pub use apply::apply;
pub use diff::{diff, diff_snapshots};

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// A single RFC 6902 operation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "lowercase")]
pub enum PatchOperation {
    Add { path: String, value: Value },
    Remove { path: String },
    Replace { path: String, value: Value },
    /// Precondition: the value at `path` must equal `value`
    Test { path: String, value: Value },
}

impl PatchOperation {
    pub fn path(&self) -> &str {
        match self {
            Self::Add { path, .. }
            | Self::Remove { path }
            | Self::Replace { path, .. }
            | Self::Test { path, .. } => path,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Add { .. } => "add",
            Self::Remove { .. } => "remove",
            Self::Replace { .. } => "replace",
            Self::Test { .. } => "test",
        }
    }

    pub fn is_test(&self) -> bool {
        matches!(self, Self::Test { .. })
    }
}

/// Ordered sequence of patch operations, serialized as a JSON array
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JsonPatch(Vec<PatchOperation>);

impl JsonPatch {
    pub fn new(operations: Vec<PatchOperation>) -> Self {
        Self(operations)
    }

    pub fn operations(&self) -> &[PatchOperation] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, PatchOperation> {
        self.0.iter()
    }

    /// Paths modified by the patch, excluding `test` preconditions
    pub fn touched_paths(&self) -> Vec<&str> {
        self.0
            .iter()
            .filter(|op| !op.is_test())
            .map(PatchOperation::path)
            .collect()
    }

    pub fn into_inner(self) -> Vec<PatchOperation> {
        self.0
    }
}

impl From<Vec<PatchOperation>> for JsonPatch {
    fn from(operations: Vec<PatchOperation>) -> Self {
        Self(operations)
    }
}

impl<'a> IntoIterator for &'a JsonPatch {
    type Item = &'a PatchOperation;
    type IntoIter = std::slice::Iter<'a, PatchOperation>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum PatchError {
    #[error("Invalid JSON pointer: {path:?}")]
    InvalidPointer { path: String },

    #[error("Path not found: {path}")]
    PathNotFound { path: String },

    #[error("Invalid array index {index:?} at {path}")]
    InvalidIndex { path: String, index: String },

    #[error("Test operation failed at {path}")]
    TestFailed { path: String },
}
