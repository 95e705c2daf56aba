//! No-op detection and minimal patch construction for status transitions.

use crate::error::TaskResult;
use crate::models::{GovernedEntity, LifecycleStatus};
use crate::patch::{diff_snapshots, JsonPatch};

/// Result of comparing an entity's status with a target status
#[derive(Debug, Clone, PartialEq)]
pub enum StatusChange<S> {
    /// Entity already has the target status; nothing to persist
    Unchanged { status: S },
    /// Entity moves from `from` to `to`; `patch` turns the pre-image into the post-image
    Transition { from: S, to: S, patch: JsonPatch },
}

impl<S> StatusChange<S> {
    pub fn is_transition(&self) -> bool {
        matches!(self, Self::Transition { .. })
    }

    pub fn patch(&self) -> Option<&JsonPatch> {
        match self {
            Self::Transition { patch, .. } => Some(patch),
            Self::Unchanged { .. } => None,
        }
    }
}

/// Computes the status delta for a hydrated entity
#[derive(Debug, Clone, Copy, Default)]
pub struct StatusDiffComputer;

impl StatusDiffComputer {
    /// Parse a configured status value for `E`, exact match on the wire value
    pub fn parse_target<E: GovernedEntity>(value: &str) -> TaskResult<E::Status> {
        Ok(<E::Status as LifecycleStatus>::from_value(
            value,
            E::ENTITY_TYPE,
        )?)
    }

    /// Compare `entity`'s status with `target` and, when they differ, diff the
    /// serialized entity before and after changing only its status.
    ///
    /// `entity` itself is left untouched.
    pub fn compute<E: GovernedEntity>(
        &self,
        entity: &E,
        target: E::Status,
    ) -> TaskResult<StatusChange<E::Status>> {
        let current = entity.status();
        if current == target {
            return Ok(StatusChange::Unchanged { status: current });
        }

        let mut updated = entity.clone();
        updated.set_status(target);
        let patch = diff_snapshots(entity, &updated)?;

        Ok(StatusChange::Transition {
            from: current,
            to: target,
            patch,
        })
    }
}
