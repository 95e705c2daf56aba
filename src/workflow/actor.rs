//! Audit attribution for automated changes.

use super::context::WorkflowContext;
use crate::error::{TaskError, TaskResult};
use serde::{Deserialize, Serialize};
use std::fmt;

/// How the acting user is chosen when the workflow did not name one
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttributionPolicy {
    /// Use `resolvedByUser` when present, otherwise the entity's last updater
    #[default]
    FallbackToLastUpdater,
    /// Refuse to change an entity without an explicit `resolvedByUser`
    RequireResolvedBy,
}

impl fmt::Display for AttributionPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FallbackToLastUpdater => write!(f, "fallback_to_last_updater"),
            Self::RequireResolvedBy => write!(f, "require_resolved_by"),
        }
    }
}

/// Picks the identity a change is attributed to
#[derive(Debug, Clone, Copy, Default)]
pub struct ActorResolver {
    policy: AttributionPolicy,
}

impl ActorResolver {
    pub fn new(policy: AttributionPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> AttributionPolicy {
        self.policy
    }

    /// Resolve the acting user. The result is never empty.
    pub fn resolve(&self, context: &WorkflowContext, last_updated_by: &str) -> TaskResult<String> {
        if let Some(user) = context.resolved_by() {
            return Ok(user.to_string());
        }

        match self.policy {
            AttributionPolicy::RequireResolvedBy => Err(TaskError::Attribution(
                "no resolvedByUser in workflow context and fallback attribution is disabled"
                    .to_string(),
            )),
            AttributionPolicy::FallbackToLastUpdater => {
                if last_updated_by.trim().is_empty() {
                    Err(TaskError::Attribution(
                        "no resolvedByUser in workflow context and entity has no last updater"
                            .to_string(),
                    ))
                } else {
                    Ok(last_updated_by.to_string())
                }
            }
        }
    }
}
