//! # Governed Entity Models
//!
//! Domain objects whose lifecycle status is driven by governance workflows.
//! Automated tasks are generic over [`GovernedEntity`], so adding a new entity
//! type only means implementing the trait for its model.

pub mod entity_link;
pub mod glossary_term;

pub use entity_link::{EntityLink, EntityLinkError};
pub use glossary_term::{EntityReferenceSummary, GlossaryTerm, GlossaryTermStatus};

use crate::workflow::errors::InvalidStatusError;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fmt;
use uuid::Uuid;

/// Enumerated lifecycle value of a governed entity
pub trait LifecycleStatus:
    Copy + PartialEq + fmt::Debug + fmt::Display + Send + Sync + 'static
{
    /// Every recognized value, in lifecycle order
    const VALUES: &'static [Self];

    /// Wire value, exactly as it appears in the serialized entity
    fn value(&self) -> &'static str;

    /// Exact, case-sensitive lookup by wire value
    fn from_value(value: &str, entity_type: &str) -> Result<Self, InvalidStatusError> {
        Self::VALUES
            .iter()
            .copied()
            .find(|status| status.value() == value)
            .ok_or_else(|| InvalidStatusError {
                value: value.to_string(),
                entity_type: entity_type.to_string(),
            })
    }
}

/// A versioned business object whose status an approval workflow controls
pub trait GovernedEntity: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    type Status: LifecycleStatus;

    /// Entity type name used in entity links and repository lookups
    const ENTITY_TYPE: &'static str;

    fn id(&self) -> Uuid;

    fn fully_qualified_name(&self) -> &str;

    fn status(&self) -> Self::Status;

    fn set_status(&mut self, status: Self::Status);

    /// Last actor that modified the entity
    fn updated_by(&self) -> &str;
}
