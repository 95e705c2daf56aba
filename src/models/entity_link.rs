//! # Entity Links
//!
//! Entity links are the opaque strings a governance workflow passes around to
//! identify the entity a process instance is about:
//!
//! ```text
//! <#E::glossaryTerm::Business.Revenue>
//! <#E::glossaryTerm::Business.Revenue::description>
//! <#E::table::db.schema.orders::columns::customer_id::tags>
//! ```
//!
//! Segments are separated by `::`; the first two (entity type and fully
//! qualified name) are mandatory, followed by up to three optional field
//! segments. A fully qualified name may contain single colons but never `::`.

use super::GovernedEntity;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

const LINK_PREFIX: &str = "<#E";
const LINK_SUFFIX: &str = ">";
const SEPARATOR: &str = "::";
const MAX_SEGMENTS: usize = 5;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum EntityLinkError {
    #[error("entity link must look like <#E::type::fqn>")]
    MissingDelimiters,

    #[error("entity link needs at least an entity type and a fully qualified name")]
    MissingSegments,

    #[error("entity link has {count} segments, at most 5 are allowed")]
    TooManySegments { count: usize },

    #[error("segment {index} is empty")]
    EmptySegment { index: usize },

    #[error("invalid entity type {value:?}")]
    InvalidEntityType { value: String },

    #[error("segment {segment:?} contains a reserved character")]
    ReservedCharacter { segment: String },
}

/// Parsed form of an entity link
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EntityLink {
    entity_type: String,
    entity_fqn: String,
    field: Option<String>,
    array_field: Option<String>,
    array_value: Option<String>,
}

impl EntityLink {
    /// Link to a whole entity
    pub fn new(entity_type: impl Into<String>, entity_fqn: impl Into<String>) -> Self {
        Self {
            entity_type: entity_type.into(),
            entity_fqn: entity_fqn.into(),
            field: None,
            array_field: None,
            array_value: None,
        }
    }

    /// Link to an existing entity instance
    pub fn for_entity<E: GovernedEntity>(entity: &E) -> Self {
        Self::new(E::ENTITY_TYPE, entity.fully_qualified_name())
    }

    /// Narrow the link to a field of the entity
    pub fn with_field(mut self, field: impl Into<String>) -> Self {
        self.field = Some(field.into());
        self
    }

    pub fn entity_type(&self) -> &str {
        &self.entity_type
    }

    pub fn entity_fqn(&self) -> &str {
        &self.entity_fqn
    }

    pub fn field(&self) -> Option<&str> {
        self.field.as_deref()
    }

    pub fn array_field(&self) -> Option<&str> {
        self.array_field.as_deref()
    }

    pub fn array_value(&self) -> Option<&str> {
        self.array_value.as_deref()
    }

    /// Whether the link addresses the entity itself rather than one of its fields
    pub fn is_entity_level(&self) -> bool {
        self.field.is_none()
    }

    fn validate_segment(index: usize, segment: &str) -> Result<(), EntityLinkError> {
        if segment.is_empty() {
            return Err(EntityLinkError::EmptySegment { index });
        }
        if segment.contains(['<', '>', '|']) {
            return Err(EntityLinkError::ReservedCharacter {
                segment: segment.to_string(),
            });
        }
        Ok(())
    }
}

impl FromStr for EntityLink {
    type Err = EntityLinkError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let body = s
            .trim()
            .strip_prefix(LINK_PREFIX)
            .and_then(|rest| rest.strip_suffix(LINK_SUFFIX))
            .and_then(|rest| rest.strip_prefix(SEPARATOR))
            .ok_or(EntityLinkError::MissingDelimiters)?;

        let segments: Vec<&str> = body.split(SEPARATOR).collect();
        if segments.len() < 2 {
            return Err(EntityLinkError::MissingSegments);
        }
        if segments.len() > MAX_SEGMENTS {
            return Err(EntityLinkError::TooManySegments {
                count: segments.len(),
            });
        }
        for (index, segment) in segments.iter().enumerate() {
            Self::validate_segment(index, segment)?;
        }

        let entity_type = segments[0];
        if !entity_type
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_')
        {
            return Err(EntityLinkError::InvalidEntityType {
                value: entity_type.to_string(),
            });
        }

        let optional = |i: usize| segments.get(i).map(|s| (*s).to_string());
        Ok(Self {
            entity_type: entity_type.to_string(),
            entity_fqn: segments[1].to_string(),
            field: optional(2),
            array_field: optional(3),
            array_value: optional(4),
        })
    }
}

impl fmt::Display for EntityLink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{LINK_PREFIX}{SEPARATOR}{}{SEPARATOR}{}",
            self.entity_type, self.entity_fqn
        )?;
        for segment in [&self.field, &self.array_field, &self.array_value]
            .into_iter()
            .flatten()
        {
            write!(f, "{SEPARATOR}{segment}")?;
        }
        write!(f, "{LINK_SUFFIX}")
    }
}

impl Serialize for EntityLink {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for EntityLink {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}
