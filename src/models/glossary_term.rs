//! Glossary term model.
//!
//! Glossary terms go through a review workflow: a new term starts as `Draft`,
//! moves to `In Review` when reviewers are assigned, and ends up `Approved` or
//! `Rejected` once they reach consensus. Approved terms can later be
//! `Deprecated`.

use super::{GovernedEntity, LifecycleStatus};
use crate::constants::{entity_types, system};
use crate::workflow::errors::InvalidStatusError;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum GlossaryTermStatus {
    #[default]
    Draft,
    #[serde(rename = "In Review")]
    InReview,
    Approved,
    Rejected,
    Deprecated,
}

impl LifecycleStatus for GlossaryTermStatus {
    const VALUES: &'static [Self] = &[
        Self::Draft,
        Self::InReview,
        Self::Approved,
        Self::Rejected,
        Self::Deprecated,
    ];

    fn value(&self) -> &'static str {
        match self {
            Self::Draft => "Draft",
            Self::InReview => "In Review",
            Self::Approved => "Approved",
            Self::Rejected => "Rejected",
            Self::Deprecated => "Deprecated",
        }
    }
}

impl fmt::Display for GlossaryTermStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value())
    }
}

impl FromStr for GlossaryTermStatus {
    type Err = InvalidStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_value(s, entity_types::GLOSSARY_TERM)
    }
}

/// Lightweight reference to a related entity, as embedded in a parent entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntityReferenceSummary {
    pub id: Uuid,
    #[serde(rename = "type")]
    pub entity_type: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fully_qualified_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
}

impl EntityReferenceSummary {
    pub fn new(entity_type: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            entity_type: entity_type.into(),
            name: name.into(),
            fully_qualified_name: None,
            display_name: None,
        }
    }

    pub fn user(name: impl Into<String>) -> Self {
        Self::new("user", name)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GlossaryTerm {
    pub id: Uuid,
    pub name: String,
    pub fully_qualified_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub glossary: Option<EntityReferenceSummary>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<EntityReferenceSummary>,
    #[serde(default)]
    pub synonyms: Vec<String>,
    #[serde(default)]
    pub reviewers: Vec<EntityReferenceSummary>,
    #[serde(default)]
    pub status: GlossaryTermStatus,
    pub version: f64,
    /// Epoch milliseconds
    pub updated_at: i64,
    pub updated_by: String,
    #[serde(default)]
    pub deleted: bool,
}

impl GlossaryTerm {
    /// New draft term under `glossary`, owned by `created_by`
    pub fn new(
        glossary: impl Into<String>,
        name: impl Into<String>,
        created_by: impl Into<String>,
    ) -> Self {
        let glossary = glossary.into();
        let name = name.into();
        Self {
            id: Uuid::new_v4(),
            fully_qualified_name: format!("{glossary}.{name}"),
            name,
            display_name: None,
            description: String::new(),
            glossary: Some(EntityReferenceSummary::new(entity_types::GLOSSARY, glossary)),
            parent: None,
            synonyms: Vec::new(),
            reviewers: Vec::new(),
            status: GlossaryTermStatus::Draft,
            version: system::MINOR_VERSION_STEP,
            updated_at: Utc::now().timestamp_millis(),
            updated_by: created_by.into(),
            deleted: false,
        }
    }

    pub fn with_status(mut self, status: GlossaryTermStatus) -> Self {
        self.status = status;
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_reviewer(mut self, reviewer: impl Into<String>) -> Self {
        self.reviewers.push(EntityReferenceSummary::user(reviewer));
        self
    }

    pub fn with_synonyms<I, S>(mut self, synonyms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.synonyms.extend(synonyms.into_iter().map(Into::into));
        self
    }

    pub fn soft_deleted(mut self) -> Self {
        self.deleted = true;
        self
    }
}

impl GovernedEntity for GlossaryTerm {
    type Status = GlossaryTermStatus;

    const ENTITY_TYPE: &'static str = entity_types::GLOSSARY_TERM;

    fn id(&self) -> Uuid {
        self.id
    }

    fn fully_qualified_name(&self) -> &str {
        &self.fully_qualified_name
    }

    fn status(&self) -> GlossaryTermStatus {
        self.status
    }

    fn set_status(&mut self, status: GlossaryTermStatus) {
        self.status = status;
    }

    fn updated_by(&self) -> &str {
        &self.updated_by
    }
}
