#![allow(clippy::doc_markdown)] // Allow technical terms like JSON Patch, RFC 6902 in docs
#![allow(clippy::missing_errors_doc)] // Allow public functions without # Errors sections
#![allow(clippy::must_use_candidate)] // Allow methods without must_use when context is clear

//! # Governance Core Rust
//!
//! Automated governance tasks for approval workflows over versioned metadata
//! entities.
//!
//! ## Overview
//!
//! A governance workflow engine drives entities such as glossary terms through
//! a review lifecycle. Human steps (review, approve, reject) are handled by the
//! engine; the automated steps in between live here. The central one,
//! [`SetEntityStatusTask`](workflow::SetEntityStatusTask), moves the workflow's
//! related entity to a fixed target status and persists the change as an
//! attributed JSON Patch.
//!
//! ## Architecture
//!
//! Tasks depend on two narrow outbound boundaries from [`storage`]:
//!
//! - [`EntityStore`](storage::EntityStore) hydrates the entity an entity link
//!   points at
//! - [`RepositoryProvider`](storage::RepositoryProvider) hands out the
//!   repository that applies a patch on behalf of an acting user
//!
//! Loading, versioning and conflict detection stay behind those traits, so
//! tasks run unchanged against a real metadata store or the bundled
//! [`InMemoryEntityStore`](storage::InMemoryEntityStore).
//!
//! ## Module Organization
//!
//! - [`workflow`] - Automated task contract, task implementations and registry
//! - [`models`] - Governed entity models and entity links
//! - [`patch`] - RFC 6902 JSON Patch diff and apply
//! - [`storage`] - Storage boundaries and the in-memory store
//! - [`config`] - Layered configuration
//! - [`logging`] - Structured logging setup
//! - [`error`] - Structured error handling
//!
//! ## Quick Start
//!
//! ```rust
//! use governance_core::models::{EntityLink, GlossaryTerm, GlossaryTermStatus};
//! use governance_core::storage::InMemoryEntityStore;
//! use governance_core::workflow::{
//!     AutomatedTask, SetGlossaryTermStatusTask, TaskOutcome, TaskServices, WorkflowContext,
//! };
//! use std::sync::Arc;
//!
//! # tokio_test::block_on(async {
//! let store = Arc::new(InMemoryEntityStore::new());
//! let term = GlossaryTerm::new("Business", "Revenue", "admin")
//!     .with_status(GlossaryTermStatus::InReview);
//! store.insert(&term)?;
//!
//! let task = SetGlossaryTermStatusTask::new(
//!     GlossaryTermStatus::Approved,
//!     TaskServices::in_memory(store.clone()),
//! );
//!
//! let context = WorkflowContext::for_entity(EntityLink::for_entity(&term).to_string())
//!     .with_resolved_by("alice");
//! let outcome = task.execute(&context).await?;
//!
//! assert!(matches!(outcome, TaskOutcome::Applied { ref actor, .. } if actor == "alice"));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! # }).unwrap();
//! ```

pub mod config;
pub mod constants;
pub mod error;
pub mod logging;
pub mod models;
pub mod patch;
pub mod storage;
pub mod workflow;

pub use crate::config::{ConfigurationError, GovernanceConfig, LoggingConfig};
pub use error::{TaskError, TaskResult};
pub use logging::init_structured_logging;
pub use models::{EntityLink, GlossaryTerm, GlossaryTermStatus, GovernedEntity};
pub use patch::{JsonPatch, PatchOperation};
pub use workflow::{
    AutomatedTask, AutomatedTaskRegistry, SetEntityStatusTask, SetGlossaryTermStatusTask,
    TaskOutcome, WorkflowContext,
};
