//! # Governance Workflow Tasks
//!
//! Automated tasks a governance workflow engine invokes as steps of an
//! approval process, plus the pieces they are assembled from:
//!
//! - [`WorkflowContext`] - per-execution variables handed in by the engine
//! - [`EntityReferenceResolver`] - entity link → hydrated entity
//! - [`ActorResolver`] - who a change is attributed to
//! - [`StatusDiffComputer`] - no-op detection and minimal patch construction
//! - [`SetEntityStatusTask`] - the status transition task itself
//! - [`AutomatedTaskRegistry`] - named construction from task configuration

pub mod actor;
pub mod context;
pub mod errors;
pub mod registry;
pub mod resolver;
pub mod set_status;
pub mod status_diff;
pub mod task;

pub use actor::{ActorResolver, AttributionPolicy};
pub use context::WorkflowContext;
pub use errors::{InvalidStatusError, ResolutionError};
pub use registry::{AutomatedTaskRegistry, TaskFactory};
pub use resolver::EntityReferenceResolver;
pub use set_status::{SetEntityStatusTask, SetGlossaryTermStatusTask};
pub use status_diff::{StatusChange, StatusDiffComputer};
pub use task::{AutomatedTask, TaskConfig, TaskOutcome, TaskServices};
