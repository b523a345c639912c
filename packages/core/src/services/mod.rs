//! Business Services
//!
//! This module contains the core business logic services:
//!
//! - `ProjectService` - Session façade: editing, generation, document and export
//! - `GenerationOrchestrator` - Node and document generation jobs
//! - `StalenessTracker` - Detects document edits made after generation
//! - `ExportArchiver` - Single-file and bundle export
//!
//! Services coordinate between the content tree and the injected speech
//! collaborators, implementing business rules and orchestrating jobs.

pub mod error;
pub mod events;
pub mod export;
pub mod generation;
pub mod project_service;
pub mod staleness;

pub use error::ServiceError;
pub use events::{GenerationTarget, ProjectEvent};
pub use export::{ExportArchiver, ExportBundle, ExportedFile};
pub use generation::{GenerationOrchestrator, GenerationOutcome, NodeGeneration};
pub use project_service::{Collaborators, ProjectService};
pub use staleness::StalenessTracker;
