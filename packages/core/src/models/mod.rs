//! Data Models
//!
//! This module contains the core data structures used throughout VoiceSpace:
//!
//! - `ContentNode` - A section or subsection of text with its own voice and status
//! - `GenerationState` - Status/error/output of one generation target
//! - `AudioArtifact` - Immutable result of a successful generation
//! - `DocumentMode` / `ContentFingerprint` - Document-level inputs and their snapshot
//! - `ProjectConfig` - Naming labels and voice defaults

mod artifact;
mod document;
mod node;
mod project;
mod status;

pub use artifact::AudioArtifact;
pub use document::{ContentFingerprint, DocumentMode, DocumentOutput, DocumentState};
pub use node::{ContentNode, DeleteResult, NodeUpdate, ValidationError};
pub use project::ProjectConfig;
pub use status::{GenerationState, NodeStatus};
