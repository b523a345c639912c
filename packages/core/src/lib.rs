//! VoiceSpace Core Business Logic Layer
//!
//! This crate provides the content model, generation pipeline and export
//! packaging for the VoiceSpace voice-over authoring tool.
//!
//! # Architecture
//!
//! - **Two-level outline**: sections, and subsections extracted from a section's text
//! - **Arena tree**: nodes keyed by id, ordered id lists for sections and subsections
//! - **Most-recently-issued wins**: per-target sequence numbers settle overlapping generations
//! - **Injected collaborators**: synthesis, transcription, codec and archive are traits
//!   from `voicespace-speech-engine`
//!
//! # Modules
//!
//! - [`models`] - Data structures (ContentNode, DocumentMode, AudioArtifact, etc.)
//! - [`tree`] - The section/subsection hierarchy
//! - [`services`] - Generation, staleness, export and the ProjectService façade
//! - [`utils`] - Export name sanitizing

pub mod models;
pub mod services;
pub mod tree;
pub mod utils;

// Re-export commonly used types
pub use models::*;
pub use services::*;
pub use tree::{ContentTree, NodeSnapshot};
