//! Project Events
//!
//! Events emitted by [`crate::services::ProjectService`] whenever the tree,
//! the document or a generation job changes. They are delivered over a tokio
//! broadcast channel so a UI layer can re-render without polling.
//!
//! # Event Flow
//!
//! 1. The service applies a change (edit, delete, generation start/finish)
//! 2. A `ProjectEvent` is sent on the broadcast channel
//! 3. Every subscriber receives it; a missing subscriber is not an error

use crate::models::ContentNode;
use crate::services::generation::GenerationOutcome;
use serde::Serialize;

/// What a generation job targets
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", content = "id", rename_all = "camelCase")]
pub enum GenerationTarget {
    /// A section or subsection
    Node(String),
    /// The document pseudo-node
    Document,
}

impl std::fmt::Display for GenerationTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GenerationTarget::Node(id) => write!(f, "node {}", id),
            GenerationTarget::Document => f.write_str("document"),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ProjectEvent {
    NodeCreated { node: ContentNode },

    NodeUpdated { node: ContentNode },

    /// A node (and, for a section, its subsections) was removed
    #[serde(rename_all = "camelCase")]
    NodeDeleted { id: String, removed: Vec<String> },

    GenerationStarted { target: GenerationTarget },

    GenerationFinished {
        target: GenerationTarget,
        outcome: GenerationOutcome,
    },

    /// The document's inputs were replaced
    DocumentModeChanged { mode: &'static str },

    /// All nodes and document state were discarded
    ProjectReset,
}

impl ProjectEvent {
    /// Get a string representation of the event type
    pub fn event_type(&self) -> &str {
        match self {
            ProjectEvent::NodeCreated { .. } => "node:created",
            ProjectEvent::NodeUpdated { .. } => "node:updated",
            ProjectEvent::NodeDeleted { .. } => "node:deleted",
            ProjectEvent::GenerationStarted { .. } => "generation:started",
            ProjectEvent::GenerationFinished { .. } => "generation:finished",
            ProjectEvent::DocumentModeChanged { .. } => "document:mode",
            ProjectEvent::ProjectReset => "project:reset",
        }
    }
}
