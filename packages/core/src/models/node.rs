//! Content Node Data Structures
//!
//! This module defines [`ContentNode`], the unit of text that is generated
//! into speech, and the update types the author edits it with.
//!
//! # Hierarchy
//!
//! - **Section**: a root node (`parent_id = None`)
//! - **Subsection**: a node extracted from a section's text (`parent_id = Some(section)`)
//!
//! Depth is capped at two levels: a node with children is always a root.
//! The hierarchy itself is owned by [`crate::tree::ContentTree`]; nodes only
//! carry the ids of their parent and children.

use crate::models::artifact::AudioArtifact;
use crate::models::status::{GenerationState, NodeStatus};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Validation errors, raised before any external call is made
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Nothing to generate: input is empty")]
    EmptyInput,

    #[error("Invalid selection {start}..{end}: {reason}")]
    InvalidSelection {
        start: usize,
        end: usize,
        reason: String,
    },

    #[error("Project has no sections to export")]
    EmptyProject,

    #[error("Nothing to export: {0} has no generated audio")]
    NotGenerated(String),
}

impl ValidationError {
    pub fn invalid_selection(start: usize, end: usize, reason: impl Into<String>) -> Self {
        Self::InvalidSelection {
            start,
            end,
            reason: reason.into(),
        }
    }
}

/// One addressable unit of text with its own voice and generation status.
///
/// # Fields
///
/// - `id`: Unique identifier (UUID v4), never reused within a project
/// - `name`: Display label ("Section 1", "Part 2", or author-chosen)
/// - `text`: Text to synthesize
/// - `voice`: Voice selector passed to the synthesizer
/// - `parent_id`: Section this node was extracted from (None for sections)
/// - `children`: Ordered ids of extracted subsections (sections only)
/// - `generation`: Status, error message and artifact of the latest generation
///
/// # Examples
///
/// ```rust
/// use voicespace_core::models::{ContentNode, NodeStatus};
///
/// let section = ContentNode::new_section("Section 1", "Once upon a time", "Kore");
/// assert!(section.is_root());
/// assert_eq!(section.status(), NodeStatus::Idle);
/// assert!(section.artifact().is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentNode {
    /// Unique identifier
    pub id: String,

    /// Display label
    pub name: String,

    /// Text to synthesize
    pub text: String,

    /// Voice selector
    pub voice: String,

    /// Parent section (None means this node IS a section)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,

    /// Ordered subsection ids
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<String>,

    /// Generation status, error and artifact
    #[serde(flatten)]
    pub(crate) generation: GenerationState<AudioArtifact>,

    /// Creation timestamp
    pub created_at: DateTime<Utc>,

    /// Last modification timestamp (author edits and status transitions)
    pub modified_at: DateTime<Utc>,
}

impl ContentNode {
    fn new(name: String, text: String, voice: String, parent_id: Option<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            name,
            text,
            voice,
            parent_id,
            children: Vec::new(),
            generation: GenerationState::default(),
            created_at: now,
            modified_at: now,
        }
    }

    /// Create a root-level node
    pub fn new_section(
        name: impl Into<String>,
        text: impl Into<String>,
        voice: impl Into<String>,
    ) -> Self {
        Self::new(name.into(), text.into(), voice.into(), None)
    }

    /// Create a node extracted from `parent_id`'s text
    pub fn new_subsection(
        parent_id: impl Into<String>,
        name: impl Into<String>,
        text: impl Into<String>,
        voice: impl Into<String>,
    ) -> Self {
        Self::new(name.into(), text.into(), voice.into(), Some(parent_id.into()))
    }

    /// Check if this node is a section (has no parent)
    pub fn is_root(&self) -> bool {
        self.parent_id.is_none()
    }

    pub fn status(&self) -> NodeStatus {
        self.generation.status()
    }

    pub fn error_message(&self) -> Option<&str> {
        self.generation.error_message()
    }

    pub fn artifact(&self) -> Option<&AudioArtifact> {
        self.generation.output()
    }

    pub fn generation(&self) -> &GenerationState<AudioArtifact> {
        &self.generation
    }

    /// Whether the text has anything to synthesize
    pub fn has_speakable_text(&self) -> bool {
        !self.text.trim().is_empty()
    }

    /// Apply author edits; returns true if any field actually changed
    pub(crate) fn apply_update(&mut self, update: &NodeUpdate) -> bool {
        let mut changed = false;
        if let Some(name) = &update.name {
            changed |= replace_if_different(&mut self.name, name);
        }
        if let Some(text) = &update.text {
            changed |= replace_if_different(&mut self.text, text);
        }
        if let Some(voice) = &update.voice {
            changed |= replace_if_different(&mut self.voice, voice);
        }
        if changed {
            self.touch();
        }
        changed
    }

    pub(crate) fn touch(&mut self) {
        self.modified_at = Utc::now();
    }
}

fn replace_if_different(field: &mut String, value: &str) -> bool {
    if field == value {
        return false;
    }
    *field = value.to_string();
    true
}

/// Partial update of the author-editable fields of a node
///
/// Fields left as `None` are not changed. Generation status, error and
/// artifact are owned by the generation pipeline and cannot be set here.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub voice: Option<String>,
}

impl NodeUpdate {
    /// Create a new empty NodeUpdate
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn with_voice(mut self, voice: impl Into<String>) -> Self {
        self.voice = Some(voice.into());
        self
    }

    /// Check if update contains any changes
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.text.is_none() && self.voice.is_none()
    }
}

/// Result of a delete operation
///
/// Deleting an absent node is a successful no-op; `existed` reports whether
/// anything was removed, and `removed` lists every id that went away
/// (the node itself plus, for a section, its subsections).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteResult {
    pub existed: bool,
    pub removed: Vec<String>,
}

impl DeleteResult {
    pub fn removed(ids: Vec<String>) -> Self {
        Self {
            existed: !ids.is_empty(),
            removed: ids,
        }
    }

    /// Create a DeleteResult indicating the node didn't exist
    pub fn not_found() -> Self {
        Self::default()
    }
}
