//! Content Tree
//!
//! Owns the two-level section/subsection hierarchy of a project.
//!
//! # Storage
//!
//! Nodes live in an id-keyed arena; sections are an ordered id list and each
//! section keeps an ordered list of its subsection ids. Edits touch only the
//! affected slots, so keystroke-level updates never copy the whole tree.
//! Readers that need a consistent, owned view call [`ContentTree::snapshot`].
//!
//! # Invariants
//!
//! - Depth ≤ 2: subsections are only ever created from a section's text and
//!   can never have children of their own
//! - Extraction never alters the parent's text
//! - Deleting a section removes its subsections with it
//! - Update and delete of an absent id are no-ops
//!
//! The tree has a single writer. Generation jobs read a (text, voice)
//! snapshot through [`ContentTree::begin_generation`] and later write back
//! only status, artifact and error through [`ContentTree::complete_generation`].

use crate::models::{AudioArtifact, ContentNode, DeleteResult, NodeStatus, NodeUpdate, ValidationError};
use crate::services::error::ServiceError;
use serde::Serialize;
use std::collections::HashMap;

/// Owned view of one section and its subsections
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeSnapshot {
    pub node: ContentNode,
    pub children: Vec<ContentNode>,
}

/// Work order for one node generation, captured at issue time
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeJob {
    pub node_id: String,
    /// Sequence number issued to this job
    pub seq: u64,
    pub text: String,
    pub voice: String,
}

/// What happened when a finished job tried to write back its result
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    /// Result written to the node
    Applied,
    /// A newer generation was issued for the node; result discarded
    Superseded,
    /// Node was deleted while the job was in flight; result discarded
    NodeRemoved,
}

#[derive(Debug, Clone, Default)]
pub struct ContentTree {
    nodes: HashMap<String, ContentNode>,
    roots: Vec<String>,
}

impl ContentTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Total number of nodes (sections and subsections)
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn root_count(&self) -> usize {
        self.roots.len()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.nodes.contains_key(id)
    }

    pub fn get(&self, id: &str) -> Option<&ContentNode> {
        self.nodes.get(id)
    }

    /// Sections in order
    pub fn roots(&self) -> impl Iterator<Item = &ContentNode> + '_ {
        self.roots.iter().filter_map(|id| self.nodes.get(id))
    }

    /// Subsections of `id` in order (empty if absent or a subsection)
    pub fn children_of(&self, id: &str) -> Vec<&ContentNode> {
        self.nodes
            .get(id)
            .map(|node| {
                node.children
                    .iter()
                    .filter_map(|child| self.nodes.get(child))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Section containing `id` (the node itself if it is a section)
    pub fn section_of(&self, id: &str) -> Option<&ContentNode> {
        let node = self.nodes.get(id)?;
        match &node.parent_id {
            Some(parent) => self.nodes.get(parent),
            None => Some(node),
        }
    }

    /// Every node in outline order: section, its subsections, next section, ...
    pub fn iter_outline(&self) -> impl Iterator<Item = &ContentNode> + '_ {
        self.roots().flat_map(move |root| {
            std::iter::once(root).chain(root.children.iter().filter_map(|id| self.nodes.get(id)))
        })
    }

    /// Owned, nested copy of the whole tree
    pub fn snapshot(&self) -> Vec<NodeSnapshot> {
        self.roots()
            .map(|root| NodeSnapshot {
                node: root.clone(),
                children: self.children_of(&root.id).into_iter().cloned().collect(),
            })
            .collect()
    }

    /// Append a section named "Section N" (N = current section count + 1)
    pub fn add_root_node(&mut self, text: impl Into<String>, voice: impl Into<String>) -> ContentNode {
        let name = format!("Section {}", self.roots.len() + 1);
        let node = ContentNode::new_section(name, text, voice);
        self.roots.push(node.id.clone());
        self.nodes.insert(node.id.clone(), node.clone());
        tracing::debug!("Added section '{}' ({})", node.name, node.id);
        node
    }

    /// Create a subsection from characters `start..end` of a section's text
    ///
    /// Offsets are character positions in the section's current text. The
    /// subsection is named "Part M" (M = current subsection count + 1) and
    /// inherits the section's current voice. The section is not modified
    /// apart from gaining a child.
    ///
    /// # Errors
    ///
    /// - `InvalidSelection` when `start == end`, the range is reversed or out
    ///   of bounds, or the selected text is blank
    /// - `NodeNotFound` when `parent_id` is absent
    /// - `HierarchyViolation` when `parent_id` is itself a subsection
    pub fn extract_child(
        &mut self,
        parent_id: &str,
        start: usize,
        end: usize,
    ) -> Result<ContentNode, ServiceError> {
        if start == end {
            return Err(ValidationError::invalid_selection(start, end, "selection is empty").into());
        }

        let parent = self
            .nodes
            .get(parent_id)
            .ok_or_else(|| ServiceError::node_not_found(parent_id))?;

        if !parent.is_root() {
            return Err(ServiceError::hierarchy_violation(format!(
                "node '{}' is a subsection and cannot have subsections",
                parent_id
            )));
        }

        let char_count = parent.text.chars().count();
        if start > end || end > char_count {
            return Err(ValidationError::invalid_selection(
                start,
                end,
                format!("outside text of {} characters", char_count),
            )
            .into());
        }

        let selected: String = parent.text.chars().skip(start).take(end - start).collect();
        if selected.trim().is_empty() {
            return Err(ValidationError::invalid_selection(start, end, "selection is blank").into());
        }

        let name = format!("Part {}", parent.children.len() + 1);
        let child = ContentNode::new_subsection(parent_id, name, selected, parent.voice.clone());

        if let Some(parent) = self.nodes.get_mut(parent_id) {
            parent.children.push(child.id.clone());
        }
        self.nodes.insert(child.id.clone(), child.clone());

        tracing::debug!(
            "Extracted '{}' ({}) from section {} [{}..{}]",
            child.name,
            child.id,
            parent_id,
            start,
            end
        );
        Ok(child)
    }

    /// Merge author edits into the node with `id`
    ///
    /// Returns `None` (and does nothing) if no node has that id, otherwise
    /// whether any field actually changed.
    pub fn update_node(&mut self, id: &str, update: &NodeUpdate) -> Option<bool> {
        self.nodes.get_mut(id).map(|node| node.apply_update(update))
    }

    /// Remove a section with all its subsections, or a single subsection
    pub fn delete_node(&mut self, id: &str) -> DeleteResult {
        let Some(node) = self.nodes.remove(id) else {
            return DeleteResult::not_found();
        };

        let mut removed = vec![node.id.clone()];
        match &node.parent_id {
            Some(parent_id) => {
                if let Some(parent) = self.nodes.get_mut(parent_id) {
                    parent.children.retain(|child| child != id);
                }
            }
            None => {
                self.roots.retain(|root| root != id);
                for child in &node.children {
                    if self.nodes.remove(child).is_some() {
                        removed.push(child.clone());
                    }
                }
            }
        }

        tracing::debug!("Deleted node {} ({} removed)", id, removed.len());
        DeleteResult::removed(removed)
    }

    /// Remove every node
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.roots.clear();
    }

    /// Validate a node for generation, mark it `Generating` and issue a job
    ///
    /// Blank text fails with `EmptyInput` and leaves the node untouched.
    pub fn begin_generation(&mut self, id: &str) -> Result<NodeJob, ServiceError> {
        let node = self
            .nodes
            .get_mut(id)
            .ok_or_else(|| ServiceError::node_not_found(id))?;

        if !node.has_speakable_text() {
            return Err(ValidationError::EmptyInput.into());
        }

        let seq = node.generation.begin();
        node.touch();
        Ok(NodeJob {
            node_id: node.id.clone(),
            seq,
            text: node.text.clone(),
            voice: node.voice.clone(),
        })
    }

    /// Write a finished job's result back, if it is still the latest issued
    pub fn complete_generation(
        &mut self,
        job: &NodeJob,
        result: Result<AudioArtifact, ServiceError>,
    ) -> Resolution {
        let Some(node) = self.nodes.get_mut(&job.node_id) else {
            return Resolution::NodeRemoved;
        };

        let applied = match result {
            Ok(artifact) => node.generation.succeed(job.seq, artifact),
            Err(err) => node.generation.fail(job.seq, err.to_string()),
        };

        if applied {
            node.touch();
            Resolution::Applied
        } else {
            Resolution::Superseded
        }
    }

    /// Count of nodes currently in `status`
    pub fn count_with_status(&self, status: NodeStatus) -> usize {
        self.nodes.values().filter(|n| n.status() == status).count()
    }
}
