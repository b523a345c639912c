//! Export Packaging
//!
//! Turns the generated audio of a project into downloadable files: one WAVE
//! file per node or for the document, or a single bundle archive holding every
//! generated node plus a plain-text manifest of the outline.
//!
//! # Bundle Layout
//!
//! ```text
//! <bundle>.zip
//! └── <bundle>/
//!     ├── <app>-<feature>-<section>.wav
//!     ├── <app>-<feature>-<section>-<subsection>.wav
//!     └── manifest.txt
//! ```
//!
//! `<bundle>` is `sanitize(app, feature)`, or `voicespace-<timestamp>` when the
//! labels sanitize to nothing. Export is all-or-nothing: an encode or archive
//! failure returns an error and no bundle.

use crate::models::{AudioArtifact, ContentNode, ProjectConfig, ValidationError};
use crate::services::error::ServiceError;
use crate::tree::ContentTree;
use crate::utils::{sanitize, timestamp_name};
use chrono::{DateTime, SecondsFormat, Utc};
use std::collections::HashSet;
use std::sync::Arc;
use voicespace_speech_engine::{ArchiveEntry, ArchiveWriter, AudioCodec};

/// Prefix for names whose labels sanitize to nothing
const FALLBACK_PREFIX: &str = "voicespace";

const MANIFEST_NAME: &str = "manifest.txt";

/// A packaged archive ready to be written or downloaded
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportBundle {
    /// `<bundle>.zip`
    pub file_name: String,
    pub bytes: Vec<u8>,
    /// Member paths in archive order, manifest last
    pub members: Vec<String>,
}

/// A single encoded audio file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportedFile {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

#[derive(Clone)]
pub struct ExportArchiver {
    codec: Arc<dyn AudioCodec>,
    archiver: Arc<dyn ArchiveWriter>,
}

impl ExportArchiver {
    pub fn new(codec: Arc<dyn AudioCodec>, archiver: Arc<dyn ArchiveWriter>) -> Self {
        Self { codec, archiver }
    }

    /// Package every generated node of `tree`, stamped with the current time
    pub async fn build(
        &self,
        project: &ProjectConfig,
        tree: &ContentTree,
    ) -> Result<ExportBundle, ServiceError> {
        self.build_at(project, tree, Utc::now()).await
    }

    /// Package every generated node of `tree`, stamped with `at`
    ///
    /// # Errors
    ///
    /// - `EmptyProject` if the tree has no sections
    /// - `Archive` if encoding a node or writing the archive fails
    pub async fn build_at(
        &self,
        project: &ProjectConfig,
        tree: &ContentTree,
        at: DateTime<Utc>,
    ) -> Result<ExportBundle, ServiceError> {
        if tree.root_count() == 0 {
            return Err(ValidationError::EmptyProject.into());
        }

        let bundle = bundle_name(project, at);
        let extension = self.codec.extension();
        let mut taken = HashSet::new();
        let mut entries = Vec::new();

        for node in tree.iter_outline() {
            let Some(artifact) = node.artifact() else {
                continue;
            };
            let base = member_base(project, tree, node);
            let name = unique_name(&mut taken, &base);
            let bytes = self.encode(artifact).await?;
            entries.push(ArchiveEntry::new(
                format!("{}/{}.{}", bundle, name, extension),
                bytes,
            ));
        }

        let audio_count = entries.len();
        entries.push(ArchiveEntry::new(
            format!("{}/{}", bundle, MANIFEST_NAME),
            render_manifest(project, tree, at).into_bytes(),
        ));

        let bytes = self
            .archiver
            .write(&entries)
            .await
            .map_err(ServiceError::from_export)?;

        let file_name = format!("{}.{}", bundle, self.archiver.extension());
        tracing::info!(
            "📦 Exported {} ({} audio files, {} bytes)",
            file_name,
            audio_count,
            bytes.len()
        );

        Ok(ExportBundle {
            file_name,
            bytes,
            members: entries.into_iter().map(|entry| entry.name).collect(),
        })
    }

    /// Encode one node's audio as `<app>-<feature>-<section>[-<subsection>].wav`
    ///
    /// # Errors
    ///
    /// - `NodeNotFound` if no node has `node_id`
    /// - `NotGenerated` if the node has no audio yet
    /// - `Archive` if encoding fails
    pub async fn export_node(
        &self,
        project: &ProjectConfig,
        tree: &ContentTree,
        node_id: &str,
    ) -> Result<ExportedFile, ServiceError> {
        let node = tree
            .get(node_id)
            .ok_or_else(|| ServiceError::node_not_found(node_id))?;
        let artifact = node
            .artifact()
            .ok_or_else(|| ValidationError::NotGenerated(node.name.clone()))?;

        let base = member_base(project, tree, node);
        self.export_artifact(base, artifact).await
    }

    /// Encode the document's audio as `<app>-<feature>.wav`
    pub async fn export_document(
        &self,
        project: &ProjectConfig,
        artifact: Option<&AudioArtifact>,
    ) -> Result<ExportedFile, ServiceError> {
        let artifact =
            artifact.ok_or_else(|| ValidationError::NotGenerated("document".to_string()))?;
        self.export_artifact(bundle_name(project, Utc::now()), artifact)
            .await
    }

    async fn export_artifact(
        &self,
        base: String,
        artifact: &AudioArtifact,
    ) -> Result<ExportedFile, ServiceError> {
        let bytes = self.encode(artifact).await?;
        let file_name = format!("{}.{}", base, self.codec.extension());
        tracing::info!("💾 Exported {} ({} bytes)", file_name, bytes.len());
        Ok(ExportedFile { file_name, bytes })
    }

    async fn encode(&self, artifact: &AudioArtifact) -> Result<Vec<u8>, ServiceError> {
        self.codec
            .encode(artifact.buffer())
            .await
            .map_err(ServiceError::from_export)
    }
}

/// Archive folder name, also the bundle's base file name
pub fn bundle_name(project: &ProjectConfig, at: DateTime<Utc>) -> String {
    let name = sanitize(&[project.app_name.as_str(), project.feature_name.as_str()]);
    if name.is_empty() {
        timestamp_name(FALLBACK_PREFIX, at)
    } else {
        name
    }
}

/// `sanitize(app, feature, section[, subsection])`
fn member_base(project: &ProjectConfig, tree: &ContentTree, node: &ContentNode) -> String {
    let mut parts = vec![project.app_name.as_str(), project.feature_name.as_str()];
    if let Some(parent) = node.parent_id.as_deref().and_then(|id| tree.get(id)) {
        parts.push(parent.name.as_str());
    }
    parts.push(node.name.as_str());

    let base = sanitize(&parts);
    if base.is_empty() {
        "audio".to_string()
    } else {
        base
    }
}

/// Claim `base`, or the first free `base-2`, `base-3`, ...
fn unique_name(taken: &mut HashSet<String>, base: &str) -> String {
    let mut candidate = base.to_string();
    let mut suffix = 2;
    while taken.contains(&candidate) {
        candidate = format!("{}-{}", base, suffix);
        suffix += 1;
    }
    taken.insert(candidate.clone());
    candidate
}

/// Plain-text outline of the project
///
/// ```text
/// My App - Intro
/// Generated: 2026-03-04T05:06:07Z
///
/// 1. Section 1 (Kore)
///    1.1. Part 1 (Kore)
///
/// 2. Section 2 (Puck)
/// ```
pub fn render_manifest(project: &ProjectConfig, tree: &ContentTree, at: DateTime<Utc>) -> String {
    let mut lines = vec![
        project.title(),
        format!("Generated: {}", at.to_rfc3339_opts(SecondsFormat::Secs, true)),
    ];

    for (i, section) in tree.roots().enumerate() {
        lines.push(String::new());
        lines.push(format!("{}. {} ({})", i + 1, section.name, section.voice));
        for (j, child) in tree.children_of(&section.id).into_iter().enumerate() {
            lines.push(format!(
                "   {}.{}. {} ({})",
                i + 1,
                j + 1,
                child.name,
                child.voice
            ));
        }
    }

    let mut manifest = lines.join("\n");
    manifest.push('\n');
    manifest
}
