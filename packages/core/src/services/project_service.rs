//! Project Service
//!
//! Single entry point for an authoring session: owns the content tree, the
//! document pseudo-node and the project labels, and routes generation and
//! export through the injected collaborators.
//!
//! # Locking
//!
//! Tree and document live behind `tokio::sync::RwLock`. Locks are only held
//! for in-memory reads and writes; every collaborator call runs with no lock
//! held, so edits stay responsive while audio is being generated.

use crate::models::{
    ContentNode, DeleteResult, DocumentMode, DocumentState, NodeUpdate, ProjectConfig,
};
use crate::services::error::ServiceError;
use crate::services::events::ProjectEvent;
use crate::services::export::{ExportArchiver, ExportBundle, ExportedFile};
use crate::services::generation::{GenerationOrchestrator, GenerationOutcome, NodeGeneration};
use crate::tree::{ContentTree, NodeSnapshot};
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tokio::sync::{broadcast, RwLock};
use voicespace_speech_engine::{
    ArchiveWriter, AudioCodec, Pcm16WavCodec, SpeechConfig, SpeechSynthesizer, ToneSynthesizer,
    Transcriber, ZipArchiver,
};

/// Broadcast channel capacity for project events
const PROJECT_EVENT_CHANNEL_CAPACITY: usize = 128;

/// External services a session talks to, constructed once and injected
#[derive(Clone)]
pub struct Collaborators {
    pub synthesizer: Arc<dyn SpeechSynthesizer>,
    pub codec: Arc<dyn AudioCodec>,
    /// Only needed for transcription mode
    pub transcriber: Option<Arc<dyn Transcriber>>,
    pub archiver: Arc<dyn ArchiveWriter>,
}

impl Collaborators {
    pub fn new(
        synthesizer: Arc<dyn SpeechSynthesizer>,
        codec: Arc<dyn AudioCodec>,
        archiver: Arc<dyn ArchiveWriter>,
    ) -> Self {
        Self {
            synthesizer,
            codec,
            transcriber: None,
            archiver,
        }
    }

    pub fn with_transcriber(mut self, transcriber: Arc<dyn Transcriber>) -> Self {
        self.transcriber = Some(transcriber);
        self
    }

    /// Offline tone synthesizer, PCM16 codec and zip archiver for `config`
    pub fn offline(config: SpeechConfig) -> Result<Self, ServiceError> {
        let codec = Pcm16WavCodec::from_config(&config);
        let synthesizer =
            ToneSynthesizer::new(config).map_err(|e| ServiceError::Config(e.to_string()))?;
        Ok(Self::new(
            Arc::new(synthesizer),
            Arc::new(codec),
            Arc::new(ZipArchiver::new()),
        ))
    }
}

/// # Examples
///
/// ```no_run
/// # use voicespace_core::models::ProjectConfig;
/// # use voicespace_core::services::{Collaborators, ProjectService};
/// # use voicespace_speech_engine::SpeechConfig;
/// # #[tokio::main]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let service = ProjectService::new(
///     ProjectConfig::new("My App", "Intro"),
///     Collaborators::offline(SpeechConfig::default())?,
/// );
///
/// let section = service.add_section("Welcome to the tour.").await;
/// service.generate(&section.id).await?;
///
/// let bundle = service.export_bundle().await?;
/// std::fs::write(&bundle.file_name, &bundle.bytes)?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct ProjectService {
    config: Arc<RwLock<ProjectConfig>>,
    tree: Arc<RwLock<ContentTree>>,
    document: Arc<RwLock<DocumentState>>,
    orchestrator: GenerationOrchestrator,
    exporter: ExportArchiver,
    event_tx: broadcast::Sender<ProjectEvent>,
}

impl ProjectService {
    pub fn new(config: ProjectConfig, collaborators: Collaborators) -> Self {
        let (event_tx, _) = broadcast::channel(PROJECT_EVENT_CHANNEL_CAPACITY);
        let tree = Arc::new(RwLock::new(ContentTree::new()));
        let document = Arc::new(RwLock::new(DocumentState::default()));

        let orchestrator = GenerationOrchestrator::new(
            tree.clone(),
            document.clone(),
            &collaborators,
            config.fallback_voice.clone(),
            event_tx.clone(),
        );
        let exporter = ExportArchiver::new(
            collaborators.codec.clone(),
            collaborators.archiver.clone(),
        );

        Self {
            config: Arc::new(RwLock::new(config)),
            tree,
            document,
            orchestrator,
            exporter,
            event_tx,
        }
    }

    /// Subscribe to project events
    pub fn subscribe_to_events(&self) -> broadcast::Receiver<ProjectEvent> {
        self.event_tx.subscribe()
    }

    /// Ignores errors if no subscribers
    fn emit_event(&self, event: ProjectEvent) {
        let _ = self.event_tx.send(event);
    }

    pub async fn config(&self) -> ProjectConfig {
        self.config.read().await.clone()
    }

    /// Replace the app/feature labels used for export naming
    pub async fn set_labels(&self, app_name: impl Into<String>, feature_name: impl Into<String>) {
        let mut config = self.config.write().await;
        config.app_name = app_name.into();
        config.feature_name = feature_name.into();
    }

    // --- Tree editing ---

    /// Append a section read by the project's default voice
    pub async fn add_section(&self, text: impl Into<String>) -> ContentNode {
        let voice = self.config.read().await.default_voice.clone();
        self.add_section_with_voice(text, voice).await
    }

    pub async fn add_section_with_voice(
        &self,
        text: impl Into<String>,
        voice: impl Into<String>,
    ) -> ContentNode {
        let node = self.tree.write().await.add_root_node(text, voice);
        self.emit_event(ProjectEvent::NodeCreated { node: node.clone() });
        node
    }

    /// Split characters `start..end` of a section into a new subsection
    pub async fn extract_subsection(
        &self,
        parent_id: &str,
        start: usize,
        end: usize,
    ) -> Result<ContentNode, ServiceError> {
        let node = self.tree.write().await.extract_child(parent_id, start, end)?;
        self.emit_event(ProjectEvent::NodeCreated { node: node.clone() });
        Ok(node)
    }

    /// Apply author edits; returns the node, or None if absent
    ///
    /// `NodeUpdated` is only emitted when a field actually changed.
    pub async fn update_node(&self, id: &str, update: NodeUpdate) -> Option<ContentNode> {
        let (changed, node) = {
            let mut tree = self.tree.write().await;
            let changed = tree.update_node(id, &update)?;
            (changed, tree.get(id).cloned()?)
        };
        if changed {
            self.emit_event(ProjectEvent::NodeUpdated { node: node.clone() });
        }
        Some(node)
    }

    pub async fn delete_node(&self, id: &str) -> DeleteResult {
        let result = self.tree.write().await.delete_node(id);
        if result.existed {
            self.emit_event(ProjectEvent::NodeDeleted {
                id: id.to_string(),
                removed: result.removed.clone(),
            });
        }
        result
    }

    pub async fn get_node(&self, id: &str) -> Option<ContentNode> {
        self.tree.read().await.get(id).cloned()
    }

    pub async fn snapshot(&self) -> Vec<NodeSnapshot> {
        self.tree.read().await.snapshot()
    }

    /// Owned copy of the whole tree, including artifacts
    pub async fn tree(&self) -> ContentTree {
        self.tree.read().await.clone()
    }

    // --- Generation ---

    pub async fn generate(&self, node_id: &str) -> Result<GenerationOutcome, ServiceError> {
        self.orchestrator.generate(node_id).await
    }

    pub async fn generate_all(&self) -> Vec<NodeGeneration> {
        self.orchestrator.generate_all().await
    }

    pub async fn generate_document(&self) -> Result<GenerationOutcome, ServiceError> {
        self.orchestrator.generate_document().await
    }

    // --- Document ---

    /// Replace the document's active inputs
    ///
    /// Existing output is kept; it becomes stale if the new inputs differ
    /// from the ones it was generated from.
    pub async fn set_document_mode(&self, mode: DocumentMode) {
        let name = mode.name();
        self.document.write().await.mode = mode;
        self.emit_event(ProjectEvent::DocumentModeChanged { mode: name });
    }

    pub async fn document(&self) -> DocumentState {
        self.document.read().await.clone()
    }

    pub async fn is_document_stale(&self) -> bool {
        self.document.read().await.is_stale()
    }

    // --- Export ---

    /// Package every generated node into one archive
    pub async fn export_bundle(&self) -> Result<ExportBundle, ServiceError> {
        self.export_bundle_at(Utc::now()).await
    }

    pub async fn export_bundle_at(&self, at: DateTime<Utc>) -> Result<ExportBundle, ServiceError> {
        let config = self.config().await;
        let tree = self.tree().await;
        self.exporter.build_at(&config, &tree, at).await
    }

    pub async fn export_node(&self, node_id: &str) -> Result<ExportedFile, ServiceError> {
        let config = self.config().await;
        let tree = self.tree().await;
        self.exporter.export_node(&config, &tree, node_id).await
    }

    pub async fn export_document(&self) -> Result<ExportedFile, ServiceError> {
        let config = self.config().await;
        let artifact = self.document.read().await.artifact().cloned();
        self.exporter
            .export_document(&config, artifact.as_ref())
            .await
    }

    /// Discard every node and all document state
    ///
    /// Jobs still in flight resolve as removed or superseded.
    pub async fn reset(&self) {
        self.tree.write().await.clear();
        {
            let mut document = self.document.write().await;
            document.generation.clear();
            document.staleness.clear();
            document.mode = DocumentMode::default();
        }
        tracing::info!("🧹 Project reset");
        self.emit_event(ProjectEvent::ProjectReset);
    }
}
