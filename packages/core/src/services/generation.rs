//! Generation Orchestrator
//!
//! Runs text-to-speech jobs for content nodes and the document pseudo-node.
//!
//! # Job Lifecycle
//!
//! 1. Validate and snapshot the inputs under a short write lock, mark the
//!    target `Generating` and take a sequence number
//! 2. Call the synthesizer, then the codec (no lock held)
//! 3. Re-acquire the lock and write back status, artifact and error, but only
//!    if the captured sequence number is still the latest issued one
//!
//! Validation failures are returned as `Err` and leave the target untouched.
//! Collaborator failures are recorded on the target and reported as
//! [`GenerationOutcome::Failed`].

use crate::models::{AudioArtifact, DocumentMode, DocumentOutput, DocumentState, ValidationError};
use crate::services::error::ServiceError;
use crate::services::events::{GenerationTarget, ProjectEvent};
use crate::services::project_service::Collaborators;
use crate::tree::{ContentTree, NodeJob, Resolution};
use futures::future::join_all;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{broadcast, RwLock};
use voicespace_speech_engine::{
    AudioCodec, ReferenceAudio, SpeechSynthesizer, SynthesisRequest, Transcriber,
};

/// Result of one generation job, as seen by the caller
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "camelCase")]
pub enum GenerationOutcome {
    /// Audio attached to the target
    Completed { duration: Duration },

    /// Transcript attached to the document
    Transcribed { transcript: String },

    /// Collaborator failure recorded on the target
    Failed { message: String },

    /// A newer job was issued for the target; this result was discarded
    Superseded,

    /// The node was deleted before the job finished
    NodeRemoved,
}

impl GenerationOutcome {
    pub fn is_completed(&self) -> bool {
        matches!(
            self,
            GenerationOutcome::Completed { .. } | GenerationOutcome::Transcribed { .. }
        )
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, GenerationOutcome::Failed { .. })
    }
}

/// Per-node result of [`GenerationOrchestrator::generate_all`]
#[derive(Debug, Clone, PartialEq)]
pub struct NodeGeneration {
    pub node_id: String,
    pub result: Result<GenerationOutcome, ServiceError>,
}

#[derive(Clone)]
pub struct GenerationOrchestrator {
    tree: Arc<RwLock<ContentTree>>,
    document: Arc<RwLock<DocumentState>>,
    synthesizer: Arc<dyn SpeechSynthesizer>,
    codec: Arc<dyn AudioCodec>,
    transcriber: Option<Arc<dyn Transcriber>>,
    fallback_voice: String,
    event_tx: broadcast::Sender<ProjectEvent>,
}

impl GenerationOrchestrator {
    pub fn new(
        tree: Arc<RwLock<ContentTree>>,
        document: Arc<RwLock<DocumentState>>,
        collaborators: &Collaborators,
        fallback_voice: impl Into<String>,
        event_tx: broadcast::Sender<ProjectEvent>,
    ) -> Self {
        Self {
            tree,
            document,
            synthesizer: collaborators.synthesizer.clone(),
            codec: collaborators.codec.clone(),
            transcriber: collaborators.transcriber.clone(),
            fallback_voice: fallback_voice.into(),
            event_tx,
        }
    }

    fn emit_event(&self, event: ProjectEvent) {
        let _ = self.event_tx.send(event);
    }

    /// Generate audio for one node from its current text and voice
    ///
    /// # Errors
    ///
    /// - `EmptyInput` if the node's text is blank (node untouched)
    /// - `NodeNotFound` if no node has `node_id`
    pub async fn generate(&self, node_id: &str) -> Result<GenerationOutcome, ServiceError> {
        let job = self.tree.write().await.begin_generation(node_id)?;
        tracing::debug!("Generation #{} issued for node {}", job.seq, job.node_id);
        self.emit_event(ProjectEvent::GenerationStarted {
            target: GenerationTarget::Node(job.node_id.clone()),
        });

        let result = self
            .render(SynthesisRequest::narration(job.text.clone(), job.voice.clone()))
            .await;

        Ok(self.finish_node_job(&job, result).await)
    }

    async fn finish_node_job(
        &self,
        job: &NodeJob,
        result: Result<AudioArtifact, ServiceError>,
    ) -> GenerationOutcome {
        let pending = match &result {
            Ok(artifact) => GenerationOutcome::Completed {
                duration: artifact.duration(),
            },
            Err(err) => GenerationOutcome::Failed {
                message: err.to_string(),
            },
        };

        let (resolution, node) = {
            let mut tree = self.tree.write().await;
            let resolution = tree.complete_generation(job, result);
            (resolution, tree.get(&job.node_id).cloned())
        };

        let outcome = match resolution {
            Resolution::Applied => pending,
            Resolution::Superseded => {
                tracing::warn!(
                    "Discarding superseded generation #{} for node {}",
                    job.seq,
                    job.node_id
                );
                GenerationOutcome::Superseded
            }
            Resolution::NodeRemoved => {
                tracing::warn!(
                    "Discarding generation #{} for deleted node {}",
                    job.seq,
                    job.node_id
                );
                GenerationOutcome::NodeRemoved
            }
        };

        match &outcome {
            GenerationOutcome::Completed { duration } => {
                tracing::info!("✅ Generated {:?} of audio for node {}", duration, job.node_id)
            }
            GenerationOutcome::Failed { message } => {
                tracing::warn!("Generation failed for node {}: {}", job.node_id, message)
            }
            _ => {}
        }

        if let (Resolution::Applied, Some(node)) = (resolution, node) {
            self.emit_event(ProjectEvent::NodeUpdated { node });
        }
        self.emit_event(ProjectEvent::GenerationFinished {
            target: GenerationTarget::Node(job.node_id.clone()),
            outcome: outcome.clone(),
        });
        outcome
    }

    /// Generate every node with speakable text, concurrently
    ///
    /// Jobs are interleaved on the calling task. One node's failure never
    /// affects its siblings. Results are in outline order.
    pub async fn generate_all(&self) -> Vec<NodeGeneration> {
        let ids: Vec<String> = {
            let tree = self.tree.read().await;
            tree.iter_outline()
                .filter(|node| node.has_speakable_text())
                .map(|node| node.id.clone())
                .collect()
        };
        tracing::info!("🚀 Generating {} nodes", ids.len());

        join_all(ids.into_iter().map(|node_id| async move {
            let result = self.generate(&node_id).await;
            NodeGeneration { node_id, result }
        }))
        .await
    }

    /// Generate the document from its active mode
    ///
    /// # Errors
    ///
    /// - `EmptyInput` if the mode's inputs are blank (document untouched)
    /// - `Config` if transcription is requested without a transcriber
    pub async fn generate_document(&self) -> Result<GenerationOutcome, ServiceError> {
        let (seq, mode) = {
            let mut document = self.document.write().await;
            if !document.mode.has_input() {
                return Err(ValidationError::EmptyInput.into());
            }
            if matches!(document.mode, DocumentMode::Transcription { .. })
                && self.transcriber.is_none()
            {
                return Err(ServiceError::Config(
                    "transcription requested but no transcriber is configured".to_string(),
                ));
            }
            (document.generation.begin(), document.mode.clone())
        };
        tracing::debug!("Document generation #{} issued ({})", seq, mode.name());
        self.emit_event(ProjectEvent::GenerationStarted {
            target: GenerationTarget::Document,
        });

        let result = match &mode {
            DocumentMode::Narration { text, voice } => self
                .render(SynthesisRequest::narration(text.clone(), voice.clone()))
                .await
                .map(DocumentOutput::Audio),
            DocumentMode::Dialogue { script, roster } => self
                .render(SynthesisRequest::dialogue(script.clone(), roster.clone()))
                .await
                .map(DocumentOutput::Audio),
            DocumentMode::ClonedVoice { text, reference } => self
                .render_cloned(text, reference)
                .await
                .map(DocumentOutput::Audio),
            DocumentMode::Transcription { sample } => {
                self.transcribe(sample).await.map(DocumentOutput::Transcript)
            }
        };

        let pending = match &result {
            Ok(DocumentOutput::Audio(artifact)) => GenerationOutcome::Completed {
                duration: artifact.duration(),
            },
            Ok(DocumentOutput::Transcript(text)) => GenerationOutcome::Transcribed {
                transcript: text.clone(),
            },
            Err(err) => GenerationOutcome::Failed {
                message: err.to_string(),
            },
        };

        let applied = {
            let mut document = self.document.write().await;
            match result {
                Ok(output) => {
                    let applied = document.generation.succeed(seq, output);
                    if applied {
                        document.staleness.record(&mode);
                    }
                    applied
                }
                Err(err) => document.generation.fail(seq, err.to_string()),
            }
        };

        let outcome = if applied {
            pending
        } else {
            tracing::warn!("Discarding superseded document generation #{}", seq);
            GenerationOutcome::Superseded
        };

        match &outcome {
            GenerationOutcome::Failed { message } => {
                tracing::warn!("Document generation failed: {}", message)
            }
            GenerationOutcome::Superseded => {}
            _ => tracing::info!("✅ Document generated ({})", mode.name()),
        }

        self.emit_event(ProjectEvent::GenerationFinished {
            target: GenerationTarget::Document,
            outcome: outcome.clone(),
        });
        Ok(outcome)
    }

    /// Synthesize then decode into a playable artifact
    async fn render(&self, request: SynthesisRequest) -> Result<AudioArtifact, ServiceError> {
        let payload = self
            .synthesizer
            .synthesize(request)
            .await
            .map_err(ServiceError::from_service)?;
        let buffer = self
            .codec
            .decode(&payload)
            .await
            .map_err(ServiceError::from_codec)?;
        Ok(AudioArtifact::new(payload, buffer))
    }

    /// Mimic the reference voice, falling back to the fixed voice on failure
    async fn render_cloned(
        &self,
        text: &str,
        reference: &ReferenceAudio,
    ) -> Result<AudioArtifact, ServiceError> {
        let primary = match self
            .render(SynthesisRequest::mimic(text, reference.clone()))
            .await
        {
            Ok(artifact) => return Ok(artifact),
            Err(err) => err,
        };

        tracing::warn!(
            "Cloned-voice synthesis failed, retrying with voice {}: {}",
            self.fallback_voice,
            primary
        );

        self.render(SynthesisRequest::narration(text, self.fallback_voice.clone()))
            .await
            .map_err(|fallback| {
                ServiceError::ExternalService(format!(
                    "cloned voice: {}; fallback voice {}: {}",
                    primary, self.fallback_voice, fallback
                ))
            })
    }

    async fn transcribe(&self, sample: &ReferenceAudio) -> Result<String, ServiceError> {
        let transcriber = self
            .transcriber
            .as_ref()
            .ok_or_else(|| ServiceError::Config("no transcriber is configured".to_string()))?;
        let transcript = transcriber
            .transcribe(sample)
            .await
            .map_err(ServiceError::from_service)?;
        if transcript.trim().is_empty() {
            return Err(ServiceError::ExternalService(
                "transcriber returned an empty transcript".to_string(),
            ));
        }
        Ok(transcript)
    }
}

#[cfg(test)]
#[path = "generation_test.rs"]
mod generation_test;
