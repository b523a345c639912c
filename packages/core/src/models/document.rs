//! Document-Level Generation Inputs
//!
//! Besides per-node generation, a project has one document pseudo-node that
//! is generated in a single shot. What it generates from depends on the
//! active [`DocumentMode`]; [`ContentFingerprint`] captures exactly the
//! inputs of that mode so edits can be detected after generation.

use crate::models::artifact::AudioArtifact;
use crate::models::status::GenerationState;
use crate::services::StalenessTracker;
use serde::{Deserialize, Serialize};
use voicespace_speech_engine::{ReferenceAudio, Speaker};

/// Active document-level input
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "camelCase")]
pub enum DocumentMode {
    /// Free text read by one prebuilt voice
    Narration { text: String, voice: String },

    /// Multi-speaker script; lines are `Speaker: text`
    Dialogue { script: String, roster: Vec<Speaker> },

    /// Text read in a voice mimicked from a reference sample
    ClonedVoice {
        text: String,
        reference: ReferenceAudio,
    },

    /// Speech-to-text of an audio sample
    Transcription { sample: ReferenceAudio },
}

impl Default for DocumentMode {
    fn default() -> Self {
        DocumentMode::Narration {
            text: String::new(),
            voice: voicespace_speech_engine::DEFAULT_VOICE.to_string(),
        }
    }
}

impl DocumentMode {
    pub fn name(&self) -> &'static str {
        match self {
            DocumentMode::Narration { .. } => "narration",
            DocumentMode::Dialogue { .. } => "dialogue",
            DocumentMode::ClonedVoice { .. } => "clonedVoice",
            DocumentMode::Transcription { .. } => "transcription",
        }
    }

    /// Modes with regenerable source text can go stale; transcription cannot
    pub fn supports_staleness(&self) -> bool {
        !matches!(self, DocumentMode::Transcription { .. })
    }

    /// Whether the mode's inputs are sufficient to attempt generation
    pub fn has_input(&self) -> bool {
        match self {
            DocumentMode::Narration { text, .. } => !text.trim().is_empty(),
            DocumentMode::Dialogue { script, roster } => {
                !script.trim().is_empty() && !roster.is_empty()
            }
            DocumentMode::ClonedVoice { text, reference } => {
                !text.trim().is_empty() && !reference.is_empty()
            }
            DocumentMode::Transcription { sample } => !sample.is_empty(),
        }
    }

    /// Fingerprint of the inputs this mode regenerates from
    ///
    /// Returns `None` for modes that never go stale.
    pub fn fingerprint(&self) -> Option<ContentFingerprint> {
        match self {
            DocumentMode::Narration { text, voice } => Some(ContentFingerprint::Narration {
                text: text.clone(),
                voice: voice.clone(),
            }),
            DocumentMode::Dialogue { script, roster } => Some(ContentFingerprint::Dialogue {
                script: script.clone(),
                roster: roster.clone(),
            }),
            DocumentMode::ClonedVoice { text, reference } => {
                Some(ContentFingerprint::ClonedVoice {
                    text: text.clone(),
                    reference_identity: reference.identity(),
                })
            }
            DocumentMode::Transcription { .. } => None,
        }
    }
}

/// Structural snapshot of the inputs relevant to document regeneration
///
/// Compared with exact equality: any change to a tracked field yields a
/// different fingerprint; re-entering identical values yields an equal one.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "mode", rename_all = "camelCase")]
pub enum ContentFingerprint {
    Narration {
        text: String,
        voice: String,
    },
    Dialogue {
        script: String,
        roster: Vec<Speaker>,
    },
    ClonedVoice {
        text: String,
        reference_identity: String,
    },
}

/// Result of a document-level generation
#[derive(Debug, Clone, PartialEq)]
pub enum DocumentOutput {
    Audio(AudioArtifact),
    Transcript(String),
}

impl DocumentOutput {
    pub fn artifact(&self) -> Option<&AudioArtifact> {
        match self {
            DocumentOutput::Audio(artifact) => Some(artifact),
            DocumentOutput::Transcript(_) => None,
        }
    }

    pub fn transcript(&self) -> Option<&str> {
        match self {
            DocumentOutput::Audio(_) => None,
            DocumentOutput::Transcript(text) => Some(text),
        }
    }
}

/// The document pseudo-node: active inputs, generation state and the
/// fingerprint baseline of its last successful generation
#[derive(Debug, Clone, Default)]
pub struct DocumentState {
    pub(crate) mode: DocumentMode,
    pub(crate) generation: GenerationState<DocumentOutput>,
    pub(crate) staleness: StalenessTracker,
}

impl DocumentState {
    pub fn mode(&self) -> &DocumentMode {
        &self.mode
    }

    pub fn generation(&self) -> &GenerationState<DocumentOutput> {
        &self.generation
    }

    pub fn artifact(&self) -> Option<&AudioArtifact> {
        self.generation.output().and_then(DocumentOutput::artifact)
    }

    pub fn transcript(&self) -> Option<&str> {
        self.generation.output().and_then(DocumentOutput::transcript)
    }

    /// Whether the audio output no longer matches the current inputs
    pub fn is_stale(&self) -> bool {
        self.staleness.is_stale(&self.mode, self.artifact().is_some())
    }
}
