//! Generated Audio Artifacts
//!
//! An artifact is the result of one successful generation: the raw payload
//! the synthesizer returned, the decoded playable buffer, and its duration.
//! Artifacts are immutable and cheap to clone (shared by reference count).
//! They are never serialized; a node's artifact lives only as long as the
//! node, or until the next successful regeneration replaces it.

use chrono::{DateTime, Utc};
use std::sync::Arc;
use std::time::Duration;
use voicespace_speech_engine::AudioBuffer;

#[derive(Debug)]
struct ArtifactInner {
    raw: Vec<u8>,
    buffer: AudioBuffer,
    duration: Duration,
    created_at: DateTime<Utc>,
}

/// Playable result of a successful generation
#[derive(Debug, Clone)]
pub struct AudioArtifact {
    inner: Arc<ArtifactInner>,
}

impl AudioArtifact {
    /// Wrap a raw synthesis payload and the buffer the codec decoded from it
    pub fn new(raw: Vec<u8>, buffer: AudioBuffer) -> Self {
        let duration = buffer.duration();
        Self {
            inner: Arc::new(ArtifactInner {
                raw,
                buffer,
                duration,
                created_at: Utc::now(),
            }),
        }
    }

    /// Raw payload exactly as returned by the synthesizer
    pub fn raw_bytes(&self) -> &[u8] {
        &self.inner.raw
    }

    /// Decoded, playable audio
    pub fn buffer(&self) -> &AudioBuffer {
        &self.inner.buffer
    }

    pub fn duration(&self) -> Duration {
        self.inner.duration
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.inner.created_at
    }

    /// Whether two handles refer to the same generation result
    pub fn same_as(&self, other: &AudioArtifact) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

/// Artifacts compare by identity: two separately generated artifacts are
/// never equal, even with identical audio.
impl PartialEq for AudioArtifact {
    fn eq(&self, other: &Self) -> bool {
        self.same_as(other)
    }
}
