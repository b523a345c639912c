//! Collaborator contracts
//!
//! The generation pipeline talks to the outside world only through these
//! traits. One instance of each is constructed per session and injected
//! into the services that need it.

use crate::error::Result;
use crate::types::{ArchiveEntry, AudioBuffer, ReferenceAudio, SynthesisRequest};
use async_trait::async_trait;

/// Text-to-speech backend
#[async_trait]
pub trait SpeechSynthesizer: Send + Sync {
    /// Synthesize `request` into a raw audio payload
    ///
    /// The payload format is whatever the paired [`AudioCodec`] can decode.
    async fn synthesize(&self, request: SynthesisRequest) -> Result<Vec<u8>>;
}

/// Speech-to-text backend
#[async_trait]
pub trait Transcriber: Send + Sync {
    async fn transcribe(&self, audio: &ReferenceAudio) -> Result<String>;
}

/// Raw audio container codec
#[async_trait]
pub trait AudioCodec: Send + Sync {
    /// Interpret a synthesis payload as playable audio
    async fn decode(&self, payload: &[u8]) -> Result<AudioBuffer>;

    /// Encode playable audio into portable container bytes
    async fn encode(&self, buffer: &AudioBuffer) -> Result<Vec<u8>>;

    /// File extension of the container produced by [`AudioCodec::encode`]
    fn extension(&self) -> &'static str {
        "wav"
    }
}

/// Compression primitive: named blobs in, one archive blob out
#[async_trait]
pub trait ArchiveWriter: Send + Sync {
    async fn write(&self, entries: &[ArchiveEntry]) -> Result<Vec<u8>>;

    /// File extension of the archive produced by [`ArchiveWriter::write`]
    fn extension(&self) -> &'static str {
        "zip"
    }
}
