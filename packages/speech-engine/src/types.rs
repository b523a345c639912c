/// Value types exchanged with the speech collaborators
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::time::Duration;

/// Decoded, playable PCM audio
///
/// Samples are interleaved signed 16-bit values. The buffer is the
/// "playable handle" handed back by [`crate::AudioCodec::decode`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioBuffer {
    pub samples: Vec<i16>,
    pub sample_rate: u32,
    pub channels: u16,
}

impl AudioBuffer {
    pub fn new(samples: Vec<i16>, sample_rate: u32, channels: u16) -> Self {
        Self {
            samples,
            sample_rate,
            channels,
        }
    }

    /// Number of sample frames (one sample per channel)
    pub fn frames(&self) -> usize {
        if self.channels == 0 {
            return 0;
        }
        self.samples.len() / self.channels as usize
    }

    /// Playback duration derived from frame count and sample rate
    pub fn duration(&self) -> Duration {
        if self.sample_rate == 0 {
            return Duration::ZERO;
        }
        Duration::from_secs_f64(self.frames() as f64 / self.sample_rate as f64)
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}

/// Audio sample supplied by the author (recording or upload)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReferenceAudio {
    pub bytes: Vec<u8>,
    pub mime_type: String,
}

impl ReferenceAudio {
    pub fn new(bytes: Vec<u8>, mime_type: impl Into<String>) -> Self {
        Self {
            bytes,
            mime_type: mime_type.into(),
        }
    }

    /// Stable identity of the sample: hex SHA-256 over mime type and bytes
    ///
    /// Two samples share an identity only if both the payload and its declared
    /// mime type are identical.
    pub fn identity(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update(self.mime_type.as_bytes());
        hasher.update([0u8]);
        hasher.update(&self.bytes);
        hex::encode(hasher.finalize())
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// One named speaker in a dialogue roster
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Speaker {
    pub name: String,
    pub voice: String,
}

impl Speaker {
    pub fn new(name: impl Into<String>, voice: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            voice: voice.into(),
        }
    }
}

/// Voice selection for a synthesis call
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum VoiceSelection {
    /// A single prebuilt voice
    Single { voice: String },
    /// Multi-speaker dialogue; script lines are prefixed with a speaker name
    MultiSpeaker { roster: Vec<Speaker> },
    /// No prebuilt voice; the synthesizer mimics the request's reference sample
    Mimic,
}

impl VoiceSelection {
    pub fn single(voice: impl Into<String>) -> Self {
        VoiceSelection::Single {
            voice: voice.into(),
        }
    }
}

/// Input to [`crate::SpeechSynthesizer::synthesize`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SynthesisRequest {
    pub text: String,
    pub voice: VoiceSelection,
    pub reference: Option<ReferenceAudio>,
}

impl SynthesisRequest {
    /// Plain single-voice narration
    pub fn narration(text: impl Into<String>, voice: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            voice: VoiceSelection::single(voice),
            reference: None,
        }
    }

    /// Multi-speaker dialogue
    pub fn dialogue(script: impl Into<String>, roster: Vec<Speaker>) -> Self {
        Self {
            text: script.into(),
            voice: VoiceSelection::MultiSpeaker { roster },
            reference: None,
        }
    }

    /// Voice mimicry from a reference sample
    pub fn mimic(text: impl Into<String>, reference: ReferenceAudio) -> Self {
        Self {
            text: text.into(),
            voice: VoiceSelection::Mimic,
            reference: Some(reference),
        }
    }
}

/// A named byte blob destined for an archive
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveEntry {
    /// Member path inside the archive, `/`-separated
    pub name: String,
    pub bytes: Vec<u8>,
}

impl ArchiveEntry {
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            bytes,
        }
    }
}
