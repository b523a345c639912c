/// Configuration for the speech collaborators
use serde::{Deserialize, Serialize};

/// Sample rate of the reference synthesis deployment (mono PCM)
pub const DEFAULT_SAMPLE_RATE: u32 = 24_000;

/// Voice used for new sections and for the cloned-voice fallback
pub const DEFAULT_VOICE: &str = "Kore";

/// Prebuilt voices offered by the reference deployment
pub const PREBUILT_VOICES: &[&str] = &["Kore", "Puck", "Charon", "Fenrir", "Aoede", "Zephyr"];

/// Upper bound for the offline synthesizer's speaking rate
const MAX_WORDS_PER_MINUTE: u32 = 600;

/// Configuration for synthesis and the PCM codec
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpeechConfig {
    /// Sample rate of raw synthesis payloads
    pub sample_rate: u32,

    /// Channel count of raw synthesis payloads
    pub channels: u16,

    /// Voice assigned when the caller does not pick one
    pub default_voice: String,

    /// Voice used when cloned-voice synthesis fails and plain synthesis is retried
    pub fallback_voice: String,

    /// Voices the synthesizer accepts
    pub voices: Vec<String>,

    /// Speaking rate used by the offline synthesizer to size its output
    pub words_per_minute: u32,

    /// Peak amplitude of the offline synthesizer's tone (0.0 - 1.0)
    pub amplitude: f32,
}

impl Default for SpeechConfig {
    fn default() -> Self {
        Self {
            sample_rate: DEFAULT_SAMPLE_RATE,
            channels: 1,
            default_voice: DEFAULT_VOICE.to_string(),
            fallback_voice: DEFAULT_VOICE.to_string(),
            voices: PREBUILT_VOICES.iter().map(|v| v.to_string()).collect(),
            words_per_minute: 150,
            amplitude: 0.3,
        }
    }
}

impl SpeechConfig {
    /// Whether `voice` is one of the configured voices (case-insensitive)
    pub fn supports_voice(&self, voice: &str) -> bool {
        self.voices.iter().any(|v| v.eq_ignore_ascii_case(voice))
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.sample_rate == 0 {
            return Err("sample_rate must be greater than 0".to_string());
        }

        if self.channels == 0 {
            return Err("channels must be greater than 0".to_string());
        }

        if self.voices.is_empty() {
            return Err("voices cannot be empty".to_string());
        }

        if !self.supports_voice(&self.default_voice) {
            return Err(format!(
                "default_voice '{}' is not in the voice roster",
                self.default_voice
            ));
        }

        if !self.supports_voice(&self.fallback_voice) {
            return Err(format!(
                "fallback_voice '{}' is not in the voice roster",
                self.fallback_voice
            ));
        }

        if self.words_per_minute == 0 || self.words_per_minute > MAX_WORDS_PER_MINUTE {
            return Err(format!(
                "words_per_minute must be between 1 and {}",
                MAX_WORDS_PER_MINUTE
            ));
        }

        if !(0.0..=1.0).contains(&self.amplitude) {
            return Err("amplitude must be within 0.0..=1.0".to_string());
        }

        Ok(())
    }
}
