/// Offline tone synthesizer
///
/// Stands in for a remote speech model during development and tests. Output
/// is deterministic headerless PCM16: each voice maps to a fixed pitch and
/// each segment lasts as long as its words would take to read aloud at the
/// configured speaking rate.
use crate::config::SpeechConfig;
use crate::error::{Result, SpeechError};
use crate::provider::SpeechSynthesizer;
use crate::types::{Speaker, SynthesisRequest, VoiceSelection};
use async_trait::async_trait;
use std::f32::consts::TAU;

const BASE_PITCH_HZ: f32 = 110.0;
const PITCH_SPREAD_HZ: u32 = 160;

#[derive(Debug, Clone)]
pub struct ToneSynthesizer {
    config: SpeechConfig,
}

impl ToneSynthesizer {
    pub fn new(config: SpeechConfig) -> Result<Self> {
        config.validate().map_err(SpeechError::Config)?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &SpeechConfig {
        &self.config
    }

    /// Split the request into (text, pitch) segments
    fn segments(&self, request: &SynthesisRequest) -> Result<Vec<(String, f32)>> {
        match &request.voice {
            VoiceSelection::Single { voice } => {
                if !self.config.supports_voice(voice) {
                    return Err(SpeechError::SynthesisFailed(format!(
                        "unknown voice '{}'",
                        voice
                    )));
                }
                Ok(vec![(request.text.clone(), pitch_for(voice.as_bytes()))])
            }
            VoiceSelection::MultiSpeaker { roster } => self.dialogue_segments(&request.text, roster),
            VoiceSelection::Mimic => {
                let reference = request
                    .reference
                    .as_ref()
                    .filter(|r| !r.is_empty())
                    .ok_or_else(|| {
                        SpeechError::SynthesisFailed("voice mimicry needs a reference sample".to_string())
                    })?;
                Ok(vec![(
                    request.text.clone(),
                    pitch_for(reference.identity().as_bytes()),
                )])
            }
        }
    }

    fn dialogue_segments(&self, script: &str, roster: &[Speaker]) -> Result<Vec<(String, f32)>> {
        let first = roster.first().ok_or_else(|| {
            SpeechError::SynthesisFailed("dialogue needs at least one speaker".to_string())
        })?;
        if let Some(unknown) = roster.iter().find(|s| !self.config.supports_voice(&s.voice)) {
            return Err(SpeechError::SynthesisFailed(format!(
                "unknown voice '{}' for speaker '{}'",
                unknown.voice, unknown.name
            )));
        }

        let segments = script
            .lines()
            .filter(|line| !line.trim().is_empty())
            .map(|line| {
                let (speaker, text) = match line.split_once(':') {
                    Some((name, rest)) => match roster.iter().find(|s| s.name.trim() == name.trim()) {
                        Some(speaker) => (speaker, rest),
                        None => (first, line),
                    },
                    None => (first, line),
                };
                (text.to_string(), pitch_for(speaker.voice.as_bytes()))
            })
            .collect();
        Ok(segments)
    }

    fn render(&self, segments: &[(String, f32)]) -> Vec<u8> {
        let rate = self.config.sample_rate as f32;
        let seconds_per_word = 60.0 / self.config.words_per_minute as f32;
        let peak = self.config.amplitude * i16::MAX as f32;
        let channels = self.config.channels as usize;

        let mut out = Vec::new();
        for (text, pitch) in segments {
            let words = text.split_whitespace().count();
            let frames = (words as f32 * seconds_per_word * rate) as usize;
            for n in 0..frames {
                let value = (peak * (TAU * pitch * n as f32 / rate).sin()) as i16;
                for _ in 0..channels {
                    out.extend_from_slice(&value.to_le_bytes());
                }
            }
        }
        out
    }
}

#[async_trait]
impl SpeechSynthesizer for ToneSynthesizer {
    async fn synthesize(&self, request: SynthesisRequest) -> Result<Vec<u8>> {
        if request.text.trim().is_empty() {
            return Err(SpeechError::SynthesisFailed("text is empty".to_string()));
        }

        let segments = self.segments(&request)?;
        let payload = self.render(&segments);
        if payload.is_empty() {
            return Err(SpeechError::EmptyPayload);
        }

        tracing::debug!(
            "Synthesized {} segment(s) into {} bytes",
            segments.len(),
            payload.len()
        );
        Ok(payload)
    }
}

/// Map arbitrary bytes onto a pitch within the synthesizer's range
fn pitch_for(seed: &[u8]) -> f32 {
    // FNV-1a
    let hash = seed.iter().fold(0x811c_9dc5u32, |acc, b| {
        (acc ^ *b as u32).wrapping_mul(0x0100_0193)
    });
    BASE_PITCH_HZ + (hash % PITCH_SPREAD_HZ) as f32
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ReferenceAudio;

    fn synthesizer() -> ToneSynthesizer {
        ToneSynthesizer::new(SpeechConfig::default()).unwrap()
    }

    #[tokio::test]
    async fn test_output_length_follows_word_count() {
        let synth = synthesizer();
        // 150 wpm => 0.4s per word => 9600 frames per word at 24 kHz
        let payload = synth
            .synthesize(SynthesisRequest::narration("one two", "Kore"))
            .await
            .unwrap();
        assert_eq!(payload.len(), 2 * 9_600 * 2);
    }

    #[tokio::test]
    async fn test_output_is_deterministic() {
        let synth = synthesizer();
        let a = synth
            .synthesize(SynthesisRequest::narration("hello there", "Puck"))
            .await
            .unwrap();
        let b = synth
            .synthesize(SynthesisRequest::narration("hello there", "Puck"))
            .await
            .unwrap();
        assert_eq!(a, b);
    }

    #[tokio::test]
    async fn test_rejects_unknown_voice_and_blank_text() {
        let synth = synthesizer();
        assert!(synth
            .synthesize(SynthesisRequest::narration("hi", "Nobody"))
            .await
            .is_err());
        assert!(synth
            .synthesize(SynthesisRequest::narration("   ", "Kore"))
            .await
            .is_err());
    }

    #[tokio::test]
    async fn test_dialogue_requires_roster() {
        let synth = synthesizer();
        let err = synth
            .synthesize(SynthesisRequest::dialogue("A: hi", vec![]))
            .await
            .unwrap_err();
        assert!(matches!(err, SpeechError::SynthesisFailed(_)));

        let roster = vec![Speaker::new("A", "Kore"), Speaker::new("B", "Puck")];
        let payload = synth
            .synthesize(SynthesisRequest::dialogue("A: hi there\nB: hello", roster))
            .await
            .unwrap();
        assert_eq!(payload.len(), 3 * 9_600 * 2);
    }

    #[tokio::test]
    async fn test_mimic_requires_reference() {
        let synth = synthesizer();
        let mut request = SynthesisRequest::mimic("copy me", ReferenceAudio::new(vec![], "audio/wav"));
        assert!(synth.synthesize(request.clone()).await.is_err());

        request.reference = Some(ReferenceAudio::new(vec![1, 2, 3], "audio/wav"));
        assert!(synth.synthesize(request).await.is_ok());
    }

    #[test]
    fn test_pitch_stays_in_range() {
        for voice in ["Kore", "Puck", "Charon", ""] {
            let pitch = pitch_for(voice.as_bytes());
            assert!((BASE_PITCH_HZ..BASE_PITCH_HZ + PITCH_SPREAD_HZ as f32).contains(&pitch));
        }
    }
}
