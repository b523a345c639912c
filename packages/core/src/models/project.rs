//! Project Labels and Configuration

use serde::{Deserialize, Serialize};
use voicespace_speech_engine::DEFAULT_VOICE;

/// Naming labels and defaults for one authoring session
///
/// `app_name` and `feature_name` only affect export naming and the manifest
/// title; they carry no behavior of their own.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectConfig {
    pub app_name: String,
    pub feature_name: String,

    /// Voice assigned to sections added without an explicit voice
    #[serde(default = "default_voice")]
    pub default_voice: String,

    /// Voice used when cloned-voice synthesis fails and plain synthesis is retried
    #[serde(default = "default_voice")]
    pub fallback_voice: String,
}

fn default_voice() -> String {
    DEFAULT_VOICE.to_string()
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self {
            app_name: String::new(),
            feature_name: String::new(),
            default_voice: default_voice(),
            fallback_voice: default_voice(),
        }
    }
}

impl ProjectConfig {
    pub fn new(app_name: impl Into<String>, feature_name: impl Into<String>) -> Self {
        Self {
            app_name: app_name.into(),
            feature_name: feature_name.into(),
            ..Default::default()
        }
    }

    pub fn with_default_voice(mut self, voice: impl Into<String>) -> Self {
        self.default_voice = voice.into();
        self
    }

    pub fn with_fallback_voice(mut self, voice: impl Into<String>) -> Self {
        self.fallback_voice = voice.into();
        self
    }

    /// Manifest title: the non-blank labels joined with " - "
    pub fn title(&self) -> String {
        let labels: Vec<&str> = [self.app_name.trim(), self.feature_name.trim()]
            .into_iter()
            .filter(|label| !label.is_empty())
            .collect();
        if labels.is_empty() {
            "Untitled".to_string()
        } else {
            labels.join(" - ")
        }
    }
}
