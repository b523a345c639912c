/// Error types for the speech collaborators
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SpeechError {
    #[error("Speech service unavailable: {0}")]
    ServiceUnavailable(String),

    #[error("Synthesis failed: {0}")]
    SynthesisFailed(String),

    #[error("Transcription failed: {0}")]
    TranscriptionFailed(String),

    #[error("Service returned no audio")]
    EmptyPayload,

    #[error("Audio decode failed: {0}")]
    Decode(String),

    #[error("Audio encode failed: {0}")]
    Encode(String),

    #[error("Archive creation failed: {0}")]
    Archive(String),

    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl SpeechError {
    /// True when the codec could not interpret the bytes it was handed
    ///
    /// An empty payload is not a decode failure: there were no bytes to
    /// interpret, so the service returned nothing usable.
    pub fn is_decode(&self) -> bool {
        matches!(self, SpeechError::Decode(_))
    }
}

impl From<zip::result::ZipError> for SpeechError {
    fn from(err: zip::result::ZipError) -> Self {
        SpeechError::Archive(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, SpeechError>;
