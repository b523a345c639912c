/// VoiceSpace Speech Engine - collaborator contracts and reference implementations
///
/// The generation pipeline in `voicespace-core` never talks to a speech model,
/// codec or compressor directly. It holds one instance of each trait defined
/// here, constructed once per session and injected.
///
/// # Features
///
/// - **Contracts**: [`SpeechSynthesizer`], [`Transcriber`], [`AudioCodec`], [`ArchiveWriter`]
/// - **PCM16/WAVE codec**: headerless 24 kHz mono payloads or full WAVE files in,
///   canonical WAVE out
/// - **Zip archiver**: in-memory deflate archives for export bundles
/// - **Offline synthesizer**: deterministic tones sized by word count, for
///   development without network access
///
/// # Example
///
/// ```ignore
/// use voicespace_speech_engine::{AudioCodec, Pcm16WavCodec, SpeechConfig, SpeechSynthesizer,
///     SynthesisRequest, ToneSynthesizer};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let config = SpeechConfig::default();
///     let synth = ToneSynthesizer::new(config.clone())?;
///     let codec = Pcm16WavCodec::from_config(&config);
///
///     let payload = synth.synthesize(SynthesisRequest::narration("Hello, world!", "Kore")).await?;
///     let buffer = codec.decode(&payload).await?;
///     println!("Duration: {:?}", buffer.duration());
///
///     Ok(())
/// }
/// ```
pub mod archive;
pub mod codec;
pub mod config;
pub mod error;
pub mod provider;
pub mod synthesizer;
pub mod types;

// Re-export main types
pub use archive::ZipArchiver;
pub use codec::{encode_wave, Pcm16WavCodec};
pub use config::{SpeechConfig, DEFAULT_SAMPLE_RATE, DEFAULT_VOICE, PREBUILT_VOICES};
pub use error::{Result, SpeechError};
pub use provider::{ArchiveWriter, AudioCodec, SpeechSynthesizer, Transcriber};
pub use synthesizer::ToneSynthesizer;
pub use types::{ArchiveEntry, AudioBuffer, ReferenceAudio, Speaker, SynthesisRequest, VoiceSelection};
