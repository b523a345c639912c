//! Offline Export Binary
//!
//! Reads a plain-text script, turns each paragraph into a section, generates
//! every section with the offline tone synthesizer and writes the export
//! bundle to disk. Useful for checking naming, manifest layout and archive
//! structure without a speech service.
//!
//! # Usage
//!
//! ```bash
//! cargo run --bin dev-export -- script.txt
//!
//! VOICESPACE_APP_NAME="My App" VOICESPACE_FEATURE_NAME=Onboarding \
//!     VOICESPACE_OUTPUT_DIR=./out cargo run --bin dev-export -- script.txt
//! ```
//!
//! # Environment Variables
//!
//! - `VOICESPACE_APP_NAME`: App label (default: "VoiceSpace")
//! - `VOICESPACE_FEATURE_NAME`: Feature label (default: input file stem)
//! - `VOICESPACE_VOICE`: Voice for every section (default: "Kore")
//! - `VOICESPACE_OUTPUT_DIR`: Directory for the bundle (default: ".")
//! - `RUST_LOG`: Logging level (e.g., "info", "debug", "trace")

use std::env;
use std::path::PathBuf;

use voicespace_core::models::ProjectConfig;
use voicespace_core::services::{Collaborators, ProjectService};
use voicespace_speech_engine::SpeechConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    tracing::info!("🚀 VoiceSpace Offline Export");
    tracing::info!("==================================");

    let input: PathBuf = env::args()
        .nth(1)
        .map(PathBuf::from)
        .ok_or_else(|| anyhow::anyhow!("Usage: dev-export <script.txt>"))?;

    let feature_default = input
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default();
    let app_name = env::var("VOICESPACE_APP_NAME").unwrap_or_else(|_| "VoiceSpace".to_string());
    let feature_name = env::var("VOICESPACE_FEATURE_NAME").unwrap_or(feature_default);
    let output_dir: PathBuf = env::var("VOICESPACE_OUTPUT_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("."));

    let speech_config = SpeechConfig::default();
    let voice = env::var("VOICESPACE_VOICE").unwrap_or_else(|_| speech_config.default_voice.clone());
    if !speech_config.supports_voice(&voice) {
        anyhow::bail!(
            "Unknown voice '{}'; choose one of {}",
            voice,
            speech_config.voices.join(", ")
        );
    }

    tracing::info!("📄 Input: {}", input.display());
    tracing::info!("🏷️  Labels: {} / {}", app_name, feature_name);
    tracing::info!("🎙️  Voice: {}", voice);

    let script = tokio::fs::read_to_string(&input).await?;

    let service = ProjectService::new(
        ProjectConfig::new(app_name, feature_name)
            .with_default_voice(voice)
            .with_fallback_voice(speech_config.fallback_voice.clone()),
        Collaborators::offline(speech_config)?,
    );

    // One section per blank-line separated paragraph
    let mut paragraph = Vec::new();
    for line in script.lines().chain(std::iter::once("")) {
        if line.trim().is_empty() {
            if !paragraph.is_empty() {
                service.add_section(paragraph.join(" ")).await;
                paragraph.clear();
            }
        } else {
            paragraph.push(line.trim());
        }
    }

    let results = service.generate_all().await;
    let completed = results
        .iter()
        .filter(|r| matches!(&r.result, Ok(outcome) if outcome.is_completed()))
        .count();
    for failed in results.iter().filter(|r| !matches!(&r.result, Ok(o) if o.is_completed())) {
        tracing::warn!("⚠️  Node {} did not complete: {:?}", failed.node_id, failed.result);
    }
    tracing::info!("✅ Generated {}/{} sections", completed, results.len());

    let bundle = service.export_bundle().await?;

    tokio::fs::create_dir_all(&output_dir).await?;
    let path = output_dir.join(&bundle.file_name);
    tokio::fs::write(&path, &bundle.bytes).await?;

    tracing::info!("📦 Wrote {} ({} members)", path.display(), bundle.members.len());
    Ok(())
}
