//! Tests for GenerationOrchestrator

use super::*;
use crate::models::{NodeStatus, NodeUpdate};
use crate::services::project_service::Collaborators;
use async_trait::async_trait;
use std::sync::Mutex;
use voicespace_speech_engine::{
    Pcm16WavCodec, Speaker, SpeechError, VoiceSelection, ZipArchiver,
};

/// 100 ms of silence at 24 kHz mono, as a headerless PCM16 payload
const PAYLOAD_LEN: usize = 4_800;

/// Synthesizer that records requests and fails on demand
#[derive(Default)]
struct RecordingSynthesizer {
    fail_mimic: bool,
    fail_narration: bool,
    /// Return an empty payload instead of audio
    empty: bool,
    /// Return bytes the codec cannot interpret
    garbled: bool,
    requests: Mutex<Vec<SynthesisRequest>>,
}

impl RecordingSynthesizer {
    fn requests(&self) -> Vec<SynthesisRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl SpeechSynthesizer for RecordingSynthesizer {
    async fn synthesize(
        &self,
        request: SynthesisRequest,
    ) -> voicespace_speech_engine::Result<Vec<u8>> {
        self.requests.lock().unwrap().push(request.clone());

        match &request.voice {
            VoiceSelection::Mimic if self.fail_mimic => {
                Err(SpeechError::SynthesisFailed("voice cloning rejected".into()))
            }
            VoiceSelection::Single { .. } if self.fail_narration => {
                Err(SpeechError::ServiceUnavailable("quota exceeded".into()))
            }
            _ if request.text.contains("FAIL") => {
                Err(SpeechError::SynthesisFailed("model refused".into()))
            }
            _ if self.empty => Ok(Vec::new()),
            // An odd byte count cannot be PCM16
            _ if self.garbled => Ok(vec![0; 3]),
            _ => Ok(vec![0; PAYLOAD_LEN]),
        }
    }
}

struct EchoTranscriber;

#[async_trait]
impl Transcriber for EchoTranscriber {
    async fn transcribe(&self, audio: &ReferenceAudio) -> voicespace_speech_engine::Result<String> {
        Ok(format!("{} bytes of speech", audio.bytes.len()))
    }
}

struct BlankTranscriber;

#[async_trait]
impl Transcriber for BlankTranscriber {
    async fn transcribe(&self, _audio: &ReferenceAudio) -> voicespace_speech_engine::Result<String> {
        Ok("  \n".to_string())
    }
}

struct Harness {
    orchestrator: GenerationOrchestrator,
    tree: Arc<RwLock<ContentTree>>,
    document: Arc<RwLock<DocumentState>>,
    synthesizer: Arc<RecordingSynthesizer>,
    events: broadcast::Receiver<ProjectEvent>,
}

fn harness(synthesizer: RecordingSynthesizer, transcriber: bool) -> Harness {
    let transcriber: Option<Arc<dyn Transcriber>> = if transcriber {
        Some(Arc::new(EchoTranscriber))
    } else {
        None
    };
    harness_with(synthesizer, transcriber)
}

fn harness_with(
    synthesizer: RecordingSynthesizer,
    transcriber: Option<Arc<dyn Transcriber>>,
) -> Harness {
    let synthesizer = Arc::new(synthesizer);
    let mut collaborators = Collaborators::new(
        synthesizer.clone(),
        Arc::new(Pcm16WavCodec::default()),
        Arc::new(ZipArchiver::new()),
    );
    if let Some(transcriber) = transcriber {
        collaborators = collaborators.with_transcriber(transcriber);
    }

    let tree = Arc::new(RwLock::new(ContentTree::new()));
    let document = Arc::new(RwLock::new(DocumentState::default()));
    let (event_tx, events) = broadcast::channel(64);
    let orchestrator = GenerationOrchestrator::new(
        tree.clone(),
        document.clone(),
        &collaborators,
        "Puck",
        event_tx,
    );

    Harness {
        orchestrator,
        tree,
        document,
        synthesizer,
        events,
    }
}

async fn add(h: &Harness, text: &str) -> String {
    h.tree.write().await.add_root_node(text, "Kore").id
}

async fn set_mode(h: &Harness, mode: DocumentMode) {
    h.document.write().await.mode = mode;
}

fn drain(events: &mut broadcast::Receiver<ProjectEvent>) -> Vec<String> {
    let mut types = Vec::new();
    while let Ok(event) = events.try_recv() {
        types.push(event.event_type().to_string());
    }
    types
}

#[tokio::test]
async fn test_generate_attaches_artifact() {
    let mut h = harness(RecordingSynthesizer::default(), false);
    let id = add(&h, "Hello there").await;

    let outcome = h.orchestrator.generate(&id).await.unwrap();

    assert_eq!(
        outcome,
        GenerationOutcome::Completed {
            duration: Duration::from_millis(100)
        }
    );
    let tree = h.tree.read().await;
    let node = tree.get(&id).unwrap();
    assert_eq!(node.status(), NodeStatus::Success);
    assert_eq!(node.artifact().unwrap().raw_bytes().len(), PAYLOAD_LEN);
    assert!(node.error_message().is_none());

    let request = &h.synthesizer.requests()[0];
    assert_eq!(request.text, "Hello there");
    assert_eq!(request.voice, VoiceSelection::single("Kore"));

    assert_eq!(
        drain(&mut h.events),
        vec!["generation:started", "node:updated", "generation:finished"]
    );
}

#[tokio::test]
async fn test_synthesis_failure_is_recorded_on_node() {
    let h = harness(RecordingSynthesizer::default(), false);
    let id = add(&h, "Please FAIL").await;

    let outcome = h.orchestrator.generate(&id).await.unwrap();

    assert!(outcome.is_failed());
    let tree = h.tree.read().await;
    let node = tree.get(&id).unwrap();
    assert_eq!(node.status(), NodeStatus::Error);
    assert!(node.error_message().unwrap().contains("model refused"));
    assert!(node.artifact().is_none());
}

#[tokio::test]
async fn test_failure_keeps_previous_artifact() {
    let h = harness(RecordingSynthesizer::default(), false);
    let id = add(&h, "Hello").await;
    h.orchestrator.generate(&id).await.unwrap();

    h.tree
        .write()
        .await
        .update_node(&id, &NodeUpdate::new().with_text("Now FAIL"));
    h.orchestrator.generate(&id).await.unwrap();

    let tree = h.tree.read().await;
    let node = tree.get(&id).unwrap();
    assert_eq!(node.status(), NodeStatus::Error);
    assert!(node.artifact().is_some());
}

#[tokio::test]
async fn test_empty_payload_is_an_external_failure() {
    let h = harness(
        RecordingSynthesizer {
            empty: true,
            ..Default::default()
        },
        false,
    );
    let id = add(&h, "Hello").await;

    let outcome = h.orchestrator.generate(&id).await.unwrap();

    match outcome {
        GenerationOutcome::Failed { message } => {
            assert!(message.starts_with("External service failed"))
        }
        other => panic!("expected external service failure, got {:?}", other),
    }
}

#[tokio::test]
async fn test_garbled_payload_is_a_decode_failure() {
    let h = harness(
        RecordingSynthesizer {
            garbled: true,
            ..Default::default()
        },
        false,
    );
    let id = add(&h, "Hello").await;

    let outcome = h.orchestrator.generate(&id).await.unwrap();

    match outcome {
        GenerationOutcome::Failed { message } => assert!(message.starts_with("Decode failed")),
        other => panic!("expected decode failure, got {:?}", other),
    }
}

#[tokio::test]
async fn test_blank_text_is_rejected_without_side_effects() {
    let mut h = harness(RecordingSynthesizer::default(), false);
    let id = add(&h, "  \n ").await;

    let err = h.orchestrator.generate(&id).await.unwrap_err();

    assert_eq!(err, ServiceError::Validation(ValidationError::EmptyInput));
    assert_eq!(h.tree.read().await.get(&id).unwrap().status(), NodeStatus::Idle);
    assert!(h.synthesizer.requests().is_empty());
    assert!(drain(&mut h.events).is_empty());
}

#[tokio::test]
async fn test_generate_missing_node() {
    let h = harness(RecordingSynthesizer::default(), false);
    let err = h.orchestrator.generate("ghost").await.unwrap_err();
    assert_eq!(err, ServiceError::node_not_found("ghost"));
}

#[tokio::test]
async fn test_generate_all_isolates_failures() {
    let h = harness(RecordingSynthesizer::default(), false);
    let good = add(&h, "Good text").await;
    let bad = add(&h, "FAIL here").await;
    let blank = add(&h, "   ").await;
    let part = h.tree.write().await.extract_child(&good, 0, 4).unwrap().id;

    let results = h.orchestrator.generate_all().await;

    let ids: Vec<_> = results.iter().map(|r| r.node_id.clone()).collect();
    assert_eq!(ids, vec![good.clone(), part.clone(), bad.clone()]);
    assert!(results[0].result.as_ref().unwrap().is_completed());
    assert!(results[1].result.as_ref().unwrap().is_completed());
    assert!(results[2].result.as_ref().unwrap().is_failed());

    let tree = h.tree.read().await;
    assert_eq!(tree.get(&blank).unwrap().status(), NodeStatus::Idle);
    assert_eq!(tree.count_with_status(NodeStatus::Success), 2);
}

#[tokio::test]
async fn test_narration_records_staleness_baseline() {
    let h = harness(RecordingSynthesizer::default(), false);
    set_mode(
        &h,
        DocumentMode::Narration {
            text: "Welcome".to_string(),
            voice: "Aoede".to_string(),
        },
    )
    .await;

    let outcome = h.orchestrator.generate_document().await.unwrap();
    assert!(outcome.is_completed());

    let document = h.document.read().await;
    assert!(document.artifact().is_some());
    assert!(!document.is_stale());
    assert_eq!(
        h.synthesizer.requests()[0].voice,
        VoiceSelection::single("Aoede")
    );
}

#[tokio::test]
async fn test_dialogue_passes_roster() {
    let h = harness(RecordingSynthesizer::default(), false);
    let roster = vec![Speaker::new("Ann", "Kore"), Speaker::new("Ben", "Puck")];
    set_mode(
        &h,
        DocumentMode::Dialogue {
            script: "Ann: Hi\nBen: Hello".to_string(),
            roster: roster.clone(),
        },
    )
    .await;

    h.orchestrator.generate_document().await.unwrap();

    assert_eq!(
        h.synthesizer.requests()[0].voice,
        VoiceSelection::MultiSpeaker { roster }
    );
}

#[tokio::test]
async fn test_dialogue_without_roster_is_empty_input() {
    let h = harness(RecordingSynthesizer::default(), false);
    set_mode(
        &h,
        DocumentMode::Dialogue {
            script: "Ann: Hi".to_string(),
            roster: vec![],
        },
    )
    .await;

    let err = h.orchestrator.generate_document().await.unwrap_err();
    assert!(err.is_validation());
    assert_eq!(h.document.read().await.generation().status(), NodeStatus::Idle);
}

#[tokio::test]
async fn test_cloned_voice_falls_back_to_fixed_voice() {
    let h = harness(
        RecordingSynthesizer {
            fail_mimic: true,
            ..Default::default()
        },
        false,
    );
    set_mode(
        &h,
        DocumentMode::ClonedVoice {
            text: "In my own voice".to_string(),
            reference: ReferenceAudio::new(vec![1, 2, 3, 4], "audio/webm"),
        },
    )
    .await;

    let outcome = h.orchestrator.generate_document().await.unwrap();

    assert!(outcome.is_completed());
    let requests = h.synthesizer.requests();
    assert_eq!(requests.len(), 2);
    assert_eq!(requests[0].voice, VoiceSelection::Mimic);
    assert!(requests[0].reference.is_some());
    assert_eq!(requests[1].voice, VoiceSelection::single("Puck"));
    assert!(requests[1].reference.is_none());
    assert!(!h.document.read().await.is_stale());
}

#[tokio::test]
async fn test_cloned_voice_double_failure_reports_both() {
    let h = harness(
        RecordingSynthesizer {
            fail_mimic: true,
            fail_narration: true,
            ..Default::default()
        },
        false,
    );
    set_mode(
        &h,
        DocumentMode::ClonedVoice {
            text: "In my own voice".to_string(),
            reference: ReferenceAudio::new(vec![1, 2, 3, 4], "audio/webm"),
        },
    )
    .await;

    let outcome = h.orchestrator.generate_document().await.unwrap();

    let GenerationOutcome::Failed { message } = outcome else {
        panic!("expected failure");
    };
    assert!(message.contains("voice cloning rejected"));
    assert!(message.contains("quota exceeded"));

    let document = h.document.read().await;
    assert_eq!(document.generation().status(), NodeStatus::Error);
    assert_eq!(document.generation().error_message(), Some(message.as_str()));
}

#[tokio::test]
async fn test_transcription_produces_transcript() {
    let h = harness(RecordingSynthesizer::default(), true);
    set_mode(
        &h,
        DocumentMode::Transcription {
            sample: ReferenceAudio::new(vec![0; 10], "audio/wav"),
        },
    )
    .await;

    let outcome = h.orchestrator.generate_document().await.unwrap();

    assert_eq!(
        outcome,
        GenerationOutcome::Transcribed {
            transcript: "10 bytes of speech".to_string()
        }
    );
    let document = h.document.read().await;
    assert_eq!(document.transcript(), Some("10 bytes of speech"));
    assert!(document.artifact().is_none());
    assert!(!document.is_stale());
    assert!(h.synthesizer.requests().is_empty());
}

#[tokio::test]
async fn test_transcription_requires_transcriber() {
    let h = harness(RecordingSynthesizer::default(), false);
    set_mode(
        &h,
        DocumentMode::Transcription {
            sample: ReferenceAudio::new(vec![0; 10], "audio/wav"),
        },
    )
    .await;

    let err = h.orchestrator.generate_document().await.unwrap_err();
    assert!(matches!(err, ServiceError::Config(_)));
    assert_eq!(h.document.read().await.generation().status(), NodeStatus::Idle);
}

#[tokio::test]
async fn test_blank_transcript_is_an_external_failure() {
    let h = harness_with(RecordingSynthesizer::default(), Some(Arc::new(BlankTranscriber)));
    set_mode(
        &h,
        DocumentMode::Transcription {
            sample: ReferenceAudio::new(vec![0; 10], "audio/wav"),
        },
    )
    .await;

    let outcome = h.orchestrator.generate_document().await.unwrap();

    let GenerationOutcome::Failed { message } = outcome else {
        panic!("expected failure");
    };
    assert!(message.starts_with("External service failed"));
    let document = h.document.read().await;
    assert_eq!(document.generation().status(), NodeStatus::Error);
    assert!(document.transcript().is_none());
}
