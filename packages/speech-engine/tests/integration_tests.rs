/// Integration tests for the offline speech stack
/// Exercises synthesizer -> codec -> archive the way the export pipeline chains them
#[cfg(test)]
mod integration_tests {
    use std::io::{Cursor, Read};
    use std::time::Duration;
    use tokio_test::assert_err;
    use voicespace_speech_engine::{
        ArchiveEntry, ArchiveWriter, AudioCodec, Pcm16WavCodec, SpeechConfig, SpeechSynthesizer,
        SynthesisRequest, ToneSynthesizer, ZipArchiver,
    };

    #[tokio::test]
    async fn test_synthesized_payload_decodes_at_configured_rate() {
        let config = SpeechConfig::default();
        let synth = ToneSynthesizer::new(config.clone()).unwrap();
        let codec = Pcm16WavCodec::from_config(&config);

        let payload = synth
            .synthesize(SynthesisRequest::narration(
                "five words are spoken here",
                "Kore",
            ))
            .await
            .unwrap();
        let buffer = codec.decode(&payload).await.unwrap();

        assert_eq!(buffer.sample_rate, 24_000);
        assert_eq!(buffer.channels, 1);
        assert_eq!(buffer.duration(), Duration::from_secs(2));
    }

    #[tokio::test]
    async fn test_encoded_wave_survives_archive() {
        let config = SpeechConfig::default();
        let synth = ToneSynthesizer::new(config.clone()).unwrap();
        let codec = Pcm16WavCodec::from_config(&config);

        let payload = synth
            .synthesize(SynthesisRequest::narration("archive me", "Puck"))
            .await
            .unwrap();
        let buffer = codec.decode(&payload).await.unwrap();
        let wav = codec.encode(&buffer).await.unwrap();

        let archive_bytes = ZipArchiver::new()
            .write(&[ArchiveEntry::new("bundle/section.wav", wav.clone())])
            .await
            .unwrap();

        let mut archive = zip::ZipArchive::new(Cursor::new(archive_bytes)).unwrap();
        let mut extracted = Vec::new();
        archive
            .by_name("bundle/section.wav")
            .unwrap()
            .read_to_end(&mut extracted)
            .unwrap();
        assert_eq!(extracted, wav);

        let redecoded = codec.decode(&extracted).await.unwrap();
        assert_eq!(redecoded, buffer);
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let config = SpeechConfig {
            sample_rate: 0,
            ..Default::default()
        };
        assert!(ToneSynthesizer::new(config).is_err());
    }

    #[test]
    fn test_unknown_voice_fails_synthesis() {
        let synth = ToneSynthesizer::new(SpeechConfig::default()).unwrap();

        let result = tokio_test::block_on(
            synth.synthesize(SynthesisRequest::narration("hello there", "Nobody")),
        );

        let err = assert_err!(result);
        assert!(!err.is_decode());
        assert!(err.to_string().contains("Nobody"));
    }
}
