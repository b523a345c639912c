/// PCM16 / RIFF-WAVE codec
///
/// Synthesis payloads arrive either as headerless little-endian 16-bit PCM
/// (the reference deployment, mono at 24 kHz) or as a complete WAVE file.
/// Both decode to an [`AudioBuffer`]; encoding always produces a canonical
/// 44-byte-header WAVE file.
use crate::config::SpeechConfig;
use crate::error::{Result, SpeechError};
use crate::provider::AudioCodec;
use crate::types::AudioBuffer;
use async_trait::async_trait;

const RIFF_HEADER_LEN: usize = 12;
const CHUNK_HEADER_LEN: usize = 8;
const WAVE_FORMAT_PCM: u16 = 1;
const BITS_PER_SAMPLE: u16 = 16;

#[derive(Debug, Clone)]
pub struct Pcm16WavCodec {
    sample_rate: u32,
    channels: u16,
}

impl Pcm16WavCodec {
    /// Codec for headerless payloads at the given layout
    pub fn new(sample_rate: u32, channels: u16) -> Self {
        Self {
            sample_rate,
            channels,
        }
    }

    pub fn from_config(config: &SpeechConfig) -> Self {
        Self::new(config.sample_rate, config.channels)
    }

    fn decode_raw(&self, payload: &[u8]) -> Result<AudioBuffer> {
        if payload.len() % 2 != 0 {
            return Err(SpeechError::Decode(format!(
                "PCM16 payload has odd length {}",
                payload.len()
            )));
        }
        Ok(AudioBuffer::new(
            pcm16_samples(payload),
            self.sample_rate,
            self.channels,
        ))
    }

    fn decode_wave(&self, payload: &[u8]) -> Result<AudioBuffer> {
        let mut offset = RIFF_HEADER_LEN;
        let mut format: Option<(u16, u16, u32, u16)> = None;

        while offset + CHUNK_HEADER_LEN <= payload.len() {
            let id = &payload[offset..offset + 4];
            let size = read_u32(payload, offset + 4) as usize;
            let body_start = offset + CHUNK_HEADER_LEN;
            let body_end = body_start
                .checked_add(size)
                .filter(|end| *end <= payload.len())
                .ok_or_else(|| {
                    SpeechError::Decode(format!(
                        "chunk '{}' overruns payload",
                        String::from_utf8_lossy(id)
                    ))
                })?;

            match id {
                b"fmt " => {
                    if size < 16 {
                        return Err(SpeechError::Decode("fmt chunk too short".to_string()));
                    }
                    format = Some((
                        read_u16(payload, body_start),
                        read_u16(payload, body_start + 2),
                        read_u32(payload, body_start + 4),
                        read_u16(payload, body_start + 14),
                    ));
                }
                b"data" => {
                    let (tag, channels, sample_rate, bits) = format.ok_or_else(|| {
                        SpeechError::Decode("data chunk precedes fmt chunk".to_string())
                    })?;
                    if tag != WAVE_FORMAT_PCM || bits != BITS_PER_SAMPLE {
                        return Err(SpeechError::Decode(format!(
                            "unsupported WAVE format tag {} with {} bits per sample",
                            tag, bits
                        )));
                    }
                    if channels == 0 || sample_rate == 0 {
                        return Err(SpeechError::Decode(
                            "WAVE header declares zero channels or sample rate".to_string(),
                        ));
                    }
                    let data = &payload[body_start..body_end];
                    if data.len() % 2 != 0 {
                        return Err(SpeechError::Decode(
                            "WAVE data chunk has odd length".to_string(),
                        ));
                    }
                    return Ok(AudioBuffer::new(pcm16_samples(data), sample_rate, channels));
                }
                _ => {}
            }

            // Chunks are word-aligned
            offset = body_end + (size % 2);
        }

        Err(SpeechError::Decode("WAVE payload has no data chunk".to_string()))
    }
}

impl Default for Pcm16WavCodec {
    fn default() -> Self {
        Self::from_config(&SpeechConfig::default())
    }
}

#[async_trait]
impl AudioCodec for Pcm16WavCodec {
    async fn decode(&self, payload: &[u8]) -> Result<AudioBuffer> {
        if payload.is_empty() {
            return Err(SpeechError::EmptyPayload);
        }

        let buffer = if is_wave(payload) {
            self.decode_wave(payload)?
        } else {
            self.decode_raw(payload)?
        };

        if buffer.is_empty() {
            return Err(SpeechError::EmptyPayload);
        }

        tracing::debug!(
            "Decoded {} frames ({:?}) at {} Hz",
            buffer.frames(),
            buffer.duration(),
            buffer.sample_rate
        );
        Ok(buffer)
    }

    async fn encode(&self, buffer: &AudioBuffer) -> Result<Vec<u8>> {
        encode_wave(buffer)
    }
}

/// Encode `buffer` as a canonical RIFF/WAVE file with 16-bit PCM samples
pub fn encode_wave(buffer: &AudioBuffer) -> Result<Vec<u8>> {
    if buffer.channels == 0 || buffer.sample_rate == 0 {
        return Err(SpeechError::Encode(
            "buffer has zero channels or sample rate".to_string(),
        ));
    }

    let data_len = u32::try_from(buffer.samples.len() * 2)
        .map_err(|_| SpeechError::Encode("audio exceeds WAVE size limit".to_string()))?;
    let block_align = buffer.channels * (BITS_PER_SAMPLE / 8);
    let byte_rate = buffer.sample_rate * block_align as u32;

    let mut out = Vec::with_capacity(44 + data_len as usize);
    out.extend_from_slice(b"RIFF");
    out.extend_from_slice(&(36 + data_len).to_le_bytes());
    out.extend_from_slice(b"WAVE");

    out.extend_from_slice(b"fmt ");
    out.extend_from_slice(&16u32.to_le_bytes());
    out.extend_from_slice(&WAVE_FORMAT_PCM.to_le_bytes());
    out.extend_from_slice(&buffer.channels.to_le_bytes());
    out.extend_from_slice(&buffer.sample_rate.to_le_bytes());
    out.extend_from_slice(&byte_rate.to_le_bytes());
    out.extend_from_slice(&block_align.to_le_bytes());
    out.extend_from_slice(&BITS_PER_SAMPLE.to_le_bytes());

    out.extend_from_slice(b"data");
    out.extend_from_slice(&data_len.to_le_bytes());
    for sample in &buffer.samples {
        out.extend_from_slice(&sample.to_le_bytes());
    }

    Ok(out)
}

fn is_wave(payload: &[u8]) -> bool {
    payload.len() >= RIFF_HEADER_LEN && &payload[0..4] == b"RIFF" && &payload[8..12] == b"WAVE"
}

fn pcm16_samples(bytes: &[u8]) -> Vec<i16> {
    bytes
        .chunks_exact(2)
        .map(|pair| i16::from_le_bytes([pair[0], pair[1]]))
        .collect()
}

fn read_u16(bytes: &[u8], at: usize) -> u16 {
    u16::from_le_bytes([bytes[at], bytes[at + 1]])
}

fn read_u32(bytes: &[u8], at: usize) -> u32 {
    u32::from_le_bytes([bytes[at], bytes[at + 1], bytes[at + 2], bytes[at + 3]])
}
