/// Zip archive writer
use crate::error::{Result, SpeechError};
use crate::provider::ArchiveWriter;
use crate::types::ArchiveEntry;
use async_trait::async_trait;
use std::collections::HashSet;
use std::io::{Cursor, Write};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

/// Deflate-compressed zip archives built entirely in memory
#[derive(Debug, Clone, Default)]
pub struct ZipArchiver;

impl ZipArchiver {
    pub fn new() -> Self {
        Self
    }

    fn write_sync(entries: &[ArchiveEntry]) -> Result<Vec<u8>> {
        let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
        let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
        let mut seen = HashSet::new();

        for entry in entries {
            if entry.name.is_empty() || entry.name.ends_with('/') {
                return Err(SpeechError::Archive(format!(
                    "invalid member name '{}'",
                    entry.name
                )));
            }
            if !seen.insert(entry.name.as_str()) {
                return Err(SpeechError::Archive(format!(
                    "duplicate member name '{}'",
                    entry.name
                )));
            }

            writer.start_file(entry.name.as_str(), options)?;
            writer
                .write_all(&entry.bytes)
                .map_err(|e| SpeechError::Archive(e.to_string()))?;
        }

        let cursor = writer.finish()?;
        Ok(cursor.into_inner())
    }
}

#[async_trait]
impl ArchiveWriter for ZipArchiver {
    async fn write(&self, entries: &[ArchiveEntry]) -> Result<Vec<u8>> {
        let bytes = Self::write_sync(entries)?;
        tracing::debug!(
            "Wrote zip archive with {} members ({} bytes)",
            entries.len(),
            bytes.len()
        );
        Ok(bytes)
    }
}
