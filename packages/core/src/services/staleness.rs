//! Document Staleness
//!
//! Tracks whether the document's audio still matches its inputs. The
//! fingerprint of the active mode is recorded when a document generation
//! succeeds; the document is stale once the current fingerprint differs.

use crate::models::{ContentFingerprint, DocumentMode};

#[derive(Debug, Clone, Default)]
pub struct StalenessTracker {
    baseline: Option<ContentFingerprint>,
}

impl StalenessTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `mode`'s current inputs as the generated baseline
    pub fn record(&mut self, mode: &DocumentMode) {
        self.baseline = mode.fingerprint();
    }

    pub fn clear(&mut self) {
        self.baseline = None;
    }

    pub fn baseline(&self) -> Option<&ContentFingerprint> {
        self.baseline.as_ref()
    }

    /// Whether output exists that no longer matches `mode`'s inputs
    ///
    /// Never stale without output or for modes without a fingerprint.
    pub fn is_stale(&self, mode: &DocumentMode, has_output: bool) -> bool {
        if !has_output || !mode.supports_staleness() {
            return false;
        }
        mode.fingerprint().as_ref() != self.baseline.as_ref()
    }
}
