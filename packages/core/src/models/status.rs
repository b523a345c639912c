//! Generation Status
//!
//! Every generation target (a content node, or the document pseudo-node)
//! carries a [`GenerationState`]: its status, last error, last output and a
//! monotonically increasing issue counter.
//!
//! # State Machine
//!
//! ```text
//! Idle ──▶ Generating ──▶ Success ──┐
//!              ▲    └───▶ Error ────┤
//!              └────────────────────┘   (regenerate / retry)
//! ```
//!
//! # Most-Recently-Issued Wins
//!
//! `begin()` hands out a sequence number. A completion is applied only if its
//! sequence number is still the latest issued one; otherwise it is discarded
//! as superseded. Overlapping generations on the same target therefore always
//! settle on the result of the call that was issued last, whatever order the
//! collaborators resolve in.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeStatus {
    #[default]
    Idle,
    Generating,
    Success,
    Error,
}

impl NodeStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            NodeStatus::Idle => "idle",
            NodeStatus::Generating => "generating",
            NodeStatus::Success => "success",
            NodeStatus::Error => "error",
        }
    }
}

impl std::fmt::Display for NodeStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Status, error and output of one generation target
///
/// Invariants maintained by the transition methods:
/// - `Success` ⇒ output present and no error message
/// - `Error` ⇒ error message present (output keeps whatever it held)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", bound = "")]
pub struct GenerationState<T> {
    #[serde(default)]
    status: NodeStatus,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    error_message: Option<String>,

    #[serde(skip)]
    output: Option<T>,

    /// Sequence number of the most recently issued generation
    #[serde(skip)]
    issued: u64,
}

impl<T> Default for GenerationState<T> {
    fn default() -> Self {
        Self {
            status: NodeStatus::Idle,
            error_message: None,
            output: None,
            issued: 0,
        }
    }
}

impl<T> GenerationState<T> {
    pub fn status(&self) -> NodeStatus {
        self.status
    }

    pub fn error_message(&self) -> Option<&str> {
        self.error_message.as_deref()
    }

    pub fn output(&self) -> Option<&T> {
        self.output.as_ref()
    }

    /// Sequence number of the latest issued generation (0 = never generated)
    pub fn issued(&self) -> u64 {
        self.issued
    }

    /// Enter `Generating` and issue a new sequence number
    pub(crate) fn begin(&mut self) -> u64 {
        self.issued += 1;
        self.status = NodeStatus::Generating;
        self.error_message = None;
        self.issued
    }

    pub(crate) fn is_latest(&self, seq: u64) -> bool {
        seq == self.issued
    }

    /// Apply a successful result; returns false if `seq` was superseded
    pub(crate) fn succeed(&mut self, seq: u64, output: T) -> bool {
        if !self.is_latest(seq) {
            return false;
        }
        self.status = NodeStatus::Success;
        self.output = Some(output);
        self.error_message = None;
        true
    }

    /// Apply a failure; returns false if `seq` was superseded
    pub(crate) fn fail(&mut self, seq: u64, message: impl Into<String>) -> bool {
        if !self.is_latest(seq) {
            return false;
        }
        self.status = NodeStatus::Error;
        self.error_message = Some(message.into());
        true
    }

    /// Drop output and error, returning to `Idle`
    ///
    /// The issue counter keeps counting so in-flight results stay superseded.
    pub(crate) fn clear(&mut self) {
        self.issued += 1;
        self.status = NodeStatus::Idle;
        self.error_message = None;
        self.output = None;
    }
}
