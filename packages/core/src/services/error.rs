//! Service Layer Error Types
//!
//! This module defines error types for service-layer operations.
//!
//! # Taxonomy
//!
//! - **Validation** (`EmptyInput`, `InvalidSelection`, `EmptyProject`): caught
//!   before any external call, never touches node state
//! - **ExternalService**: synthesis or transcription rejected the request or
//!   returned nothing usable
//! - **Decode**: the codec could not interpret returned bytes
//! - **Archive**: encoding or compression failed during export
//!
//! During generation, `ExternalService` and `Decode` are recorded on the
//! node (status = Error) rather than returned; see
//! [`crate::services::GenerationOutcome`].

use crate::models::ValidationError;
use thiserror::Error;
use voicespace_speech_engine::SpeechError;

/// Service operation errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ServiceError {
    /// Input rejected before any external call
    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationError),

    /// Node not found by ID
    #[error("Node not found: {id}")]
    NodeNotFound { id: String },

    /// Node hierarchy constraint violation
    #[error("Hierarchy constraint violated: {0}")]
    HierarchyViolation(String),

    /// Synthesis or transcription collaborator failed
    #[error("External service failed: {0}")]
    ExternalService(String),

    /// Codec could not interpret the returned payload
    #[error("Decode failed: {0}")]
    Decode(String),

    /// Export packaging failed; no bundle was produced
    #[error("Archive failed: {0}")]
    Archive(String),

    /// Session was assembled with missing or invalid collaborators
    #[error("Configuration error: {0}")]
    Config(String),
}

impl ServiceError {
    /// Create a node not found error
    pub fn node_not_found(id: impl Into<String>) -> Self {
        Self::NodeNotFound { id: id.into() }
    }

    /// Create a hierarchy violation error
    pub fn hierarchy_violation(msg: impl Into<String>) -> Self {
        Self::HierarchyViolation(msg.into())
    }

    /// Wrap a synthesis or transcription failure
    pub fn from_service(err: SpeechError) -> Self {
        Self::ExternalService(err.to_string())
    }

    /// Classify a failure from the codec step of a generation job
    ///
    /// Only bytes the codec could not interpret are a decode failure; an empty
    /// payload means the service returned nothing usable.
    pub fn from_codec(err: SpeechError) -> Self {
        if err.is_decode() {
            Self::Decode(err.to_string())
        } else {
            Self::ExternalService(err.to_string())
        }
    }

    /// Classify a failure from the encode/archive step of an export
    pub fn from_export(err: SpeechError) -> Self {
        Self::Archive(err.to_string())
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}
