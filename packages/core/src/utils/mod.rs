//! Utility functions for VoiceSpace Core
//!
//! This module provides common utility functions used across the codebase.

mod naming;

pub use naming::{sanitize, timestamp_name};
