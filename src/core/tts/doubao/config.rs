//! Configuration types and protocol constants for the Doubao streaming decoder.
//!
//! This module contains:
//! - Status codes of the newline-delimited JSON event stream
//! - Decoder limits (`DEFAULT_MIN_CHUNK_SIZE`, `DEFAULT_MAX_LINE_BYTES`)
//! - Per-session decoder settings (`DecoderSettings`)
//!
//! # Example
//!
//! ```rust
//! use doubao_stream::core::tts::doubao::DecoderSettings;
//!
//! let settings = DecoderSettings::default()
//!     .with_label("request-42")
//!     .with_min_chunk_size(32);
//!
//! assert!(settings.validate().is_ok());
//! ```

use serde::{Deserialize, Serialize};

// =============================================================================
// Protocol Constants
// =============================================================================

/// Status code of a continuation frame ("more data may follow").
pub const CONTINUATION_CODE: i64 = 0;

/// Status code of the terminal frame sent when synthesis is complete.
pub const TERMINAL_CODE: i64 = 20_000_000;

// =============================================================================
// Decoder Limits
// =============================================================================

/// Decoded chunks shorter than this are treated as truncated fragments.
///
/// Kept well below the size of a minimal WAV file (44 byte header plus samples)
/// so legitimate small frames survive.
pub const DEFAULT_MIN_CHUNK_SIZE: usize = 16;

/// Upper bound for a single JSON line.
pub const DEFAULT_MAX_LINE_BYTES: usize = 16 * 1024 * 1024;

/// Smallest accepted value for `max_line_bytes`.
pub const MIN_MAX_LINE_BYTES: usize = 1024;

/// Default label attached to session log events.
pub const DEFAULT_LABEL: &str = "doubao";

// =============================================================================
// DecoderSettings
// =============================================================================

/// Settings applied to every `ParseSession`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecoderSettings {
    /// Minimum decoded chunk size in bytes; smaller chunks are discarded at finalize.
    #[serde(default = "default_min_chunk_size")]
    pub min_chunk_size: usize,

    /// Lines longer than this are dropped without being parsed.
    #[serde(default = "default_max_line_bytes")]
    pub max_line_bytes: usize,

    /// Label rendered as the `session` field of log events.
    #[serde(default = "default_label")]
    pub label: String,
}

fn default_min_chunk_size() -> usize {
    DEFAULT_MIN_CHUNK_SIZE
}

fn default_max_line_bytes() -> usize {
    DEFAULT_MAX_LINE_BYTES
}

fn default_label() -> String {
    DEFAULT_LABEL.to_string()
}

impl Default for DecoderSettings {
    fn default() -> Self {
        Self {
            min_chunk_size: DEFAULT_MIN_CHUNK_SIZE,
            max_line_bytes: DEFAULT_MAX_LINE_BYTES,
            label: default_label(),
        }
    }
}

impl DecoderSettings {
    /// Set the log label.
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    /// Set the minimum chunk size.
    pub fn with_min_chunk_size(mut self, size: usize) -> Self {
        self.min_chunk_size = size;
        self
    }

    /// Set the maximum line length.
    pub fn with_max_line_bytes(mut self, size: usize) -> Self {
        self.max_line_bytes = size;
        self
    }

    /// Validate the settings.
    pub fn validate(&self) -> Result<(), String> {
        if self.max_line_bytes < MIN_MAX_LINE_BYTES {
            return Err(format!(
                "max_line_bytes must be at least {MIN_MAX_LINE_BYTES}, got {}",
                self.max_line_bytes
            ));
        }

        if self.min_chunk_size > self.max_line_bytes {
            return Err(format!(
                "min_chunk_size ({}) cannot exceed max_line_bytes ({})",
                self.min_chunk_size, self.max_line_bytes
            ));
        }

        Ok(())
    }
}
