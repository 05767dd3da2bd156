//! Doubao decode error types.

use thiserror::Error;

/// Result type for decode operations.
pub type DecodeResult<T> = Result<T, DecodeError>;

/// Errors surfaced when a response stream cannot produce audio.
///
/// Malformed lines, bad Base64 and invalid UTF-8 never show up here; those are
/// recovered inside the session and only logged.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    // ─────────────────────────────────────────────────────────────────────────────
    // Stream Errors
    // ─────────────────────────────────────────────────────────────────────────────
    /// The provider sent an error frame.
    #[error("Doubao TTS API error (code={code}): {message}")]
    Provider { code: i64, message: String },

    /// Not a single byte was received.
    #[error("No response data received from Doubao TTS API")]
    EmptyStream,

    /// Bytes arrived but none of them decoded to audio.
    #[error("No audio chunks in Doubao TTS response ({bytes_received} bytes received)")]
    NoAudio { bytes_received: u64 },

    /// Every decoded chunk was below the minimum chunk size.
    #[error("All {chunks} audio chunks are too small, payload likely corrupt (sizes: {sizes:?})")]
    CorruptPayload { chunks: usize, sizes: Vec<usize> },

    // ─────────────────────────────────────────────────────────────────────────────
    // Transport Errors
    // ─────────────────────────────────────────────────────────────────────────────
    /// The HTTP request completed with a non-success status.
    #[error("Doubao TTS API returned HTTP {status}: {body}")]
    HttpStatus { status: u16, body: String },

    /// Reading the response body failed.
    #[error("Transport error: {0}")]
    Transport(String),
}

impl DecodeError {
    /// Whether issuing the request again may succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Transport(_) | Self::EmptyStream => true,
            Self::HttpStatus { status, .. } => *status == 429 || *status >= 500,
            Self::Provider { .. } | Self::NoAudio { .. } | Self::CorruptPayload { .. } => false,
        }
    }
}

impl From<reqwest::Error> for DecodeError {
    fn from(err: reqwest::Error) -> Self {
        Self::Transport(err.to_string())
    }
}
