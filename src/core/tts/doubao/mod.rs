//! Doubao (Volcengine) streaming TTS response decoder.
//!
//! The Doubao HTTP streaming endpoint answers with newline-delimited JSON.
//! Each line carries a status `code` and, for continuation frames, a Base64
//! audio fragment. This module turns such a body into one playable buffer.
//!
//! # Architecture
//!
//! ```text
//! decode_response / decode_stream
//!     │
//!     └── ParseSession
//!             │
//!             ├── LineSplitter (fragmentation-safe line framing)
//!             ├── classify (JSON line → Frame)
//!             ├── decode_payload (Base64 → Bytes)
//!             └── merge_chunks (WAV header repair)
//! ```
//!
//! The module is organized into:
//! - **config**: protocol constants and `DecoderSettings`
//! - **messages**: `Frame` and `AudioPayload`, plus the line classifier
//! - **splitter**: `LineSplitter`
//! - **audio**: Base64 payload decoding
//! - **wav**: WAV sub-chunk scan, merge and inspection
//! - **session**: `ParseSession`, the per-request state machine
//! - **stream**: async drivers over byte streams and `reqwest` responses
//! - **error**: `DecodeError`
//!
//! # Status Codes
//!
//! | Code | Meaning |
//! |------|---------|
//! | `0` | Continuation, may carry audio |
//! | `20000000` | Synthesis complete |
//! | other `> 0` | Provider error, ends the stream |
//!
//! # Example
//!
//! ```rust
//! use doubao_stream::core::tts::doubao::{DecoderSettings, ParseSession};
//!
//! let mut session = ParseSession::new(&DecoderSettings::default());
//! session.feed(b"{\"code\":0,\"data\":\"AAECAwQFBgcICQoLDA0ODxAREhMUFRYXGBkaGxwdHh8=\"}\n").unwrap();
//! session.feed(b"{\"code\":20000000}\n").unwrap();
//!
//! let audio = session.finalize().unwrap();
//! assert_eq!(audio.len(), 32);
//! ```

mod audio;
mod config;
mod error;
mod messages;
mod session;
mod splitter;
mod stream;
mod wav;

#[cfg(test)]
mod tests;

pub use audio::decode_payload;
pub use config::{
    CONTINUATION_CODE, DEFAULT_MAX_LINE_BYTES, DEFAULT_MIN_CHUNK_SIZE, DecoderSettings,
    MIN_MAX_LINE_BYTES, TERMINAL_CODE,
};
pub use error::{DecodeError, DecodeResult};
pub use messages::{AudioPayload, Frame, classify};
pub use session::{ParseSession, SessionState, SessionStats};
pub use splitter::LineSplitter;
pub use stream::{decode_response, decode_stream};
pub use wav::{
    CANONICAL_HEADER_SIZE, WavSummary, describe as describe_wav, find_data_offset, is_riff,
    merge_chunks,
};
