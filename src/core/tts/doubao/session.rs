//! Per-request decoding state.
//!
//! A [`ParseSession`] is fed raw body chunks as they arrive and turned into a
//! single audio buffer by [`ParseSession::finalize`]:
//!
//! ```text
//! feed(chunk) ──► LineSplitter ──► classify ──► decode_payload ──► audio_chunks
//!                                     │
//!                                     ├── Terminal ──► terminated, usage
//!                                     └── Error ─────► error (early exit)
//!
//! finalize() ──► residual line ──► checks ──► merge_chunks ──► Bytes
//! ```
//!
//! The session does no I/O and is not shared between tasks. It is created once
//! per request and consumed by `finalize`.

use bytes::Bytes;
use serde_json::Value;
use tracing::{debug, error, info, warn};

use super::audio::decode_payload;
use super::config::{DecoderSettings, MIN_MAX_LINE_BYTES};
use super::error::{DecodeError, DecodeResult};
use super::messages::{Frame, classify};
use super::splitter::LineSplitter;
use super::wav::merge_chunks;

/// Lifecycle of a session before it is finalized.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Accepting frames.
    Streaming,
    /// The terminal frame was seen; later input is ignored.
    Terminated,
    /// An error frame was seen; later input is ignored.
    Failed,
}

/// Counters describing the input consumed so far.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionStats {
    /// Raw bytes passed to `feed`, including bytes ignored after close.
    pub bytes_received: u64,
    /// Non-empty lines classified.
    pub lines: usize,
    /// Audio chunks decoded.
    pub audio_chunks: usize,
    /// Total decoded audio bytes.
    pub audio_bytes: usize,
    /// Lines dropped for exceeding `max_line_bytes`.
    pub dropped_lines: usize,
}

/// Streaming decoder for one Doubao TTS response.
#[derive(Debug)]
pub struct ParseSession {
    label: String,
    min_chunk_size: usize,
    splitter: LineSplitter,
    audio_chunks: Vec<Bytes>,
    total_bytes: u64,
    line_count: usize,
    terminated: bool,
    error: Option<DecodeError>,
    usage: Option<Value>,
}

impl Default for ParseSession {
    fn default() -> Self {
        Self::new(&DecoderSettings::default())
    }
}

impl ParseSession {
    /// Settings are not validated here; a `max_line_bytes` below
    /// [`MIN_MAX_LINE_BYTES`] is raised to it.
    pub fn new(settings: &DecoderSettings) -> Self {
        if settings.max_line_bytes < MIN_MAX_LINE_BYTES {
            warn!(
                session = %settings.label,
                max_line_bytes = settings.max_line_bytes,
                minimum = MIN_MAX_LINE_BYTES,
                "Line limit below minimum, raising it"
            );
        }

        Self {
            label: settings.label.clone(),
            min_chunk_size: settings.min_chunk_size,
            splitter: LineSplitter::new(settings.max_line_bytes.max(MIN_MAX_LINE_BYTES)),
            audio_chunks: Vec::new(),
            total_bytes: 0,
            line_count: 0,
            terminated: false,
            error: None,
            usage: None,
        }
    }

    /// Consume a chunk of the response body.
    ///
    /// Returns `Err(DecodeError::Provider)` once an error frame has been seen,
    /// on this call and every later one, so callers can stop reading. After
    /// the terminal frame input is counted but otherwise ignored.
    pub fn feed(&mut self, chunk: &[u8]) -> DecodeResult<()> {
        self.total_bytes += chunk.len() as u64;

        if self.is_closed() {
            return self.status();
        }

        for line in self.splitter.push(chunk) {
            self.process_line(&line);
            if self.is_closed() {
                break;
            }
        }

        self.status()
    }

    /// Flush the residual line and assemble the collected audio.
    pub fn finalize(mut self) -> DecodeResult<Bytes> {
        if !self.is_closed() {
            if let Some(line) = self.splitter.finish() {
                self.process_line(&line);
            }
        }

        info!(
            session = %self.label,
            lines = self.line_count,
            chunks = self.audio_chunks.len(),
            bytes_received = self.total_bytes,
            terminated = self.terminated,
            "Doubao stream finished"
        );

        if let Some(err) = self.error.take() {
            return Err(err);
        }

        if self.total_bytes == 0 {
            warn!(session = %self.label, "No response data received");
            return Err(DecodeError::EmptyStream);
        }

        if self.audio_chunks.is_empty() {
            warn!(
                session = %self.label,
                bytes_received = self.total_bytes,
                "No audio chunks decoded from response"
            );
            return Err(DecodeError::NoAudio {
                bytes_received: self.total_bytes,
            });
        }

        let sizes: Vec<usize> = self.audio_chunks.iter().map(Bytes::len).collect();
        let min_chunk_size = self.min_chunk_size;
        let valid: Vec<Bytes> = self
            .audio_chunks
            .into_iter()
            .filter(|chunk| chunk.len() >= min_chunk_size)
            .collect();

        if valid.is_empty() {
            error!(
                session = %self.label,
                chunks = sizes.len(),
                ?sizes,
                min_chunk_size,
                "All audio chunks are below the minimum size"
            );
            return Err(DecodeError::CorruptPayload {
                chunks: sizes.len(),
                sizes,
            });
        }

        let discarded = sizes.len() - valid.len();
        if discarded > 0 {
            warn!(
                session = %self.label,
                discarded,
                min_chunk_size,
                "Discarded undersized audio chunks"
            );
        }

        if !self.terminated {
            warn!(
                session = %self.label,
                "Stream ended without a terminal frame, returning collected audio"
            );
        }

        Ok(merge_chunks(&valid))
    }

    /// Usage metadata of the terminal frame, if one was received.
    pub fn usage(&self) -> Option<&Value> {
        self.usage.as_ref()
    }

    pub fn state(&self) -> SessionState {
        if self.error.is_some() {
            SessionState::Failed
        } else if self.terminated {
            SessionState::Terminated
        } else {
            SessionState::Streaming
        }
    }

    pub fn stats(&self) -> SessionStats {
        SessionStats {
            bytes_received: self.total_bytes,
            lines: self.line_count,
            audio_chunks: self.audio_chunks.len(),
            audio_bytes: self.audio_chunks.iter().map(Bytes::len).sum(),
            dropped_lines: self.splitter.dropped_lines(),
        }
    }

    /// True once the terminal frame has been seen.
    pub fn is_terminated(&self) -> bool {
        self.terminated
    }

    /// True once the session stopped accepting frames.
    pub fn is_closed(&self) -> bool {
        self.terminated || self.error.is_some()
    }

    fn status(&self) -> DecodeResult<()> {
        match &self.error {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }

    fn process_line(&mut self, line: &str) {
        self.line_count += 1;
        let frame = classify(line);
        debug!(
            session = %self.label,
            line = self.line_count,
            kind = frame.kind(),
            "Frame received"
        );

        match frame {
            Frame::Continuation { audio, sentence } => {
                if let Some(sentence) = sentence {
                    debug!(session = %self.label, %sentence, "Sentence metadata");
                }

                let Some(payload) = audio else {
                    return;
                };

                if let Some(decoded) = decode_payload(&payload) {
                    debug!(
                        session = %self.label,
                        chunk = self.audio_chunks.len(),
                        len = decoded.len(),
                        "Audio chunk decoded"
                    );
                    self.audio_chunks.push(decoded);
                }
            }
            Frame::Terminal { usage } => {
                info!(
                    session = %self.label,
                    chunks = self.audio_chunks.len(),
                    "Received terminal frame"
                );
                self.terminated = true;
                self.usage = usage;
            }
            Frame::Error { code, message } => {
                error!(session = %self.label, code, %message, "Doubao TTS API error frame");
                self.error = Some(DecodeError::Provider { code, message });
            }
            Frame::Unrecognized => {}
        }
    }
}
