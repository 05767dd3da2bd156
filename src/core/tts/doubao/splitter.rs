//! Line framing for the newline-delimited response body.
//!
//! Network chunks arrive at arbitrary byte boundaries. `LineSplitter` buffers
//! the bytes of an unfinished line and only emits lines once their `\n` has
//! arrived, so the emitted lines do not depend on how the body was fragmented.

use bytes::BytesMut;
use tracing::warn;

/// Splits a byte stream into trimmed, non-empty UTF-8 lines.
#[derive(Debug)]
pub struct LineSplitter {
    /// Bytes of the current partial line.
    buffer: BytesMut,
    /// Prefix of `buffer` already known to contain no `\n`.
    scanned: usize,
    max_line_bytes: usize,
    /// Set while skipping the tail of an oversized line.
    discarding: bool,
    dropped_lines: usize,
}

impl LineSplitter {
    /// Create a splitter that drops lines longer than `max_line_bytes`.
    pub fn new(max_line_bytes: usize) -> Self {
        Self {
            buffer: BytesMut::new(),
            scanned: 0,
            max_line_bytes,
            discarding: false,
            dropped_lines: 0,
        }
    }

    /// Append a chunk and return every line it completes.
    pub fn push(&mut self, chunk: &[u8]) -> Vec<String> {
        let mut lines = Vec::new();
        self.buffer.extend_from_slice(chunk);

        loop {
            let Some(newline) = self.buffer[self.scanned..]
                .iter()
                .position(|&b| b == b'\n')
            else {
                break;
            };
            let end = self.scanned + newline;
            let line = self.buffer.split_to(end + 1);
            self.scanned = 0;

            if self.discarding {
                self.discarding = false;
                continue;
            }

            let content = &line[..end];
            if content.len() > self.max_line_bytes {
                self.drop_line(content.len());
                continue;
            }

            if let Some(text) = decode_line(content) {
                lines.push(text);
            }
        }
        self.scanned = self.buffer.len();

        if self.buffer.len() > self.max_line_bytes {
            if !self.discarding {
                self.drop_line(self.buffer.len());
            }
            self.buffer.clear();
            self.scanned = 0;
            self.discarding = true;
        }

        lines
    }

    /// Take the residual bytes as a final line, if any.
    pub fn finish(&mut self) -> Option<String> {
        self.scanned = 0;
        if std::mem::take(&mut self.discarding) {
            self.buffer.clear();
            return None;
        }

        let residual = self.buffer.split();
        decode_line(&residual)
    }

    /// Number of bytes waiting for a line terminator.
    pub fn buffered_len(&self) -> usize {
        self.buffer.len()
    }

    /// Number of lines dropped for exceeding the length limit.
    pub fn dropped_lines(&self) -> usize {
        self.dropped_lines
    }

    fn drop_line(&mut self, len: usize) {
        self.dropped_lines += 1;
        warn!(
            line_len = len,
            max_line_bytes = self.max_line_bytes,
            "Dropping oversized line"
        );
    }
}

/// Lossy UTF-8 decode and trim; `None` for blank lines.
fn decode_line(bytes: &[u8]) -> Option<String> {
    let text = String::from_utf8_lossy(bytes);
    let trimmed = text.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_owned())
    }
}
