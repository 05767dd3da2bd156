//! Reassembly of streamed WAV audio.
//!
//! When WAV output is requested, Doubao streams one RIFF file in pieces:
//!
//! 1. The first chunk carries the full header, sometimes with extra metadata
//!    chunks (`LIST`/`INFO`) so `data` is not at the canonical 44 byte offset.
//!    Its size fields hold a streaming placeholder (often `0xFFFFFFFF`).
//! 2. Later chunks are raw PCM, occasionally prefixed by a repeated header.
//!
//! [`merge_chunks`] keeps the first header, strips repeated headers, joins the
//! PCM and rewrites both size fields. Payloads that do not start with `RIFF`
//! (MP3, Ogg, PCM) are concatenated untouched.

use std::io::Cursor;

use bytes::{Bytes, BytesMut};
use tracing::{debug, info, warn};

/// RIFF container magic.
pub const RIFF_MAGIC: &[u8; 4] = b"RIFF";

/// Sub-chunk id holding the samples.
pub const DATA_CHUNK_ID: &[u8; 4] = b"data";

/// Size of a header with only `fmt ` and `data` sub-chunks.
pub const CANONICAL_HEADER_SIZE: usize = 44;

/// First sub-chunk follows `RIFF`, the RIFF size and `WAVE`.
const FIRST_SUBCHUNK_OFFSET: usize = 12;

/// Offset of the RIFF chunk size field.
const RIFF_SIZE_OFFSET: usize = 4;

/// Sub-chunk id plus size field.
const SUBCHUNK_HEADER_SIZE: usize = 8;

/// Returns true if the buffer starts with the RIFF magic.
#[inline]
pub fn is_riff(chunk: &[u8]) -> bool {
    chunk.starts_with(RIFF_MAGIC)
}

/// Offset of the first sample byte, i.e. the byte after the `data` size field.
///
/// Walks the sub-chunks starting at offset 12, honoring the RIFF rule that
/// odd-sized chunks are followed by one pad byte. Returns `None` when no
/// `data` sub-chunk header fits in the buffer.
pub fn find_data_offset(chunk: &[u8]) -> Option<usize> {
    let mut pos = FIRST_SUBCHUNK_OFFSET;

    loop {
        let header_end = pos.checked_add(SUBCHUNK_HEADER_SIZE)?;
        if header_end > chunk.len() {
            return None;
        }

        if &chunk[pos..pos + 4] == DATA_CHUNK_ID {
            return Some(header_end);
        }

        let size = read_u32_le(chunk, pos + 4) as usize;
        let padded = size.checked_add(size & 1)?;
        pos = header_end.checked_add(padded)?;
    }
}

/// Header length to strip from a later chunk, if it carries one.
///
/// A `RIFF`-prefixed chunk without a `data` sub-chunk is only treated as a
/// header when it is longer than the canonical 44 bytes; shorter ones are
/// sample data that happens to start with the magic.
fn repeated_header_len(chunk: &[u8]) -> Option<usize> {
    if !is_riff(chunk) {
        return None;
    }
    match find_data_offset(chunk) {
        Some(offset) => Some(offset),
        None if chunk.len() > CANONICAL_HEADER_SIZE => Some(CANONICAL_HEADER_SIZE),
        None => None,
    }
}

/// Merge decoded audio chunks into one file.
///
/// See the module documentation for the WAV rules. An empty slice yields an
/// empty buffer.
pub fn merge_chunks(chunks: &[Bytes]) -> Bytes {
    let Some((first, rest)) = chunks.split_first() else {
        return Bytes::new();
    };

    if !is_riff(first) {
        return concat(chunks);
    }

    let data_offset = match find_data_offset(first) {
        Some(offset) => offset,
        None if first.len() >= CANONICAL_HEADER_SIZE => {
            debug!("No data sub-chunk found, assuming canonical 44 byte header");
            CANONICAL_HEADER_SIZE
        }
        None => {
            warn!(
                first_chunk_len = first.len(),
                "Truncated RIFF header, passing audio through unmodified"
            );
            return concat(chunks);
        }
    };
    debug!(data_offset, "WAV data sub-chunk located");

    let total: usize = chunks.iter().map(Bytes::len).sum();
    let mut merged = BytesMut::with_capacity(total);
    merged.extend_from_slice(first);

    let mut skipped_headers = 0usize;
    for chunk in rest {
        match repeated_header_len(chunk) {
            Some(offset) => {
                merged.extend_from_slice(&chunk[offset..]);
                skipped_headers += 1;
            }
            None => merged.extend_from_slice(chunk),
        }
    }

    let payload_len = merged.len() - data_offset;
    write_u32_le(
        &mut merged,
        RIFF_SIZE_OFFSET,
        saturating_u32(data_offset - 8 + payload_len),
    );
    write_u32_le(&mut merged, data_offset - 4, saturating_u32(payload_len));

    info!(
        header_len = data_offset,
        payload_len,
        skipped_headers,
        "WAV stream merged"
    );

    merged.freeze()
}

// =============================================================================
// Inspection
// =============================================================================

/// Format summary of a complete WAV buffer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WavSummary {
    pub channels: u16,
    pub sample_rate: u32,
    pub bits_per_sample: u16,
    /// Sample frames per channel.
    pub frames: u32,
    pub duration_secs: f64,
}

/// Parse the header of a WAV buffer with `hound`.
///
/// Returns `None` for non-WAV payloads or headers `hound` rejects.
pub fn describe(audio: &[u8]) -> Option<WavSummary> {
    if !is_riff(audio) {
        return None;
    }

    let reader = match hound::WavReader::new(Cursor::new(audio)) {
        Ok(reader) => reader,
        Err(e) => {
            debug!(error = %e, "Unable to parse WAV header");
            return None;
        }
    };

    let spec = reader.spec();
    let frames = reader.duration();
    let duration_secs = if spec.sample_rate > 0 {
        f64::from(frames) / f64::from(spec.sample_rate)
    } else {
        0.0
    };

    Some(WavSummary {
        channels: spec.channels,
        sample_rate: spec.sample_rate,
        bits_per_sample: spec.bits_per_sample,
        frames,
        duration_secs,
    })
}

// =============================================================================
// Helpers
// =============================================================================

fn concat(chunks: &[Bytes]) -> Bytes {
    if let [single] = chunks {
        return single.clone();
    }

    let total = chunks.iter().map(Bytes::len).sum();
    let mut out = BytesMut::with_capacity(total);
    for chunk in chunks {
        out.extend_from_slice(chunk);
    }
    out.freeze()
}

fn read_u32_le(buf: &[u8], at: usize) -> u32 {
    let mut field = [0u8; 4];
    field.copy_from_slice(&buf[at..at + 4]);
    u32::from_le_bytes(field)
}

fn write_u32_le(buf: &mut [u8], at: usize, value: u32) {
    buf[at..at + 4].copy_from_slice(&value.to_le_bytes());
}

#[inline]
fn saturating_u32(value: usize) -> u32 {
    u32::try_from(value).unwrap_or(u32::MAX)
}
