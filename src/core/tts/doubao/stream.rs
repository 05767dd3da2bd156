//! Async drivers feeding a [`ParseSession`] from a byte stream.

use std::fmt::Display;
use std::pin::pin;

use bytes::Bytes;
use futures_util::{Stream, StreamExt};
use tracing::{debug, error, warn};

use super::config::DecoderSettings;
use super::error::{DecodeError, DecodeResult};
use super::session::ParseSession;

/// Longest error body kept in `DecodeError::HttpStatus`, in characters.
const MAX_ERROR_BODY_CHARS: usize = 100;

/// Decode a complete response body delivered as a stream of chunks.
///
/// Stops reading as soon as an error or terminal frame is seen. Stream
/// errors become `DecodeError::Transport`.
pub async fn decode_stream<S, B, E>(stream: S, settings: &DecoderSettings) -> DecodeResult<Bytes>
where
    S: Stream<Item = Result<B, E>>,
    B: AsRef<[u8]>,
    E: Display,
{
    let mut stream = pin!(stream);
    let mut session = ParseSession::new(settings);

    while let Some(item) = stream.next().await {
        let chunk = item.map_err(|e| {
            warn!(session = %settings.label, error = %e, "Failed to read response body");
            DecodeError::Transport(e.to_string())
        })?;

        session.feed(chunk.as_ref())?;

        if session.is_terminated() {
            debug!(session = %settings.label, "Terminal frame received, stop reading");
            break;
        }
    }

    session.finalize()
}

/// Decode an HTTP response from the Doubao streaming endpoint.
///
/// Non-2xx responses are rejected with their (truncated) body before any
/// decoding takes place.
pub async fn decode_response(
    response: reqwest::Response,
    settings: &DecoderSettings,
) -> DecodeResult<Bytes> {
    let status = response.status();
    if !status.is_success() {
        let error_text = response.text().await.unwrap_or_default();
        let body: String = error_text.chars().take(MAX_ERROR_BODY_CHARS).collect();
        error!(
            session = %settings.label,
            status = %status,
            body = %body,
            "Doubao TTS API returned error status"
        );
        return Err(DecodeError::HttpStatus {
            status: status.as_u16(),
            body,
        });
    }

    decode_stream(response.bytes_stream(), settings).await
}
