//! Base64 decoding of continuation-frame audio.

use std::borrow::Cow;

use base64::{
    Engine, alphabet,
    engine::{GeneralPurpose, GeneralPurposeConfig},
};
use bytes::Bytes;
use tracing::{debug, warn};

use super::messages::AudioPayload;

/// Standard alphabet that tolerates non-zero bits after the last symbol.
const LENIENT_BASE64: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new().with_decode_allow_trailing_bits(true),
);

/// Decode the audio carried by a continuation frame.
///
/// ASCII whitespace is removed and missing trailing `=` padding is restored
/// before decoding. Returns `None` for undecodable or empty payloads; the
/// caller keeps reading the stream.
pub fn decode_payload(payload: &AudioPayload) -> Option<Bytes> {
    let encoded = strip_whitespace(payload.as_base64());
    let padded = pad_base64(&encoded);
    if padded.len() != encoded.len() {
        debug!(
            original_len = encoded.len(),
            padded_len = padded.len(),
            "Restored Base64 padding"
        );
    }

    match LENIENT_BASE64.decode(padded.as_bytes()) {
        Ok(decoded) if decoded.is_empty() => {
            warn!("Base64 payload decoded to zero bytes");
            None
        }
        Ok(decoded) => Some(Bytes::from(decoded)),
        Err(e) => {
            warn!(error = %e, base64_len = encoded.len(), "Failed to decode audio payload");
            None
        }
    }
}

fn strip_whitespace(encoded: &str) -> Cow<'_, str> {
    if encoded.bytes().any(|b| b.is_ascii_whitespace()) {
        Cow::Owned(encoded.chars().filter(|c| !c.is_ascii_whitespace()).collect())
    } else {
        Cow::Borrowed(encoded)
    }
}

/// Pad to a multiple of four characters.
fn pad_base64(encoded: &str) -> Cow<'_, str> {
    match encoded.len() % 4 {
        0 => Cow::Borrowed(encoded),
        rem => {
            let missing = 4 - rem;
            let mut padded = String::with_capacity(encoded.len() + missing);
            padded.push_str(encoded);
            padded.extend(std::iter::repeat_n('=', missing));
            Cow::Owned(padded)
        }
    }
}
