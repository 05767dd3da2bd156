//! Frame types of the Doubao streaming response.
//!
//! Every line of the response body is one JSON object:
//!
//! ```json
//! {"code": 0, "data": "UklGR..."}
//! {"code": 0, "sentence": {"text": "你好"}}
//! {"code": 20000000, "message": "OK", "usage": {"text_words": 2}}
//! {"code": 45000002, "message": "bad request"}
//! ```
//!
//! | `code` | Frame |
//! |--------|-------|
//! | `0` | [`Frame::Continuation`] |
//! | `20000000` | [`Frame::Terminal`] |
//! | other `> 0` | [`Frame::Error`] |
//! | anything else | [`Frame::Unrecognized`] |
//!
//! The audio payload is not uniform across frames: it may be a plain Base64
//! string or an object exposing the string under `audio`. [`AudioPayload`]
//! resolves the shape once, at classification time.

use serde_json::{Map, Value};
use tracing::debug;

use super::config::{CONTINUATION_CODE, TERMINAL_CODE};

/// Keys that may carry the audio payload, in lookup order.
const PAYLOAD_KEYS: [&str; 2] = ["data", "audio"];

// =============================================================================
// AudioPayload
// =============================================================================

/// Base64 audio carried by a continuation frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AudioPayload {
    /// `"data": "<base64>"`
    Plain(String),
    /// `"data": {"audio": "<base64>"}`
    Nested {
        /// Base64 encoded audio.
        audio: String,
    },
}

impl AudioPayload {
    /// Returns the Base64 text regardless of the payload shape.
    pub fn as_base64(&self) -> &str {
        match self {
            Self::Plain(encoded) => encoded,
            Self::Nested { audio } => audio,
        }
    }

    /// Resolves a payload field. Empty strings and other JSON types mean "no payload".
    fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::String(encoded) if !encoded.is_empty() => Some(Self::Plain(encoded)),
            Value::Object(mut map) => match map.remove("audio") {
                Some(Value::String(audio)) if !audio.is_empty() => Some(Self::Nested { audio }),
                _ => None,
            },
            _ => None,
        }
    }
}

// =============================================================================
// Frame
// =============================================================================

/// A classified line of the response stream.
#[derive(Debug, Clone, PartialEq)]
pub enum Frame {
    /// `code == 0`: more data may follow.
    Continuation {
        /// Audio payload, if the frame carries one.
        audio: Option<AudioPayload>,
        /// Text alignment metadata; informational only.
        sentence: Option<Value>,
    },
    /// `code == 20000000`: upstream generation is complete.
    Terminal {
        /// Accounting metadata.
        usage: Option<Value>,
    },
    /// Any other positive code.
    Error {
        /// Upstream status code.
        code: i64,
        /// Human-readable description.
        message: String,
    },
    /// Not JSON, not an object, no integer `code`, or an unknown code.
    Unrecognized,
}

impl Frame {
    /// Short name used in log events.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Continuation { .. } => "continuation",
            Self::Terminal { .. } => "terminal",
            Self::Error { .. } => "error",
            Self::Unrecognized => "unrecognized",
        }
    }
}

/// Classify one trimmed, non-empty line.
///
/// Never fails: anything that cannot be interpreted is `Frame::Unrecognized`
/// and is logged at debug level.
pub fn classify(line: &str) -> Frame {
    let mut object = match serde_json::from_str::<Value>(line) {
        Ok(Value::Object(object)) => object,
        Ok(other) => {
            debug!(json_type = json_type(&other), "Ignoring non-object JSON line");
            return Frame::Unrecognized;
        }
        Err(e) => {
            debug!(error = %e, line_len = line.len(), "Ignoring malformed JSON line");
            return Frame::Unrecognized;
        }
    };

    let Some(code) = object.get("code").and_then(Value::as_i64) else {
        debug!("Ignoring frame without an integer code");
        return Frame::Unrecognized;
    };

    match code {
        CONTINUATION_CODE => Frame::Continuation {
            audio: take_payload(&mut object),
            sentence: object.remove("sentence").filter(|s| !s.is_null()),
        },
        TERMINAL_CODE => Frame::Terminal {
            usage: object.remove("usage").filter(|u| !u.is_null()),
        },
        code if code > 0 => {
            let message = object
                .get("message")
                .and_then(Value::as_str)
                .filter(|m| !m.is_empty())
                .map(str::to_owned)
                .unwrap_or_else(|| format!("unknown error (code={code})"));
            Frame::Error { code, message }
        }
        code => {
            debug!(code, "Ignoring frame with unrecognized status code");
            Frame::Unrecognized
        }
    }
}

fn take_payload(object: &mut Map<String, Value>) -> Option<AudioPayload> {
    PAYLOAD_KEYS
        .iter()
        .find_map(|key| object.remove(*key).and_then(AudioPayload::from_value))
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
