//! Response Test Fixtures
//!
//! Builders for newline-delimited JSON bodies shaped like the Doubao
//! streaming endpoint's output.

use base64::{Engine, engine::general_purpose::STANDARD as BASE64};
use serde_json::json;

use super::audio_fixtures::streaming_wav_header;

/// Terminal frame with usage metadata
pub const TERMINAL_FRAME: &str =
    "{\"code\":20000000,\"message\":\"OK\",\"usage\":{\"text_words\":12}}\n";

/// Continuation frame carrying `audio` as a plain Base64 string
pub fn audio_frame(audio: &[u8]) -> String {
    format!("{}\n", json!({"code": 0, "message": "", "data": BASE64.encode(audio)}))
}

/// Continuation frame carrying `audio` under `data.audio`
pub fn nested_audio_frame(audio: &[u8]) -> String {
    format!(
        "{}\n",
        json!({"code": 0, "data": {"audio": BASE64.encode(audio)}})
    )
}

/// Continuation frame with sentence metadata and no audio
pub fn sentence_frame(text: &str) -> String {
    format!(
        "{}\n",
        json!({"code": 0, "sentence": {"text": text, "words": []}})
    )
}

/// Error frame
pub fn error_frame(code: i64, message: &str) -> String {
    format!("{}\n", json!({"code": code, "message": message}))
}

/// A full WAV response: header plus the first PCM slice, then the rest of
/// the PCM in `chunk_bytes` slices, interleaved with sentence frames, then
/// the terminal frame.
pub fn wav_response_body(pcm: &[u8], chunk_bytes: usize) -> String {
    let mut slices = pcm.chunks(chunk_bytes);
    let mut body = String::new();

    let mut first = streaming_wav_header();
    first.extend_from_slice(slices.next().unwrap_or_default());
    body.push_str(&audio_frame(&first));
    body.push_str(&sentence_frame("你好，欢迎使用豆包语音合成。"));

    for slice in slices {
        body.push_str(&audio_frame(slice));
    }

    body.push_str(TERMINAL_FRAME);
    body
}
