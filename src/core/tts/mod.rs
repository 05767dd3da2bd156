//! Text-to-speech response decoders.
//!
//! # Supported Providers
//!
//! - `doubao` - Doubao (Volcengine) HTTP streaming TTS, newline-delimited JSON with Base64 audio

pub mod doubao;

pub use doubao::{DecodeError, DecodeResult, DecoderSettings, ParseSession, decode_response};
