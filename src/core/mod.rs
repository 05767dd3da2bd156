pub mod tts;

// Re-export commonly used types for convenience
pub use tts::doubao::{
    AudioPayload, DecodeError, DecodeResult, DecoderSettings, Frame, ParseSession, SessionState,
    SessionStats, decode_response, decode_stream,
};
