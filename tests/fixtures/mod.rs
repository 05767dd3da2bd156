//! Test Fixtures Module
//!
//! This module provides test fixtures for doubao-stream testing:
//! - Audio fixtures (programmatically generated PCM and WAV headers)
//! - Response fixtures (newline-delimited JSON frames)

// Allow dead code in test fixtures - not every test binary uses every helper
#![allow(dead_code)]

pub mod audio_fixtures;
pub mod response_fixtures;

pub use audio_fixtures::*;
pub use response_fixtures::*;
