//! Audio Test Fixtures
//!
//! Programmatically generated audio keeps the tests free of binary files.
//!
//! Audio formats:
//! - Sample rate: 24kHz (Doubao's default output rate)
//! - Bit depth: 16-bit signed PCM
//! - Channels: Mono

use std::f32::consts::PI;

/// Sample rate used by every fixture
pub const SAMPLE_RATE: u32 = 24000;

/// 100ms at 24kHz
pub const MS_100: usize = 2400;

/// Size of a WAV header with only `fmt ` and `data`
pub const WAV_HEADER_LEN: usize = 44;

/// Generate a sine wave tone
pub fn generate_sine_wave(duration_samples: usize, frequency: f32, amplitude: f32) -> Vec<i16> {
    let max_amplitude = amplitude * i16::MAX as f32;
    let angular_freq = 2.0 * PI * frequency / SAMPLE_RATE as f32;

    (0..duration_samples)
        .map(|i| {
            let sample = (angular_freq * i as f32).sin() * max_amplitude;
            sample as i16
        })
        .collect()
}

/// Generate a sine wave as raw little-endian bytes
pub fn generate_sine_wave_bytes(
    duration_samples: usize,
    frequency: f32,
    amplitude: f32,
) -> Vec<u8> {
    samples_to_bytes(&generate_sine_wave(duration_samples, frequency, amplitude))
}

/// Convert i16 samples to bytes (little-endian)
pub fn samples_to_bytes(samples: &[i16]) -> Vec<u8> {
    samples.iter().flat_map(|s| s.to_le_bytes()).collect()
}

/// WAV header as sent at the start of a stream, with `0xFFFFFFFF` size placeholders
pub fn streaming_wav_header() -> Vec<u8> {
    wav_header(u32::MAX, u32::MAX)
}

/// Mono 16-bit WAV header with explicit size fields
pub fn wav_header(riff_size: u32, data_size: u32) -> Vec<u8> {
    let mut header = Vec::with_capacity(WAV_HEADER_LEN);
    header.extend_from_slice(b"RIFF");
    header.extend_from_slice(&riff_size.to_le_bytes());
    header.extend_from_slice(b"WAVE");
    header.extend_from_slice(b"fmt ");
    header.extend_from_slice(&16u32.to_le_bytes());
    header.extend_from_slice(&1u16.to_le_bytes()); // PCM
    header.extend_from_slice(&1u16.to_le_bytes()); // mono
    header.extend_from_slice(&SAMPLE_RATE.to_le_bytes());
    header.extend_from_slice(&(SAMPLE_RATE * 2).to_le_bytes());
    header.extend_from_slice(&2u16.to_le_bytes());
    header.extend_from_slice(&16u16.to_le_bytes());
    header.extend_from_slice(b"data");
    header.extend_from_slice(&data_size.to_le_bytes());
    header
}

/// Read a little-endian u32 at `offset`
pub fn read_u32_le(buf: &[u8], offset: usize) -> u32 {
    u32::from_le_bytes([
        buf[offset],
        buf[offset + 1],
        buf[offset + 2],
        buf[offset + 3],
    ])
}
