//! Session-level tests for the Doubao decoder.

use base64::{Engine, engine::general_purpose::STANDARD as BASE64};
use bytes::Bytes;
use serde_json::json;

use super::*;

// =============================================================================
// Helpers
// =============================================================================

/// 24 kHz mono 16-bit WAV header with the given size fields.
fn wav_header(riff_size: u32, data_size: u32) -> Vec<u8> {
    let mut wav = Vec::with_capacity(CANONICAL_HEADER_SIZE);
    wav.extend_from_slice(b"RIFF");
    wav.extend_from_slice(&riff_size.to_le_bytes());
    wav.extend_from_slice(b"WAVEfmt ");
    wav.extend_from_slice(&16u32.to_le_bytes());
    wav.extend_from_slice(&1u16.to_le_bytes());
    wav.extend_from_slice(&1u16.to_le_bytes());
    wav.extend_from_slice(&24000u32.to_le_bytes());
    wav.extend_from_slice(&48000u32.to_le_bytes());
    wav.extend_from_slice(&2u16.to_le_bytes());
    wav.extend_from_slice(&16u16.to_le_bytes());
    wav.extend_from_slice(b"data");
    wav.extend_from_slice(&data_size.to_le_bytes());
    wav
}

fn pcm(len: usize, seed: u8) -> Vec<u8> {
    (0..len).map(|i| seed.wrapping_add((i * 3) as u8)).collect()
}

fn audio_line(audio: &[u8]) -> String {
    format!("{{\"code\":0,\"data\":\"{}\"}}\n", BASE64.encode(audio))
}

fn u32_at(buf: &[u8], at: usize) -> u32 {
    u32::from_le_bytes([buf[at], buf[at + 1], buf[at + 2], buf[at + 3]])
}

fn decode_all(chunks: &[&[u8]]) -> DecodeResult<Bytes> {
    let mut session = ParseSession::default();
    for chunk in chunks {
        if session.feed(chunk).is_err() {
            break;
        }
    }
    session.finalize()
}

/// A realistic WAV response mixing every frame shape the provider sends.
fn mixed_wav_body() -> Vec<u8> {
    let mut first = wav_header(u32::MAX, u32::MAX);
    first.extend_from_slice(&pcm(120, 0));

    let unpadded = BASE64.encode(pcm(32, 50));
    let unpadded = unpadded.trim_end_matches('=');

    let mut body = String::new();
    body.push_str(&audio_line(&first));
    body.push_str("{\"code\":0,\"sentence\":{\"text\":\"你好，世界\",\"words\":[]}}\r\n");
    body.push_str("\r\n");
    body.push_str(&format!(
        "{{\"code\":0,\"data\":{{\"audio\":\"{}\"}}}}\n",
        BASE64.encode(pcm(64, 100))
    ));
    body.push_str("this is not json\n");
    body.push_str(&format!("{{\"code\":0,\"data\":\"{unpadded}\"}}\n"));
    body.push_str("{\"code\":20000000,\"message\":\"OK\",\"usage\":{\"text_words\":5}}\n");
    body.into_bytes()
}

// =============================================================================
// Fragmentation Invariance
// =============================================================================

#[test]
fn test_every_two_way_split_matches_single_feed() {
    let body = mixed_wav_body();
    let whole = decode_all(&[&body[..]]);
    assert!(whole.is_ok());

    for split in 0..=body.len() {
        let (head, tail) = body.split_at(split);
        assert_eq!(decode_all(&[head, tail]), whole, "split at {split}");
    }
}

#[test]
fn test_byte_at_a_time_matches_single_feed() {
    let body = mixed_wav_body();
    let whole = decode_all(&[&body[..]]);
    let bytes: Vec<&[u8]> = body.chunks(1).collect();
    assert_eq!(decode_all(&bytes), whole);
}

#[test]
fn test_uneven_chunking_matches_single_feed() {
    let body = mixed_wav_body();
    let whole = decode_all(&[&body[..]]);

    for size in [2, 3, 7, 13, 64, 257] {
        let chunks: Vec<&[u8]> = body.chunks(size).collect();
        assert_eq!(decode_all(&chunks), whole, "chunk size {size}");
    }
}

#[test]
fn test_error_stream_is_fragmentation_invariant() {
    let mut body = audio_line(&pcm(40, 1)).into_bytes();
    body.extend_from_slice(b"{\"code\":45000002,\"message\":\"bad request\"}\n");
    body.extend_from_slice(audio_line(&pcm(40, 2)).as_bytes());

    let whole = decode_all(&[&body[..]]);
    for split in 0..=body.len() {
        let (head, tail) = body.split_at(split);
        assert_eq!(decode_all(&[head, tail]), whole, "split at {split}");
    }
}

// =============================================================================
// WAV Reassembly
// =============================================================================

#[test]
fn test_wav_round_trip_patches_sizes() {
    let part1 = pcm(100, 0);
    let part2 = pcm(64, 7);
    let part3 = pcm(30, 9);

    let mut first = wav_header(u32::MAX, u32::MAX);
    first.extend_from_slice(&part1);

    let mut session = ParseSession::default();
    session.feed(audio_line(&first).as_bytes()).unwrap();
    session.feed(audio_line(&part2).as_bytes()).unwrap();
    session.feed(audio_line(&part3).as_bytes()).unwrap();
    session.feed(b"{\"code\":20000000}\n").unwrap();
    let audio = session.finalize().unwrap();

    let payload_len = (part1.len() + part2.len() + part3.len()) as u32;
    assert_eq!(u32_at(&audio, 4), 44 - 8 + payload_len);
    assert_eq!(u32_at(&audio, 40), payload_len);
    assert_eq!(audio.len(), 44 + payload_len as usize);

    let expected_payload = [part1, part2, part3].concat();
    assert_eq!(&audio[44..], &expected_payload[..]);
}

#[test]
fn test_mixed_body_produces_valid_wav() {
    let audio = decode_all(&[&mixed_wav_body()[..]]).unwrap();

    let summary = describe_wav(&audio).unwrap();
    assert_eq!(summary.sample_rate, 24000);
    assert_eq!(summary.channels, 1);
    // 120 + 64 + 32 payload bytes, 2 bytes per frame
    assert_eq!(u32_at(&audio, 40), 216);
    assert_eq!(summary.frames, 108);
}

#[test]
fn test_repeated_headers_are_stripped() {
    let mut first = wav_header(u32::MAX, u32::MAX);
    first.extend_from_slice(&pcm(32, 0));
    let mut second = wav_header(u32::MAX, u32::MAX);
    second.extend_from_slice(&pcm(32, 1));

    let body = format!("{}{}", audio_line(&first), audio_line(&second));
    let audio = decode_all(&[body.as_bytes()]).unwrap();

    assert_eq!(audio.len(), 44 + 64);
    assert_eq!(&audio[76..], &pcm(32, 1)[..]);
}

#[test]
fn test_non_wav_chunks_pass_through() {
    let frame1 = b"\xff\xf3\x44\xc4mpeg-audio-frame-one".to_vec();
    let frame2 = b"\xff\xf3\x44\xc4mpeg-audio-frame-two".to_vec();
    let body = format!(
        "{}{}{{\"code\":20000000}}\n",
        audio_line(&frame1),
        audio_line(&frame2)
    );

    let audio = decode_all(&[body.as_bytes()]).unwrap();
    assert_eq!(&audio[..], &[frame1, frame2].concat()[..]);
}

#[test]
fn test_single_well_formed_wav_is_returned_exactly() {
    let mut wav = wav_header(40, 4);
    wav.extend_from_slice(&[1, 2, 3, 4]);
    assert_eq!(wav.len(), 48);

    let mut session = ParseSession::default();
    session.feed(audio_line(&wav).as_bytes()).unwrap();
    session
        .feed(b"{\"code\":20000000,\"usage\":{\"chars\":3}}\n")
        .unwrap();

    assert_eq!(session.state(), SessionState::Terminated);
    assert_eq!(session.usage(), Some(&json!({"chars": 3})));

    let audio = session.finalize().unwrap();
    assert_eq!(&audio[..], &wav[..]);
}

// =============================================================================
// Error Handling
// =============================================================================

#[test]
fn test_error_frame_discards_collected_audio() {
    let mut session = ParseSession::default();
    session.feed(audio_line(&pcm(64, 0)).as_bytes()).unwrap();

    let err = session
        .feed(b"{\"code\":45000002,\"message\":\"bad request\"}\n")
        .unwrap_err();
    assert!(err.to_string().contains("bad request"));
    assert_eq!(session.state(), SessionState::Failed);

    let err = session.finalize().unwrap_err();
    assert_eq!(
        err,
        DecodeError::Provider {
            code: 45000002,
            message: "bad request".to_string(),
        }
    );
}

#[test]
fn test_feed_after_error_keeps_reporting_it() {
    let mut session = ParseSession::default();
    assert!(session.feed(b"{\"code\":50000001}\n").is_err());

    let err = session.feed(audio_line(&pcm(64, 0)).as_bytes()).unwrap_err();
    assert_eq!(
        err,
        DecodeError::Provider {
            code: 50000001,
            message: "unknown error (code=50000001)".to_string(),
        }
    );
    assert_eq!(session.stats().audio_chunks, 0);
}

#[test]
fn test_lines_after_error_in_same_chunk_are_ignored() {
    let body = format!(
        "{{\"code\":45000002,\"message\":\"bad request\"}}\n{}",
        audio_line(&pcm(64, 0))
    );
    let mut session = ParseSession::default();
    assert!(session.feed(body.as_bytes()).is_err());
    assert_eq!(session.stats().lines, 1);
    assert_eq!(session.stats().audio_chunks, 0);
}

#[test]
fn test_unterminated_error_frame_is_reported_at_finalize() {
    let mut session = ParseSession::default();
    session.feed(audio_line(&pcm(64, 0)).as_bytes()).unwrap();
    session
        .feed(b"{\"code\":45000002,\"message\":\"x\"}")
        .unwrap();
    assert_eq!(session.state(), SessionState::Streaming);

    let err = session.finalize().unwrap_err();
    assert_eq!(
        err,
        DecodeError::Provider {
            code: 45000002,
            message: "x".to_string(),
        }
    );
}

#[test]
fn test_empty_session_reports_empty_stream() {
    let session = ParseSession::default();
    assert_eq!(session.finalize().unwrap_err(), DecodeError::EmptyStream);
}

#[test]
fn test_empty_chunks_count_as_no_data() {
    let mut session = ParseSession::default();
    session.feed(b"").unwrap();
    assert_eq!(session.finalize().unwrap_err(), DecodeError::EmptyStream);
}

#[test]
fn test_stream_without_audio_reports_no_audio() {
    let body = b"{\"code\":0,\"sentence\":{\"text\":\"hi\"}}\n{\"code\":20000000}\n";
    let mut session = ParseSession::default();
    session.feed(body).unwrap();

    assert_eq!(
        session.finalize().unwrap_err(),
        DecodeError::NoAudio {
            bytes_received: body.len() as u64
        }
    );
}

#[test]
fn test_garbage_only_reports_no_audio() {
    let mut session = ParseSession::default();
    session.feed(b"<html>502 Bad Gateway</html>").unwrap();
    assert!(matches!(
        session.finalize(),
        Err(DecodeError::NoAudio { bytes_received: 28 })
    ));
}

#[test]
fn test_all_undersized_chunks_report_corrupt_payload() {
    let body = format!("{}{}", audio_line(&[1, 2, 3]), audio_line(&[4, 5, 6, 7, 8]));
    let err = decode_all(&[body.as_bytes()]).unwrap_err();
    assert_eq!(
        err,
        DecodeError::CorruptPayload {
            chunks: 2,
            sizes: vec![3, 5],
        }
    );
    assert!(!err.is_retryable());
}

#[test]
fn test_undersized_chunks_are_dropped_when_others_survive() {
    let body = format!(
        "{}{}{}",
        audio_line(&pcm(32, 0)),
        audio_line(&[9, 9, 9]),
        audio_line(&pcm(32, 1))
    );
    let audio = decode_all(&[body.as_bytes()]).unwrap();
    assert_eq!(&audio[..], &[pcm(32, 0), pcm(32, 1)].concat()[..]);
}

#[test]
fn test_min_chunk_size_is_configurable() {
    let settings = DecoderSettings::default().with_min_chunk_size(1);
    let mut session = ParseSession::new(&settings);
    session.feed(audio_line(&[1, 2, 3]).as_bytes()).unwrap();
    assert_eq!(&session.finalize().unwrap()[..], &[1, 2, 3]);
}

// =============================================================================
// Session Lifecycle
// =============================================================================

#[test]
fn test_missing_terminal_still_returns_audio() {
    let mut session = ParseSession::default();
    session.feed(audio_line(&pcm(40, 0)).as_bytes()).unwrap();
    assert_eq!(session.state(), SessionState::Streaming);
    assert_eq!(&session.finalize().unwrap()[..], &pcm(40, 0)[..]);
}

#[test]
fn test_residual_line_is_processed_at_finalize() {
    let line = audio_line(&pcm(40, 0));
    let unterminated = line.trim_end();

    let mut session = ParseSession::default();
    session.feed(unterminated.as_bytes()).unwrap();
    assert_eq!(session.stats().audio_chunks, 0);
    assert_eq!(&session.finalize().unwrap()[..], &pcm(40, 0)[..]);
}

#[test]
fn test_input_after_terminal_is_ignored() {
    let first = audio_line(&pcm(40, 0));
    let late = audio_line(&pcm(40, 1));

    let mut session = ParseSession::default();
    session.feed(first.as_bytes()).unwrap();
    session.feed(b"{\"code\":20000000}\n").unwrap();
    assert!(session.is_terminated());
    assert!(session.is_closed());

    session.feed(late.as_bytes()).unwrap();
    session.feed(b"{\"code\":45000002}\n").unwrap();

    let stats = session.stats();
    assert_eq!(stats.audio_chunks, 1);
    assert_eq!(stats.lines, 2);
    assert_eq!(
        stats.bytes_received,
        (first.len() + late.len() + 18 + 18) as u64
    );
    assert_eq!(&session.finalize().unwrap()[..], &pcm(40, 0)[..]);
}

#[test]
fn test_residual_after_terminal_is_not_processed() {
    let mut session = ParseSession::default();
    session.feed(audio_line(&pcm(40, 0)).as_bytes()).unwrap();
    session.feed(b"{\"code\":20000000}\n{\"code\":4500").unwrap();
    assert_eq!(&session.finalize().unwrap()[..], &pcm(40, 0)[..]);
}

#[test]
fn test_oversized_line_is_dropped() {
    let settings = DecoderSettings::default().with_max_line_bytes(MIN_MAX_LINE_BYTES);
    let mut session = ParseSession::new(&settings);

    session.feed(audio_line(&pcm(2000, 0)).as_bytes()).unwrap();
    session.feed(audio_line(&pcm(100, 1)).as_bytes()).unwrap();

    assert_eq!(session.stats().dropped_lines, 1);
    assert_eq!(&session.finalize().unwrap()[..], &pcm(100, 1)[..]);
}

#[test]
fn test_line_limit_below_minimum_is_raised() {
    let settings = DecoderSettings::default().with_max_line_bytes(0);
    let mut session = ParseSession::new(&settings);

    session.feed(audio_line(&pcm(40, 0)).as_bytes()).unwrap();

    assert_eq!(session.stats().dropped_lines, 0);
    assert_eq!(&session.finalize().unwrap()[..], &pcm(40, 0)[..]);
}

#[test]
fn test_stats_track_decoded_audio() {
    let mut session = ParseSession::default();
    session.feed(audio_line(&pcm(40, 0)).as_bytes()).unwrap();
    session.feed(audio_line(&pcm(24, 0)).as_bytes()).unwrap();
    session.feed(b"not json\n").unwrap();

    let stats = session.stats();
    assert_eq!(stats.lines, 3);
    assert_eq!(stats.audio_chunks, 2);
    assert_eq!(stats.audio_bytes, 64);
    assert_eq!(stats.dropped_lines, 0);
}
