//! Integration tests for truncation detection in the streaming decoder.
//!
//! These tests cut complete GZIP streams at every kind of boundary and check
//! that the decoder classifies the result by structure and keeps every byte
//! that was decodable before the cut.

use gzsalvage_core::{FaultClass, SalvageError};
use gzsalvage_gzip::{GzipDecoder, GzipEncoder, GzipHeader, compress};
use std::io::{BufReader, Read, Write};

fn noise(len: usize) -> Vec<u8> {
    let mut seed: u64 = 0x123456789ABCDEF0;
    (0..len)
        .map(|_| {
            seed = seed.wrapping_mul(6364136223846793005).wrapping_add(1);
            (seed >> 32) as u8
        })
        .collect()
}

fn text(len: usize) -> Vec<u8> {
    b"The quick brown fox jumps over the lazy dog. "
        .iter()
        .copied()
        .cycle()
        .take(len)
        .collect()
}

/// Decode `data`, returning what was produced and the error, if any.
fn decode_partial(data: &[u8]) -> (Vec<u8>, Option<SalvageError>) {
    let mut decoder = match GzipDecoder::new(data) {
        Ok(decoder) => decoder,
        Err(e) => return (Vec::new(), Some(e)),
    };

    let mut output = Vec::new();
    let mut buf = [0u8; 256];
    loop {
        match decoder.read(&mut buf) {
            Ok(0) => return (output, None),
            Ok(n) => output.extend_from_slice(&buf[..n]),
            Err(e) => return (output, Some(e.into())),
        }
    }
}

// ============================================================================
// Cut Position Tests
// ============================================================================

#[test]
fn test_every_cut_inside_body_is_truncation() {
    let original = text(3000);
    let compressed = compress(&original).expect("compress");

    for cut in 10..compressed.len() - 8 {
        let (output, err) = decode_partial(&compressed[..cut]);
        let err = err.unwrap_or_else(|| panic!("cut at {} decoded cleanly", cut));

        assert_eq!(
            err.class(),
            FaultClass::BenignTruncation,
            "cut at {}: {}",
            cut,
            err
        );
        assert!(original.starts_with(&output), "cut at {}: wrong prefix", cut);
    }
}

#[test]
fn test_every_cut_inside_header_is_malformed() {
    let compressed = compress(b"header").expect("compress");

    for cut in 0..10 {
        let (output, err) = decode_partial(&compressed[..cut]);
        assert!(output.is_empty());
        assert_eq!(
            err.expect("error").class(),
            FaultClass::MalformedHeader,
            "cut at {}",
            cut
        );
    }
}

#[test]
fn test_cut_at_sync_flush_recovers_exact_prefix() {
    let first = noise(5000);
    let mut encoder = GzipEncoder::new(Vec::new()).expect("encoder");
    encoder.write_all(&first).expect("write");
    encoder.flush().expect("flush");
    let flushed_len = encoder.get_ref().len();
    encoder.write_all(&noise(5000)).expect("write");
    let compressed = encoder.finish().expect("finish");

    let (output, err) = decode_partial(&compressed[..flushed_len]);

    assert_eq!(output, first);
    match err {
        Some(SalvageError::Truncated { offset, decoded }) => {
            assert_eq!(offset, flushed_len as u64);
            assert_eq!(decoded, first.len() as u64);
        }
        other => panic!("expected truncation, got {:?}", other),
    }
}

#[test]
fn test_every_cut_inside_trailer_is_not_benign() {
    let original = text(3000);
    let compressed = compress(&original).expect("compress");
    let body_end = compressed.len() - 8;

    for cut in body_end..compressed.len() {
        let (output, err) = decode_partial(&compressed[..cut]);
        let err = err.unwrap_or_else(|| panic!("cut at {} decoded cleanly", cut));

        assert_eq!(output, original, "cut at {}", cut);
        assert_eq!(err.class(), FaultClass::UnclassifiedIo, "cut at {}: {}", cut, err);
        assert!(matches!(
            err,
            SalvageError::TruncatedTrailer { read, .. } if read == cut - body_end
        ));
    }
}

#[test]
fn test_missing_trailer_keeps_output_but_fails() {
    let original = noise(10000);
    let compressed = compress(&original).expect("compress");

    let (output, err) = decode_partial(&compressed[..compressed.len() - 8]);
    assert_eq!(output, original);
    assert!(!err.expect("error").is_truncation());
}

// ============================================================================
// Streaming Shape Tests
// ============================================================================

#[test]
fn test_tiny_input_buffer() {
    let original = text(10000);
    let compressed = compress(&original).expect("compress");

    let reader = BufReader::with_capacity(1, compressed.as_slice());
    let mut decoder = GzipDecoder::new(reader).expect("header");
    let mut output = Vec::new();
    decoder.read_to_end(&mut output).expect("decode");

    assert_eq!(output, original);
    assert_eq!(decoder.consumed(), compressed.len() as u64);
}

#[test]
fn test_tiny_output_buffer() {
    let original = noise(2048);
    let compressed = compress(&original).expect("compress");

    let mut decoder = GzipDecoder::new(compressed.as_slice()).expect("header");
    let mut output = Vec::new();
    let mut buf = [0u8; 3];
    loop {
        let n = decoder.read(&mut buf).expect("read");
        if n == 0 {
            break;
        }
        output.extend_from_slice(&buf[..n]);
    }

    assert_eq!(output, original);
    assert!(decoder.is_finished());
}

#[test]
fn test_header_fields_survive() {
    let header = GzipHeader {
        filename: Some("part-0001.log".to_string()),
        mtime: 1_700_000_000,
        ..GzipHeader::default()
    };
    let mut encoder = GzipEncoder::with_header(Vec::new(), header, 6).expect("encoder");
    encoder.write_all(b"named").expect("write");
    let compressed = encoder.finish().expect("finish");

    let mut decoder = GzipDecoder::new(compressed.as_slice()).expect("header");
    assert_eq!(decoder.header().filename.as_deref(), Some("part-0001.log"));
    assert_eq!(decoder.header().mtime, 1_700_000_000);

    let mut output = Vec::new();
    decoder.read_to_end(&mut output).expect("decode");
    assert_eq!(output, b"named");
}

// ============================================================================
// Multi-member Tests
// ============================================================================

#[test]
fn test_truncated_second_member_keeps_first() {
    let mut compressed = compress(b"first member|").expect("compress");
    let second = compress(&noise(4000)).expect("compress");
    compressed.extend_from_slice(&second[..second.len() / 2]);

    let (output, err) = decode_partial(&compressed);

    assert!(output.starts_with(b"first member|"));
    assert!(err.expect("error").is_truncation());
}

#[test]
fn test_cut_inside_second_header_ends_stream() {
    let mut compressed = compress(b"first member").expect("compress");
    let second = compress(b"second member").expect("compress");
    compressed.extend_from_slice(&second[..6]);

    let (output, err) = decode_partial(&compressed);

    assert_eq!(output, b"first member");
    assert!(err.is_none(), "{:?}", err);
}

#[test]
fn test_corrupt_member_is_not_truncation() {
    let mut compressed = compress(&text(1000)).expect("compress");
    let crc_pos = compressed.len() - 8;
    compressed[crc_pos] ^= 0x55;

    let (_, err) = decode_partial(&compressed);
    assert_eq!(err.expect("error").class(), FaultClass::CorruptData);
}
