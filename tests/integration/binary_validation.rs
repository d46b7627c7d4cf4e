//! Negative tests for store file validation.
//!
//! A store file is untrusted input: every corruption must come back as a
//! `Format` error, never a panic or a silently wrong store.

use std::fs;

use stemdex::binary::{
    decode_store, encode_store, read_store, StemdexFooter, StemdexHeader, MAGIC, VERSION,
};
use stemdex::StemError;
use tempfile::TempDir;

use crate::common::sample_data;

fn sample_bytes() -> Vec<u8> {
    encode_store(&sample_data()).unwrap()
}

/// Patch the checksum so a header edit reaches header validation.
fn reseal(bytes: &mut [u8]) {
    let content_end = bytes.len() - StemdexFooter::SIZE;
    let crc = StemdexFooter::compute_crc32(&bytes[..content_end]);
    bytes[content_end..content_end + 4].copy_from_slice(&crc.to_le_bytes());
}

fn assert_format_error(bytes: &[u8]) {
    match decode_store(bytes) {
        Err(StemError::Format(_)) => {}
        other => panic!("expected Format error, got {other:?}"),
    }
}

#[test]
fn test_valid_file_starts_with_magic() {
    let bytes = sample_bytes();
    assert_eq!(&bytes[..4], MAGIC);
    assert_eq!(bytes[4], VERSION);
}

#[test]
fn test_empty_input() {
    assert_format_error(&[]);
}

#[test]
fn test_header_only() {
    let bytes = sample_bytes();
    assert_format_error(&bytes[..StemdexHeader::SIZE]);
}

#[test]
fn test_every_truncation_rejected() {
    let bytes = sample_bytes();
    for len in 0..bytes.len() {
        assert_format_error(&bytes[..len]);
    }
}

#[test]
fn test_trailing_garbage_rejected() {
    let mut bytes = sample_bytes();
    bytes.extend_from_slice(b"junk");
    assert_format_error(&bytes);
}

#[test]
fn test_bad_magic_rejected() {
    let mut bytes = sample_bytes();
    bytes[0] = b'X';
    reseal(&mut bytes);
    assert_format_error(&bytes);
}

#[test]
fn test_future_version_rejected() {
    let mut bytes = sample_bytes();
    bytes[4] = VERSION + 1;
    reseal(&mut bytes);
    assert_format_error(&bytes);
}

#[test]
fn test_unknown_flags_rejected() {
    let mut bytes = sample_bytes();
    bytes[5] = 0x80;
    reseal(&mut bytes);
    assert_format_error(&bytes);
}

#[test]
fn test_corrupted_section_fails_checksum() {
    let mut bytes = sample_bytes();
    let mid = StemdexHeader::SIZE + 3;
    bytes[mid] ^= 0xff;
    assert_format_error(&bytes);
}

#[test]
fn test_corrupted_file_on_disk() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("broken.stemdex");
    let mut bytes = sample_bytes();
    let last = bytes.len() - 1;
    bytes[last] ^= 0xff;
    fs::write(&path, &bytes).unwrap();

    assert!(matches!(read_store(&path), Err(StemError::Format(_))));
}
