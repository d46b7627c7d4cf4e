// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Binary encoding primitives: varint, front compression, association lists.
//!
//! Varint for integers that are usually small. Front compression for sorted
//! strings that share prefixes, which inflected vocabularies do constantly:
//! `къэрал`, `къэралхэр`, `къэралыгъуэ` store `къэрал` once.
//!
//! # References
//!
//! - **Varint (LEB128)**: Little-endian base-128 variable-length integer encoding.
//!   See: DWARF4 specification §7.6 "Variable Length Data", and
//!   Google Protocol Buffers encoding: <https://protobuf.dev/programming-guides/encoding/>
//!
//! - **Front Compression**: Incremental encoding for sorted string sequences.
//!   Witten, Moffat, Bell (1999): "Managing Gigabytes", §3.3 "Front Coding".

use std::io;

use super::header::{MAX_LIST_LEN, MAX_VARINT_BYTES};

// ============================================================================
// VARINT ENCODING
// ============================================================================

/// Encode a varint to bytes
pub fn encode_varint(mut value: u64, buf: &mut Vec<u8>) {
    loop {
        let byte = (value & 0x7F) as u8;
        value >>= 7;
        if value == 0 {
            buf.push(byte);
            break;
        }
        buf.push(byte | 0x80);
    }
}

/// Decode a varint from bytes, returning (value, bytes_consumed)
///
/// Fails on empty input, on a varint cut off by the end of the buffer, and on
/// one longer than `MAX_VARINT_BYTES`.
pub fn decode_varint(bytes: &[u8]) -> io::Result<(u64, usize)> {
    if bytes.is_empty() {
        return Err(io::Error::new(
            io::ErrorKind::UnexpectedEof,
            "Empty buffer for varint",
        ));
    }

    let mut result: u64 = 0;
    let mut shift = 0;

    for (i, &byte) in bytes.iter().take(MAX_VARINT_BYTES).enumerate() {
        result |= ((byte & 0x7F) as u64) << shift;
        if byte & 0x80 == 0 {
            return Ok((result, i + 1));
        }
        shift += 7;
    }

    if bytes.len() >= MAX_VARINT_BYTES {
        Err(io::Error::new(
            io::ErrorKind::InvalidData,
            "Varint exceeds maximum length (possible corruption)",
        ))
    } else {
        Err(io::Error::new(
            io::ErrorKind::UnexpectedEof,
            "Incomplete varint",
        ))
    }
}

/// Decode a varint that must fit in `u32`.
fn decode_u32(bytes: &[u8], what: &str) -> io::Result<(u32, usize)> {
    let (value, consumed) = decode_varint(bytes)?;
    let value = u32::try_from(value).map_err(|_| {
        io::Error::new(
            io::ErrorKind::InvalidData,
            format!("{} {} does not fit in 32 bits", what, value),
        )
    })?;
    Ok((value, consumed))
}

// ============================================================================
// KEY LIST ENCODING (front compression)
// ============================================================================

/// Calculate the common prefix length between two byte slices.
fn common_prefix_len(a: &[u8], b: &[u8]) -> usize {
    a.iter().zip(b.iter()).take_while(|(x, y)| x == y).count()
}

/// Encode sorted keys with front compression.
///
/// Format: [shared_prefix_len: varint][suffix_len: varint][suffix: bytes]
///
/// The shared length is in bytes and may split a multi-byte char; only the
/// reassembled key has to be valid UTF-8.
///
/// Example:
/// - "къэрал" -> [0][12]["къэрал"]
/// - "къэралыгъуэ" -> [12][10]["ыгъуэ"]
/// - "пэрытыныгъэ" -> [0][22]["пэрытыныгъэ"]
pub fn encode_keys(keys: &[String], out: &mut Vec<u8>) {
    let mut prev: &[u8] = &[];

    for key in keys {
        let bytes = key.as_bytes();
        let shared = common_prefix_len(prev, bytes);
        let suffix = &bytes[shared..];

        encode_varint(shared as u64, out);
        encode_varint(suffix.len() as u64, out);
        out.extend_from_slice(suffix);

        prev = bytes;
    }
}

fn invalid(msg: String) -> io::Error {
    io::Error::new(io::ErrorKind::InvalidData, msg)
}

/// Decode `count` front-compressed keys.
///
/// Each key is rebuilt from the bytes of the key before it, so a shared
/// length can never exceed that key. The section must hold exactly `count`
/// keys and nothing after them.
pub fn decode_keys(bytes: &[u8], count: usize) -> io::Result<Vec<String>> {
    // two varints per key at minimum
    if count.saturating_mul(2) > bytes.len() {
        return Err(invalid(format!(
            "{} keys cannot fit in a {}-byte section",
            count,
            bytes.len()
        )));
    }

    let mut keys: Vec<String> = Vec::with_capacity(count);
    let mut rest = bytes;

    for i in 0..count {
        let prev = keys.last().map_or(&[][..], |k| k.as_bytes());

        let (shared, n) = decode_varint(rest)?;
        rest = &rest[n..];
        let (tail_len, n) = decode_varint(rest)?;
        rest = &rest[n..];

        let shared = usize::try_from(shared)
            .ok()
            .filter(|&len| len <= prev.len())
            .ok_or_else(|| {
                invalid(format!(
                    "key {} shares {} bytes with a {}-byte predecessor",
                    i,
                    shared,
                    prev.len()
                ))
            })?;
        let tail_len = usize::try_from(tail_len)
            .ok()
            .filter(|&len| len <= rest.len())
            .ok_or_else(|| {
                io::Error::new(
                    io::ErrorKind::UnexpectedEof,
                    format!("key {} needs {} bytes, {} left", i, tail_len, rest.len()),
                )
            })?;
        let (tail, after) = rest.split_at(tail_len);
        rest = after;

        let mut key = Vec::with_capacity(shared + tail_len);
        key.extend_from_slice(&prev[..shared]);
        key.extend_from_slice(tail);
        let key = String::from_utf8(key)
            .map_err(|e| invalid(format!("key {} is not UTF-8: {}", i, e)))?;
        keys.push(key);
    }

    if !rest.is_empty() {
        return Err(invalid(format!(
            "{} stray bytes after {} keys",
            rest.len(),
            count
        )));
    }

    Ok(keys)
}

// ============================================================================
// ASSOCIATION ENCODING
// ============================================================================

/// Encode per-word template id lists, one per word in id order.
///
/// Format per word: [count: varint][template_id: varint; count]
///
/// Ids are kept in rule order, not sorted, so no delta coding.
pub fn encode_associations(lists: &[Vec<u32>], out: &mut Vec<u8>) {
    for list in lists {
        encode_varint(list.len() as u64, out);
        for &id in list {
            encode_varint(id as u64, out);
        }
    }
}

/// Decode `word_count` template id lists.
pub fn decode_associations(bytes: &[u8], word_count: usize) -> io::Result<Vec<Vec<u32>>> {
    if word_count > bytes.len() {
        return Err(io::Error::new(
            io::ErrorKind::InvalidData,
            format!(
                "Word count {} exceeds association section size {}",
                word_count,
                bytes.len()
            ),
        ));
    }

    let mut lists = Vec::with_capacity(word_count);
    let mut pos = 0;

    for word in 0..word_count {
        if pos >= bytes.len() {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                format!("Truncated associations at word {}", word),
            ));
        }
        let (count, consumed) = decode_u32(&bytes[pos..], "template count")?;
        pos += consumed;
        let count = count as usize;

        if count > MAX_LIST_LEN || count > bytes.len() - pos {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                format!("Word {} claims {} templates", word, count),
            ));
        }

        let mut list = Vec::with_capacity(count);
        for _ in 0..count {
            if pos >= bytes.len() {
                return Err(io::Error::new(
                    io::ErrorKind::UnexpectedEof,
                    format!("Truncated template list of word {}", word),
                ));
            }
            let (id, consumed) = decode_u32(&bytes[pos..], "template id")?;
            pos += consumed;
            list.push(id);
        }
        lists.push(list);
    }

    if pos != bytes.len() {
        return Err(io::Error::new(
            io::ErrorKind::InvalidData,
            format!("{} trailing bytes after associations", bytes.len() - pos),
        ));
    }

    Ok(lists)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_varint_boundaries() {
        for value in [0u64, 127, 128, 16_383, 16_384, u32::MAX as u64, u64::MAX] {
            let mut buf = Vec::new();
            encode_varint(value, &mut buf);
            assert!(buf.len() <= MAX_VARINT_BYTES);
            assert_eq!(decode_varint(&buf).unwrap(), (value, buf.len()));
        }
    }

    #[test]
    fn test_decode_varint_rejects_bad_input() {
        assert!(decode_varint(&[]).is_err());
        assert_eq!(
            decode_varint(&[0x80]).unwrap_err().kind(),
            io::ErrorKind::UnexpectedEof
        );
        let overlong = [0x80u8; 11];
        assert_eq!(
            decode_varint(&overlong).unwrap_err().kind(),
            io::ErrorKind::InvalidData
        );
    }

    #[test]
    fn test_front_coding_shares_prefixes() {
        let keys: Vec<String> = ["къэрал", "къэралыгъуэ", "пэрытыныгъэ"]
            .map(String::from)
            .to_vec();
        let mut buf = Vec::new();
        encode_keys(&keys, &mut buf);
        // second key stores only "ыгъуэ"
        assert_eq!(&buf[14..16], &[12, 10]);
        assert_eq!(decode_keys(&buf, 3).unwrap(), keys);
    }

    #[test]
    fn test_decode_keys_rejects_garbage() {
        // shared prefix longer than the previous key
        assert!(decode_keys(&[5, 1, b'a'], 1).is_err());
        // suffix runs past the end
        assert!(decode_keys(&[0, 9, b'a'], 1).is_err());
        // half a Cyrillic char
        assert!(decode_keys(&[0, 1, 0xD0], 1).is_err());
        // trailing bytes
        assert!(decode_keys(&[0, 1, b'a', 0], 1).is_err());
        // more keys than the section can hold
        assert!(decode_keys(&[0, 1, b'a'], 2).is_err());
        assert_eq!(decode_keys(&[], 0).unwrap(), Vec::<String>::new());
    }

    #[test]
    fn test_associations_keep_order() {
        let lists = vec![vec![], vec![3, 1, 200], vec![0]];
        let mut buf = Vec::new();
        encode_associations(&lists, &mut buf);
        assert_eq!(decode_associations(&buf, 3).unwrap(), lists);
        assert!(decode_associations(&buf, 4).is_err());
        assert!(decode_associations(&buf[..buf.len() - 1], 3).is_err());
    }
}
