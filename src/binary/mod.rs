// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Binary format for `.stemdex` stores.
//!
//! Only the persisted triad goes to disk: the sorted vocabulary, the sorted
//! templates, and the per-word template id lists. Everything a loaded store
//! derives (automata, token postings, affix tables) is rebuilt on load, so
//! the file stays small and independent of the tokenizer.
//!
//! # Security Considerations
//!
//! Store files may come from anywhere, so decoding never trusts a length:
//! - All counts are validated against MAX_* constants
//! - Section lengths must add up to exactly the file size
//! - CRC32 footer detects corruption/truncation
//! - Keys must come back strictly sorted, so ids match positions
//!
//! # Format Overview (v1)
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────┐
//! │ HEADER (28 bytes)                                          │
//! │   magic: [u8; 4] = "STMX"                                  │
//! │   version: u8 = 1                                          │
//! │   flags: u8                                                │
//! │   word_count: u32, template_count: u32                     │
//! │   vocab_len: u32, templates_len: u32, assoc_len: u32       │
//! │   reserved: [u8; 2]                                        │
//! ├────────────────────────────────────────────────────────────┤
//! │ 1. VOCABULARY (front-compressed, sorted)                   │
//! ├────────────────────────────────────────────────────────────┤
//! │ 2. TEMPLATES (front-compressed, sorted)                    │
//! ├────────────────────────────────────────────────────────────┤
//! │ 3. ASSOCIATIONS (varint template ids, one list per word)   │
//! ├────────────────────────────────────────────────────────────┤
//! │ FOOTER (8 bytes): crc32 + magic "XMTS"                     │
//! └────────────────────────────────────────────────────────────┘
//! ```
//!
//! Writes go to a temporary file in the target directory that is renamed
//! into place, so a crashed build never leaves half a store behind.

mod encoding;
mod header;

pub use encoding::{
    decode_associations, decode_keys, decode_varint, encode_associations, encode_keys,
    encode_varint,
};
pub use header::{
    FormatFlags, SectionOffsets, StemdexFooter, StemdexHeader, FOOTER_MAGIC, MAGIC,
    MAX_FILE_SIZE, MAX_LIST_LEN, MAX_TEMPLATE_COUNT, MAX_VARINT_BYTES, MAX_WORD_COUNT, VERSION,
};

use std::fs;
use std::io::{self, Write};
use std::path::Path;

use tempfile::NamedTempFile;

use crate::data::{StemmerData, WordTemplateAssociation};
use crate::error::{Result, StemError};
use crate::vocab::{TemplateIndex, VocabularyTrie};

// ============================================================================
// ENCODING
// ============================================================================

/// Serialize the triad into `.stemdex` bytes.
pub fn encode_store(data: &StemmerData) -> Result<Vec<u8>> {
    let mut vocab_bytes = Vec::new();
    encode_keys(data.vocabulary.keys(), &mut vocab_bytes);

    let mut template_bytes = Vec::new();
    encode_keys(data.templates.templates(), &mut template_bytes);

    let mut assoc_bytes = Vec::new();
    encode_associations(data.associations.lists(), &mut assoc_bytes);

    let header = StemdexHeader {
        version: VERSION,
        flags: FormatFlags::new(),
        word_count: section_len(data.vocabulary.len(), "word count")?,
        template_count: section_len(data.templates.len(), "template count")?,
        vocab_len: section_len(vocab_bytes.len(), "vocabulary section")?,
        templates_len: section_len(template_bytes.len(), "template section")?,
        assoc_len: section_len(assoc_bytes.len(), "association section")?,
    };

    let offsets = header.section_offsets();
    let mut buf = Vec::with_capacity(offsets.total_size());
    header.write(&mut buf)?;
    buf.extend_from_slice(&vocab_bytes);
    buf.extend_from_slice(&template_bytes);
    buf.extend_from_slice(&assoc_bytes);

    let crc32 = StemdexFooter::compute_crc32(&buf);
    StemdexFooter { crc32 }.write(&mut buf)?;

    Ok(buf)
}

fn section_len(len: usize, what: &str) -> Result<u32> {
    u32::try_from(len).map_err(|_| StemError::Format(format!("{} {} exceeds u32", what, len)))
}

// ============================================================================
// DECODING
// ============================================================================

/// Raw decoded sections, before the key lists become tries.
struct RawStore {
    header: StemdexHeader,
    words: Vec<String>,
    templates: Vec<String>,
    lists: Vec<Vec<u32>>,
}

/// Validate framing and split the file into its sections.
///
/// # Validation
///
/// 1. File size is within limits (MAX_FILE_SIZE)
/// 2. Footer magic is valid ("XMTS") and the CRC32 matches
/// 3. Header magic is valid ("STMX") and the version is supported
/// 4. Counts are within limits and section lengths add up to the file size
fn read_frame(bytes: &[u8]) -> io::Result<(StemdexHeader, SectionOffsets)> {
    if bytes.len() > MAX_FILE_SIZE {
        return Err(io::Error::new(
            io::ErrorKind::InvalidData,
            format!(
                "File too large: {} bytes (max {})",
                bytes.len(),
                MAX_FILE_SIZE
            ),
        ));
    }

    let min_size = StemdexHeader::SIZE + StemdexFooter::SIZE;
    if bytes.len() < min_size {
        return Err(io::Error::new(
            io::ErrorKind::UnexpectedEof,
            format!(
                "File too small: {} bytes (minimum {})",
                bytes.len(),
                min_size
            ),
        ));
    }

    let footer = StemdexFooter::read(bytes)?;
    let content = &bytes[..bytes.len() - StemdexFooter::SIZE];
    let computed_crc32 = StemdexFooter::compute_crc32(content);
    if footer.crc32 != computed_crc32 {
        return Err(io::Error::new(
            io::ErrorKind::InvalidData,
            format!(
                "CRC32 mismatch: expected {:#010x}, got {:#010x} (file corrupted)",
                footer.crc32, computed_crc32
            ),
        ));
    }

    let mut cursor = io::Cursor::new(bytes);
    let header = StemdexHeader::read(&mut cursor)?;

    if header.version != VERSION {
        return Err(io::Error::new(
            io::ErrorKind::InvalidData,
            format!(
                "Unsupported version: {} (expected {})",
                header.version, VERSION
            ),
        ));
    }
    if header.flags.has_unknown_bits() {
        return Err(io::Error::new(
            io::ErrorKind::InvalidData,
            format!("Unknown format flags: {:#04x}", header.flags.bits()),
        ));
    }
    if header.word_count > MAX_WORD_COUNT {
        return Err(io::Error::new(
            io::ErrorKind::InvalidData,
            format!(
                "Too many words: {} (max {})",
                header.word_count, MAX_WORD_COUNT
            ),
        ));
    }
    if header.template_count > MAX_TEMPLATE_COUNT {
        return Err(io::Error::new(
            io::ErrorKind::InvalidData,
            format!(
                "Too many templates: {} (max {})",
                header.template_count, MAX_TEMPLATE_COUNT
            ),
        ));
    }

    let offsets = header.section_offsets();
    if offsets.content_size() != content.len() {
        return Err(io::Error::new(
            io::ErrorKind::InvalidData,
            format!(
                "Section lengths mismatch: header claims {} bytes, got {} bytes",
                offsets.content_size(),
                content.len()
            ),
        ));
    }

    Ok((header, offsets))
}

fn decode_raw(bytes: &[u8]) -> io::Result<RawStore> {
    let (header, offsets) = read_frame(bytes)?;

    let extract_section = |section: (usize, usize), name: &str| -> io::Result<&[u8]> {
        offsets.slice(bytes, section).ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::UnexpectedEof,
                format!("{} section truncated", name),
            )
        })
    };

    let words = decode_keys(
        extract_section(offsets.vocabulary, "Vocabulary")?,
        header.word_count as usize,
    )?;
    let templates = decode_keys(
        extract_section(offsets.templates, "Templates")?,
        header.template_count as usize,
    )?;
    let lists = decode_associations(
        extract_section(offsets.associations, "Associations")?,
        header.word_count as usize,
    )?;

    Ok(RawStore {
        header,
        words,
        templates,
        lists,
    })
}

/// Deserialize `.stemdex` bytes and validate the result.
///
/// Framing and encoding problems surface as [`StemError::Format`]; a file
/// that decodes cleanly but breaks a store invariant (unsorted keys, a
/// dangling template id, an empty component) fails like any other bad data.
pub fn decode_store(bytes: &[u8]) -> Result<StemmerData> {
    let raw = decode_raw(bytes).map_err(|e| StemError::Format(e.to_string()))?;

    let data = StemmerData {
        vocabulary: VocabularyTrie::from_sorted(raw.words)?,
        templates: TemplateIndex::from_sorted(raw.templates)?,
        associations: WordTemplateAssociation::new(raw.lists),
    };
    data.validate()?;
    Ok(data)
}

// ============================================================================
// FILES
// ============================================================================

/// Write a store atomically: temp file in the same directory, then rename.
pub fn write_store(data: &StemmerData, path: &Path) -> Result<()> {
    let bytes = encode_store(data)?;

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(&bytes)?;
    tmp.as_file().sync_all()?;
    tmp.persist(path).map_err(|e| StemError::Io(e.error))?;

    tracing::info!(
        path = %path.display(),
        bytes = bytes.len(),
        words = data.vocabulary.len(),
        templates = data.templates.len(),
        "wrote store"
    );
    Ok(())
}

/// Read and decode a `.stemdex` file.
pub fn read_store(path: &Path) -> Result<StemmerData> {
    let len = fs::metadata(path)?.len();
    if len > MAX_FILE_SIZE as u64 {
        return Err(StemError::Format(format!(
            "File too large: {} bytes (max {})",
            len, MAX_FILE_SIZE
        )));
    }
    let bytes = fs::read(path)?;
    let data = decode_store(&bytes)?;
    tracing::debug!(path = %path.display(), bytes = bytes.len(), "read store");
    Ok(data)
}

// ============================================================================
// INSPECTION
// ============================================================================

/// Header-level facts about a store file, for `stemdex inspect`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreSummary {
    pub version: u8,
    pub file_size: usize,
    pub crc32: u32,
    pub word_count: u32,
    pub template_count: u32,
    pub pair_count: usize,
    pub vocab_bytes: usize,
    pub template_bytes: usize,
    pub assoc_bytes: usize,
}

/// Decode enough of a store to describe it.
pub fn inspect(bytes: &[u8]) -> Result<StoreSummary> {
    let raw = decode_raw(bytes).map_err(|e| StemError::Format(e.to_string()))?;
    let footer = StemdexFooter::read(bytes)?;
    let offsets = raw.header.section_offsets();
    let span = |(start, end): (usize, usize)| end - start;

    Ok(StoreSummary {
        version: raw.header.version,
        file_size: bytes.len(),
        crc32: footer.crc32,
        word_count: raw.header.word_count,
        template_count: raw.header.template_count,
        pair_count: raw.lists.iter().map(Vec::len).sum(),
        vocab_bytes: span(offsets.vocabulary),
        template_bytes: span(offsets.templates),
        assoc_bytes: span(offsets.associations),
    })
}
