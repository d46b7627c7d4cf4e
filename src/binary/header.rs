// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Binary format header and footer structures.
//!
//! The header is 28 bytes of fixed-size fields, parsed in one read before
//! anything else. It says exactly where every section lives.
//!
//! The footer is 8 bytes: a CRC32 of everything before it and the header
//! magic reversed ("XMTS"). A bad footer means a corrupted or truncated file.
//!
//! `SectionOffsets` is the single source of truth for the file layout. Both
//! the read and the write path go through it.

use std::io::{self, Read, Write};

// ============================================================================
// CONSTANTS
// ============================================================================

/// Magic bytes: "STMX" in ASCII (header)
pub const MAGIC: [u8; 4] = [0x53, 0x54, 0x4D, 0x58];

/// Footer magic: "XMTS" (reversed, marks valid file end)
pub const FOOTER_MAGIC: [u8; 4] = [0x58, 0x4D, 0x54, 0x53];

/// Current format version
pub const VERSION: u8 = 1;

// ============================================================================
// LIMITS
// ============================================================================

/// Maximum file size: 1 GB
pub const MAX_FILE_SIZE: usize = 1024 * 1024 * 1024;

/// Maximum number of vocabulary words
pub const MAX_WORD_COUNT: u32 = 50_000_000;

/// Maximum number of templates
pub const MAX_TEMPLATE_COUNT: u32 = 10_000_000;

/// Maximum templates recorded for one word
pub const MAX_LIST_LEN: usize = 100_000;

/// A u64 varint never needs more than 10 bytes.
pub const MAX_VARINT_BYTES: usize = 10;

// ============================================================================
// FLAGS
// ============================================================================

/// Format flags. None are defined yet; readers reject unknown bits.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FormatFlags(pub(crate) u8);

impl FormatFlags {
    pub const KNOWN: u8 = 0;

    pub fn new() -> Self {
        Self(0)
    }

    pub fn bits(self) -> u8 {
        self.0
    }

    pub fn has_unknown_bits(self) -> bool {
        self.0 & !Self::KNOWN != 0
    }
}

// ============================================================================
// HEADER
// ============================================================================

/// Binary format header (28 bytes fixed size)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StemdexHeader {
    pub version: u8,
    pub flags: FormatFlags,
    pub word_count: u32,
    pub template_count: u32,
    pub vocab_len: u32,
    pub templates_len: u32,
    pub assoc_len: u32,
}

impl StemdexHeader {
    // 4 (magic) + 1 (version) + 1 (flags) + 5*4 (u32s) + 2 (reserved) = 28
    pub const SIZE: usize = 28;

    /// Compute section byte offsets for this header.
    pub fn section_offsets(&self) -> SectionOffsets {
        SectionOffsets::from_header(self)
    }

    pub fn write<W: Write>(&self, w: &mut W) -> io::Result<()> {
        w.write_all(&MAGIC)?;
        w.write_all(&[self.version])?;
        w.write_all(&[self.flags.0])?;
        w.write_all(&self.word_count.to_le_bytes())?;
        w.write_all(&self.template_count.to_le_bytes())?;
        w.write_all(&self.vocab_len.to_le_bytes())?;
        w.write_all(&self.templates_len.to_le_bytes())?;
        w.write_all(&self.assoc_len.to_le_bytes())?;
        w.write_all(&[0u8; 2])?; // reserved
        Ok(())
    }

    pub fn read<R: Read>(r: &mut R) -> io::Result<Self> {
        let mut magic = [0u8; 4];
        r.read_exact(&mut magic)?;
        if magic != MAGIC {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                format!("Invalid magic: expected STMX, got {:?}", magic),
            ));
        }

        let mut buf = [0u8; 24]; // 28 - 4 (magic)
        r.read_exact(&mut buf)?;

        let u32_at = |i: usize| u32::from_le_bytes([buf[i], buf[i + 1], buf[i + 2], buf[i + 3]]);

        Ok(Self {
            version: buf[0],
            flags: FormatFlags(buf[1]),
            word_count: u32_at(2),
            template_count: u32_at(6),
            vocab_len: u32_at(10),
            templates_len: u32_at(14),
            assoc_len: u32_at(18),
            // buf[22..24] is reserved
        })
    }
}

// ============================================================================
// FOOTER (8 bytes)
// ============================================================================

/// Trailing checksum block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StemdexFooter {
    /// Checksum of every byte before the footer.
    pub crc32: u32,
}

impl StemdexFooter {
    /// crc32 (LE) then [`FOOTER_MAGIC`].
    pub const SIZE: usize = 8;

    pub fn write<W: Write>(&self, w: &mut W) -> io::Result<()> {
        let mut buf = [0u8; Self::SIZE];
        buf[..4].copy_from_slice(&self.crc32.to_le_bytes());
        buf[4..].copy_from_slice(&FOOTER_MAGIC);
        w.write_all(&buf)
    }

    /// Parse the last [`Self::SIZE`] bytes of `bytes`.
    pub fn read(bytes: &[u8]) -> io::Result<Self> {
        let tail = bytes
            .len()
            .checked_sub(Self::SIZE)
            .map(|at| &bytes[at..])
            .ok_or_else(|| io::Error::new(io::ErrorKind::UnexpectedEof, "no room for a footer"))?;

        let (crc, magic) = tail.split_at(4);
        if magic != FOOTER_MAGIC {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                format!("footer magic is {:02x?}, not XMTS", magic),
            ));
        }
        let mut le = [0u8; 4];
        le.copy_from_slice(crc);
        Ok(Self {
            crc32: u32::from_le_bytes(le),
        })
    }

    pub fn compute_crc32(content: &[u8]) -> u32 {
        crc32fast::hash(content)
    }
}

// ============================================================================
// SECTION OFFSETS
// ============================================================================

/// Section byte offsets, as `(start, end)` pairs.
///
/// Layout order:
/// 1. HEADER       [28B]
/// 2. VOCABULARY   [vocab_len]     - front-coded sorted words
/// 3. TEMPLATES    [templates_len] - front-coded sorted templates
/// 4. ASSOCIATIONS [assoc_len]     - template id lists, one per word
/// 5. FOOTER       [8B]            - CRC32 validation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SectionOffsets {
    pub vocabulary: (usize, usize),
    pub templates: (usize, usize),
    pub associations: (usize, usize),
    pub footer: (usize, usize),
}

impl SectionOffsets {
    pub fn from_header(h: &StemdexHeader) -> Self {
        let span = |start: usize, len: u32| (start, start + len as usize);
        let vocabulary = span(StemdexHeader::SIZE, h.vocab_len);
        let templates = span(vocabulary.1, h.templates_len);
        let associations = span(templates.1, h.assoc_len);
        Self {
            vocabulary,
            templates,
            associations,
            footer: (associations.1, associations.1 + StemdexFooter::SIZE),
        }
    }

    /// Bytes covered by the checksum.
    pub fn content_size(&self) -> usize {
        self.footer.0
    }

    pub fn total_size(&self) -> usize {
        self.footer.1
    }

    /// `None` when the file is shorter than the header claims.
    pub fn slice<'a>(&self, bytes: &'a [u8], section: (usize, usize)) -> Option<&'a [u8]> {
        bytes.get(section.0..section.1)
    }
}
