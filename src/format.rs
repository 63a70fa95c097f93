//! Block record header layout.
//!
//! Every block record starts with a little-endian header that declares the
//! block kind and the exact number of payload bytes that follow:
//!
//! ```text
//! freq_len: u16                        0 = raw block, else 1..=256
//! freq_len x { byte: u8, count: u32 }  compressed only, encoder's sorted order
//! original_length: u32
//! compressed_length: u32               compressed only
//! ```
//!
//! A compressed header is followed by `compressed_length` payload bytes, a
//! raw header by `original_length` bytes copied verbatim from the input.

use std::io::{self, Read};

use crate::compress::frequency::FrequencyEntry;
use crate::error::{Error, Result};

/// Size of the `freq_len` field.
const FREQ_LEN_SIZE: usize = 2;

/// Size of one serialized frequency table entry.
const FREQ_ENTRY_SIZE: usize = 5;

/// Largest possible header: full table plus both length fields.
pub const MAX_HEADER_SIZE: usize = compressed_header_len(256);

/// Header of a raw block.
pub const RAW_HEADER_SIZE: usize = FREQ_LEN_SIZE + 4;

/// Parsed block header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BlockHeader {
    /// Payload is the original bytes verbatim.
    Raw {
        /// Number of payload bytes.
        original_length: u32,
    },
    /// Payload is a Huffman bitstream.
    Compressed {
        /// Sorted nonzero frequency table the decoder rebuilds the tree from.
        frequencies: Vec<FrequencyEntry>,
        /// Number of bytes the payload decodes to.
        original_length: u32,
        /// Number of payload bytes.
        compressed_length: u32,
    },
}

/// Size of a compressed block header with `freq_len` table entries.
pub const fn compressed_header_len(freq_len: usize) -> usize {
    FREQ_LEN_SIZE + freq_len * FREQ_ENTRY_SIZE + 8
}

/// Append a compressed block header to `out`.
pub fn write_compressed_header(
    out: &mut Vec<u8>,
    frequencies: &[FrequencyEntry],
    original_length: u32,
    compressed_length: u32,
) {
    debug_assert!(!frequencies.is_empty() && frequencies.len() <= 256);
    out.reserve(compressed_header_len(frequencies.len()));
    out.extend_from_slice(&(frequencies.len() as u16).to_le_bytes());
    for entry in frequencies {
        out.push(entry.byte);
        out.extend_from_slice(&entry.count.to_le_bytes());
    }
    out.extend_from_slice(&original_length.to_le_bytes());
    out.extend_from_slice(&compressed_length.to_le_bytes());
}

/// Append a raw block header to `out`.
pub fn write_raw_header(out: &mut Vec<u8>, original_length: u32) {
    out.extend_from_slice(&0u16.to_le_bytes());
    out.extend_from_slice(&original_length.to_le_bytes());
}

impl BlockHeader {
    /// Serialize the header onto the end of `out`.
    pub fn write(&self, out: &mut Vec<u8>) {
        match self {
            BlockHeader::Raw { original_length } => write_raw_header(out, *original_length),
            BlockHeader::Compressed {
                frequencies,
                original_length,
                compressed_length,
            } => write_compressed_header(out, frequencies, *original_length, *compressed_length),
        }
    }

    /// Serialized size of this header in bytes.
    pub fn encoded_len(&self) -> usize {
        match self {
            BlockHeader::Raw { .. } => RAW_HEADER_SIZE,
            BlockHeader::Compressed { frequencies, .. } => {
                compressed_header_len(frequencies.len())
            }
        }
    }

    /// Number of payload bytes that follow the header.
    pub fn payload_len(&self) -> usize {
        match self {
            BlockHeader::Raw { original_length } => *original_length as usize,
            BlockHeader::Compressed {
                compressed_length, ..
            } => *compressed_length as usize,
        }
    }

    /// Number of bytes the block decodes to.
    pub fn original_len(&self) -> usize {
        match self {
            BlockHeader::Raw { original_length }
            | BlockHeader::Compressed {
                original_length, ..
            } => *original_length as usize,
        }
    }

    /// True for a raw (fallback) block.
    pub fn is_raw(&self) -> bool {
        matches!(self, BlockHeader::Raw { .. })
    }

    /// Parse a header from the front of `data`.
    ///
    /// Returns the header and the number of bytes it occupied. The payload
    /// is not required to be present.
    pub fn parse(data: &[u8]) -> Result<(Self, usize)> {
        let mut cursor = HeaderCursor { data, pos: 0 };

        let freq_len = cursor.read_u16()? as usize;
        if freq_len == 0 {
            let original_length = cursor.read_u32()?;
            return Ok((BlockHeader::Raw { original_length }, cursor.pos));
        }
        if freq_len > 256 {
            return Err(Error::CorruptBlock(format!(
                "frequency table length {freq_len} exceeds 256"
            )));
        }

        let mut frequencies = Vec::with_capacity(freq_len);
        let mut seen = [false; 256];
        let mut total: u64 = 0;
        for _ in 0..freq_len {
            let byte = cursor.read_u8()?;
            let count = cursor.read_u32()?;
            if count == 0 {
                return Err(Error::CorruptBlock(format!(
                    "zero count for byte {byte:#04x} in frequency table"
                )));
            }
            if std::mem::replace(&mut seen[byte as usize], true) {
                return Err(Error::CorruptBlock(format!(
                    "byte {byte:#04x} appears twice in frequency table"
                )));
            }
            total += count as u64;
            frequencies.push(FrequencyEntry { byte, count });
        }

        let original_length = cursor.read_u32()?;
        let compressed_length = cursor.read_u32()?;
        if total != original_length as u64 {
            return Err(Error::CorruptBlock(format!(
                "frequency counts sum to {total}, header declares {original_length} bytes"
            )));
        }

        Ok((
            BlockHeader::Compressed {
                frequencies,
                original_length,
                compressed_length,
            },
            cursor.pos,
        ))
    }

    /// Read one header from `reader`.
    ///
    /// Returns `Ok(None)` when the stream ends cleanly before the first
    /// header byte. Ending anywhere inside the header is corruption.
    pub fn read_from<R: Read + ?Sized>(reader: &mut R) -> Result<Option<Self>> {
        let mut buf = [0u8; MAX_HEADER_SIZE];

        let got = read_up_to(reader, &mut buf[..FREQ_LEN_SIZE])?;
        if got == 0 {
            return Ok(None);
        }
        if got < FREQ_LEN_SIZE {
            return Err(truncated("header"));
        }

        let freq_len = u16::from_le_bytes([buf[0], buf[1]]) as usize;
        let rest = match freq_len {
            0 => 4,
            1..=256 => freq_len * FREQ_ENTRY_SIZE + 8,
            _ => {
                return Err(Error::CorruptBlock(format!(
                    "frequency table length {freq_len} exceeds 256"
                )))
            }
        };
        let end = FREQ_LEN_SIZE + rest;
        if read_up_to(reader, &mut buf[FREQ_LEN_SIZE..end])? < rest {
            return Err(truncated("header"));
        }

        let (header, used) = Self::parse(&buf[..end])?;
        debug_assert_eq!(used, end);
        Ok(Some(header))
    }
}

/// Fill as much of `buf` as the reader can supply, retrying short reads.
pub(crate) fn read_up_to<R: Read + ?Sized>(reader: &mut R, buf: &mut [u8]) -> io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
    Ok(filled)
}

pub(crate) fn truncated(what: &str) -> Error {
    Error::CorruptBlock(format!("unexpected end of data in block {what}"))
}

struct HeaderCursor<'a> {
    data: &'a [u8],
    pos: usize,
}

impl HeaderCursor<'_> {
    fn take<const N: usize>(&mut self) -> Result<[u8; N]> {
        let bytes = self
            .data
            .get(self.pos..self.pos + N)
            .ok_or_else(|| truncated("header"))?;
        self.pos += N;
        let mut out = [0u8; N];
        out.copy_from_slice(bytes);
        Ok(out)
    }

    fn read_u8(&mut self) -> Result<u8> {
        self.take::<1>().map(|b| b[0])
    }

    fn read_u16(&mut self) -> Result<u16> {
        self.take().map(u16::from_le_bytes)
    }

    fn read_u32(&mut self) -> Result<u32> {
        self.take().map(u32::from_le_bytes)
    }
}
