//! Block encoding with raw fallback.

use crate::bits::BitWriter;
use crate::compress::frequency::{FrequencyEntry, FrequencyTable};
use crate::compress::huffman::{Dictionary, HuffmanTree};
use crate::error::{Error, Result};
use crate::format::{
    compressed_header_len, write_compressed_header, write_raw_header, RAW_HEADER_SIZE,
};
use crate::options::{CodecOptions, MAX_CODE_WIDTH};

/// How a block ended up being stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockKind {
    /// Huffman-coded payload.
    Compressed,
    /// Input stored verbatim.
    Raw,
}

/// A serialized block record split into header and payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedBlock {
    /// Block header bytes.
    pub header: Vec<u8>,
    /// Payload bytes declared by the header.
    pub payload: Vec<u8>,
}

impl EncodedBlock {
    /// Kind declared by the header's table length field.
    pub fn kind(&self) -> BlockKind {
        if self.header.starts_with(&[0, 0]) {
            BlockKind::Raw
        } else {
            BlockKind::Compressed
        }
    }

    /// Total record size in bytes.
    pub fn len(&self) -> usize {
        self.header.len() + self.payload.len()
    }

    /// True for a record with neither header nor payload.
    pub fn is_empty(&self) -> bool {
        self.header.is_empty() && self.payload.is_empty()
    }

    /// Header followed by payload, as written to a stream.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.len());
        out.extend_from_slice(&self.header);
        out.extend_from_slice(&self.payload);
        out
    }
}

/// Block encoder with reusable scratch storage.
///
/// One encoder handles one block at a time; the frequency table, dictionary
/// and output buffer are reset per block, so a reused encoder produces the
/// same bytes as a fresh one.
#[derive(Debug)]
pub struct BlockEncoder {
    max_code_width: u8,
    freq: FrequencyTable,
    dict: Dictionary,
    scratch: Vec<u8>,
}

impl Default for BlockEncoder {
    fn default() -> Self {
        Self::new()
    }
}

impl BlockEncoder {
    /// Create an encoder with the default maximum code width.
    pub fn new() -> Self {
        Self {
            max_code_width: MAX_CODE_WIDTH,
            freq: FrequencyTable::new(),
            dict: Dictionary::new(),
            scratch: Vec::new(),
        }
    }

    /// Create an encoder using the code width limit from `options`.
    pub fn with_options(options: &CodecOptions) -> Result<Self> {
        options.validate()?;
        Ok(Self {
            max_code_width: options.max_code_width,
            scratch: Vec::with_capacity(options.block_size),
            ..Self::new()
        })
    }

    /// Huffman-code `input` without falling back.
    ///
    /// Returns the packed payload. Fails with [`Error::DictionaryOverflow`]
    /// when a code would be too wide, or [`Error::OutputBufferExhausted`]
    /// when the compressed record would be larger than the raw record for
    /// the same input. An empty input always reports the latter.
    pub fn try_encode_compressed(&mut self, input: &[u8]) -> Result<&[u8]> {
        let len = self.pack(input)?;
        Ok(&self.scratch[..len])
    }

    fn pack(&mut self, input: &[u8]) -> Result<usize> {
        let symbols = self.freq.count(input);
        let tree = HuffmanTree::build(self.freq.entries())
            .ok_or(Error::OutputBufferExhausted { capacity: 0 })?;
        self.dict.build(&tree, self.max_code_width)?;

        // The payload budget is whatever the raw record would spend beyond
        // the compressed header, so falling back never costs extra bytes.
        let header_overhead = compressed_header_len(symbols) - RAW_HEADER_SIZE;
        let capacity = input.len().saturating_sub(header_overhead);
        self.scratch.clear();
        self.scratch.resize(capacity, 0);

        let mut writer = BitWriter::new(&mut self.scratch);
        for &byte in input {
            let code = self.dict.get(byte);
            writer.write_bits(code.bits, code.width)?;
        }
        writer.finish()
    }

    /// Encode `input` as one block record appended to `out`.
    ///
    /// Never fails: if Huffman coding is impossible or does not help, the
    /// block is stored raw.
    ///
    /// # Panics
    ///
    /// Panics if `input` is longer than `u32::MAX` bytes, which the length
    /// fields cannot represent.
    pub fn encode_into(&mut self, input: &[u8], out: &mut Vec<u8>) -> BlockKind {
        assert!(
            u32::try_from(input.len()).is_ok(),
            "block of {} bytes exceeds format limit",
            input.len()
        );
        let original_length = input.len() as u32;

        if input.is_empty() {
            write_raw_header(out, 0);
            tracing::debug!("empty block stored raw");
            return BlockKind::Raw;
        }

        match self.pack(input) {
            Ok(len) => {
                write_compressed_header(out, self.freq.entries(), original_length, len as u32);
                out.extend_from_slice(&self.scratch[..len]);
                tracing::debug!(
                    original = input.len(),
                    compressed = len,
                    symbols = self.freq.len(),
                    "block compressed"
                );
                BlockKind::Compressed
            }
            Err(err) => {
                debug_assert!(err.is_recoverable());
                tracing::debug!(original = input.len(), cause = %err, "block stored raw");
                write_raw_header(out, original_length);
                out.extend_from_slice(input);
                BlockKind::Raw
            }
        }
    }

    /// Encode `input` into a separate header and payload.
    pub fn encode(&mut self, input: &[u8]) -> EncodedBlock {
        let mut header = Vec::new();
        let header_len = match self.encode_into(input, &mut header) {
            BlockKind::Raw => RAW_HEADER_SIZE,
            BlockKind::Compressed => compressed_header_len(self.freq.len()),
        };
        let payload = header.split_off(header_len);
        EncodedBlock { header, payload }
    }

    /// Frequency table of the most recently encoded non-empty block.
    pub fn frequencies(&self) -> &[FrequencyEntry] {
        self.freq.entries()
    }

    /// Dictionary of the most recently encoded non-empty block.
    ///
    /// Meaningful only when that block was stored compressed.
    pub fn dictionary(&self) -> &Dictionary {
        &self.dict
    }
}

/// Compress one block with a fresh encoder.
///
/// Pure and deterministic: identical input always yields identical bytes.
pub fn compress_block(input: &[u8]) -> EncodedBlock {
    BlockEncoder::new().encode(input)
}
