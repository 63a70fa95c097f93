//! Block compression.
//!
//! A block goes through [`frequency`] counting, [`huffman`] tree and
//! dictionary construction, then [`block`] packing, which also decides
//! whether the block is better stored raw.

pub mod block;
pub mod frequency;
pub mod huffman;

pub use block::{compress_block, BlockEncoder, BlockKind, EncodedBlock};
pub use frequency::{compute_frequencies, FrequencyEntry, FrequencyTable};
pub use huffman::{Dictionary, DictionaryEntry, HuffmanNode, HuffmanTree};

use crate::error::Result;
use crate::options::CodecOptions;

/// Compress `data` held in memory into a sequence of block records.
///
/// Produces the same bytes as [`compress_stream`](crate::compress_stream)
/// with the same options. Empty input yields an empty output.
pub fn compress_all(data: &[u8], options: &CodecOptions) -> Result<Vec<u8>> {
    let mut encoder = BlockEncoder::with_options(options)?;
    let mut out = Vec::with_capacity(data.len() + data.len() / 16 + 16);
    for chunk in data.chunks(options.block_size) {
        encoder.encode_into(chunk, &mut out);
    }
    Ok(out)
}
