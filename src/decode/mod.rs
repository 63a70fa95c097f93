//! Block record decoding.
//!
//! The decoder rebuilds the encoder's tree from the stored frequency table
//! and walks it one payload bit at a time. Any disagreement between the
//! header and the data that follows is reported as
//! [`Error::CorruptBlock`] rather than repaired.

pub mod bit_reader;

use crate::compress::huffman::{HuffmanNode, HuffmanTree};
use crate::error::{Error, Result};
use crate::format::{truncated, BlockHeader};

use bit_reader::BitReader;

/// Decode one block from its serialized header and payload.
///
/// `header` must contain exactly one header and `payload` exactly the bytes
/// it declares.
pub fn decode_block(header: &[u8], payload: &[u8]) -> Result<Vec<u8>> {
    let (parsed, used) = BlockHeader::parse(header)?;
    if used != header.len() {
        return Err(Error::CorruptBlock(format!(
            "{} unexpected bytes after block header",
            header.len() - used
        )));
    }
    let mut output = Vec::new();
    decode_payload(&parsed, payload, &mut output)?;
    Ok(output)
}

/// Decode the record at the front of `data`.
///
/// Returns the decoded bytes and the number of input bytes the record
/// occupied, so records can be decoded back to back.
pub fn decode_record(data: &[u8]) -> Result<(Vec<u8>, usize)> {
    let (header, used) = BlockHeader::parse(data)?;
    let end = used + header.payload_len();
    let payload = data.get(used..end).ok_or_else(|| truncated("payload"))?;

    let mut output = Vec::new();
    decode_payload(&header, payload, &mut output)?;
    Ok((output, end))
}

/// Decode a whole stream of concatenated block records held in memory.
pub fn decode_all(mut data: &[u8]) -> Result<Vec<u8>> {
    let mut output = Vec::new();
    while !data.is_empty() {
        let (block, used) = decode_record(data)?;
        output.extend_from_slice(&block);
        data = &data[used..];
    }
    Ok(output)
}

/// Append the decoded contents of one payload to `output`.
pub fn decode_payload(header: &BlockHeader, payload: &[u8], output: &mut Vec<u8>) -> Result<()> {
    if payload.len() != header.payload_len() {
        return Err(Error::CorruptBlock(format!(
            "header declares {} payload bytes, got {}",
            header.payload_len(),
            payload.len()
        )));
    }

    match header {
        BlockHeader::Raw { .. } => {
            output.extend_from_slice(payload);
            Ok(())
        }
        BlockHeader::Compressed {
            frequencies,
            original_length,
            ..
        } => {
            let tree = HuffmanTree::build(frequencies).ok_or_else(|| {
                Error::CorruptBlock("compressed block with empty frequency table".into())
            })?;
            decode_symbols(&tree, payload, *original_length as usize, output)
        }
    }
}

/// Walk `tree` once per output symbol, reading payload bits LSB-first.
fn decode_symbols(
    tree: &HuffmanTree,
    payload: &[u8],
    count: usize,
    output: &mut Vec<u8>,
) -> Result<()> {
    // Every code is at least one bit wide
    if count > payload.len().saturating_mul(8) {
        return Err(Error::CorruptBlock(format!(
            "{} payload bytes cannot hold {count} symbols",
            payload.len()
        )));
    }
    let mut reader = BitReader::new(payload);
    output.reserve(count);

    match tree.root() {
        // One-symbol blocks carry a one-bit code per symbol
        HuffmanNode::Leaf(byte) => {
            for _ in 0..count {
                reader.read_bit()?;
            }
            output.resize(output.len() + count, *byte);
        }
        root => {
            for _ in 0..count {
                let mut node = root;
                let byte = loop {
                    match node {
                        HuffmanNode::Leaf(byte) => break *byte,
                        HuffmanNode::Internal { left, right } => {
                            node = if reader.read_bit()? == 0 { &**left } else { &**right };
                        }
                    }
                };
                output.push(byte);
            }
        }
    }

    let consumed = reader.bytes_consumed();
    if consumed != payload.len() {
        return Err(Error::CorruptBlock(format!(
            "{} trailing bytes after compressed payload",
            payload.len() - consumed
        )));
    }
    Ok(())
}
