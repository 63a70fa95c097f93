//! Streaming compression and decompression over `std::io`.
//!
//! A compressed stream is nothing more than block records back to back:
//! no magic number, version or trailer.

use std::io::{Read, Write};

use crate::compress::block::{BlockEncoder, BlockKind};
use crate::decode::decode_payload;
use crate::error::Result;
use crate::format::{read_up_to, truncated, BlockHeader};
use crate::options::CodecOptions;

/// Counters describing one stream operation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StreamStats {
    /// Block records written or read.
    pub blocks: u64,
    /// Blocks stored Huffman-coded.
    pub compressed_blocks: u64,
    /// Blocks stored verbatim.
    pub raw_blocks: u64,
    /// Bytes read from the input.
    pub bytes_in: u64,
    /// Bytes written to the output.
    pub bytes_out: u64,
}

impl StreamStats {
    /// Output size as a fraction of input size; 0.0 for empty input.
    pub fn ratio(&self) -> f64 {
        if self.bytes_in == 0 {
            0.0
        } else {
            self.bytes_out as f64 / self.bytes_in as f64
        }
    }

    fn record(&mut self, kind: BlockKind) {
        self.blocks += 1;
        match kind {
            BlockKind::Compressed => self.compressed_blocks += 1,
            BlockKind::Raw => self.raw_blocks += 1,
        }
    }
}

/// Compress everything `reader` yields into block records on `writer`.
///
/// Input is cut into blocks of exactly `options.block_size` bytes; only the
/// last block may be shorter. An empty input writes nothing.
pub fn compress_stream<R, W>(
    reader: &mut R,
    writer: &mut W,
    options: &CodecOptions,
) -> Result<StreamStats>
where
    R: Read + ?Sized,
    W: Write + ?Sized,
{
    let mut encoder = BlockEncoder::with_options(options)?;
    let mut chunk = vec![0u8; options.block_size];
    let mut record = Vec::new();
    let mut stats = StreamStats::default();

    loop {
        let filled = read_up_to(reader, &mut chunk)?;
        if filled == 0 {
            break;
        }

        record.clear();
        let kind = encoder.encode_into(&chunk[..filled], &mut record);
        writer.write_all(&record)?;

        stats.record(kind);
        stats.bytes_in += filled as u64;
        stats.bytes_out += record.len() as u64;

        if filled < chunk.len() {
            break;
        }
    }

    writer.flush()?;
    tracing::debug!(
        blocks = stats.blocks,
        raw = stats.raw_blocks,
        bytes_in = stats.bytes_in,
        bytes_out = stats.bytes_out,
        "stream compressed"
    );
    Ok(stats)
}

/// Decode block records from `reader` until it ends, writing the original
/// bytes to `writer`.
///
/// A stream that ends inside a record, or any record that fails
/// validation, is reported as [`Error::CorruptBlock`](crate::Error::CorruptBlock).
pub fn decompress_stream<R, W>(reader: &mut R, writer: &mut W) -> Result<StreamStats>
where
    R: Read + ?Sized,
    W: Write + ?Sized,
{
    let mut payload = Vec::new();
    let mut output = Vec::new();
    let mut stats = StreamStats::default();

    while let Some(header) = BlockHeader::read_from(reader)? {
        // Grow with the data actually read, not with the declared length
        payload.clear();
        let declared = header.payload_len();
        (&mut *reader).take(declared as u64).read_to_end(&mut payload)?;
        if payload.len() < declared {
            return Err(truncated("payload"));
        }

        output.clear();
        decode_payload(&header, &payload, &mut output)?;
        writer.write_all(&output)?;

        stats.record(if header.is_raw() {
            BlockKind::Raw
        } else {
            BlockKind::Compressed
        });
        stats.bytes_in += (header.encoded_len() + payload.len()) as u64;
        stats.bytes_out += output.len() as u64;
        tracing::trace!(
            block = stats.blocks,
            raw = header.is_raw(),
            size = output.len(),
            "block decoded"
        );
    }

    writer.flush()?;
    tracing::debug!(
        blocks = stats.blocks,
        bytes_in = stats.bytes_in,
        bytes_out = stats.bytes_out,
        "stream decompressed"
    );
    Ok(stats)
}
