//! # huffer
//!
//! Block-oriented Huffman compression.
//!
//! Input is cut into fixed-size blocks. Each block gets its own byte
//! frequency table and Huffman code, and is written as a self-describing
//! record: a little-endian header followed by either the packed bitstream
//! or, when coding would not make the block smaller, the input verbatim.
//! Blocks are independent, so a stream is simply records back to back.
//!
//! ## Features
//!
//! - **No runtime dependencies** beyond `tracing` for diagnostics
//! - Deterministic output: the decoder rebuilds the exact encoder tree
//! - Raw fallback guarantees a record never exceeds its input by more
//!   than the six-byte raw header
//! - Optional `huffer` command-line tool via the `cli` feature
//!
//! ## Example
//!
//! ```rust
//! use huffer::{compress_block, decode_block};
//!
//! let input = b"abracadabra abracadabra abracadabra";
//! let block = compress_block(input);
//! let decoded = decode_block(&block.header, &block.payload).unwrap();
//! assert_eq!(decoded, input);
//! ```
//!
//! Streams go through [`compress_stream`] and [`decompress_stream`]:
//!
//! ```rust
//! use huffer::{compress_stream, decompress_stream, CodecOptions};
//!
//! let data = b"hello hello hello hello".repeat(1000);
//! let mut packed = Vec::new();
//! compress_stream(&mut &data[..], &mut packed, &CodecOptions::small_blocks()).unwrap();
//!
//! let mut unpacked = Vec::new();
//! decompress_stream(&mut &packed[..], &mut unpacked).unwrap();
//! assert_eq!(unpacked, data);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod bits;
pub mod compress;
pub mod decode;
pub mod error;
pub mod format;
pub mod options;
pub mod stream;

pub use compress::{compress_all, compress_block, BlockEncoder, BlockKind, EncodedBlock};
pub use decode::{decode_all, decode_block, decode_record};
pub use error::{Error, Result};
pub use format::BlockHeader;
pub use options::CodecOptions;
pub use stream::{compress_stream, decompress_stream, StreamStats};
