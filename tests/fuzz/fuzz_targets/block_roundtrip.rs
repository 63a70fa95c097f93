//! Fuzz target for block compression.
//!
//! Every input must compress without panicking, stay within the raw
//! record size, and decode back to itself through both the in-memory and
//! streaming paths.

#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;

use huffer::{compress_block, compress_stream, decode_all, decode_block, CodecOptions};

/// Structured input for block fuzzing.
#[derive(Arbitrary, Debug)]
struct BlockInput {
    /// Block size selector
    block_size: u16,
    /// Code width limit selector
    max_code_width: u8,
    /// Raw data to compress
    data: Vec<u8>,
}

fuzz_target!(|input: BlockInput| {
    // Limit input size to avoid OOM
    if input.data.len() > 256 * 1024 {
        return;
    }

    let block = compress_block(&input.data);
    assert!(block.len() <= input.data.len() + 6);
    let decoded = decode_block(&block.header, &block.payload).expect("own block must decode");
    assert_eq!(decoded, input.data);

    // Small widths exercise the dictionary overflow fallback
    let options = CodecOptions {
        block_size: input.block_size.max(1) as usize,
        max_code_width: input.max_code_width % 56 + 1,
    };
    let mut stream = Vec::new();
    compress_stream(&mut &input.data[..], &mut stream, &options).expect("compress stream");
    assert_eq!(decode_all(&stream).expect("own stream must decode"), input.data);
});
