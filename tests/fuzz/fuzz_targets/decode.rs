//! Fuzz target for the decoder.
//!
//! Arbitrary bytes must be rejected or decoded, never panic, and the
//! in-memory and streaming decoders must agree.

#![no_main]

use libfuzzer_sys::fuzz_target;

use huffer::{decode_all, decompress_stream};

fuzz_target!(|data: &[u8]| {
    let in_memory = decode_all(data);

    let mut out = Vec::new();
    let streamed = decompress_stream(&mut &data[..], &mut out);

    match (in_memory, streamed) {
        (Ok(decoded), Ok(_)) => assert_eq!(decoded, out),
        (Err(_), Err(_)) => {}
        (a, b) => panic!("decoders disagree: {a:?} vs {b:?}"),
    }
});
