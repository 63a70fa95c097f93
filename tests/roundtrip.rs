//! End-to-end round-trip tests for block and stream compression.

use proptest::prelude::*;
use rand::{rngs::StdRng, Rng, SeedableRng};

use huffer::format::{BlockHeader, RAW_HEADER_SIZE};
use huffer::{
    compress_all, compress_block, compress_stream, decode_all, decode_block, decode_record,
    decompress_stream, BlockEncoder, BlockKind, CodecOptions, Error,
};

fn random_bytes(rng: &mut StdRng, len: usize) -> Vec<u8> {
    (0..len).map(|_| rng.gen()).collect()
}

/// Bytes drawn from a small alphabet with a heavily skewed distribution.
fn skewed_bytes(rng: &mut StdRng, len: usize) -> Vec<u8> {
    (0..len)
        .map(|_| {
            let r: u32 = rng.gen_range(0..1000);
            match r {
                0..=599 => b'e',
                600..=849 => b't',
                850..=949 => b'a',
                950..=989 => rng.gen_range(b'b'..=b'z'),
                _ => rng.gen(),
            }
        })
        .collect()
}

fn assert_block_roundtrip(data: &[u8]) -> BlockKind {
    let block = compress_block(data);
    let decoded = decode_block(&block.header, &block.payload).unwrap();
    assert_eq!(decoded, data, "round-trip mismatch for {} bytes", data.len());
    block.kind()
}

fn stream_roundtrip(data: &[u8], options: &CodecOptions) -> Vec<u8> {
    let mut compressed = Vec::new();
    compress_stream(&mut &data[..], &mut compressed, options).unwrap();
    let mut restored = Vec::new();
    decompress_stream(&mut &compressed[..], &mut restored).unwrap();
    assert_eq!(restored, data);
    compressed
}

#[test]
fn test_block_roundtrip_cases() {
    let mut rng = StdRng::seed_from_u64(0x5EED);
    let cases: Vec<Vec<u8>> = vec![
        vec![],
        vec![0],
        vec![255],
        vec![0x41; 1000],
        (0..=255u8).collect(),
        (0..=255u8).rev().cycle().take(4096).collect(),
        b"It was the best of times, it was the worst of times.".repeat(40),
        random_bytes(&mut rng, 1),
        random_bytes(&mut rng, 777),
        random_bytes(&mut rng, 65536),
        skewed_bytes(&mut rng, 65536),
    ];

    for data in cases {
        assert_block_roundtrip(&data);
    }
}

#[test]
fn test_empty_block_record() {
    let block = compress_block(&[]);
    assert_eq!(block.kind(), BlockKind::Raw);
    let (header, used) = BlockHeader::parse(&block.header).unwrap();
    assert_eq!(used, RAW_HEADER_SIZE);
    assert_eq!(header, BlockHeader::Raw { original_length: 0 });
    assert!(block.payload.is_empty());
}

#[test]
fn test_single_symbol_block() {
    let data = vec![0x41u8; 1000];
    let mut encoder = BlockEncoder::new();
    let block = encoder.encode(&data);

    assert_eq!(block.kind(), BlockKind::Compressed);
    assert_eq!(encoder.frequencies().len(), 1);
    assert_eq!(encoder.dictionary().get(0x41).width, 1);
    assert_eq!(decode_block(&block.header, &block.payload).unwrap(), data);
}

#[test]
fn test_sort_stability_in_header() {
    let data = b"CCCBBBBBAAAAA".repeat(10);
    let mut encoder = BlockEncoder::new();
    let block = encoder.encode(&data);
    let order: Vec<(u8, u32)> = encoder
        .frequencies()
        .iter()
        .map(|e| (e.byte, e.count))
        .collect();
    assert_eq!(order, vec![(b'A', 50), (b'B', 50), (b'C', 30)]);

    // The stored table keeps the same order
    let (BlockHeader::Compressed { frequencies, .. }, _) =
        BlockHeader::parse(&block.header).unwrap()
    else {
        panic!("expected a compressed block");
    };
    assert_eq!(frequencies, encoder.frequencies());
}

#[test]
fn test_distinct_bytes_fall_back_to_raw() {
    let data: Vec<u8> = (0..=255u8).collect();
    let block = compress_block(&data);
    assert_eq!(block.kind(), BlockKind::Raw);
    assert_eq!(block.payload, data);
    assert_eq!(decode_block(&block.header, &block.payload).unwrap(), data);
}

#[test]
fn test_random_data_never_expands_past_raw_header() {
    let mut rng = StdRng::seed_from_u64(42);
    for _ in 0..50 {
        let len = rng.gen_range(0..5000);
        let data = random_bytes(&mut rng, len);
        let block = compress_block(&data);
        assert!(block.len() <= data.len() + RAW_HEADER_SIZE);
    }
}

#[test]
fn test_skewed_data_compresses() {
    let mut rng = StdRng::seed_from_u64(7);
    let data = skewed_bytes(&mut rng, 1 << 16);
    let block = compress_block(&data);
    assert_eq!(block.kind(), BlockKind::Compressed);
    assert!(block.len() < data.len() / 2);
}

#[test]
fn test_reused_encoder_is_deterministic() {
    let mut rng = StdRng::seed_from_u64(99);
    let mut encoder = BlockEncoder::new();
    for i in 0..40 {
        let len = rng.gen_range(0..3000);
        let data = if i % 2 == 0 {
            random_bytes(&mut rng, len)
        } else {
            skewed_bytes(&mut rng, len)
        };
        let reused = encoder.encode(&data);
        assert_eq!(reused, compress_block(&data), "block {i}");
        assert_eq!(compress_block(&data), compress_block(&data));
    }
}

#[test]
fn test_block_size_boundaries() {
    let options = CodecOptions {
        block_size: 1024,
        ..Default::default()
    };
    let mut rng = StdRng::seed_from_u64(1024);

    for len in [1, 1023, 1024, 1025, 2048, 3000] {
        let data = skewed_bytes(&mut rng, len);
        let compressed = stream_roundtrip(&data, &options);

        let mut blocks = 0;
        let mut rest = &compressed[..];
        while !rest.is_empty() {
            let (block, used) = decode_record(rest).unwrap();
            assert!(block.len() <= options.block_size);
            rest = &rest[used..];
            blocks += 1;
        }
        assert_eq!(blocks, len.div_ceil(options.block_size), "len {len}");
    }
}

#[test]
fn test_block_size_one() {
    let options = CodecOptions {
        block_size: 1,
        ..Default::default()
    };
    let data = b"tiny blocks";
    let compressed = stream_roundtrip(data, &options);
    // Every one-byte block is stored raw
    assert_eq!(compressed.len(), data.len() * (RAW_HEADER_SIZE + 1));
}

#[test]
fn test_preset_options_roundtrip() {
    let mut rng = StdRng::seed_from_u64(3);
    let data = skewed_bytes(&mut rng, 300_000);
    for options in [
        CodecOptions::small_blocks(),
        CodecOptions::default(),
        CodecOptions::large_blocks(),
    ] {
        let compressed = stream_roundtrip(&data, &options);
        assert_eq!(compressed, compress_all(&data, &options).unwrap());
        assert_eq!(decode_all(&compressed).unwrap(), data);
    }
}

#[test]
fn test_narrow_code_width_falls_back() {
    // Fibonacci counts need 9-bit codes for the rarest symbols
    let counts = [55usize, 34, 21, 13, 8, 5, 3, 2, 1, 1];
    let mut data = Vec::new();
    for (byte, &count) in counts.iter().enumerate() {
        data.extend(std::iter::repeat(b'a' + byte as u8).take(count));
    }

    let narrow = CodecOptions {
        max_code_width: 8,
        ..Default::default()
    };
    let compressed = stream_roundtrip(&data, &narrow);
    let (header, _) = BlockHeader::parse(&compressed).unwrap();
    assert!(header.is_raw());

    let compressed = stream_roundtrip(&data, &CodecOptions::default());
    let (header, _) = BlockHeader::parse(&compressed).unwrap();
    assert!(!header.is_raw());
}

#[test]
fn test_corrupted_streams_never_panic() {
    let mut rng = StdRng::seed_from_u64(0xBAD);
    let data = skewed_bytes(&mut rng, 5000);
    let options = CodecOptions {
        block_size: 1000,
        ..Default::default()
    };
    let compressed = compress_all(&data, &options).unwrap();

    for _ in 0..500 {
        let mut damaged = compressed.clone();
        let pos = rng.gen_range(0..damaged.len());
        damaged[pos] ^= 1 << rng.gen_range(0..8);
        // Either outcome is fine; only a panic is a failure
        let _ = decode_all(&damaged);
        let _ = decompress_stream(&mut &damaged[..], &mut Vec::<u8>::new());
    }
}

#[test]
fn test_truncated_record_is_rejected() {
    let data = b"some compressible text some compressible text".repeat(10);
    let block = compress_block(&data);
    assert_eq!(block.kind(), BlockKind::Compressed);
    let bytes = block.to_bytes();

    for cut in [1, block.header.len() - 1, block.header.len(), bytes.len() - 1] {
        assert!(
            matches!(decode_record(&bytes[..cut]), Err(Error::CorruptBlock(_))),
            "cut at {cut}"
        );
    }
}

#[test]
fn test_length_mismatch_is_rejected() {
    let block = compress_block(&b"abcabcabcabcabcabcabcabcabcabcabcabcabcabc".repeat(3));
    let mut header = block.header.clone();
    // original_length sits right before compressed_length
    let at = header.len() - 8;
    header[at] = header[at].wrapping_add(1);
    assert!(matches!(
        decode_block(&header, &block.payload),
        Err(Error::CorruptBlock(_))
    ));
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_block_roundtrip(data in proptest::collection::vec(any::<u8>(), 0..4096)) {
        let block = compress_block(&data);
        prop_assert!(block.len() <= data.len() + RAW_HEADER_SIZE);
        let decoded = decode_block(&block.header, &block.payload).unwrap();
        prop_assert_eq!(decoded, data);
    }

    #[test]
    fn prop_small_alphabet_roundtrip(data in proptest::collection::vec(0u8..4, 0..4096)) {
        let block = compress_block(&data);
        let (header, used) = BlockHeader::parse(&block.header).unwrap();
        prop_assert_eq!(used, block.header.len());
        prop_assert_eq!(header.payload_len(), block.payload.len());
        prop_assert_eq!(header.original_len(), data.len());
        prop_assert_eq!(decode_block(&block.header, &block.payload).unwrap(), data);
    }

    #[test]
    fn prop_stream_roundtrip(
        data in proptest::collection::vec(any::<u8>(), 0..8192),
        block_size in 1usize..3000,
    ) {
        let options = CodecOptions { block_size, ..Default::default() };
        let mut compressed = Vec::new();
        let stats = compress_stream(&mut &data[..], &mut compressed, &options).unwrap();
        prop_assert_eq!(stats.blocks as usize, data.len().div_ceil(block_size));
        prop_assert_eq!(decode_all(&compressed).unwrap(), data);
    }

    #[test]
    fn prop_arbitrary_input_never_panics(data in proptest::collection::vec(any::<u8>(), 0..512)) {
        let _ = decode_all(&data);
        let _ = decode_record(&data);
    }
}
