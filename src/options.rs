//! Codec configuration.

use crate::error::{Error, Result};

/// Default number of input bytes per block.
pub const DEFAULT_BLOCK_SIZE: usize = 64 * 1024;

/// Largest accepted block size. Keeps counts and lengths well inside `u32`.
pub const MAX_BLOCK_SIZE: usize = 16 * 1024 * 1024;

/// Widest Huffman code the encoder will emit.
///
/// The bit accumulator is 64 bits wide and holds at most 7 pending bits
/// between symbols, so 56 leaves room for one more code of full width.
pub const MAX_CODE_WIDTH: u8 = 56;

/// Options controlling block compression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodecOptions {
    /// Number of input bytes per block (1 to [`MAX_BLOCK_SIZE`], default 64 KiB).
    pub block_size: usize,
    /// Maximum Huffman code width in bits (1 to [`MAX_CODE_WIDTH`], default 56).
    pub max_code_width: u8,
}

impl Default for CodecOptions {
    fn default() -> Self {
        Self {
            block_size: DEFAULT_BLOCK_SIZE,
            max_code_width: MAX_CODE_WIDTH,
        }
    }
}

impl CodecOptions {
    /// 4 KiB blocks: tables adapt quickly, more header overhead.
    pub fn small_blocks() -> Self {
        Self {
            block_size: 4 * 1024,
            ..Self::default()
        }
    }

    /// 1 MiB blocks: less header overhead on large homogeneous inputs.
    pub fn large_blocks() -> Self {
        Self {
            block_size: 1024 * 1024,
            ..Self::default()
        }
    }

    /// Check that every field is within its supported range.
    pub fn validate(&self) -> Result<()> {
        if self.block_size == 0 || self.block_size > MAX_BLOCK_SIZE {
            return Err(Error::InvalidOptions(format!(
                "block size {} must be between 1 and {}",
                self.block_size, MAX_BLOCK_SIZE
            )));
        }
        if self.max_code_width == 0 || self.max_code_width > MAX_CODE_WIDTH {
            return Err(Error::InvalidOptions(format!(
                "max code width {} must be between 1 and {}",
                self.max_code_width, MAX_CODE_WIDTH
            )));
        }
        Ok(())
    }
}
