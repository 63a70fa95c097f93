//! Bit-level reader for block payloads.

use crate::error::{Error, Result};

/// Bit reader for LSB-first bit streams.
///
/// Bits are taken from bit 0 of each byte upward, matching the order in
/// which [`BitWriter`](crate::bits::BitWriter) packs them.
pub struct BitReader<'a> {
    data: &'a [u8],
    pos: usize,
    bit_buf: u64,
    bits_in_buf: u8,
}

impl<'a> BitReader<'a> {
    /// Create a new bit reader from a byte slice.
    pub fn new(data: &'a [u8]) -> Self {
        Self {
            data,
            pos: 0,
            bit_buf: 0,
            bits_in_buf: 0,
        }
    }

    /// Read a single bit.
    #[inline]
    pub fn read_bit(&mut self) -> Result<u32> {
        if self.bits_in_buf == 0 {
            self.refill()?;
        }
        let bit = (self.bit_buf & 1) as u32;
        self.bit_buf >>= 1;
        self.bits_in_buf -= 1;
        Ok(bit)
    }

    /// Load up to eight more bytes into the bit buffer.
    #[inline]
    fn refill(&mut self) -> Result<()> {
        if self.pos >= self.data.len() {
            return Err(Error::CorruptBlock(
                "bitstream ended before all symbols were decoded".into(),
            ));
        }
        // Only called with an empty buffer, so a full 64 bits may be loaded
        let take = (self.data.len() - self.pos).min(8);
        let mut word = [0u8; 8];
        word[..take].copy_from_slice(&self.data[self.pos..self.pos + take]);
        self.bit_buf = u64::from_le_bytes(word);
        self.bits_in_buf = (take * 8) as u8;
        self.pos += take;
        Ok(())
    }

    /// Number of input bytes holding at least one consumed bit.
    pub fn bytes_consumed(&self) -> usize {
        let unread_whole_bytes = (self.bits_in_buf / 8) as usize;
        self.pos - unread_whole_bytes
    }
}
