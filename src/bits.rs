//! Bit-level output for the block encoder.

use crate::error::{Error, Result};

/// LSB-first bit writer with a 64-bit accumulator and a fixed byte budget.
///
/// Codes are OR-ed in above the pending bits and whole bytes are drained
/// from the bottom of the accumulator. Writing past `capacity` bytes fails
/// instead of growing the buffer, which is how the encoder detects input
/// that does not shrink.
#[derive(Debug)]
pub struct BitWriter<'a> {
    buffer: &'a mut [u8],
    len: usize,
    acc: u64,
    bits_in_acc: u8,
}

impl<'a> BitWriter<'a> {
    /// Create a writer that fills `buffer` from the start.
    pub fn new(buffer: &'a mut [u8]) -> Self {
        Self {
            buffer,
            len: 0,
            acc: 0,
            bits_in_acc: 0,
        }
    }

    /// Append the low `num_bits` bits of `value`, first bit in bit 0.
    ///
    /// `num_bits` must be at most 56 so the accumulator cannot overflow.
    #[inline]
    pub fn write_bits(&mut self, value: u64, num_bits: u8) -> Result<()> {
        debug_assert!(num_bits <= 56);
        debug_assert!(self.bits_in_acc < 8);
        self.acc |= value << self.bits_in_acc;
        self.bits_in_acc += num_bits;

        while self.bits_in_acc >= 8 {
            self.push_byte(self.acc as u8)?;
            self.acc >>= 8;
            self.bits_in_acc -= 8;
        }
        Ok(())
    }

    #[inline]
    fn push_byte(&mut self, byte: u8) -> Result<()> {
        if self.len == self.buffer.len() {
            return Err(Error::OutputBufferExhausted {
                capacity: self.buffer.len(),
            });
        }
        self.buffer[self.len] = byte;
        self.len += 1;
        Ok(())
    }

    /// Emit the trailing partial byte, if any, and return the byte count.
    ///
    /// Bits above the last code in the final byte are zero.
    pub fn finish(mut self) -> Result<usize> {
        if self.bits_in_acc > 0 {
            self.push_byte(self.acc as u8)?;
            self.acc = 0;
            self.bits_in_acc = 0;
        }
        Ok(self.len)
    }

    /// Returns length in bytes (not counting partial byte).
    pub fn len(&self) -> usize {
        self.len
    }

    /// True if nothing has been written yet.
    pub fn is_empty(&self) -> bool {
        self.len == 0 && self.bits_in_acc == 0
    }

    /// Bits waiting in the accumulator for a full byte.
    pub fn pending_bits(&self) -> u8 {
        self.bits_in_acc
    }
}
