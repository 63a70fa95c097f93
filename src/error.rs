//! Error types for the huffer library.

use std::fmt;
use std::io;

/// Result type alias for huffer operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while encoding, decoding or streaming blocks.
///
/// `DictionaryOverflow` and `OutputBufferExhausted` never escape
/// [`compress_block`](crate::compress_block): the encoder answers both by
/// emitting the block raw. They are public so the strict encoding path can
/// report which one happened.
#[derive(Debug)]
pub enum Error {
    /// A Huffman code would be wider than the configured maximum.
    DictionaryOverflow {
        /// Width the offending leaf would need.
        width: u32,
        /// Maximum permitted width.
        max: u8,
    },
    /// The packed bitstream did not fit in the output buffer.
    OutputBufferExhausted {
        /// Capacity of the output buffer in bytes.
        capacity: usize,
    },
    /// A block record is malformed or inconsistent with the data that follows.
    CorruptBlock(String),
    /// Codec options are out of range.
    InvalidOptions(String),
    /// Underlying stream I/O failed.
    Io(io::Error),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::DictionaryOverflow { width, max } => {
                write!(
                    f,
                    "Huffman code width {} exceeds maximum of {} bits",
                    width, max
                )
            }
            Error::OutputBufferExhausted { capacity } => {
                write!(
                    f,
                    "Compressed output exceeds buffer capacity of {} bytes",
                    capacity
                )
            }
            Error::CorruptBlock(msg) => write!(f, "Corrupt block: {}", msg),
            Error::InvalidOptions(msg) => write!(f, "Invalid options: {}", msg),
            Error::Io(err) => write!(f, "I/O error: {}", err),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Self {
        Error::Io(err)
    }
}

impl Error {
    /// True for the encoder-side failures that are answered with a raw block.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Error::DictionaryOverflow { .. } | Error::OutputBufferExhausted { .. }
        )
    }
}
