//! Error handling for compression and decompression.
//!
//! Every failure surfaced by [`HuffmanCodec`](crate::HuffmanCodec) is one of
//! four kinds, so callers can tell a foreign file from a damaged one without
//! parsing messages.

use thiserror::Error;

use crate::HUFF_MAGIC;

/// Main error type for the codec
#[derive(Error, Debug)]
pub enum HuffError {
    /// The leading 32 bits are not the format's magic number
    #[error("invalid magic number: expected {expected:#010x}, found {}", describe_magic(.found))]
    InvalidMagic {
        /// Magic number this crate writes
        expected: u32,
        /// What was read instead, `None` when the input held fewer than 32 bits
        found: Option<u32>,
    },

    /// The tree header is truncated or does not follow the header grammar
    #[error("malformed header: {reason}")]
    MalformedHeader {
        /// What the header reader tripped over
        reason: String,
    },

    /// The encoded payload ended or diverged before the end-of-stream code
    #[error("corrupt data: {reason}")]
    CorruptData {
        /// What the decoder tripped over
        reason: String,
    },

    /// Failure reported by the underlying bit source or sink
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

fn describe_magic(found: &Option<u32>) -> String {
    match found {
        Some(value) => format!("{value:#010x}"),
        None => "end of input".to_string(),
    }
}

impl HuffError {
    /// Create an invalid magic error for the value that was read
    pub fn invalid_magic(found: Option<u32>) -> Self {
        Self::InvalidMagic {
            expected: HUFF_MAGIC,
            found,
        }
    }

    /// Create a malformed header error
    pub fn malformed_header<S: Into<String>>(reason: S) -> Self {
        Self::MalformedHeader {
            reason: reason.into(),
        }
    }

    /// Create a corrupt data error
    pub fn corrupt_data<S: Into<String>>(reason: S) -> Self {
        Self::CorruptData {
            reason: reason.into(),
        }
    }

    /// Get the error category for logging
    pub fn category(&self) -> &'static str {
        match self {
            Self::InvalidMagic { .. } => "magic",
            Self::MalformedHeader { .. } => "header",
            Self::CorruptData { .. } => "data",
            Self::Io(_) => "io",
        }
    }
}

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, HuffError>;
