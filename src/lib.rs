//! # tree_huff
//!
//! Lossless Huffman compression with the code tree stored in the compressed
//! stream, so decompression needs nothing but the compressed bytes.
//!
//! A compressed stream is laid out as:
//!
//! 1. the 32-bit magic number [`HUFF_MAGIC`],
//! 2. the tree header (see [`header`]),
//! 3. one prefix code per input byte, in input order,
//! 4. the code for [`END_OF_STREAM`], followed by zero padding to a byte boundary.
//!
//! ## Quick Start
//!
//! ```rust
//! use tree_huff::HuffmanCodec;
//!
//! let codec = HuffmanCodec::default();
//! let packed = codec.compress_bytes(b"abracadabra")?;
//! let unpacked = codec.decompress_bytes(&packed)?;
//! assert_eq!(unpacked, b"abracadabra");
//! # Ok::<(), tree_huff::HuffError>(())
//! ```

pub mod bit_io;
pub mod bit_vec;
pub mod code_table;
pub mod error;
pub mod frequency;
pub mod header;
pub mod huffman_codec;
pub mod hufftree;

// Internal modules - not part of public API
mod min_heap;

// Re-export main types for convenience
pub use bit_io::{BitReader, BitSink, BitSource, BitWriter, Rewind};
pub use code_table::CodeTable;
pub use error::{HuffError, Result};
pub use frequency::FrequencyTable;
pub use huffman_codec::{compress, decompress, CodecConfig, CodecStats, DebugLevel, HuffmanCodec};
pub use hufftree::{HuffNode, HuffmanTree};

/// Width of one input chunk
pub const BITS_PER_WORD: u8 = 8;
/// Width of the magic number
pub const BITS_PER_INT: u8 = 32;
/// Width of a leaf value in the tree header, wide enough for 0..=256
pub const SYMBOL_BITS: u8 = BITS_PER_WORD + 1;
/// Synthetic symbol marking the logical end of the encoded data
pub const END_OF_STREAM: u16 = 1 << BITS_PER_WORD;
/// 256 byte values plus [`END_OF_STREAM`]
pub const ALPHABET_SIZE: usize = END_OF_STREAM as usize + 1;
/// Leading 32 bits of every compressed stream
pub const HUFF_MAGIC: u32 = 0xface_8200 | 1;
