//! # huffpack
//!
//! Static Huffman compression of whole files into a small container: a
//! header with the byte-frequency table followed by the packed code bits.
//! The decoder rebuilds the exact same tree from the stored frequencies, so
//! no code table is ever written out.
//!
//! ## Quick Start
//!
//! ```no_run
//! use huffpack::HuffmanCodec;
//! use std::fs::File;
//!
//! // Compress a file
//! let input = File::open("input.txt")?;
//! let output = File::create("input.txt.huff")?;
//! HuffmanCodec::encode_from_file(input, output)?;
//!
//! // Decompress a file
//! let compressed = File::open("input.txt.huff")?;
//! let decompressed = File::create("output.txt")?;
//! HuffmanCodec::decode_from_file(compressed, decompressed)?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! In memory:
//!
//! ```
//! use huffpack::HuffmanCodec;
//!
//! let packed = HuffmanCodec::compress_to_vec(b"aaab")?;
//! assert_eq!(HuffmanCodec::decompress_bytes(&packed)?, b"aaab");
//! # Ok::<(), huffpack::HuffmanError>(())
//! ```

pub mod code_table;
pub mod container;
pub mod error;
pub mod frequency;
pub mod huffman_codec;
pub mod hufftree;
pub mod priority_queue;

// Internal modules - not part of public API
mod bit_vec;
mod bitstream;

// Re-export main types for convenience
pub use code_table::{Code, CodeTable};
pub use container::ContainerHeader;
pub use error::{HuffmanError, Result};
pub use frequency::FrequencyTable;
pub use huffman_codec::{CompressionStats, HuffmanCodec};
pub use hufftree::{HuffNode, HuffmanTree};
