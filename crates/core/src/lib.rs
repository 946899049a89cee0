//! huffpack-core: byte-oriented Huffman compression
//!
//! This library compresses arbitrary bytes with a Huffman code built from
//! the input's own byte frequencies, and restores them from a single
//! persisted artifact.
//!
//! # Architecture
//!
//! Leaves first:
//! - `frequency`: byte occurrence counts
//! - `tree`: arena-owned Huffman tree with a deterministic tie-break
//! - `code`: symbol → bit sequence table
//! - `bitio`: MSB-first bit packing bounded by a logical bit length
//! - `artifact`: versioned, checksummed persisted format
//! - `codec`: encode/decode orchestration and file-level operations
//! - `stats`: observable compression figures
//!
//! # Example
//!
//! ```
//! use huffpack_core::{codec, Artifact};
//!
//! let encoded = codec::encode(b"aaab").unwrap();
//! assert_eq!(encoded.artifact.bit_len(), 4);
//!
//! let bytes = encoded.artifact.to_bytes();
//! let artifact = Artifact::from_bytes(&bytes).unwrap();
//! assert_eq!(codec::decode(&artifact).unwrap(), b"aaab");
//! ```
//!
//! # Design Principles
//!
//! - **No panics**: All errors are structured and recoverable
//! - **Deterministic**: Trees depend only on the frequency table
//! - **Single source of truth**: Decoding rebuilds the tree from the table
//! - **No global state**: Every call owns its table, tree and buffers

pub mod artifact;
pub mod bitio;
pub mod code;
pub mod codec;
pub mod error;
pub mod frequency;
pub mod stats;
pub mod tree;

// Re-export commonly used types
pub use artifact::Artifact;
pub use code::{Code, CodeTable};
pub use codec::{decode, encode, Encoded};
pub use error::{Error, Result};
pub use frequency::FrequencyTable;
pub use stats::Stats;
pub use tree::HuffmanTree;
