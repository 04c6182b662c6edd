//! CidForge Core Library
//!
//! Primitives for deterministic content addressing:
//! - Bounded, lazy chunking of byte sources
//! - UnixFS-style file nodes with canonical DAG-PB encoding
//! - sha2-256 multihash digests
//! - CID assembly, parsing, and multibase text rendering
//!
//! Everything in this crate is a pure function of its input: the same
//! bytes always produce the same identifier.

pub mod chunk;
pub mod cid;
pub mod encoding;
pub mod error;
pub mod hash;
pub mod node;

mod varint;

pub use chunk::{Chunk, ChunkReader};
pub use cid::{Cid, CidVersion, Codec};
pub use encoding::Multibase;
pub use error::{CidError, Result};
pub use hash::{Hasher, Multihash};
pub use node::{FileNode, Link};

/// Chunk size used when splitting input into blocks (256 KiB)
pub const DEFAULT_CHUNK_SIZE: usize = 256 * 1024;

/// Hard ceiling on input size (100 MiB); enforced before any hashing
pub const MAX_INPUT_SIZE: u64 = 100 * 1024 * 1024;
