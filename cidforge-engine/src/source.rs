//! Restartable byte sources
//!
//! The engine needs two things from its input: the total size up front
//! (the 100 MiB gate runs before any hashing) and an incremental reader
//! that never forces the whole content into memory. `ByteSource` provides
//! both, and can be reopened for a fresh traversal.

use bytes::Bytes;
use cidforge_core::Result;
use std::fs::File;
use std::io::{Cursor, Read};
use std::path::PathBuf;

/// Input to the CID engine
#[derive(Debug, Clone)]
pub enum ByteSource {
    /// In-memory bytes
    Memory(Bytes),

    /// File on disk, read incrementally
    File(PathBuf),
}

impl ByteSource {
    /// Source backed by a file path
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        ByteSource::File(path.into())
    }

    /// Total size in bytes, known before any read
    pub fn len(&self) -> Result<u64> {
        match self {
            ByteSource::Memory(bytes) => Ok(bytes.len() as u64),
            ByteSource::File(path) => Ok(std::fs::metadata(path)?.len()),
        }
    }

    /// Whether the source holds no bytes
    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }

    /// Open a fresh reader over the full content
    pub fn open(&self) -> Result<Box<dyn Read + Send>> {
        match self {
            ByteSource::Memory(bytes) => Ok(Box::new(Cursor::new(bytes.clone()))),
            ByteSource::File(path) => Ok(Box::new(File::open(path)?)),
        }
    }
}

impl From<Bytes> for ByteSource {
    fn from(bytes: Bytes) -> Self {
        ByteSource::Memory(bytes)
    }
}

impl From<Vec<u8>> for ByteSource {
    fn from(bytes: Vec<u8>) -> Self {
        ByteSource::Memory(Bytes::from(bytes))
    }
}

impl From<&[u8]> for ByteSource {
    fn from(bytes: &[u8]) -> Self {
        ByteSource::Memory(Bytes::copy_from_slice(bytes))
    }
}

impl From<PathBuf> for ByteSource {
    fn from(path: PathBuf) -> Self {
        ByteSource::File(path)
    }
}
