//! Lazy chunking of byte sources
//!
//! `ChunkReader` splits a `Read` source into ordered, bounded-size chunks
//! without ever holding more than one chunk in memory. A read failure ends
//! the iteration immediately; there are no retries.

use crate::error::{CidError, Result};
use bytes::Bytes;
use std::io::Read;

/// A single chunk of input, scoped to one traversal
#[derive(Debug, Clone)]
pub struct Chunk {
    /// Byte offset of this chunk within the source
    pub offset: u64,

    /// Raw chunk data
    pub data: Bytes,
}

impl Chunk {
    /// Chunk length in bytes
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Check if the chunk is empty
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// Iterator producing ordered chunks of at most `chunk_size` bytes.
///
/// Every chunk except the last is exactly `chunk_size` bytes long.
pub struct ChunkReader<R> {
    reader: R,
    chunk_size: usize,
    offset: u64,
    done: bool,
}

impl<R: Read> ChunkReader<R> {
    /// Create a new chunk reader over `reader`.
    ///
    /// `chunk_size` must be greater than zero.
    pub fn new(reader: R, chunk_size: usize) -> Result<Self> {
        if chunk_size == 0 {
            return Err(CidError::Configuration(
                "chunk size must be > 0".to_string(),
            ));
        }
        Ok(Self {
            reader,
            chunk_size,
            offset: 0,
            done: false,
        })
    }
}

impl<R: Read> Iterator for ChunkReader<R> {
    type Item = Result<Chunk>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        let mut buf = vec![0u8; self.chunk_size];
        let mut filled = 0;

        // Short reads are normal for files and pipes; keep filling until the
        // chunk is complete or the source is exhausted.
        while filled < self.chunk_size {
            match self.reader.read(&mut buf[filled..]) {
                Ok(0) => break,
                Ok(n) => filled += n,
                Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
                Err(e) => {
                    self.done = true;
                    return Some(Err(CidError::Io(e)));
                }
            }
        }

        if filled == 0 {
            self.done = true;
            return None;
        }

        buf.truncate(filled);
        let chunk = Chunk {
            offset: self.offset,
            data: Bytes::from(buf),
        };
        self.offset += filled as u64;
        Some(Ok(chunk))
    }
}
