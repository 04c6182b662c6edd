//! sha2-256 digests and the self-describing multihash wrapper

use crate::error::{CidError, Result};
use crate::varint;
use sha2::{Digest, Sha256};
use std::fmt;

/// Multicodec code for sha2-256
pub const SHA2_256_CODE: u64 = 0x12;

/// Digest length of sha2-256 in bytes
pub const SHA2_256_LEN: usize = 32;

/// Self-describing digest: `{algorithm code, digest bytes}`.
///
/// Produced digests are always sha2-256; parsing accepts any algorithm
/// code so foreign CIDs survive a parse/convert round trip.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Multihash {
    code: u64,
    digest: Vec<u8>,
}

impl Multihash {
    /// One-shot sha2-256 multihash of `data`
    pub fn sha2_256(data: &[u8]) -> Self {
        let mut hasher = Hasher::new();
        hasher.update(data);
        hasher.finalize()
    }

    /// Wrap an existing digest with its algorithm code
    pub fn from_digest(code: u64, digest: Vec<u8>) -> Result<Self> {
        if digest.is_empty() {
            return Err(CidError::Hashing("empty digest".to_string()));
        }
        Ok(Self { code, digest })
    }

    /// The multicodec algorithm code
    pub fn code(&self) -> u64 {
        self.code
    }

    /// The raw digest bytes
    pub fn digest(&self) -> &[u8] {
        &self.digest
    }

    /// Whether this is a sha2-256 multihash of the expected length
    pub fn is_sha2_256(&self) -> bool {
        self.code == SHA2_256_CODE && self.digest.len() == SHA2_256_LEN
    }

    /// Serialize to the multihash wire form: varint code, varint length, digest
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(4 + self.digest.len());
        varint::write(&mut out, self.code);
        varint::write(&mut out, self.digest.len() as u64);
        out.extend_from_slice(&self.digest);
        out
    }

    /// Decode a multihash from the front of `buf`.
    ///
    /// Returns the multihash and the number of bytes consumed.
    pub fn read_from(buf: &[u8]) -> Result<(Self, usize)> {
        let (code, n) = varint::read(buf)?;
        let (len, m) = varint::read(&buf[n..])?;
        let start = n + m;
        let len = usize::try_from(len)
            .map_err(|_| CidError::Parse("multihash digest length overflows".to_string()))?;
        let end = start
            .checked_add(len)
            .ok_or_else(|| CidError::Parse("multihash digest length overflows".to_string()))?;
        if end > buf.len() {
            return Err(CidError::Parse("truncated multihash".to_string()));
        }
        if len == 0 {
            return Err(CidError::Parse("empty multihash digest".to_string()));
        }
        Ok((
            Self {
                code,
                digest: buf[start..end].to_vec(),
            },
            end,
        ))
    }
}

impl fmt::Debug for Multihash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let head = &self.digest[..self.digest.len().min(8)];
        write!(f, "Multihash(0x{:x}:{}..)", self.code, hex::encode(head))
    }
}

/// Incremental sha2-256 hasher producing a [`Multihash`].
///
/// Implements `io::Write` so whole streams can be digested with
/// `std::io::copy` without buffering.
pub struct Hasher {
    inner: Sha256,
}

impl Hasher {
    /// Create a new hasher
    pub fn new() -> Self {
        Self {
            inner: Sha256::new(),
        }
    }

    /// Feed more bytes into the digest
    pub fn update(&mut self, data: &[u8]) {
        self.inner.update(data);
    }

    /// Finish and produce the multihash
    pub fn finalize(self) -> Multihash {
        Multihash {
            code: SHA2_256_CODE,
            digest: self.inner.finalize().to_vec(),
        }
    }
}

impl Default for Hasher {
    fn default() -> Self {
        Self::new()
    }
}

impl std::io::Write for Hasher {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.update(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}
