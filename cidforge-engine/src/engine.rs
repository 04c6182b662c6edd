//! CID calculation pipeline
//!
//! Orchestrates the whole derivation: size gate, codec dispatch,
//! chunking, per-block hashing, root aggregation, and text rendering.
//! The computation runs on a blocking thread and races a wall-clock
//! timer; when the timer wins, the caller sees a timeout and the
//! abandoned task's eventual result is discarded.

use crate::options::CidOptions;
use crate::source::ByteSource;
use bytes::Bytes;
use cidforge_core::cid::ensure_version_codec;
use cidforge_core::{
    Cid, CidError, CidVersion, ChunkReader, Codec, FileNode, Hasher, Link, Multihash, Result,
    DEFAULT_CHUNK_SIZE, MAX_INPUT_SIZE,
};
use std::io::Read;
use tracing::debug;

/// Parsed-or-textual CID argument for [`convert_cid`]
pub enum CidRef<'a> {
    Parsed(&'a Cid),
    Text(&'a str),
}

impl<'a> From<&'a Cid> for CidRef<'a> {
    fn from(cid: &'a Cid) -> Self {
        CidRef::Parsed(cid)
    }
}

impl<'a> From<&'a str> for CidRef<'a> {
    fn from(s: &'a str) -> Self {
        CidRef::Text(s)
    }
}

impl<'a> From<&'a String> for CidRef<'a> {
    fn from(s: &'a String) -> Self {
        CidRef::Text(s)
    }
}

/// Calculate the CID string for a byte source.
///
/// The whole operation races the timeout in `options`; on expiry the call
/// returns [`CidError::Timeout`] and no partial CID is ever surfaced.
pub async fn calculate_cid(
    source: impl Into<ByteSource>,
    options: CidOptions,
) -> Result<String> {
    let source = source.into();
    let timeout_ms = options.timeout_ms;
    let task = tokio::task::spawn_blocking(move || compute(&source, &options));
    match tokio::time::timeout(std::time::Duration::from_millis(timeout_ms), task).await {
        Ok(Ok(result)) => result,
        Ok(Err(join_err)) => Err(CidError::Internal(format!(
            "CID calculation task failed: {join_err}"
        ))),
        Err(_) => Err(CidError::Timeout { timeout_ms }),
    }
}

/// Parse a CID string into its `{version, codec, multihash}` parts
pub fn parse_cid(s: &str) -> Result<Cid> {
    Cid::parse(s)
}

/// Re-render a CID in a different version or text encoding.
///
/// Only the presentation changes; the multihash is preserved bit-for-bit.
pub fn convert_cid<'a>(cid: impl Into<CidRef<'a>>, options: &CidOptions) -> Result<String> {
    let cid = match cid.into() {
        CidRef::Parsed(cid) => cid.clone(),
        CidRef::Text(s) => Cid::parse(s)?,
    };
    let converted = match options.version {
        CidVersion::V0 => cid.to_v0()?,
        CidVersion::V1 => cid.to_v1(),
    };
    Ok(converted.to_string_of_base(options.encoding))
}

/// Recompute the CID of `source` and compare it against `expected`,
/// typically the identifier returned by a pinning service.
///
/// Comparison is by codec and multihash, so the version and text encoding
/// of `expected` do not matter. The local computation uses the default
/// chunked layout; a remote peer that chunked differently will produce a
/// different multihash for the same bytes.
pub async fn verify_cid(source: impl Into<ByteSource>, expected: &str) -> Result<bool> {
    let want = Cid::parse(expected)?;
    let options = CidOptions {
        format: want.codec(),
        ..CidOptions::default()
    };
    let got = Cid::parse(&calculate_cid(source, options).await?)?;
    Ok(got.codec() == want.codec() && got.multihash() == want.multihash())
}

/// Whether two CID strings address the same content: equal codec and
/// multihash, ignoring version and text encoding.
pub fn same_content(a: &str, b: &str) -> Result<bool> {
    let a = Cid::parse(a)?;
    let b = Cid::parse(b)?;
    Ok(a.codec() == b.codec() && a.multihash() == b.multihash())
}

fn compute(source: &ByteSource, options: &CidOptions) -> Result<String> {
    let size = source.len()?;
    if size > MAX_INPUT_SIZE {
        return Err(CidError::SizeExceeded {
            size,
            max: MAX_INPUT_SIZE,
        });
    }
    // Impossible version/codec requests fail before the input is touched.
    ensure_version_codec(options.version, options.format)?;

    debug!(size, format = %options.format, version = ?options.version, "calculating CID");

    let cid = match options.format {
        Codec::Raw => raw_cid(source, options.version)?,
        Codec::DagPb => {
            if !options.use_chunking || size <= DEFAULT_CHUNK_SIZE as u64 {
                single_block_cid(source, options.version)?
            } else {
                chunked_cid(&mut source.open()?, DEFAULT_CHUNK_SIZE, options.version)?
            }
        }
    };

    Ok(cid.to_string_of_base(options.encoding))
}

/// Hash the entire byte sequence directly, with no DAG wrapping
fn raw_cid(source: &ByteSource, version: CidVersion) -> Result<Cid> {
    let mut reader = source.open()?;
    let mut hasher = Hasher::new();
    std::io::copy(&mut reader, &mut hasher)?;
    Cid::new(version, Codec::Raw, hasher.finalize())
}

/// One leaf node over the whole input, no root indirection
fn single_block_cid(source: &ByteSource, version: CidVersion) -> Result<Cid> {
    let mut reader = source.open()?;
    let mut data = Vec::new();
    reader.read_to_end(&mut data)?;
    block_cid(FileNode::leaf(data), version)
}

/// Encode a node and wrap its digest in a CID
fn block_cid(node: FileNode, version: CidVersion) -> Result<Cid> {
    let encoded = node.encode()?;
    Cid::new(version, Codec::DagPb, Multihash::sha2_256(&encoded))
}

/// Stream the input in chunks, hash a leaf per chunk, and aggregate.
///
/// Root construction is the synchronization barrier: every child CID must
/// be known, and the link order is the original chunk order.
fn chunked_cid(reader: &mut dyn Read, chunk_size: usize, version: CidVersion) -> Result<Cid> {
    let mut links: Vec<Link> = Vec::new();
    for chunk in ChunkReader::new(reader, chunk_size)? {
        let chunk = chunk?;
        let size = chunk.len() as u64;
        let cid = block_cid(FileNode::leaf(chunk.data), version)?;
        links.push(Link { cid, size });
    }
    debug!(blocks = links.len(), "chunk blocks hashed");

    match links.as_slice() {
        // an empty input encodes the same as a link-less root
        [] => block_cid(FileNode::leaf(Bytes::new()), version),
        // a single remaining block needs no root indirection
        [only] => Ok(only.cid.clone()),
        _ => block_cid(FileNode::root(links), version),
    }
}
