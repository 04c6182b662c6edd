//! UnixFS-style file nodes and their canonical DAG-PB encoding
//!
//! Two node shapes exist: a `Leaf` wrapping one chunk of file bytes, and a
//! `Root` aggregating child blocks through ordered links. The tagged enum
//! makes the invalid "payload and links together" state unrepresentable.
//!
//! Encoding is deterministic down to the byte: identical logical input
//! always serializes identically. This is the invariant that makes
//! "same content, same identifier" hold.

use crate::cid::Cid;
use crate::error::{CidError, Result};
use crate::varint;
use crate::MAX_INPUT_SIZE;
use bytes::Bytes;

// DAG-PB wire tags (field number << 3 | wire type). Links (field 2) are
// serialized before the payload (field 1), matching the canonical layout.
const NODE_DATA_TAG: u8 = 0x0a;
const NODE_LINK_TAG: u8 = 0x12;

// PBLink fields: Hash = 1 (child CID bytes), Name = 2 (always empty,
// always written), Tsize = 3 (child byte length).
const LINK_HASH_TAG: u8 = 0x0a;
const LINK_NAME_TAG: u8 = 0x12;
const LINK_TSIZE_TAG: u8 = 0x18;

// UnixFS Data message fields: Type = 1, Data = 2, filesize = 3.
const UNIXFS_TYPE_TAG: u8 = 0x08;
const UNIXFS_DATA_TAG: u8 = 0x12;
const UNIXFS_FILESIZE_TAG: u8 = 0x18;

/// UnixFS node type for regular files
const UNIXFS_TYPE_FILE: u64 = 2;

/// Link from a root node to one child block
#[derive(Debug, Clone)]
pub struct Link {
    /// CID of the child block
    pub cid: Cid,

    /// Byte length of the child's chunk
    pub size: u64,
}

/// A file node: one chunk of payload, or a links-only aggregation
#[derive(Debug, Clone)]
pub enum FileNode {
    /// Wraps one chunk's raw bytes as a file payload, no links
    Leaf { data: Bytes },

    /// Empty payload, one link per child chunk in original order
    Root { links: Vec<Link> },
}

impl FileNode {
    /// Create a leaf node over `data`
    pub fn leaf(data: impl Into<Bytes>) -> Self {
        FileNode::Leaf { data: data.into() }
    }

    /// Create a root node linking the given children, in order
    pub fn root(links: Vec<Link>) -> Self {
        FileNode::Root { links }
    }

    /// Canonical DAG-PB encoding of this node
    pub fn encode(&self) -> Result<Vec<u8>> {
        match self {
            FileNode::Leaf { data } => {
                if data.len() as u64 > MAX_INPUT_SIZE {
                    return Err(CidError::NodeEncoding(format!(
                        "leaf payload of {} bytes exceeds the input ceiling",
                        data.len()
                    )));
                }
                Ok(encode_node(&unixfs_file(data), &[]))
            }
            FileNode::Root { links } => Ok(encode_node(&unixfs_file(&[]), links)),
        }
    }
}

/// UnixFS `Data` message for a regular file.
///
/// `Type` is always written; `Data` is omitted when empty; `filesize` is
/// always written, zero for the links-only root.
fn unixfs_file(data: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(data.len() + 12);
    out.push(UNIXFS_TYPE_TAG);
    varint::write(&mut out, UNIXFS_TYPE_FILE);
    if !data.is_empty() {
        out.push(UNIXFS_DATA_TAG);
        varint::write(&mut out, data.len() as u64);
        out.extend_from_slice(data);
    }
    out.push(UNIXFS_FILESIZE_TAG);
    varint::write(&mut out, data.len() as u64);
    out
}

fn encode_node(payload: &[u8], links: &[Link]) -> Vec<u8> {
    let mut out = Vec::with_capacity(payload.len() + links.len() * 48 + 8);
    for link in links {
        let cid_bytes = link.cid.to_bytes();
        let mut body = Vec::with_capacity(cid_bytes.len() + 8);
        body.push(LINK_HASH_TAG);
        varint::write(&mut body, cid_bytes.len() as u64);
        body.extend_from_slice(&cid_bytes);
        body.push(LINK_NAME_TAG);
        body.push(0);
        body.push(LINK_TSIZE_TAG);
        varint::write(&mut body, link.size);

        out.push(NODE_LINK_TAG);
        varint::write(&mut out, body.len() as u64);
        out.extend_from_slice(&body);
    }
    out.push(NODE_DATA_TAG);
    varint::write(&mut out, payload.len() as u64);
    out.extend_from_slice(payload);
    out
}
