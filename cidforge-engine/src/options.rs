//! Options controlling CID calculation

use cidforge_core::{CidVersion, Codec, Multibase};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default wall-clock budget for one calculation (30 seconds)
pub const DEFAULT_TIMEOUT_MS: u64 = 30_000;

/// Options for [`calculate_cid`](crate::calculate_cid) and
/// [`convert_cid`](crate::convert_cid)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CidOptions {
    /// CID version to produce
    pub version: CidVersion,

    /// Content codec: dag-pb file nodes, or raw bytes
    pub format: Codec,

    /// Text encoding of the result (v1 only; v0 is always legacy base58)
    pub encoding: Multibase,

    /// Split input larger than one chunk into a single-level DAG
    pub use_chunking: bool,

    /// Reserved; kept for configuration compatibility, currently unread
    pub normalize: bool,

    /// Wall-clock budget for the whole calculation, in milliseconds
    pub timeout_ms: u64,
}

impl Default for CidOptions {
    fn default() -> Self {
        Self {
            version: CidVersion::V1,
            format: Codec::DagPb,
            encoding: Multibase::Base32,
            use_chunking: true,
            normalize: true,
            timeout_ms: DEFAULT_TIMEOUT_MS,
        }
    }
}

impl CidOptions {
    /// Set the CID version
    pub fn with_version(mut self, version: CidVersion) -> Self {
        self.version = version;
        self
    }

    /// Set the content codec
    pub fn with_format(mut self, format: Codec) -> Self {
        self.format = format;
        self
    }

    /// Set the text encoding
    pub fn with_encoding(mut self, encoding: Multibase) -> Self {
        self.encoding = encoding;
        self
    }

    /// Enable or disable chunking
    pub fn with_chunking(mut self, use_chunking: bool) -> Self {
        self.use_chunking = use_chunking;
        self
    }

    /// Set the calculation timeout in milliseconds
    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    /// The timeout as a `Duration`
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}
