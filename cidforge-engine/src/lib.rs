//! CidForge Engine
//!
//! The orchestration layer over `cidforge-core`:
//! - `calculate_cid`: bytes in, CID string out, with size gating,
//!   chunked single-level DAG construction, and timeout enforcement
//! - `parse_cid` / `convert_cid`: textual round trips between versions
//!   and base encodings
//! - `verify_cid` / `same_content`: integrity comparison against
//!   identifiers produced elsewhere
//!
//! The engine holds no state across calls: every calculation is a pure
//! function of its input bytes and options, so concurrent calls are
//! independent and a failed call is safe to retry unchanged.

pub mod engine;
pub mod options;
pub mod source;

pub use engine::{calculate_cid, convert_cid, parse_cid, same_content, verify_cid, CidRef};
pub use options::{CidOptions, DEFAULT_TIMEOUT_MS};
pub use source::ByteSource;

pub use cidforge_core::{
    Cid, CidError, CidVersion, Codec, Multibase, Multihash, Result, DEFAULT_CHUNK_SIZE,
    MAX_INPUT_SIZE,
};
