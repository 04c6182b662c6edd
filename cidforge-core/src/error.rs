//! Error types for CidForge
//!
//! Provides a unified error type for all content-addressing operations.

use thiserror::Error;

/// Result type alias for CidForge operations
pub type Result<T> = std::result::Result<T, CidError>;

/// Unified error type for CidForge
///
/// Component-level failures bubble up unmodified when they are already of
/// this kind; anything else is wrapped exactly once at the engine boundary.
#[derive(Error, Debug)]
pub enum CidError {
    // ===== Input Errors =====
    #[error("Input size {size} exceeds maximum allowed size of {max} bytes")]
    SizeExceeded { size: u64, max: u64 },

    #[error("Invalid configuration: {0}")]
    Configuration(String),

    // ===== Encoding Errors =====
    #[error("Failed to build node: {0}")]
    NodeEncoding(String),

    #[error("Hashing failed: {0}")]
    Hashing(String),

    #[error("Invalid version/codec combination: {0}")]
    VersionCodec(String),

    #[error("Failed to parse CID: {0}")]
    Parse(String),

    // ===== Engine Errors =====
    #[error("CID calculation timed out after {timeout_ms} ms")]
    Timeout { timeout_ms: u64 },

    // ===== I/O Errors =====
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    // ===== Generic Errors =====
    #[error("Internal error: {0}")]
    Internal(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = CidError::SizeExceeded {
            size: 200,
            max: 100,
        };
        assert_eq!(
            err.to_string(),
            "Input size 200 exceeds maximum allowed size of 100 bytes"
        );
    }

    #[test]
    fn test_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: CidError = io_err.into();
        assert!(matches!(err, CidError::Io(_)));
    }

    #[test]
    fn test_timeout_display() {
        let err = CidError::Timeout { timeout_ms: 30000 };
        assert_eq!(err.to_string(), "CID calculation timed out after 30000 ms");
    }
}
