//! Typed errors for attribution and storage operations.

use thiserror::Error;

/// Errors that can occur while building or persisting an attribution.
#[derive(Debug, Error)]
pub enum AttributionError {
    /// Page URL is not an absolute URL
    #[error("invalid page URL: {url}")]
    InvalidUrl { url: String },

    /// Stored payload is not valid base64
    #[error("envelope is not valid base64: {0}")]
    EnvelopeEncoding(#[from] base64::DecodeError),

    /// Stored payload does not contain a record
    #[error("envelope payload is not a record: {0}")]
    EnvelopePayload(#[from] serde_json::Error),
}

/// Errors raised by a storage backend.
///
/// The engine never surfaces these to its callers: reads that fail are
/// treated as absent entries and failed writes are dropped.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Backend is disabled or not reachable from this context
    #[error("storage unavailable: {0}")]
    Unavailable(String),

    /// Backend refused the write (quota, policy)
    #[error("write rejected for {key}: {reason}")]
    WriteRejected { key: String, reason: String },
}

/// Result type alias for attribution operations.
pub type AttributionResult<T> = std::result::Result<T, AttributionError>;

/// Result type alias for storage operations.
pub type StorageResult<T> = std::result::Result<T, StorageError>;
