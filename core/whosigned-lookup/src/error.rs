//! Error types for the lookup layer.

use thiserror::Error;

/// Result type for lookup operations.
pub type LookupResult<T> = Result<T, LookupError>;

/// Errors that can occur in lookup operations.
///
/// Only `InvalidHash`, `InvalidSigner` and `Cancelled` ever escape the public
/// query operations; the rest describe why a single relay contributed
/// nothing and end up in per-endpoint reports.
#[derive(Debug, Error)]
pub enum LookupError {
    /// The hash is not 64 hex characters. No relay was contacted.
    #[error("invalid hash format, expected 64 hex characters: {0:?}")]
    InvalidHash(String),

    /// The signer is not a hex public key. No relay was contacted.
    #[error("invalid signer public key: {0:?}")]
    InvalidSigner(String),

    /// Network error.
    #[error("network error: {0}")]
    Network(String),

    /// Protocol error (malformed relay response).
    #[error("protocol error: {0}")]
    Protocol(String),

    /// Serialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The deadline passed before the relay answered.
    #[error("operation timed out")]
    Timeout,

    /// The caller cancelled the operation.
    #[error("operation cancelled")]
    Cancelled,
}
