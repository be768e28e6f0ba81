//! Core type definitions for Who Signed This File?
//!
//! This crate defines the value types shared by the lookup engine and its
//! callers:
//! - Content hashes (SHA-256, 64 hex characters)
//! - Wire events as delivered by a relay, and validated file metadata records
//! - Relay endpoints
//! - Signer profiles and their display helpers
//!
//! The `validate` module is the single source of truth for what the lookup
//! engine accepts. Nothing here performs I/O.

mod display;
mod endpoint;
mod event;
mod hash;
mod profile;
mod record;
pub mod validate;

pub use display::{format_file_size, generate_user_name};
pub use endpoint::RelayEndpoint;
pub use event::{RawEvent, Tag};
pub use hash::ContentHash;
pub use profile::{ProfileMetadata, ProfileRecord, PROFILE_KIND};
pub use record::{FileRecord, RecordKind};

/// Result type alias using the crate's error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur when parsing or validating types.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    #[error("please enter a file hash")]
    EmptyHash,

    #[error("invalid hash format, expected 64 hex characters: {0:?}")]
    InvalidHash(String),

    #[error("invalid public key, expected 64 hex characters: {0:?}")]
    InvalidPublicKey(String),

    #[error("unsupported event kind {0}")]
    UnsupportedKind(u16),

    #[error("missing required tag {0:?}")]
    MissingTag(&'static str),
}
