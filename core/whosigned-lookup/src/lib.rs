//! Relay lookups for Who Signed This File?
//!
//! Given a SHA-256 content hash, finds every signed file metadata record for
//! it across a set of unreliable relays, and resolves who signed each one.
//!
//! # Architecture
//!
//! - **Transport**: `RelayConnector`/`RelayTransport` abstract the relay
//!   client; this crate never speaks the wire protocol
//! - **Fan-out**: `FederatedRecordQuery` queries every relay concurrently
//!   under one deadline and merges validated records by id
//! - **Resolver**: `FallbackIdentityResolver` asks relays for a signer's
//!   profile one at a time until one has it
//! - **Verifier**: `FileVerifier` runs both for one hash
//!
//! ## Failure model
//!
//! Relays failing is normal. Only a malformed hash or key, or cancellation,
//! fails an operation; everything else yields fewer results.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use whosigned_lookup::transport::mock::MockConnector;
//! use whosigned_lookup::{CancelSignal, FileVerifier, LookupConfig, LookupError};
//!
//! # tokio_test_block_on(async {
//! let verifier = FileVerifier::new(Arc::new(MockConnector::new()), LookupConfig::default());
//! let result = verifier.verify("not-a-hash", &[], &CancelSignal::never()).await;
//! assert!(matches!(result, Err(LookupError::InvalidHash(_))));
//! # });
//! # fn tokio_test_block_on<F: std::future::Future>(f: F) -> F::Output {
//! #     tokio::runtime::Builder::new_current_thread().enable_all().build().unwrap().block_on(f)
//! # }
//! ```

mod cancel;
mod config;
mod error;
mod fanout;
mod filter;
mod resolver;
pub mod transport;
mod verify;

pub use cancel::{CancelHandle, CancelSignal, QuerySignal};
pub use config::{
    FanOutConfig, LookupConfig, ResolverConfig, DEFAULT_PROFILE_LIMIT, DEFAULT_RECORD_LIMIT,
};
pub use error::{LookupError, LookupResult};
pub use fanout::{EndpointReport, EndpointStatus, FederatedRecordQuery, QuerySource, RecordSet};
pub use filter::Filter;
pub use resolver::{FallbackIdentityResolver, ProfileOutcome, Provenance};
pub use transport::{RelayConnector, RelayTransport};
pub use verify::{FileVerifier, SignerView, VerifiedSignature, Verification};
