//! Lookup configuration.
//!
//! Everything the lookups need is passed in explicitly; nothing is read from
//! globals. The structs deserialize from JSON so a host application can keep
//! them in its own settings store.

use crate::error::LookupResult;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use whosigned_types::RelayEndpoint;

/// Default cap on events requested from each relay.
pub const DEFAULT_RECORD_LIMIT: usize = 100;

/// Default cap on profile revisions requested from each relay.
pub const DEFAULT_PROFILE_LIMIT: usize = 10;

/// Settings for the record fan-out.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FanOutConfig {
    /// Deadline for the whole fan-out (ms), shared by every relay.
    pub timeout_ms: u64,
    /// Maximum events requested from, and kept per, relay.
    pub limit: usize,
}

impl FanOutConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

impl Default for FanOutConfig {
    fn default() -> Self {
        Self {
            timeout_ms: 5_000,
            limit: DEFAULT_RECORD_LIMIT,
        }
    }
}

/// Settings for signer profile resolution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolverConfig {
    /// Relay asked first.
    pub preferred: RelayEndpoint,
    /// Relays asked in order when the preferred one has nothing.
    pub fallbacks: Vec<RelayEndpoint>,
    /// Deadline for each attempt (ms). Attempts are sequential, so each gets
    /// its own.
    pub attempt_timeout_ms: u64,
    /// Maximum profile revisions requested per relay.
    pub limit: usize,
    /// Whether to try the ambient transport after every listed relay.
    pub use_default_transport: bool,
}

impl ResolverConfig {
    pub fn attempt_timeout(&self) -> Duration {
        Duration::from_millis(self.attempt_timeout_ms)
    }
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            preferred: RelayEndpoint::named("Vertex Lab", "wss://relay.vertexlab.io"),
            fallbacks: vec![
                RelayEndpoint::named("Nostr.Band", "wss://relay.nostr.band"),
                RelayEndpoint::named("Damus", "wss://relay.damus.io"),
                RelayEndpoint::named("nos.lol", "wss://nos.lol"),
            ],
            attempt_timeout_ms: 10_000,
            limit: DEFAULT_PROFILE_LIMIT,
            use_default_transport: true,
        }
    }
}

/// Combined configuration for a `FileVerifier`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LookupConfig {
    pub records: FanOutConfig,
    pub identities: ResolverConfig,
}

impl LookupConfig {
    /// Parses a JSON document; omitted fields keep their defaults.
    pub fn from_json(json: &str) -> LookupResult<Self> {
        Ok(serde_json::from_str(json)?)
    }
}
