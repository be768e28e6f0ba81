//! Signer identity resolution with relay fallback.
//!
//! Resolves a signer's public key to its profile by asking relays one at a
//! time:
//! 1. The preferred relay
//! 2. Each fallback relay, in order
//! 3. The ambient transport, if enabled
//!
//! The first relay that returns a profile event wins, and the result records
//! which one it was. Attempts that error or time out count as "nothing here".

use crate::cancel::{CancelSignal, QuerySignal};
use crate::config::ResolverConfig;
use crate::error::{LookupError, LookupResult};
use crate::filter::Filter;
use crate::transport::{query_endpoint, RelayConnector};
use serde::Serialize;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info, warn};
use whosigned_types::validate::is_valid_public_key;
use whosigned_types::{ProfileRecord, RawEvent, RelayEndpoint, PROFILE_KIND};

/// Which attempt supplied a profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Provenance {
    Preferred { endpoint: RelayEndpoint },
    /// `index` is the position in the fallback list.
    Fallback { index: usize, endpoint: RelayEndpoint },
    Default,
}

impl Provenance {
    /// The relay that answered, unless it was the ambient transport.
    pub fn endpoint(&self) -> Option<&RelayEndpoint> {
        match self {
            Provenance::Preferred { endpoint } | Provenance::Fallback { endpoint, .. } => {
                Some(endpoint)
            }
            Provenance::Default => None,
        }
    }

    pub fn is_preferred(&self) -> bool {
        matches!(self, Provenance::Preferred { .. })
    }
}

impl fmt::Display for Provenance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Provenance::Preferred { endpoint } => write!(f, "preferred relay {endpoint}"),
            Provenance::Fallback { index, endpoint } => {
                write!(f, "fallback relay #{} {endpoint}", index + 1)
            }
            Provenance::Default => f.write_str("default transport"),
        }
    }
}

/// Result of resolving one signer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum ProfileOutcome {
    /// A profile event exists. Its metadata may still be unparseable.
    Found {
        profile: ProfileRecord,
        provenance: Provenance,
    },
    /// No relay had a profile event for this signer.
    NotFound,
}

impl ProfileOutcome {
    pub fn is_found(&self) -> bool {
        matches!(self, ProfileOutcome::Found { .. })
    }

    pub fn profile(&self) -> Option<&ProfileRecord> {
        match self {
            ProfileOutcome::Found { profile, .. } => Some(profile),
            ProfileOutcome::NotFound => None,
        }
    }

    pub fn provenance(&self) -> Option<&Provenance> {
        match self {
            ProfileOutcome::Found { provenance, .. } => Some(provenance),
            ProfileOutcome::NotFound => None,
        }
    }
}

/// Resolves signer profiles, falling back across relays.
pub struct FallbackIdentityResolver {
    connector: Arc<dyn RelayConnector>,
    config: ResolverConfig,
}

impl FallbackIdentityResolver {
    pub fn new(connector: Arc<dyn RelayConnector>, config: ResolverConfig) -> Self {
        Self { connector, config }
    }

    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    /// The filter sent to each relay for `signer`.
    pub fn filter_for(&self, signer: &str) -> Filter {
        Filter::new()
            .kinds([PROFILE_KIND])
            .authors([signer])
            .limit(self.config.limit)
    }

    /// Resolves `signer` using the configured relays.
    pub async fn resolve_configured(
        &self,
        signer: &str,
        cancel: &CancelSignal,
    ) -> LookupResult<ProfileOutcome> {
        self.resolve(signer, &self.config.preferred, &self.config.fallbacks, cancel)
            .await
    }

    /// Resolves `signer`, asking `preferred` first and then each of
    /// `fallbacks` in order, stopping at the first relay with a profile.
    ///
    /// Each attempt has its own deadline. A malformed key fails with
    /// `InvalidSigner` before any relay is contacted.
    pub async fn resolve(
        &self,
        signer: &str,
        preferred: &RelayEndpoint,
        fallbacks: &[RelayEndpoint],
        cancel: &CancelSignal,
    ) -> LookupResult<ProfileOutcome> {
        if !is_valid_public_key(signer) {
            return Err(LookupError::InvalidSigner(signer.to_string()));
        }

        let filters = [self.filter_for(signer)];
        let mut attempts: Vec<Provenance> = Vec::with_capacity(fallbacks.len() + 2);
        attempts.push(Provenance::Preferred {
            endpoint: preferred.clone(),
        });
        attempts.extend(fallbacks.iter().enumerate().map(|(index, endpoint)| {
            Provenance::Fallback {
                index,
                endpoint: endpoint.clone(),
            }
        }));
        if self.config.use_default_transport {
            attempts.push(Provenance::Default);
        }

        for provenance in attempts {
            if cancel.is_cancelled() {
                return Err(LookupError::Cancelled);
            }

            let signal = QuerySignal::new(cancel.clone(), self.config.attempt_timeout());
            let result = self.attempt(&provenance, &filters, &signal).await;

            match result {
                Ok(events) => {
                    let count = events.len();
                    if let Some(profile) = ProfileRecord::latest(signer, events) {
                        info!(
                            "Resolved profile for {} from {provenance} ({count} events)",
                            short(signer)
                        );
                        return Ok(ProfileOutcome::Found { profile, provenance });
                    }
                    debug!("No profile for {} on {provenance}", short(signer));
                }
                Err(LookupError::Cancelled) => return Err(LookupError::Cancelled),
                Err(e) => {
                    warn!("Error querying {provenance} for {}: {e}", short(signer));
                }
            }
        }

        info!("No profile found for {} on any relay", short(signer));
        Ok(ProfileOutcome::NotFound)
    }

    async fn attempt(
        &self,
        provenance: &Provenance,
        filters: &[Filter],
        signal: &QuerySignal,
    ) -> LookupResult<Vec<RawEvent>> {
        match provenance.endpoint() {
            Some(endpoint) => {
                signal
                    .guard(query_endpoint(self.connector.as_ref(), endpoint, filters))
                    .await
            }
            None => {
                let transport = self.connector.default_transport();
                signal.guard(transport.query(filters)).await
            }
        }
    }
}

fn short(key: &str) -> &str {
    &key[..key.len().min(8)]
}
