//! End-to-end "who signed this file?" lookup.
//!
//! Ties the two halves together: fan out for the file records, then resolve
//! every distinct signer once, concurrently. This is what a page showing one
//! hash calls.

use crate::cancel::CancelSignal;
use crate::config::LookupConfig;
use crate::error::{LookupError, LookupResult};
use crate::fanout::{EndpointReport, FederatedRecordQuery};
use crate::resolver::{FallbackIdentityResolver, ProfileOutcome};
use crate::transport::RelayConnector;
use futures::future::join_all;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, warn};
use whosigned_types::{generate_user_name, ContentHash, FileRecord, RelayEndpoint};

/// What is known about the signer of one record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SignerView {
    pub pubkey: String,
    pub profile: ProfileOutcome,
}

impl SignerView {
    /// Profile name if there is one, otherwise a generated name.
    pub fn display_name(&self) -> String {
        match self.profile.profile() {
            Some(profile) => profile.display_name(),
            None => generate_user_name(&self.pubkey),
        }
    }
}

/// One record together with its signer.
#[derive(Debug, Clone, Serialize)]
pub struct VerifiedSignature {
    pub record: FileRecord,
    pub signer: SignerView,
}

/// Everything found for one hash.
#[derive(Debug, Clone, Serialize)]
pub struct Verification {
    pub hash: ContentHash,
    /// Newest first.
    pub signatures: Vec<VerifiedSignature>,
    pub endpoints: Vec<EndpointReport>,
}

impl Verification {
    /// No relay knew of a record for this hash.
    pub fn is_unsigned(&self) -> bool {
        self.signatures.is_empty()
    }

    /// Number of distinct signers.
    pub fn unique_signers(&self) -> usize {
        let mut keys: Vec<&str> = self
            .signatures
            .iter()
            .map(|s| s.signer.pubkey.as_str())
            .collect();
        keys.sort_unstable();
        keys.dedup();
        keys.len()
    }

    /// "Found 3 signatures from 2 signers".
    pub fn summary(&self) -> String {
        let count = self.signatures.len();
        let signers = self.unique_signers();
        format!(
            "Found {count} signature{} from {signers} signer{}",
            plural(count),
            plural(signers)
        )
    }
}

fn plural(n: usize) -> &'static str {
    if n == 1 { "" } else { "s" }
}

/// Looks up a hash and resolves its signers.
pub struct FileVerifier {
    records: FederatedRecordQuery,
    identities: FallbackIdentityResolver,
}

impl FileVerifier {
    pub fn new(connector: Arc<dyn RelayConnector>, config: LookupConfig) -> Self {
        Self {
            records: FederatedRecordQuery::new(connector.clone(), config.records),
            identities: FallbackIdentityResolver::new(connector, config.identities),
        }
    }

    pub fn records(&self) -> &FederatedRecordQuery {
        &self.records
    }

    pub fn identities(&self) -> &FallbackIdentityResolver {
        &self.identities
    }

    /// Verifies an untrusted hash string (a path segment or form field)
    /// against `endpoints`.
    pub async fn verify(
        &self,
        input: &str,
        endpoints: &[RelayEndpoint],
        cancel: &CancelSignal,
    ) -> LookupResult<Verification> {
        let set = self.records.query(input, endpoints, cancel).await?;

        let signers = set.unique_signers();
        debug!("Resolving {} signers for {}", signers.len(), set.hash);
        let resolved = join_all(signers.into_iter().map(|signer| async move {
            let outcome = self.identities.resolve_configured(signer, cancel).await;
            (signer.to_string(), outcome)
        }))
        .await;

        if cancel.is_cancelled() {
            return Err(LookupError::Cancelled);
        }

        let mut profiles = HashMap::with_capacity(resolved.len());
        for (signer, outcome) in resolved {
            let profile = match outcome {
                Ok(profile) => profile,
                Err(LookupError::Cancelled) => return Err(LookupError::Cancelled),
                Err(e) => {
                    warn!("Could not resolve signer {signer}: {e}");
                    ProfileOutcome::NotFound
                }
            };
            profiles.insert(signer, profile);
        }

        let signatures = set
            .records
            .into_iter()
            .map(|record| {
                let pubkey = record.signer().to_string();
                let profile = profiles
                    .get(&pubkey)
                    .cloned()
                    .unwrap_or(ProfileOutcome::NotFound);
                VerifiedSignature {
                    record,
                    signer: SignerView { pubkey, profile },
                }
            })
            .collect();

        Ok(Verification {
            hash: set.hash,
            signatures,
            endpoints: set.endpoints,
        })
    }
}
