//! Federated file record query.
//!
//! One hash, many relays. Every relay is queried concurrently under a single
//! shared deadline. A relay that fails or runs out of time contributes
//! nothing; it never fails the lookup. What comes back is validated, merged
//! by event id and sorted newest first.

use crate::cancel::{CancelSignal, QuerySignal};
use crate::config::FanOutConfig;
use crate::error::{LookupError, LookupResult};
use crate::filter::Filter;
use crate::transport::{query_endpoint, RelayConnector};
use futures::future::join_all;
use serde::Serialize;
use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info, warn};
use whosigned_types::{ContentHash, FileRecord, RawEvent, RecordKind, RelayEndpoint};

/// Where a batch of results came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", content = "endpoint", rename_all = "snake_case")]
pub enum QuerySource {
    /// The caller's ambient transport (no relays were given).
    Default,
    /// A dedicated connection to one relay.
    Relay(RelayEndpoint),
}

impl fmt::Display for QuerySource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QuerySource::Default => f.write_str("default transport"),
            QuerySource::Relay(endpoint) => write!(f, "{endpoint}"),
        }
    }
}

/// How one relay fared.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum EndpointStatus {
    /// Answered. `accepted` counts events that passed validation, duplicates
    /// included.
    Responded { received: usize, accepted: usize },
    /// Missed the shared deadline.
    TimedOut,
    /// Connection or protocol failure.
    Failed { reason: String },
}

/// Per-relay outcome of one fan-out.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EndpointReport {
    pub source: QuerySource,
    pub status: EndpointStatus,
}

impl EndpointReport {
    pub fn responded(&self) -> bool {
        matches!(self.status, EndpointStatus::Responded { .. })
    }
}

/// The merged result of a fan-out.
#[derive(Debug, Clone, Serialize)]
pub struct RecordSet {
    pub hash: ContentHash,
    /// Validated records, unique by id, newest first.
    pub records: Vec<FileRecord>,
    /// One entry per relay queried, in the order given.
    pub endpoints: Vec<EndpointReport>,
}

impl RecordSet {
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Distinct signers, in the order they first appear in `records`.
    pub fn unique_signers(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        self.records
            .iter()
            .map(FileRecord::signer)
            .filter(|s| seen.insert(*s))
            .collect()
    }

    /// Number of relays that failed or timed out.
    pub fn failed_endpoints(&self) -> usize {
        self.endpoints.iter().filter(|r| !r.responded()).count()
    }
}

/// Queries many relays for file records matching one hash.
pub struct FederatedRecordQuery {
    connector: Arc<dyn RelayConnector>,
    config: FanOutConfig,
}

impl FederatedRecordQuery {
    pub fn new(connector: Arc<dyn RelayConnector>, config: FanOutConfig) -> Self {
        Self { connector, config }
    }

    pub fn config(&self) -> &FanOutConfig {
        &self.config
    }

    /// The filter sent to every relay for `hash`.
    pub fn filter_for(&self, hash: &ContentHash) -> Filter {
        Filter::new()
            .kinds(RecordKind::ALL.map(RecordKind::kind))
            .tag('x', [hash.as_str()])
            .limit(self.config.limit)
    }

    /// Looks up every file record for `hash` across `endpoints`.
    ///
    /// The hash is checked before anything else; a malformed one fails with
    /// `InvalidHash` and no relay is contacted. An empty `endpoints` falls
    /// back to the connector's default transport. Relay failures only shrink
    /// the result. Cancelling through `cancel` discards everything gathered
    /// so far and returns `Cancelled`.
    pub async fn query(
        &self,
        hash: impl AsRef<str>,
        endpoints: &[RelayEndpoint],
        cancel: &CancelSignal,
    ) -> LookupResult<RecordSet> {
        let input = hash.as_ref();
        let hash =
            ContentHash::parse(input).map_err(|_| LookupError::InvalidHash(input.to_string()))?;

        let filters = [self.filter_for(&hash)];
        let signal = QuerySignal::new(cancel.clone(), self.config.timeout());

        let fetches = if endpoints.is_empty() {
            debug!("No relays given, querying default transport for {hash}");
            let transport = self.connector.default_transport();
            let result = signal.guard(transport.query(&filters)).await;
            vec![(QuerySource::Default, result)]
        } else {
            debug!("Querying {} relays for {hash}", endpoints.len());
            join_all(endpoints.iter().map(|endpoint| {
                let signal = &signal;
                let filters = &filters;
                async move {
                    let result = signal
                        .guard(query_endpoint(self.connector.as_ref(), endpoint, filters))
                        .await;
                    (QuerySource::Relay(endpoint.clone()), result)
                }
            }))
            .await
        };

        if signal.is_cancelled() {
            info!("Lookup for {hash} cancelled, discarding results");
            return Err(LookupError::Cancelled);
        }

        let set = self.merge(hash, fetches);
        info!(
            "Found {} records for {} ({} of {} relays failed)",
            set.records.len(),
            set.hash,
            set.failed_endpoints(),
            set.endpoints.len()
        );
        Ok(set)
    }

    /// Folds per-relay results into one record set. Earlier relays win
    /// when the same id shows up more than once.
    fn merge(
        &self,
        hash: ContentHash,
        fetches: Vec<(QuerySource, LookupResult<Vec<RawEvent>>)>,
    ) -> RecordSet {
        let mut seen = HashSet::new();
        let mut records = Vec::new();
        let mut endpoints = Vec::with_capacity(fetches.len());

        for (source, result) in fetches {
            let status = match result {
                Ok(mut events) => {
                    let received = events.len();
                    if received > self.config.limit {
                        let limit = self.config.limit;
                        debug!("{source} returned {received} events, keeping {limit}");
                        events.truncate(limit);
                    }
                    let mut accepted = 0;
                    for event in events {
                        let Some(record) = accept(&hash, &source, event) else {
                            continue;
                        };
                        accepted += 1;
                        if seen.insert(record.id().to_string()) {
                            records.push(record);
                        }
                    }
                    EndpointStatus::Responded { received, accepted }
                }
                Err(LookupError::Timeout) => {
                    warn!("{source} timed out looking up {hash}");
                    EndpointStatus::TimedOut
                }
                Err(e) => {
                    warn!("{source} failed looking up {hash}: {e}");
                    EndpointStatus::Failed {
                        reason: e.to_string(),
                    }
                }
            };
            endpoints.push(EndpointReport { source, status });
        }

        records.sort_by(|a, b| {
            b.created_at()
                .cmp(&a.created_at())
                .then_with(|| a.id().cmp(b.id()))
        });

        RecordSet {
            hash,
            records,
            endpoints,
        }
    }
}

/// Validates one event. Rejections are relay noise: logged at debug only.
fn accept(hash: &ContentHash, source: &QuerySource, event: RawEvent) -> Option<FileRecord> {
    let id = event.id.clone();
    match FileRecord::try_from(event) {
        Ok(record) if hash.matches(record.hash()) => Some(record),
        Ok(record) => {
            debug!("Dropping {id} from {source}: hash {} does not match", record.hash());
            None
        }
        Err(e) => {
            debug!("Dropping {id} from {source}: {e}");
            None
        }
    }
}
