//! Transport layer abstraction.
//!
//! The lookup engine never speaks the relay wire protocol itself. It asks a
//! `RelayConnector` for a short-lived `RelayTransport` per relay, runs one
//! query through it and closes it. Callers plug in whatever client they use.

use crate::error::{LookupError, LookupResult};
use crate::filter::Filter;
use async_trait::async_trait;
use std::sync::Arc;
use tracing::debug;
use whosigned_types::{RawEvent, RelayEndpoint};

/// A connection able to run filter queries against one relay (or against
/// whatever set of relays an ambient client routes to).
#[async_trait]
pub trait RelayTransport: Send + Sync {
    /// Runs `filters` and returns every matching stored event once the relay
    /// signals end of stored events.
    async fn query(&self, filters: &[Filter]) -> LookupResult<Vec<RawEvent>>;

    /// Releases the connection. Implementations must also release on drop,
    /// since a query abandoned on timeout or cancellation never reaches
    /// `close`.
    async fn close(&self) -> LookupResult<()> {
        Ok(())
    }
}

/// Opens per-relay transports and exposes the caller's ambient one.
#[async_trait]
pub trait RelayConnector: Send + Sync {
    /// Opens a dedicated connection to `endpoint`.
    async fn connect(&self, endpoint: &RelayEndpoint) -> LookupResult<Box<dyn RelayTransport>>;

    /// The caller's own transport, used when no relays are given. Owned by
    /// the caller, so lookups never close it.
    fn default_transport(&self) -> Arc<dyn RelayTransport>;
}

/// Connects to `endpoint`, runs `filters`, closes.
///
/// A close failure is logged and does not affect the result. If the returned
/// future is dropped midway, the connection is released by drop.
pub(crate) async fn query_endpoint(
    connector: &dyn RelayConnector,
    endpoint: &RelayEndpoint,
    filters: &[Filter],
) -> LookupResult<Vec<RawEvent>> {
    let relay = connector.connect(endpoint).await?;
    let result = relay.query(filters).await;
    if let Err(e) = relay.close().await {
        debug!("Error closing connection to {endpoint}: {e}");
    }
    result
}

/// A mock transport for testing.
pub mod mock {
    use super::*;
    use std::collections::HashMap;
    use std::future::pending;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;
    use std::time::Duration;

    /// What a mock relay does when queried.
    #[derive(Debug, Clone)]
    pub enum MockResponse {
        /// Answer immediately with these events.
        Events(Vec<RawEvent>),
        /// Answer after a delay.
        Delayed(Duration, Vec<RawEvent>),
        /// Fail with a network error.
        Fail(String),
        /// Never answer.
        Hang,
    }

    #[derive(Debug)]
    struct MockRelayState {
        response: MockResponse,
        queries: Vec<Vec<Filter>>,
    }

    /// A scripted relay. Returns its scripted events as-is, without applying
    /// the filters, like an untrusted relay might.
    #[derive(Debug, Clone)]
    pub struct MockRelay {
        state: Arc<Mutex<MockRelayState>>,
    }

    impl MockRelay {
        pub fn new(response: MockResponse) -> Self {
            Self {
                state: Arc::new(Mutex::new(MockRelayState {
                    response,
                    queries: Vec::new(),
                })),
            }
        }

        pub fn with_events(events: Vec<RawEvent>) -> Self {
            Self::new(MockResponse::Events(events))
        }

        pub fn delayed(delay: Duration, events: Vec<RawEvent>) -> Self {
            Self::new(MockResponse::Delayed(delay, events))
        }

        pub fn failing(message: impl Into<String>) -> Self {
            Self::new(MockResponse::Fail(message.into()))
        }

        pub fn hanging() -> Self {
            Self::new(MockResponse::Hang)
        }

        /// Number of queries received.
        pub fn query_count(&self) -> usize {
            self.state.lock().unwrap().queries.len()
        }

        /// Filters of every query received, in order.
        pub fn received_filters(&self) -> Vec<Vec<Filter>> {
            self.state.lock().unwrap().queries.clone()
        }
    }

    #[async_trait]
    impl RelayTransport for MockRelay {
        async fn query(&self, filters: &[Filter]) -> LookupResult<Vec<RawEvent>> {
            let response = {
                let mut state = self.state.lock().unwrap();
                state.queries.push(filters.to_vec());
                state.response.clone()
            };
            match response {
                MockResponse::Events(events) => Ok(events),
                MockResponse::Delayed(delay, events) => {
                    tokio::time::sleep(delay).await;
                    Ok(events)
                }
                MockResponse::Fail(message) => Err(LookupError::Network(message)),
                MockResponse::Hang => pending().await,
            }
        }
    }

    #[derive(Debug, Default)]
    struct Counters {
        opened: AtomicUsize,
        closed: AtomicUsize,
        released: AtomicUsize,
    }

    /// One open connection handed out by `MockConnector`.
    struct MockSession {
        relay: MockRelay,
        counters: Arc<Counters>,
    }

    #[async_trait]
    impl RelayTransport for MockSession {
        async fn query(&self, filters: &[Filter]) -> LookupResult<Vec<RawEvent>> {
            self.relay.query(filters).await
        }

        async fn close(&self) -> LookupResult<()> {
            self.counters.closed.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    impl Drop for MockSession {
        fn drop(&mut self) {
            self.counters.released.fetch_add(1, Ordering::SeqCst);
        }
    }

    /// A connector over a fixed set of mock relays, keyed by URL.
    ///
    /// Connecting to an unknown URL fails with a network error.
    pub struct MockConnector {
        relays: HashMap<String, MockRelay>,
        default: MockRelay,
        connected: Mutex<Vec<String>>,
        counters: Arc<Counters>,
    }

    impl MockConnector {
        pub fn new() -> Self {
            Self {
                relays: HashMap::new(),
                default: MockRelay::with_events(Vec::new()),
                connected: Mutex::new(Vec::new()),
                counters: Arc::new(Counters::default()),
            }
        }

        /// Registers a relay at `url`.
        pub fn with_relay(mut self, url: impl Into<String>, relay: MockRelay) -> Self {
            self.relays.insert(url.into(), relay);
            self
        }

        /// Replaces the ambient transport.
        pub fn with_default(mut self, relay: MockRelay) -> Self {
            self.default = relay;
            self
        }

        /// URLs connected to, in order.
        pub fn connected(&self) -> Vec<String> {
            self.connected.lock().unwrap().clone()
        }

        /// Connections opened successfully.
        pub fn opened(&self) -> usize {
            self.counters.opened.load(Ordering::SeqCst)
        }

        /// Connections closed explicitly.
        pub fn closed(&self) -> usize {
            self.counters.closed.load(Ordering::SeqCst)
        }

        /// Connections dropped, whether closed first or abandoned.
        pub fn released(&self) -> usize {
            self.counters.released.load(Ordering::SeqCst)
        }
    }

    impl Default for MockConnector {
        fn default() -> Self {
            Self::new()
        }
    }

    #[async_trait]
    impl RelayConnector for MockConnector {
        async fn connect(
            &self,
            endpoint: &RelayEndpoint,
        ) -> LookupResult<Box<dyn RelayTransport>> {
            self.connected.lock().unwrap().push(endpoint.url.clone());
            let relay = self
                .relays
                .get(&endpoint.url)
                .cloned()
                .ok_or_else(|| LookupError::Network(format!("connection refused: {endpoint}")))?;
            self.counters.opened.fetch_add(1, Ordering::SeqCst);
            Ok(Box::new(MockSession {
                relay,
                counters: self.counters.clone(),
            }))
        }

        fn default_transport(&self) -> Arc<dyn RelayTransport> {
            Arc::new(self.default.clone())
        }
    }
}
