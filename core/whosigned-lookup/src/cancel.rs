//! Cancellation and deadlines.
//!
//! A lookup can be abandoned by the caller at any point (the user navigated
//! away). `CancelHandle` is held by whoever may abandon it; every in-flight
//! relay query observes the matching `CancelSignal`. A `QuerySignal` joins a
//! cancel signal with a deadline so each relay query waits on one thing.

use crate::error::{LookupError, LookupResult};
use std::future::{pending, Future};
use tokio::sync::watch;
use tokio::time::{sleep_until, Duration, Instant};

/// Cancels every lookup holding a signal from this handle.
#[derive(Debug)]
pub struct CancelHandle {
    tx: watch::Sender<bool>,
}

impl CancelHandle {
    /// Creates a handle that has not been cancelled.
    pub fn new() -> Self {
        let (tx, _) = watch::channel(false);
        Self { tx }
    }

    /// Returns a signal observing this handle.
    pub fn signal(&self) -> CancelSignal {
        CancelSignal {
            rx: Some(self.tx.subscribe()),
        }
    }

    /// Cancels. Idempotent.
    pub fn cancel(&self) {
        self.tx.send_replace(true);
    }

    pub fn is_cancelled(&self) -> bool {
        *self.tx.borrow()
    }
}

impl Default for CancelHandle {
    fn default() -> Self {
        Self::new()
    }
}

/// The observing side of a `CancelHandle`.
#[derive(Debug, Clone, Default)]
pub struct CancelSignal {
    rx: Option<watch::Receiver<bool>>,
}

impl CancelSignal {
    /// A signal that never fires.
    pub fn never() -> Self {
        Self { rx: None }
    }

    pub fn is_cancelled(&self) -> bool {
        self.rx.as_ref().is_some_and(|rx| *rx.borrow())
    }

    /// Resolves once cancelled. Never resolves if the handle is dropped
    /// without cancelling.
    pub async fn cancelled(&self) {
        let Some(rx) = &self.rx else {
            return pending().await;
        };
        let mut rx = rx.clone();
        if rx.wait_for(|cancelled| *cancelled).await.is_err() {
            pending::<()>().await;
        }
    }
}

/// Caller cancellation composed with a deadline.
#[derive(Debug, Clone)]
pub struct QuerySignal {
    cancel: CancelSignal,
    deadline: Instant,
}

impl QuerySignal {
    /// A signal that fires on `cancel` or when `timeout` has elapsed from now.
    pub fn new(cancel: CancelSignal, timeout: Duration) -> Self {
        Self {
            cancel,
            deadline: Instant::now() + timeout,
        }
    }

    pub fn deadline(&self) -> Instant {
        self.deadline
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// Resolves with the reason once either side fires.
    pub async fn fired(&self) -> LookupError {
        tokio::select! {
            biased;
            _ = self.cancel.cancelled() => LookupError::Cancelled,
            _ = sleep_until(self.deadline) => LookupError::Timeout,
        }
    }

    /// Runs `fut` until it finishes or the signal fires, whichever is first.
    /// On firing, `fut` is dropped along with whatever it holds.
    pub async fn guard<T, F>(&self, fut: F) -> LookupResult<T>
    where
        F: Future<Output = LookupResult<T>>,
    {
        tokio::select! {
            biased;
            reason = self.fired() => Err(reason),
            result = fut => result,
        }
    }
}
