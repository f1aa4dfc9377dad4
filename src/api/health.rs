//! Shared health counters for the /health endpoint.
//! Updated by the poller's applier, read by the API.

use std::sync::atomic::{AtomicU64, Ordering};

#[derive(Default)]
pub struct HealthState {
    /// Polls whose response was published.
    pub polls_ok: AtomicU64,
    /// Polls that errored or carried no `items` array.
    pub polls_failed: AtomicU64,
    /// Responses dropped because a newer request had already been applied.
    pub polls_discarded: AtomicU64,
    /// Millisecond timestamp of the last published snapshot (0 = none).
    pub last_success_ms: AtomicU64,
}

impl HealthState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_success(&self, at_ms: u64) {
        self.polls_ok.fetch_add(1, Ordering::Relaxed);
        self.last_success_ms.store(at_ms, Ordering::Relaxed);
    }

    pub fn record_failure(&self) {
        self.polls_failed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_discard(&self) {
        self.polls_discarded.fetch_add(1, Ordering::Relaxed);
    }

    pub fn polls_ok(&self) -> u64 {
        self.polls_ok.load(Ordering::Relaxed)
    }

    pub fn polls_failed(&self) -> u64 {
        self.polls_failed.load(Ordering::Relaxed)
    }

    pub fn polls_discarded(&self) -> u64 {
        self.polls_discarded.load(Ordering::Relaxed)
    }

    pub fn last_success_ms(&self) -> u64 {
        self.last_success_ms.load(Ordering::Relaxed)
    }
}
