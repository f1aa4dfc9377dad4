//! In-memory latency histogram for odds feed requests.
//! The poller records every fetch (success or failure), the API reads.

use std::sync::Mutex;
use std::time::Duration;

/// Values stored in microseconds.
pub struct FeedLatency {
    inner: Mutex<hdrhistogram::Histogram<u64>>,
}

impl FeedLatency {
    /// Tracks 1us to 100s, 3 significant figures.
    pub fn new() -> Self {
        let histogram = hdrhistogram::Histogram::new_with_bounds(1, 100_000_000, 3)
            .expect("valid histogram bounds");
        Self {
            inner: Mutex::new(histogram),
        }
    }

    pub fn record(&self, d: Duration) {
        let us = d.as_micros().min(u128::from(u64::MAX)) as u64;
        if let Ok(mut h) = self.inner.lock() {
            let _ = h.saturating_record(us.max(1));
        }
    }

    /// Return (p50_ms, p95_ms, p99_ms). None if no samples.
    pub fn percentiles_ms(&self) -> Option<(f64, f64, f64)> {
        let h = self.inner.lock().ok()?;
        if h.len() == 0 {
            return None;
        }
        let ms = |q: f64| h.value_at_quantile(q) as f64 / 1_000.0;
        Some((ms(0.5), ms(0.95), ms(0.99)))
    }

    pub fn len(&self) -> u64 {
        self.inner.lock().map(|h| h.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for FeedLatency {
    fn default() -> Self {
        Self::new()
    }
}
