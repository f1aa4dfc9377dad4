use std::sync::Arc;
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

use tokio::sync::{mpsc, watch};
use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, info, warn};

use crate::api::health::HealthState;
use crate::api::latency::FeedLatency;
use crate::config::CHANNEL_CAPACITY;
use crate::error::Result;
use crate::feed::OddsSource;
use crate::ticker::{ApplyOutcome, TickerState};
use crate::types::{GameQuote, TickerSnapshot};

/// Outcome of one fetch, tagged with the sequence number of its request.
struct PollResult {
    seq: u64,
    outcome: Result<Option<Vec<GameQuote>>>,
    elapsed: Duration,
}

/// Polls an odds source on a fixed interval and publishes annotated snapshots.
///
/// Each tick spawns its own fetch, so a slow response never delays the next
/// request. Responses funnel back into a single applier that owns the
/// `TickerState` and drops anything older than what is already published.
/// Failed polls publish nothing: readers keep the last good snapshot.
pub struct OddsPoller<S: OddsSource> {
    source: Arc<S>,
    period: Duration,
    snapshot_tx: watch::Sender<Arc<TickerSnapshot>>,
    health: Arc<HealthState>,
    latency: Arc<FeedLatency>,
}

impl<S: OddsSource> OddsPoller<S> {
    pub fn new(
        source: S,
        period: Duration,
        health: Arc<HealthState>,
        latency: Arc<FeedLatency>,
    ) -> (Self, watch::Receiver<Arc<TickerSnapshot>>) {
        let (snapshot_tx, snapshot_rx) = watch::channel(Arc::new(TickerSnapshot::empty()));
        let poller = Self {
            source: Arc::new(source),
            period,
            snapshot_tx,
            health,
            latency,
        };
        (poller, snapshot_rx)
    }

    /// Runs until every snapshot receiver has been dropped.
    pub async fn run(self) {
        let (result_tx, mut result_rx) = mpsc::channel::<PollResult>(CHANNEL_CAPACITY);
        let mut ticker = interval(self.period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        let mut state = TickerState::new();
        let mut next_seq = 0u64;

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    next_seq += 1;
                    self.spawn_fetch(next_seq, result_tx.clone());
                }
                Some(result) = result_rx.recv() => {
                    self.handle(&mut state, result);
                }
                _ = self.snapshot_tx.closed() => {
                    info!(last_seq = next_seq, "Odds poller stopping: no subscribers left");
                    break;
                }
            }
        }
    }

    fn spawn_fetch(&self, seq: u64, tx: mpsc::Sender<PollResult>) {
        let source = Arc::clone(&self.source);
        let latency = Arc::clone(&self.latency);
        debug!(seq, "Odds poll issued");

        tokio::spawn(async move {
            let started = Instant::now();
            let outcome = source.fetch().await;
            let elapsed = started.elapsed();
            latency.record(elapsed);
            if tx.send(PollResult { seq, outcome, elapsed }).await.is_err() {
                debug!(seq, "Odds poll finished after poller stopped");
            }
        });
    }

    fn handle(&self, state: &mut TickerState, result: PollResult) {
        let PollResult { seq, outcome, elapsed } = result;
        let elapsed_ms = elapsed.as_millis() as u64;

        match outcome {
            Ok(Some(quotes)) => match state.apply(seq, quotes, now_ms()) {
                ApplyOutcome::Published(snapshot) => {
                    self.health.record_success(snapshot.fetched_at_ms);
                    info!(
                        seq,
                        games = snapshot.games.len(),
                        books_win_pct = snapshot.books_win_percentage,
                        tone = %snapshot.tone,
                        elapsed_ms,
                        "Ticker updated: {} games, books winning {:.0}%",
                        snapshot.games.len(),
                        snapshot.books_win_percentage,
                    );
                    self.snapshot_tx.send_replace(snapshot);
                }
                ApplyOutcome::Stale { seq, latest } => {
                    self.health.record_discard();
                    warn!(seq, latest, elapsed_ms, "Discarding out-of-order odds response");
                }
            },
            Ok(None) => {
                self.health.record_failure();
                warn!(seq, elapsed_ms, "Odds feed returned no items array; keeping previous ticker");
            }
            Err(e) => {
                self.health.record_failure();
                warn!(seq, elapsed_ms, "Odds poll failed; keeping previous ticker: {e}");
            }
        }
    }
}

fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}
