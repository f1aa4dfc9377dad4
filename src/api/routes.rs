use std::sync::Arc;

use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;
use tokio::sync::watch;

use crate::api::health::HealthState;
use crate::api::latency::FeedLatency;
use crate::ticker::Breakdown;
use crate::types::TickerSnapshot;

#[derive(Clone)]
pub struct ApiState {
    pub snapshots: watch::Receiver<Arc<TickerSnapshot>>,
    pub health: Arc<HealthState>,
    pub latency: Arc<FeedLatency>,
}

impl ApiState {
    fn current(&self) -> Arc<TickerSnapshot> {
        Arc::clone(&self.snapshots.borrow())
    }
}

pub fn router(state: ApiState) -> Router {
    Router::new()
        .route("/ticker", get(get_ticker))
        .route("/ticker/breakdown", get(get_breakdown))
        .route("/health", get(get_health))
        .route("/stats/latency", get(get_stats_latency))
        .with_state(state)
}

// ---------------------------------------------------------------------------
// Response types
// ---------------------------------------------------------------------------

#[derive(Serialize)]
pub struct HealthResponse {
    pub polls_ok: u64,
    pub polls_failed: u64,
    pub polls_discarded: u64,
    pub last_success_ms: Option<u64>,
    pub games: usize,
}

#[derive(Serialize)]
pub struct LatencyResponse {
    pub p50_ms: Option<f64>,
    pub p95_ms: Option<f64>,
    pub p99_ms: Option<f64>,
    pub sample_count: u64,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

async fn get_ticker(State(state): State<ApiState>) -> Json<TickerSnapshot> {
    Json(state.current().as_ref().clone())
}

async fn get_breakdown(State(state): State<ApiState>) -> Json<Breakdown> {
    Json(Breakdown::from_snapshot(&state.current()))
}

async fn get_health(State(state): State<ApiState>) -> Json<HealthResponse> {
    let last = state.health.last_success_ms();
    Json(HealthResponse {
        polls_ok: state.health.polls_ok(),
        polls_failed: state.health.polls_failed(),
        polls_discarded: state.health.polls_discarded(),
        last_success_ms: (last > 0).then_some(last),
        games: state.current().games.len(),
    })
}

async fn get_stats_latency(State(state): State<ApiState>) -> Json<LatencyResponse> {
    let percentiles = state.latency.percentiles_ms();
    Json(LatencyResponse {
        p50_ms: percentiles.map(|p| p.0),
        p95_ms: percentiles.map(|p| p.1),
        p99_ms: percentiles.map(|p| p.2),
        sample_count: state.latency.len(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    use crate::ticker::state::build_snapshot;
    use crate::types::GameQuote;

    fn q(home: &str, ml_home: i32, ml_away: i32) -> GameQuote {
        GameQuote {
            id: None,
            league: "NFL".to_string(),
            home: home.to_string(),
            away: "BUF".to_string(),
            ml_home,
            ml_away,
            spread: -3.0,
            total: 47.5,
        }
    }

    fn state_with(snapshot: TickerSnapshot) -> (ApiState, watch::Sender<Arc<TickerSnapshot>>) {
        let (tx, rx) = watch::channel(Arc::new(snapshot));
        let state = ApiState {
            snapshots: rx,
            health: Arc::new(HealthState::new()),
            latency: Arc::new(FeedLatency::new()),
        };
        (state, tx)
    }

    async fn get_json(app: Router, uri: &str) -> serde_json::Value {
        let resp = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn ticker_serves_current_snapshot() {
        let snap = build_snapshot(&[], vec![q("KC", -250, 200), q("MIA", 120, -140)], 7, 1_000);
        let (state, _tx) = state_with(snap);

        let v = get_json(router(state), "/ticker").await;
        assert_eq!(v["seq"], 7);
        assert_eq!(v["booksWinPercentage"], 50.0);
        assert_eq!(v["games"].as_array().unwrap().len(), 2);
        assert_eq!(v["games"][0]["publicWinning"], false);
        assert_eq!(v["games"][1]["movement"], "neutral");
    }

    #[tokio::test]
    async fn breakdown_partitions_games() {
        let snap = build_snapshot(
            &[],
            vec![q("KC", -250, 200), q("MIA", 120, -140), q("NE", -110, -110), q("NYJ", 105, -125)],
            1,
            1_000,
        );
        let (state, _tx) = state_with(snap);

        let v = get_json(router(state), "/ticker/breakdown").await;
        assert_eq!(v["booksWinPercentage"], 25.0);
        assert_eq!(v["tone"], "public_dominant");
        assert_eq!(v["booksWinning"].as_array().unwrap().len(), 1);
        assert_eq!(v["publicWinning"].as_array().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn empty_ticker_reports_midpoint_and_no_latency() {
        let (state, _tx) = state_with(TickerSnapshot::empty());

        let v = get_json(router(state.clone()), "/ticker").await;
        assert_eq!(v["booksWinPercentage"], 50.0);

        let health = get_json(router(state.clone()), "/health").await;
        assert_eq!(health["games"], 0);
        assert!(health["last_success_ms"].is_null());

        let latency = get_json(router(state), "/stats/latency").await;
        assert!(latency["p50_ms"].is_null());
        assert_eq!(latency["sample_count"], 0);
    }

    #[tokio::test]
    async fn ticker_follows_published_updates() {
        let (state, tx) = state_with(TickerSnapshot::empty());
        tx.send_replace(Arc::new(build_snapshot(&[], vec![q("KC", -300, 250)], 3, 9_000)));

        let v = get_json(router(state), "/ticker").await;
        assert_eq!(v["seq"], 3);
        assert_eq!(v["booksWinPercentage"], 100.0);
    }
}
