use std::sync::Arc;
use std::time::Duration;

use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use odds_ticker::api::health::HealthState;
use odds_ticker::api::latency::FeedLatency;
use odds_ticker::api::routes::{router, ApiState};
use odds_ticker::config::Config;
use odds_ticker::error::Result;
use odds_ticker::feed::HttpOddsFeed;
use odds_ticker::poller::OddsPoller;

#[tokio::main]
async fn main() {
    let cfg = match Config::from_env() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Config error: {e}");
            std::process::exit(1);
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&cfg.log_level))
        .init();

    if let Err(e) = run(cfg).await {
        error!("Fatal error: {e}");
        std::process::exit(1);
    }
}

async fn run(cfg: Config) -> Result<()> {
    let feed = HttpOddsFeed::new(&cfg)?;
    info!(
        url = feed.url(),
        interval_secs = cfg.poll_interval_secs,
        "Polling odds feed {} every {}s",
        feed.url(),
        cfg.poll_interval_secs,
    );

    let health = Arc::new(HealthState::new());
    let latency = Arc::new(FeedLatency::new());

    // --- Odds poller (immediate first poll, then fixed interval) ---
    let (poller, snapshots) = OddsPoller::new(
        feed,
        Duration::from_secs(cfg.poll_interval_secs),
        Arc::clone(&health),
        Arc::clone(&latency),
    );
    tokio::spawn(poller.run());

    // --- HTTP API ---
    let app = router(ApiState {
        snapshots,
        health,
        latency,
    });
    let bind_addr = format!("0.0.0.0:{}", cfg.api_port);
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    info!("HTTP API listening on {bind_addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("HTTP API stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for ctrl-c: {e}");
        std::future::pending::<()>().await;
    }
}
