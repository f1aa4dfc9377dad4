use std::future::Future;
use std::time::Duration;

use tracing::debug;

use crate::config::Config;
use crate::error::{AppError, Result};
use crate::types::GameQuote;

/// Anything that can produce a ticker-sized odds snapshot.
///
/// `Ok(None)` means the payload carried no usable `items` array: no update,
/// keep what is on screen.
pub trait OddsSource: Send + Sync + 'static {
    fn fetch(&self) -> impl Future<Output = Result<Option<Vec<GameQuote>>>> + Send;
}

/// `GET {ODDS_API_URL}/api/odds?ticker=1` over reqwest.
#[derive(Debug, Clone)]
pub struct HttpOddsFeed {
    client: reqwest::Client,
    url: String,
}

impl HttpOddsFeed {
    pub fn new(cfg: &Config) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(cfg.feed_timeout_secs))
            .build()?;
        Ok(Self {
            client,
            url: cfg.ticker_url(),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

impl OddsSource for HttpOddsFeed {
    async fn fetch(&self) -> Result<Option<Vec<GameQuote>>> {
        let resp = self.client.get(&self.url).send().await?;
        let status = resp.status();
        if !status.is_success() {
            return Err(AppError::Feed(format!("{} returned {status}", self.url)));
        }

        let body: serde_json::Value = resp.json().await?;
        let parsed = parse_ticker_payload(body)?;
        debug!(
            url = %self.url,
            games = parsed.as_ref().map_or(0, Vec::len),
            "Odds feed responded"
        );
        Ok(parsed)
    }
}

/// Extract `items` from `{ "items": Game[] }`. A missing or non-array `items`
/// is "no update"; a bad element makes the whole payload malformed.
pub fn parse_ticker_payload(mut body: serde_json::Value) -> Result<Option<Vec<GameQuote>>> {
    let items = match body.get_mut("items") {
        Some(v) if v.is_array() => v.take(),
        _ => return Ok(None),
    };
    let quotes: Vec<GameQuote> = serde_json::from_value(items)?;
    Ok(Some(quotes))
}
