use crate::error::{AppError, Result};

pub const ODDS_API_URL: &str = "http://localhost:3000";

/// Path + query of the ticker-sized odds payload.
pub const ODDS_TICKER_PATH: &str = "/api/odds?ticker=1";

/// Feed poll interval (seconds). First poll fires immediately.
pub const POLL_INTERVAL_SECS: u64 = 30;

/// Per-request timeout for the odds feed (seconds).
pub const FEED_TIMEOUT_SECS: u64 = 10;

/// A side priced below this moneyline is a heavy favourite; the game counts as
/// "books winning". Comparison is strict: exactly -150 stays public.
pub const BOOKS_WINNING_MONEYLINE: i32 = -150;

/// Reported books-win percentage when the feed has zero games.
pub const EMPTY_BOOKS_WIN_PCT: f64 = 50.0;

/// Summary colour thresholds (percent, inclusive).
pub const BOOKS_DOMINANT_PCT: f64 = 60.0;
pub const PUBLIC_DOMINANT_PCT: f64 = 40.0;

/// Marquee advance per animation frame (terminal columns).
pub const MARQUEE_STEP: u16 = 1;

/// Marquee frame period (milliseconds).
pub const MARQUEE_FRAME_MS: u64 = 80;

/// Hot take recording limit (seconds).
pub const RECORD_LIMIT_SECS: u64 = 60;

/// Channel capacity for poll results routed to the applier.
pub const CHANNEL_CAPACITY: usize = 64;

#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the odds feed (ODDS_API_URL)
    pub odds_api_url: String,
    pub log_level: String,
    pub api_port: u16,
    /// Seconds between polls (POLL_INTERVAL_SECS)
    pub poll_interval_secs: u64,
    /// Seconds before a feed request is abandoned (FEED_TIMEOUT_SECS)
    pub feed_timeout_secs: u64,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup; `from_env` passes the process environment.
    pub fn from_lookup(var: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let poll_interval_secs = positive_secs(&var, "POLL_INTERVAL_SECS", POLL_INTERVAL_SECS)?;
        let feed_timeout_secs = positive_secs(&var, "FEED_TIMEOUT_SECS", FEED_TIMEOUT_SECS)?;

        Ok(Self {
            odds_api_url: var("ODDS_API_URL")
                .unwrap_or_else(|| ODDS_API_URL.to_string())
                .trim_end_matches('/')
                .to_string(),
            log_level: var("LOG_LEVEL").unwrap_or_else(|| "info".to_string()),
            api_port: var("API_PORT")
                .unwrap_or_else(|| "4000".to_string())
                .parse::<u16>()
                .map_err(|_| AppError::Config("API_PORT must be a valid port number".to_string()))?,
            poll_interval_secs,
            feed_timeout_secs,
        })
    }

    /// Full URL of the ticker payload.
    pub fn ticker_url(&self) -> String {
        format!("{}{}", self.odds_api_url, ODDS_TICKER_PATH)
    }
}

/// Whole seconds, strictly positive. Unset falls back to `default`.
fn positive_secs(
    var: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: u64,
) -> Result<u64> {
    let secs = match var(key) {
        Some(raw) => raw.trim().parse::<u64>().map_err(|_| {
            AppError::Config(format!("{key} must be a whole number of seconds"))
        })?,
        None => default,
    };
    if secs == 0 {
        return Err(AppError::Config(format!("{key} must be greater than zero")));
    }
    Ok(secs)
}

impl Default for Config {
    fn default() -> Self {
        Self {
            odds_api_url: ODDS_API_URL.to_string(),
            log_level: "info".to_string(),
            api_port: 4000,
            poll_interval_secs: POLL_INTERVAL_SECS,
            feed_timeout_secs: FEED_TIMEOUT_SECS,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn ticker_url_joins_base_and_path() {
        let cfg = Config {
            odds_api_url: "http://feed.local:8080".to_string(),
            ..Config::default()
        };
        assert_eq!(cfg.ticker_url(), "http://feed.local:8080/api/odds?ticker=1");
    }

    fn lookup(pairs: &[(&str, &str)]) -> Result<Config> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn unset_environment_uses_defaults() {
        let cfg = lookup(&[]).unwrap();
        assert_eq!(cfg.api_port, 4000);
        assert_eq!(cfg.poll_interval_secs, POLL_INTERVAL_SECS);
        assert_eq!(cfg.feed_timeout_secs, FEED_TIMEOUT_SECS);
        assert_eq!(cfg.odds_api_url, ODDS_API_URL);
    }

    #[test]
    fn overrides_are_applied() {
        let cfg = lookup(&[
            ("ODDS_API_URL", "http://odds.internal/"),
            ("API_PORT", "8088"),
            ("POLL_INTERVAL_SECS", "15"),
            ("FEED_TIMEOUT_SECS", "4"),
        ])
        .unwrap();
        assert_eq!(cfg.odds_api_url, "http://odds.internal");
        assert_eq!(cfg.api_port, 8088);
        assert_eq!(cfg.poll_interval_secs, 15);
        assert_eq!(cfg.feed_timeout_secs, 4);
    }

    #[test]
    fn bad_port_is_rejected() {
        assert!(matches!(lookup(&[("API_PORT", "70000")]), Err(AppError::Config(_))));
        assert!(matches!(lookup(&[("API_PORT", "http")]), Err(AppError::Config(_))));
    }

    #[test]
    fn zero_poll_interval_is_rejected() {
        assert!(matches!(lookup(&[("POLL_INTERVAL_SECS", "0")]), Err(AppError::Config(_))));
    }

    #[test]
    fn zero_feed_timeout_is_rejected() {
        let err = lookup(&[("FEED_TIMEOUT_SECS", "0")]).unwrap_err();
        assert!(err.to_string().contains("FEED_TIMEOUT_SECS"));
    }

    #[test]
    fn non_numeric_feed_timeout_is_rejected() {
        assert!(matches!(lookup(&[("FEED_TIMEOUT_SECS", "ten")]), Err(AppError::Config(_))));
        assert!(matches!(lookup(&[("FEED_TIMEOUT_SECS", "-3")]), Err(AppError::Config(_))));
    }

    #[test]
    fn defaults_match_constants() {
        let cfg = Config::default();
        assert_eq!(cfg.poll_interval_secs, 30);
        assert_eq!(cfg.feed_timeout_secs, FEED_TIMEOUT_SECS);
    }
}
