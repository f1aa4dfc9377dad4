use serde::{Deserialize, Deserializer, Serialize};

// ---------------------------------------------------------------------------
// Game quote
// ---------------------------------------------------------------------------

/// One sportsbook line as delivered by the odds feed. Transient, never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameQuote {
    /// Stable upstream game id, when the feed supplies one. Numeric ids are
    /// kept as their decimal text.
    #[serde(
        default,
        deserialize_with = "string_or_number_id",
        skip_serializing_if = "Option::is_none"
    )]
    pub id: Option<String>,
    pub league: String,
    pub home: String,
    pub away: String,
    /// American odds: negative = favourite, positive = underdog.
    pub ml_home: i32,
    pub ml_away: i32,
    pub spread: f64,
    pub total: f64,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawGameId {
    Text(String),
    Number(serde_json::Number),
}

fn string_or_number_id<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<RawGameId>::deserialize(deserializer)?.map(|raw| match raw {
        RawGameId::Text(s) => s,
        RawGameId::Number(n) => n.to_string(),
    }))
}

impl GameQuote {
    /// Matching key across polls. Upstream id wins; otherwise `league-away-home`,
    /// which collides on same-day rematches.
    pub fn key(&self) -> String {
        match self.id.as_deref() {
            Some(id) if !id.is_empty() => id.to_string(),
            _ => format!("{}-{}-{}", self.league, self.away, self.home),
        }
    }
}

// ---------------------------------------------------------------------------
// Movement
// ---------------------------------------------------------------------------

/// Home moneyline direction relative to the previous poll.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Movement {
    Up,
    Down,
    #[default]
    Neutral,
}

impl std::fmt::Display for Movement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Movement::Up => "up",
            Movement::Down => "down",
            Movement::Neutral => "neutral",
        };
        write!(f, "{s}")
    }
}

// ---------------------------------------------------------------------------
// Summary tone
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tone {
    /// books_win_percentage >= 60
    BooksDominant,
    /// books_win_percentage <= 40
    PublicDominant,
    Neutral,
}

impl Tone {
    pub fn from_percentage(pct: f64) -> Self {
        use crate::config::{BOOKS_DOMINANT_PCT, PUBLIC_DOMINANT_PCT};
        if pct >= BOOKS_DOMINANT_PCT {
            Tone::BooksDominant
        } else if pct <= PUBLIC_DOMINANT_PCT {
            Tone::PublicDominant
        } else {
            Tone::Neutral
        }
    }
}

impl std::fmt::Display for Tone {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Tone::BooksDominant => "books_dominant",
            Tone::PublicDominant => "public_dominant",
            Tone::Neutral => "neutral",
        };
        write!(f, "{s}")
    }
}

// ---------------------------------------------------------------------------
// Annotated games and snapshots
// ---------------------------------------------------------------------------

/// A quote carrying this cycle's derived annotations.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TickerGame {
    #[serde(flatten)]
    pub quote: GameQuote,
    pub movement: Movement,
    /// Written by the classifier; recomputed from scratch every cycle.
    pub public_winning: bool,
}

impl TickerGame {
    pub fn new(quote: GameQuote, movement: Movement) -> Self {
        Self {
            quote,
            movement,
            public_winning: true,
        }
    }
}

/// The published result of one successful poll.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TickerSnapshot {
    /// Feed order, never re-sorted.
    pub games: Vec<TickerGame>,
    pub books_win_percentage: f64,
    pub tone: Tone,
    /// Sequence number of the poll that produced this snapshot (0 = none yet).
    pub seq: u64,
    pub fetched_at_ms: u64,
}

impl TickerSnapshot {
    /// Placeholder published before the first successful poll.
    pub fn empty() -> Self {
        let pct = crate::config::EMPTY_BOOKS_WIN_PCT;
        Self {
            games: Vec::new(),
            books_win_percentage: pct,
            tone: Tone::from_percentage(pct),
            seq: 0,
            fetched_at_ms: 0,
        }
    }
}
