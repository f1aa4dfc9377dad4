use serde::Serialize;

use crate::types::{TickerGame, TickerSnapshot, Tone};

/// The modal view: the same annotated list split by classification.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Breakdown {
    pub books_win_percentage: f64,
    pub tone: Tone,
    pub public_winning: Vec<TickerGame>,
    pub books_winning: Vec<TickerGame>,
}

impl Breakdown {
    pub fn from_snapshot(snapshot: &TickerSnapshot) -> Self {
        let (public_winning, books_winning) = partition(&snapshot.games);
        Self {
            books_win_percentage: snapshot.books_win_percentage,
            tone: snapshot.tone,
            public_winning,
            books_winning,
        }
    }
}

/// Split into (public winning, books winning), each in feed order.
pub fn partition(games: &[TickerGame]) -> (Vec<TickerGame>, Vec<TickerGame>) {
    games.iter().cloned().partition(|g| g.public_winning)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ticker::state::build_snapshot;
    use crate::types::GameQuote;

    fn q(home: &str, ml_home: i32) -> GameQuote {
        GameQuote {
            id: None,
            league: "NHL".to_string(),
            home: home.to_string(),
            away: "TOR".to_string(),
            ml_home,
            ml_away: 105,
            spread: -1.5,
            total: 6.5,
        }
    }

    #[test]
    fn partition_keeps_feed_order_within_each_side() {
        let snap = build_snapshot(
            &[],
            vec![q("MTL", -180), q("BOS", 110), q("NYR", -210), q("OTT", -140)],
            1,
            0,
        );
        let b = Breakdown::from_snapshot(&snap);
        let books: Vec<&str> = b.books_winning.iter().map(|g| g.quote.home.as_str()).collect();
        let public: Vec<&str> = b.public_winning.iter().map(|g| g.quote.home.as_str()).collect();
        assert_eq!(books, ["MTL", "NYR"]);
        assert_eq!(public, ["BOS", "OTT"]);
        assert_eq!(b.books_win_percentage, 50.0);
    }

    #[test]
    fn empty_snapshot_has_empty_sides() {
        let b = Breakdown::from_snapshot(&TickerSnapshot::empty());
        assert!(b.public_winning.is_empty());
        assert!(b.books_winning.is_empty());
        assert_eq!(b.tone, Tone::Neutral);
    }
}
