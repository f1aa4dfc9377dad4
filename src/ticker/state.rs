use std::sync::Arc;

use crate::ticker::classifier::classify;
use crate::ticker::movement::annotate;
use crate::types::{GameQuote, TickerSnapshot, Tone};

/// Result of offering a poll response to the state.
#[derive(Debug, Clone)]
pub enum ApplyOutcome {
    Published(Arc<TickerSnapshot>),
    /// A response to a request older than (or equal to) the last one applied.
    Stale { seq: u64, latest: u64 },
}

/// Previous raw quotes plus the fencing cursor for one ticker instance.
/// The published snapshot itself lives with whoever receives `Published`.
#[derive(Debug)]
pub struct TickerState {
    /// Raw quotes of the last applied poll; only used for movement.
    previous: Vec<GameQuote>,
    latest_seq: u64,
}

impl TickerState {
    pub fn new() -> Self {
        Self {
            previous: Vec::new(),
            latest_seq: 0,
        }
    }

    /// Apply the response to request `seq`. Responses arriving out of order are
    /// discarded so an old reply never overwrites a newer one.
    pub fn apply(&mut self, seq: u64, quotes: Vec<GameQuote>, fetched_at_ms: u64) -> ApplyOutcome {
        if seq <= self.latest_seq {
            return ApplyOutcome::Stale {
                seq,
                latest: self.latest_seq,
            };
        }

        let raw = quotes.clone();
        let snapshot = build_snapshot(&self.previous, quotes, seq, fetched_at_ms);

        self.previous = raw;
        self.latest_seq = seq;
        ApplyOutcome::Published(Arc::new(snapshot))
    }
}

impl Default for TickerState {
    fn default() -> Self {
        Self::new()
    }
}

/// Movement, then classification, then aggregate.
pub fn build_snapshot(
    previous: &[GameQuote],
    quotes: Vec<GameQuote>,
    seq: u64,
    fetched_at_ms: u64,
) -> TickerSnapshot {
    let mut games = annotate(previous, quotes);
    let books_win_percentage = classify(&mut games);
    TickerSnapshot {
        games,
        books_win_percentage,
        tone: Tone::from_percentage(books_win_percentage),
        seq,
        fetched_at_ms,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ticker::breakdown::Breakdown;
    use crate::types::Movement;

    fn q(away: &str, home: &str, ml_home: i32, ml_away: i32) -> GameQuote {
        GameQuote {
            id: None,
            league: "NBA".to_string(),
            home: home.to_string(),
            away: away.to_string(),
            ml_home,
            ml_away,
            spread: -1.5,
            total: 220.0,
        }
    }

    fn slate() -> Vec<GameQuote> {
        vec![
            q("LAL", "BOS", -200, 170),
            q("MIA", "NYK", -120, 100),
            q("DEN", "PHX", 130, -150),
            q("GSW", "DAL", -110, -110),
        ]
    }

    #[test]
    fn four_game_slate_end_to_end() {
        let mut state = TickerState::new();
        let ApplyOutcome::Published(snap) = state.apply(1, slate(), 1_000) else {
            panic!("first poll must publish");
        };
        assert_eq!(snap.books_win_percentage, 25.0);
        assert_eq!(snap.tone, Tone::PublicDominant);

        let breakdown = Breakdown::from_snapshot(&snap);
        assert_eq!(breakdown.books_winning.len(), 1);
        assert_eq!(breakdown.public_winning.len(), 3);
        assert_eq!(breakdown.books_winning[0].quote.home, "BOS");
    }

    #[test]
    fn second_poll_carries_movement() {
        let mut state = TickerState::new();
        state.apply(1, vec![q("LAL", "BOS", -120, 100)], 1_000);
        let ApplyOutcome::Published(snap) = state.apply(2, vec![q("LAL", "BOS", -100, -110)], 2_000)
        else {
            panic!("newer poll must publish");
        };
        assert_eq!(snap.games[0].movement, Movement::Up);
        assert_eq!(snap.seq, 2);
    }

    #[test]
    fn late_response_to_older_request_is_dropped() {
        let mut state = TickerState::new();
        state.apply(2, vec![q("LAL", "BOS", -130, 110)], 2_000);

        let outcome = state.apply(1, vec![q("LAL", "BOS", -400, 300)], 2_500);
        assert!(matches!(outcome, ApplyOutcome::Stale { seq: 1, latest: 2 }));

        // The dropped reply must not become the movement baseline either.
        let ApplyOutcome::Published(snap) = state.apply(3, vec![q("LAL", "BOS", -130, 110)], 3_000)
        else {
            panic!("newer poll must publish");
        };
        assert_eq!(snap.games[0].movement, Movement::Neutral);
        assert_eq!(snap.books_win_percentage, 0.0);
    }

    #[test]
    fn movement_compares_against_last_applied_poll_only() {
        let mut state = TickerState::new();
        state.apply(1, vec![q("LAL", "BOS", -120, 100)], 1_000);
        state.apply(2, vec![q("LAL", "BOS", -140, 120)], 2_000);
        let ApplyOutcome::Published(snap) = state.apply(3, vec![q("LAL", "BOS", -130, 110)], 3_000)
        else {
            panic!("newer poll must publish");
        };
        assert_eq!(snap.games[0].movement, Movement::Up);
    }

    #[test]
    fn empty_update_publishes_midpoint() {
        let mut state = TickerState::new();
        state.apply(1, slate(), 1_000);
        let ApplyOutcome::Published(snap) = state.apply(2, Vec::new(), 2_000) else {
            panic!("empty slate is still an update");
        };
        assert!(snap.games.is_empty());
        assert_eq!(snap.books_win_percentage, 50.0);
    }
}
