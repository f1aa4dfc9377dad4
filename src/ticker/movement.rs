use std::collections::HashMap;

use crate::types::{GameQuote, Movement, TickerGame};

/// Direction of the home moneyline. No previous value is always neutral.
pub fn movement(prev: Option<i32>, next: i32) -> Movement {
    match prev {
        Some(p) if next > p => Movement::Up,
        Some(p) if next < p => Movement::Down,
        _ => Movement::Neutral,
    }
}

/// Annotate `current` against the previous poll, matched by `GameQuote::key`.
/// Output keeps feed order. Duplicate keys in `previous`: last one wins.
pub fn annotate(previous: &[GameQuote], current: Vec<GameQuote>) -> Vec<TickerGame> {
    let prev_ml: HashMap<String, i32> = previous
        .iter()
        .map(|q| (q.key(), q.ml_home))
        .collect();

    current
        .into_iter()
        .map(|q| {
            let m = movement(prev_ml.get(&q.key()).copied(), q.ml_home);
            TickerGame::new(q, m)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn q(league: &str, away: &str, home: &str, ml_home: i32) -> GameQuote {
        GameQuote {
            id: None,
            league: league.to_string(),
            home: home.to_string(),
            away: away.to_string(),
            ml_home,
            ml_away: 100,
            spread: 0.0,
            total: 0.0,
        }
    }

    #[test]
    fn home_line_rising_is_up() {
        let out = annotate(&[q("NBA", "LAL", "BOS", -120)], vec![q("NBA", "LAL", "BOS", -100)]);
        assert_eq!(out[0].movement, Movement::Up);
    }

    #[test]
    fn home_line_falling_is_down() {
        let out = annotate(&[q("NBA", "LAL", "BOS", -100)], vec![q("NBA", "LAL", "BOS", -120)]);
        assert_eq!(out[0].movement, Movement::Down);
    }

    #[test]
    fn unchanged_line_is_neutral() {
        let out = annotate(&[q("NBA", "LAL", "BOS", -120)], vec![q("NBA", "LAL", "BOS", -120)]);
        assert_eq!(out[0].movement, Movement::Neutral);
    }

    #[test]
    fn unmatched_game_is_neutral() {
        let out = annotate(&[q("NBA", "LAL", "BOS", -120)], vec![q("NBA", "MIA", "NYK", 150)]);
        assert_eq!(out[0].movement, Movement::Neutral);
    }

    #[test]
    fn first_poll_is_all_neutral_and_keeps_order() {
        let out = annotate(
            &[],
            vec![q("NHL", "TOR", "MTL", 120), q("NBA", "LAL", "BOS", -300)],
        );
        assert!(out.iter().all(|g| g.movement == Movement::Neutral));
        assert_eq!(out[0].quote.home, "MTL");
        assert_eq!(out[1].quote.home, "BOS");
    }

    #[test]
    fn upstream_id_separates_rematches() {
        let mut early = q("MLB", "NYY", "BOS", -110);
        early.id = Some("g1".to_string());
        let mut late = q("MLB", "NYY", "BOS", 130);
        late.id = Some("g2".to_string());

        let mut early_next = early.clone();
        early_next.ml_home = -105;
        let mut late_next = late.clone();
        late_next.ml_home = 120;

        let out = annotate(&[early, late], vec![early_next, late_next]);
        assert_eq!(out[0].movement, Movement::Up);
        assert_eq!(out[1].movement, Movement::Down);
    }
}
