use crate::config::{BOOKS_WINNING_MONEYLINE, EMPTY_BOOKS_WIN_PCT};
use crate::types::{GameQuote, TickerGame};

/// A game is "books winning" when either side is a heavy favourite.
/// Fixed business heuristic, not derived from bet-flow data.
pub fn is_books_winning(q: &GameQuote) -> bool {
    q.ml_home < BOOKS_WINNING_MONEYLINE || q.ml_away < BOOKS_WINNING_MONEYLINE
}

/// Label every game in place and return the books-win percentage.
/// Zero games reports `EMPTY_BOOKS_WIN_PCT` instead of dividing by zero.
pub fn classify(games: &mut [TickerGame]) -> f64 {
    if games.is_empty() {
        return EMPTY_BOOKS_WIN_PCT;
    }

    let mut books = 0usize;
    for game in games.iter_mut() {
        game.public_winning = !is_books_winning(&game.quote);
        if !game.public_winning {
            books += 1;
        }
    }

    100.0 * books as f64 / games.len() as f64
}
