use std::sync::Arc;

use odds_ticker::config::POLL_INTERVAL_SECS;
use odds_ticker::ticker::marquee::display_list;
use odds_ticker::ticker::Marquee;
use odds_ticker::types::{Movement, TickerGame, TickerSnapshot};

/// Separator between marquee entries.
pub const ITEM_GAP: &str = "  │  ";

// ---------------------------------------------------------------------------
// App state
// ---------------------------------------------------------------------------

pub struct TickerApp {
    pub snapshot: Arc<TickerSnapshot>,
    pub marquee: Marquee,
    pub show_breakdown: bool,
    pub feed_url: String,
    pub poll_interval_secs: u64,
}

impl TickerApp {
    pub fn new(feed_url: String, snapshot: Arc<TickerSnapshot>) -> Self {
        let marquee = Marquee::new(marquee_width(&snapshot.games));
        Self {
            snapshot,
            marquee,
            show_breakdown: false,
            feed_url,
            poll_interval_secs: POLL_INTERVAL_SECS,
        }
    }

    /// A new poll landed. The marquee restarts from the first game.
    pub fn apply_snapshot(&mut self, snapshot: Arc<TickerSnapshot>) {
        self.marquee.reset(marquee_width(&snapshot.games));
        self.snapshot = snapshot;
    }

    pub fn advance_frame(&mut self) {
        self.marquee.tick();
    }

    pub fn toggle_breakdown(&mut self) {
        self.show_breakdown = !self.show_breakdown;
    }

    pub fn close_breakdown(&mut self) {
        self.show_breakdown = false;
    }

    /// Horizontal scroll for the marquee paragraph.
    pub fn scroll_x(&self) -> u16 {
        self.marquee.offset().min(u16::MAX as usize) as u16
    }
}

// ---------------------------------------------------------------------------
// Formatting helpers
// ---------------------------------------------------------------------------

pub fn format_moneyline(ml: i32) -> String {
    if ml > 0 {
        format!("+{ml}")
    } else {
        ml.to_string()
    }
}

pub fn format_spread(spread: f64) -> String {
    if spread > 0.0 {
        format!("+{spread:.1}")
    } else {
        format!("{spread:.1}")
    }
}

pub fn movement_arrow(m: Movement) -> &'static str {
    match m {
        Movement::Up => "▲",
        Movement::Down => "▼",
        Movement::Neutral => "•",
    }
}

pub fn matchup(game: &TickerGame) -> String {
    format!("{} @ {}", game.quote.away, game.quote.home)
}

/// What a piece of a marquee entry shows; the renderer picks styles from it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Segment {
    League,
    Matchup,
    Pad,
    /// Moneylines with the movement arrow.
    Line(Movement),
    /// Spread and total.
    Detail,
    Gap,
}

/// One marquee entry, gap included. Both the drawn spans and the measured
/// wrap width come from here.
pub fn ticker_segments(game: &TickerGame) -> Vec<(Segment, String)> {
    vec![
        (Segment::League, format!("{} ", game.quote.league)),
        (Segment::Matchup, matchup(game)),
        (Segment::Pad, "  ".to_string()),
        (
            Segment::Line(game.movement),
            format!(
                "{} {}/{}",
                movement_arrow(game.movement),
                format_moneyline(game.quote.ml_home),
                format_moneyline(game.quote.ml_away),
            ),
        ),
        (
            Segment::Detail,
            format!(
                "  {} O/U {:.1}",
                format_spread(game.quote.spread),
                game.quote.total
            ),
        ),
        (Segment::Gap, ITEM_GAP.to_string()),
    ]
}

/// Column width of the duplicated marquee line.
pub fn marquee_width(games: &[TickerGame]) -> usize {
    display_list(games)
        .iter()
        .flat_map(ticker_segments)
        .map(|(_, text)| text.chars().count())
        .sum()
}

/// Convert millisecond epoch timestamp to HH:MM:SS (UTC).
pub fn format_time_ms(ms: u64) -> String {
    if ms == 0 {
        return "—".to_string();
    }
    let secs = ms / 1_000;
    let h = (secs / 3600) % 24;
    let m = (secs / 60) % 60;
    let s = secs % 60;
    format!("{h:02}:{m:02}:{s:02}")
}
