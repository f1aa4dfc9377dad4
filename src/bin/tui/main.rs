mod app;

use std::io;
use std::sync::Arc;
use std::time::Duration;

use crossterm::{
    event::{Event, EventStream, KeyCode, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use futures_util::StreamExt;
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table},
    Frame, Terminal,
};
use tokio::sync::watch;
use tracing_subscriber::EnvFilter;

use odds_ticker::api::health::HealthState;
use odds_ticker::api::latency::FeedLatency;
use odds_ticker::config::{Config, MARQUEE_FRAME_MS};
use odds_ticker::feed::HttpOddsFeed;
use odds_ticker::poller::OddsPoller;
use odds_ticker::ticker::marquee::display_list;
use odds_ticker::ticker::Breakdown;
use odds_ticker::types::{Movement, TickerGame, TickerSnapshot, Tone};

use app::{
    format_moneyline, format_spread, format_time_ms, matchup, movement_arrow, ticker_segments, Segment,
    TickerApp,
};

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

#[tokio::main]
async fn main() -> io::Result<()> {
    let cfg = Config::from_env().map_err(io::Error::other)?;

    // Logs would tear the alternate screen; only emit when asked for (redirect stderr).
    if std::env::var("LOG_LEVEL").is_ok() {
        tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::new(&cfg.log_level))
            .with_writer(io::stderr)
            .init();
    }

    let feed = HttpOddsFeed::new(&cfg).map_err(io::Error::other)?;
    let feed_url = feed.url().to_string();

    let (poller, snapshots) = OddsPoller::new(
        feed,
        Duration::from_secs(cfg.poll_interval_secs),
        Arc::new(HealthState::new()),
        Arc::new(FeedLatency::new()),
    );
    let poller_handle = tokio::spawn(poller.run());

    let mut app = TickerApp::new(feed_url, Arc::clone(&snapshots.borrow()));
    app.poll_interval_secs = cfg.poll_interval_secs;

    // Terminal setup
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_loop(&mut terminal, &mut app, snapshots).await;

    // Restore terminal regardless of result
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    poller_handle.abort();

    result
}

// ---------------------------------------------------------------------------
// Main event loop
// ---------------------------------------------------------------------------

async fn run_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut TickerApp,
    mut snapshots: watch::Receiver<Arc<TickerSnapshot>>,
) -> io::Result<()> {
    let mut events = EventStream::new();
    let mut frame = tokio::time::interval(Duration::from_millis(MARQUEE_FRAME_MS));

    loop {
        terminal.draw(|f| render(f, app))?;

        tokio::select! {
            _ = frame.tick() => app.advance_frame(),
            changed = snapshots.changed() => {
                if changed.is_err() {
                    return Ok(());
                }
                let snapshot = Arc::clone(&snapshots.borrow_and_update());
                app.apply_snapshot(snapshot);
            }
            event = events.next() => match event {
                Some(Ok(Event::Key(key))) if key.kind == KeyEventKind::Press => match key.code {
                    KeyCode::Char('q') | KeyCode::Char('Q') => return Ok(()),
                    KeyCode::Char('b') | KeyCode::Char('B') | KeyCode::Enter => app.toggle_breakdown(),
                    KeyCode::Esc => app.close_breakdown(),
                    _ => {}
                },
                Some(Ok(_)) => {}
                Some(Err(e)) => return Err(e),
                None => return Ok(()),
            },
        }
    }
}

// ---------------------------------------------------------------------------
// Rendering
// ---------------------------------------------------------------------------

fn render(f: &mut Frame, app: &TickerApp) {
    let area = f.area();

    // header | marquee | games | footer
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // header
            Constraint::Length(3), // marquee
            Constraint::Min(0),    // games
            Constraint::Length(1), // footer
        ])
        .split(area);

    render_header(f, app, chunks[0]);
    render_marquee(f, app, chunks[1]);
    render_games_table(f, &app.snapshot.games, chunks[2]);
    render_footer(f, app.poll_interval_secs, chunks[3]);

    if app.show_breakdown {
        render_breakdown(f, &app.snapshot, centered_rect(70, 70, area));
    }
}

fn tone_color(tone: Tone) -> Color {
    match tone {
        Tone::BooksDominant => Color::Red,
        Tone::PublicDominant => Color::Green,
        Tone::Neutral => Color::White,
    }
}

fn movement_color(m: Movement) -> Color {
    match m {
        Movement::Up => Color::Green,
        Movement::Down => Color::Red,
        Movement::Neutral => Color::DarkGray,
    }
}

fn render_header(f: &mut Frame, app: &TickerApp, area: Rect) {
    let snap = &app.snapshot;
    let status = if snap.seq == 0 {
        Span::styled("◌ waiting for feed", Style::default().fg(Color::Yellow))
    } else {
        Span::styled(
            format!("● updated {}", format_time_ms(snap.fetched_at_ms)),
            Style::default().fg(Color::Green),
        )
    };

    let header_line = Line::from(vec![
        Span::styled(
            " Live Odds  ",
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        ),
        status,
        Span::raw("  │  "),
        Span::styled(
            format!("Books winning {:.0}%", snap.books_win_percentage),
            Style::default()
                .fg(tone_color(snap.tone))
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw("  │  "),
        Span::styled(
            format!("{} games", snap.games.len()),
            Style::default().fg(Color::White),
        ),
        Span::raw("  │  "),
        Span::styled(app.feed_url.clone(), Style::default().fg(Color::DarkGray)),
    ]);

    let paragraph = Paragraph::new(header_line).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray)),
    );
    f.render_widget(paragraph, area);
}

fn segment_style(seg: Segment) -> Style {
    match seg {
        Segment::League => Style::default().fg(Color::Cyan),
        Segment::Matchup => Style::default().fg(Color::White),
        Segment::Pad => Style::default(),
        Segment::Line(m) => Style::default().fg(movement_color(m)),
        Segment::Detail | Segment::Gap => Style::default().fg(Color::DarkGray),
    }
}

fn marquee_spans(game: &TickerGame) -> Vec<Span<'static>> {
    ticker_segments(game)
        .into_iter()
        .map(|(seg, text)| Span::styled(text, segment_style(seg)))
        .collect()
}

fn render_marquee(f: &mut Frame, app: &TickerApp, area: Rect) {
    let spans: Vec<Span> = display_list(&app.snapshot.games)
        .iter()
        .flat_map(marquee_spans)
        .collect();

    let paragraph = Paragraph::new(Line::from(spans))
        .scroll((0, app.scroll_x()))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::DarkGray)),
        );
    f.render_widget(paragraph, area);
}

fn render_games_table(f: &mut Frame, games: &[TickerGame], area: Rect) {
    let header_cells = ["League", "Matchup", "ML Home", "ML Away", "Spread", "O/U", "Side"]
        .iter()
        .map(|h| Cell::from(*h).style(Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)));
    let header = Row::new(header_cells).height(1);

    let rows: Vec<Row> = games
        .iter()
        .map(|g| {
            let (side, side_color) = if g.public_winning {
                ("public", Color::Green)
            } else {
                ("books", Color::Red)
            };
            Row::new(vec![
                Cell::from(g.quote.league.clone()).style(Style::default().fg(Color::Cyan)),
                Cell::from(matchup(g)),
                Cell::from(format!(
                    "{} {}",
                    movement_arrow(g.movement),
                    format_moneyline(g.quote.ml_home)
                ))
                .style(Style::default().fg(movement_color(g.movement))),
                Cell::from(format_moneyline(g.quote.ml_away)),
                Cell::from(format_spread(g.quote.spread)),
                Cell::from(format!("{:.1}", g.quote.total)),
                Cell::from(side).style(Style::default().fg(side_color)),
            ])
        })
        .collect();

    let table = Table::new(
        rows,
        [
            Constraint::Length(6),
            Constraint::Min(12),
            Constraint::Length(9),
            Constraint::Length(8),
            Constraint::Length(7),
            Constraint::Length(6),
            Constraint::Length(7),
        ],
    )
    .header(header)
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray))
            .title(Span::styled(
                " GAMES ",
                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            )),
    );

    f.render_widget(table, area);
}

fn render_breakdown(f: &mut Frame, snapshot: &TickerSnapshot, area: Rect) {
    let breakdown = Breakdown::from_snapshot(snapshot);
    f.render_widget(Clear, area);

    let outer = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(tone_color(breakdown.tone)))
        .title(Span::styled(
            format!(" BETTING BREAKDOWN · books winning {:.0}% ", breakdown.books_win_percentage),
            Style::default().add_modifier(Modifier::BOLD),
        ));
    let inner = outer.inner(area);
    f.render_widget(outer, area);

    let halves = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(inner);

    render_side_list(
        f,
        &format!(" PUBLIC WINNING ({}) ", breakdown.public_winning.len()),
        Color::Green,
        &breakdown.public_winning,
        halves[0],
    );
    render_side_list(
        f,
        &format!(" BOOKS WINNING ({}) ", breakdown.books_winning.len()),
        Color::Red,
        &breakdown.books_winning,
        halves[1],
    );
}

fn render_side_list(f: &mut Frame, title: &str, color: Color, games: &[TickerGame], area: Rect) {
    let lines: Vec<Line> = if games.is_empty() {
        vec![Line::from(Span::styled("—", Style::default().fg(Color::DarkGray)))]
    } else {
        games
            .iter()
            .map(|g| {
                Line::from(vec![
                    Span::styled(format!("{:<4} ", g.quote.league), Style::default().fg(Color::Cyan)),
                    Span::raw(matchup(g)),
                    Span::styled(
                        format!(
                            "  {}/{}",
                            format_moneyline(g.quote.ml_home),
                            format_moneyline(g.quote.ml_away)
                        ),
                        Style::default().fg(Color::DarkGray),
                    ),
                ])
            })
            .collect()
    };

    let paragraph = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray))
            .title(Span::styled(
                title.to_string(),
                Style::default().fg(color).add_modifier(Modifier::BOLD),
            )),
    );
    f.render_widget(paragraph, area);
}

fn render_footer(f: &mut Frame, poll_interval_secs: u64, area: Rect) {
    let line = Line::from(vec![
        Span::styled(" [q] ", Style::default().fg(Color::Yellow)),
        Span::raw("quit  "),
        Span::styled("[b / enter] ", Style::default().fg(Color::Yellow)),
        Span::raw("breakdown  "),
        Span::styled("[esc] ", Style::default().fg(Color::Yellow)),
        Span::raw("close  "),
        Span::styled(
            format!("auto-refresh: {poll_interval_secs}s"),
            Style::default().fg(Color::DarkGray),
        ),
    ]);
    let paragraph = Paragraph::new(line).style(Style::default().fg(Color::White));
    f.render_widget(paragraph, area);
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1])[1]
}
