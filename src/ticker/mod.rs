pub mod breakdown;
pub mod classifier;
pub mod marquee;
pub mod movement;
pub mod state;

pub use breakdown::Breakdown;
pub use marquee::Marquee;
pub use state::{ApplyOutcome, TickerState};
