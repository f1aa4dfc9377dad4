use std::time::Duration;

use thiserror::Error;

use crate::config::RECORD_LIMIT_SECS;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecorderState {
    Idle,
    Recording,
    Stopped,
}

impl std::fmt::Display for RecorderState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RecorderState::Idle => write!(f, "idle"),
            RecorderState::Recording => write!(f, "recording"),
            RecorderState::Stopped => write!(f, "stopped"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("cannot {action} while {state}")]
pub struct RecorderError {
    pub action: &'static str,
    pub state: RecorderState,
}

/// Why a recording ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    Manual,
    Expired,
}

/// Fixed-length hot take countdown: `Idle -> Recording -> Stopped`.
/// One shot; no pause, resume or restart.
#[derive(Debug, Clone)]
pub struct Recorder {
    state: RecorderState,
    remaining: Duration,
    stop_reason: Option<StopReason>,
}

impl Recorder {
    pub fn new() -> Self {
        Self::with_limit(Duration::from_secs(RECORD_LIMIT_SECS))
    }

    pub fn with_limit(limit: Duration) -> Self {
        Self {
            state: RecorderState::Idle,
            remaining: limit,
            stop_reason: None,
        }
    }

    pub fn state(&self) -> RecorderState {
        self.state
    }

    pub fn remaining(&self) -> Duration {
        self.remaining
    }

    pub fn stop_reason(&self) -> Option<StopReason> {
        self.stop_reason
    }

    pub fn start(&mut self) -> Result<(), RecorderError> {
        if self.state != RecorderState::Idle {
            return Err(RecorderError { action: "start", state: self.state });
        }
        self.state = RecorderState::Recording;
        Ok(())
    }

    pub fn stop(&mut self) -> Result<(), RecorderError> {
        if self.state != RecorderState::Recording {
            return Err(RecorderError { action: "stop", state: self.state });
        }
        self.finish(StopReason::Manual);
        Ok(())
    }

    /// Count down by `elapsed`. Ignored unless recording. Returns the state
    /// after the tick, which is `Stopped` once the countdown reaches zero.
    pub fn tick(&mut self, elapsed: Duration) -> RecorderState {
        if self.state == RecorderState::Recording {
            self.remaining = self.remaining.saturating_sub(elapsed);
            if self.remaining.is_zero() {
                self.finish(StopReason::Expired);
            }
        }
        self.state
    }

    fn finish(&mut self, reason: StopReason) {
        self.state = RecorderState::Stopped;
        self.stop_reason = Some(reason);
    }
}

impl Default for Recorder {
    fn default() -> Self {
        Self::new()
    }
}
