mod pomodoro;
mod stopwatch;
pub mod streak;

use serde::{Deserialize, Serialize};

pub use pomodoro::{clamp_minutes, PomodoroSettings, PomodoroState, Progress};
pub use stopwatch::StopwatchState;
pub use streak::advance_streak;

/// Pomodoro phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    #[default]
    Work,
    Break,
}

impl Mode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Work => "work",
            Mode::Break => "break",
        }
    }
}

/// Which of the two clocks an event or tick belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimerKind {
    Pomodoro,
    Stopwatch,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleDirection {
    Next,
    Prev,
}
