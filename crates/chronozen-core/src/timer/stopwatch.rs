use serde::{Deserialize, Serialize};

use super::TimerKind;
use crate::events::Event;

/// Count-up clock. No terminal state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StopwatchState {
    pub elapsed_secs: u64,
    pub running: bool,
}

impl StopwatchState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resume from a shared location: running, at `elapsed_secs`.
    pub fn resumed_at(elapsed_secs: u64) -> Self {
        Self {
            elapsed_secs,
            running: true,
        }
    }

    pub fn toggle(&mut self) -> Vec<Event> {
        self.running = !self.running;
        if self.running {
            vec![
                Event::PlaySound,
                Event::notify_title("Stopwatch started!"),
                Event::TimerStarted {
                    timer: TimerKind::Stopwatch,
                    mode: None,
                },
            ]
        } else {
            vec![
                Event::notify_title("Stopwatch paused"),
                Event::TimerPaused {
                    timer: TimerKind::Stopwatch,
                },
            ]
        }
    }

    pub fn reset(&mut self) -> Vec<Event> {
        self.running = false;
        self.elapsed_secs = 0;
        vec![
            Event::notify_title("Stopwatch Reset"),
            Event::TimerReset {
                timer: TimerKind::Stopwatch,
            },
        ]
    }

    pub fn tick(&mut self) {
        if self.running {
            self.elapsed_secs = self.elapsed_secs.saturating_add(1);
        }
    }
}
