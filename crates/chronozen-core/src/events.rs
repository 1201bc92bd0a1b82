use serde::{Deserialize, Serialize};

use crate::timer::{Mode, TimerKind};

/// Every state change hands its side effects back as Events.
/// Reducers never perform I/O; the shell decides how (and whether) to
/// notify, play sounds, show toasts or call the message generator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    /// Desktop notification, subject to notification permission.
    Notify { title: String, body: Option<String> },
    /// Short audio cue.
    PlaySound,
    /// In-app transient message.
    Toast { title: String, description: String },
    TimerStarted { timer: TimerKind, mode: Option<Mode> },
    TimerPaused { timer: TimerKind },
    TimerReset { timer: TimerKind },
    /// A countdown reached zero.
    TimerCompleted { mode: Mode },
    WorkSessionCompleted { sessions_completed: u32, streak_days: u32 },
    /// The active task was finished by a work session; the controller
    /// completes it.
    ActiveTaskFinished { task_id: String },
    TaskCompleted { task_id: String },
    TaskReopened { task_id: String },
    /// Ask the message generator for a congratulation (fire-and-forget).
    CongratsRequested { name: String },
    /// A work session ended; the break waits for confirm or skip.
    BreakConfirmationRequested,
    /// The user agreed to notifications; the shell asks the platform.
    PermissionRequested,
    /// Enter/leave the distraction-free layout.
    FullscreenToggled { enabled: bool },
    /// The add-task input should open.
    AddTaskRequested,
}

impl Event {
    pub fn notify(title: impl Into<String>, body: impl Into<String>) -> Self {
        Event::Notify {
            title: title.into(),
            body: Some(body.into()),
        }
    }

    pub fn notify_title(title: impl Into<String>) -> Self {
        Event::Notify {
            title: title.into(),
            body: None,
        }
    }

    pub fn toast(title: impl Into<String>, description: impl Into<String>) -> Self {
        Event::Toast {
            title: title.into(),
            description: description.into(),
        }
    }
}
