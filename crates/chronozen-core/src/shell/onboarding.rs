//! First-run flow: name prompt, notification opt-in, welcome tour.
//!
//! ```text
//! AskName --name--> AskNotifications --answer--> Tour --finish--> Done
//!            \  (permission decided)  /     \ (tour already taken) /
//!             `------------------------------------------> Done <-'
//! ```

use crate::notify::Permission;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    AskName,
    AskNotifications,
    Tour,
    Done,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Onboarding {
    step: Step,
    tour_completed: bool,
}

/// Feature cards shown by the welcome tour.
pub const TOUR_FEATURES: &[(&str, &str)] = &[
    (
        "Dual Timers",
        "Switch between a structured Pomodoro timer and a flexible Stopwatch to match your workflow.",
    ),
    (
        "Task Management",
        "Keep your focus sharp by adding, editing, and completing tasks in the integrated to-do list.",
    ),
    (
        "Focus Mode",
        "Eliminate distractions by entering fullscreen mode for complete immersion in your tasks.",
    ),
    (
        "Keyboard Shortcuts",
        "Control the app without leaving your keyboard.",
    ),
];

impl Onboarding {
    /// A user with a stored name never sees onboarding again.
    pub fn new(has_name: bool, tour_completed: bool) -> Self {
        Self {
            step: if has_name { Step::Done } else { Step::AskName },
            tour_completed,
        }
    }

    pub fn step(&self) -> Step {
        self.step
    }

    pub fn is_done(&self) -> bool {
        self.step == Step::Done
    }

    pub fn tour_completed(&self) -> bool {
        self.tour_completed
    }

    /// Advance past the name prompt.
    pub fn name_submitted(&mut self, permission: Permission) {
        if self.step != Step::AskName {
            return;
        }
        self.step = if permission == Permission::Default {
            Step::AskNotifications
        } else {
            self.after_notifications()
        };
    }

    /// Advance past the notification question, whatever the answer was.
    pub fn notifications_answered(&mut self) {
        if self.step == Step::AskNotifications {
            self.step = self.after_notifications();
        }
    }

    /// Returns true if this call completed the tour.
    pub fn tour_finished(&mut self) -> bool {
        if self.step != Step::Tour {
            return false;
        }
        self.step = Step::Done;
        self.tour_completed = true;
        true
    }

    fn after_notifications(&self) -> Step {
        if self.tour_completed {
            Step::Done
        } else {
            Step::Tour
        }
    }
}
