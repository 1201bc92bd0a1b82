//! Pomodoro countdown state machine.
//!
//! The engine is tick-driven. It does not use internal threads - the caller
//! is responsible for calling `tick()` once per second while `running()`.
//!
//! ## State Transitions
//!
//! ```text
//! Work(paused) <-toggle-> Work(running) --0--> Work(paused, awaiting break)
//!                                                  |confirm        |skip
//!                                                  v               v
//! Work(paused) <--0-- Break(running) <-toggle-> Break(paused)   Work(paused)
//! ```
//!
//! Every command returns the side effects as [`Event`]s.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::streak::advance_streak;
use super::{CycleDirection, Mode, TimerKind};
use crate::events::Event;
use crate::task::Task;

pub const DEFAULT_WORK_MINS: u32 = 25;
pub const DEFAULT_BREAK_MINS: u32 = 5;

/// User-editable durations and labels.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PomodoroSettings {
    pub work_mins: u32,
    pub break_mins: u32,
    pub work_title: String,
    pub break_title: String,
}

impl Default for PomodoroSettings {
    fn default() -> Self {
        Self {
            work_mins: DEFAULT_WORK_MINS,
            break_mins: DEFAULT_BREAK_MINS,
            work_title: "Work".into(),
            break_title: "Break".into(),
        }
    }
}

impl PomodoroSettings {
    /// Build settings, clamping non-positive durations to one minute.
    pub fn new(
        work_mins: i64,
        break_mins: i64,
        work_title: impl Into<String>,
        break_title: impl Into<String>,
    ) -> Self {
        Self {
            work_mins: clamp_minutes(work_mins),
            break_mins: clamp_minutes(break_mins),
            work_title: work_title.into(),
            break_title: break_title.into(),
        }
    }

    pub fn duration_secs(&self, mode: Mode) -> u64 {
        let mins = match mode {
            Mode::Work => self.work_mins,
            Mode::Break => self.break_mins,
        };
        u64::from(mins).saturating_mul(60)
    }

    pub fn title(&self, mode: Mode) -> &str {
        match mode {
            Mode::Work => &self.work_title,
            Mode::Break => &self.break_title,
        }
    }
}

/// Minutes below one are treated as one.
pub fn clamp_minutes(mins: i64) -> u32 {
    mins.clamp(1, i64::from(u32::MAX)) as u32
}

/// Session accounting carried across restarts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Progress {
    pub sessions_completed: u32,
    pub streak_days: u32,
    pub last_session_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PomodoroState {
    mode: Mode,
    remaining_secs: u64,
    running: bool,
    settings: PomodoroSettings,
    progress: Progress,
    /// Id of the task the current work session is for. Resolved to a
    /// position in the pending list on demand.
    #[serde(default)]
    active_task: Option<String>,
    #[serde(default)]
    awaiting_break_confirmation: bool,
}

impl Default for PomodoroState {
    fn default() -> Self {
        Self::new(PomodoroSettings::default(), Progress::default())
    }
}

impl PomodoroState {
    /// Paused, in work mode, with a full work countdown.
    pub fn new(settings: PomodoroSettings, progress: Progress) -> Self {
        Self {
            mode: Mode::Work,
            remaining_secs: settings.duration_secs(Mode::Work),
            running: false,
            settings,
            progress,
            active_task: None,
            awaiting_break_confirmation: false,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn remaining_secs(&self) -> u64 {
        self.remaining_secs
    }

    pub fn running(&self) -> bool {
        self.running
    }

    pub fn settings(&self) -> &PomodoroSettings {
        &self.settings
    }

    pub fn progress(&self) -> &Progress {
        &self.progress
    }

    pub fn sessions_completed(&self) -> u32 {
        self.progress.sessions_completed
    }

    pub fn streak_days(&self) -> u32 {
        self.progress.streak_days
    }

    pub fn awaiting_break_confirmation(&self) -> bool {
        self.awaiting_break_confirmation
    }

    pub fn active_task_id(&self) -> Option<&str> {
        self.active_task.as_deref()
    }

    /// Position of the active task in `pending`, if it is still there.
    pub fn active_task_index(&self, pending: &[&Task]) -> Option<usize> {
        let id = self.active_task.as_deref()?;
        pending.iter().position(|t| t.id == id)
    }

    /// Label shown above the countdown: the active task while working,
    /// otherwise the title of the current mode.
    pub fn current_label<'a>(&'a self, pending: &[&'a Task]) -> &'a str {
        match self.mode {
            Mode::Work => self
                .active_task_index(pending)
                .map(|i| pending[i].text.as_str())
                .unwrap_or(self.settings.work_title.as_str()),
            Mode::Break => self.settings.break_title.as_str(),
        }
    }

    /// Label used for the window title: the active task in either mode,
    /// else the title of the current mode.
    pub fn title_label<'a>(&'a self, pending: &[&'a Task]) -> &'a str {
        self.active_task_index(pending)
            .map(|i| pending[i].text.as_str())
            .unwrap_or_else(|| self.settings.title(self.mode))
    }

    // ── Commands ─────────────────────────────────────────────────────

    pub fn toggle(&mut self) -> Vec<Event> {
        self.running = !self.running;
        if self.running {
            let title = match self.mode {
                Mode::Work => "Work session started!",
                Mode::Break => "Break started!",
            };
            vec![
                Event::PlaySound,
                Event::notify(title, "Stay focused!"),
                Event::TimerStarted {
                    timer: TimerKind::Pomodoro,
                    mode: Some(self.mode),
                },
            ]
        } else {
            vec![
                Event::notify("Timer paused", "Take a breath."),
                Event::TimerPaused {
                    timer: TimerKind::Pomodoro,
                },
            ]
        }
    }

    pub fn reset(&mut self) -> Vec<Event> {
        self.running = false;
        self.mode = Mode::Work;
        self.remaining_secs = self.settings.duration_secs(Mode::Work);
        self.awaiting_break_confirmation = false;
        vec![
            Event::notify("Pomodoro Reset", "Ready for a new session when you are."),
            Event::TimerReset {
                timer: TimerKind::Pomodoro,
            },
        ]
    }

    /// Resume from a shared location: running in `mode` with `remaining_secs`.
    pub fn resume_at(&mut self, mode: Mode, remaining_secs: u64) {
        self.mode = mode;
        self.remaining_secs = remaining_secs;
        self.running = true;
        self.awaiting_break_confirmation = false;
    }

    /// Advance one second. A no-op while paused.
    ///
    /// `today` is the local calendar date used for streak accounting and
    /// `pending` the current pending-task list.
    pub fn tick(&mut self, today: NaiveDate, pending: &[&Task]) -> Vec<Event> {
        if !self.running {
            return Vec::new();
        }
        if self.remaining_secs > 1 {
            self.remaining_secs -= 1;
            return Vec::new();
        }

        self.remaining_secs = 0;
        self.running = false;
        let finished = self.mode;
        let (title, body) = match finished {
            Mode::Work => ("Work session complete!", "Time for a break."),
            Mode::Break => ("Break's over!", "Time to get back to work."),
        };
        let mut events = vec![
            Event::PlaySound,
            Event::notify(title, body),
            Event::TimerCompleted { mode: finished },
        ];

        match finished {
            Mode::Work => {
                self.progress.sessions_completed = self.progress.sessions_completed.saturating_add(1);
                let (streak, last) =
                    advance_streak(today, self.progress.last_session_date, self.progress.streak_days);
                self.progress.streak_days = streak;
                self.progress.last_session_date = Some(last);
                events.push(Event::WorkSessionCompleted {
                    sessions_completed: self.progress.sessions_completed,
                    streak_days: streak,
                });

                if let Some(i) = self.active_task_index(pending) {
                    events.push(Event::ActiveTaskFinished {
                        task_id: pending[i].id.clone(),
                    });
                }

                self.awaiting_break_confirmation = true;
                events.push(Event::BreakConfirmationRequested);
            }
            Mode::Break => {
                self.mode = Mode::Work;
                self.remaining_secs = self.settings.duration_secs(Mode::Work);
                events.push(Event::toast("Time to work!", "Starting work session."));
            }
        }
        events
    }

    pub fn confirm_break(&mut self) -> Vec<Event> {
        self.mode = Mode::Break;
        self.remaining_secs = self.settings.duration_secs(Mode::Break);
        self.running = true;
        self.awaiting_break_confirmation = false;
        vec![
            Event::PlaySound,
            Event::notify("Break time!", "Relax and recharge."),
            Event::toast("Time for a break!", "Starting break session."),
            Event::TimerStarted {
                timer: TimerKind::Pomodoro,
                mode: Some(Mode::Break),
            },
        ]
    }

    pub fn skip_break(&mut self) -> Vec<Event> {
        self.mode = Mode::Work;
        self.remaining_secs = self.settings.duration_secs(Mode::Work);
        self.running = false;
        self.awaiting_break_confirmation = false;
        vec![Event::toast(
            "Break skipped!",
            "New work session is ready when you are.",
        )]
    }

    /// Replace durations and titles. A paused countdown snaps to the new
    /// duration of the current mode; a running one keeps counting.
    pub fn update_settings(&mut self, settings: PomodoroSettings) -> Vec<Event> {
        let settings = PomodoroSettings {
            work_mins: settings.work_mins.max(1),
            break_mins: settings.break_mins.max(1),
            ..settings
        };
        self.settings = settings;
        if !self.running {
            self.remaining_secs = self.settings.duration_secs(self.mode);
        }
        vec![Event::toast(
            "Settings Saved!",
            "Your new timer settings have been saved.",
        )]
    }

    /// Move the active task through the pending list, wrapping at both ends.
    /// Does nothing in break mode or when nothing is pending.
    pub fn cycle_task(&mut self, direction: CycleDirection, pending: &[&Task]) {
        if pending.is_empty() || self.mode != Mode::Work {
            return;
        }
        let len = pending.len();
        let next = match (self.active_task_index(pending), direction) {
            (None, CycleDirection::Next) => 0,
            (None, CycleDirection::Prev) => len - 1,
            (Some(i), CycleDirection::Next) => (i + 1) % len,
            (Some(i), CycleDirection::Prev) => (i + len - 1) % len,
        };
        self.active_task = Some(pending[next].id.clone());
    }

    /// Re-anchor the active task after the pending list changed.
    ///
    /// `previous_index` is where the active task sat before the change. If
    /// it left the pending list, whichever task now occupies that position
    /// (clamped to the last one) takes over; an empty list clears it.
    pub fn reclamp(&mut self, previous_index: Option<usize>, pending: &[&Task]) {
        if self.active_task_index(pending).is_some() {
            return;
        }
        self.active_task = match previous_index {
            Some(i) if !pending.is_empty() => Some(pending[i.min(pending.len() - 1)].id.clone()),
            _ => None,
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, 1).unwrap()
    }

    fn tasks(n: usize) -> Vec<Task> {
        (0..n)
            .map(|i| Task {
                id: format!("t{i}"),
                text: format!("task {i}"),
                completed: false,
            })
            .collect()
    }

    fn refs(tasks: &[Task]) -> Vec<&Task> {
        tasks.iter().collect()
    }

    fn completions(events: &[Event]) -> usize {
        events
            .iter()
            .filter(|e| matches!(e, Event::TimerCompleted { .. }))
            .count()
    }

    #[test]
    fn starts_paused_in_work() {
        let p = PomodoroState::default();
        assert_eq!(p.mode(), Mode::Work);
        assert_eq!(p.remaining_secs(), 25 * 60);
        assert!(!p.running());
    }

    #[test]
    fn toggle_emits_start_and_pause() {
        let mut p = PomodoroState::default();
        let started = p.toggle();
        assert!(p.running());
        assert!(started.contains(&Event::PlaySound));
        assert!(started.contains(&Event::notify("Work session started!", "Stay focused!")));

        let paused = p.toggle();
        assert!(!p.running());
        assert!(paused.contains(&Event::notify("Timer paused", "Take a breath.")));
        assert_eq!(p.remaining_secs(), 25 * 60);
    }

    #[test]
    fn tick_while_paused_is_noop() {
        let mut p = PomodoroState::default();
        assert!(p.tick(today(), &[]).is_empty());
        assert_eq!(p.remaining_secs(), 25 * 60);
    }

    #[test]
    fn tick_from_one_completes_exactly_once() {
        let mut p = PomodoroState::default();
        p.resume_at(Mode::Work, 1);
        let events = p.tick(today(), &[]);
        assert_eq!(p.remaining_secs(), 0);
        assert!(!p.running());
        assert_eq!(completions(&events), 1);
        assert!(events.contains(&Event::BreakConfirmationRequested));

        assert!(p.tick(today(), &[]).is_empty());
        assert_eq!(p.sessions_completed(), 1);
    }

    #[test]
    fn full_work_session_requests_break() {
        let mut p = PomodoroState::default();
        p.toggle();
        let mut all = Vec::new();
        for _ in 0..1500 {
            all.extend(p.tick(today(), &[]));
        }
        assert_eq!(p.sessions_completed(), 1);
        assert_eq!(p.streak_days(), 1);
        assert_eq!(p.progress().last_session_date, Some(today()));
        assert_eq!(p.remaining_secs(), 0);
        assert!(p.awaiting_break_confirmation());
        assert_eq!(completions(&all), 1);
        assert_eq!(all.last(), Some(&Event::BreakConfirmationRequested));
    }

    #[test]
    fn work_completion_finishes_active_task() {
        let list = tasks(2);
        let pending = refs(&list);
        let mut p = PomodoroState::default();
        p.cycle_task(CycleDirection::Next, &pending);
        p.cycle_task(CycleDirection::Next, &pending);
        p.resume_at(Mode::Work, 1);
        let events = p.tick(today(), &pending);
        let finished_at = events
            .iter()
            .position(|e| *e == Event::ActiveTaskFinished { task_id: "t1".into() })
            .unwrap();
        let prompt_at = events
            .iter()
            .position(|e| *e == Event::BreakConfirmationRequested)
            .unwrap();
        assert!(finished_at < prompt_at);
    }

    #[test]
    fn break_completion_returns_to_work_without_session() {
        let mut p = PomodoroState::default();
        p.resume_at(Mode::Break, 1);
        let events = p.tick(today(), &[]);
        assert_eq!(p.mode(), Mode::Work);
        assert_eq!(p.remaining_secs(), 25 * 60);
        assert!(!p.running());
        assert_eq!(p.sessions_completed(), 0);
        assert!(events.contains(&Event::toast("Time to work!", "Starting work session.")));
        assert!(!events.contains(&Event::BreakConfirmationRequested));
    }

    #[test]
    fn confirm_and_skip_break() {
        let mut p = PomodoroState::default();
        p.resume_at(Mode::Work, 1);
        p.tick(today(), &[]);

        p.confirm_break();
        assert_eq!(p.mode(), Mode::Break);
        assert_eq!(p.remaining_secs(), 5 * 60);
        assert!(p.running());
        assert!(!p.awaiting_break_confirmation());

        p.resume_at(Mode::Work, 1);
        p.tick(today(), &[]);
        p.skip_break();
        assert_eq!(p.mode(), Mode::Work);
        assert_eq!(p.remaining_secs(), 25 * 60);
        assert!(!p.running());
    }

    #[test]
    fn reset_returns_to_paused_work() {
        let mut p = PomodoroState::default();
        p.resume_at(Mode::Break, 42);
        p.reset();
        assert_eq!(p.mode(), Mode::Work);
        assert_eq!(p.remaining_secs(), 25 * 60);
        assert!(!p.running());
    }

    #[test]
    fn settings_apply_immediately_when_paused() {
        let mut p = PomodoroState::default();
        p.update_settings(PomodoroSettings::new(10, 5, "Work", "Break"));
        assert_eq!(p.remaining_secs(), 600);
    }

    #[test]
    fn settings_do_not_touch_running_countdown() {
        let mut p = PomodoroState::default();
        p.toggle();
        p.tick(today(), &[]);
        p.update_settings(PomodoroSettings::new(10, 5, "Work", "Break"));
        assert_eq!(p.remaining_secs(), 25 * 60 - 1);
        assert_eq!(p.settings().work_mins, 10);
    }

    #[test]
    fn settings_clamp_non_positive_minutes() {
        let s = PomodoroSettings::new(0, -3, "W", "B");
        assert_eq!((s.work_mins, s.break_mins), (1, 1));

        let mut p = PomodoroState::default();
        p.resume_at(Mode::Break, 10);
        p.toggle();
        p.update_settings(PomodoroSettings::new(25, 0, "W", "B"));
        assert_eq!(p.remaining_secs(), 60);
    }

    #[test]
    fn cycle_is_noop_without_pending_or_in_break() {
        let mut p = PomodoroState::default();
        p.cycle_task(CycleDirection::Next, &[]);
        assert!(p.active_task_id().is_none());

        let list = tasks(3);
        p.resume_at(Mode::Break, 10);
        p.cycle_task(CycleDirection::Next, &refs(&list));
        assert!(p.active_task_id().is_none());
    }

    #[test]
    fn cycle_wraps_both_ways() {
        let list = tasks(3);
        let pending = refs(&list);
        let mut p = PomodoroState::default();
        p.cycle_task(CycleDirection::Prev, &pending);
        assert_eq!(p.active_task_index(&pending), Some(2));
        p.cycle_task(CycleDirection::Next, &pending);
        assert_eq!(p.active_task_index(&pending), Some(0));
    }

    #[test]
    fn reclamp_after_deleting_active_task() {
        let mut list = tasks(3);
        let mut p = PomodoroState::default();
        p.cycle_task(CycleDirection::Prev, &refs(&list));
        let before = p.active_task_index(&refs(&list));
        assert_eq!(before, Some(2));

        list.remove(2);
        p.reclamp(before, &refs(&list));
        assert_eq!(p.active_task_index(&refs(&list)), Some(1));

        list.clear();
        let before = Some(1);
        p.reclamp(before, &refs(&list));
        assert_eq!(p.active_task_index(&refs(&list)), None);
        assert!(p.active_task_id().is_none());
    }

    #[test]
    fn labels_follow_mode_and_task() {
        let list = tasks(1);
        let pending = refs(&list);
        let mut p = PomodoroState::default();
        assert_eq!(p.current_label(&pending), "Work");
        p.cycle_task(CycleDirection::Next, &pending);
        assert_eq!(p.current_label(&pending), "task 0");
        p.resume_at(Mode::Break, 5);
        assert_eq!(p.current_label(&pending), "Break");
        assert_eq!(p.title_label(&pending), "task 0");
    }

    proptest! {
        #[test]
        fn next_then_prev_is_identity(len in 1usize..12, steps in 0usize..30) {
            let list = tasks(len);
            let pending = refs(&list);
            let mut p = PomodoroState::default();
            for _ in 0..=steps {
                p.cycle_task(CycleDirection::Next, &pending);
            }
            let start = p.active_task_index(&pending);
            p.cycle_task(CycleDirection::Next, &pending);
            p.cycle_task(CycleDirection::Prev, &pending);
            prop_assert_eq!(p.active_task_index(&pending), start);
        }

        #[test]
        fn reclamp_never_points_past_end(len in 1usize..10, pick in 0usize..10, remove in 0usize..10) {
            let mut list = tasks(len);
            let mut p = PomodoroState::default();
            for _ in 0..=(pick % len) {
                p.cycle_task(CycleDirection::Next, &refs(&list));
            }
            let before = p.active_task_index(&refs(&list));
            list.remove(remove % len);
            p.reclamp(before, &refs(&list));
            let pending = refs(&list);
            match p.active_task_index(&pending) {
                Some(i) => prop_assert!(i < pending.len()),
                None => prop_assert!(pending.is_empty()),
            }
        }
    }
}
