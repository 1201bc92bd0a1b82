//! The application controller.
//!
//! `App` owns every piece of state the shell renders and is the only thing
//! that writes to the key-value store. Each operation applies its change,
//! persists the keys it touched and returns the side effects for the shell
//! to carry out.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::keymap::{route, Focus, Key, Shortcut};
use super::onboarding::{Onboarding, Step};
use super::reflection::Location;
use crate::congrats::FALLBACK_NAME;
use crate::error::ValidationError;
use crate::events::Event;
use crate::notify::Permission;
use crate::storage::kv::KeyValueStore;
use crate::storage::state::{self, PersistedState};
use crate::task::{TaskList, Toggle};
use crate::timer::{
    CycleDirection, PomodoroSettings, PomodoroState, StopwatchState, TimerKind,
};

/// The selected timer view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tab {
    #[default]
    Pomodoro,
    Stopwatch,
}

impl Tab {
    pub fn other(self) -> Tab {
        match self {
            Tab::Pomodoro => Tab::Stopwatch,
            Tab::Stopwatch => Tab::Pomodoro,
        }
    }

    pub fn timer(self) -> TimerKind {
        match self {
            Tab::Pomodoro => TimerKind::Pomodoro,
            Tab::Stopwatch => TimerKind::Stopwatch,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub name: Option<String>,
}

impl UserProfile {
    /// The stored name, or the generic fallback.
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(FALLBACK_NAME)
    }
}

/// What [`App::handle_key`] did with a key press.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyOutcome {
    /// The controller handled it.
    Applied(Vec<Event>),
    /// A shortcut that needs shell state (cursor, text input, quitting).
    Passthrough(Shortcut),
    Ignored,
}

pub struct App {
    store: Box<dyn KeyValueStore + Send>,
    tasks: TaskList,
    pomodoro: PomodoroState,
    stopwatch: StopwatchState,
    profile: UserProfile,
    tab: Tab,
    fullscreen: bool,
    onboarding: Onboarding,
    permission: Permission,
}

impl App {
    /// Restore state from `store`, then resume `location` if one is given.
    ///
    /// Unreadable keys fall back to their defaults; this never fails.
    pub fn load(
        store: Box<dyn KeyValueStore + Send>,
        location: Option<Location>,
        permission: Permission,
    ) -> Self {
        let persisted = PersistedState::load(&*store);
        let onboarding = Onboarding::new(persisted.username.is_some(), persisted.tour_completed);

        let mut app = Self {
            store,
            tasks: persisted.tasks,
            pomodoro: PomodoroState::new(persisted.settings, persisted.progress),
            stopwatch: StopwatchState::new(),
            profile: UserProfile {
                name: persisted.username,
            },
            tab: Tab::Pomodoro,
            fullscreen: false,
            onboarding,
            permission,
        };

        match location {
            Some(Location::Pomodoro { mode, secs }) => {
                app.tab = Tab::Pomodoro;
                app.pomodoro.resume_at(mode, secs);
                debug!(?mode, secs, "resumed pomodoro from location");
            }
            Some(Location::Stopwatch { secs }) => {
                app.tab = Tab::Stopwatch;
                app.stopwatch = StopwatchState::resumed_at(secs);
                debug!(secs, "resumed stopwatch from location");
            }
            None => {}
        }
        app
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn tasks(&self) -> &TaskList {
        &self.tasks
    }

    pub fn pomodoro(&self) -> &PomodoroState {
        &self.pomodoro
    }

    pub fn stopwatch(&self) -> &StopwatchState {
        &self.stopwatch
    }

    pub fn profile(&self) -> &UserProfile {
        &self.profile
    }

    pub fn tab(&self) -> Tab {
        self.tab
    }

    pub fn fullscreen(&self) -> bool {
        self.fullscreen
    }

    pub fn onboarding(&self) -> &Onboarding {
        &self.onboarding
    }

    pub fn permission(&self) -> Permission {
        self.permission
    }

    pub fn is_running(&self, timer: TimerKind) -> bool {
        match timer {
            TimerKind::Pomodoro => self.pomodoro.running(),
            TimerKind::Stopwatch => self.stopwatch.running,
        }
    }

    /// Position of the session's task in the pending list.
    pub fn active_task_index(&self) -> Option<usize> {
        self.pomodoro.active_task_index(&self.tasks.pending())
    }

    pub fn current_label(&self) -> &str {
        let pending = self.tasks.pending();
        self.pomodoro.current_label(&pending)
    }

    /// Which input mode keys belong to. `editing` is whether the shell has
    /// a text field open; an open field keeps the keys even when a prompt
    /// appears behind it.
    pub fn focus(&self, editing: bool) -> Focus {
        if editing {
            Focus::TextInput
        } else if !self.onboarding.is_done() {
            Focus::Onboarding
        } else if self.pomodoro.awaiting_break_confirmation() {
            Focus::BreakPrompt
        } else {
            Focus::Global
        }
    }

    // ── Tasks ────────────────────────────────────────────────────────

    /// # Errors
    /// Returns [`ValidationError::EmptyTaskText`] for blank text.
    pub fn add_task(&mut self, text: &str) -> Result<Vec<Event>, ValidationError> {
        let task = self.tasks.add(text)?;
        debug!(id = %task.id, "task added");
        state::save_tasks(&*self.store, &self.tasks);
        Ok(vec![Event::toast(
            "Task Added!",
            "Your new task has been added successfully.",
        )])
    }

    /// # Errors
    /// Returns an error for blank text or an unknown id.
    pub fn edit_task(&mut self, id: &str, text: &str) -> Result<Vec<Event>, ValidationError> {
        self.tasks.edit(id, text)?;
        state::save_tasks(&*self.store, &self.tasks);
        Ok(vec![Event::toast("Task Updated!", "Your task has been updated.")])
    }

    pub fn delete_task(&mut self, id: &str) -> Vec<Event> {
        let before = self.active_task_index();
        if self.tasks.delete(id).is_none() {
            return Vec::new();
        }
        self.reclamp(before);
        state::save_tasks(&*self.store, &self.tasks);
        vec![Event::toast("Task Deleted!", "Your task has been removed.")]
    }

    /// Completing a task asks for a congratulation; reopening is silent.
    pub fn toggle_task(&mut self, id: &str) -> Vec<Event> {
        let before = self.active_task_index();
        let Some(outcome) = self.tasks.toggle(id) else {
            return Vec::new();
        };
        self.reclamp(before);
        state::save_tasks(&*self.store, &self.tasks);

        match outcome {
            Toggle::Completed(task) => vec![
                Event::TaskCompleted { task_id: task.id },
                Event::CongratsRequested {
                    name: self.profile.display_name().to_string(),
                },
            ],
            Toggle::Reopened(task) => vec![Event::TaskReopened { task_id: task.id }],
        }
    }

    fn reclamp(&mut self, before: Option<usize>) {
        let pending = self.tasks.pending();
        self.pomodoro.reclamp(before, &pending);
    }

    // ── Timers ───────────────────────────────────────────────────────

    /// Start or pause the timer on the selected tab.
    pub fn toggle_timer(&mut self) -> Vec<Event> {
        match self.tab {
            Tab::Pomodoro => self.toggle_pomodoro(),
            Tab::Stopwatch => self.toggle_stopwatch(),
        }
    }

    /// Reset the timer on the selected tab.
    pub fn reset_timer(&mut self) -> Vec<Event> {
        match self.tab {
            Tab::Pomodoro => self.reset_pomodoro(),
            Tab::Stopwatch => self.reset_stopwatch(),
        }
    }

    pub fn toggle_pomodoro(&mut self) -> Vec<Event> {
        self.pomodoro.toggle()
    }

    pub fn reset_pomodoro(&mut self) -> Vec<Event> {
        self.pomodoro.reset()
    }

    pub fn toggle_stopwatch(&mut self) -> Vec<Event> {
        self.stopwatch.toggle()
    }

    pub fn reset_stopwatch(&mut self) -> Vec<Event> {
        self.stopwatch.reset()
    }

    /// Advance one timer by a second.
    ///
    /// When a work session finishes on an active task, the task is completed
    /// here, so its events come before the break prompt.
    pub fn tick(&mut self, timer: TimerKind, today: NaiveDate) -> Vec<Event> {
        match timer {
            TimerKind::Stopwatch => {
                self.stopwatch.tick();
                Vec::new()
            }
            TimerKind::Pomodoro => {
                let events = {
                    let pending = self.tasks.pending();
                    self.pomodoro.tick(today, &pending)
                };
                let mut out = Vec::with_capacity(events.len());
                for event in events {
                    match &event {
                        Event::WorkSessionCompleted { .. } => {
                            state::save_progress(&*self.store, self.pomodoro.progress());
                            out.push(event);
                        }
                        Event::ActiveTaskFinished { task_id } => {
                            let completed = self.toggle_task(task_id);
                            out.push(event);
                            out.extend(completed);
                        }
                        _ => out.push(event),
                    }
                }
                out
            }
        }
    }

    pub fn confirm_break(&mut self) -> Vec<Event> {
        self.pomodoro.confirm_break()
    }

    pub fn skip_break(&mut self) -> Vec<Event> {
        self.pomodoro.skip_break()
    }

    /// Store new durations and titles. Minutes below one become one; blank
    /// titles fall back to the defaults.
    pub fn update_settings(
        &mut self,
        work_mins: i64,
        break_mins: i64,
        work_title: &str,
        break_title: &str,
    ) -> Vec<Event> {
        let defaults = PomodoroSettings::default();
        let pick = |title: &str, fallback: String| {
            let title = title.trim();
            if title.is_empty() {
                fallback
            } else {
                title.to_string()
            }
        };
        let settings = PomodoroSettings::new(
            work_mins,
            break_mins,
            pick(work_title, defaults.work_title),
            pick(break_title, defaults.break_title),
        );
        let events = self.pomodoro.update_settings(settings);
        state::save_settings(&*self.store, self.pomodoro.settings());
        events
    }

    pub fn cycle_task(&mut self, direction: CycleDirection) {
        let pending = self.tasks.pending();
        self.pomodoro.cycle_task(direction, &pending);
    }

    // ── View ─────────────────────────────────────────────────────────

    pub fn switch_tab(&mut self) {
        self.tab = self.tab.other();
    }

    pub fn toggle_fullscreen(&mut self) -> Vec<Event> {
        self.fullscreen = !self.fullscreen;
        vec![Event::FullscreenToggled {
            enabled: self.fullscreen,
        }]
    }

    // ── Onboarding ───────────────────────────────────────────────────

    /// # Errors
    /// Returns [`ValidationError::EmptyName`] for a blank name.
    pub fn submit_name(&mut self, name: &str) -> Result<Vec<Event>, ValidationError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ValidationError::EmptyName);
        }
        self.profile.name = Some(name.to_string());
        state::save_username(&*self.store, name);
        self.onboarding.name_submitted(self.permission);
        Ok(vec![Event::toast(
            format!("Welcome, {name}!"),
            "Let's get productive.",
        )])
    }

    /// Agreeing hands a permission request to the shell, which reports back
    /// through [`App::permission_resolved`]. Declining moves straight on.
    pub fn answer_notifications(&mut self, allow: bool) -> Vec<Event> {
        if self.onboarding.step() != Step::AskNotifications {
            return Vec::new();
        }
        if allow {
            vec![Event::PermissionRequested]
        } else {
            self.onboarding.notifications_answered();
            Vec::new()
        }
    }

    pub fn permission_resolved(&mut self, permission: Permission) -> Vec<Event> {
        self.permission = permission;
        self.onboarding.notifications_answered();
        let toast = if permission == Permission::Granted {
            Event::toast("Awesome!", "You'll now receive timer notifications.")
        } else {
            Event::toast(
                "No worries!",
                "You can enable notifications later in the config file.",
            )
        };
        vec![toast]
    }

    pub fn finish_tour(&mut self) -> Vec<Event> {
        if self.onboarding.tour_finished() {
            state::mark_tour_completed(&*self.store);
        }
        Vec::new()
    }

    // ── Keys ─────────────────────────────────────────────────────────

    pub fn handle_key(&mut self, key: Key, focus: Focus) -> KeyOutcome {
        if focus == Focus::Onboarding {
            return self.onboarding_key(key);
        }
        let Some(shortcut) = route(key, focus) else {
            return KeyOutcome::Ignored;
        };
        let events = match shortcut {
            Shortcut::ToggleTimer => self.toggle_timer(),
            Shortcut::ResetTimer => self.reset_timer(),
            Shortcut::SwitchTab => {
                self.switch_tab();
                Vec::new()
            }
            Shortcut::AddTask => vec![Event::AddTaskRequested],
            Shortcut::ToggleFullscreen => self.toggle_fullscreen(),
            Shortcut::CycleTask(direction) => {
                self.cycle_task(direction);
                Vec::new()
            }
            Shortcut::ConfirmBreak => self.confirm_break(),
            Shortcut::SkipBreak => self.skip_break(),
            other => return KeyOutcome::Passthrough(other),
        };
        KeyOutcome::Applied(events)
    }

    fn onboarding_key(&mut self, key: Key) -> KeyOutcome {
        let yes = matches!(key, Key::Enter) || matches!(key, Key::Char(c) if c.eq_ignore_ascii_case(&'y'));
        let no = matches!(key, Key::Esc) || matches!(key, Key::Char(c) if c.eq_ignore_ascii_case(&'n'));
        match self.onboarding.step() {
            Step::AskNotifications if yes => KeyOutcome::Applied(self.answer_notifications(true)),
            Step::AskNotifications if no => KeyOutcome::Applied(self.answer_notifications(false)),
            Step::Tour if matches!(key, Key::Enter | Key::Esc | Key::Char(' ')) => {
                KeyOutcome::Applied(self.finish_tour())
            }
            _ => KeyOutcome::Ignored,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::state::keys;
    use crate::storage::MemoryStore;
    use crate::timer::Mode;
    use std::sync::Arc;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, 1).unwrap()
    }

    fn fresh() -> (App, Arc<MemoryStore>) {
        let store = Arc::new(MemoryStore::new());
        let app = App::load(Box::new(store.clone()), None, Permission::Default);
        (app, store)
    }

    fn ids(app: &App) -> Vec<String> {
        app.tasks().all().iter().map(|t| t.id.clone()).collect()
    }

    #[test]
    fn task_changes_are_written_through() {
        let (mut app, store) = fresh();
        let events = app.add_task("  write report ").unwrap();
        assert_eq!(
            events,
            vec![Event::toast("Task Added!", "Your new task has been added successfully.")]
        );
        let raw = store.get(keys::TODOS).unwrap().unwrap();
        assert!(raw.contains("\"text\":\"write report\""));

        assert_eq!(app.add_task("   "), Err(ValidationError::EmptyTaskText));
        assert_eq!(app.tasks().len(), 1);
    }

    #[test]
    fn completing_requests_congrats_with_fallback_name() {
        let (mut app, _) = fresh();
        app.add_task("a").unwrap();
        let id = ids(&app)[0].clone();

        let events = app.toggle_task(&id);
        assert_eq!(
            events,
            vec![
                Event::TaskCompleted { task_id: id.clone() },
                Event::CongratsRequested { name: "User".into() },
            ]
        );
        assert_eq!(app.toggle_task(&id), vec![Event::TaskReopened { task_id: id }]);
    }

    #[test]
    fn congrats_uses_stored_name() {
        let store = MemoryStore::with_entries([(keys::USERNAME, "Ada")]);
        let mut app = App::load(Box::new(store), None, Permission::Granted);
        app.add_task("a").unwrap();
        let id = ids(&app)[0].clone();
        assert!(app
            .toggle_task(&id)
            .contains(&Event::CongratsRequested { name: "Ada".into() }));
    }

    #[test]
    fn unknown_ids_are_noops() {
        let (mut app, _) = fresh();
        assert!(app.toggle_task("nope").is_empty());
        assert!(app.delete_task("nope").is_empty());
        assert_eq!(
            app.edit_task("nope", "x"),
            Err(ValidationError::UnknownTask("nope".into()))
        );
    }

    #[test]
    fn deleting_active_task_moves_to_neighbour() {
        let (mut app, _) = fresh();
        for t in ["a", "b", "c"] {
            app.add_task(t).unwrap();
        }
        app.cycle_task(CycleDirection::Next);
        app.cycle_task(CycleDirection::Next);
        assert_eq!(app.current_label(), "b");

        let b = ids(&app)[1].clone();
        app.delete_task(&b);
        assert_eq!(app.active_task_index(), Some(1));
        assert_eq!(app.current_label(), "c");
    }

    #[test]
    fn completing_last_active_task_clamps() {
        let (mut app, _) = fresh();
        app.add_task("a").unwrap();
        app.add_task("b").unwrap();
        app.cycle_task(CycleDirection::Prev);
        let b = ids(&app)[1].clone();
        app.toggle_task(&b);
        assert_eq!(app.active_task_index(), Some(0));

        let a = ids(&app)[0].clone();
        app.toggle_task(&a);
        assert_eq!(app.active_task_index(), None);
        assert_eq!(app.current_label(), "Work");
    }

    #[test]
    fn work_session_completes_active_task_before_prompt() {
        let (mut app, store) = fresh();
        app.add_task("focus").unwrap();
        let id = ids(&app)[0].clone();
        app.cycle_task(CycleDirection::Next);
        app.update_settings(1, 5, "Work", "Break");
        app.toggle_pomodoro();

        let mut events = Vec::new();
        for _ in 0..60 {
            events.extend(app.tick(TimerKind::Pomodoro, today()));
        }

        assert!(app.tasks().get(&id).unwrap().completed);
        assert_eq!(events.last(), Some(&Event::BreakConfirmationRequested));
        assert!(events.contains(&Event::CongratsRequested { name: "User".into() }));
        assert_eq!(store.get(keys::SESSIONS).unwrap().as_deref(), Some("1"));
        assert_eq!(store.get(keys::LAST_SESSION).unwrap().as_deref(), Some("2024-05-01"));
        assert_eq!(app.focus(false), Focus::BreakPrompt);
        assert_eq!(app.focus(true), Focus::TextInput);
        assert_eq!(app.handle_key(Key::Char('y'), Focus::TextInput), KeyOutcome::Ignored);
        assert!(app.pomodoro().awaiting_break_confirmation());
    }

    #[test]
    fn both_timers_tick_independently_of_tab() {
        let (mut app, _) = fresh();
        app.toggle_pomodoro();
        app.switch_tab();
        app.toggle_timer();
        assert_eq!(app.tab(), Tab::Stopwatch);
        app.tick(TimerKind::Pomodoro, today());
        app.tick(TimerKind::Stopwatch, today());
        assert_eq!(app.pomodoro().remaining_secs(), 25 * 60 - 1);
        assert_eq!(app.stopwatch().elapsed_secs, 1);
    }

    #[test]
    fn settings_are_clamped_and_persisted() {
        let (mut app, store) = fresh();
        app.update_settings(0, 10, "  ", "Rest");
        assert_eq!(app.pomodoro().remaining_secs(), 60);
        assert_eq!(app.pomodoro().settings().work_title, "Work");
        assert_eq!(store.get(keys::WORK_MINS).unwrap().as_deref(), Some("1"));
        assert_eq!(store.get(keys::BREAK_TITLE).unwrap().as_deref(), Some("Rest"));
    }

    #[test]
    fn location_resumes_running_timer() {
        let store = MemoryStore::with_entries([(keys::WORK_MINS, "50")]);
        let app = App::load(
            Box::new(store),
            Location::parse("#pomodoro/break/90"),
            Permission::Default,
        );
        assert_eq!(app.pomodoro().mode(), Mode::Break);
        assert_eq!(app.pomodoro().remaining_secs(), 90);
        assert!(app.pomodoro().running());
        assert_eq!(app.pomodoro().settings().work_mins, 50);
    }

    #[test]
    fn first_run_onboarding_by_keys() {
        let (mut app, store) = fresh();
        assert_eq!(app.focus(false), Focus::Onboarding);
        assert_eq!(app.focus(true), Focus::TextInput);
        assert_eq!(app.handle_key(Key::Char(' '), app.focus(false)), KeyOutcome::Ignored);
        assert_eq!(app.submit_name("  "), Err(ValidationError::EmptyName));

        let events = app.submit_name(" Ada ").unwrap();
        assert_eq!(events, vec![Event::toast("Welcome, Ada!", "Let's get productive.")]);
        assert_eq!(app.onboarding().step(), Step::AskNotifications);

        let outcome = app.handle_key(Key::Char('Y'), Focus::Onboarding);
        assert_eq!(outcome, KeyOutcome::Applied(vec![Event::PermissionRequested]));
        app.permission_resolved(Permission::Granted);
        assert_eq!(app.permission(), Permission::Granted);
        assert_eq!(app.onboarding().step(), Step::Tour);

        app.handle_key(Key::Enter, Focus::Onboarding);
        assert!(app.onboarding().is_done());
        assert_eq!(store.get(keys::TOUR_TAKEN).unwrap().as_deref(), Some("true"));
        assert_eq!(store.get(keys::USERNAME).unwrap().as_deref(), Some("Ada"));
        assert_eq!(app.focus(false), Focus::Global);
    }

    #[test]
    fn global_keys_drive_the_controller() {
        let store = MemoryStore::with_entries([(keys::USERNAME, "Ada")]);
        let mut app = App::load(Box::new(store), None, Permission::Granted);

        assert!(matches!(
            app.handle_key(Key::Char(' '), Focus::Global),
            KeyOutcome::Applied(_)
        ));
        assert!(app.pomodoro().running());

        app.handle_key(Key::Char('S'), Focus::Global);
        assert_eq!(app.tab(), Tab::Stopwatch);

        assert_eq!(
            app.handle_key(Key::Char('t'), Focus::Global),
            KeyOutcome::Applied(vec![Event::AddTaskRequested])
        );
        assert_eq!(
            app.handle_key(Key::Char('f'), Focus::Global),
            KeyOutcome::Applied(vec![Event::FullscreenToggled { enabled: true }])
        );
        assert_eq!(
            app.handle_key(Key::Char('q'), Focus::Global),
            KeyOutcome::Passthrough(Shortcut::Quit)
        );
        assert_eq!(app.handle_key(Key::Char(' '), Focus::TextInput), KeyOutcome::Ignored);
        assert!(!app.stopwatch().running);
    }
}
