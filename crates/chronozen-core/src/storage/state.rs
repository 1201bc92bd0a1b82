//! Application state as stored in the key-value store.
//!
//! Each piece lives under its own key so a corrupt value only costs that
//! piece: unreadable or malformed entries are logged and replaced by their
//! defaults, and writes that fail are logged and dropped.

use chrono::NaiveDate;
use serde::Serialize;
use tracing::{debug, warn};

use super::kv::KeyValueStore;
use crate::task::{Task, TaskList};
use crate::timer::{PomodoroSettings, Progress};

pub mod keys {
    pub const USERNAME: &str = "chronozen-username";
    pub const TODOS: &str = "chronozen-todos";
    pub const WORK_MINS: &str = "chronozen-work-mins";
    pub const BREAK_MINS: &str = "chronozen-break-mins";
    pub const WORK_TITLE: &str = "chronozen-work-title";
    pub const BREAK_TITLE: &str = "chronozen-break-title";
    pub const SESSIONS: &str = "chronozen-sessions";
    pub const STREAK: &str = "chronozen-streak";
    pub const LAST_SESSION: &str = "chronozen-last-session";
    pub const TOUR_TAKEN: &str = "chronozen-tour-taken";
}

/// Everything restored at startup.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PersistedState {
    pub username: Option<String>,
    pub tasks: TaskList,
    pub settings: PomodoroSettings,
    pub progress: Progress,
    pub tour_completed: bool,
}

impl PersistedState {
    /// Read every key, keeping the default for anything absent or unusable.
    pub fn load(store: &dyn KeyValueStore) -> Self {
        let defaults = PomodoroSettings::default();
        let settings = PomodoroSettings {
            work_mins: read(store, keys::WORK_MINS, parse_minutes).unwrap_or(defaults.work_mins),
            break_mins: read(store, keys::BREAK_MINS, parse_minutes).unwrap_or(defaults.break_mins),
            work_title: read(store, keys::WORK_TITLE, |s| Some(s.to_string()))
                .unwrap_or(defaults.work_title),
            break_title: read(store, keys::BREAK_TITLE, |s| Some(s.to_string()))
                .unwrap_or(defaults.break_title),
        };

        let progress = Progress {
            sessions_completed: read(store, keys::SESSIONS, json::<u32>).unwrap_or(0),
            streak_days: read(store, keys::STREAK, json::<u32>).unwrap_or(0),
            last_session_date: read(store, keys::LAST_SESSION, |s| {
                NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").ok()
            }),
        };

        let state = Self {
            username: read(store, keys::USERNAME, |s| {
                let name = s.trim();
                (!name.is_empty()).then(|| name.to_string())
            }),
            tasks: read(store, keys::TODOS, json::<Vec<Task>>)
                .map(TaskList::from_tasks)
                .unwrap_or_default(),
            settings,
            progress,
            tour_completed: read(store, keys::TOUR_TAKEN, |s| Some(s.trim() == "true"))
                .unwrap_or(false),
        };
        debug!(
            tasks = state.tasks.len(),
            sessions = state.progress.sessions_completed,
            "loaded persisted state"
        );
        state
    }
}

pub fn save_username(store: &dyn KeyValueStore, name: &str) {
    write(store, keys::USERNAME, name);
}

pub fn save_tasks(store: &dyn KeyValueStore, tasks: &TaskList) {
    match serde_json::to_string(tasks) {
        Ok(json) => write(store, keys::TODOS, &json),
        Err(e) => warn!(error = %e, "failed to serialize tasks"),
    }
}

pub fn save_settings(store: &dyn KeyValueStore, settings: &PomodoroSettings) {
    write(store, keys::WORK_MINS, &settings.work_mins.to_string());
    write(store, keys::BREAK_MINS, &settings.break_mins.to_string());
    write(store, keys::WORK_TITLE, &settings.work_title);
    write(store, keys::BREAK_TITLE, &settings.break_title);
}

/// Session count and streak always; the last session date only once set.
pub fn save_progress(store: &dyn KeyValueStore, progress: &Progress) {
    write(store, keys::SESSIONS, &progress.sessions_completed.to_string());
    write(store, keys::STREAK, &progress.streak_days.to_string());
    if let Some(date) = progress.last_session_date {
        write(store, keys::LAST_SESSION, &date.format("%Y-%m-%d").to_string());
    }
}

pub fn mark_tour_completed(store: &dyn KeyValueStore) {
    write(store, keys::TOUR_TAKEN, "true");
}

fn read<T>(store: &dyn KeyValueStore, key: &str, parse: impl FnOnce(&str) -> Option<T>) -> Option<T> {
    match store.get(key) {
        Ok(Some(raw)) => {
            let parsed = parse(&raw);
            if parsed.is_none() {
                warn!(key, value = %raw, "ignoring malformed stored value");
            }
            parsed
        }
        Ok(None) => None,
        Err(e) => {
            warn!(key, error = %e, "failed to read from store");
            None
        }
    }
}

fn write(store: &dyn KeyValueStore, key: &str, value: &str) {
    if let Err(e) = store.set(key, value) {
        warn!(key, error = %e, "failed to write to store");
    }
}

fn json<T: serde::de::DeserializeOwned>(raw: &str) -> Option<T> {
    serde_json::from_str(raw).ok()
}

/// Decimal minutes; zero or negative values are clamped to one.
fn parse_minutes(raw: &str) -> Option<u32> {
    raw.trim()
        .parse::<i64>()
        .ok()
        .map(crate::timer::clamp_minutes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StorageError;
    use crate::storage::MemoryStore;

    struct BrokenStore;

    impl KeyValueStore for BrokenStore {
        fn get(&self, _key: &str) -> Result<Option<String>, StorageError> {
            Err(StorageError::Unavailable("disk gone".into()))
        }

        fn set(&self, _key: &str, _value: &str) -> Result<(), StorageError> {
            Err(StorageError::Unavailable("disk gone".into()))
        }
    }

    #[test]
    fn empty_store_gives_defaults() {
        let state = PersistedState::load(&MemoryStore::new());
        assert_eq!(state, PersistedState::default());
        assert_eq!(state.settings.work_mins, 25);
    }

    #[test]
    fn broken_store_gives_defaults_and_writes_are_swallowed() {
        let store = BrokenStore;
        assert_eq!(PersistedState::load(&store), PersistedState::default());
        save_username(&store, "Ada");
        save_tasks(&store, &TaskList::new());
        save_progress(&store, &Progress::default());
    }

    #[test]
    fn malformed_values_fall_back_per_key() {
        let store = MemoryStore::with_entries([
            (keys::TODOS, "[{not json"),
            (keys::WORK_MINS, "abc"),
            (keys::BREAK_MINS, "10"),
            (keys::SESSIONS, "\"seven\""),
            (keys::STREAK, "4"),
            (keys::LAST_SESSION, "yesterday"),
        ]);
        let state = PersistedState::load(&store);
        assert!(state.tasks.is_empty());
        assert_eq!(state.settings.work_mins, 25);
        assert_eq!(state.settings.break_mins, 10);
        assert_eq!(state.progress.sessions_completed, 0);
        assert_eq!(state.progress.streak_days, 4);
        assert_eq!(state.progress.last_session_date, None);
    }

    #[test]
    fn stored_zero_minutes_are_clamped() {
        let store = MemoryStore::with_entries([(keys::WORK_MINS, "0")]);
        assert_eq!(PersistedState::load(&store).settings.work_mins, 1);
    }

    #[test]
    fn saved_values_load_back() {
        let store = MemoryStore::new();
        let mut tasks = TaskList::new();
        tasks.add("write tests").unwrap();
        let progress = Progress {
            sessions_completed: 3,
            streak_days: 2,
            last_session_date: NaiveDate::from_ymd_opt(2024, 2, 29),
        };
        let settings = PomodoroSettings::new(50, 10, "Deep", "Walk");

        save_username(&store, "Ada");
        save_tasks(&store, &tasks);
        save_settings(&store, &settings);
        save_progress(&store, &progress);
        mark_tour_completed(&store);

        let state = PersistedState::load(&store);
        assert_eq!(state.username.as_deref(), Some("Ada"));
        assert_eq!(state.tasks, tasks);
        assert_eq!(state.settings, settings);
        assert_eq!(state.progress, progress);
        assert!(state.tour_completed);
        assert_eq!(
            store.get(keys::LAST_SESSION).unwrap().as_deref(),
            Some("2024-02-29")
        );
    }

    #[test]
    fn last_session_is_not_written_until_set() {
        let store = MemoryStore::new();
        save_progress(&store, &Progress::default());
        assert!(store.get(keys::LAST_SESSION).unwrap().is_none());
        assert_eq!(store.get(keys::SESSIONS).unwrap().as_deref(), Some("0"));
    }
}
