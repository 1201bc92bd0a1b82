//! State survives a restart through the SQLite-backed store.

use chrono::NaiveDate;
use chronozen_core::storage::state::keys;
use chronozen_core::{App, Database, KeyValueStore, Permission, TimerKind};
use tempfile::TempDir;

fn open(dir: &TempDir) -> Database {
    Database::open_at(&dir.path().join("chronozen.db")).unwrap()
}

#[test]
fn test_state_round_trips_through_database_file() {
    let dir = TempDir::new().unwrap();
    let day = NaiveDate::from_ymd_opt(2024, 6, 3).unwrap();

    {
        let mut app = App::load(Box::new(open(&dir)), None, Permission::Default);
        app.submit_name("Linus").unwrap();
        app.add_task("ship release").unwrap();
        app.add_task("write changelog").unwrap();
        let first = app.tasks().all()[0].id.clone();
        app.toggle_task(&first);
        app.update_settings(1, 3, "Build", "Coffee");
        app.toggle_pomodoro();
        for _ in 0..60 {
            app.tick(TimerKind::Pomodoro, day);
        }
    }

    let app = App::load(Box::new(open(&dir)), None, Permission::Default);
    assert_eq!(app.profile().name.as_deref(), Some("Linus"));
    assert!(app.onboarding().is_done());
    assert_eq!(app.tasks().len(), 2);
    assert_eq!(app.tasks().pending().len(), 1);
    assert_eq!(app.tasks().pending()[0].text, "write changelog");

    let settings = app.pomodoro().settings();
    assert_eq!((settings.work_mins, settings.break_mins), (1, 3));
    assert_eq!(settings.work_title, "Build");
    assert_eq!(app.pomodoro().remaining_secs(), 60);
    assert_eq!(app.pomodoro().sessions_completed(), 1);
    assert_eq!(app.pomodoro().streak_days(), 1);
    assert_eq!(app.pomodoro().progress().last_session_date, Some(day));
}

#[test]
fn test_streak_continues_across_days() {
    let dir = TempDir::new().unwrap();
    let db = open(&dir);
    db.set(keys::SESSIONS, "4").unwrap();
    db.set(keys::STREAK, "2").unwrap();
    db.set(keys::LAST_SESSION, "2024-06-02").unwrap();
    drop(db);

    let mut app = App::load(Box::new(open(&dir)), None, Permission::Default);
    app.update_settings(1, 1, "Work", "Break");
    app.toggle_pomodoro();
    for _ in 0..60 {
        app.tick(TimerKind::Pomodoro, NaiveDate::from_ymd_opt(2024, 6, 3).unwrap());
    }
    assert_eq!(app.pomodoro().sessions_completed(), 5);
    assert_eq!(app.pomodoro().streak_days(), 3);

    let db = open(&dir);
    assert_eq!(db.get(keys::STREAK).unwrap().as_deref(), Some("3"));
    assert_eq!(db.get(keys::LAST_SESSION).unwrap().as_deref(), Some("2024-06-03"));
}

#[test]
fn test_corrupt_todos_do_not_block_startup() {
    let dir = TempDir::new().unwrap();
    open(&dir).set(keys::TODOS, "{\"oops\":").unwrap();

    let app = App::load(Box::new(open(&dir)), None, Permission::Default);
    assert!(app.tasks().is_empty());
    assert_eq!(app.pomodoro().remaining_secs(), 1500);
}
