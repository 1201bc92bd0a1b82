use serde::Serialize;

use super::load_app;

#[derive(Serialize)]
struct Stats {
    sessions_completed: u32,
    streak_days: u32,
    last_session_date: Option<String>,
    pending_tasks: usize,
    completed_tasks: usize,
}

pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let app = load_app()?;
    let progress = app.pomodoro().progress();
    let stats = Stats {
        sessions_completed: progress.sessions_completed,
        streak_days: progress.streak_days,
        last_session_date: progress
            .last_session_date
            .map(|d| d.format("%Y-%m-%d").to_string()),
        pending_tasks: app.tasks().pending_count(),
        completed_tasks: app.tasks().completed().len(),
    };
    println!("{}", serde_json::to_string_pretty(&stats)?);
    Ok(())
}
