use clap::Subcommand;
use serde_json::json;

use super::load_app;

#[derive(Subcommand)]
pub enum TimerAction {
    /// Print pomodoro settings and progress as JSON
    Status,
    /// Change durations and titles; omitted values are kept
    Settings {
        /// Work duration in minutes (values below 1 become 1)
        #[arg(long, allow_negative_numbers = true)]
        work: Option<i64>,
        /// Break duration in minutes (values below 1 become 1)
        #[arg(long = "break", allow_negative_numbers = true)]
        break_mins: Option<i64>,
        /// Label shown while working
        #[arg(long)]
        work_title: Option<String>,
        /// Label shown during breaks
        #[arg(long)]
        break_title: Option<String>,
    },
}

pub fn run(action: TimerAction) -> Result<(), Box<dyn std::error::Error>> {
    let mut app = load_app()?;

    match action {
        TimerAction::Status => {}
        TimerAction::Settings {
            work,
            break_mins,
            work_title,
            break_title,
        } => {
            let current = app.pomodoro().settings().clone();
            app.update_settings(
                work.unwrap_or_else(|| i64::from(current.work_mins)),
                break_mins.unwrap_or_else(|| i64::from(current.break_mins)),
                work_title.as_deref().unwrap_or(&current.work_title),
                break_title.as_deref().unwrap_or(&current.break_title),
            );
            println!("Settings saved");
        }
    }

    let p = app.pomodoro();
    let settings = p.settings();
    let status = json!({
        "mode": p.mode(),
        "remaining_secs": p.remaining_secs(),
        "work_mins": settings.work_mins,
        "break_mins": settings.break_mins,
        "work_title": settings.work_title,
        "break_title": settings.break_title,
        "sessions_completed": p.sessions_completed(),
        "streak_days": p.streak_days(),
    });
    println!("{}", serde_json::to_string_pretty(&status)?);
    Ok(())
}
