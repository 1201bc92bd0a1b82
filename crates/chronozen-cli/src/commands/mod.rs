pub mod config;
pub mod congrats;
pub mod profile;
pub mod run;
pub mod stats;
pub mod task;
pub mod timer;

use chronozen_core::{App, Config, Database};

/// Restore the app from the on-disk store for a one-shot command.
pub fn load_app() -> Result<App, Box<dyn std::error::Error>> {
    let db = Database::open()?;
    let config = Config::load_or_default();
    Ok(App::load(Box::new(db), None, config.notifications.permission))
}
