//! Profile commands: the display name and onboarding state.

use clap::Subcommand;
use serde_json::json;

use super::load_app;

#[derive(Subcommand)]
pub enum ProfileAction {
    /// Show the stored name and onboarding state
    Show,
    /// Change the display name
    SetName {
        /// New name
        name: String,
    },
}

pub fn run(action: ProfileAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        ProfileAction::Show => {
            let app = load_app()?;
            let profile = json!({
                "name": app.profile().name,
                "display_name": app.profile().display_name(),
                "tour_completed": app.onboarding().tour_completed(),
                "notifications": app.permission(),
            });
            println!("{}", serde_json::to_string_pretty(&profile)?);
        }
        ProfileAction::SetName { name } => {
            let mut app = load_app()?;
            app.submit_name(&name)?;
            println!("Name set: {}", app.profile().display_name());
        }
    }
    Ok(())
}
