//! One-off calls to the message generator.

use chronozen_core::congrats::{self, FALLBACK_NAME};
use chronozen_core::{Config, CongratsRequest, Event, HttpMessageGenerator, MessageGenerator};
use tracing::debug;

pub fn run(name: Option<&str>) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load_or_default();
    let name = match name {
        Some(name) => name.trim().to_string(),
        None => super::load_app()
            .map(|app| app.profile().display_name().to_string())
            .unwrap_or_else(|_| FALLBACK_NAME.to_string()),
    };

    let generator = HttpMessageGenerator::from_config(&config.congrats)?;
    let reply = runtime()?.block_on(generator.generate(CongratsRequest { name }))?;
    println!("{}", reply.message);
    Ok(())
}

/// Print a congratulation after a task is completed from the command line.
/// The task is already saved, so every failure here is only logged.
pub fn print_congrats(name: &str) {
    let config = Config::load_or_default();
    let generator = match HttpMessageGenerator::from_config(&config.congrats) {
        Ok(generator) => generator,
        Err(e) => {
            debug!(error = %e, "skipping congratulation");
            return;
        }
    };
    let rt = match runtime() {
        Ok(rt) => rt,
        Err(e) => {
            debug!(error = %e, "no runtime for congratulation");
            return;
        }
    };
    if let Some(Event::Toast { title, description }) =
        rt.block_on(congrats::congratulate(&generator, name))
    {
        println!("{title} {description}");
    }
}

fn runtime() -> std::io::Result<tokio::runtime::Runtime> {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
}
