mod config;
pub mod database;
pub mod kv;
pub mod state;

pub use config::{CongratsConfig, Config, LoggingConfig, NotificationsConfig};
pub use database::Database;
pub use kv::{KeyValueStore, MemoryStore};
pub use state::PersistedState;

use std::path::PathBuf;

use crate::error::ConfigError;

/// Returns `~/.config/chronozen[-dev]/`, creating it if needed.
///
/// Set CHRONOZEN_ENV=dev to use the development data directory, or
/// CHRONOZEN_DATA_DIR to point somewhere else entirely.
///
/// # Errors
/// Returns an error if creating the directory fails.
pub fn data_dir() -> Result<PathBuf, ConfigError> {
    let dir = match std::env::var_os("CHRONOZEN_DATA_DIR") {
        Some(custom) if !custom.is_empty() => PathBuf::from(custom),
        _ => {
            let base_dir = dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".config");
            let env = std::env::var("CHRONOZEN_ENV").unwrap_or_else(|_| "production".to_string());
            if env == "dev" {
                base_dir.join("chronozen-dev")
            } else {
                base_dir.join("chronozen")
            }
        }
    };

    std::fs::create_dir_all(&dir)
        .map_err(|e| ConfigError::NoDataDir(format!("{}: {e}", dir.display())))?;
    Ok(dir)
}
