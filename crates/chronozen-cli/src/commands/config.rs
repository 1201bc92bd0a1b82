use chronozen_core::congrats::keyring_store;
use chronozen_core::Config;
use clap::Subcommand;

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Get a config value
    Get {
        /// Config key (e.g. "notifications.sound", "congrats.model")
        key: String,
    },
    /// Set a config value
    Set {
        /// Config key
        key: String,
        /// New value
        value: String,
    },
    /// List all config values
    List,
    /// Reset config to defaults
    Reset,
    /// Store the message generator API key in the OS keyring
    SetApiKey {
        /// API key
        key: String,
    },
    /// Remove the stored API key from the OS keyring
    ClearApiKey,
}

pub fn run(action: ConfigAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        ConfigAction::Get { key } => {
            let config = Config::load()?;
            match config.get(&key) {
                Some(value) => println!("{value}"),
                None => return Err(format!("unknown key: {key}").into()),
            }
        }
        ConfigAction::Set { key, value } => {
            let mut config = Config::load()?;
            config.set(&key, &value)?;
            config.save()?;
            println!("ok");
        }
        ConfigAction::List => {
            let config = Config::load()?;
            println!("{}", serde_json::to_string_pretty(&config)?);
        }
        ConfigAction::Reset => {
            Config::default().save()?;
            println!("config reset to defaults");
        }
        ConfigAction::SetApiKey { key } => {
            let key = key.trim();
            if key.is_empty() {
                return Err("API key must not be empty".into());
            }
            keyring_store::set(keyring_store::API_KEY_ENTRY, key)?;
            println!("API key stored in keyring");
        }
        ConfigAction::ClearApiKey => {
            keyring_store::delete(keyring_store::API_KEY_ENTRY)?;
            println!("API key removed from keyring");
        }
    }
    Ok(())
}

