use clap::Subcommand;
use habitroom_core::{Config, ConfigError};

use super::print_json;

/// Keys accepted by `config get` and `config set`.
const KEYS: &[&str] = &["streak.horizon_days", "reminders.enabled", "reminders.smart"];

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Print one setting
    Get {
        /// Dot-separated key, e.g. "reminders.smart"
        key: String,
    },
    /// Change one setting and save the file
    Set {
        /// Dot-separated key, e.g. "streak.horizon_days"
        key: String,
        /// New value
        value: String,
    },
    /// Print every setting as JSON
    List,
    /// Print the location of config.toml
    Path,
    /// Overwrite config.toml with the defaults
    Reset,
}

pub fn run(action: ConfigAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        ConfigAction::Get { key } => {
            let value = Config::load()?.get(&key).ok_or_else(|| unknown_key(&key))?;
            println!("{value}");
        }
        ConfigAction::Set { key, value } => {
            let mut config = Config::load()?;
            config.set(&key, &value)?;
            config.save()?;
            let stored = config.get(&key).unwrap_or(value);
            println!("{key} = {stored}");
        }
        ConfigAction::List => print_json(&Config::load()?)?,
        ConfigAction::Path => println!("{}", Config::path()?.display()),
        ConfigAction::Reset => {
            Config::default().save()?;
            println!("reset {}", Config::path()?.display());
        }
    }
    Ok(())
}

fn unknown_key(key: &str) -> ConfigError {
    ConfigError::UnknownKey(format!("{key} (known keys: {})", KEYS.join(", ")))
}
