//! Application config commands.
//!
//! Keys are dot paths into `config.toml`:
//! - `plan.keep_user_work`: keep completed and manual tasks on regeneration
//! - `timer.auto_complete`: complete the task without asking once its goal is reached
//! - `storage.db_path`: state database location; an empty value restores the default
//! - `storage.log_filter`: tracing filter used when `STUDYPLAN_LOG` is unset

use clap::Subcommand;
use studyplan_core::{Config, ConfigError};

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Print one config value
    Get {
        /// Dot path, e.g. "plan.keep_user_work" or "storage.db_path"
        key: String,
    },
    /// Change one config value and save it
    Set {
        /// Dot path
        key: String,
        /// New value; "" clears an optional key
        value: String,
    },
    /// Print the whole config as JSON
    List,
    /// Print where the state database lives
    DbPath,
    /// Overwrite the config file with defaults
    Reset,
}

pub fn run(action: ConfigAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        ConfigAction::Get { key } => {
            let config = Config::load()?;
            let value = config
                .get(&key)
                .ok_or_else(|| ConfigError::UnknownKey(key.clone()))?;
            println!("{value}");
        }
        ConfigAction::Set { key, value } => {
            let mut config = Config::load()?;
            config.set(&key, &value)?;
            config.save()?;
            tracing::info!(%key, %value, "config updated");
            println!("ok");
        }
        ConfigAction::List => {
            let config = Config::load()?;
            println!("{}", serde_json::to_string_pretty(&config)?);
        }
        ConfigAction::DbPath => {
            let config = Config::load()?;
            println!("{}", config.db_path()?.display());
        }
        ConfigAction::Reset => {
            Config::default().save()?;
            eprintln!("config reset to defaults");
        }
    }
    Ok(())
}
