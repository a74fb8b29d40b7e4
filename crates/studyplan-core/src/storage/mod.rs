mod config;
pub mod database;
pub mod snapshot;

pub use config::{Config, PlanSection, StorageSection, TimerSection};
pub use database::{Database, StateStore};
pub use snapshot::{LoadedState, STORAGE_KEY};

use std::path::PathBuf;

use crate::error::StorageError;

/// Returns `~/.config/studyplan[-dev]/`.
///
/// `STUDYPLAN_DATA_DIR` overrides the location outright; otherwise
/// `STUDYPLAN_ENV=dev` selects the development directory.
///
/// # Errors
/// Returns an error if creating the directory fails.
pub fn data_dir() -> Result<PathBuf, StorageError> {
    let dir = match std::env::var_os("STUDYPLAN_DATA_DIR") {
        Some(dir) if !dir.is_empty() => PathBuf::from(dir),
        _ => {
            let base_dir = dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".config");
            let env = std::env::var("STUDYPLAN_ENV").unwrap_or_else(|_| "production".to_string());
            if env == "dev" {
                base_dir.join("studyplan-dev")
            } else {
                base_dir.join("studyplan")
            }
        }
    };

    std::fs::create_dir_all(&dir)
        .map_err(|e| StorageError::DataDir(format!("{}: {e}", dir.display())))?;
    Ok(dir)
}
