mod config;
pub mod database;
pub mod migrations;

pub use config::{AuthConfig, Config, ServerConfig, StorageConfig, JWT_SECRET_ENV};
pub use database::Database;

use std::path::PathBuf;

use crate::error::{ConfigError, Result};

/// Returns `~/.config/aetherday[-dev]/` based on AETHERDAY_ENV.
///
/// Set AETHERDAY_ENV=dev to use development data directory.
///
/// # Errors
/// Returns an error if creating the config directory fails.
pub fn data_dir() -> Result<PathBuf> {
    let base_dir = dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config");

    let env = std::env::var("AETHERDAY_ENV").unwrap_or_else(|_| "production".to_string());

    let dir = if env == "dev" {
        base_dir.join("aetherday-dev")
    } else {
        base_dir.join("aetherday")
    };

    std::fs::create_dir_all(&dir)
        .map_err(|e| ConfigError::DataDir(format!("{}: {e}", dir.display())))?;
    Ok(dir)
}
