//! Environment loading for the visamap CLI
//!
//! Priority order (highest to lowest):
//! 1. Environment variables already set
//! 2. Current directory .env
//! 3. ~/.visamap/.env
//!
//! dotenvy never overwrites a variable that is already set, so loading the
//! current directory first gives it precedence over the home directory file.

use std::path::PathBuf;

use tracing::{debug, info};

/// Get the visamap config directory path (~/.visamap)
pub fn config_dir() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".visamap"))
}

/// Load `.env` files. Returns a description of every file that was loaded.
///
/// Runs before tracing is initialised (clap reads `env = ...` defaults at
/// parse time), so the result is reported later via [`report_dotenv`].
pub fn load_dotenv() -> Vec<String> {
    let mut loaded_from = Vec::new();

    if let Ok(path) = dotenvy::dotenv() {
        loaded_from.push(format!("current directory ({})", path.display()));
    }

    if let Some(env_file) = config_dir().map(|dir| dir.join(".env")) {
        if env_file.exists() && dotenvy::from_path(&env_file).is_ok() {
            loaded_from.push(format!("~/.visamap/.env ({})", env_file.display()));
        }
    }

    loaded_from
}

/// Log where configuration came from.
pub fn report_dotenv(loaded_from: &[String]) {
    if loaded_from.is_empty() {
        debug!("No .env files found (current dir or ~/.visamap)");
    } else {
        info!("Loaded configuration from: {}", loaded_from.join(", "));
    }
}
