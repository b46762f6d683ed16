mod config;
pub mod prefs;

pub use config::{Config, TimingConfig};
pub use prefs::PrefStore;

use std::path::PathBuf;

/// Returns `~/.config/scareloop[-dev]/` based on SCARELOOP_ENV.
///
/// Set SCARELOOP_ENV=dev to use a development data directory.
///
/// # Errors
/// Returns an error if the home directory cannot be determined or if
/// creating the config directory fails.
pub fn data_dir() -> Result<PathBuf, Box<dyn std::error::Error>> {
    let base_dir = dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config");

    let env = std::env::var("SCARELOOP_ENV").unwrap_or_else(|_| "production".to_string());

    let dir = if env == "dev" {
        base_dir.join("scareloop-dev")
    } else {
        base_dir.join("scareloop")
    };

    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}
