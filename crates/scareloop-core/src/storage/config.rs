//! TOML-based application configuration.
//!
//! Stores the effect's startup constants:
//! - Timing knobs (random scheduling window, retry backoff, display duration)
//! - The scare asset catalog (visual/audio pairs)
//!
//! Configuration is stored at `~/.config/scareloop/config.toml`. These are
//! startup constants, not runtime flags -- the engine reads them once.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use super::data_dir;
use crate::catalog::{ScareCatalog, ScareEntry};
use crate::engine::EngineConfig;
use crate::error::{CatalogError, ConfigError};

/// Timing knobs for the engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimingConfig {
    /// Upper bound of the uniform random scheduling window, in seconds.
    #[serde(default = "default_schedule_window_secs")]
    pub schedule_window_secs: u64,
    /// Fixed backoff after a blocked wake-up, in seconds.
    #[serde(default = "default_retry_backoff_secs")]
    pub retry_backoff_secs: u64,
    /// How long a scare stays on screen, in milliseconds.
    #[serde(default = "default_display_duration_ms")]
    pub display_duration_ms: u64,
}

/// Application configuration.
///
/// Serialized to/from TOML at `~/.config/scareloop/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub timing: TimingConfig,
    /// Scare asset pairs. Must not be empty; validated when the catalog
    /// is built, before the engine can arm.
    #[serde(default = "default_catalog")]
    pub catalog: Vec<ScareEntry>,
}

fn default_schedule_window_secs() -> u64 {
    60
}
fn default_retry_backoff_secs() -> u64 {
    10
}
fn default_display_duration_ms() -> u64 {
    3_000
}
fn default_catalog() -> Vec<ScareEntry> {
    ScareCatalog::default_assets().entries().to_vec()
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            schedule_window_secs: default_schedule_window_secs(),
            retry_backoff_secs: default_retry_backoff_secs(),
            display_duration_ms: default_display_duration_ms(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            timing: TimingConfig::default(),
            catalog: default_catalog(),
        }
    }
}

impl Config {
    fn path() -> Result<PathBuf, ConfigError> {
        let dir = data_dir().map_err(|e| ConfigError::LoadFailed {
            path: PathBuf::from("~/.config/scareloop"),
            message: e.to_string(),
        })?;
        Ok(dir.join("config.toml"))
    }

    /// Load from disk, writing the default config on first run.
    ///
    /// # Errors
    /// Returns an error if the config file exists but cannot be parsed,
    /// or if the default config cannot be written to disk.
    pub fn load() -> Result<Self, ConfigError> {
        let path = Self::path()?;
        if path.exists() {
            Self::load_from(&path)
        } else {
            let cfg = Self::default();
            cfg.save_to(&path)?;
            Ok(cfg)
        }
    }

    /// Load from an explicit path.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or parsed.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::LoadFailed {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        toml::from_str(&content).map_err(|e| ConfigError::ParseFailed(e.to_string()))
    }

    /// Persist to disk.
    ///
    /// # Errors
    /// Returns an error if the config cannot be serialized or written.
    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(&Self::path()?)
    }

    /// Persist to an explicit path.
    ///
    /// # Errors
    /// Returns an error if the config cannot be serialized or written.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let content =
            toml::to_string_pretty(self).map_err(|e| ConfigError::ParseFailed(e.to_string()))?;
        std::fs::write(path, content).map_err(|e| ConfigError::SaveFailed {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    /// Load from disk, returning default on error.
    /// This is a convenience method that never fails.
    pub fn load_or_default() -> Self {
        Self::load().unwrap_or_default()
    }

    /// Engine timing constants in engine units.
    pub fn engine_config(&self) -> EngineConfig {
        EngineConfig {
            schedule_window_ms: self.timing.schedule_window_secs.saturating_mul(1_000),
            retry_backoff_ms: self.timing.retry_backoff_secs.saturating_mul(1_000),
            display_duration_ms: self.timing.display_duration_ms,
        }
    }

    /// Build the validated scare catalog.
    ///
    /// # Errors
    /// Returns [`CatalogError::Empty`] if no entries are configured.
    pub fn scare_catalog(&self) -> Result<ScareCatalog, CatalogError> {
        ScareCatalog::new(self.catalog.clone())
    }

    /// Get a timing value as string by key.
    pub fn get(&self, key: &str) -> Option<String> {
        match key {
            "timing.schedule_window_secs" => Some(self.timing.schedule_window_secs.to_string()),
            "timing.retry_backoff_secs" => Some(self.timing.retry_backoff_secs.to_string()),
            "timing.display_duration_ms" => Some(self.timing.display_duration_ms.to_string()),
            _ => None,
        }
    }

    /// Set a timing value by key and persist.
    ///
    /// # Errors
    /// Returns an error if the key is unknown, the value cannot be parsed,
    /// or the config cannot be saved.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let parsed: u64 = value.parse().map_err(|_| ConfigError::InvalidValue {
            key: key.to_string(),
            message: format!("cannot parse '{value}' as a number"),
        })?;
        match key {
            "timing.schedule_window_secs" => self.timing.schedule_window_secs = parsed,
            "timing.retry_backoff_secs" => self.timing.retry_backoff_secs = parsed,
            "timing.display_duration_ms" => self.timing.display_duration_ms = parsed,
            _ => return Err(ConfigError::UnknownKey(key.to_string())),
        }
        self.save()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_roundtrip() {
        let cfg = Config::default();
        let toml_str = toml::to_string_pretty(&cfg).unwrap();
        let parsed: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed.timing.schedule_window_secs, 60);
        assert_eq!(parsed.timing.retry_backoff_secs, 10);
        assert_eq!(parsed.timing.display_duration_ms, 3_000);
        assert_eq!(parsed.catalog.len(), 4);
    }

    #[test]
    fn missing_sections_fall_back_to_defaults() {
        let parsed: Config = toml::from_str("").unwrap();
        assert_eq!(parsed.timing.schedule_window_secs, 60);
        assert_eq!(parsed.catalog.len(), 4);
    }

    #[test]
    fn engine_config_units() {
        let cfg = Config::default();
        let ec = cfg.engine_config();
        assert_eq!(ec.schedule_window_ms, 60_000);
        assert_eq!(ec.retry_backoff_ms, 10_000);
        assert_eq!(ec.display_duration_ms, 3_000);
    }

    #[test]
    fn empty_catalog_fails_validation() {
        let cfg = Config {
            catalog: Vec::new(),
            ..Config::default()
        };
        assert!(cfg.scare_catalog().is_err());
    }

    #[test]
    fn get_known_and_unknown_keys() {
        let cfg = Config::default();
        assert_eq!(cfg.get("timing.schedule_window_secs").as_deref(), Some("60"));
        assert!(cfg.get("timing.missing").is_none());
    }

    #[test]
    fn save_and_load_explicit_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        let mut cfg = Config::default();
        cfg.timing.retry_backoff_secs = 5;
        cfg.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.timing.retry_backoff_secs, 5);
    }

    #[test]
    fn load_from_rejects_bad_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "timing = 'not a table'").unwrap();
        assert!(matches!(
            Config::load_from(&path),
            Err(ConfigError::ParseFailed(_))
        ));
    }
}
