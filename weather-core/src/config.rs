use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

use crate::{error::FetchError, http::DEFAULT_TIMEOUT_SECS, model::Coordinates, units::UnitPreference};

pub const DEFAULT_BASE_URL: &str = "https://api.openweathermap.org/data/2.5/weather";

/// Environment variable that overrides the stored API key.
pub const API_KEY_ENV: &str = "OPENWEATHER_API_KEY";

/// Keys shorter than this cannot be real OpenWeatherMap keys.
pub const MIN_API_KEY_LEN: usize = 30;

/// Top-level configuration stored on disk.
///
/// Example TOML:
/// ```toml
/// api_key = "..."
/// default_units = "imperial"
///
/// [home]
/// lat = 51.5
/// lon = -0.12
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Config {
    pub api_key: Option<String>,

    /// Override for the current-weather endpoint.
    pub base_url: Option<String>,

    pub timeout_secs: Option<u64>,

    pub default_units: Option<UnitPreference>,

    /// Fixed coordinates to use instead of IP lookup in GPS mode.
    pub home: Option<Coordinates>,
}

impl Config {
    /// Load config from disk, or return an empty default if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_file_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            // First run: no config file, return empty.
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let cfg: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(cfg)
    }

    /// Save config to disk, creating parent directories as needed.
    pub fn save(&self) -> Result<PathBuf> {
        let path = Self::config_file_path()?;
        self.save_to(&path)?;
        Ok(path)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "weather-task", "weather-cli")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }

    pub fn set_api_key(&mut self, api_key: String) {
        self.api_key = Some(api_key.trim().to_string());
    }

    /// The effective API key: a non-empty environment value wins over the stored one.
    pub fn resolve_api_key(&self, env_value: Option<String>) -> Option<String> {
        env_value
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .or_else(|| self.api_key.clone())
    }

    /// Shorthand for [`Config::resolve_api_key`] reading [`API_KEY_ENV`].
    pub fn api_key_from_env(&self) -> Option<String> {
        self.resolve_api_key(std::env::var(API_KEY_ENV).ok())
    }

    pub fn base_url(&self) -> &str {
        self.base_url.as_deref().unwrap_or(DEFAULT_BASE_URL)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS))
    }

    pub fn units(&self) -> UnitPreference {
        self.default_units.unwrap_or_default()
    }
}

/// Minimal plausibility check for an API key.
pub fn validate_api_key(api_key: Option<&str>) -> Result<&str, FetchError> {
    match api_key.map(str::trim) {
        Some(key) if key.len() >= MIN_API_KEY_LEN => Ok(key),
        _ => Err(FetchError::InvalidApiKey),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const KEY: &str = "0123456789abcdef0123456789abcdef";

    #[test]
    fn env_value_overrides_stored_key() {
        let mut cfg = Config::default();
        cfg.set_api_key("stored".into());

        assert_eq!(cfg.resolve_api_key(Some("from-env".into())).as_deref(), Some("from-env"));
        assert_eq!(cfg.resolve_api_key(Some("   ".into())).as_deref(), Some("stored"));
        assert_eq!(cfg.resolve_api_key(None).as_deref(), Some("stored"));
    }

    #[test]
    fn missing_key_resolves_to_none() {
        let cfg = Config::default();
        assert_eq!(cfg.resolve_api_key(None), None);
    }

    #[test]
    fn validate_rejects_missing_and_short_keys() {
        assert_eq!(validate_api_key(None), Err(FetchError::InvalidApiKey));
        assert_eq!(validate_api_key(Some("")), Err(FetchError::InvalidApiKey));
        assert_eq!(validate_api_key(Some("short")), Err(FetchError::InvalidApiKey));
        assert_eq!(validate_api_key(Some(KEY)), Ok(KEY));
    }

    #[test]
    fn defaults_apply_when_unset() {
        let cfg = Config::default();
        assert_eq!(cfg.base_url(), DEFAULT_BASE_URL);
        assert_eq!(cfg.timeout(), Duration::from_secs(DEFAULT_TIMEOUT_SECS));
        assert_eq!(cfg.units(), UnitPreference::Metric);
    }

    #[test]
    fn load_missing_file_gives_default() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = Config::load_from(&dir.path().join("nope.toml")).unwrap();
        assert_eq!(cfg, Config::default());
    }

    #[test]
    fn save_and_load_preserve_settings() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut cfg = Config::default();
        cfg.set_api_key(KEY.into());
        cfg.default_units = Some(UnitPreference::Imperial);
        cfg.home = Some(Coordinates { lat: 51.5, lon: -0.12 });
        cfg.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded, cfg);
    }

    #[test]
    fn parse_error_mentions_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "api_key = [").unwrap();

        let err = Config::load_from(&path).unwrap_err();
        assert!(err.to_string().contains("Failed to parse config file"));
    }
}
