use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf};

use crate::{model::TemperatureUnit, provider::weatherapi::DEFAULT_BASE_URL};

pub const DEFAULT_LOCATION: &str = "San Francisco";
pub const API_KEY_ENV: &str = "WEATHER_API_KEY";
pub const BASE_URL_ENV: &str = "WEATHER_API_BASE_URL";

/// Top-level configuration stored on disk.
///
/// Example TOML:
/// ```toml
/// api_key = "..."
/// default_location = "Portland, Oregon"
/// temperature_unit = "celsius"
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub api_key: Option<String>,

    /// Override of the provider base URL, mostly for testing.
    pub base_url: Option<String>,

    pub default_location: Option<String>,

    pub temperature_unit: TemperatureUnit,

    /// Values from the environment. Never written back to disk.
    #[serde(skip)]
    env: EnvOverrides,
}

#[derive(Debug, Clone, Default)]
struct EnvOverrides {
    api_key: Option<String>,
    base_url: Option<String>,
}

impl Config {
    /// Returns the API key, treating a blank value as absent.
    pub fn api_key(&self) -> Option<&str> {
        self.env
            .api_key
            .as_deref()
            .or(self.api_key.as_deref())
            .map(str::trim)
            .filter(|k| !k.is_empty())
    }

    pub fn set_api_key(&mut self, api_key: String) {
        self.api_key = Some(api_key.trim().to_string());
    }

    pub fn base_url(&self) -> &str {
        self.env
            .base_url
            .as_deref()
            .or(self.base_url.as_deref())
            .unwrap_or(DEFAULT_BASE_URL)
    }

    pub fn default_location(&self) -> &str {
        self.default_location.as_deref().unwrap_or(DEFAULT_LOCATION)
    }

    /// Load config from disk, or return an empty default if it doesn't exist yet,
    /// then apply environment overrides.
    pub fn load() -> Result<Self> {
        let mut cfg = Self::load_file()?;
        cfg.apply_env_overrides_with(|name| std::env::var(name).ok());
        Ok(cfg)
    }

    /// Load only what is stored on disk, without environment overrides.
    /// Use this when the config is going to be saved again.
    pub fn load_file() -> Result<Self> {
        let path = Self::config_file_path()?;
        if !path.exists() {
            // First run: no config file, return empty.
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        Self::from_toml(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    pub fn from_toml(contents: &str) -> Result<Self> {
        Ok(toml::from_str(contents)?)
    }

    /// Environment values win over the file. `lookup` is injectable so tests
    /// never touch the process environment.
    pub fn apply_env_overrides_with<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(key) = lookup(API_KEY_ENV).filter(|k| !k.trim().is_empty()) {
            self.env.api_key = Some(key.trim().to_string());
        }
        if let Some(url) = lookup(BASE_URL_ENV).filter(|u| !u.trim().is_empty()) {
            self.env.base_url = Some(url.trim().to_string());
        }
    }

    /// Save config to disk, creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        let path = Self::config_file_path()?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(&path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "weatherdash", "weatherdash")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> =
            pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn defaults() {
        let cfg = Config::default();
        assert_eq!(cfg.api_key(), None);
        assert_eq!(cfg.base_url(), DEFAULT_BASE_URL);
        assert_eq!(cfg.default_location(), "San Francisco");
        assert_eq!(cfg.temperature_unit, TemperatureUnit::Fahrenheit);
    }

    #[test]
    fn parses_toml() {
        let cfg = Config::from_toml(
            r#"
            api_key = "ABC"
            default_location = "Portland, Oregon"
            temperature_unit = "celsius"
            "#,
        )
        .expect("valid toml");

        assert_eq!(cfg.api_key(), Some("ABC"));
        assert_eq!(cfg.default_location(), "Portland, Oregon");
        assert_eq!(cfg.temperature_unit, TemperatureUnit::Celsius);
        assert_eq!(cfg.base_url(), DEFAULT_BASE_URL);
    }

    #[test]
    fn rejects_unknown_unit() {
        assert!(Config::from_toml(r#"temperature_unit = "kelvin""#).is_err());
    }

    #[test]
    fn env_overrides_file_values() {
        let mut cfg = Config { api_key: Some("FILE_KEY".into()), ..Config::default() };
        cfg.apply_env_overrides_with(env(&[
            (API_KEY_ENV, "ENV_KEY"),
            (BASE_URL_ENV, "http://localhost:8080/v1"),
        ]));

        assert_eq!(cfg.api_key(), Some("ENV_KEY"));
        assert_eq!(cfg.base_url(), "http://localhost:8080/v1");
    }

    #[test]
    fn blank_env_does_not_clear_file_key() {
        let mut cfg = Config { api_key: Some("FILE_KEY".into()), ..Config::default() };
        cfg.apply_env_overrides_with(env(&[(API_KEY_ENV, "  ")]));
        assert_eq!(cfg.api_key(), Some("FILE_KEY"));
    }

    #[test]
    fn env_overrides_are_not_saved() {
        let mut cfg = Config::from_toml("").expect("empty config");
        cfg.apply_env_overrides_with(env(&[
            (API_KEY_ENV, "ENV_KEY"),
            (BASE_URL_ENV, "http://localhost:9999/v1"),
        ]));
        cfg.set_api_key("SAVED_KEY".into());

        assert_eq!(cfg.api_key(), Some("ENV_KEY"));

        let text = toml::to_string_pretty(&cfg).expect("serializes");
        assert!(!text.contains("localhost:9999"), "{text}");
        assert!(!text.contains("ENV_KEY"), "{text}");
        assert!(text.contains("SAVED_KEY"), "{text}");

        let back = Config::from_toml(&text).expect("parses");
        assert_eq!(back.base_url(), DEFAULT_BASE_URL);
        assert_eq!(back.api_key(), Some("SAVED_KEY"));
    }

    #[test]
    fn blank_key_counts_as_missing() {
        let cfg = Config { api_key: Some("".into()), ..Config::default() };
        assert_eq!(cfg.api_key(), None);
    }

    #[test]
    fn toml_roundtrip_keeps_settings() {
        let mut cfg = Config::default();
        cfg.set_api_key(" KEY ".into());
        cfg.temperature_unit = TemperatureUnit::Celsius;

        let text = toml::to_string_pretty(&cfg).expect("serializes");
        let back = Config::from_toml(&text).expect("parses");
        assert_eq!(back.api_key(), Some("KEY"));
        assert_eq!(back.temperature_unit, TemperatureUnit::Celsius);
    }
}
