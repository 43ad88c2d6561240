use anyhow::{Context, Result, anyhow};
use chrono::Locale;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf, time::Duration};

/// Environment variable that overrides the stored API key.
pub const API_KEY_ENV: &str = "WEATHERAPI_KEY";

pub const DEFAULT_BASE_URL: &str = "https://api.weatherapi.com/v1";

/// Top-level configuration stored on disk.
///
/// Example TOML:
/// ```toml
/// api_key = "..."
/// language = "en"
/// default_place = "Bandung"
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// WeatherAPI.com key.
    #[serde(default)]
    pub api_key: Option<String>,

    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Provider `lang` parameter; also picks day/month names.
    #[serde(default = "default_language")]
    pub language: String,

    #[serde(default = "default_forecast_days")]
    pub forecast_days: u8,

    /// Shown when nothing has been searched yet.
    #[serde(default = "default_place")]
    pub default_place: String,

    #[serde(default = "default_refresh_interval_mins")]
    pub refresh_interval_mins: u64,

    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Attempts made to load the initial place before giving up.
    #[serde(default = "default_max_load_attempts")]
    pub max_load_attempts: u32,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_language() -> String {
    "id".to_string()
}

const fn default_forecast_days() -> u8 {
    7
}

fn default_place() -> String {
    "Jakarta".to_string()
}

const fn default_refresh_interval_mins() -> u64 {
    10
}

const fn default_request_timeout_secs() -> u64 {
    10
}

const fn default_max_load_attempts() -> u32 {
    3
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_base_url(),
            language: default_language(),
            forecast_days: default_forecast_days(),
            default_place: default_place(),
            refresh_interval_mins: default_refresh_interval_mins(),
            request_timeout_secs: default_request_timeout_secs(),
            max_load_attempts: default_max_load_attempts(),
        }
    }
}

impl Config {
    /// Returns the API key or a hint on how to set one.
    pub fn api_key(&self) -> Result<&str> {
        self.api_key.as_deref().filter(|k| !k.is_empty()).ok_or_else(|| {
            anyhow!(
                "No API key configured.\n\
                 Hint: run `weather configure` or set {API_KEY_ENV}."
            )
        })
    }

    pub fn set_api_key(&mut self, api_key: String) {
        self.api_key = Some(api_key);
    }

    /// Replace the stored key with `env_key` when that is set and non-empty.
    pub fn apply_api_key_override(&mut self, env_key: Option<String>) {
        if let Some(key) = env_key.filter(|k| !k.trim().is_empty()) {
            self.api_key = Some(key.trim().to_string());
        }
    }

    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.refresh_interval_mins.max(1) * 60)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Locale for weekday and month names.
    pub fn locale(&self) -> Locale {
        locale_for(&self.language)
    }

    /// Load config from disk (or defaults on first run), then apply env overrides.
    pub fn load() -> Result<Self> {
        let mut cfg = Self::load_file()?;
        cfg.apply_api_key_override(std::env::var(API_KEY_ENV).ok());
        Ok(cfg)
    }

    fn load_file() -> Result<Self> {
        let path = Self::config_file_path()?;
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let cfg: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(cfg)
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
        let dirs = ProjectDirs::from("dev", "weather-task", "weather-cli")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }
}

/// Maps a provider language code to a chrono locale. Unknown codes fall back to English.
pub fn locale_for(language: &str) -> Locale {
    match language.to_lowercase().as_str() {
        "id" => Locale::id_ID,
        "de" => Locale::de_DE,
        "fr" => Locale::fr_FR,
        "es" => Locale::es_ES,
        "nl" => Locale::nl_NL,
        _ => Locale::en_US,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_key_errors_when_not_set() {
        let cfg = Config::default();
        let err = cfg.api_key().unwrap_err();

        assert!(err.to_string().contains("No API key configured"));
        assert!(err.to_string().contains("weather configure"));
    }

    #[test]
    fn empty_api_key_counts_as_missing() {
        let mut cfg = Config::default();
        cfg.set_api_key(String::new());
        assert!(cfg.api_key().is_err());
    }

    #[test]
    fn env_override_replaces_stored_key() {
        let mut cfg = Config::default();
        cfg.set_api_key("FROM_FILE".into());

        cfg.apply_api_key_override(Some(" FROM_ENV ".into()));
        assert_eq!(cfg.api_key().unwrap(), "FROM_ENV");

        cfg.apply_api_key_override(Some("   ".into()));
        assert_eq!(cfg.api_key().unwrap(), "FROM_ENV");

        cfg.apply_api_key_override(None);
        assert_eq!(cfg.api_key().unwrap(), "FROM_ENV");
    }

    #[test]
    fn partial_toml_uses_defaults() {
        let cfg: Config = toml::from_str(
            r#"
            api_key = "KEY"
            language = "en"
            "#,
        )
        .unwrap();

        assert_eq!(cfg.api_key().unwrap(), "KEY");
        assert_eq!(cfg.base_url, DEFAULT_BASE_URL);
        assert_eq!(cfg.forecast_days, 7);
        assert_eq!(cfg.default_place, "Jakarta");
        assert_eq!(cfg.refresh_interval(), Duration::from_secs(600));
        assert_eq!(cfg.max_load_attempts, 3);
        assert_eq!(cfg.locale(), Locale::en_US);
    }

    #[test]
    fn toml_roundtrip_preserves_fields() {
        let mut cfg = Config::default();
        cfg.set_api_key("KEY".into());
        cfg.default_place = "Surabaya".into();

        let text = toml::to_string_pretty(&cfg).unwrap();
        let back: Config = toml::from_str(&text).unwrap();

        assert_eq!(back.api_key.as_deref(), Some("KEY"));
        assert_eq!(back.default_place, "Surabaya");
    }

    #[test]
    fn locale_lookup() {
        assert_eq!(locale_for("ID"), Locale::id_ID);
        assert_eq!(locale_for("xx"), Locale::en_US);
    }
}
