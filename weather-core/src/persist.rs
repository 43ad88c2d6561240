use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::Path, path::PathBuf};

use crate::{history::SearchHistory, settings::Settings};

/// The part of the store that survives restarts. Everything else is
/// rebuilt from the network.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistedState {
    #[serde(default)]
    pub search_history: SearchHistory,
    #[serde(default)]
    pub settings: Settings,
}

impl PersistedState {
    /// Load from `path`, or defaults if the file doesn't exist yet.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read weather storage: {}", path.display()))?;

        let state: PersistedState = serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse weather storage: {}", path.display()))?;

        Ok(state)
    }

    /// Like `load_from`, but a broken file only costs a warning.
    pub fn load_or_default(path: &Path) -> Self {
        Self::load_from(path).unwrap_or_else(|err| {
            tracing::warn!("Ignoring stored preferences: {err:#}");
            Self::default()
        })
    }

    /// Save to `path`, creating parent directories as needed.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create storage directory: {}", parent.display())
            })?;
        }

        let json = serde_json::to_string_pretty(self)
            .context("Failed to serialize weather storage to JSON")?;

        fs::write(path, json)
            .with_context(|| format!("Failed to write weather storage: {}", path.display()))?;

        Ok(())
    }

    /// Platform data directory location of the storage record.
    pub fn default_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "weather-task", "weather-cli")
            .ok_or_else(|| anyhow!("Could not determine platform data directory"))?;

        Ok(dirs.data_dir().join("weather-storage.json"))
    }
}
