//! Settings management for giants-installer
//!
//! Stores user preferences in ~/.config/giants-installer/settings.json

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::host::SettingValue;

/// Game managed when nothing else is configured.
pub const DEFAULT_GAME: &str = "farmingsimulator25";

fn default_game() -> String {
    DEFAULT_GAME.to_string()
}

/// User settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Short name of the game whose mods are being installed
    #[serde(default = "default_game")]
    pub managed_game: String,

    /// Mods directory used when `--output` is not given
    #[serde(default)]
    pub default_output_dir: String,

    /// Per-plugin setting overrides, keyed by plugin name then setting key
    #[serde(default)]
    pub plugin_settings: HashMap<String, HashMap<String, SettingValue>>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            managed_game: default_game(),
            default_output_dir: String::new(),
            plugin_settings: HashMap::new(),
        }
    }
}

impl Settings {
    /// Get the config directory path (~/.config/giants-installer)
    fn config_dir() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .context("Could not determine config directory")?
            .join("giants-installer");

        Ok(config_dir)
    }

    /// Get the settings file path
    pub fn settings_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("settings.json"))
    }

    /// Load settings from disk, or return defaults if not found
    pub fn load() -> Self {
        match Self::settings_path().and_then(|path| Self::load_from(&path)) {
            Ok(settings) => settings,
            Err(e) => {
                warn!("Could not load settings: {:#}. Using defaults.", e);
                Self::default()
            }
        }
    }

    /// Load settings from a specific file; a missing file yields defaults
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            debug!("No settings at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content =
            std::fs::read_to_string(path).with_context(|| format!("Failed to read {:?}", path))?;

        let settings: Self = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse {:?}", path))?;

        Ok(settings)
    }

    /// Save settings to a specific file, creating parent directories
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {:?}", parent))?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content).with_context(|| format!("Failed to write {:?}", path))?;

        Ok(())
    }

    /// Default output directory, if one is configured
    pub fn output_dir(&self) -> Option<PathBuf> {
        if self.default_output_dir.is_empty() {
            None
        } else {
            Some(PathBuf::from(&self.default_output_dir))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_gives_defaults() {
        let temp = tempfile::tempdir().unwrap();
        let settings = Settings::load_from(&temp.path().join("settings.json")).unwrap();
        assert_eq!(settings.managed_game, DEFAULT_GAME);
        assert!(settings.output_dir().is_none());
    }

    #[test]
    fn test_save_and_load() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("nested").join("settings.json");

        let mut settings = Settings::default();
        settings.default_output_dir = "/games/fs25/mods".to_string();
        settings
            .plugin_settings
            .entry("GIANTS Mod Installer".to_string())
            .or_default()
            .insert("priority".to_string(), SettingValue::Int(80));
        settings.save_to(&path).unwrap();

        let loaded = Settings::load_from(&path).unwrap();
        assert_eq!(loaded.output_dir(), Some(PathBuf::from("/games/fs25/mods")));
        assert_eq!(
            loaded.plugin_settings["GIANTS Mod Installer"]["priority"],
            SettingValue::Int(80)
        );
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("settings.json");
        std::fs::write(&path, r#"{"default_output_dir": "/mods"}"#).unwrap();

        let settings = Settings::load_from(&path).unwrap();
        assert_eq!(settings.managed_game, DEFAULT_GAME);
        assert_eq!(settings.default_output_dir, "/mods");
    }

    #[test]
    fn test_invalid_file_is_an_error() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("settings.json");
        std::fs::write(&path, "not json").unwrap();

        assert!(Settings::load_from(&path).is_err());
    }
}
