//! Organizer backed by the local settings file, used by the CLI.

use std::collections::HashMap;

use super::{Organizer, SettingValue};
use crate::settings::Settings;

/// A stand-in organizer with a fixed game and in-memory plugin settings.
#[derive(Debug, Clone, Default)]
pub struct LocalOrganizer {
    game: String,
    plugin_settings: HashMap<String, HashMap<String, SettingValue>>,
}

impl LocalOrganizer {
    pub fn new(game: impl Into<String>) -> Self {
        Self {
            game: game.into(),
            plugin_settings: HashMap::new(),
        }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            game: settings.managed_game.clone(),
            plugin_settings: settings.plugin_settings.clone(),
        }
    }

    /// Override the managed game.
    pub fn with_game(mut self, game: impl Into<String>) -> Self {
        self.game = game.into();
        self
    }

    pub fn with_setting(mut self, plugin: &str, key: &str, value: SettingValue) -> Self {
        self.plugin_settings
            .entry(plugin.to_string())
            .or_default()
            .insert(key.to_string(), value);
        self
    }
}

impl Organizer for LocalOrganizer {
    fn managed_game_short_name(&self) -> String {
        self.game.clone()
    }

    fn plugin_setting(&self, plugin: &str, key: &str) -> Option<SettingValue> {
        self.plugin_settings.get(plugin)?.get(key).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_settings_lookup() {
        let organizer = LocalOrganizer::new("farmingsimulator25").with_setting(
            "GIANTS Mod Installer",
            "priority",
            SettingValue::Int(50),
        );

        assert_eq!(organizer.managed_game_short_name(), "farmingsimulator25");
        assert_eq!(
            organizer.plugin_setting("GIANTS Mod Installer", "priority"),
            Some(SettingValue::Int(50))
        );
        assert_eq!(organizer.plugin_setting("GIANTS Mod Installer", "other"), None);
        assert_eq!(organizer.plugin_setting("Other Plugin", "priority"), None);
    }

    #[test]
    fn test_from_settings_and_game_override() {
        let mut settings = Settings::default();
        settings.managed_game = "farmingsimulator22".to_string();

        let organizer = LocalOrganizer::from_settings(&settings);
        assert_eq!(organizer.managed_game_short_name(), "farmingsimulator22");

        let organizer = organizer.with_game("farmingsimulator25");
        assert_eq!(organizer.managed_game_short_name(), "farmingsimulator25");
    }
}
