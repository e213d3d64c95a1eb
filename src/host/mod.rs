//! Contract between installer plugins and the mod manager hosting them.
//!
//! The host owns the archive, the GUI and the plugin settings; an installer
//! only sees them through these traits. The host calls, in order:
//! 1. [`Plugin::init`] once when loading the plugin
//! 2. [`SimpleInstaller::is_archive_supported`] for each candidate archive
//! 3. [`SimpleInstaller::on_installation_start`]
//! 4. [`SimpleInstaller::install`]
//! 5. [`SimpleInstaller::on_installation_end`]

mod guessed;
mod local;

pub use guessed::{GuessQuality, GuessedString};
pub use local::LocalOrganizer;

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::dialog::ConfirmDialog;
use crate::tree::{FileTree, FileTreeEntry};

/// Plugin version as reported to the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct VersionInfo {
    pub major: u32,
    pub minor: u32,
    pub patch: u32,
}

impl VersionInfo {
    pub const fn new(major: u32, minor: u32, patch: u32) -> Self {
        Self { major, minor, patch }
    }
}

impl fmt::Display for VersionInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

/// Value of a plugin setting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SettingValue {
    Bool(bool),
    Int(i64),
    Text(String),
}

impl SettingValue {
    pub fn as_int(&self) -> Option<i64> {
        match self {
            SettingValue::Int(value) => Some(*value),
            _ => None,
        }
    }
}

/// A setting a plugin declares, with its default.
#[derive(Debug, Clone, PartialEq)]
pub struct PluginSetting {
    pub key: String,
    pub description: String,
    pub default: SettingValue,
}

impl PluginSetting {
    pub fn new(key: &str, description: &str, default: SettingValue) -> Self {
        Self {
            key: key.to_string(),
            description: description.to_string(),
            default,
        }
    }
}

/// Outcome of an install attempt, consumed by the host.
#[derive(Debug, Clone, PartialEq)]
pub enum InstallResult {
    /// Install `tree` as the new mod.
    Success {
        tree: FileTree,
        version: String,
        nexus_id: i32,
    },
    /// The user wants the host's manual installer instead.
    ManualRequested {
        tree: FileTree,
        version: String,
        nexus_id: i32,
    },
    Canceled,
}

impl InstallResult {
    pub fn label(&self) -> &'static str {
        match self {
            InstallResult::Success { .. } => "success",
            InstallResult::ManualRequested { .. } => "manual installation requested",
            InstallResult::Canceled => "canceled",
        }
    }
}

/// The running mod manager.
pub trait Organizer {
    /// Short identifier of the game being managed, e.g. `farmingsimulator25`.
    fn managed_game_short_name(&self) -> String;

    /// Stored value of a plugin setting, if the user changed it.
    fn plugin_setting(&self, plugin: &str, key: &str) -> Option<SettingValue>;
}

/// Access to the archive currently being installed.
pub trait InstallationManager {
    /// Extract a single file entry to a temporary location and return its path.
    fn extract_file(&self, entry: &FileTreeEntry) -> anyhow::Result<PathBuf>;
}

/// Identity and lifecycle common to all plugins.
pub trait Plugin {
    fn name(&self) -> &str;
    fn author(&self) -> &str;
    fn version(&self) -> VersionInfo;
    fn description(&self) -> &str;
    fn settings(&self) -> Vec<PluginSetting>;

    /// Called once after loading. Returning false disables the plugin.
    fn init(&mut self, organizer: Arc<dyn Organizer>) -> bool;
}

/// An installer that receives the whole archive tree at once.
pub trait SimpleInstaller: Plugin {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Higher priorities are asked first.
    fn priority(&self) -> i64;

    fn is_manual_installer(&self) -> bool;

    fn is_archive_supported(&self, tree: &FileTree) -> bool;

    fn set_installation_manager(&mut self, manager: Arc<dyn InstallationManager>);

    fn set_dialog(&mut self, dialog: Box<dyn ConfirmDialog>);

    fn on_installation_start(&mut self, _archive: &Path, _reinstallation: bool) {}

    fn on_installation_end(&mut self, _result: &InstallResult) {}

    fn install(
        &mut self,
        name: &mut GuessedString,
        tree: &FileTree,
        version: &str,
        nexus_id: i32,
    ) -> Result<InstallResult, Self::Error>;
}
