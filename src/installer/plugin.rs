//! The GIANTS mod installer plugin.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, info, warn};

use super::layout::{mod_folder_name, nest_under_folder};
use super::InstallError;
use crate::dialog::{ConfirmDialog, DialogCode, InstallerPrompt};
use crate::host::{
    GuessQuality, GuessedString, InstallResult, InstallationManager, Organizer, Plugin,
    PluginSetting, SettingValue, SimpleInstaller, VersionInfo,
};
use crate::manifest::{ModManifest, MANIFEST_FILE_NAME};
use crate::tree::{FileTree, FileType};

/// Games whose mods carry a `modDesc.xml`.
pub const SUPPORTED_GAMES: &[&str] = &["farmingsimulator25"];

/// Installer priority when the user has not changed it.
pub const DEFAULT_PRIORITY: i64 = 120;

const PRIORITY_SETTING: &str = "priority";

/// Installs GIANTS Software game mods.
///
/// Accepts archives with a top-level `modDesc.xml` and wraps their contents
/// in a single folder named after the archive, which is the layout the game
/// expects inside its mods directory.
#[derive(Default)]
pub struct GiantsInstaller {
    organizer: Option<Arc<dyn Organizer>>,
    manager: Option<Arc<dyn InstallationManager>>,
    dialog: Option<Box<dyn ConfirmDialog>>,
    /// Archive announced by the last `on_installation_start`.
    installing_archive: Option<PathBuf>,
}

impl GiantsInstaller {
    pub fn new() -> Self {
        Self::default()
    }

    /// Archive of the installation in progress.
    pub fn installing_archive(&self) -> Option<&Path> {
        self.installing_archive.as_deref()
    }
}

impl Plugin for GiantsInstaller {
    fn name(&self) -> &str {
        "GIANTS Mod Installer"
    }

    fn author(&self) -> &str {
        "Cram42"
    }

    fn version(&self) -> VersionInfo {
        VersionInfo::new(1, 1, 0)
    }

    fn description(&self) -> &str {
        "Installer for GIANTS Software game mods"
    }

    fn settings(&self) -> Vec<PluginSetting> {
        vec![PluginSetting::new(
            PRIORITY_SETTING,
            "priority of this installer",
            SettingValue::Int(DEFAULT_PRIORITY),
        )]
    }

    fn init(&mut self, organizer: Arc<dyn Organizer>) -> bool {
        self.organizer = Some(organizer);
        true
    }
}

impl SimpleInstaller for GiantsInstaller {
    type Error = InstallError;

    fn priority(&self) -> i64 {
        let stored = self
            .organizer
            .as_ref()
            .and_then(|organizer| organizer.plugin_setting(self.name(), PRIORITY_SETTING));

        match stored {
            Some(value) => value.as_int().unwrap_or_else(|| {
                warn!("Ignoring non-integer priority setting {:?}", value);
                DEFAULT_PRIORITY
            }),
            None => DEFAULT_PRIORITY,
        }
    }

    fn is_manual_installer(&self) -> bool {
        false
    }

    fn is_archive_supported(&self, tree: &FileTree) -> bool {
        let Some(organizer) = &self.organizer else {
            return false;
        };

        let game = organizer.managed_game_short_name();
        let supported_game = SUPPORTED_GAMES.contains(&game.as_str());
        let has_manifest = tree.exists(MANIFEST_FILE_NAME, FileType::File);
        debug!(
            "Archive check: game '{}' supported={}, manifest={}",
            game, supported_game, has_manifest
        );

        supported_game && has_manifest
    }

    fn set_installation_manager(&mut self, manager: Arc<dyn InstallationManager>) {
        self.manager = Some(manager);
    }

    fn set_dialog(&mut self, dialog: Box<dyn ConfirmDialog>) {
        self.dialog = Some(dialog);
    }

    fn on_installation_start(&mut self, archive: &Path, reinstallation: bool) {
        debug!(
            "Installation start: {} (reinstall={})",
            archive.display(),
            reinstallation
        );
        self.installing_archive = Some(archive.to_path_buf());
    }

    fn on_installation_end(&mut self, result: &InstallResult) {
        info!("Installation finished: {}", result.label());
    }

    fn install(
        &mut self,
        name: &mut GuessedString,
        tree: &FileTree,
        _version: &str,
        _nexus_id: i32,
    ) -> Result<InstallResult, InstallError> {
        let manager = self
            .manager
            .as_ref()
            .ok_or(InstallError::NotInitialised("installation manager"))?;
        let archive = self
            .installing_archive
            .as_deref()
            .ok_or(InstallError::NoArchive)?;

        // Get manifest
        let manifest_entry = tree
            .find(MANIFEST_FILE_NAME, FileType::File)
            .ok_or(InstallError::ManifestNotFound)?;
        let manifest_path = manager
            .extract_file(manifest_entry)
            .map_err(|e| InstallError::Extraction {
                reason: format!("{:#}", e),
            })?;
        let manifest = ModManifest::open(&manifest_path)?;
        info!(
            "Installing '{}' {} by {}",
            manifest.name(),
            manifest.version(),
            manifest.author()
        );

        name.update(manifest.name(), GuessQuality::Good);

        let folder = mod_folder_name(archive);
        debug!("Nesting {} entries under '{}'", tree.len(), folder);
        let new_tree = nest_under_folder(tree, &folder);

        let dialog = self
            .dialog
            .as_mut()
            .ok_or(InstallError::NotInitialised("dialog"))?;
        let response = dialog.exec(&InstallerPrompt::new(name, &manifest));

        name.update(response.name, GuessQuality::User);

        let version = manifest.version();
        let result = match response.code {
            DialogCode::Accepted => InstallResult::Success {
                tree: new_tree,
                version,
                nexus_id: 0,
            },
            DialogCode::Rejected if response.manual => InstallResult::ManualRequested {
                tree: new_tree,
                version,
                nexus_id: 0,
            },
            DialogCode::Rejected => InstallResult::Canceled,
        };

        debug!("Dialog result for '{}': {}", name, result.label());
        Ok(result)
    }
}
