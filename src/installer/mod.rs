//! GIANTS mod installer
//!
//! Flow of one install, driven by the host:
//! 1. Check:       managed game is supported and modDesc.xml is a top-level file
//! 2. Manifest:    extract modDesc.xml and read name/author/version/description
//! 3. Restructure: copy every entry under one folder named after the archive
//! 4. Confirm:     modal dialog to install, hand over to manual, or cancel

pub mod config;
pub mod layout;
mod plugin;

pub use config::{ConfigError, InstallConfig};
pub use layout::{install_dir_name, mod_folder_name, nest_under_folder};
pub use plugin::{GiantsInstaller, DEFAULT_PRIORITY, SUPPORTED_GAMES};

use crate::manifest::{ManifestError, MANIFEST_FILE_NAME};

/// Fatal install failures. Nothing is retried; the host reports these as a
/// failed install.
#[derive(Debug, thiserror::Error)]
pub enum InstallError {
    #[error("installer used before its {0} was set")]
    NotInitialised(&'static str),

    #[error("no archive recorded for this installation")]
    NoArchive,

    #[error("manifest not found ({} missing from the archive root)", MANIFEST_FILE_NAME)]
    ManifestNotFound,

    #[error("failed to extract {}: {reason}", MANIFEST_FILE_NAME)]
    Extraction { reason: String },

    #[error(transparent)]
    Manifest(#[from] ManifestError),
}
