//! Installation configuration
//!
//! Defines what the CLI host needs to run one install.

use std::path::PathBuf;

use crate::dialog::DialogChoice;

/// Configuration for installing one mod archive
#[derive(Debug, Clone)]
pub struct InstallConfig {
    /// Mod archive (.zip) or extracted mod folder
    pub source: PathBuf,

    /// Mods directory the restructured mod is written to
    pub output_dir: PathBuf,

    /// Short name of the managed game
    pub game: String,

    /// Fixed dialog answer; `None` asks interactively
    pub choice: Option<DialogChoice>,
}

impl InstallConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.source.exists() {
            return Err(ConfigError::SourceNotFound(self.source.clone()));
        }

        if self.output_dir.exists() && !self.output_dir.is_dir() {
            return Err(ConfigError::OutputNotDirectory(self.output_dir.clone()));
        }

        if self.game.trim().is_empty() {
            return Err(ConfigError::MissingGame);
        }

        Ok(())
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Mod archive not found: {0}")]
    SourceNotFound(PathBuf),

    #[error("Output path is not a directory: {0}")]
    OutputNotDirectory(PathBuf),

    #[error("No managed game configured (use --game or set managed_game in settings)")]
    MissingGame,
}
