//! giants-installer - GIANTS Software mod installer
//!
//! Command-line host for the installer plugin: inspects modDesc.xml files and
//! installs mod archives into a mods directory.

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use giants_installer::dialog::{AutoDialog, ConfirmDialog, DialogChoice, TerminalDialog};
use giants_installer::host::{
    GuessQuality, GuessedString, InstallResult, LocalOrganizer, Plugin, SimpleInstaller,
};
use giants_installer::installer::{install_dir_name, GiantsInstaller, InstallConfig};
use giants_installer::manifest::ModManifest;
use giants_installer::settings::Settings;
use giants_installer::source::ModSource;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "giants-installer")]
#[command(version)]
#[command(about = "Installer for GIANTS Software game mods (modDesc.xml packages)")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging (use RUST_LOG=debug for more detail)
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the metadata of a modDesc.xml
    Inspect {
        /// Path to modDesc.xml
        manifest: PathBuf,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Install a mod archive into a mods directory
    Install {
        /// Mod archive (.zip) or extracted mod folder
        source: PathBuf,

        /// Mods directory (defaults to default_output_dir from settings)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Short name of the managed game (defaults to managed_game from settings)
        #[arg(short, long, env = "GIANTS_INSTALLER_GAME")]
        game: Option<String>,

        /// Install without asking
        #[arg(short, long, conflicts_with = "manual")]
        yes: bool,

        /// Request manual installation without asking
        #[arg(long)]
        manual: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Only initialize logging if verbose or RUST_LOG is set
    if cli.verbose || std::env::var("RUST_LOG").is_ok() {
        tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::from_default_env().add_directive(if cli.verbose {
                "giants_installer=debug".parse()?
            } else {
                "giants_installer=warn".parse()?
            }))
            .init();
    }

    match cli.command {
        Commands::Inspect { manifest, json } => inspect(&manifest, json),

        Commands::Install {
            source,
            output,
            game,
            yes,
            manual,
        } => {
            let settings = Settings::load();
            let output_dir = match output.or_else(|| settings.output_dir()) {
                Some(dir) => dir,
                None => bail!("No mods directory given (use --output or set default_output_dir)"),
            };

            let choice = if yes {
                Some(DialogChoice::Install)
            } else if manual {
                Some(DialogChoice::Manual)
            } else {
                None
            };

            let config = InstallConfig {
                source,
                output_dir,
                game: game.unwrap_or_else(|| settings.managed_game.clone()),
                choice,
            };
            config.validate()?;

            install(&config, &settings)
        }
    }
}

fn inspect(path: &Path, json: bool) -> Result<()> {
    let manifest = ModManifest::open(path)?;
    let summary = manifest.summary()?;

    if json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }

    println!("=== Mod Information ===");
    println!("Name:        {}", summary.name);
    println!("Author:      {}", summary.author);
    println!("Version:     {}", summary.version);
    if !summary.description.is_empty() {
        println!("Description:");
        for line in summary.description.lines() {
            println!("    {}", line.trim_end());
        }
    }

    if !summary.store_items.is_empty() {
        println!("\n=== Store Items ===");
        for item in &summary.store_items {
            println!("{:>12}  {}", item.item_type, item.name);
        }
        println!("\nCategories:  {}", summary.categories.join(", "));
    }

    Ok(())
}

fn install(config: &InstallConfig, settings: &Settings) -> Result<()> {
    let source = Arc::new(ModSource::open(&config.source)?);
    let tree = source.file_tree()?;

    let organizer = LocalOrganizer::from_settings(settings).with_game(config.game.clone());
    let dialog: Box<dyn ConfirmDialog> = match config.choice {
        Some(choice) => Box::new(AutoDialog::new(choice)),
        None => Box::new(TerminalDialog::new(std::io::stdin().lock(), std::io::stdout())),
    };

    let mut installer = GiantsInstaller::new();
    if !installer.init(Arc::new(organizer)) {
        bail!("{} failed to initialise", installer.name());
    }
    installer.set_installation_manager(source.clone());
    installer.set_dialog(dialog);

    if !installer.is_archive_supported(&tree) {
        bail!(
            "{} is not a {} mod (needs a top-level modDesc.xml)",
            config.source.display(),
            config.game
        );
    }
    info!(
        "{} v{} (priority {}) accepted {}",
        installer.name(),
        installer.version(),
        installer.priority(),
        config.source.display()
    );

    let stem = config
        .source
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let mut name = GuessedString::new(stem, GuessQuality::Fallback);

    installer.on_installation_start(&config.source, false);
    let result = installer
        .install(&mut name, &tree, "", 0)
        .with_context(|| format!("Failed to install {}", config.source.display()))?;
    installer.on_installation_end(&result);

    match result {
        InstallResult::Success { tree, version, .. } => {
            let dest = config
                .output_dir
                .join(install_dir_name(name.value(), &config.source));
            let written = source.install_tree(&tree, &dest)?;

            println!("\n=== Installation Summary ===");
            println!("Mod:      {}", name);
            println!("Version:  {}", version);
            println!("Files:    {}", written);
            println!("Location: {}", dest.display());
        }
        InstallResult::ManualRequested { .. } => {
            println!("Manual installation requested; nothing was installed.");
        }
        InstallResult::Canceled => {
            println!("Installation canceled.");
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::io::Write;
    use zip::write::SimpleFileOptions;

    fn write_zip(path: &Path, files: &[(&str, &str)]) {
        let mut writer = zip::ZipWriter::new(fs::File::create(path).unwrap());
        for (name, content) in files {
            writer.start_file(*name, SimpleFileOptions::default()).unwrap();
            writer.write_all(content.as_bytes()).unwrap();
        }
        writer.finish().unwrap();
    }

    fn config(source: PathBuf, output_dir: PathBuf) -> InstallConfig {
        InstallConfig {
            source,
            output_dir,
            game: "farmingsimulator25".to_string(),
            choice: Some(DialogChoice::Install),
        }
    }

    #[test]
    fn test_install_writes_under_display_name() {
        let temp = tempfile::tempdir().unwrap();
        let mods = temp.path().join("game/mods");
        fs::create_dir_all(&mods).unwrap();
        let archive = temp.path().join("FS25_Lizard.zip");
        write_zip(
            &archive,
            &[("modDesc.xml", "<modDesc><title><en>Lizard Pack</en></title></modDesc>")],
        );

        install(&config(archive, mods.clone()), &Settings::default()).unwrap();

        assert!(mods.join("Lizard Pack/FS25_Lizard/modDesc.xml").is_file());
    }

    #[test]
    fn test_install_title_cannot_leave_mods_directory() {
        let temp = tempfile::tempdir().unwrap();
        let mods = temp.path().join("game/mods");
        fs::create_dir_all(&mods).unwrap();
        let archive = temp.path().join("FS25_Evil.zip");
        write_zip(
            &archive,
            &[("modDesc.xml", "<modDesc><title><en>..</en></title></modDesc>")],
        );

        install(&config(archive, mods.clone()), &Settings::default()).unwrap();

        assert!(mods.join("FS25_Evil/FS25_Evil/modDesc.xml").is_file());
        assert!(!temp.path().join("game/FS25_Evil").exists());
    }
}
