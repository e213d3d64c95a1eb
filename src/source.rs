//! Mod sources: zip archives and already-extracted folders.
//!
//! A source builds the [`FileTree`] the installer works on, extracts single
//! files for it (the manifest) and finally writes the restructured tree to
//! the mods directory.

use anyhow::{bail, Context, Result};
use std::fs::{self, File};
use std::io::BufReader;
use std::path::{Component, Path, PathBuf};
use tempfile::TempDir;
use tracing::{debug, info};
use walkdir::WalkDir;

use crate::host::InstallationManager;
use crate::tree::{FileTree, FileTreeEntry};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    Zip,
    Directory,
}

/// An archive or folder being installed.
#[derive(Debug)]
pub struct ModSource {
    path: PathBuf,
    kind: SourceKind,
    /// Holds extracted files until the source is dropped.
    temp_dir: TempDir,
}

/// Convert an archive-relative path into a relative filesystem path.
///
/// Rejects absolute paths and `..` so nothing can be written outside the
/// destination.
fn safe_relative_path(path: &str) -> Result<PathBuf> {
    let mut out = PathBuf::new();
    for part in path.split(['/', '\\']) {
        match part {
            "" | "." => {}
            ".." => bail!("Path escapes the destination: {}", path),
            part => {
                let mut components = Path::new(part).components();
                if !matches!(
                    (components.next(), components.next()),
                    (Some(Component::Normal(_)), None)
                ) {
                    bail!("Unsupported path component '{}' in {}", part, path);
                }
                out.push(part);
            }
        }
    }

    if out.as_os_str().is_empty() {
        bail!("Empty path in archive");
    }
    Ok(out)
}

fn open_zip(path: &Path) -> Result<zip::ZipArchive<BufReader<File>>> {
    let file = File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
    zip::ZipArchive::new(BufReader::new(file))
        .with_context(|| format!("Failed to read zip archive {}", path.display()))
}

impl ModSource {
    /// Open a `.zip` archive or a directory.
    pub fn open(path: &Path) -> Result<Self> {
        let kind = if path.is_dir() {
            SourceKind::Directory
        } else if path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("zip"))
        {
            SourceKind::Zip
        } else if path.exists() {
            bail!("Unsupported mod source (expected a .zip or a folder): {}", path.display());
        } else {
            bail!("Mod source not found: {}", path.display());
        };

        let temp_dir = tempfile::Builder::new()
            .prefix("giants-installer-")
            .tempdir()
            .context("Failed to create temporary directory")?;

        debug!("Opened {:?} source {}", kind, path.display());

        Ok(Self {
            path: path.to_path_buf(),
            kind,
            temp_dir,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn kind(&self) -> SourceKind {
        self.kind
    }

    /// List every entry of the source.
    pub fn file_tree(&self) -> Result<FileTree> {
        let names = match self.kind {
            SourceKind::Zip => self.zip_entry_names()?,
            SourceKind::Directory => self.directory_entry_names()?,
        };
        debug!("{} entries in {}", names.len(), self.path.display());
        Ok(FileTree::from_paths(names))
    }

    fn zip_entry_names(&self) -> Result<Vec<String>> {
        let mut archive = open_zip(&self.path)?;
        let mut names = Vec::with_capacity(archive.len());
        for i in 0..archive.len() {
            let file = archive.by_index_raw(i)?;
            names.push(file.name().to_string());
        }
        Ok(names)
    }

    fn directory_entry_names(&self) -> Result<Vec<String>> {
        let mut names = Vec::new();
        for entry in WalkDir::new(&self.path).min_depth(1).sort_by_file_name() {
            let entry = entry.with_context(|| format!("Failed to walk {}", self.path.display()))?;
            let relative = entry.path().strip_prefix(&self.path)?;
            let mut name = relative
                .components()
                .map(|c| c.as_os_str().to_string_lossy())
                .collect::<Vec<_>>()
                .join("/");
            if entry.file_type().is_dir() {
                name.push('/');
            }
            names.push(name);
        }
        Ok(names)
    }

    /// Copy the archive file `source` to `dest`.
    fn copy_entry(
        &self,
        archive: Option<&mut zip::ZipArchive<BufReader<File>>>,
        source: &str,
        dest: &Path,
    ) -> Result<()> {
        if let Some(parent) = dest.parent() {
            fs::create_dir_all(parent)?;
        }

        match archive {
            Some(archive) => {
                let mut entry = archive
                    .by_name(source)
                    .with_context(|| format!("'{}' not found in {}", source, self.path.display()))?;
                let mut out = File::create(dest)
                    .with_context(|| format!("Failed to create {}", dest.display()))?;
                std::io::copy(&mut entry, &mut out)
                    .with_context(|| format!("Failed to extract '{}'", source))?;
            }
            None => {
                let from = self.path.join(safe_relative_path(source)?);
                fs::copy(&from, dest).with_context(|| {
                    format!("Failed to copy {} to {}", from.display(), dest.display())
                })?;
            }
        }
        Ok(())
    }

    /// Write every file of `tree` under `dest`. Returns the number of files written.
    pub fn install_tree(&self, tree: &FileTree, dest: &Path) -> Result<usize> {
        let mut archive = match self.kind {
            SourceKind::Zip => Some(open_zip(&self.path)?),
            SourceKind::Directory => None,
        };

        fs::create_dir_all(dest).with_context(|| format!("Failed to create {}", dest.display()))?;

        let mut written = 0;
        for (tree_path, entry) in tree.walk() {
            let target = dest.join(safe_relative_path(&tree_path)?);
            match entry.source() {
                Some(source) => {
                    self.copy_entry(archive.as_mut(), source, &target)?;
                    written += 1;
                }
                None => fs::create_dir_all(&target)
                    .with_context(|| format!("Failed to create {}", target.display()))?,
            }
        }

        info!("Installed {} files to {}", written, dest.display());
        Ok(written)
    }
}

impl InstallationManager for ModSource {
    fn extract_file(&self, entry: &FileTreeEntry) -> Result<PathBuf> {
        let Some(source) = entry.source() else {
            bail!("'{}' is a directory, not a file", entry.name());
        };

        match self.kind {
            SourceKind::Directory => {
                let path = self.path.join(safe_relative_path(source)?);
                debug!("Using {} in place", path.display());
                Ok(path)
            }
            SourceKind::Zip => {
                let dest = self.temp_dir.path().join(safe_relative_path(source)?);
                let mut archive = open_zip(&self.path)?;
                self.copy_entry(Some(&mut archive), source, &dest)?;
                debug!("Extracted '{}' to {}", source, dest.display());
                Ok(dest)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::FileType;
    use std::io::Write;

    fn write_zip(path: &Path, files: &[(&str, &str)]) {
        let file = File::create(path).unwrap();
        let mut zip = zip::ZipWriter::new(file);
        let options = zip::write::SimpleFileOptions::default();
        for (name, content) in files {
            if name.ends_with('/') {
                zip.add_directory(*name, options).unwrap();
            } else {
                zip.start_file(*name, options).unwrap();
                zip.write_all(content.as_bytes()).unwrap();
            }
        }
        zip.finish().unwrap();
    }

    #[test]
    fn test_safe_relative_path() {
        assert_eq!(safe_relative_path("a/b\\c.xml").unwrap(), PathBuf::from("a/b/c.xml"));
        assert_eq!(safe_relative_path("./a//b").unwrap(), PathBuf::from("a/b"));
        assert!(safe_relative_path("../evil.txt").is_err());
        assert!(safe_relative_path("a/../../evil.txt").is_err());
        assert!(safe_relative_path("").is_err());
    }

    #[test]
    fn test_open_rejects_unknown_sources() {
        let temp = tempfile::tempdir().unwrap();
        let rar = temp.path().join("mod.rar");
        fs::write(&rar, b"not a zip").unwrap();

        assert!(ModSource::open(&rar).is_err());
        assert!(ModSource::open(&temp.path().join("missing.zip")).is_err());
    }

    #[test]
    fn test_zip_tree_extract_and_install() {
        let temp = tempfile::tempdir().unwrap();
        let archive = temp.path().join("FS25_Lizard.zip");
        write_zip(
            &archive,
            &[
                ("modDesc.xml", "<modDesc/>"),
                ("vehicles/", ""),
                ("vehicles/small.xml", "<vehicle/>"),
            ],
        );

        let source = ModSource::open(&archive).unwrap();
        assert_eq!(source.kind(), SourceKind::Zip);

        let tree = source.file_tree().unwrap();
        assert!(tree.exists("modDesc.xml", FileType::File));
        assert!(tree.exists("vehicles/small.xml", FileType::File));

        let manifest = tree.find("modDesc.xml", FileType::File).unwrap();
        let extracted = source.extract_file(manifest).unwrap();
        assert_eq!(fs::read_to_string(&extracted).unwrap(), "<modDesc/>");

        let mut new_tree = tree.create_orphan_tree();
        for entry in &tree {
            new_tree.copy(entry, "FS25_Lizard");
        }
        let dest = temp.path().join("mods");
        assert_eq!(source.install_tree(&new_tree, &dest).unwrap(), 2);
        assert_eq!(
            fs::read_to_string(dest.join("FS25_Lizard/vehicles/small.xml")).unwrap(),
            "<vehicle/>"
        );
    }

    #[test]
    fn test_directory_source() {
        let temp = tempfile::tempdir().unwrap();
        let mod_dir = temp.path().join("FS25_Lizard");
        fs::create_dir_all(mod_dir.join("vehicles")).unwrap();
        fs::write(mod_dir.join("modDesc.xml"), "<modDesc/>").unwrap();
        fs::write(mod_dir.join("vehicles/small.xml"), "<vehicle/>").unwrap();

        let source = ModSource::open(&mod_dir).unwrap();
        let tree = source.file_tree().unwrap();
        assert_eq!(tree.file_count(), 2);
        assert!(tree.exists("vehicles", FileType::Directory));

        let manifest = tree.find("modDesc.xml", FileType::File).unwrap();
        assert_eq!(source.extract_file(manifest).unwrap(), mod_dir.join("modDesc.xml"));

        let dest = temp.path().join("out");
        assert_eq!(source.install_tree(&tree, &dest).unwrap(), 2);
        assert!(dest.join("vehicles/small.xml").is_file());
    }

    #[test]
    fn test_extract_directory_entry_fails() {
        let temp = tempfile::tempdir().unwrap();
        let source = ModSource::open(temp.path()).unwrap();
        assert!(source.extract_file(&FileTreeEntry::directory("vehicles")).is_err());
    }
}
