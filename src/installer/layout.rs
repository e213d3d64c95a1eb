//! Mod folder layout.
//!
//! The game loads each mod from a folder (or zip) directly inside its mods
//! directory, so the archive contents are regrouped under one folder named
//! after the archive.

use regex::Regex;
use std::path::{Component, Path};
use std::sync::OnceLock;

use crate::tree::FileTree;

/// Used when the archive name has no word characters at all.
pub const FALLBACK_FOLDER_NAME: &str = "mod";

/// Folder name for an archive: its stem with every non-word run removed.
///
/// `FS25_Big Tractor (v1.2).zip` becomes `FS25_BigTractorv12`.
pub fn mod_folder_name(archive: &Path) -> String {
    static NON_WORD_RE: OnceLock<Regex> = OnceLock::new();
    let non_word = NON_WORD_RE.get_or_init(|| Regex::new(r"\W+").unwrap());

    let stem = archive
        .file_stem()
        .map(|s| s.to_string_lossy())
        .unwrap_or_default();
    let name = non_word.replace_all(&stem, "");

    if name.is_empty() {
        FALLBACK_FOLDER_NAME.to_string()
    } else {
        name.into_owned()
    }
}

/// Directory name for an installed mod, taken from its display name.
///
/// Separators are replaced so the name stays one path component. A name that
/// still is not a plain component (empty, `.`, `..`, a drive prefix) falls
/// back to the archive's folder name, so the result always stays inside the
/// mods directory.
pub fn install_dir_name(display_name: &str, archive: &Path) -> String {
    let name = display_name.replace(['/', '\\'], "_");
    let name = name.trim();

    let mut components = Path::new(name).components();
    match (components.next(), components.next()) {
        (Some(Component::Normal(part)), None) if part == name => name.to_string(),
        _ => mod_folder_name(archive),
    }
}

/// A new tree holding a copy of every entry of `tree` under `folder`.
pub fn nest_under_folder(tree: &FileTree, folder: &str) -> FileTree {
    let mut new_tree = tree.create_orphan_tree();
    new_tree.add_directory(folder);
    for entry in tree {
        new_tree.copy(entry, folder);
    }
    new_tree
}
