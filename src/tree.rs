//! Virtual file tree of an archive.
//!
//! Mirrors the mod manager's view of an archive before anything is written
//! to disk: entries can be looked up, copied and regrouped freely, and each
//! file remembers where it lives inside the original archive.
//!
//! Name comparisons are case-insensitive, like the Windows filesystems the
//! games run on.

use std::slice;

/// Entry type filter for lookups.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileType {
    File,
    Directory,
    Any,
}

/// A file or directory in a [`FileTree`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileTreeEntry {
    name: String,
    /// Path inside the source archive. Only set for files.
    source: Option<String>,
    /// Only set for directories.
    children: Option<FileTree>,
}

impl FileTreeEntry {
    pub fn file(name: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            source: Some(source.into()),
            children: None,
        }
    }

    pub fn directory(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            source: None,
            children: Some(FileTree::default()),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_file(&self) -> bool {
        self.children.is_none()
    }

    pub fn is_dir(&self) -> bool {
        self.children.is_some()
    }

    /// Archive path of a file entry.
    pub fn source(&self) -> Option<&str> {
        self.source.as_deref()
    }

    /// Contents of a directory entry.
    pub fn tree(&self) -> Option<&FileTree> {
        self.children.as_ref()
    }

    pub fn is(&self, file_type: FileType) -> bool {
        match file_type {
            FileType::File => self.is_file(),
            FileType::Directory => self.is_dir(),
            FileType::Any => true,
        }
    }

    fn has_name(&self, name: &str) -> bool {
        self.name.to_lowercase() == name.to_lowercase()
    }

    /// Turn this entry into a directory, dropping file data if needed.
    fn as_directory_mut(&mut self) -> &mut FileTree {
        self.source = None;
        self.children.get_or_insert_with(FileTree::default)
    }
}

/// An ordered, case-insensitive directory of entries.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileTree {
    entries: Vec<FileTreeEntry>,
}

/// Split a tree path on either separator, dropping empty and `.` parts.
fn split_path(path: &str) -> Vec<&str> {
    path.split(['/', '\\'])
        .filter(|part| !part.is_empty() && *part != ".")
        .collect()
}

impl FileTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a tree from archive entry names.
    ///
    /// A trailing separator marks a directory. Parent directories are
    /// created implicitly; each file keeps its full archive name as source.
    pub fn from_paths<I, S>(paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut tree = Self::new();
        for path in paths {
            let path = path.as_ref();
            if path.ends_with(['/', '\\']) {
                tree.add_directory(path);
            } else {
                tree.add_file(path, path);
            }
        }
        tree
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Top-level entries in insertion order.
    pub fn iter(&self) -> slice::Iter<'_, FileTreeEntry> {
        self.entries.iter()
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.entries.iter().position(|entry| entry.has_name(name))
    }

    /// Find an entry by path, case-insensitively.
    pub fn find(&self, path: &str, file_type: FileType) -> Option<&FileTreeEntry> {
        let parts = split_path(path);
        let (last, parents) = parts.split_last()?;

        let mut current = self;
        for part in parents {
            current = current
                .entries
                .iter()
                .find(|entry| entry.has_name(part))?
                .tree()?;
        }

        current
            .entries
            .iter()
            .find(|entry| entry.has_name(last) && entry.is(file_type))
    }

    pub fn exists(&self, path: &str, file_type: FileType) -> bool {
        self.find(path, file_type).is_some()
    }

    /// A new, empty tree not attached to any archive.
    pub fn create_orphan_tree(&self) -> FileTree {
        FileTree::new()
    }

    /// Create `path` and any missing parents, returning the innermost directory.
    ///
    /// A file standing where a directory is needed is replaced.
    pub fn add_directory(&mut self, path: &str) -> &mut FileTree {
        let mut current = self;
        for part in split_path(path) {
            let index = match current.position(part) {
                Some(index) => index,
                None => {
                    current.entries.push(FileTreeEntry::directory(part));
                    current.entries.len() - 1
                }
            };
            current = current.entries[index].as_directory_mut();
        }
        current
    }

    /// Add a file at `path`, replacing any entry with the same name.
    pub fn add_file(&mut self, path: &str, source: &str) {
        let parts = split_path(path);
        let Some((name, parents)) = parts.split_last() else {
            return;
        };
        self.add_directory(&parents.join("/"))
            .insert(FileTreeEntry::file(*name, source));
    }

    /// Deep-copy `entry` into the directory `dest`, creating it if needed.
    pub fn copy(&mut self, entry: &FileTreeEntry, dest: &str) {
        self.add_directory(dest).insert(entry.clone());
    }

    fn insert(&mut self, entry: FileTreeEntry) {
        match self.position(&entry.name) {
            Some(index) => self.entries[index] = entry,
            None => self.entries.push(entry),
        }
    }

    /// Every entry with its `/`-separated path, parents before children.
    pub fn walk(&self) -> Vec<(String, &FileTreeEntry)> {
        let mut out = Vec::new();
        self.walk_into("", &mut out);
        out
    }

    fn walk_into<'a>(&'a self, prefix: &str, out: &mut Vec<(String, &'a FileTreeEntry)>) {
        for entry in &self.entries {
            let path = if prefix.is_empty() {
                entry.name.clone()
            } else {
                format!("{}/{}", prefix, entry.name)
            };
            if let Some(children) = entry.tree() {
                out.push((path.clone(), entry));
                children.walk_into(&path, out);
            } else {
                out.push((path, entry));
            }
        }
    }

    /// Number of files anywhere in the tree.
    pub fn file_count(&self) -> usize {
        self.walk().iter().filter(|(_, entry)| entry.is_file()).count()
    }
}

impl<'a> IntoIterator for &'a FileTree {
    type Item = &'a FileTreeEntry;
    type IntoIter = slice::Iter<'a, FileTreeEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
