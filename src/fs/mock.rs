// src/fs/mock.rs

use super::FileSystem;
use anyhow::{anyhow, Result};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::{Duration, SystemTime};

#[derive(Debug, Clone)]
pub enum MockEntry {
    File { modified: SystemTime },
    Dir(Vec<String>), // List of child names
    /// Listed by its parent, but reading its timestamp fails.
    UnreadableFile,
    /// Listed by its parent, but listing its children fails.
    UnreadableDir,
}

/// In-memory filesystem with explicit modification times.
///
/// Clones share the same tree, so a test can keep one handle to mutate
/// timestamps while the store under test holds another.
#[derive(Debug, Clone, Default)]
pub struct MockFileSystem {
    files: Arc<Mutex<HashMap<PathBuf, MockEntry>>>,
}

impl MockFileSystem {
    pub fn new() -> Self {
        let mut files = HashMap::new();
        // Ensure root exists
        files.insert(PathBuf::from("."), MockEntry::Dir(Vec::new()));

        Self {
            files: Arc::new(Mutex::new(files)),
        }
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<PathBuf, MockEntry>> {
        // A panicking test thread must not poison every other assertion.
        self.files.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Add (or replace) a file with the given modification time, creating
    /// parent directories implicitly.
    pub fn add_file(&self, path: impl AsRef<Path>, modified: SystemTime) {
        let path = path.as_ref().to_path_buf();
        let mut files = self.lock();
        files.insert(path.clone(), MockEntry::File { modified });
        link_into_parent(&mut files, &path);
    }

    /// Add an empty directory.
    pub fn add_dir(&self, path: impl AsRef<Path>) {
        let path = path.as_ref().to_path_buf();
        let mut files = self.lock();
        ensure_dir_entry(&mut files, &path);
    }

    /// Set the modification time of an existing file.
    ///
    /// Returns `false` if `path` is not a file.
    pub fn set_modified(&self, path: impl AsRef<Path>, modified: SystemTime) -> bool {
        let mut files = self.lock();
        match files.get_mut(path.as_ref()) {
            Some(MockEntry::File { modified: m }) => {
                *m = modified;
                true
            }
            _ => false,
        }
    }

    /// Turn an existing file or directory into one whose reads fail, as if
    /// its permissions had been revoked. A directory's children become
    /// unreachable through `read_dir`.
    pub fn make_unreadable(&self, path: impl AsRef<Path>) -> bool {
        let mut files = self.lock();
        match files.get_mut(path.as_ref()) {
            Some(entry @ MockEntry::File { .. }) => {
                *entry = MockEntry::UnreadableFile;
                true
            }
            Some(entry @ MockEntry::Dir(_)) => {
                *entry = MockEntry::UnreadableDir;
                true
            }
            _ => false,
        }
    }

    /// Move a file's modification time forward by `by`.
    pub fn touch(&self, path: impl AsRef<Path>, by: Duration) -> bool {
        let path = path.as_ref();
        let current = match self.lock().get(path) {
            Some(MockEntry::File { modified }) => *modified,
            _ => return false,
        };
        self.set_modified(path, current + by)
    }

    /// Remove a file or directory entry (children of a removed directory are
    /// left dangling, which is enough for the watcher's read-side tests).
    pub fn remove(&self, path: impl AsRef<Path>) -> bool {
        let path = path.as_ref();
        let mut files = self.lock();
        if files.remove(path).is_none() {
            return false;
        }
        if let (Some(parent), Some(name)) = (parent_of(path), path.file_name()) {
            if let Some(MockEntry::Dir(children)) = files.get_mut(&parent) {
                let name = name.to_string_lossy();
                children.retain(|c| *c != name);
            }
        }
        true
    }
}

fn parent_of(path: &Path) -> Option<PathBuf> {
    path.parent().map(|p| {
        if p.as_os_str().is_empty() {
            PathBuf::from(".")
        } else {
            p.to_path_buf()
        }
    })
}

fn link_into_parent(files: &mut HashMap<PathBuf, MockEntry>, path: &Path) {
    let Some(parent) = parent_of(path) else {
        return;
    };
    if parent == path {
        return; // Avoid infinite loop at root
    }
    ensure_dir_entry(files, &parent);
    if let Some(MockEntry::Dir(children)) = files.get_mut(&parent) {
        if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
            if !children.iter().any(|c| c == name) {
                children.push(name.to_string());
            }
        }
    }
}

fn ensure_dir_entry(files: &mut HashMap<PathBuf, MockEntry>, path: &Path) {
    if !files.contains_key(path) {
        files.insert(path.to_path_buf(), MockEntry::Dir(Vec::new()));
        link_into_parent(files, path);
    }
}

impl FileSystem for MockFileSystem {
    fn modified(&self, path: &Path) -> Result<SystemTime> {
        match self.lock().get(path) {
            Some(MockEntry::File { modified }) => Ok(*modified),
            Some(MockEntry::Dir(_) | MockEntry::UnreadableDir) => {
                Err(anyhow!("Is a directory: {:?}", path))
            }
            Some(MockEntry::UnreadableFile) => Err(anyhow!("Permission denied: {:?}", path)),
            None => Err(anyhow!("File not found: {:?}", path)),
        }
    }

    fn exists(&self, path: &Path) -> bool {
        self.lock().contains_key(path)
    }

    fn is_file(&self, path: &Path) -> bool {
        matches!(
            self.lock().get(path),
            Some(MockEntry::File { .. } | MockEntry::UnreadableFile)
        )
    }

    fn is_dir(&self, path: &Path) -> bool {
        matches!(
            self.lock().get(path),
            Some(MockEntry::Dir(_) | MockEntry::UnreadableDir)
        )
    }

    fn read_dir(&self, path: &Path) -> Result<Vec<PathBuf>> {
        match self.lock().get(path) {
            Some(MockEntry::Dir(children)) => {
                Ok(children.iter().map(|name| path.join(name)).collect())
            }
            Some(MockEntry::UnreadableDir) => Err(anyhow!("Permission denied: {:?}", path)),
            _ => Err(anyhow!("Not a directory or not found: {:?}", path)),
        }
    }
}
