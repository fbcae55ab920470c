// src/snapshot/store.rs

use std::collections::BTreeMap;
use std::collections::btree_map;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::SystemTime;

use tracing::{debug, info, warn};

use crate::errors::Result;
use crate::fs::FileSystem;
use crate::snapshot::exclude::ExcludeSet;
use crate::snapshot::walk::walk_files;

/// Last-seen modification time of every regular file under a root.
///
/// The tracked set is fixed at construction: files created later are never
/// picked up, and files deleted later simply stop producing changes.
pub struct SnapshotStore {
    root: PathBuf,
    fs: Arc<dyn FileSystem>,
    entries: BTreeMap<PathBuf, SystemTime>,
}

impl fmt::Debug for SnapshotStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SnapshotStore")
            .field("root", &self.root)
            .field("tracked", &self.entries.len())
            .finish_non_exhaustive()
    }
}

impl SnapshotStore {
    /// Walk `root` and record the current modification time of each file.
    ///
    /// Fails only if the walk cannot start. Files whose timestamp cannot be
    /// read are left out with a warning.
    pub fn build(
        fs: Arc<dyn FileSystem>,
        root: impl Into<PathBuf>,
        exclude: &ExcludeSet,
    ) -> Result<Self> {
        let root = root.into();
        let files = walk_files(fs.as_ref(), &root, exclude)?;

        let mut entries = BTreeMap::new();
        for path in files {
            match fs.modified(&path) {
                Ok(ts) => {
                    entries.insert(path, ts);
                }
                Err(err) => {
                    warn!(path = %path.display(), error = %format!("{err:#}"), "could not monitor file");
                }
            }
        }

        info!(root = %root.display(), tracked = entries.len(), "snapshot built");

        Ok(Self { root, fs, entries })
    }

    /// Start one check pass.
    ///
    /// The returned iterator re-reads each tracked timestamp lazily and yields
    /// the paths whose modification time moved strictly forward, updating the
    /// stored value as it goes. It ends after every tracked path has been
    /// visited once.
    pub fn check(&mut self) -> Changes<'_> {
        Changes {
            fs: self.fs.as_ref(),
            iter: self.entries.iter_mut(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, path: &Path) -> bool {
        self.entries.contains_key(path)
    }

    /// Stored modification time for `path`, if tracked.
    pub fn modified(&self, path: &Path) -> Option<SystemTime> {
        self.entries.get(path).copied()
    }

    /// Tracked paths in sorted order.
    pub fn paths(&self) -> impl Iterator<Item = &Path> {
        self.entries.keys().map(PathBuf::as_path)
    }
}

/// Lazy sequence of changed paths produced by [`SnapshotStore::check`].
pub struct Changes<'a> {
    fs: &'a dyn FileSystem,
    iter: btree_map::IterMut<'a, PathBuf, SystemTime>,
}

impl fmt::Debug for Changes<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Changes").finish_non_exhaustive()
    }
}

impl Iterator for Changes<'_> {
    type Item = PathBuf;

    fn next(&mut self) -> Option<PathBuf> {
        for (path, stored) in self.iter.by_ref() {
            let current = match self.fs.modified(path) {
                Ok(ts) => ts,
                Err(err) => {
                    debug!(path = %path.display(), error = %format!("{err:#}"), "timestamp unreadable; skipping");
                    continue;
                }
            };

            if current > *stored {
                *stored = current;
                return Some(path.clone());
            }
        }
        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, self.iter.size_hint().1)
    }
}
