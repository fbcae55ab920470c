use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use pollwatch::fs::mock::MockFileSystem;

/// Builder for in-memory directory trees with explicit timestamps.
///
/// Paths are given relative to the builder's root.
pub struct MockTreeBuilder {
    root: PathBuf,
    fs: MockFileSystem,
}

impl MockTreeBuilder {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        let fs = MockFileSystem::new();
        fs.add_dir(&root);
        Self { root, fs }
    }

    /// Seconds since the epoch, for readable test timestamps.
    pub fn at(secs: u64) -> SystemTime {
        SystemTime::UNIX_EPOCH + Duration::from_secs(secs)
    }

    pub fn file(self, rel: impl AsRef<Path>, modified_secs: u64) -> Self {
        self.fs.add_file(self.root.join(rel), Self::at(modified_secs));
        self
    }

    pub fn dir(self, rel: impl AsRef<Path>) -> Self {
        self.fs.add_dir(self.root.join(rel));
        self
    }

    /// Make an already-added entry fail on read (see
    /// [`MockFileSystem::make_unreadable`]).
    pub fn unreadable(self, rel: impl AsRef<Path>) -> Self {
        self.fs.make_unreadable(self.root.join(rel));
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn build(self) -> MockFileSystem {
        self.fs
    }
}
