// src/snapshot/walk.rs

//! Recursive discovery of the regular files under a watch root.

use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::errors::{PollwatchError, Result};
use crate::fs::FileSystem;
use crate::snapshot::exclude::ExcludeSet;

/// Convert a path into a string relative to `root`, with forward slashes.
///
/// Returns `None` if `path` does not live under `root`.
pub fn relative_str(root: &Path, path: &Path) -> Option<String> {
    path.strip_prefix(root)
        .ok()
        .map(|rel| rel.to_string_lossy().replace('\\', "/"))
}

/// Collect every regular file reachable from `root`, at any depth.
///
/// - Directories are descended into but never returned.
/// - Paths matching `exclude` (relative to `root`) are skipped; an excluded
///   directory is not descended into.
/// - Failing to list `root` itself is fatal (`RootUnavailable`). Failing to
///   list a nested directory only drops that subtree, with a warning.
///
/// Returned paths are `root.join(..)` of the entries, so they keep whatever
/// form (absolute or relative) the caller used for `root`.
///
/// The root itself may be a symlink to a directory; only nested symlinked
/// directories are left unvisited.
pub fn walk_files(fs: &dyn FileSystem, root: &Path, exclude: &ExcludeSet) -> Result<Vec<PathBuf>> {
    let reason = if !fs.exists(root) {
        Some("no such directory")
    } else if fs.is_file(root) {
        Some("not a directory")
    } else {
        None
    };
    if let Some(reason) = reason {
        return Err(PollwatchError::RootUnavailable {
            path: root.to_path_buf(),
            reason: reason.to_string(),
        });
    }

    let top = fs.read_dir(root).map_err(|e| PollwatchError::RootUnavailable {
        path: root.to_path_buf(),
        reason: format!("{e:#}"),
    })?;

    let mut files = Vec::new();
    let mut stack = vec![top];

    while let Some(entries) = stack.pop() {
        for path in entries {
            if is_excluded(root, &path, exclude) {
                debug!(path = %path.display(), "excluded from walk");
                continue;
            }

            if fs.is_dir(&path) {
                match fs.read_dir(&path) {
                    Ok(children) => stack.push(children),
                    Err(err) => {
                        warn!(path = %path.display(), error = %format!("{err:#}"), "could not read directory; skipping");
                    }
                }
            } else if fs.is_file(&path) {
                files.push(path);
            }
        }
    }

    files.sort();
    Ok(files)
}

fn is_excluded(root: &Path, path: &Path, exclude: &ExcludeSet) -> bool {
    if exclude.is_empty() {
        return false;
    }
    relative_str(root, path).is_some_and(|rel| exclude.matches(&rel))
}

#[cfg(test)]
mod tests {
    use std::time::SystemTime;

    use super::*;
    use crate::fs::mock::MockFileSystem;

    fn tree() -> MockFileSystem {
        let fs = MockFileSystem::new();
        let t = SystemTime::UNIX_EPOCH;
        fs.add_file("w/a.txt", t);
        fs.add_file("w/sub/b.txt", t);
        fs.add_file("w/sub/deeper/c.txt", t);
        fs.add_file("w/.git/HEAD", t);
        fs.add_dir("w/empty");
        fs
    }

    #[test]
    fn collects_files_at_every_depth_and_skips_dirs() {
        let fs = tree();
        let files = walk_files(&fs, Path::new("w"), &ExcludeSet::empty()).unwrap();
        assert_eq!(
            files,
            vec![
                PathBuf::from("w/.git/HEAD"),
                PathBuf::from("w/a.txt"),
                PathBuf::from("w/sub/b.txt"),
                PathBuf::from("w/sub/deeper/c.txt"),
            ]
        );
    }

    #[test]
    fn excluded_directories_are_pruned() {
        let fs = tree();
        let exclude = ExcludeSet::new(&[".git".to_string(), "sub/deeper/**".to_string()]).unwrap();
        let files = walk_files(&fs, Path::new("w"), &exclude).unwrap();
        assert_eq!(files, vec![PathBuf::from("w/a.txt"), PathBuf::from("w/sub/b.txt")]);
    }

    #[test]
    fn unreadable_nested_directory_drops_only_that_subtree() {
        let fs = tree();
        fs.make_unreadable("w/sub/deeper");

        let files = walk_files(&fs, Path::new("w"), &ExcludeSet::empty()).unwrap();
        assert_eq!(
            files,
            vec![
                PathBuf::from("w/.git/HEAD"),
                PathBuf::from("w/a.txt"),
                PathBuf::from("w/sub/b.txt"),
            ]
        );
    }

    #[test]
    fn unreadable_root_is_root_unavailable() {
        let fs = tree();
        fs.make_unreadable("w");

        match walk_files(&fs, Path::new("w"), &ExcludeSet::empty()) {
            Err(PollwatchError::RootUnavailable { reason, .. }) => {
                assert!(reason.contains("Permission denied"));
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn missing_root_is_root_unavailable() {
        let fs = tree();
        let err = walk_files(&fs, Path::new("nope"), &ExcludeSet::empty()).unwrap_err();
        assert!(matches!(err, PollwatchError::RootUnavailable { .. }));
    }

    #[test]
    fn file_as_root_is_root_unavailable() {
        let fs = tree();
        let err = walk_files(&fs, Path::new("w/a.txt"), &ExcludeSet::empty()).unwrap_err();
        match err {
            PollwatchError::RootUnavailable { reason, .. } => assert_eq!(reason, "not a directory"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn relative_str_uses_forward_slashes() {
        assert_eq!(
            relative_str(Path::new("/tmp/w"), Path::new("/tmp/w/a/b.txt")).as_deref(),
            Some("a/b.txt")
        );
        assert_eq!(relative_str(Path::new("/tmp/w"), Path::new("/etc/x")), None);
    }
}
