// tests/snapshot_real_fs.rs

use std::collections::BTreeSet;
use std::error::Error;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, SystemTime};

use tempfile::tempdir;

use pollwatch::errors::PollwatchError;
use pollwatch::fs::RealFileSystem;
use pollwatch::snapshot::{ExcludeSet, SnapshotStore};
use pollwatch_test_utils::init_tracing;

type TestResult = Result<(), Box<dyn Error>>;

fn set_mtime(path: &Path, t: SystemTime) -> std::io::Result<()> {
    fs::File::options().write(true).open(path)?.set_modified(t)
}

fn mtime(path: &Path) -> std::io::Result<SystemTime> {
    fs::metadata(path)?.modified()
}

fn build(root: &Path) -> Result<SnapshotStore, PollwatchError> {
    SnapshotStore::build(Arc::new(RealFileSystem), root, &ExcludeSet::empty())
}

#[test]
fn tracked_set_is_every_regular_file_under_root() -> TestResult {
    init_tracing();

    let dir = tempdir()?;
    let root = dir.path();
    fs::create_dir_all(root.join("a/b/c"))?;
    fs::create_dir_all(root.join("empty"))?;
    fs::write(root.join("top.txt"), "x")?;
    fs::write(root.join("a/one.rs"), "x")?;
    fs::write(root.join("a/b/c/deep.md"), "x")?;

    let store = build(root)?;

    let tracked: BTreeSet<PathBuf> = store.paths().map(Path::to_path_buf).collect();
    let expected: BTreeSet<PathBuf> = ["top.txt", "a/one.rs", "a/b/c/deep.md"]
        .iter()
        .map(|p| root.join(p))
        .collect();
    assert_eq!(tracked, expected);
    assert!(!store.contains(&root.join("a")));
    assert!(!store.contains(&root.join("empty")));

    Ok(())
}

#[test]
fn touching_a_file_reports_it_and_updates_the_stored_time() -> TestResult {
    init_tracing();

    let dir = tempdir()?;
    let a = dir.path().join("a.txt");
    let b = dir.path().join("b.txt");
    fs::write(&a, "a")?;
    fs::write(&b, "b")?;

    let base = SystemTime::now() - Duration::from_secs(3600);
    set_mtime(&a, base)?;
    set_mtime(&b, base)?;

    let mut store = build(dir.path())?;
    assert_eq!(store.check().count(), 0);

    let later = base + Duration::from_secs(60);
    set_mtime(&a, later)?;

    let changed: Vec<PathBuf> = store.check().collect();
    assert_eq!(changed, vec![a.clone()]);
    assert_eq!(store.modified(&a), Some(mtime(&a)?));

    // Nothing changed since the last pass.
    assert_eq!(store.check().count(), 0);

    Ok(())
}

#[test]
fn backwards_timestamp_is_not_a_change() -> TestResult {
    let dir = tempdir()?;
    let a = dir.path().join("a.txt");
    fs::write(&a, "a")?;
    let now = SystemTime::now();
    set_mtime(&a, now)?;

    let mut store = build(dir.path())?;
    let recorded = store.modified(&a);

    set_mtime(&a, now - Duration::from_secs(600))?;
    assert_eq!(store.check().count(), 0);
    assert_eq!(store.modified(&a), recorded);

    Ok(())
}

#[test]
fn deleted_file_is_skipped_silently() -> TestResult {
    init_tracing();

    let dir = tempdir()?;
    let a = dir.path().join("a.txt");
    let b = dir.path().join("b.txt");
    fs::write(&a, "a")?;
    fs::write(&b, "b")?;
    let base = SystemTime::now() - Duration::from_secs(3600);
    set_mtime(&b, base)?;

    let mut store = build(dir.path())?;

    fs::remove_file(&a)?;
    assert_eq!(store.check().count(), 0);

    set_mtime(&b, base + Duration::from_secs(1))?;
    let changed: Vec<PathBuf> = store.check().collect();
    assert_eq!(changed, vec![b]);
    assert_eq!(store.len(), 2);

    Ok(())
}

#[test]
fn missing_root_is_fatal() {
    let dir = tempdir().unwrap();
    let err = build(&dir.path().join("does-not-exist")).unwrap_err();
    assert!(matches!(err, PollwatchError::RootUnavailable { .. }));
}

#[test]
fn exclude_globs_filter_the_initial_walk() -> TestResult {
    let dir = tempdir()?;
    let root = dir.path();
    fs::create_dir_all(root.join(".git/objects"))?;
    fs::write(root.join(".git/objects/ab"), "x")?;
    fs::write(root.join("main.rs"), "x")?;
    fs::write(root.join("notes.swp"), "x")?;

    let exclude = ExcludeSet::new(&[".git".to_string(), "*.swp".to_string()])?;
    let store = SnapshotStore::build(Arc::new(RealFileSystem), root, &exclude)?;

    let main_rs = root.join("main.rs");
    let tracked: Vec<&Path> = store.paths().collect();
    assert_eq!(tracked, vec![main_rs.as_path()]);

    Ok(())
}

#[cfg(unix)]
#[test]
fn symlinked_directories_are_not_followed() -> TestResult {
    let dir = tempdir()?;
    let root = dir.path();
    fs::create_dir_all(root.join("real"))?;
    fs::write(root.join("real/file.txt"), "x")?;
    std::os::unix::fs::symlink(root, root.join("real/loop"))?;

    let store = build(root)?;
    assert_eq!(store.len(), 1);
    assert!(store.contains(&root.join("real/file.txt")));

    Ok(())
}

#[cfg(unix)]
#[test]
fn symlinked_root_directory_is_walked() -> TestResult {
    init_tracing();

    let dir = tempdir()?;
    let real = dir.path().join("real");
    let link = dir.path().join("link");
    fs::create_dir_all(real.join("nested"))?;
    fs::write(real.join("a.txt"), "a")?;
    fs::write(real.join("nested/b.txt"), "b")?;
    std::os::unix::fs::symlink(&real, &link)?;

    let mut store = build(&link)?;

    let tracked: BTreeSet<PathBuf> = store.paths().map(Path::to_path_buf).collect();
    let expected: BTreeSet<PathBuf> = [link.join("a.txt"), link.join("nested/b.txt")].into();
    assert_eq!(tracked, expected);

    let a = link.join("a.txt");
    let current = mtime(&a)?;
    set_mtime(&a, current + Duration::from_secs(5))?;
    let changed: Vec<PathBuf> = store.check().collect();
    assert_eq!(changed, vec![a]);

    Ok(())
}

#[test]
fn regular_file_as_root_is_rejected() {
    let dir = tempdir().unwrap();
    let file = dir.path().join("single.txt");
    fs::write(&file, "x").unwrap();

    match build(&file) {
        Err(PollwatchError::RootUnavailable { reason, .. }) => assert_eq!(reason, "not a directory"),
        other => panic!("Expected RootUnavailable, got: {:?}", other),
    }
}
