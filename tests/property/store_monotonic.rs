// tests/property/store_monotonic.rs

use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, SystemTime};

use proptest::prelude::*;

use pollwatch::fs::mock::MockFileSystem;
use pollwatch::snapshot::{ExcludeSet, SnapshotStore};

const FILES: usize = 4;

fn path(i: usize) -> PathBuf {
    PathBuf::from(format!("w/f{i}"))
}

fn at(secs: u64) -> SystemTime {
    SystemTime::UNIX_EPOCH + Duration::from_secs(secs)
}

proptest! {
    /// Each pass reports exactly the files whose timestamp exceeds the
    /// highest value seen so far, and the stored value tracks that maximum.
    #[test]
    fn check_reports_only_strict_advances(
        steps in prop::collection::vec(
            prop::collection::vec((0..FILES, 0u64..50), 0..6),
            1..12,
        )
    ) {
        let fs = MockFileSystem::new();
        for i in 0..FILES {
            fs.add_file(path(i), at(25));
        }
        let mut store = SnapshotStore::build(Arc::new(fs.clone()), "w", &ExcludeSet::empty()).unwrap();
        let mut high = [25u64; FILES];

        for moves in steps {
            let mut current = high;
            for (i, secs) in moves {
                fs.set_modified(path(i), at(secs));
                current[i] = secs;
            }

            let changed: Vec<PathBuf> = store.check().collect();

            let expected: Vec<PathBuf> = (0..FILES)
                .filter(|&i| current[i] > high[i])
                .map(path)
                .collect();
            prop_assert_eq!(&changed, &expected);

            for i in 0..FILES {
                high[i] = high[i].max(current[i]);
                prop_assert_eq!(store.modified(&path(i)), Some(at(high[i])));
            }

            // A second pass with no edits is always empty.
            prop_assert_eq!(store.check().count(), 0);
        }
    }
}
