//! Snapshot files across process-like boundaries: write, re-read, re-write.

use droplet_core::{Clock, Extent};
use droplet_snapshot::{
    read_snapshot, snapshot_hash, write_snapshot, LeafKey, SnapshotData, SnapshotError,
};
use proptest::prelude::*;

fn uniform(level: u8, time: f64, seed: f64) -> SnapshotData {
    let n = 1u32 << level;
    let leaves: Vec<LeafKey> = (0..n)
        .flat_map(|i| (0..n).map(move |j| LeafKey::new(level, i, j)))
        .collect();
    let column = |scale: f64| -> Vec<f64> {
        (0..leaves.len())
            .map(|k| (seed + k as f64 * scale).sin())
            .collect()
    };
    SnapshotData {
        clock: Clock {
            time,
            iteration: 17,
        },
        extent: Extent {
            size: 8.0,
            x0: 0.0,
            y0: 0.0,
        },
        fields: vec!["f".into(), "u.x".into(), "u.y".into(), "kappa".into()],
        values: vec![column(0.1), column(0.2), column(0.3), column(0.4)],
        leaves,
    }
}

#[test]
fn reread_and_rewrite_is_byte_identical() {
    let dir = tempfile::tempdir().unwrap();
    let first = dir.path().join("first");
    let second = dir.path().join("second");

    write_snapshot(&first, &uniform(3, 0.37, 1.0)).unwrap();
    let restored = read_snapshot(&first).unwrap().unwrap();
    write_snapshot(&second, &restored).unwrap();

    assert_eq!(
        std::fs::read(&first).unwrap(),
        std::fs::read(&second).unwrap()
    );
}

#[test]
fn truncated_file_is_reported_not_ignored() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("restart");
    write_snapshot(&path, &uniform(2, 0.0, 0.0)).unwrap();
    let bytes = std::fs::read(&path).unwrap();
    std::fs::write(&path, &bytes[..bytes.len() / 2]).unwrap();
    let err = read_snapshot(&path).unwrap_err();
    assert!(
        matches!(err, SnapshotError::ChecksumMismatch { .. }),
        "unexpected {err}"
    );
}

proptest! {
    #[test]
    fn hash_tracks_content(level in 0u8..4, time in 0.0f64..10.0, seed in -5.0f64..5.0) {
        let a = uniform(level, time, seed);
        let mut b = a.clone();
        prop_assert_eq!(snapshot_hash(&a), snapshot_hash(&b));
        b.values[0][0] += 1.0;
        prop_assert_ne!(snapshot_hash(&a), snapshot_hash(&b));
    }
}
