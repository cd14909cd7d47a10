//! Extraction from snapshots written by the quadtree backend.

use std::fs;
use std::path::{Path, PathBuf};

use droplet_core::{
    level_set_fraction, Clock, Domain, DomainSpec, Extent, FieldAccess, FieldDef, FlowFields,
};
use droplet_grid::QuadGrid;
use droplet_interface::{
    facets, footprint_height, load_snapshot, write_footprint_series, ExtractError,
    SeriesConfig,
};
use proptest::prelude::*;

/// A drop sitting on the substrate, centred at `x = 0.5` on the axis.
fn drop_grid(radius: f64) -> QuadGrid {
    let mut grid = QuadGrid::establish(&DomainSpec {
        extent: Extent {
            size: 1.0,
            x0: 0.0,
            y0: 0.0,
        },
        level: 6,
        fields: FlowFields::definitions(),
    })
    .unwrap();
    let f = FlowFields::STANDARD.f;
    for c in grid.active_cells() {
        let phi = |x: f64, y: f64| radius * radius - ((x - 0.5).powi(2) + y * y);
        grid.set(f, c.id, level_set_fraction(phi, c.x, c.y, c.delta));
    }
    grid
}

fn dump(grid: &QuadGrid, path: &Path, time: f64) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    grid.dump(
        path,
        Clock {
            time,
            iteration: (time * 1000.0) as u64,
        },
    )
    .unwrap();
}

fn snapshot(dir: &Path) -> PathBuf {
    let path = dir.join("snapshot-0.2500");
    dump(&drop_grid(0.4), &path, 0.25);
    path
}

#[test]
fn loaded_snapshot_keeps_clock_and_interface() {
    let dir = tempfile::tempdir().unwrap();
    let loaded = load_snapshot::<QuadGrid>(&snapshot(dir.path())).unwrap();
    assert_eq!(loaded.clock.time, 0.25);
    assert_eq!(loaded.clock.iteration, 250);

    let segments = facets(&loaded.domain, loaded.vof);
    assert!(segments.len() > 50);
    let delta = 1.0 / 64.0;
    for s in &segments {
        for p in [s.p0, s.p1] {
            let r = ((p.x - 0.5).powi(2) + p.y * p.y).sqrt();
            assert!((r - 0.4).abs() < delta, "point {p:?} at r={r}");
        }
    }
}

#[test]
fn footprint_rises_towards_the_drop_centre() {
    let dir = tempfile::tempdir().unwrap();
    let s = load_snapshot::<QuadGrid>(&snapshot(dir.path())).unwrap();
    assert_eq!(footprint_height(&s.domain, s.vof, 0.05).unwrap(), 0.0);
    let near = footprint_height(&s.domain, s.vof, 0.2).unwrap();
    let full = footprint_height(&s.domain, s.vof, 0.5).unwrap();
    assert!(near > 0.0 && near < full, "{near} vs {full}");
    assert!((full - 0.4).abs() < 0.03, "{full}");
}

#[test]
fn bad_inputs_are_reported() {
    let dir = tempfile::tempdir().unwrap();
    let missing = load_snapshot::<QuadGrid>(&dir.path().join("nope"));
    assert!(matches!(missing, Err(ExtractError::NotFound { .. })));

    let garbage = dir.path().join("garbage");
    fs::write(&garbage, b"not a snapshot").unwrap();
    let err = load_snapshot::<QuadGrid>(&garbage).unwrap_err();
    assert!(matches!(err, ExtractError::Load { .. }), "{err}");

    let s = load_snapshot::<QuadGrid>(&snapshot(dir.path())).unwrap();
    for cutoff in [0.0, -1.0, f64::NAN] {
        assert!(matches!(
            footprint_height(&s.domain, s.vof, cutoff),
            Err(ExtractError::InvalidCutoff { .. })
        ));
    }
}

#[test]
fn snapshot_without_volume_fraction_is_a_load_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("pressure-only");
    let grid = QuadGrid::establish(&DomainSpec {
        extent: Extent {
            size: 1.0,
            x0: 0.0,
            y0: 0.0,
        },
        level: 2,
        fields: vec![FieldDef::scalar("p")],
    })
    .unwrap();
    dump(&grid, &path, 0.5);

    let err = load_snapshot::<QuadGrid>(&path).unwrap_err();
    assert!(matches!(err, ExtractError::Load { .. }), "{err}");
    assert!(err.to_string().contains("field 'f'"), "{err}");
}

#[test]
fn series_skips_missing_and_broken_snapshots() {
    let dir = tempfile::tempdir().unwrap();
    let intermediate = dir.path().join("intermediate");
    dump(&drop_grid(0.3), &intermediate.join("snapshot-0.0200"), 0.02);
    dump(&drop_grid(0.2), &intermediate.join("snapshot-0.0000"), 0.0);
    fs::write(intermediate.join("snapshot-0.0300"), b"torn").unwrap();

    let config = SeriesConfig {
        cutoffs: vec![0.05, 0.5],
        snapshots: 5,
        jobs: 2,
        ..SeriesConfig::new(dir.path())
    };
    let written = write_footprint_series::<QuadGrid>(&config).unwrap();
    assert_eq!(
        written,
        vec![
            dir.path().join("rFootvsTime_0.0500.csv"),
            dir.path().join("rFootvsTime_0.5000.csv"),
        ]
    );

    let text = fs::read_to_string(&written[1]).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines[0], "time,rf");
    assert_eq!(lines.len(), 3, "{text}");
    assert!(lines[1].starts_with("0,"));
    assert!(lines[2].starts_with("0.02,"));
    let rf: Vec<f64> = lines[1..]
        .iter()
        .map(|l| l.split(',').nth(1).unwrap().parse().unwrap())
        .collect();
    assert!(rf[0] < rf[1], "{rf:?}");

    let narrow = fs::read_to_string(&written[0]).unwrap();
    assert!(narrow.lines().skip(1).all(|l| l.ends_with(",0")), "{narrow}");
}

#[test]
fn invalid_cutoff_fails_the_series() {
    let dir = tempfile::tempdir().unwrap();
    let config = SeriesConfig {
        cutoffs: vec![1e-3, 0.0],
        ..SeriesConfig::new(dir.path())
    };
    assert!(matches!(
        write_footprint_series::<QuadGrid>(&config),
        Err(ExtractError::InvalidCutoff { .. })
    ));
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn footprint_is_non_decreasing_in_the_cutoff(a in 0.01f64..1.0, b in 0.01f64..1.0) {
        let grid = drop_grid(0.35);
        let vof = FlowFields::STANDARD.f;
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        let h_lo = footprint_height(&grid, vof, lo).unwrap();
        let h_hi = footprint_height(&grid, vof, hi).unwrap();
        prop_assert!(h_lo <= h_hi, "{lo} -> {h_lo}, {hi} -> {h_hi}");
    }
}
