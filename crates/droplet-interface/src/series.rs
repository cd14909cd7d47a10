//! Footprint height against time for a whole run.
//!
//! Every archival snapshot of a case is loaded once, in parallel, and probed
//! at every cutoff. The samples are then written as one `time,rf` CSV file
//! per cutoff.

use std::fs;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use droplet_core::Domain;
use rayon::prelude::*;

use crate::error::ExtractError;
use crate::extract::{footprint_height, load_snapshot};

/// Cutoffs probed when none are given.
pub const DEFAULT_CUTOFFS: [f64; 5] = [1e-3, 2.5e-3, 5e-3, 1e-2, 5e-2];

/// Which snapshots to read and how.
#[derive(Clone, Debug, PartialEq)]
pub struct SeriesConfig {
    /// Results directory of the case (holding `intermediate/`).
    pub case_dir: PathBuf,
    /// Cutoffs to probe; each yields one output file.
    pub cutoffs: Vec<f64>,
    /// Number of snapshot indices `k` to look for.
    pub snapshots: usize,
    /// Time between snapshots.
    pub tsnap: f64,
    /// Worker threads.
    pub jobs: usize,
}

impl SeriesConfig {
    /// Defaults for `case_dir`: the standard cutoffs, 4000 snapshots every
    /// 0.01, four workers.
    pub fn new(case_dir: impl Into<PathBuf>) -> Self {
        Self {
            case_dir: case_dir.into(),
            cutoffs: DEFAULT_CUTOFFS.to_vec(),
            snapshots: 4000,
            tsnap: 0.01,
            jobs: 4,
        }
    }

    /// Path of the `k`-th archival snapshot.
    pub fn snapshot_path(&self, k: usize) -> PathBuf {
        let t = self.tsnap * k as f64;
        self.case_dir
            .join("intermediate")
            .join(format!("snapshot-{t:.4}"))
    }

    /// Output path for `cutoff`.
    pub fn output_path(&self, cutoff: f64) -> PathBuf {
        self.case_dir
            .join(format!("rFootvsTime_{}.csv", cutoff_label(cutoff)))
    }
}

/// `%.4f` of the cutoff, with trailing zeros trimmed from cutoffs of one or
/// more.
pub fn cutoff_label(cutoff: f64) -> String {
    let label = format!("{cutoff:.4}");
    if cutoff < 1.0 {
        return label;
    }
    label.trim_end_matches('0').trim_end_matches('.').to_string()
}

/// Samples for one cutoff, sorted by time.
#[derive(Clone, Debug, PartialEq)]
pub struct FootprintSeries {
    /// The cutoff.
    pub cutoff: f64,
    /// `(time, rf)` pairs.
    pub samples: Vec<(f64, f64)>,
}

impl FootprintSeries {
    /// Write as CSV with a `time,rf` header.
    pub fn write_csv(&self, path: &Path) -> Result<(), ExtractError> {
        let mut out = BufWriter::new(fs::File::create(path)?);
        writeln!(out, "time,rf")?;
        for (t, rf) in &self.samples {
            writeln!(out, "{t},{rf}")?;
        }
        out.flush()?;
        Ok(())
    }
}

/// Heights of one snapshot at every cutoff, or `None` if it was skipped.
fn probe<D: Domain>(path: &Path, cutoffs: &[f64]) -> Option<(f64, Vec<f64>)> {
    if !path.exists() {
        tracing::warn!("skipping missing snapshot '{}'", path.display());
        return None;
    }
    let probed = load_snapshot::<D>(path).and_then(|s| {
        let heights = cutoffs
            .iter()
            .map(|&c| footprint_height(&s.domain, s.vof, c))
            .collect::<Result<Vec<_>, _>>()?;
        Ok((s.clock.time, heights))
    });
    match probed {
        Ok(sample) => {
            tracing::debug!("'{}': t={} rf={:?}", path.display(), sample.0, sample.1);
            Some(sample)
        }
        Err(e) => {
            tracing::warn!("skipping '{}': {e}", path.display());
            None
        }
    }
}

/// Probe every snapshot of `config` on `config.jobs` threads.
///
/// Missing and unreadable snapshots are skipped with a warning. Fails only
/// on an invalid cutoff or when the worker pool cannot start.
pub fn footprint_series<D: Domain>(config: &SeriesConfig) -> Result<Vec<FootprintSeries>, ExtractError> {
    if let Some(&bad) = config
        .cutoffs
        .iter()
        .find(|c| !(c.is_finite() && **c > 0.0))
    {
        return Err(ExtractError::InvalidCutoff { value: bad });
    }
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(config.jobs.max(1))
        .build()
        .map_err(|e| ExtractError::Pool {
            reason: e.to_string(),
        })?;
    let mut samples: Vec<(f64, Vec<f64>)> = pool.install(|| {
        (0..config.snapshots)
            .into_par_iter()
            .filter_map(|k| probe::<D>(&config.snapshot_path(k), &config.cutoffs))
            .collect()
    });
    samples.sort_by(|a, b| a.0.total_cmp(&b.0));

    Ok(config
        .cutoffs
        .iter()
        .enumerate()
        .map(|(n, &cutoff)| FootprintSeries {
            cutoff,
            samples: samples.iter().map(|(t, h)| (*t, h[n])).collect(),
        })
        .collect())
}

/// Compute the series and write one CSV per cutoff. Returns the paths
/// written.
pub fn write_footprint_series<D: Domain>(config: &SeriesConfig) -> Result<Vec<PathBuf>, ExtractError> {
    let mut written = Vec::new();
    for series in footprint_series::<D>(config)? {
        let path = config.output_path(series.cutoff);
        series.write_csv(&path)?;
        tracing::info!(
            "wrote {} rows to '{}'",
            series.samples.len(),
            path.display()
        );
        written.push(path);
    }
    Ok(written)
}
