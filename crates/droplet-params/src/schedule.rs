//! The frozen schedule handed to the time-stepping scheduler.

use crate::params::SimulationParams;

/// Relative slack when deciding whether `k * tsnap` still lies within `tmax`.
const TIME_SLACK: f64 = 1e-9;

/// Snapshot period, end time and statistics interval, derived once from
/// validated parameters and never changed during a run.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScheduleSpec {
    /// Snapshot period.
    pub tsnap: f64,
    /// End time.
    pub tmax: f64,
    /// Statistics interval in iterations, at least 1.
    pub log_interval: u64,
}

impl ScheduleSpec {
    /// Freeze the schedule of `p`.
    ///
    /// Intended for validated parameters; a non-positive log interval is
    /// clamped to 1 rather than producing an undefined sampling rule.
    pub fn from_params(p: &SimulationParams) -> Self {
        Self {
            tsnap: p.tsnap,
            tmax: p.tmax,
            log_interval: u64::try_from(p.log_interval).unwrap_or(1).max(1),
        }
    }

    /// Number of snapshot instants `k * tsnap` with `k * tsnap <= tmax`.
    pub fn snapshot_count(&self) -> u64 {
        if self.tsnap.is_nan() || self.tsnap <= 0.0 || self.tmax < 0.0 {
            return 0;
        }
        (self.tmax / self.tsnap + TIME_SLACK).floor() as u64 + 1
    }

    /// Time of the `k`-th snapshot.
    pub fn snapshot_time(&self, k: u64) -> f64 {
        k as f64 * self.tsnap
    }

    /// Whether statistics are recorded at `iteration`.
    pub fn is_log_iteration(&self, iteration: u64) -> bool {
        iteration % self.log_interval == 0
    }
}
