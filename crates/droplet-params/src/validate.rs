//! Parameter validation.
//!
//! [`validate`] collects every violated invariant instead of stopping at the
//! first, so a user sees the whole list in one run.

use std::fmt;

use droplet_core::fmt_g;

use crate::error::ParamWarning;
use crate::params::SimulationParams;

/// Lowest admissible minimum refinement level.
pub const MIN_LEVEL_FLOOR: i32 = 2;
/// Maximum levels above this trigger [`ParamWarning::HighMaxLevel`].
pub const HIGH_MAX_LEVEL: i32 = 15;

/// One violated parameter invariant.
#[derive(Clone, Debug, PartialEq)]
pub enum Violation {
    /// `CaseNo` outside `[1000, 9999]`.
    CaseNumberOutOfRange {
        /// Configured case number.
        value: i32,
    },
    /// A dimensionless group (We, Ohd, Ohs, rho_ratio) is not positive.
    NonPositiveDimensionless {
        /// Parameter name.
        name: &'static str,
        /// Configured value.
        value: f64,
    },
    /// `Ldomain <= 2 * drop_radius`.
    DomainTooSmall {
        /// Configured domain size.
        ldomain: f64,
        /// Configured drop radius.
        drop_radius: f64,
    },
    /// `drop_radius <= 0`.
    NonPositiveDropRadius {
        /// Configured radius.
        value: f64,
    },
    /// `MAXlevel < MINlevel`.
    LevelOrder {
        /// Configured maximum level.
        max_level: i32,
        /// Configured minimum level.
        min_level: i32,
    },
    /// `MINlevel < 2`.
    MinLevelBelowFloor {
        /// Configured minimum level.
        min_level: i32,
    },
    /// `init_grid_level` outside `[0, MAXlevel]`.
    InitLevelOutOfRange {
        /// Configured initial level.
        init_level: i32,
        /// Configured maximum level.
        max_level: i32,
    },
    /// One of fErr, KErr, VelErr is not positive.
    NonPositiveTolerance {
        /// Parameter name.
        name: &'static str,
        /// Configured value.
        value: f64,
    },
    /// `tmax <= 0`.
    NonPositiveEndTime {
        /// Configured end time.
        tmax: f64,
    },
    /// `tsnap` outside `(0, tmax]`.
    SnapshotPeriodOutOfRange {
        /// Configured period.
        tsnap: f64,
        /// Configured end time.
        tmax: f64,
    },
    /// `log_interval < 1`.
    NonPositiveLogInterval {
        /// Configured interval.
        value: i32,
    },
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CaseNumberOutOfRange { value } => {
                write!(f, "CaseNo must be 4-digit (1000-9999), got {value}")
            }
            Self::NonPositiveDimensionless { name, value } => {
                write!(f, "{name} must be positive ({name} = {})", fmt_g(*value))
            }
            Self::DomainTooSmall {
                ldomain,
                drop_radius,
            } => write!(
                f,
                "domain too small (Ldomain = {}, need > 2*drop_radius = {})",
                fmt_g(*ldomain),
                fmt_g(2.0 * drop_radius)
            ),
            Self::NonPositiveDropRadius { value } => {
                write!(f, "drop radius must be positive (drop_radius = {})", fmt_g(*value))
            }
            Self::LevelOrder {
                max_level,
                min_level,
            } => write!(f, "MAXlevel ({max_level}) must be >= MINlevel ({min_level})"),
            Self::MinLevelBelowFloor { min_level } => {
                write!(f, "MINlevel ({min_level}) must be >= {MIN_LEVEL_FLOOR}")
            }
            Self::InitLevelOutOfRange {
                init_level,
                max_level,
            } => write!(
                f,
                "init_grid_level ({init_level}) must lie in [0, MAXlevel = {max_level}]"
            ),
            Self::NonPositiveTolerance { name, value } => {
                write!(f, "error tolerance {name} must be positive ({name} = {})", fmt_g(*value))
            }
            Self::NonPositiveEndTime { tmax } => {
                write!(f, "tmax must be positive (tmax = {})", fmt_g(*tmax))
            }
            Self::SnapshotPeriodOutOfRange { tsnap, tmax } => write!(
                f,
                "invalid tsnap (tsnap = {}, tmax = {}), need 0 < tsnap <= tmax",
                fmt_g(*tsnap),
                fmt_g(*tmax)
            ),
            Self::NonPositiveLogInterval { value } => {
                write!(f, "log_interval must be at least 1, got {value}")
            }
        }
    }
}

/// `v > 0`, false for NaN.
fn positive(v: f64) -> bool {
    v > 0.0
}

/// Check every invariant of `p`; an empty result means valid.
///
/// Violations are reported in a fixed order (case number, physics,
/// geometry, levels, tolerances, time, output). NaN fails every
/// positivity check.
pub fn validate(p: &SimulationParams) -> Vec<Violation> {
    let mut out = Vec::new();

    if !(1000..=9999).contains(&p.case_no) {
        out.push(Violation::CaseNumberOutOfRange { value: p.case_no });
    }

    for (name, value) in [
        ("We", p.we),
        ("Ohd", p.ohd),
        ("Ohs", p.ohs),
        ("rho_ratio", p.rho_ratio),
    ] {
        if !positive(value) {
            out.push(Violation::NonPositiveDimensionless { name, value });
        }
    }

    if !positive(p.ldomain - 2.0 * p.drop_radius) {
        out.push(Violation::DomainTooSmall {
            ldomain: p.ldomain,
            drop_radius: p.drop_radius,
        });
    }
    if !positive(p.drop_radius) {
        out.push(Violation::NonPositiveDropRadius {
            value: p.drop_radius,
        });
    }

    if p.max_level < p.min_level {
        out.push(Violation::LevelOrder {
            max_level: p.max_level,
            min_level: p.min_level,
        });
    }
    if p.min_level < MIN_LEVEL_FLOOR {
        out.push(Violation::MinLevelBelowFloor {
            min_level: p.min_level,
        });
    }
    if p.init_grid_level < 0 || p.init_grid_level > p.max_level {
        out.push(Violation::InitLevelOutOfRange {
            init_level: p.init_grid_level,
            max_level: p.max_level,
        });
    }

    for (name, value) in [("fErr", p.f_err), ("KErr", p.k_err), ("VelErr", p.vel_err)] {
        if !positive(value) {
            out.push(Violation::NonPositiveTolerance { name, value });
        }
    }

    if !positive(p.tmax) {
        out.push(Violation::NonPositiveEndTime { tmax: p.tmax });
    }
    if !positive(p.tsnap) || p.tsnap > p.tmax {
        out.push(Violation::SnapshotPeriodOutOfRange {
            tsnap: p.tsnap,
            tmax: p.tmax,
        });
    }

    if p.log_interval < 1 {
        out.push(Violation::NonPositiveLogInterval {
            value: p.log_interval,
        });
    }

    out
}

/// Non-fatal advisories for otherwise valid parameters.
pub fn advisories(p: &SimulationParams) -> Vec<ParamWarning> {
    let mut out = Vec::new();
    if p.max_level > HIGH_MAX_LEVEL {
        out.push(ParamWarning::HighMaxLevel { level: p.max_level });
    }
    out
}
