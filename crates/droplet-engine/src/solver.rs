//! The flow solver seam and its reference implementation.

use std::error::Error;
use std::fmt;

use droplet_core::{Domain, FieldAccess, FlowFields};

/// A solver failed to advance the fields.
#[derive(Clone, Debug, PartialEq)]
pub struct SolverError {
    /// Description of the failure.
    pub reason: String,
}

impl fmt::Display for SolverError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "solver failed: {}", self.reason)
    }
}

impl Error for SolverError {}

/// Advances the two-phase flow by one time step.
///
/// The control layer owns the schedule; the solver only proposes a stable
/// step size and applies a step of the size it is given, which may be
/// smaller than proposed so that the clock lands on event times.
pub trait Solver<D: Domain> {
    /// Human-readable solver name.
    fn name(&self) -> &str;

    /// Largest stable step for the current state. Must be positive.
    fn max_dt(&mut self, domain: &D) -> f64;

    /// Advance the fields by `dt`.
    fn advance(&mut self, domain: &mut D, dt: f64) -> Result<(), SolverError>;
}

/// Reference solver that keeps every field unchanged.
///
/// Proposes `cfl * min(Delta) / max(|u|)`, capped at `dt_max`, so that the
/// scheduler sees realistic, mesh-dependent step sizes.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrozenFlow {
    /// Courant number. Default: 0.8.
    pub cfl: f64,
    /// Upper bound on the step. Default: 1e-2.
    pub dt_max: f64,
    /// Velocity components used for the CFL bound.
    pub fields: FlowFields,
}

impl Default for FrozenFlow {
    fn default() -> Self {
        Self {
            cfl: 0.8,
            dt_max: 1e-2,
            fields: FlowFields::STANDARD,
        }
    }
}

impl FrozenFlow {
    /// CFL-limited step for the velocity currently stored in `access`.
    pub fn cfl_dt<A: FieldAccess + ?Sized>(&self, access: &A) -> f64 {
        let FlowFields { ux, uy, .. } = self.fields;
        let inv_delta = access.max(0.0, &|c| Some(1.0 / c.delta));
        let speed = access.max(0.0, &|c| Some(access.get(ux, c.id).hypot(access.get(uy, c.id))));
        if inv_delta <= 0.0 || speed <= 0.0 {
            return self.dt_max;
        }
        (self.cfl / (inv_delta * speed)).min(self.dt_max)
    }
}

impl<D: Domain> Solver<D> for FrozenFlow {
    fn name(&self) -> &str {
        "frozen-flow"
    }

    fn max_dt(&mut self, domain: &D) -> f64 {
        self.cfl_dt(domain)
    }

    fn advance(&mut self, _domain: &mut D, dt: f64) -> Result<(), SolverError> {
        if dt.is_finite() && dt > 0.0 {
            Ok(())
        } else {
            Err(SolverError {
                reason: format!("invalid step {dt}"),
            })
        }
    }
}
