//! Integral diagnostics and the statistics recorder.

use std::f64::consts::PI;
use std::io;

use droplet_core::{fmt_g, Clock, FieldAccess, FlowFields};
use droplet_params::{render_summary, ScheduleSpec, SimulationParams};

use crate::log::{LogRow, LogSink};

/// Iterations between two status lines on the live stream.
const STATUS_EVERY: u64 = 100;

/// Phase densities: drop (`f = 1`) and surrounding fluid (`f = 0`).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Densities {
    /// Drop density.
    pub rho1: f64,
    /// Surrounding density.
    pub rho2: f64,
}

impl Densities {
    /// Densities of `p`'s materials.
    pub fn from_params(p: &SimulationParams) -> Self {
        let m = p.materials();
        Self {
            rho1: m.rho1,
            rho2: m.rho2,
        }
    }

    /// Mixture density for a volume fraction, clamped to `[0, 1]`.
    pub fn mix(&self, f: f64) -> f64 {
        let f = f.clamp(0.0, 1.0);
        f * self.rho1 + (1.0 - f) * self.rho2
    }
}

/// Total kinetic energy of the axisymmetric flow,
/// `sum 2 pi y * rho(f) (u_x^2 + u_y^2) / 2 * Delta^2`.
pub fn kinetic_energy<A: FieldAccess + ?Sized>(
    access: &A,
    fields: FlowFields,
    densities: Densities,
) -> f64 {
    access.sum(&|c| {
        let ux = access.get(fields.ux, c.id);
        let uy = access.get(fields.uy, c.id);
        let rho = densities.mix(access.get(fields.f, c.id));
        2.0 * PI * c.y * (0.5 * rho * (ux * ux + uy * uy)) * c.delta * c.delta
    })
}

/// Commented header for a fresh statistics log: the parameter summary and
/// the column legend.
pub fn log_header(p: &SimulationParams) -> String {
    let mut header = String::from("# Drop Impact Simulation Log\n");
    for line in render_summary(p).lines() {
        if line.is_empty() {
            header.push_str("#\n");
        } else {
            header.push_str("# ");
            header.push_str(line);
            header.push('\n');
        }
    }
    header.push_str("# Columns: iteration  dt  time  kinetic_energy\n");
    header
}

/// Samples kinetic energy on the schedule's log iterations.
#[derive(Clone, Copy, Debug)]
pub struct DiagnosticsRecorder {
    fields: FlowFields,
    densities: Densities,
    schedule: ScheduleSpec,
}

impl DiagnosticsRecorder {
    /// A recorder for `fields` with the given densities and schedule.
    pub fn new(fields: FlowFields, densities: Densities, schedule: ScheduleSpec) -> Self {
        Self {
            fields,
            densities,
            schedule,
        }
    }

    /// Record the state at `clock` if its iteration is sampled.
    ///
    /// Returns the row that was appended, or `None` when the iteration is
    /// not sampled or the log already holds it.
    pub fn record<A: FieldAccess + ?Sized>(
        &self,
        sink: &mut LogSink,
        access: &A,
        clock: Clock,
        dt: f64,
    ) -> io::Result<Option<LogRow>> {
        if !self.schedule.is_log_iteration(clock.iteration) {
            return Ok(None);
        }
        let row = LogRow {
            iteration: clock.iteration,
            dt,
            time: clock.time,
            kinetic_energy: kinetic_energy(access, self.fields, self.densities),
        };
        if !sink.append(&row)? {
            return Ok(None);
        }
        if row.iteration == 0 || row.iteration % STATUS_EVERY == 0 {
            tracing::info!(
                "i={}  t={}  dt={}  KE={}",
                row.iteration,
                fmt_g(row.time),
                fmt_g(row.dt),
                fmt_g(row.kinetic_energy)
            );
        }
        Ok(Some(row))
    }
}
