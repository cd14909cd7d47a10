//! The simulation parameter set and its derived physical quantities.

use std::path::PathBuf;

/// Complete configuration of one drop-impact run.
///
/// Built from [`Default`] and then overlaid by exactly one parser. After
/// [`validate`](crate::validate) returns no violations the value is treated
/// as immutable for the rest of the run.
#[derive(Clone, Debug, PartialEq)]
pub struct SimulationParams {
    /// Case identifier, four digits. Default: 1000.
    pub case_no: i32,

    /// Weber number `rho U^2 R / sigma`. Default: 10.
    pub we: f64,
    /// Ohnesorge number of the drop. Default: 5e-3.
    pub ohd: f64,
    /// Ohnesorge number of the surrounding fluid. Default: 1e-5.
    pub ohs: f64,
    /// Density ratio surrounding/drop. Default: 1e-3.
    pub rho_ratio: f64,

    /// Domain side length in drop radii. Default: 8.
    pub ldomain: f64,
    /// Drop centre `x`. Default: 1.5.
    pub drop_x: f64,
    /// Drop centre `y`. Default: 1.
    pub drop_y: f64,
    /// Drop radius. Default: 1.
    pub drop_radius: f64,
    /// Initial `x` velocity inside the drop; negative moves towards the
    /// substrate. Default: -1.
    pub impact_velocity: f64,

    /// Maximum refinement level. Default: 10.
    pub max_level: i32,
    /// Minimum refinement level. Default: 4.
    pub min_level: i32,
    /// Initial uniform level, `2^level` cells per side. Default: 6.
    pub init_grid_level: i32,
    /// Volume-fraction adaptation tolerance. Default: 1e-3.
    pub f_err: f64,
    /// Curvature adaptation tolerance. Default: 1e-6.
    pub k_err: f64,
    /// Velocity adaptation tolerance, both components. Default: 1e-2.
    pub vel_err: f64,

    /// End time. Default: 4.
    pub tmax: f64,
    /// Snapshot period. Default: 0.01.
    pub tsnap: f64,

    /// Output directory for the log, restart and snapshots. Default: `results`.
    pub output_dir: PathBuf,
    /// Statistics are recorded every `log_interval` iterations. Default: 1.
    pub log_interval: i32,

    /// Coarsen cells with `x > outflow_x_frac * ldomain`. Default: 0.95.
    pub outflow_x_frac: f64,
    /// Coarsen cells with `y > outflow_y_max`. Default: 4.
    pub outflow_y_max: f64,
}

impl Default for SimulationParams {
    fn default() -> Self {
        Self {
            case_no: 1000,
            we: 10.0,
            ohd: 5.0e-3,
            ohs: 1.0e-5,
            rho_ratio: 1.0e-3,
            ldomain: 8.0,
            drop_x: 1.5,
            drop_y: 1.0,
            drop_radius: 1.0,
            impact_velocity: -1.0,
            max_level: 10,
            min_level: 4,
            init_grid_level: 6,
            f_err: 1.0e-3,
            k_err: 1.0e-6,
            vel_err: 1.0e-2,
            tmax: 4.0,
            tsnap: 0.01,
            output_dir: PathBuf::from("results"),
            log_interval: 1,
            outflow_x_frac: 0.95,
            outflow_y_max: 4.0,
        }
    }
}

/// Densities and viscosities of the two phases plus surface tension,
/// in the units where the drop radius, impact speed and drop density are 1.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MaterialProperties {
    /// Drop density (always 1).
    pub rho1: f64,
    /// Surrounding density.
    pub rho2: f64,
    /// Drop viscosity.
    pub mu1: f64,
    /// Surrounding viscosity.
    pub mu2: f64,
    /// Surface tension coefficient.
    pub sigma: f64,
}

impl SimulationParams {
    /// Compiled defaults; identical to [`Default::default`].
    pub fn load_defaults() -> Self {
        Self::default()
    }

    /// Drop Reynolds number `sqrt(We) / Ohd`.
    pub fn reynolds(&self) -> f64 {
        self.we.sqrt() / self.ohd
    }

    /// Nondimensional material properties derived from We, Oh and the
    /// density ratio.
    pub fn materials(&self) -> MaterialProperties {
        let sqrt_we = self.we.sqrt();
        MaterialProperties {
            rho1: 1.0,
            rho2: self.rho_ratio,
            mu1: self.ohd / sqrt_we,
            mu2: self.ohs / sqrt_we,
            sigma: 1.0 / self.we,
        }
    }

    /// Path of the canonical restart snapshot.
    pub fn restart_path(&self) -> PathBuf {
        self.output_dir.join("restart")
    }

    /// Directory holding the archival snapshots.
    pub fn intermediate_dir(&self) -> PathBuf {
        self.output_dir.join("intermediate")
    }

    /// Path of the statistics log.
    pub fn log_path(&self) -> PathBuf {
        self.output_dir.join("log")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_table() {
        let p = SimulationParams::load_defaults();
        assert_eq!(p.case_no, 1000);
        assert_eq!(p.max_level, 10);
        assert_eq!(p.min_level, 4);
        assert_eq!(p.init_grid_level, 6);
        assert_eq!(p.tsnap, 0.01);
        assert_eq!(p.output_dir, PathBuf::from("results"));
        assert_eq!(p.outflow_y_max, 4.0);
    }

    #[test]
    fn derived_quantities() {
        let p = SimulationParams {
            we: 4.0,
            ohd: 0.5,
            ohs: 0.02,
            rho_ratio: 0.1,
            ..SimulationParams::default()
        };
        assert_eq!(p.reynolds(), 4.0);
        let m = p.materials();
        assert_eq!(m.rho1, 1.0);
        assert_eq!(m.rho2, 0.1);
        assert_eq!(m.mu1, 0.25);
        assert_eq!(m.mu2, 0.01);
        assert_eq!(m.sigma, 0.25);
    }

    #[test]
    fn output_paths_live_under_output_dir() {
        let p = SimulationParams {
            output_dir: PathBuf::from("run7"),
            ..SimulationParams::default()
        };
        assert_eq!(p.restart_path(), PathBuf::from("run7/restart"));
        assert_eq!(p.intermediate_dir(), PathBuf::from("run7/intermediate"));
        assert_eq!(p.log_path(), PathBuf::from("run7/log"));
    }
}
