//! Parameter fixtures.
//!
//! - [`reference_params`]: the reference drop-impact case, as validated
//!   by the configuration tests.
//! - [`quick_run_params`]: a coarse, short run that the reference engine
//!   finishes in well under a second.

use std::path::Path;

use droplet_params::SimulationParams;

/// The reference case: `MAXlevel=10, MINlevel=4, We=10, Ohd=5e-3,
/// Ohs=1e-5, Ldomain=8, drop_radius=1, drop_x=1.5, drop_y=1`.
pub fn reference_params() -> SimulationParams {
    SimulationParams {
        max_level: 10,
        min_level: 4,
        we: 10.0,
        ohd: 5e-3,
        ohs: 1e-5,
        ldomain: 8.0,
        drop_radius: 1.0,
        drop_x: 1.5,
        drop_y: 1.0,
        ..SimulationParams::default()
    }
}

/// Coarse mesh, three snapshot periods, output under `dir`.
pub fn quick_run_params(dir: &Path) -> SimulationParams {
    SimulationParams {
        max_level: 5,
        min_level: 2,
        init_grid_level: 3,
        tmax: 0.03,
        tsnap: 0.01,
        output_dir: dir.to_path_buf(),
        ..reference_params()
    }
}

/// `key=value` text equivalent to `params` for the keys a run needs,
/// suitable for writing to a parameter file.
pub fn params_file_text(params: &SimulationParams) -> String {
    format!(
        "# generated fixture\n\
         CaseNo={}\nWe={}\nOhd={}\nOhs={}\nLdomain={}\n\
         drop_x={}\ndrop_y={}\ndrop_radius={}\nimpact_velocity={}\n\
         MAXlevel={}\nMINlevel={}\ninit_grid_level={}\n\
         tmax={}\ntsnap={}\noutput_dir={}\nlog_interval={}\n",
        params.case_no,
        params.we,
        params.ohd,
        params.ohs,
        params.ldomain,
        params.drop_x,
        params.drop_y,
        params.drop_radius,
        params.impact_velocity,
        params.max_level,
        params.min_level,
        params.init_grid_level,
        params.tmax,
        params.tsnap,
        params.output_dir.display(),
        params.log_interval,
    )
}
