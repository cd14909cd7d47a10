//! Human-readable parameter summary.

use std::fmt;

use droplet_core::fmt_g;

use crate::params::SimulationParams;

const RULE: &str = "========================================";

/// Deterministic multi-line summary of `p`, including the derived Reynolds
/// number. Numbers use general (`%g`-style) formatting.
///
/// The same text goes to the live status stream at startup and, prefixed
/// with `# `, into the header of a fresh statistics log.
pub fn render_summary(p: &SimulationParams) -> String {
    Summary(p).to_string()
}

struct Summary<'a>(&'a SimulationParams);

impl fmt::Display for Summary<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let p = self.0;
        let g = fmt_g;
        let cells = u32::try_from(p.init_grid_level)
            .ok()
            .and_then(|lvl| 1u64.checked_shl(lvl))
            .map_or_else(|| "?".to_string(), |n| n.to_string());

        writeln!(f)?;
        writeln!(f, "{RULE}")?;
        writeln!(f, "Drop Impact Simulation Configuration")?;
        writeln!(f, "{RULE}")?;
        writeln!(f)?;
        writeln!(f, "Case Identification:")?;
        writeln!(f, "  Case Number:              {:04}", p.case_no)?;
        writeln!(f)?;
        writeln!(f, "Physical Parameters:")?;
        writeln!(f, "  Weber number (We):        {}", g(p.we))?;
        writeln!(f, "  Ohnesorge (drop):         {}", g(p.ohd))?;
        writeln!(f, "  Ohnesorge (surround):     {}", g(p.ohs))?;
        writeln!(f, "  Density ratio:            {}", g(p.rho_ratio))?;
        writeln!(f, "  Reynolds (drop):          {}", g(p.reynolds()))?;
        writeln!(f)?;
        writeln!(f, "Geometry:")?;
        writeln!(f, "  Domain size (Ldomain):    {}", g(p.ldomain))?;
        writeln!(
            f,
            "  Drop position (x, y):     ({}, {})",
            g(p.drop_x),
            g(p.drop_y)
        )?;
        writeln!(f, "  Drop radius:              {}", g(p.drop_radius))?;
        writeln!(f, "  Impact velocity:          {}", g(p.impact_velocity))?;
        writeln!(f)?;
        writeln!(f, "Numerical Settings:")?;
        writeln!(
            f,
            "  Grid levels (min/max):    {} / {}",
            p.min_level, p.max_level
        )?;
        writeln!(
            f,
            "  Initial grid level:       {} (2^{} = {} cells)",
            p.init_grid_level, p.init_grid_level, cells
        )?;
        writeln!(f, "  Error tolerances:")?;
        writeln!(f, "    VOF (fErr):             {}", g(p.f_err))?;
        writeln!(f, "    Curvature (KErr):       {}", g(p.k_err))?;
        writeln!(f, "    Velocity (VelErr):      {}", g(p.vel_err))?;
        writeln!(
            f,
            "  Outflow coarsening:       x > {} * Ldomain, y > {}",
            g(p.outflow_x_frac),
            g(p.outflow_y_max)
        )?;
        writeln!(f)?;
        writeln!(f, "Time Control:")?;
        writeln!(f, "  Maximum time (tmax):      {}", g(p.tmax))?;
        writeln!(f, "  Snapshot interval:        {}", g(p.tsnap))?;
        writeln!(f)?;
        writeln!(f, "Output:")?;
        writeln!(f, "  Output directory:         {}", p.output_dir.display())?;
        writeln!(f, "  Log interval:             {} iterations", p.log_interval)?;
        writeln!(f)?;
        writeln!(f, "{RULE}")?;
        Ok(())
    }
}
