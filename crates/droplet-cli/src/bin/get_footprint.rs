//! `get-footprint`: `t,y_max` of one snapshot, to stderr.

use std::io;
use std::process::ExitCode;

use anyhow::{ensure, Context, Result};
use droplet_cli::args::GetFootprintArgs;
use droplet_grid::QuadGrid;
use droplet_interface::{footprint_height, load_snapshot, write_footprint};

fn run(args: GetFootprintArgs) -> Result<()> {
    ensure!(
        args.x_cutoff.is_finite() && args.x_cutoff > 0.0,
        "xCutoff must be positive."
    );
    let snapshot = load_snapshot::<QuadGrid>(&args.snapshot)?;
    let y_max = footprint_height(&snapshot.domain, snapshot.vof, args.x_cutoff)?;
    write_footprint(&mut io::stderr().lock(), snapshot.clock.time, y_max)
        .context("cannot write footprint")?;
    Ok(())
}

fn main() -> ExitCode {
    let args = match droplet_cli::parse_or_exit::<GetFootprintArgs>() {
        Ok(args) => args,
        Err(code) => return code,
    };
    if let Err(e) = droplet_cli::init_tracing(&args.log_level) {
        eprintln!("Error: {e:#}");
        return ExitCode::FAILURE;
    }
    droplet_cli::finish(run(args))
}
