//! `footprint-series`: footprint height against time for a whole case.

use std::process::ExitCode;

use anyhow::{ensure, Result};
use droplet_cli::args::FootprintSeriesArgs;
use droplet_grid::QuadGrid;
use droplet_interface::{write_footprint_series, SeriesConfig};
use tracing::info;

fn run(args: FootprintSeriesArgs) -> Result<()> {
    ensure!(args.jobs >= 1, "--jobs must be >= 1");
    ensure!(args.snapshots >= 1, "--snapshots must be >= 1");
    ensure!(
        args.tsnap.is_finite() && args.tsnap > 0.0,
        "--tsnap must be positive"
    );
    ensure!(
        args.case.is_dir(),
        "case directory '{}' not found",
        args.case.display()
    );

    let config = SeriesConfig {
        case_dir: args.case,
        cutoffs: args.cutoffs,
        snapshots: args.snapshots,
        tsnap: args.tsnap,
        jobs: args.jobs,
    };
    info!(
        "probing {} snapshots at {} cutoffs on {} threads",
        config.snapshots,
        config.cutoffs.len(),
        config.jobs
    );
    let written = write_footprint_series::<QuadGrid>(&config)?;
    info!("{} series written", written.len());
    Ok(())
}

fn main() -> ExitCode {
    let args = match droplet_cli::parse_or_exit::<FootprintSeriesArgs>() {
        Ok(args) => args,
        Err(code) => return code,
    };
    if let Err(e) = droplet_cli::init_tracing(&args.log_level) {
        eprintln!("Error: {e:#}");
        return ExitCode::FAILURE;
    }
    droplet_cli::finish(run(args))
}
