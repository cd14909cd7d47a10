//! `drop-impact`: run a drop-impact simulation.

use std::process::ExitCode;

use anyhow::{Context, Result};
use droplet_cli::args::DropImpactArgs;
use droplet_engine::{FinishedRun, FrozenFlow, SimulationController};
use droplet_grid::QuadGrid;
use droplet_params::{ParamSource, UsageError};
use tracing::info;

fn run(args: DropImpactArgs) -> Result<()> {
    let source = match ParamSource::from_args(&args.params) {
        Ok(source) => source,
        Err(e) => {
            eprint!("{}", UsageError::usage("drop-impact"));
            return Err(e.into());
        }
    };

    let mut controller = SimulationController::new();
    let params = controller
        .configure(&source)
        .context("invalid configuration")?;
    info!("output directory: '{}'", params.output_dir.display());

    let finished: FinishedRun<QuadGrid> = controller
        .run(&mut FrozenFlow::default())
        .context("simulation failed")?;
    info!(
        "done: t={} after {} steps, {} active cells",
        finished.summary.clock.time,
        finished.summary.steps,
        finished.domain.leaf_count()
    );
    Ok(())
}

fn main() -> ExitCode {
    let args = match droplet_cli::parse_or_exit::<DropImpactArgs>() {
        Ok(args) => args,
        Err(code) => return code,
    };
    if let Err(e) = droplet_cli::init_tracing(&args.log_level) {
        eprintln!("Error: {e:#}");
        return ExitCode::FAILURE;
    }
    droplet_cli::finish(run(args))
}
