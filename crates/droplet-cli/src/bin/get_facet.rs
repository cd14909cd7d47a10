//! `get-facet`: interface facets of one snapshot, to stderr.

use std::io::{self, Write};
use std::process::ExitCode;

use anyhow::{Context, Result};
use droplet_cli::args::GetFacetArgs;
use droplet_grid::QuadGrid;
use droplet_interface::{facets, load_snapshot, write_facets};

fn run(args: GetFacetArgs) -> Result<()> {
    let snapshot = load_snapshot::<QuadGrid>(&args.snapshot)?;
    let segments = facets(&snapshot.domain, snapshot.vof);
    tracing::debug!("{} facets at t={}", segments.len(), snapshot.clock.time);

    let mut err = io::stderr().lock();
    write_facets(&mut err, &segments).context("cannot write facets")?;
    err.flush()?;
    Ok(())
}

fn main() -> ExitCode {
    let args = match droplet_cli::parse_or_exit::<GetFacetArgs>() {
        Ok(args) => args,
        Err(code) => return code,
    };
    if let Err(e) = droplet_cli::init_tracing(&args.log_level) {
        eprintln!("Error: {e:#}");
        return ExitCode::FAILURE;
    }
    droplet_cli::finish(run(args))
}
