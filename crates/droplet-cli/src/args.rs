//! Argument definitions of the four binaries.

use std::path::PathBuf;

use clap::Parser;

/// Drop impact on a substrate: two-phase axisymmetric simulation.
#[derive(Debug, Parser)]
#[command(name = "drop-impact")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Drop impact simulation", long_about = None)]
pub struct DropImpactArgs {
    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    pub log_level: String,

    /// A parameter file, or `MAXlevel tmax We Ohd Ohs Ldomain [drop_x]
    /// [drop_y] [impact_velocity]`
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    pub params: Vec<String>,
}

/// Write the interface facets of a snapshot to stderr.
#[derive(Debug, Parser)]
#[command(name = "get-facet")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Extract interface facets from a snapshot", long_about = None)]
pub struct GetFacetArgs {
    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "warn")]
    pub log_level: String,

    /// Snapshot file
    pub snapshot: PathBuf,
}

/// Write `t,y_max` of a snapshot's footprint to stderr.
#[derive(Debug, Parser)]
#[command(name = "get-footprint")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Footprint height of a snapshot", long_about = None)]
pub struct GetFootprintArgs {
    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "warn")]
    pub log_level: String,

    /// Snapshot file
    pub snapshot: PathBuf,

    /// Upper bound in x of the search window
    #[arg(allow_hyphen_values = true)]
    pub x_cutoff: f64,
}

/// Footprint height against time for every snapshot of a case.
#[derive(Debug, Parser)]
#[command(name = "footprint-series")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Footprint-vs-time series for a results directory", long_about = None)]
pub struct FootprintSeriesArgs {
    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    pub log_level: String,

    /// Results directory holding `intermediate/`
    #[arg(long)]
    pub case: PathBuf,

    /// Search windows; one output file each
    #[arg(long, num_args = 1.., default_values_t = droplet_interface::DEFAULT_CUTOFFS)]
    pub cutoffs: Vec<f64>,

    /// Number of snapshot indices to look for
    #[arg(long, default_value_t = 4000)]
    pub snapshots: usize,

    /// Time between snapshots
    #[arg(long, default_value_t = 0.01)]
    pub tsnap: f64,

    /// Worker threads
    #[arg(long, default_value_t = 4)]
    pub jobs: usize,
}
