//! Post-processing of Droplet snapshots.
//!
//! Reads persisted snapshots back into an engine instance and extracts
//! the reconstructed interface: gnuplot-ready facet segments, the
//! footprint height near the substrate, and footprint-against-time series
//! over a whole run.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod error;
pub mod extract;
pub mod series;

pub use error::ExtractError;
pub use extract::{
    configure_vof_boundary, facets, footprint_height, load_snapshot, write_facets,
    write_footprint, LoadedSnapshot,
};
pub use series::{
    cutoff_label, footprint_series, write_footprint_series, FootprintSeries, SeriesConfig,
    DEFAULT_CUTOFFS,
};
