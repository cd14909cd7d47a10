//! Droplet: control layer for adaptive-mesh simulations of a drop
//! impacting a substrate.
//!
//! This is the facade crate that re-exports the public API of the Droplet
//! sub-crates.
//!
//! # Quick start
//!
//! ```rust
//! use droplet::prelude::*;
//!
//! let out = tempfile::tempdir().unwrap();
//! let params = SimulationParams {
//!     max_level: 4,
//!     min_level: 2,
//!     init_grid_level: 3,
//!     tmax: 0.02,
//!     tsnap: 0.01,
//!     output_dir: out.path().to_path_buf(),
//!     ..SimulationParams::default()
//! };
//!
//! let mut controller = SimulationController::new();
//! controller.configure_params(params, Vec::new()).unwrap();
//! let run: FinishedRun<QuadGrid> = controller.run(&mut FrozenFlow::default()).unwrap();
//! assert_eq!(run.summary.clock.iteration, 2);
//! assert!(out.path().join("restart").exists());
//! ```
//!
//! # Modules
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`types`] | `droplet-core` | IDs, field definitions, the engine contract, PLIC geometry |
//! | [`params`] | `droplet-params` | Parameters, parsers, validation, schedule |
//! | [`snapshot`] | `droplet-snapshot` | Binary snapshot format |
//! | [`grid`] | `droplet-grid` | Reference quadtree backend |
//! | [`engine`] | `droplet-engine` | Controller, scheduler, events, diagnostics |
//! | [`interface`] | `droplet-interface` | Facet and footprint extraction |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Core types and the engine contract (`droplet-core`).
///
/// Contains [`types::Domain`], the narrow [`types::FieldAccess`]
/// capability, field definitions and the PLIC helpers.
pub use droplet_core as types;

/// Simulation parameters (`droplet-params`).
pub use droplet_params as params;

/// Snapshot encoding and atomic persistence (`droplet-snapshot`).
pub use droplet_snapshot as snapshot;

/// Reference engine backend (`droplet-grid`).
pub use droplet_grid as grid;

/// Simulation control (`droplet-engine`).
///
/// [`engine::SimulationController`] drives a run; the
/// [`engine::Scheduler`] fires the events of each step.
pub use droplet_engine as engine;

/// Post-processing of snapshots (`droplet-interface`).
pub use droplet_interface as interface;

/// Common imports for running and post-processing a simulation.
pub mod prelude {
    pub use droplet_core::{Clock, Domain, FieldAccess, FieldId, FlowFields};
    pub use droplet_engine::{
        ControllerError, FinishedRun, FrozenFlow, SimulationController, Solver,
    };
    pub use droplet_grid::QuadGrid;
    pub use droplet_interface::{facets, footprint_height, load_snapshot};
    pub use droplet_params::{ParamSource, SimulationParams};
}
