//! Control layer for Droplet drop-impact runs.
//!
//! Provides the [`SimulationController`] that turns validated parameters
//! into a run: it establishes the domain through the [`Domain`] contract,
//! drives the event [`Scheduler`] (initialize or restart, adapt, record
//! statistics, checkpoint, clean up) and hands time stepping to a
//! [`Solver`]. The initial conditions, refinement policy and kinetic-energy
//! diagnostics are exposed separately so they can be tested on synthetic
//! cell lists.
//!
//! [`Domain`]: droplet_core::Domain

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod controller;
pub mod diagnostics;
pub mod error;
pub mod events;
pub mod init;
pub mod log;
pub mod policy;
pub mod scheduler;
pub mod solver;

pub use controller::{ControllerState, FinishedRun, Outcome, SimulationController};
pub use diagnostics::{kinetic_energy, log_header, Densities, DiagnosticsRecorder};
pub use error::{ControllerError, StepCause, StepError};
pub use init::{initialize_drop, DropSetup};
pub use log::{LogRow, LogSink};
pub use policy::{AdaptReport, Levels, RefinementPolicy};
pub use scheduler::{Event, EventContext, RunSummary, Scheduler, Trigger};
pub use solver::{FrozenFlow, Solver, SolverError};
