//! Controller and step error types.

use std::error::Error;
use std::fmt;
use std::io;
use std::path::PathBuf;

use droplet_core::EngineError;
use droplet_params::{ConfigError, UsageError, Violation};

use crate::controller::ControllerState;
use crate::solver::SolverError;

// ── StepError ──────────────────────────────────────────────────────

/// What went wrong inside a step.
#[derive(Debug)]
pub enum StepCause {
    /// The engine rejected a mesh, reduction or persistence request.
    Engine(EngineError),
    /// Writing the statistics log failed.
    Io(io::Error),
    /// The solver could not advance.
    Solver(SolverError),
}

/// An event or the solver failed; the run stops at this step.
#[derive(Debug)]
pub struct StepError {
    /// Name of the failing event, or `"solver"`.
    pub event: String,
    /// Underlying failure.
    pub cause: StepCause,
}

impl StepError {
    /// Failure of `event` caused by the engine.
    pub fn engine(event: &str, err: EngineError) -> Self {
        Self {
            event: event.to_string(),
            cause: StepCause::Engine(err),
        }
    }

    /// Failure of `event` caused by log I/O.
    pub fn io(event: &str, err: io::Error) -> Self {
        Self {
            event: event.to_string(),
            cause: StepCause::Io(err),
        }
    }

    /// Failure of the solver.
    pub fn solver(err: SolverError) -> Self {
        Self {
            event: "solver".to_string(),
            cause: StepCause::Solver(err),
        }
    }
}

impl fmt::Display for StepError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.cause {
            StepCause::Engine(e) => write!(f, "event '{}' failed: {e}", self.event),
            StepCause::Io(e) => write!(f, "event '{}' failed: {e}", self.event),
            StepCause::Solver(e) => write!(f, "{}: {e}", self.event),
        }
    }
}

impl Error for StepError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match &self.cause {
            StepCause::Engine(e) => Some(e),
            StepCause::Io(e) => Some(e),
            StepCause::Solver(e) => Some(e),
        }
    }
}

// ── ControllerError ────────────────────────────────────────────────

/// Errors surfaced by [`SimulationController`](crate::SimulationController).
#[derive(Debug)]
pub enum ControllerError {
    /// The argument list selects no parameter source.
    Usage(UsageError),
    /// The selected parameter source could not be parsed.
    Config(ConfigError),
    /// Parsed parameters violate one or more constraints; all are listed.
    Validation(Vec<Violation>),
    /// An output directory or the log could not be created or opened.
    Resource {
        /// Path involved.
        path: PathBuf,
        /// Description of the failure.
        reason: String,
    },
    /// The engine rejected the domain set-up.
    Engine(EngineError),
    /// The run stopped at a failing step.
    Step(StepError),
    /// The operation is not allowed in the controller's current state.
    InvalidState {
        /// Operation attempted.
        operation: &'static str,
        /// State at the time of the call.
        state: ControllerState,
    },
}

impl fmt::Display for ControllerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Usage(e) => write!(f, "{e}"),
            Self::Config(e) => write!(f, "{e}"),
            Self::Validation(violations) => {
                write!(f, "parameter validation failed")?;
                for v in violations {
                    write!(f, "\n  - {v}")?;
                }
                Ok(())
            }
            Self::Resource { path, reason } => {
                write!(f, "cannot prepare '{}': {reason}", path.display())
            }
            Self::Engine(e) => write!(f, "{e}"),
            Self::Step(e) => write!(f, "{e}"),
            Self::InvalidState { operation, state } => {
                write!(f, "cannot {operation} while {state:?}")
            }
        }
    }
}

impl Error for ControllerError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Usage(e) => Some(e),
            Self::Config(e) => Some(e),
            Self::Engine(e) => Some(e),
            Self::Step(e) => Some(e),
            _ => None,
        }
    }
}

impl From<UsageError> for ControllerError {
    fn from(e: UsageError) -> Self {
        Self::Usage(e)
    }
}

impl From<ConfigError> for ControllerError {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

impl From<EngineError> for ControllerError {
    fn from(e: EngineError) -> Self {
        Self::Engine(e)
    }
}

impl From<StepError> for ControllerError {
    fn from(e: StepError) -> Self {
        Self::Step(e)
    }
}
