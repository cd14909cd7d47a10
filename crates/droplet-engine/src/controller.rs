//! The simulation controller and its lifecycle state machine.
//!
//! ```text
//! Uninitialized --configure--> Configured --run--> Running --> Terminated(Success)
//!       |                                             |
//!       +--(parse or validation failure)--------------+--> Terminated(Failure)
//! ```
//!
//! The controller owns no engine state between calls. [`run`] establishes
//! the domain, prepares the output directory, opens the statistics log and
//! drives the [`Scheduler`] to the end time. The log handle is local to
//! `run`, so it is released on every exit path.
//!
//! [`run`]: SimulationController::run

use std::fs;
use std::path::Path;

use droplet_core::{Clock, Domain, DomainSpec, Extent, FlowFields};
use droplet_params::{
    advisories, render_summary, validate, ParamSource, ParamWarning, ScheduleSpec,
    SimulationParams,
};

use crate::diagnostics::{log_header, Densities, DiagnosticsRecorder};
use crate::error::ControllerError;
use crate::events::{AdaptEvent, CheckpointEvent, CleanupEvent, InitEvent, StatisticsEvent};
use crate::init::DropSetup;
use crate::log::LogSink;
use crate::policy::{Levels, RefinementPolicy};
use crate::scheduler::{RunSummary, Scheduler};
use crate::solver::Solver;

// ── State ──────────────────────────────────────────────────────────

/// How a run ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    /// The end time was reached.
    Success,
    /// Configuration or a step failed.
    Failure,
}

/// Lifecycle state of a [`SimulationController`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ControllerState {
    /// No parameters yet.
    Uninitialized,
    /// Parameters parsed and validated.
    Configured,
    /// Inside [`SimulationController::run`].
    Running,
    /// Finished; no further transitions.
    Terminated(Outcome),
}

/// A finished run: the final domain and the scheduler summary.
#[derive(Debug)]
pub struct FinishedRun<D> {
    /// Domain state at the end time.
    pub domain: D,
    /// Clock and step counts.
    pub summary: RunSummary,
}

// ── SimulationController ───────────────────────────────────────────

/// Configures and runs one drop-impact simulation.
#[derive(Debug)]
pub struct SimulationController {
    state: ControllerState,
    params: Option<SimulationParams>,
    fields: FlowFields,
}

impl Default for SimulationController {
    fn default() -> Self {
        Self::new()
    }
}

impl SimulationController {
    /// A controller in the `Uninitialized` state.
    pub fn new() -> Self {
        Self {
            state: ControllerState::Uninitialized,
            params: None,
            fields: FlowFields::STANDARD,
        }
    }

    /// Current lifecycle state.
    pub fn state(&self) -> ControllerState {
        self.state
    }

    /// Validated parameters, once configured.
    pub fn params(&self) -> Option<&SimulationParams> {
        self.params.as_ref()
    }

    fn require(&self, operation: &'static str, state: ControllerState) -> Result<(), ControllerError> {
        if self.state == state {
            Ok(())
        } else {
            Err(ControllerError::InvalidState {
                operation,
                state: self.state,
            })
        }
    }

    fn fail<T>(&mut self, err: ControllerError) -> Result<T, ControllerError> {
        self.state = ControllerState::Terminated(Outcome::Failure);
        Err(err)
    }

    /// Parse `source` with its parser and validate the result.
    pub fn configure(&mut self, source: &ParamSource) -> Result<&SimulationParams, ControllerError> {
        self.require("configure", ControllerState::Uninitialized)?;
        match source.parse() {
            Ok((params, warnings)) => self.configure_params(params, warnings),
            Err(e) => self.fail(e.into()),
        }
    }

    /// Validate already-parsed `params`, surfacing `warnings` first.
    pub fn configure_params(
        &mut self,
        params: SimulationParams,
        warnings: Vec<ParamWarning>,
    ) -> Result<&SimulationParams, ControllerError> {
        self.require("configure", ControllerState::Uninitialized)?;
        for w in warnings.iter().chain(&advisories(&params)) {
            tracing::warn!("{w}");
        }
        let violations = validate(&params);
        if !violations.is_empty() {
            return self.fail(ControllerError::Validation(violations));
        }
        self.state = ControllerState::Configured;
        Ok(&*self.params.insert(params))
    }

    /// Run the configured simulation with `solver` on a fresh `D`.
    pub fn run<D, S>(&mut self, solver: &mut S) -> Result<FinishedRun<D>, ControllerError>
    where
        D: Domain,
        S: Solver<D> + ?Sized,
    {
        self.require("run", ControllerState::Configured)?;
        let Some(params) = self.params.clone() else {
            return self.fail(ControllerError::InvalidState {
                operation: "run",
                state: self.state,
            });
        };
        self.state = ControllerState::Running;
        match self.execute(&params, solver) {
            Ok(run) => {
                self.state = ControllerState::Terminated(Outcome::Success);
                tracing::info!(
                    "run finished at t={} after {} steps",
                    run.summary.clock.time,
                    run.summary.steps
                );
                Ok(run)
            }
            Err(e) => self.fail(e),
        }
    }

    fn execute<D, S>(
        &self,
        p: &SimulationParams,
        solver: &mut S,
    ) -> Result<FinishedRun<D>, ControllerError>
    where
        D: Domain,
        S: Solver<D> + ?Sized,
    {
        let levels = Levels::from_params(p)?;
        let mut domain = D::establish(&DomainSpec {
            extent: Extent {
                size: p.ldomain,
                x0: 0.0,
                y0: 0.0,
            },
            level: levels.init,
            fields: FlowFields::definitions(),
        })?;

        for dir in [p.output_dir.clone(), p.intermediate_dir()] {
            create_dir(&dir)?;
        }
        let log_path = p.log_path();
        let mut log = LogSink::open(&log_path, &log_header(p)).map_err(|e| {
            ControllerError::Resource {
                path: log_path.clone(),
                reason: e.to_string(),
            }
        })?;
        tracing::info!("log opened: '{}'", log_path.display());
        for line in render_summary(p).lines() {
            tracing::info!("{line}");
        }

        let schedule = ScheduleSpec::from_params(p);
        let mut scheduler: Scheduler<D> = Scheduler::new(schedule);
        let drop = DropSetup::new(p, levels.max);
        scheduler.register(Box::new(InitEvent::new(p, self.fields, drop)));
        scheduler.register(Box::new(AdaptEvent::new(RefinementPolicy::new(
            p,
            self.fields,
            levels,
        ))));
        scheduler.register(Box::new(StatisticsEvent::new(DiagnosticsRecorder::new(
            self.fields,
            Densities::from_params(p),
            schedule,
        ))));
        scheduler.register(Box::new(CheckpointEvent::new(p, schedule)));
        scheduler.register(Box::new(CleanupEvent));

        let summary = scheduler.run(&mut domain, solver, &mut log, Clock::start())?;
        Ok(FinishedRun { domain, summary })
    }
}

fn create_dir(dir: &Path) -> Result<(), ControllerError> {
    fs::create_dir_all(dir).map_err(|e| ControllerError::Resource {
        path: dir.to_path_buf(),
        reason: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use droplet_grid::QuadGrid;
    use droplet_test_utils::fixtures::quick_run_params;

    use crate::solver::FrozenFlow;

    #[test]
    fn starts_uninitialized() {
        let c = SimulationController::new();
        assert_eq!(c.state(), ControllerState::Uninitialized);
        assert!(c.params().is_none());
    }

    #[test]
    fn run_before_configure_is_rejected() {
        let mut c = SimulationController::new();
        let err = c.run::<QuadGrid, _>(&mut FrozenFlow::default()).unwrap_err();
        assert!(matches!(
            err,
            ControllerError::InvalidState {
                operation: "run",
                state: ControllerState::Uninitialized
            }
        ));
    }

    #[test]
    fn invalid_parameters_terminate_with_failure() {
        let dir = tempfile::tempdir().unwrap();
        let mut c = SimulationController::new();
        let params = SimulationParams {
            ldomain: 1.5,
            ..quick_run_params(dir.path())
        };
        let err = c.configure_params(params, Vec::new()).unwrap_err();
        assert!(matches!(err, ControllerError::Validation(ref v) if v.len() == 1));
        assert_eq!(c.state(), ControllerState::Terminated(Outcome::Failure));
        assert!(c.configure_params(SimulationParams::default(), Vec::new()).is_err());
    }

    #[test]
    fn unreadable_file_is_a_config_failure() {
        let dir = tempfile::tempdir().unwrap();
        let mut c = SimulationController::new();
        let err = c
            .configure(&ParamSource::File(dir.path().join("missing.params")))
            .unwrap_err();
        assert!(matches!(err, ControllerError::Config(_)));
        assert_eq!(c.state(), ControllerState::Terminated(Outcome::Failure));
    }

    #[test]
    fn configure_twice_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let mut c = SimulationController::new();
        c.configure_params(quick_run_params(dir.path()), Vec::new())
            .unwrap();
        assert_eq!(c.state(), ControllerState::Configured);
        let err = c
            .configure_params(quick_run_params(dir.path()), Vec::new())
            .unwrap_err();
        assert!(matches!(err, ControllerError::InvalidState { .. }));
        assert_eq!(c.state(), ControllerState::Configured);
    }
}
