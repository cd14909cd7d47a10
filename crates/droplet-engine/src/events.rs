//! The events of a drop-impact run.
//!
//! Registered in this order: [`InitEvent`], [`AdaptEvent`],
//! [`StatisticsEvent`], [`CheckpointEvent`], [`CleanupEvent`].

use std::path::PathBuf;

use droplet_core::{fmt_g, Domain, FlowFields};
use droplet_params::{ScheduleSpec, SimulationParams};

use crate::diagnostics::{log_header, DiagnosticsRecorder};
use crate::error::StepError;
use crate::init::{initialize_drop, DropSetup};
use crate::policy::RefinementPolicy;
use crate::scheduler::{Event, EventContext, Trigger};

/// Path of the archival snapshot taken at time `t`.
pub fn archive_path(intermediate: &std::path::Path, t: f64) -> PathBuf {
    intermediate.join(format!("snapshot-{t:.4}"))
}

// ── Initialization ─────────────────────────────────────────────────

/// Restore from the restart snapshot, or set up a fresh drop.
///
/// A fresh start truncates the statistics log and rewrites its header.
#[derive(Clone, Debug)]
pub struct InitEvent {
    restart: PathBuf,
    header: String,
    fields: FlowFields,
    drop: DropSetup,
}

impl InitEvent {
    /// Initialization for `p`, refining the drop up to `drop.max_level`.
    pub fn new(p: &SimulationParams, fields: FlowFields, drop: DropSetup) -> Self {
        Self {
            restart: p.restart_path(),
            header: log_header(p),
            fields,
            drop,
        }
    }
}

impl<D: Domain> Event<D> for InitEvent {
    fn name(&self) -> &'static str {
        "init"
    }

    fn trigger(&self) -> Trigger {
        Trigger::Start
    }

    fn fire(&mut self, ctx: &mut EventContext<'_, D>) -> Result<(), StepError> {
        let restored = ctx
            .domain
            .restore(&self.restart)
            .map_err(|e| StepError::engine("init", e))?;
        if let Some(clock) = restored {
            *ctx.clock = clock;
            tracing::info!(
                "restored '{}' at t={} (i={})",
                self.restart.display(),
                fmt_g(clock.time),
                clock.iteration
            );
            return Ok(());
        }

        ctx.log
            .reset(&self.header)
            .map_err(|e| StepError::io("init", e))?;
        let drop = self.drop;
        let split = ctx
            .domain
            .refine(&|c| drop.needs_refinement(c))
            .map_err(|e| StepError::engine("init", e))?;
        initialize_drop(&mut *ctx.domain, self.fields, &drop);
        tracing::info!(
            "fresh start: {split} cells refined around the drop, {} active",
            ctx.domain.active_cells().len()
        );
        Ok(())
    }
}

// ── Adaptation ─────────────────────────────────────────────────────

/// Apply the [`RefinementPolicy`] every step.
#[derive(Clone, Copy, Debug)]
pub struct AdaptEvent {
    policy: RefinementPolicy,
}

impl AdaptEvent {
    /// Adaptation by `policy`.
    pub fn new(policy: RefinementPolicy) -> Self {
        Self { policy }
    }
}

impl<D: Domain> Event<D> for AdaptEvent {
    fn name(&self) -> &'static str {
        "adapt"
    }

    fn trigger(&self) -> Trigger {
        Trigger::EveryIteration
    }

    fn fire(&mut self, ctx: &mut EventContext<'_, D>) -> Result<(), StepError> {
        let report = self
            .policy
            .apply(&mut *ctx.domain)
            .map_err(|e| StepError::engine("adapt", e))?;
        tracing::debug!(
            iteration = ctx.clock.iteration,
            refined = report.refined,
            coarsened = report.coarsened,
            unrefined = report.unrefined,
            "mesh adapted"
        );
        Ok(())
    }
}

// ── Statistics ─────────────────────────────────────────────────────

/// Append a kinetic-energy row on sampled iterations.
#[derive(Clone, Copy, Debug)]
pub struct StatisticsEvent {
    recorder: DiagnosticsRecorder,
}

impl StatisticsEvent {
    /// Statistics through `recorder`.
    pub fn new(recorder: DiagnosticsRecorder) -> Self {
        Self { recorder }
    }
}

impl<D: Domain> Event<D> for StatisticsEvent {
    fn name(&self) -> &'static str {
        "statistics"
    }

    fn trigger(&self) -> Trigger {
        Trigger::EveryIteration
    }

    fn fire(&mut self, ctx: &mut EventContext<'_, D>) -> Result<(), StepError> {
        self.recorder
            .record(ctx.log, &*ctx.domain, *ctx.clock, ctx.dt)
            .map_err(|e| StepError::io("statistics", e))?;
        Ok(())
    }
}

// ── Checkpoint ─────────────────────────────────────────────────────

/// Write the restart snapshot and an archival copy every `tsnap`.
#[derive(Clone, Debug)]
pub struct CheckpointEvent {
    restart: PathBuf,
    intermediate: PathBuf,
    period: f64,
    end: f64,
}

impl CheckpointEvent {
    /// Checkpoints of `p` on `schedule`.
    pub fn new(p: &SimulationParams, schedule: ScheduleSpec) -> Self {
        Self {
            restart: p.restart_path(),
            intermediate: p.intermediate_dir(),
            period: schedule.tsnap,
            end: schedule.tmax,
        }
    }
}

impl<D: Domain> Event<D> for CheckpointEvent {
    fn name(&self) -> &'static str {
        "checkpoint"
    }

    fn trigger(&self) -> Trigger {
        Trigger::Periodic {
            period: self.period,
            end: self.end,
        }
    }

    fn fire(&mut self, ctx: &mut EventContext<'_, D>) -> Result<(), StepError> {
        let clock = *ctx.clock;
        let archive = archive_path(&self.intermediate, clock.time);
        for path in [&self.restart, &archive] {
            ctx.domain
                .dump(path, clock)
                .map_err(|e| StepError::engine("checkpoint", e))?;
        }
        tracing::info!("snapshot saved: '{}'", archive.display());
        Ok(())
    }
}

// ── Cleanup ────────────────────────────────────────────────────────

/// Close the statistics log once the end time is reached.
#[derive(Clone, Copy, Debug, Default)]
pub struct CleanupEvent;

impl<D: Domain> Event<D> for CleanupEvent {
    fn name(&self) -> &'static str {
        "cleanup"
    }

    fn trigger(&self) -> Trigger {
        Trigger::End
    }

    fn fire(&mut self, ctx: &mut EventContext<'_, D>) -> Result<(), StepError> {
        if ctx
            .log
            .close()
            .map_err(|e| StepError::io("cleanup", e))?
        {
            tracing::info!("log closed: '{}'", ctx.log.path().display());
        }
        Ok(())
    }
}
