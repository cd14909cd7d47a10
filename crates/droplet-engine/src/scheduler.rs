//! Event-driven time stepping.
//!
//! A [`Scheduler`] owns an ordered list of [`Event`]s and a frozen
//! [`ScheduleSpec`]. Each iteration it fires the events that are due at
//! the current clock, in registration order, then asks the solver for a
//! step. Steps are shortened so that the clock lands exactly on the next
//! periodic event time and on the end time.

use droplet_core::{Clock, Domain};
use droplet_params::ScheduleSpec;

use crate::error::StepError;
use crate::log::LogSink;
use crate::solver::Solver;

/// Relative tolerance when comparing the clock with event times.
const TIME_EPS: f64 = 1e-9;

/// When an event fires.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Trigger {
    /// Once, at the first iteration of the run.
    Start,
    /// At every iteration.
    EveryIteration,
    /// At `t = k * period` for every `k >= 0` with `t <= end`.
    Periodic {
        /// Interval between firings.
        period: f64,
        /// Last time at which the event may fire.
        end: f64,
    },
    /// Once, after the clock reaches the end time.
    End,
}

/// Mutable state lent to an event while it fires.
pub struct EventContext<'a, D> {
    /// The simulation domain.
    pub domain: &'a mut D,
    /// Scheduler clock; an event may replace it (restore).
    pub clock: &'a mut Clock,
    /// Size of the last completed step, zero before the first.
    pub dt: f64,
    /// The run's statistics log.
    pub log: &'a mut LogSink,
}

/// A callback run by the [`Scheduler`].
pub trait Event<D> {
    /// Name used in errors and logs.
    fn name(&self) -> &'static str;

    /// When the event fires.
    fn trigger(&self) -> Trigger;

    /// Run the event.
    fn fire(&mut self, ctx: &mut EventContext<'_, D>) -> Result<(), StepError>;
}

/// Outcome of a completed schedule.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RunSummary {
    /// Clock at the end of the run.
    pub clock: Clock,
    /// Solver steps taken in this run.
    pub steps: u64,
    /// Size of the last step.
    pub last_dt: f64,
}

/// Ordered events over a frozen schedule.
pub struct Scheduler<D> {
    spec: ScheduleSpec,
    events: Vec<Box<dyn Event<D>>>,
}

impl<D: Domain> Scheduler<D> {
    /// An empty scheduler for `spec`.
    pub fn new(spec: ScheduleSpec) -> Self {
        Self {
            spec,
            events: Vec::new(),
        }
    }

    /// Append `event`; events fire in registration order.
    pub fn register(&mut self, event: Box<dyn Event<D>>) {
        self.events.push(event);
    }

    /// Names of the registered events, in order.
    pub fn event_names(&self) -> Vec<&'static str> {
        self.events.iter().map(|e| e.name()).collect()
    }

    fn slack(&self) -> f64 {
        TIME_EPS * self.spec.tmax.abs().max(1.0)
    }

    fn is_due(&self, trigger: Trigger, clock: Clock, first: bool) -> bool {
        match trigger {
            Trigger::Start => first,
            Trigger::EveryIteration => true,
            Trigger::Periodic { period, end } => {
                let k = (clock.time / period).round();
                let at = k * period;
                k >= 0.0 && (clock.time - at).abs() <= self.slack() && at <= end + self.slack()
            }
            Trigger::End => false,
        }
    }

    /// Earliest periodic event time or end time strictly after `t`.
    fn next_stop(&self, t: f64) -> f64 {
        let slack = self.slack();
        self.events
            .iter()
            .filter_map(|e| match e.trigger() {
                Trigger::Periodic { period, end } => {
                    let k = ((t + slack) / period).floor() + 1.0;
                    let at = k * period;
                    (at <= end + slack).then_some(at)
                }
                _ => None,
            })
            .fold(self.spec.tmax, f64::min)
    }

    fn fire_due(
        &mut self,
        domain: &mut D,
        clock: &mut Clock,
        dt: f64,
        log: &mut LogSink,
        first: bool,
    ) -> Result<(), StepError> {
        for n in 0..self.events.len() {
            if !self.is_due(self.events[n].trigger(), *clock, first) {
                continue;
            }
            let mut ctx = EventContext {
                domain: &mut *domain,
                clock: &mut *clock,
                dt,
                log: &mut *log,
            };
            self.events[n].fire(&mut ctx)?;
        }
        Ok(())
    }

    /// Run from `start` until the end time.
    ///
    /// Any event or solver error stops the run immediately and is returned;
    /// end events then do not fire.
    pub fn run<S: Solver<D> + ?Sized>(
        &mut self,
        domain: &mut D,
        solver: &mut S,
        log: &mut LogSink,
        start: Clock,
    ) -> Result<RunSummary, StepError> {
        let mut clock = start;
        let mut dt = 0.0;
        let mut steps = 0;
        let mut first = true;
        loop {
            self.fire_due(domain, &mut clock, dt, log, first)?;
            first = false;
            if clock.time >= self.spec.tmax - self.slack() {
                break;
            }

            let stop = self.next_stop(clock.time);
            let proposed = solver.max_dt(domain);
            if !(proposed.is_finite() && proposed > 0.0) {
                return Err(StepError::solver(crate::solver::SolverError {
                    reason: format!("{} proposed step {proposed}", solver.name()),
                }));
            }
            // Split the gap to the next stop into equal steps. Rounding
            // noise in the gap must not add a step.
            let gap = stop - clock.time;
            let parts = ((gap - self.slack()) / proposed).ceil().max(1.0);
            let step = gap / parts;
            solver.advance(domain, step).map_err(StepError::solver)?;

            dt = step;
            steps += 1;
            clock.iteration += 1;
            let next = clock.time + step;
            clock.time = if (stop - next).abs() <= self.slack() {
                stop
            } else {
                next
            };
        }

        for n in 0..self.events.len() {
            if self.events[n].trigger() != Trigger::End {
                continue;
            }
            let mut ctx = EventContext {
                domain: &mut *domain,
                clock: &mut clock,
                dt,
                log: &mut *log,
            };
            self.events[n].fire(&mut ctx)?;
        }

        Ok(RunSummary {
            clock,
            steps,
            last_dt: dt,
        })
    }
}
