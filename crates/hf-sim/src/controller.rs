//! Extended-period controller: a strictly ordered loop of steady solves
//! linked by tank levels.

use hf_core::units::hours;
use hf_network::{DemandPattern, Network, RunOptions, clock_label};
use hf_solver::{Conditions, HydraulicSolution};
use tracing::{debug, info};

use crate::cancel::CancelToken;
use crate::error::{SimError, SimResult};
use crate::model::StepSolver;
use crate::tanks::{TankLevels, TankStep};

/// Where the controller is in its state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunPhase {
    Pending,
    Solving(usize),
    Updating(usize),
    Done,
}

/// Emitted on every phase transition.
#[derive(Debug, Clone, PartialEq)]
pub struct ControllerEvent {
    pub phase: RunPhase,
    pub total_steps: usize,
    /// Simulated time of the current step (h)
    pub sim_hours: f64,
    /// Solver iterations of the step just solved
    pub iterations: Option<usize>,
}

/// Everything produced by one step.
#[derive(Debug, Clone)]
pub struct StepRecord {
    pub step: usize,
    pub label: String,
    pub sim_hours: f64,
    pub demand_multiplier: f64,
    pub solution: HydraulicSolution,
    pub tanks: Vec<TankStep>,
}

/// Complete, ordered result of a run.
#[derive(Debug, Clone)]
pub struct SimRecord {
    pub duration_hours: u32,
    pub time_step_hours: f64,
    pub steps: Vec<StepRecord>,
}

impl SimRecord {
    pub fn labels(&self) -> Vec<String> {
        self.steps.iter().map(|s| s.label.clone()).collect()
    }
}

/// Drives a [`StepSolver`] across `round(duration / time_step)` steps.
///
/// The controller owns the tank levels for the length of the run.
pub struct Controller<'a, S: StepSolver> {
    network: &'a Network,
    options: RunOptions,
    solver: S,
    pattern: DemandPattern,
    cancel: CancelToken,
    phase: RunPhase,
}

impl<'a, S: StepSolver> Controller<'a, S> {
    pub fn new(network: &'a Network, options: RunOptions, solver: S) -> Self {
        Self {
            network,
            options,
            solver,
            pattern: DemandPattern::daily(),
            cancel: CancelToken::new(),
            phase: RunPhase::Pending,
        }
    }

    /// Replace the demand curve used when the options ask for one.
    pub fn with_pattern(mut self, pattern: DemandPattern) -> Self {
        self.pattern = pattern;
        self
    }

    pub fn with_cancel(mut self, cancel: CancelToken) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn phase(&self) -> RunPhase {
        self.phase
    }

    pub fn solver(&self) -> &S {
        &self.solver
    }

    pub fn into_solver(self) -> S {
        self.solver
    }

    /// Demand multiplier for step `t`.
    pub fn multiplier_at(&self, t: usize) -> f64 {
        if self.options.use_demand_pattern {
            self.pattern.multiplier_at(self.options.step_start_hours(t))
        } else {
            1.0
        }
    }

    pub fn run(&mut self) -> SimResult<SimRecord> {
        self.run_with_progress(|_| {})
    }

    /// Run all steps, reporting each phase transition.
    ///
    /// Any step failure aborts the run with the step index attached.
    pub fn run_with_progress(
        &mut self,
        mut on_event: impl FnMut(&ControllerEvent),
    ) -> SimResult<SimRecord> {
        if self.phase != RunPhase::Pending {
            return Err(SimError::InvalidArg {
                what: "controller has already run".to_string(),
            });
        }
        self.options.validate()?;

        let total_steps = self.options.step_count();
        let dt = hours(self.options.time_step.hours());
        let mut levels = TankLevels::initial(self.network);
        let mut steps: Vec<StepRecord> = Vec::with_capacity(total_steps);
        info!(
            steps = total_steps,
            time_step_h = self.options.time_step.hours(),
            pattern = self.options.use_demand_pattern,
            "extended-period run started"
        );

        for t in 0..total_steps {
            if self.cancel.is_cancelled() {
                info!(step = t, "run cancelled");
                return Err(SimError::Cancelled { step: t });
            }
            let sim_hours = self.options.step_start_hours(t);
            let multiplier = self.multiplier_at(t);

            self.phase = RunPhase::Solving(t);
            on_event(&ControllerEvent {
                phase: self.phase,
                total_steps,
                sim_hours,
                iterations: None,
            });

            let mut conditions = Conditions::initial(self.network).with_multiplier(multiplier);
            levels.apply_to(&mut conditions);
            let previous = steps.last().map(|s| &s.solution);
            let solution = self
                .solver
                .solve_step(self.network, &conditions, previous)
                .map_err(|source| SimError::StepFailed { step: t, source })?;

            self.phase = RunPhase::Updating(t);
            on_event(&ControllerEvent {
                phase: self.phase,
                total_steps,
                sim_hours,
                iterations: Some(solution.iterations),
            });
            let tanks = levels.advance(self.network, &solution, dt);
            debug!(
                step = t,
                multiplier,
                iterations = solution.iterations,
                "step solved"
            );

            steps.push(StepRecord {
                step: t,
                label: clock_label(sim_hours),
                sim_hours,
                demand_multiplier: multiplier,
                solution,
                tanks,
            });
        }

        self.phase = RunPhase::Done;
        on_event(&ControllerEvent {
            phase: self.phase,
            total_steps,
            sim_hours: f64::from(self.options.duration_hours),
            iterations: None,
        });
        info!(steps = steps.len(), "extended-period run finished");

        Ok(SimRecord {
            duration_hours: self.options.duration_hours,
            time_step_hours: self.options.time_step.hours(),
            steps,
        })
    }
}

/// Run with the default pattern and no external cancellation.
pub fn run_extended_period<S: StepSolver>(
    network: &Network,
    options: RunOptions,
    solver: S,
) -> SimResult<SimRecord> {
    Controller::new(network, options, solver).run()
}
