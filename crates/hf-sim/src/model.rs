//! The per-step solve seam.

use hf_network::Network;
use hf_solver::{Conditions, HydraulicSolution, SolverConfig, SolverResult};

/// Anything that can solve one time instant of a network.
///
/// Takes `&mut self` so implementations may keep statistics between steps.
pub trait StepSolver {
    fn solve_step(
        &mut self,
        network: &Network,
        conditions: &Conditions,
        previous: Option<&HydraulicSolution>,
    ) -> SolverResult<HydraulicSolution>;
}

/// The built-in gradient solver.
#[derive(Debug, Clone, Default)]
pub struct GradientSolver {
    pub config: SolverConfig,
    /// Total iterations spent over all steps so far
    pub total_iterations: usize,
}

impl GradientSolver {
    pub fn new(config: SolverConfig) -> Self {
        Self {
            config,
            total_iterations: 0,
        }
    }
}

impl StepSolver for GradientSolver {
    fn solve_step(
        &mut self,
        network: &Network,
        conditions: &Conditions,
        previous: Option<&HydraulicSolution>,
    ) -> SolverResult<HydraulicSolution> {
        let solution = hf_solver::solve(network, conditions, &self.config, previous)?;
        self.total_iterations += solution.iterations;
        Ok(solution)
    }
}
