//! Solver configuration.

/// Iteration limits and convergence tolerances of the gradient solver.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolverConfig {
    /// Iteration cap; exceeding it is a convergence failure
    pub max_iterations: usize,
    /// Converged when the largest flow change falls below this (m³/s)
    pub flow_tolerance: f64,
    /// Or when the largest head change falls below this (m). Not used when
    /// a link joins two fixed-head nodes.
    pub head_tolerance: f64,
    /// Velocity used for the cold-start flow guess (m/s)
    pub initial_velocity: f64,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            max_iterations: 200,
            flow_tolerance: 1e-4,
            head_tolerance: 1e-3,
            initial_velocity: 0.3048,
        }
    }
}
