//! Steady-state hydraulic solver for water distribution networks.
//!
//! Unknowns are junction heads and link flows. Reservoir and tank heads are
//! fixed for the duration of a solve; junction demands are base demand times
//! the current multiplier. Pipes follow Hazen-Williams, so the system is
//! nonlinear and is solved with the gradient method (see [`solve`]).

pub mod config;
pub mod error;
pub mod initialization;
mod linear;
pub mod problem;
pub mod solution;
pub mod solve;

pub use config::SolverConfig;
pub use error::{SolverError, SolverResult};
pub use initialization::InitializationStrategy;
pub use problem::{Conditions, HydraulicProblem};
pub use solution::HydraulicSolution;
pub use solve::{IterationEvent, solve, solve_with_progress};
