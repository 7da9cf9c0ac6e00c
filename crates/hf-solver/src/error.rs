//! Error types for solver operations.

use thiserror::Error;

/// Errors that can occur during a single hydraulic solve.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SolverError {
    #[error("No convergence after {iterations} iterations (max flow change {residual:.3e} m³/s)")]
    Convergence { iterations: usize, residual: f64 },

    #[error("Nodes with no path to a reservoir or tank: {}", orphaned.join(", "))]
    Unsolvable { orphaned: Vec<String> },

    #[error("Singular head matrix at iteration {iteration}")]
    Singular { iteration: usize },

    #[error("Non-finite value in {what} at iteration {iteration}")]
    NonFinite { what: &'static str, iteration: usize },

    #[error("Problem setup error: {what}")]
    ProblemSetup { what: String },

    #[error("Graph error: {0}")]
    Graph(#[from] hf_graph::GraphError),
}

pub type SolverResult<T> = Result<T, SolverError>;

impl SolverError {
    /// Identifiers of the components the error is about.
    pub fn offending_ids(&self) -> &[String] {
        match self {
            SolverError::Unsolvable { orphaned } => orphaned,
            _ => &[],
        }
    }
}
