//! Error types for extended-period runs.

use hf_solver::SolverError;
use thiserror::Error;

/// Errors that abort an extended-period run. No partial series survive them.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SimError {
    #[error("Invalid argument: {what}")]
    InvalidArg { what: String },

    #[error("Step {step} failed: {source}")]
    StepFailed {
        step: usize,
        #[source]
        source: SolverError,
    },

    #[error("Run cancelled before step {step}")]
    Cancelled { step: usize },
}

pub type SimResult<T> = Result<T, SimError>;

impl SimError {
    /// Step index the error is attached to, if any.
    pub fn step(&self) -> Option<usize> {
        match self {
            SimError::StepFailed { step, .. } | SimError::Cancelled { step } => Some(*step),
            SimError::InvalidArg { .. } => None,
        }
    }
}

impl From<hf_network::ValidationError> for SimError {
    fn from(e: hf_network::ValidationError) -> Self {
        SimError::InvalidArg {
            what: e.to_string(),
        }
    }
}
