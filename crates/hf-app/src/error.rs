//! Error types for the hf-app service layer.

use std::path::PathBuf;

use hf_engine::EngineError;
use hf_network::{NetworkError, ValidationError};
use hf_results::ResultsError;
use hf_sim::SimError;
use hf_solver::SolverError;

/// Application error type that wraps errors from the backend crates and
/// reports the kind, step, and identifiers of a failed action.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Failed to read network file {path}: {source}")]
    NetworkFileRead {
        path: PathBuf,
        source: NetworkError,
    },

    #[error("Failed to write network file {path}: {source}")]
    NetworkFileWrite {
        path: PathBuf,
        source: NetworkError,
    },

    #[error("Network validation failed: {0}")]
    Validation(ValidationError),

    #[error("Network error: {0}")]
    Network(NetworkError),

    #[error("Simulation failed: {0}")]
    Simulation(SimError),

    #[error("Engine unavailable: {reason}")]
    EngineUnavailable { reason: String },

    #[error("Run cancelled")]
    Cancelled { step: Option<usize> },

    #[error("Results error: {0}")]
    Results(#[from] ResultsError),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for hf-app operations.
pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    /// Stable kind name for reporting.
    pub fn kind(&self) -> &'static str {
        match self {
            AppError::NetworkFileRead { source, .. } | AppError::NetworkFileWrite { source, .. } => {
                match source {
                    NetworkError::Validation(_) => "validation",
                    NetworkError::Parse { .. } => "parse",
                    _ => "io",
                }
            }
            AppError::Validation(_) => "validation",
            AppError::Network(NetworkError::Parse { .. }) => "parse",
            AppError::Network(_) => "network",
            AppError::Simulation(e) => match e {
                SimError::StepFailed { source, .. } => solver_kind(source),
                SimError::Cancelled { .. } => "cancelled",
                SimError::InvalidArg { .. } => "invalid_input",
            },
            AppError::EngineUnavailable { .. } => "engine_unavailable",
            AppError::Cancelled { .. } => "cancelled",
            AppError::Results(_) => "results",
            AppError::InvalidInput(_) => "invalid_input",
            AppError::Io(_) => "io",
        }
    }

    /// Time step the failure happened at, if it happened during a run.
    pub fn step(&self) -> Option<usize> {
        match self {
            AppError::Simulation(e) => e.step(),
            AppError::Cancelled { step } => *step,
            _ => None,
        }
    }

    /// Identifiers of the network elements the failure is about.
    pub fn offending_ids(&self) -> Vec<String> {
        match self {
            AppError::Validation(e)
            | AppError::Network(NetworkError::Validation(e))
            | AppError::NetworkFileRead {
                source: NetworkError::Validation(e),
                ..
            } => e.offending_ids(),
            AppError::Simulation(SimError::StepFailed { source, .. }) => {
                source.offending_ids().to_vec()
            }
            _ => Vec::new(),
        }
    }
}

fn solver_kind(e: &SolverError) -> &'static str {
    match e {
        SolverError::Convergence { .. } => "convergence",
        SolverError::Unsolvable { .. } => "unsolvable",
        _ => "solver",
    }
}

impl From<ValidationError> for AppError {
    fn from(err: ValidationError) -> Self {
        AppError::Validation(err)
    }
}

impl From<NetworkError> for AppError {
    fn from(err: NetworkError) -> Self {
        match err {
            NetworkError::Validation(e) => AppError::Validation(e),
            other => AppError::Network(other),
        }
    }
}

impl From<SimError> for AppError {
    fn from(err: SimError) -> Self {
        match err {
            SimError::Cancelled { step } => AppError::Cancelled { step: Some(step) },
            other => AppError::Simulation(other),
        }
    }
}

impl From<EngineError> for AppError {
    fn from(err: EngineError) -> Self {
        match err {
            EngineError::Unavailable { reason } => AppError::EngineUnavailable { reason },
            EngineError::Simulation(e) => e.into(),
            EngineError::Results(e) => AppError::Results(e),
            EngineError::Cancelled => AppError::Cancelled { step: None },
        }
    }
}
