use hf_results::ResultsError;
use hf_sim::SimError;

pub type EngineResult<T> = Result<T, EngineError>;

#[derive(thiserror::Error, Debug)]
pub enum EngineError {
    /// The engine could not produce results; another engine may.
    #[error("Engine unavailable: {reason}")]
    Unavailable { reason: String },

    #[error(transparent)]
    Simulation(#[from] SimError),

    #[error(transparent)]
    Results(#[from] ResultsError),

    #[error("Run cancelled")]
    Cancelled,
}

impl EngineError {
    pub(crate) fn unavailable(reason: impl Into<String>) -> Self {
        Self::Unavailable {
            reason: reason.into(),
        }
    }

    pub fn is_unavailable(&self) -> bool {
        matches!(self, Self::Unavailable { .. })
    }
}
