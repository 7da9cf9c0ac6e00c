//! hf-results: time series, summary statistics, and the canonical result
//! schema of a run.

pub mod aggregate;
pub mod stats;
pub mod store;
pub mod types;

pub use aggregate::Aggregator;
pub use store::{load_json, save_json};
pub use types::*;

pub type ResultsResult<T> = Result<T, ResultsError>;

#[derive(thiserror::Error, Debug)]
pub enum ResultsError {
    #[error("Series {series} for {id} has {found} of {expected} values")]
    Incomplete {
        series: &'static str,
        id: String,
        expected: usize,
        found: usize,
    },

    #[error("Series {series} for {id} is not finite at step {step}")]
    NonFinite {
        series: &'static str,
        id: String,
        step: usize,
    },

    #[error("No time steps to aggregate")]
    Empty,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
