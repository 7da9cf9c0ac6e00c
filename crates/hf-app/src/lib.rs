//! Shared application service layer for hydroflow.
//!
//! This crate gives front ends one entry point per user action: loading and
//! checking a network file, writing its description, and running an
//! extended-period simulation through the configured engines with fallback.

pub mod error;
pub mod network_service;
pub mod progress;
pub mod run_service;

pub use error::{AppError, AppResult};
pub use network_service::{
    build_description, load_network, save_network, summarize_network, validate_network,
};
pub use progress::{RunProgressEvent, RunStage, StepProgress};
pub use run_service::{
    EngineSettings, RunRequest, RunResponse, RunTimingSummary, engine_order, run,
    run_with_progress, save_results,
};
