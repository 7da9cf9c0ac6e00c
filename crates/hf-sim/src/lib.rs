//! Extended-period simulation for water networks.
//!
//! Provides:
//! - a controller stepping a steady solver through time
//! - demand multipliers from an hourly pattern
//! - tank level updates by mass balance between steps
//! - cooperative cancellation between steps

pub mod cancel;
pub mod controller;
pub mod error;
pub mod model;
pub mod tanks;

pub use cancel::CancelToken;
pub use controller::{
    Controller, ControllerEvent, RunPhase, SimRecord, StepRecord, run_extended_period,
};
pub use error::{SimError, SimResult};
pub use model::{GradientSolver, StepSolver};
pub use tanks::{TankLevels, TankStep};
