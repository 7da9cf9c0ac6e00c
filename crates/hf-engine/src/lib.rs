//! Hydraulic engines behind one interface.
//!
//! Provides:
//! - [`HydraulicEngine`], the strategy each solve path implements
//! - [`ExternalEngine`], which runs an EPANET-compatible executable on the
//!   written network description and parses its text report
//! - [`InternalEngine`], which drives the built-in gradient solver through
//!   the extended-period controller
//!
//! An external failure of any kind is reported as
//! [`EngineError::Unavailable`], which callers treat as a signal to fall back.

pub mod engine;
pub mod error;
pub mod external;
pub mod internal;
pub mod report;
pub mod selection;

pub use engine::{HydraulicEngine, ProgressFn};
pub use error::{EngineError, EngineResult};
pub use external::{EPANET_ENV_VAR, ExternalEngine, ExternalEngineConfig};
pub use internal::InternalEngine;
pub use report::{ReportError, parse_report};
pub use selection::EngineSelection;
