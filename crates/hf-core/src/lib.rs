//! hf-core: stable foundation for hydroflow.
//!
//! Contains:
//! - units (uom SI types + constructors for hydraulic quantities)
//! - numeric (Real + finiteness checks)
//! - ids (stable compact IDs for graph/model objects)
//! - error (shared error types)
//! - timing (wall-clock timer for run summaries)

pub mod error;
pub mod ids;
pub mod numeric;
pub mod timing;
pub mod units;

// Re-exports: nice ergonomics for downstream crates
pub use error::{HfError, HfResult};
pub use ids::*;
pub use numeric::*;
pub use units::*;
