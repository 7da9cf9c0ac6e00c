//! hf-components: hydraulic element library for water distribution networks.
//!
//! Provides closed variant types for the two element categories:
//! - [`NodeKind`]: junctions (solved head), reservoirs (fixed head),
//!   tanks (head from a level that evolves between time steps)
//! - [`LinkKind`]: pipes (Hazen-Williams friction), pumps (fixed head gain),
//!   valves (status-dependent minor loss)
//!
//! Every link evaluates a [`HeadLoss`] (head drop start -> end and its
//! derivative with respect to flow) at a given signed flow. Solvers linearize
//! around that pair.
//!
//! # Example
//!
//! ```
//! use hf_components::{HeadLossLaw, Pipe};
//! use hf_core::units::{m, m3ps, mm};
//!
//! let pipe = Pipe::new(m(100.0), mm(200.0), 120.0).unwrap();
//! let hl = pipe.headloss(m3ps(0.1));
//! assert!(hl.head_m > 5.0 && hl.head_m < 6.0);
//! ```

pub mod common;
pub mod error;
pub mod link;
pub mod node;
pub mod pipe;
pub mod pump;
pub mod tank;
pub mod traits;
pub mod valve;

// Re-exports
pub use common::HeadLoss;
pub use error::{ComponentError, ComponentResult};
pub use link::LinkKind;
pub use node::{Junction, NodeKind, Reservoir};
pub use pipe::{LinkStatus, Pipe};
pub use pump::Pump;
pub use tank::{Tank, TankState, TankStatus};
pub use traits::HeadLossLaw;
pub use valve::{Valve, ValveStatus, ValveType};
