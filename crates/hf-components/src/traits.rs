//! Shared contract of link models.

use crate::common::HeadLoss;
use hf_core::units::{Area, Flow};

/// Head-loss law of a two-ended link.
///
/// Positive flow runs from the link's start node to its end node; the
/// returned head drop is `H_start - H_end` at that flow.
pub trait HeadLossLaw {
    /// Evaluate head drop and slope at a signed flow.
    fn headloss(&self, flow: Flow) -> HeadLoss;

    /// Flow cross-section used for velocity reporting, if the link has one.
    fn flow_area(&self) -> Option<Area> {
        None
    }

    /// Whether the link currently blocks flow.
    fn is_closed(&self) -> bool {
        false
    }
}
