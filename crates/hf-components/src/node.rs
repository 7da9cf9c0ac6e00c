//! Node variants.

use crate::tank::Tank;
use hf_core::units::{Flow, Length};

/// Demand node whose head is solved for.
#[derive(Debug, Clone, PartialEq)]
pub struct Junction {
    pub elevation: Length,
    /// Demand drawn at a pattern multiplier of 1.0
    pub base_demand: Flow,
}

/// Infinite source with a fixed hydraulic head.
#[derive(Debug, Clone, PartialEq)]
pub struct Reservoir {
    pub head: Length,
}

#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    Junction(Junction),
    Reservoir(Reservoir),
    Tank(Tank),
}

impl NodeKind {
    /// Ground (or tank bottom) elevation. Reservoirs report their head.
    pub fn elevation(&self) -> Length {
        match self {
            NodeKind::Junction(j) => j.elevation,
            NodeKind::Reservoir(r) => r.head,
            NodeKind::Tank(t) => t.elevation,
        }
    }

    /// Reservoirs and tanks fix the head within a single solve.
    pub fn is_fixed_head(&self) -> bool {
        !matches!(self, NodeKind::Junction(_))
    }

    /// Fixed head for the current solve, given the tank level if any.
    pub fn fixed_head(&self, tank_level: Option<Length>) -> Option<Length> {
        match self {
            NodeKind::Junction(_) => None,
            NodeKind::Reservoir(r) => Some(r.head),
            NodeKind::Tank(t) => Some(t.head_at(tank_level.unwrap_or(t.init_level))),
        }
    }

    pub fn base_demand(&self) -> Option<Flow> {
        match self {
            NodeKind::Junction(j) => Some(j.base_demand),
            _ => None,
        }
    }

    pub fn as_tank(&self) -> Option<&Tank> {
        match self {
            NodeKind::Tank(t) => Some(t),
            _ => None,
        }
    }

    /// Lower-case type tag used in results and logs.
    pub fn type_name(&self) -> &'static str {
        match self {
            NodeKind::Junction(_) => "junction",
            NodeKind::Reservoir(_) => "reservoir",
            NodeKind::Tank(_) => "tank",
        }
    }
}
