//! Canonical result schema.

use std::collections::BTreeMap;

use hf_components::TankStatus;
use serde::{Deserialize, Serialize};

/// One series per element id, each with one value per time step.
pub type SeriesMap<T = f64> = BTreeMap<String, Vec<T>>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunResults {
    /// Which engine produced the values
    pub engine: String,
    /// Step labels, `H:MM`
    pub time_steps: Vec<String>,
    pub nodes: NodeResults,
    pub links: LinkResults,
    #[serde(default)]
    pub tanks: TankResults,
    pub stats: RunStats,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NodeResults {
    /// Head minus elevation (m), junctions and tanks
    pub pressure: SeriesMap,
    /// Hydraulic head (m), every active node
    #[serde(default)]
    pub head: SeriesMap,
    /// Instantaneous demand (m³/s), junctions
    #[serde(default)]
    pub demand: SeriesMap,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LinkResults {
    /// Signed flow (m³/s), positive from start to end node
    pub flow: SeriesMap,
    /// |flow| / cross-section (m/s); zero for links without one
    pub velocity: SeriesMap,
    /// Head drop start to end (m)
    #[serde(default)]
    pub headloss: SeriesMap,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TankResults {
    /// Level above the tank bottom (m) during each step
    pub level: SeriesMap,
    /// Fill state after each step's update
    pub status: SeriesMap<TankStatus>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Stat {
    pub min: f64,
    pub avg: f64,
    pub max: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RunStats {
    pub pressure: Stat,
    /// Over absolute flow values
    pub flow: Stat,
    pub velocity: Stat,
    pub duration_hours: u32,
}
