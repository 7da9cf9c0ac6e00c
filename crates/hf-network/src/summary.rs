//! Network summary statistics.

use hf_components::{LinkKind, NodeKind};
use serde::{Deserialize, Serialize};

use crate::network::Network;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NetworkSummary {
    pub junctions: usize,
    pub reservoirs: usize,
    pub tanks: usize,
    pub pipes: usize,
    pub pumps: usize,
    pub valves: usize,
    pub total_pipe_length_m: f64,
    /// Mean pipe diameter (mm), 0 when there are no pipes
    pub mean_pipe_diameter_mm: f64,
    pub total_base_demand_m3s: f64,
}

impl NetworkSummary {
    /// Counts over active nodes and all links.
    pub fn of(network: &Network) -> Self {
        let mut s = Self::default();
        for (_, kind) in network.active_nodes() {
            match kind {
                NodeKind::Junction(j) => {
                    s.junctions += 1;
                    s.total_base_demand_m3s += j.base_demand.value;
                }
                NodeKind::Reservoir(_) => s.reservoirs += 1,
                NodeKind::Tank(_) => s.tanks += 1,
            }
        }
        let mut diameter_sum = 0.0;
        for (_, kind) in network.links() {
            match kind {
                LinkKind::Pipe(p) => {
                    s.pipes += 1;
                    s.total_pipe_length_m += p.length.value;
                    diameter_sum += p.diameter.value;
                }
                LinkKind::Pump(_) => s.pumps += 1,
                LinkKind::Valve(_) => s.valves += 1,
            }
        }
        if s.pipes > 0 {
            s.mean_pipe_diameter_mm = diameter_sum / s.pipes as f64 * 1000.0;
        }
        s
    }
}
