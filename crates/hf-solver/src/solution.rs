//! Solution of one steady-state solve.

use hf_core::units::{Flow, Length};
use hf_core::{LinkId, NodeId};
use hf_graph::fundamental_loops;
use hf_network::Network;

use crate::initialization::InitializationStrategy;

#[derive(Clone, Debug)]
pub struct HydraulicSolution {
    /// Head by node slot. Inactive nodes carry their elevation.
    pub heads: Vec<Length>,
    /// Signed flow by link slot, positive from start to end node
    pub flows: Vec<Flow>,
    /// Head drop start -> end by link slot, evaluated at the final flow
    pub headlosses: Vec<Length>,
    /// Instantaneous junction demand by node slot (zero elsewhere)
    pub demands: Vec<Flow>,
    pub iterations: usize,
    /// Largest flow change of the last iteration (m³/s)
    pub residual: f64,
    pub initialization: InitializationStrategy,
}

impl HydraulicSolution {
    pub fn head(&self, node: NodeId) -> Option<Length> {
        self.heads.get(node.slot()).copied()
    }

    pub fn flow(&self, link: LinkId) -> Option<Flow> {
        self.flows.get(link.slot()).copied()
    }

    /// Sum of signed link flows into a node (m³/s).
    pub fn net_inflow(&self, network: &Network, node: NodeId) -> f64 {
        network
            .graph()
            .incident(node)
            .iter()
            .map(|inc| inc.kind.inflow_sign() * self.flows[inc.link.slot()].value)
            .sum()
    }

    /// Largest `|net inflow - demand|` over active junctions (m³/s).
    pub fn mass_balance_error(&self, network: &Network) -> f64 {
        network
            .active_nodes()
            .filter(|(_, kind)| !kind.is_fixed_head())
            .map(|(node, _)| {
                (self.net_inflow(network, node.id) - self.demands[node.id.slot()].value).abs()
            })
            .fold(0.0, f64::max)
    }

    /// Largest absolute signed head-loss sum around an independent loop of
    /// open links (m).
    pub fn loop_energy_error(&self, network: &Network) -> f64 {
        use hf_components::HeadLossLaw;
        let open = |link: LinkId| network.link_kind(link).is_some_and(|k| !k.is_closed());
        fundamental_loops(network.graph(), open)
            .iter()
            .map(|lp| {
                lp.iter()
                    .map(|e| e.sign * self.headlosses[e.link.slot()].value)
                    .sum::<f64>()
                    .abs()
            })
            .fold(0.0, f64::max)
    }

    /// Largest `|h(q) - (H_start - H_end)|` over links (m). Covers every
    /// path between fixed heads, not only closed loops.
    pub fn link_energy_error(&self, network: &Network) -> f64 {
        network
            .links()
            .map(|(link, _)| {
                let drop = self.heads[link.start().slot()].value
                    - self.heads[link.end().slot()].value;
                (self.headlosses[link.id.slot()].value - drop).abs()
            })
            .fold(0.0, f64::max)
    }
}
