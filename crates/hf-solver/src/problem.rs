//! Problem definition for a single steady-state solve.

use hf_components::{HeadLossLaw, NodeKind};
use hf_core::units::Length;
use hf_core::{LinkId, NodeId};
use hf_graph::{IndexMap, reachable_from};
use hf_network::Network;

use crate::error::{SolverError, SolverResult};

/// Boundary conditions for one time instant.
#[derive(Debug, Clone, PartialEq)]
pub struct Conditions {
    /// Multiplier applied to every junction's base demand
    pub demand_multiplier: f64,
    /// Current tank level by node slot; `None` uses the tank's initial level
    pub tank_levels: Vec<Option<Length>>,
}

impl Conditions {
    /// Base demands and initial tank levels.
    pub fn initial(network: &Network) -> Self {
        Self {
            demand_multiplier: 1.0,
            tank_levels: vec![None; network.node_count()],
        }
    }

    pub fn with_multiplier(mut self, multiplier: f64) -> Self {
        self.demand_multiplier = multiplier;
        self
    }

    pub fn set_tank_level(&mut self, node: NodeId, level: Length) {
        if let Some(slot) = self.tank_levels.get_mut(node.slot()) {
            *slot = Some(level);
        }
    }
}

/// A network paired with the conditions of one instant, reduced to the
/// quantities the gradient iteration works with.
///
/// Unknown heads belong to active junctions; reservoirs and tanks supply
/// fixed heads.
#[derive(Debug)]
pub struct HydraulicProblem<'a> {
    pub network: &'a Network,
    /// Active junctions, indexed `0..n`
    pub unknowns: IndexMap,
    /// Instantaneous demand (m³/s) per unknown index
    pub demands: Vec<f64>,
    /// Fixed head (m) by node slot, for active reservoirs and tanks
    pub fixed_heads: Vec<Option<f64>>,
}

impl<'a> HydraulicProblem<'a> {
    pub fn new(network: &'a Network, conditions: &Conditions) -> SolverResult<Self> {
        if !conditions.demand_multiplier.is_finite() {
            return Err(SolverError::ProblemSetup {
                what: format!("demand multiplier {}", conditions.demand_multiplier),
            });
        }
        let graph = network.graph();
        let is_junction = |id: NodeId| {
            network.is_active(id) && matches!(network.node_kind(id), Some(NodeKind::Junction(_)))
        };
        let unknowns = IndexMap::for_nodes(graph, is_junction);

        let mut demands = Vec::with_capacity(unknowns.len());
        for &id in unknowns.node_ids() {
            let base = network
                .node_kind(id)
                .and_then(NodeKind::base_demand)
                .map(|q| q.value)
                .unwrap_or(0.0);
            demands.push(base * conditions.demand_multiplier);
        }

        let mut fixed_heads = vec![None; network.node_count()];
        for (node, kind) in network.active_nodes() {
            let level = conditions.tank_levels.get(node.id.slot()).copied().flatten();
            fixed_heads[node.id.slot()] = kind.fixed_head(level).map(|h| h.value);
        }

        let problem = Self {
            network,
            unknowns,
            demands,
            fixed_heads,
        };
        problem.check_connectivity()?;
        Ok(problem)
    }

    /// Every active junction must reach a fixed-head node through open links.
    fn check_connectivity(&self) -> SolverResult<()> {
        let graph = self.network.graph();
        let sources = graph
            .nodes()
            .iter()
            .map(|n| n.id)
            .filter(|id| self.fixed_heads[id.slot()].is_some());
        let reached = reachable_from(graph, sources, |link| !self.is_closed(link));

        let orphaned: Vec<String> = self
            .unknowns
            .node_ids()
            .iter()
            .filter(|id| !reached[id.slot()])
            .filter_map(|id| self.network.node_name(*id).map(str::to_string))
            .collect();
        if orphaned.is_empty() {
            Ok(())
        } else {
            Err(SolverError::Unsolvable { orphaned })
        }
    }

    pub fn is_closed(&self, link: LinkId) -> bool {
        self.network
            .link_kind(link)
            .is_some_and(|k| k.is_closed())
    }

    pub fn num_unknowns(&self) -> usize {
        self.unknowns.len()
    }
}
