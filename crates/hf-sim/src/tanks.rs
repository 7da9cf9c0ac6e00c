//! Tank level state carried between time steps.

use hf_components::{TankState, TankStatus};
use hf_core::NodeId;
use hf_core::units::{Length, Time};
use hf_network::Network;
use hf_solver::{Conditions, HydraulicSolution};
use tracing::warn;

/// One tank's level over a single step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TankStep {
    pub node: NodeId,
    /// Level during the solve (start of step)
    pub level: Length,
    /// Level after the mass-balance update
    pub next_level: Length,
    /// Fill state after the update
    pub status: TankStatus,
}

/// Current level of every active tank, by node slot.
#[derive(Debug, Clone)]
pub struct TankLevels {
    states: Vec<Option<TankState>>,
}

impl TankLevels {
    /// Every active tank at its initial level.
    pub fn initial(network: &Network) -> Self {
        let mut states = vec![None; network.node_count()];
        for (id, tank) in network.tanks() {
            states[id.slot()] = Some(tank.initial_state());
        }
        Self { states }
    }

    pub fn state(&self, node: NodeId) -> Option<TankState> {
        self.states.get(node.slot()).copied().flatten()
    }

    pub fn iter(&self) -> impl Iterator<Item = (NodeId, TankState)> + '_ {
        self.states
            .iter()
            .enumerate()
            .filter_map(|(i, s)| s.map(|s| (NodeId::from_index(i as u32), s)))
    }

    /// Write the current levels into solve conditions.
    pub fn apply_to(&self, conditions: &mut Conditions) {
        for (node, state) in self.iter() {
            conditions.set_tank_level(node, state.level);
        }
    }

    /// Advance every tank by its net inflow over `dt`.
    pub fn advance(
        &mut self,
        network: &Network,
        solution: &HydraulicSolution,
        dt: Time,
    ) -> Vec<TankStep> {
        let mut steps = Vec::new();
        for (node, tank) in network.tanks() {
            let Some(current) = self.state(node) else {
                continue;
            };
            let inflow = hf_core::units::m3ps(solution.net_inflow(network, node));
            let next = tank.advance(current.level, inflow, dt);
            if next.status != TankStatus::Normal && next.status != current.status {
                warn!(
                    tank = network.node_name(node).unwrap_or_default(),
                    status = %next.status,
                    level_m = next.level.value,
                    "tank level pinned at bound"
                );
            }
            self.states[node.slot()] = Some(next);
            steps.push(TankStep {
                node,
                level: current.level,
                next_level: next.level,
                status: next.status,
            });
        }
        steps
    }
}
