//! Starting flows for the gradient iteration.

use hf_components::HeadLossLaw;

use crate::config::SolverConfig;
use crate::problem::HydraulicProblem;
use crate::solution::HydraulicSolution;

/// Cold-start flow for links without a cross-section (pumps), m³/s.
const DEFAULT_INITIAL_FLOW: f64 = 0.01;

/// How the iteration obtains its first flow estimate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InitializationStrategy {
    /// Every open link starts at a nominal velocity in its flow direction.
    #[default]
    NominalVelocity,
    /// Flows from a previous solution of the same network.
    WarmStart,
}

impl InitializationStrategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            InitializationStrategy::NominalVelocity => "NominalVelocity",
            InitializationStrategy::WarmStart => "WarmStart",
        }
    }
}

/// Initial flow per link slot, and the strategy that produced it.
///
/// A previous solution is only used when it covers the same links.
pub(crate) fn initial_flows(
    problem: &HydraulicProblem<'_>,
    config: &SolverConfig,
    previous: Option<&HydraulicSolution>,
) -> (Vec<f64>, InitializationStrategy) {
    let link_count = problem.network.link_count();
    if let Some(prev) = previous.filter(|p| p.flows.len() == link_count) {
        let flows = prev.flows.iter().map(|q| q.value).collect();
        return (flows, InitializationStrategy::WarmStart);
    }

    let flows = problem
        .network
        .links()
        .map(|(_, kind)| {
            if kind.is_closed() {
                0.0
            } else {
                kind.flow_area()
                    .map(|a| config.initial_velocity * a.value)
                    .unwrap_or(DEFAULT_INITIAL_FLOW)
            }
        })
        .collect();
    (flows, InitializationStrategy::NominalVelocity)
}
