//! Gradient (Todini) iteration for heads and flows.
//!
//! Each iteration linearizes every link's head-loss law at the current flow,
//! `h(q) ≈ h0 + g (q - q0)`, which gives `q = q0 - h0/g + (Ha - Hb)/g`.
//! Substituting into the junction mass balances yields a symmetric system in
//! the unknown heads; flows are then recovered from the new heads.

use hf_components::HeadLossLaw;
use hf_core::units::{Flow, Length, m, m3ps};
use hf_network::Network;
use tracing::{debug, trace};

use crate::config::SolverConfig;
use crate::error::{SolverError, SolverResult};
use crate::initialization::{InitializationStrategy, initial_flows};
use crate::linear::HeadSystem;
use crate::problem::{Conditions, HydraulicProblem};
use crate::solution::HydraulicSolution;

/// Per-iteration summary handed to an observer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IterationEvent {
    pub iteration: usize,
    pub max_flow_change: f64,
    pub max_head_change: f64,
}

/// Solve a network for the given conditions.
///
/// # Arguments
/// * `network` - Validated topology
/// * `conditions` - Demand multiplier and tank levels of this instant
/// * `config` - Iteration cap and tolerances
/// * `previous` - Optional earlier solution used as the starting flows
pub fn solve(
    network: &Network,
    conditions: &Conditions,
    config: &SolverConfig,
    previous: Option<&HydraulicSolution>,
) -> SolverResult<HydraulicSolution> {
    solve_with_progress(network, conditions, config, previous, None)
}

pub fn solve_with_progress(
    network: &Network,
    conditions: &Conditions,
    config: &SolverConfig,
    previous: Option<&HydraulicSolution>,
    mut progress: Option<&mut dyn FnMut(IterationEvent)>,
) -> SolverResult<HydraulicSolution> {
    let problem = HydraulicProblem::new(network, conditions)?;
    let n = problem.num_unknowns();
    let (mut flows, strategy) = initial_flows(&problem, config, previous);

    // Node heads by slot: fixed heads are known, unknowns start at elevation.
    let mut heads: Vec<f64> = network
        .nodes()
        .map(|(node, kind)| {
            problem.fixed_heads[node.id.slot()].unwrap_or_else(|| kind.elevation().value)
        })
        .collect();

    let links: Vec<_> = network
        .links()
        .map(|(link, kind)| (link.start().slot(), link.end().slot(), kind))
        .collect();
    let unknown_of: Vec<Option<usize>> = network
        .graph()
        .nodes()
        .iter()
        .map(|node| problem.unknowns.index_of(node.id))
        .collect();

    let ends: Vec<_> = links
        .iter()
        .map(|&(start, end, _)| (unknown_of[start], unknown_of[end]))
        .collect();
    let mut system = HeadSystem::new(n, &ends);
    // A link between two fixed heads moves no unknown head, so settled
    // heads say nothing about its flow.
    let head_test = n > 0 && ends.iter().all(|&(a, b)| a.is_some() || b.is_some());

    let mut residual = f64::INFINITY;
    for iteration in 1..=config.max_iterations {
        system.clear();
        let mut b: Vec<f64> = problem.demands.iter().map(|d| -d).collect();
        let mut conductance = Vec::with_capacity(links.len());

        for (li, &(start, end, kind)) in links.iter().enumerate() {
            let q = flows[li];
            let hl = kind.headloss(m3ps(q));
            let p = 1.0 / hl.gradient;
            let y = q - p * hl.head_m;
            conductance.push((p, y));
            system.stamp(li, p);

            match ends[li] {
                (Some(i), Some(j)) => {
                    b[i] -= y;
                    b[j] += y;
                }
                (Some(i), None) => b[i] += p * heads[end] - y,
                (None, Some(j)) => b[j] += p * heads[start] + y,
                (None, None) => {}
            }
        }

        let mut max_head_change = 0.0_f64;
        if n > 0 {
            let x = system.solve(&b).ok_or(SolverError::Singular { iteration })?;
            for (idx, &node) in problem.unknowns.node_ids().iter().enumerate() {
                let h = x[idx];
                if !h.is_finite() {
                    return Err(SolverError::NonFinite {
                        what: "head",
                        iteration,
                    });
                }
                max_head_change = max_head_change.max((h - heads[node.slot()]).abs());
                heads[node.slot()] = h;
            }
        }

        let mut max_flow_change = 0.0_f64;
        for (li, &(start, end, _)) in links.iter().enumerate() {
            let (p, y) = conductance[li];
            let q_new = y + p * (heads[start] - heads[end]);
            if !q_new.is_finite() {
                return Err(SolverError::NonFinite {
                    what: "flow",
                    iteration,
                });
            }
            max_flow_change = max_flow_change.max((q_new - flows[li]).abs());
            flows[li] = q_new;
        }

        residual = max_flow_change;
        trace!(iteration, max_flow_change, max_head_change, "gradient iteration");
        if let Some(cb) = progress.as_deref_mut() {
            cb(IterationEvent {
                iteration,
                max_flow_change,
                max_head_change,
            });
        }

        let heads_settled = head_test && iteration > 1 && max_head_change < config.head_tolerance;
        if max_flow_change < config.flow_tolerance || heads_settled {
            debug!(
                iterations = iteration,
                residual,
                unknowns = n,
                init = strategy.as_str(),
                "hydraulic solve converged"
            );
            return Ok(finish(&problem, heads, flows, iteration, residual, strategy));
        }
    }

    Err(SolverError::Convergence {
        iterations: config.max_iterations,
        residual,
    })
}

fn finish(
    problem: &HydraulicProblem<'_>,
    heads: Vec<f64>,
    flows: Vec<f64>,
    iterations: usize,
    residual: f64,
    initialization: InitializationStrategy,
) -> HydraulicSolution {
    let network: &Network = problem.network;
    let headlosses: Vec<Length> = network
        .links()
        .zip(&flows)
        .map(|((_, kind), q)| m(kind.headloss(m3ps(*q)).head_m))
        .collect();
    let mut demands: Vec<Flow> = vec![m3ps(0.0); network.node_count()];
    for (idx, &node) in problem.unknowns.node_ids().iter().enumerate() {
        demands[node.slot()] = m3ps(problem.demands[idx]);
    }
    HydraulicSolution {
        heads: heads.into_iter().map(m).collect(),
        flows: flows.into_iter().map(m3ps).collect(),
        headlosses,
        demands,
        iterations,
        residual,
        initialization,
    }
}
