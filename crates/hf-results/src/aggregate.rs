//! Assembly of per-step solutions into series and statistics.

use hf_components::{HeadLossLaw, NodeKind};
use hf_network::Network;
use hf_sim::{SimRecord, TankStep};
use hf_solver::HydraulicSolution;

use crate::types::{
    LinkResults, NodeResults, RunResults, RunStats, SeriesMap, TankResults,
};
use crate::{ResultsError, ResultsResult};

/// Accumulates one run's steps. Owned by the run; consumed by [`finish`].
///
/// [`finish`]: Aggregator::finish
#[derive(Debug)]
pub struct Aggregator<'a> {
    network: &'a Network,
    engine: String,
    duration_hours: u32,
    time_steps: Vec<String>,
    nodes: NodeResults,
    links: LinkResults,
    tanks: TankResults,
}

impl<'a> Aggregator<'a> {
    pub fn new(network: &'a Network, duration_hours: u32, engine: impl Into<String>) -> Self {
        Self {
            network,
            engine: engine.into(),
            duration_hours,
            time_steps: Vec::new(),
            nodes: NodeResults::default(),
            links: LinkResults::default(),
            tanks: TankResults::default(),
        }
    }

    /// Aggregate a complete controller record.
    pub fn from_record(
        network: &'a Network,
        record: &SimRecord,
        engine: impl Into<String>,
    ) -> ResultsResult<RunResults> {
        let mut agg = Self::new(network, record.duration_hours, engine);
        for step in &record.steps {
            agg.push_step(&step.label, &step.solution, &step.tanks)?;
        }
        agg.finish()
    }

    pub fn step_count(&self) -> usize {
        self.time_steps.len()
    }

    /// Append one step's values to every series.
    pub fn push_step(
        &mut self,
        label: &str,
        solution: &HydraulicSolution,
        tanks: &[TankStep],
    ) -> ResultsResult<()> {
        let step = self.time_steps.len();
        let net = self.network;

        for (node, kind) in net.active_nodes() {
            let head = solution
                .head(node.id)
                .map(|h| h.value)
                .ok_or_else(|| missing("head", &node.name, step))?;
            push(&mut self.nodes.head, &node.name, finite(head, "head", &node.name, step)?);
            match kind {
                NodeKind::Junction(j) => {
                    let p = head - j.elevation.value;
                    push(&mut self.nodes.pressure, &node.name, finite(p, "pressure", &node.name, step)?);
                    let demand = solution
                        .demands
                        .get(node.id.slot())
                        .map_or(0.0, |d| d.value);
                    push(&mut self.nodes.demand, &node.name, demand);
                }
                NodeKind::Tank(t) => {
                    let p = head - t.elevation.value;
                    push(&mut self.nodes.pressure, &node.name, finite(p, "pressure", &node.name, step)?);
                }
                NodeKind::Reservoir(_) => {}
            }
        }

        for (link, kind) in net.links() {
            let q = solution
                .flow(link.id)
                .map(|q| q.value)
                .ok_or_else(|| missing("flow", &link.name, step))?;
            let q = finite(q, "flow", &link.name, step)?;
            let velocity = kind
                .flow_area()
                .map(|a| q.abs() / a.value)
                .unwrap_or(0.0);
            push(&mut self.links.flow, &link.name, q);
            push(&mut self.links.velocity, &link.name, velocity);
            let hl = solution
                .headlosses
                .get(link.id.slot())
                .map(|h| h.value)
                .ok_or_else(|| missing("headloss", &link.name, step))?;
            push(&mut self.links.headloss, &link.name, finite(hl, "headloss", &link.name, step)?);
        }

        for tank in tanks {
            let name = net
                .node_name(tank.node)
                .ok_or_else(|| missing("tank", &tank.node.to_string(), step))?;
            push(&mut self.tanks.level, name, tank.level.value);
            self.tanks
                .status
                .entry(name.to_string())
                .or_default()
                .push(tank.status);
        }

        self.time_steps.push(label.to_string());
        Ok(())
    }

    /// Compute statistics and return the complete result.
    pub fn finish(self) -> ResultsResult<RunResults> {
        if self.time_steps.is_empty() {
            return Err(ResultsError::Empty);
        }
        let stats = RunStats::compute(&self.nodes, &self.links, self.duration_hours);
        let results = RunResults {
            engine: self.engine,
            time_steps: self.time_steps,
            nodes: self.nodes,
            links: self.links,
            tanks: self.tanks,
            stats,
        };
        results.check_complete()?;
        Ok(results)
    }
}

impl RunResults {
    /// Every declared series has exactly one finite value per time step.
    pub fn check_complete(&self) -> ResultsResult<()> {
        let n = self.time_steps.len();
        let numeric: [(&'static str, &SeriesMap); 7] = [
            ("nodes.pressure", &self.nodes.pressure),
            ("nodes.head", &self.nodes.head),
            ("nodes.demand", &self.nodes.demand),
            ("links.flow", &self.links.flow),
            ("links.velocity", &self.links.velocity),
            ("links.headloss", &self.links.headloss),
            ("tanks.level", &self.tanks.level),
        ];
        for (series, map) in numeric {
            for (id, values) in map {
                if values.len() != n {
                    return Err(ResultsError::Incomplete {
                        series,
                        id: id.clone(),
                        expected: n,
                        found: values.len(),
                    });
                }
                if let Some(step) = values.iter().position(|v| !v.is_finite()) {
                    return Err(ResultsError::NonFinite {
                        series,
                        id: id.clone(),
                        step,
                    });
                }
            }
        }
        for (id, values) in &self.tanks.status {
            if values.len() != n {
                return Err(ResultsError::Incomplete {
                    series: "tanks.status",
                    id: id.clone(),
                    expected: n,
                    found: values.len(),
                });
            }
        }
        Ok(())
    }
}

fn push(map: &mut SeriesMap, id: &str, value: f64) {
    map.entry(id.to_string()).or_default().push(value);
}

fn finite(value: f64, series: &'static str, id: &str, step: usize) -> ResultsResult<f64> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(ResultsError::NonFinite {
            series,
            id: id.to_string(),
            step,
        })
    }
}

fn missing(series: &'static str, id: &str, step: usize) -> ResultsError {
    ResultsError::Incomplete {
        series,
        id: id.to_string(),
        expected: step + 1,
        found: step,
    }
}
