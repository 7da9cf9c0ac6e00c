//! Reader for the text report of an EPANET-compatible engine.
//!
//! Only the `Node Results` and `Link Results` tables are read. Rows are
//! matched by element id against the network the description was written
//! from, so header and banner lines fall through without special casing.
//! Values are expected in the units the description declares (`UNITS CMS`):
//! flows in m³/s, heads and pressures in metres, pipe headloss per
//! kilometre.

use std::collections::{HashMap, HashSet};

use hf_components::{LinkKind, NodeKind};
use hf_core::units::m;
use hf_network::{Network, RunOptions, clock_label};
use hf_results::{
    LinkResults, NodeResults, ResultsError, RunResults, RunStats, SeriesMap, TankResults,
};

#[derive(thiserror::Error, Debug)]
pub enum ReportError {
    #[error("Report contains no result tables")]
    NoResults,

    #[error("Report has no results at {label}")]
    MissingStep { label: String },

    #[error("Report has no {table} row for {id} at {label}")]
    MissingRow {
        table: &'static str,
        id: String,
        label: String,
    },

    #[error("Line {line}: cannot read values for {id}")]
    BadValue { line: usize, id: String },

    #[error("Line {line}: cannot read time '{text}'")]
    BadTime { line: usize, text: String },

    #[error(transparent)]
    Incomplete(#[from] ResultsError),
}

#[derive(Clone, Copy)]
enum Table {
    Nodes,
    Links,
}

/// The three leading numeric columns of a row.
type Row = [f64; 3];

#[derive(Default)]
struct StepTables {
    nodes: HashMap<String, Row>,
    links: HashMap<String, Row>,
}

/// Parse a report into the canonical result schema.
///
/// The report may cover more reporting times than the run has steps (the
/// engine also reports the end time); only the run's own step labels are
/// kept, and every one of them must be present.
pub fn parse_report(
    text: &str,
    network: &Network,
    options: &RunOptions,
    engine: &str,
) -> Result<RunResults, ReportError> {
    let steps = read_tables(text, network)?;
    if steps.is_empty() {
        return Err(ReportError::NoResults);
    }

    let time_steps = options.step_labels();
    let mut nodes = NodeResults::default();
    let mut links = LinkResults::default();
    let mut tanks = TankResults::default();

    for label in &time_steps {
        let step = steps
            .get(label)
            .ok_or_else(|| ReportError::MissingStep {
                label: label.clone(),
            })?;

        for (node, kind) in network.active_nodes() {
            let [demand, head, pressure] = *step.nodes.get(&node.name).ok_or_else(|| {
                ReportError::MissingRow {
                    table: "node",
                    id: node.name.clone(),
                    label: label.clone(),
                }
            })?;
            push(&mut nodes.head, &node.name, head);
            match kind {
                NodeKind::Junction(_) => {
                    push(&mut nodes.pressure, &node.name, pressure);
                    push(&mut nodes.demand, &node.name, demand);
                }
                NodeKind::Tank(tank) => {
                    push(&mut nodes.pressure, &node.name, pressure);
                    push(&mut tanks.level, &node.name, pressure);
                    tanks
                        .status
                        .entry(node.name.clone())
                        .or_default()
                        .push(tank.status_at(m(pressure)));
                }
                NodeKind::Reservoir(_) => {}
            }
        }

        for (link, kind) in network.links() {
            let [flow, velocity, unit_loss] = *step.links.get(&link.name).ok_or_else(|| {
                ReportError::MissingRow {
                    table: "link",
                    id: link.name.clone(),
                    label: label.clone(),
                }
            })?;
            let (velocity, headloss) = match kind {
                LinkKind::Pipe(pipe) => (velocity.abs(), unit_loss * pipe.length.value / 1000.0),
                LinkKind::Pump(_) => (0.0, unit_loss),
                LinkKind::Valve(_) => (velocity.abs(), unit_loss),
            };
            push(&mut links.flow, &link.name, flow);
            push(&mut links.velocity, &link.name, velocity);
            push(&mut links.headloss, &link.name, headloss);
        }
    }

    let stats = RunStats::compute(&nodes, &links, options.duration_hours);
    let results = RunResults {
        engine: engine.to_string(),
        time_steps,
        nodes,
        links,
        tanks,
        stats,
    };
    results.check_complete()?;
    Ok(results)
}

/// Result tables keyed by step label.
fn read_tables(
    text: &str,
    network: &Network,
) -> Result<HashMap<String, StepTables>, ReportError> {
    let node_names: HashSet<&str> = network.nodes().map(|(n, _)| n.name.as_str()).collect();
    let link_names: HashSet<&str> = network.links().map(|(l, _)| l.name.as_str()).collect();
    let mut steps: HashMap<String, StepTables> = HashMap::new();
    let mut table: Option<(Table, String)> = None;

    for (idx, raw) in text.lines().enumerate() {
        let line_no = idx + 1;
        let line = raw.trim();
        if line.is_empty() {
            continue;
        }

        let header = if let Some(rest) = line.strip_prefix("Node Results") {
            Some((Table::Nodes, rest))
        } else {
            line.strip_prefix("Link Results").map(|rest| (Table::Links, rest))
        };
        if let Some((kind, rest)) = header {
            let label = header_label(rest, line_no)?;
            steps.entry(label.clone()).or_default();
            table = Some((kind, label));
            continue;
        }

        let Some((kind, label)) = table.as_ref() else {
            continue;
        };
        let mut tokens = line.split_whitespace();
        let Some(id) = tokens.next() else {
            continue;
        };
        let known = match kind {
            Table::Nodes => node_names.contains(id),
            Table::Links => link_names.contains(id),
        };
        if !known {
            continue;
        }

        let row = read_row(tokens).ok_or_else(|| ReportError::BadValue {
            line: line_no,
            id: id.to_string(),
        })?;
        let Some(step) = steps.get_mut(label) else {
            continue;
        };
        match kind {
            Table::Nodes => step.nodes.insert(id.to_string(), row),
            Table::Links => step.links.insert(id.to_string(), row),
        };
    }
    Ok(steps)
}

fn read_row<'a>(mut tokens: impl Iterator<Item = &'a str>) -> Option<Row> {
    let mut row = [0.0; 3];
    for value in &mut row {
        *value = tokens.next()?.parse::<f64>().ok()?;
        if !value.is_finite() {
            return None;
        }
    }
    Some(row)
}

/// Label of a table header tail such as ` at 6:00 Hrs:` or `:`.
///
/// A single-period report has no time and is labelled `0:00`.
fn header_label(rest: &str, line: usize) -> Result<String, ReportError> {
    let Some(at) = rest.find(" at ") else {
        return Ok(clock_label(0.0));
    };
    let time = rest[at + 4..]
        .split_whitespace()
        .next()
        .unwrap_or_default()
        .trim_end_matches(':');
    let bad = || ReportError::BadTime {
        line,
        text: time.to_string(),
    };

    let mut parts = time.split(':');
    let hours: u32 = parts.next().and_then(|h| h.parse().ok()).ok_or_else(bad)?;
    let minutes: u32 = parts.next().and_then(|mm| mm.parse().ok()).ok_or_else(bad)?;
    let seconds: u32 = match parts.next() {
        Some(s) => s.parse().map_err(|_| bad())?,
        None => 0,
    };
    if minutes >= 60 || seconds >= 60 {
        return Err(bad());
    }
    let total = f64::from(hours) + f64::from(minutes) / 60.0 + f64::from(seconds) / 3600.0;
    Ok(clock_label(total))
}

fn push(map: &mut SeriesMap, id: &str, value: f64) {
    map.entry(id.to_string()).or_default().push(value);
}
