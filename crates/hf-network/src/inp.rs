//! Canonical network description (EPANET-style sections).
//!
//! Units are SI with flows in m³/s (`UNITS CMS`); pipe and valve diameters
//! are written in millimetres, everything else in metres.

use std::collections::HashMap;
use std::fmt::{self, Write};

use hf_components::{LinkKind, LinkStatus, NodeKind, ValveStatus, ValveType};

use crate::network::Network;
use crate::options::{RunOptions, clock_label};
use crate::pattern::DemandPattern;
use crate::schema::{
    JunctionRecord, NetworkRecords, PipeRecord, PumpRecord, ReservoirRecord, TankRecord,
    ValveRecord,
};
use crate::{NetworkError, NetworkResult};

/// Lower bound for the design flow of single-point pump curves (m³/s).
const MIN_PUMP_DESIGN_FLOW: f64 = 1e-3;

/// Render the description of a built network. Inactive nodes are left out.
pub fn write_description(network: &Network, options: &RunOptions) -> String {
    let mut out = String::new();
    // Writing into a String cannot fail.
    let _ = render(&mut out, network, options);
    out
}

fn render(f: &mut impl Write, net: &Network, options: &RunOptions) -> fmt::Result {
    let pattern = DemandPattern::daily();
    let pattern_ref = if options.use_demand_pattern {
        pattern.id()
    } else {
        ""
    };

    writeln!(f, "[TITLE]")?;
    writeln!(f, ";Generated by HydroFlow")?;
    writeln!(f)?;

    writeln!(f, "[JUNCTIONS]")?;
    writeln!(f, ";ID              Elev        Demand      Pattern         ")?;
    writeln!(f, ";-------------- ------------ ------------ ----------------")?;
    let mut design_flow = 0.0;
    for (node, kind) in net.active_nodes() {
        if let NodeKind::Junction(j) = kind {
            design_flow += j.base_demand.value;
            writeln!(
                f,
                "{:<16} {:<12.2} {:<12.6} {} ;",
                node.name, j.elevation.value, j.base_demand.value, pattern_ref
            )?;
        }
    }
    writeln!(f)?;

    writeln!(f, "[RESERVOIRS]")?;
    writeln!(f, ";ID              Head        Pattern         ")?;
    writeln!(f, ";-------------- ------------ ----------------")?;
    for (node, kind) in net.active_nodes() {
        if let NodeKind::Reservoir(r) = kind {
            writeln!(f, "{:<16} {:<12.2} ;", node.name, r.head.value)?;
        }
    }
    writeln!(f)?;

    writeln!(f, "[TANKS]")?;
    writeln!(
        f,
        ";ID              Elevation   InitLevel   MinLevel    MaxLevel    Diameter    MinVol      VolCurve"
    )?;
    writeln!(
        f,
        ";-------------- ------------ ------------ ------------ ------------ ------------ ------------ ----------------"
    )?;
    for (node, kind) in net.active_nodes() {
        if let NodeKind::Tank(t) = kind {
            writeln!(
                f,
                "{:<16} {:<12.2} {:<12.2} {:<12.2} {:<12.2} {:<12.2} 0.0          ;",
                node.name,
                t.elevation.value,
                t.init_level.value,
                t.min_level.value,
                t.max_level.value,
                t.diameter.value
            )?;
        }
    }
    writeln!(f)?;

    let ends = |link: &hf_graph::Link| {
        let name = |id| net.node_name(id).unwrap_or_default();
        (name(link.start()), name(link.end()))
    };

    writeln!(f, "[PIPES]")?;
    writeln!(
        f,
        ";ID              Node1           Node2           Length      Diameter    Roughness   MinorLoss   Status"
    )?;
    writeln!(
        f,
        ";-------------- ---------------- ---------------- ----------- ----------- ----------- ----------- ----------------"
    )?;
    for (link, kind) in net.links() {
        if let LinkKind::Pipe(p) = kind {
            let (a, b) = ends(link);
            writeln!(
                f,
                "{:<16} {:<16} {:<16} {:<11.2} {:<11.2} {:<11.2} 0.0         {}",
                link.name,
                a,
                b,
                p.length.value,
                p.diameter.value * 1000.0,
                p.roughness,
                p.status
            )?;
        }
    }
    writeln!(f)?;

    let mut statuses = Vec::new();
    let mut curves = Vec::new();

    writeln!(f, "[PUMPS]")?;
    writeln!(f, ";ID              Node1           Node2           Parameters")?;
    writeln!(f, ";-------------- ---------------- ---------------- ----------------")?;
    for (link, kind) in net.links() {
        if let LinkKind::Pump(p) = kind {
            let (a, b) = ends(link);
            let curve = format!("{}_H", link.name);
            writeln!(f, "{:<16} {:<16} {:<16} HEAD {}", link.name, a, b, curve)?;
            curves.push((curve, p.head_gain.value));
            if p.status == LinkStatus::Closed {
                statuses.push((link.name.as_str(), "Closed"));
            }
        }
    }
    writeln!(f)?;

    writeln!(f, "[VALVES]")?;
    writeln!(
        f,
        ";ID              Node1           Node2           Diameter    Type Setting     MinorLoss   "
    )?;
    writeln!(
        f,
        ";-------------- ---------------- ---------------- ----------- ---- ----------- ------------"
    )?;
    for (link, kind) in net.links() {
        if let LinkKind::Valve(v) = kind {
            let (a, b) = ends(link);
            let setting = match v.status {
                ValveStatus::Throttled { loss_coefficient } => loss_coefficient,
                ValveStatus::Open | ValveStatus::Closed => 0.0,
            };
            writeln!(
                f,
                "{:<16} {:<16} {:<16} {:<11.2} {:<4} {:<11.4} 0.0",
                link.name,
                a,
                b,
                v.diameter.value * 1000.0,
                v.valve_type,
                setting
            )?;
            match v.status {
                ValveStatus::Open => statuses.push((link.name.as_str(), "Open")),
                ValveStatus::Closed => statuses.push((link.name.as_str(), "Closed")),
                ValveStatus::Throttled { .. } => {}
            }
        }
    }
    writeln!(f)?;

    if !statuses.is_empty() {
        writeln!(f, "[STATUS]")?;
        writeln!(f, ";ID              Status/Setting")?;
        for (name, status) in statuses {
            writeln!(f, "{name:<16} {status}")?;
        }
        writeln!(f)?;
    }

    if !curves.is_empty() {
        let q = design_flow.max(MIN_PUMP_DESIGN_FLOW);
        writeln!(f, "[CURVES]")?;
        writeln!(f, ";ID              X-Value     Y-Value")?;
        for (id, head) in curves {
            writeln!(f, "{id:<16} {q:<11.6} {head:<11.4}")?;
        }
        writeln!(f)?;
    }

    writeln!(f, "[PATTERNS]")?;
    writeln!(f, ";ID              Multipliers")?;
    writeln!(f, ";-------------- ----------------")?;
    writeln!(f, ";Daily demand pattern")?;
    for chunk in pattern.multipliers().chunks(6) {
        write!(f, "{:<16}", pattern.id())?;
        for m in chunk {
            write!(f, " {m:<11.1}")?;
        }
        writeln!(f)?;
    }
    writeln!(f)?;

    let step = clock_label(options.time_step.hours());
    writeln!(f, "[OPTIONS]")?;
    writeln!(f, "UNITS              CMS")?;
    writeln!(f, "HEADLOSS           H-W")?;
    writeln!(f, "SPECIFIC GRAVITY   1.0")?;
    writeln!(f, "VISCOSITY          1.0")?;
    writeln!(f, "TRIALS             40")?;
    writeln!(f, "ACCURACY           0.001")?;
    writeln!(f, "DEMAND MULTIPLIER  1.0")?;
    writeln!(f, "EMITTER EXPONENT   0.5")?;
    writeln!(f, "QUALITY            NONE")?;
    writeln!(f, "DIFFUSIVITY        1.0")?;
    writeln!(f, "TOLERANCE          0.01")?;
    writeln!(f)?;

    writeln!(f, "[TIMES]")?;
    writeln!(f, "DURATION           {}:00", options.duration_hours)?;
    writeln!(f, "HYDRAULIC TIMESTEP {step}")?;
    writeln!(f, "QUALITY TIMESTEP   0:05")?;
    writeln!(f, "PATTERN TIMESTEP   1:00")?;
    writeln!(f, "PATTERN START      0:00")?;
    writeln!(f, "REPORT TIMESTEP    {step}")?;
    writeln!(f, "REPORT START       0:00")?;
    writeln!(f, "START CLOCKTIME    0:00")?;
    writeln!(f, "STATISTIC          NONE")?;
    writeln!(f)?;

    writeln!(f, "[REPORT]")?;
    writeln!(f, "PAGESIZE           0")?;
    writeln!(f, "STATUS             YES")?;
    writeln!(f, "SUMMARY            YES")?;
    writeln!(f, "ENERGY             NO")?;
    writeln!(f, "NODES              ALL")?;
    writeln!(f, "LINKS              ALL")?;
    writeln!(f)?;

    writeln!(f, "[END]")
}

/// Read a description back into component records.
///
/// Junctions, reservoirs, tanks, pipes, pumps (single-point `HEAD` curves),
/// valves, and link statuses are read; other sections are skipped.
pub fn parse_description(text: &str) -> NetworkResult<NetworkRecords> {
    let mut records = NetworkRecords::default();
    let mut pump_curves: Vec<(usize, String, usize)> = Vec::new();
    let mut curves: HashMap<String, f64> = HashMap::new();
    let mut statuses: HashMap<String, (usize, String)> = HashMap::new();
    let mut section = String::new();

    for (idx, raw) in text.lines().enumerate() {
        let line_no = idx + 1;
        let line = raw.split(';').next().unwrap_or_default().trim();
        if line.is_empty() {
            continue;
        }
        if line.starts_with('[') {
            section = line.trim_matches(|c| c == '[' || c == ']').to_ascii_uppercase();
            continue;
        }
        let cols: Vec<&str> = line.split_whitespace().collect();
        let row = Row { cols: &cols, line: line_no };

        match section.as_str() {
            "JUNCTIONS" => records.junctions.push(JunctionRecord {
                id: row.text(0)?,
                elevation_m: row.num(1)?,
                base_demand_m3s: row.num_or(2, 0.0)?,
                inactive: false,
            }),
            "RESERVOIRS" => records.reservoirs.push(ReservoirRecord {
                id: row.text(0)?,
                head_m: row.num(1)?,
                inactive: false,
            }),
            "TANKS" => records.tanks.push(TankRecord {
                id: row.text(0)?,
                elevation_m: row.num(1)?,
                init_level_m: row.num(2)?,
                min_level_m: row.num(3)?,
                max_level_m: row.num(4)?,
                diameter_m: row.num(5)?,
                inactive: false,
            }),
            "PIPES" => records.pipes.push(PipeRecord {
                id: row.text(0)?,
                from_node_id: row.text(1)?,
                to_node_id: row.text(2)?,
                length_m: row.num(3)?,
                diameter_m: row.num(4)? / 1000.0,
                roughness: row.num(5)?,
                status: match cols.get(7) {
                    Some(s) => s.parse().map_err(|e| row.error(format!("{e}")))?,
                    None => LinkStatus::Open,
                },
            }),
            "PUMPS" => {
                if !row.text(3)?.eq_ignore_ascii_case("HEAD") {
                    return Err(row.error("only HEAD pumps are supported".to_string()));
                }
                pump_curves.push((records.pumps.len(), row.text(4)?, line_no));
                records.pumps.push(PumpRecord {
                    id: row.text(0)?,
                    from_node_id: row.text(1)?,
                    to_node_id: row.text(2)?,
                    head_gain_m: 0.0,
                    status: LinkStatus::Open,
                });
            }
            "VALVES" => {
                let valve_type: ValveType =
                    row.text(4)?.parse().map_err(|e| row.error(format!("{e}")))?;
                let setting = row.num_or(5, 0.0)?;
                records.valves.push(ValveRecord {
                    id: row.text(0)?,
                    from_node_id: row.text(1)?,
                    to_node_id: row.text(2)?,
                    valve_type,
                    diameter_m: row.num(3)? / 1000.0,
                    status: if setting > 0.0 {
                        ValveStatus::Throttled {
                            loss_coefficient: setting,
                        }
                    } else {
                        ValveStatus::Open
                    },
                });
            }
            "STATUS" => {
                statuses.insert(row.text(0)?, (line_no, row.text(1)?));
            }
            "CURVES" => {
                curves.insert(row.text(0)?, row.num(2)?);
            }
            _ => {}
        }
    }

    for (idx, curve, line) in pump_curves {
        let head = curves.get(&curve).copied().ok_or_else(|| NetworkError::Parse {
            line,
            message: format!("pump curve {curve} not defined"),
        })?;
        records.pumps[idx].head_gain_m = head;
    }

    for (id, (line, status)) in statuses {
        let parsed: LinkStatus = status.parse().map_err(|e| NetworkError::Parse {
            line,
            message: format!("{e}"),
        })?;
        if let Some(p) = records.pumps.iter_mut().find(|p| p.id == id) {
            p.status = parsed;
        } else if let Some(v) = records.valves.iter_mut().find(|v| v.id == id) {
            v.status = match parsed {
                LinkStatus::Open => ValveStatus::Open,
                LinkStatus::Closed => ValveStatus::Closed,
            };
        } else if let Some(p) = records.pipes.iter_mut().find(|p| p.id == id) {
            p.status = parsed;
        }
    }

    Ok(records)
}

struct Row<'a> {
    cols: &'a [&'a str],
    line: usize,
}

impl Row<'_> {
    fn error(&self, message: String) -> NetworkError {
        NetworkError::Parse {
            line: self.line,
            message,
        }
    }

    fn text(&self, i: usize) -> NetworkResult<String> {
        self.cols
            .get(i)
            .map(|s| s.to_string())
            .ok_or_else(|| self.error(format!("missing column {}", i + 1)))
    }

    fn num(&self, i: usize) -> NetworkResult<f64> {
        let raw = self.text(i)?;
        raw.parse()
            .map_err(|_| self.error(format!("column {} is not a number: {raw}", i + 1)))
    }

    fn num_or(&self, i: usize, default: f64) -> NetworkResult<f64> {
        if i < self.cols.len() {
            self.num(i)
        } else {
            Ok(default)
        }
    }
}
