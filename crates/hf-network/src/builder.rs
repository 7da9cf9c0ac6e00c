//! Network construction from component records.

use hf_components::{
    Junction, LinkKind, NodeKind, Pipe, Pump, Reservoir, Tank, Valve,
};
use hf_core::units::{m, m3ps};
use hf_graph::GraphBuilder;
use std::collections::HashMap;
use tracing::{debug, info};

use crate::NetworkResult;
use crate::inp;
use crate::network::Network;
use crate::options::RunOptions;
use crate::schema::NetworkRecords;
use crate::validate::{ValidationError, validate_records};

/// The two artifacts of a build: the topology and its description text.
#[derive(Debug, Clone)]
pub struct BuiltNetwork {
    pub network: Network,
    pub description: String,
}

/// Validate records and build the network plus its canonical description.
///
/// Performs no I/O.
pub fn build_network(records: &NetworkRecords, options: &RunOptions) -> NetworkResult<BuiltNetwork> {
    options.validate()?;
    let network = build_topology(records)?;
    let description = inp::write_description(&network, options);
    info!(
        nodes = network.node_count(),
        links = network.link_count(),
        "network built"
    );
    Ok(BuiltNetwork {
        network,
        description,
    })
}

/// Validate records and build only the topology.
pub fn build_topology(records: &NetworkRecords) -> NetworkResult<Network> {
    validate_records(records)?;

    let mut builder = GraphBuilder::new();
    let mut kinds = Vec::new();
    let mut active = Vec::new();
    let mut ids = HashMap::new();

    for rec in &records.junctions {
        let kind = NodeKind::Junction(Junction {
            elevation: finite(&rec.id, rec.elevation_m, "junction elevation").map(m)?,
            base_demand: finite(&rec.id, rec.base_demand_m3s, "junction demand").map(m3ps)?,
        });
        ids.insert(rec.id.as_str(), builder.add_node(&rec.id));
        kinds.push(kind);
        active.push(!rec.inactive);
    }
    for rec in &records.reservoirs {
        let kind = NodeKind::Reservoir(Reservoir {
            head: finite(&rec.id, rec.head_m, "reservoir head").map(m)?,
        });
        ids.insert(rec.id.as_str(), builder.add_node(&rec.id));
        kinds.push(kind);
        active.push(!rec.inactive);
    }
    for rec in &records.tanks {
        let tank = Tank::new(
            m(rec.elevation_m),
            m(rec.init_level_m),
            m(rec.min_level_m),
            m(rec.max_level_m),
            m(rec.diameter_m),
        )
        .map_err(|e| ValidationError::component(&rec.id, e))?;
        ids.insert(rec.id.as_str(), builder.add_node(&rec.id));
        kinds.push(NodeKind::Tank(tank));
        active.push(!rec.inactive);
    }

    let endpoints = |link: &str, from: &str, to: &str| -> Result<_, ValidationError> {
        let lookup = |node: &str| {
            ids.get(node).copied().ok_or_else(|| ValidationError::UnknownNode {
                link: link.to_string(),
                node: node.to_string(),
            })
        };
        Ok((lookup(from)?, lookup(to)?))
    };

    let mut links = Vec::new();
    let mut graph_links = Vec::new();
    for rec in &records.pipes {
        let pipe = Pipe::new(m(rec.length_m), m(rec.diameter_m), rec.roughness)
            .map_err(|e| ValidationError::component(&rec.id, e))?
            .with_status(rec.status);
        graph_links.push((rec.id.as_str(), endpoints(&rec.id, &rec.from_node_id, &rec.to_node_id)?));
        links.push(LinkKind::Pipe(pipe));
    }
    for rec in &records.pumps {
        let pump = Pump::new(m(rec.head_gain_m))
            .map_err(|e| ValidationError::component(&rec.id, e))?
            .with_status(rec.status);
        graph_links.push((rec.id.as_str(), endpoints(&rec.id, &rec.from_node_id, &rec.to_node_id)?));
        links.push(LinkKind::Pump(pump));
    }
    for rec in &records.valves {
        let valve = Valve::new(rec.valve_type, m(rec.diameter_m), rec.status)
            .map_err(|e| ValidationError::component(&rec.id, e))?;
        graph_links.push((rec.id.as_str(), endpoints(&rec.id, &rec.from_node_id, &rec.to_node_id)?));
        links.push(LinkKind::Valve(valve));
    }
    for (name, (a, b)) in graph_links {
        builder.add_link(name, a, b);
    }

    let graph = builder.build()?;
    debug!(
        junctions = records.junctions.len(),
        reservoirs = records.reservoirs.len(),
        tanks = records.tanks.len(),
        pipes = records.pipes.len(),
        pumps = records.pumps.len(),
        valves = records.valves.len(),
        "topology assembled"
    );
    Ok(Network::new(graph, kinds, links, active))
}

fn finite(id: &str, value: f64, what: &'static str) -> Result<f64, ValidationError> {
    hf_components::common::check_finite(value, what).map_err(|e| ValidationError::component(id, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{JunctionRecord, PipeRecord, ReservoirRecord, TankRecord};
    use hf_components::LinkStatus;

    fn records() -> NetworkRecords {
        NetworkRecords {
            junctions: vec![JunctionRecord {
                id: "J1".into(),
                elevation_m: 50.0,
                base_demand_m3s: 0.1,
                inactive: false,
            }],
            reservoirs: vec![ReservoirRecord {
                id: "R1".into(),
                head_m: 100.0,
                inactive: false,
            }],
            pipes: vec![PipeRecord {
                id: "P1".into(),
                from_node_id: "R1".into(),
                to_node_id: "J1".into(),
                length_m: 100.0,
                diameter_m: 0.2,
                roughness: 120.0,
                status: LinkStatus::Open,
            }],
            ..Default::default()
        }
    }

    #[test]
    fn builds_topology_and_description() {
        let built = build_network(&records(), &RunOptions::default()).unwrap();
        let net = &built.network;
        assert_eq!(net.node_count(), 2);
        assert_eq!(net.link_count(), 1);
        let j1 = net.graph().find_node("J1").unwrap();
        assert_eq!(net.node_kind(j1).unwrap().type_name(), "junction");
        assert!(built.description.contains("[JUNCTIONS]"));
        assert!(built.description.contains("P1"));
    }

    #[test]
    fn invalid_pipe_names_its_id() {
        let mut r = records();
        r.pipes[0].diameter_m = 0.0;
        let err = build_topology(&r).unwrap_err();
        let crate::NetworkError::Validation(v) = err else {
            panic!("expected validation error, got {err:?}");
        };
        assert_eq!(v.offending_ids(), vec!["P1".to_string()]);
    }

    #[test]
    fn invalid_tank_levels_rejected() {
        let mut r = records();
        r.tanks.push(TankRecord {
            id: "T1".into(),
            elevation_m: 60.0,
            init_level_m: 9.0,
            min_level_m: 1.0,
            max_level_m: 5.0,
            diameter_m: 10.0,
            inactive: false,
        });
        r.pipes.push(PipeRecord {
            id: "P2".into(),
            from_node_id: "J1".into(),
            to_node_id: "T1".into(),
            length_m: 50.0,
            diameter_m: 0.15,
            roughness: 110.0,
            status: LinkStatus::Open,
        });
        let err = build_topology(&r).unwrap_err();
        assert!(err.to_string().contains("T1"));
    }
}
