//! Component record definitions.
//!
//! Records are the normalized input of the builder: one list per element
//! type, every element carrying a unique string id. Links reference nodes
//! by id.

use hf_components::{LinkStatus, ValveStatus, ValveType};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct NetworkRecords {
    #[serde(default)]
    pub junctions: Vec<JunctionRecord>,
    #[serde(default)]
    pub reservoirs: Vec<ReservoirRecord>,
    #[serde(default)]
    pub tanks: Vec<TankRecord>,
    #[serde(default)]
    pub pipes: Vec<PipeRecord>,
    #[serde(default)]
    pub pumps: Vec<PumpRecord>,
    #[serde(default)]
    pub valves: Vec<ValveRecord>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct JunctionRecord {
    pub id: String,
    pub elevation_m: f64,
    #[serde(default)]
    pub base_demand_m3s: f64,
    /// Inactive nodes are kept out of the solve; they must have no links.
    #[serde(default, skip_serializing_if = "is_false")]
    pub inactive: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ReservoirRecord {
    pub id: String,
    pub head_m: f64,
    #[serde(default, skip_serializing_if = "is_false")]
    pub inactive: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TankRecord {
    pub id: String,
    pub elevation_m: f64,
    pub init_level_m: f64,
    pub min_level_m: f64,
    pub max_level_m: f64,
    pub diameter_m: f64,
    #[serde(default, skip_serializing_if = "is_false")]
    pub inactive: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PipeRecord {
    pub id: String,
    pub from_node_id: String,
    pub to_node_id: String,
    pub length_m: f64,
    pub diameter_m: f64,
    /// Hazen-Williams C
    pub roughness: f64,
    #[serde(default)]
    pub status: LinkStatus,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PumpRecord {
    pub id: String,
    pub from_node_id: String,
    pub to_node_id: String,
    pub head_gain_m: f64,
    #[serde(default)]
    pub status: LinkStatus,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ValveRecord {
    pub id: String,
    pub from_node_id: String,
    pub to_node_id: String,
    pub valve_type: ValveType,
    pub diameter_m: f64,
    #[serde(default = "default_valve_status")]
    pub status: ValveStatus,
}

fn default_valve_status() -> ValveStatus {
    ValveStatus::Open
}

fn is_false(v: &bool) -> bool {
    !*v
}

/// Borrowed view of a link record's connectivity.
#[derive(Debug, Clone, Copy)]
pub struct LinkEnds<'a> {
    pub id: &'a str,
    pub from_node_id: &'a str,
    pub to_node_id: &'a str,
}

impl NetworkRecords {
    /// Every node id with its inactive flag, in junction, reservoir, tank order.
    pub fn node_ids(&self) -> impl Iterator<Item = (&str, bool)> {
        let j = self.junctions.iter().map(|r| (r.id.as_str(), r.inactive));
        let r = self.reservoirs.iter().map(|r| (r.id.as_str(), r.inactive));
        let t = self.tanks.iter().map(|r| (r.id.as_str(), r.inactive));
        j.chain(r).chain(t)
    }

    /// Connectivity of every link, in pipe, pump, valve order.
    pub fn link_ends(&self) -> impl Iterator<Item = LinkEnds<'_>> {
        let p = self.pipes.iter().map(|r| LinkEnds {
            id: &r.id,
            from_node_id: &r.from_node_id,
            to_node_id: &r.to_node_id,
        });
        let u = self.pumps.iter().map(|r| LinkEnds {
            id: &r.id,
            from_node_id: &r.from_node_id,
            to_node_id: &r.to_node_id,
        });
        let v = self.valves.iter().map(|r| LinkEnds {
            id: &r.id,
            from_node_id: &r.from_node_id,
            to_node_id: &r.to_node_id,
        });
        p.chain(u).chain(v)
    }
}
