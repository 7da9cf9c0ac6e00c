//! Record validation.
//!
//! Everything here runs once, before any solve, and names the offending
//! identifier in its error.

use std::collections::{HashMap, HashSet};

use hf_components::ComponentError;

use crate::schema::NetworkRecords;

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("Duplicate ID: {id}")]
    DuplicateId { id: String },

    #[error("Invalid ID '{id}': {reason}")]
    InvalidId { id: String, reason: &'static str },

    #[error("Link {link} references unknown node {node}")]
    UnknownNode { link: String, node: String },

    #[error("Link {link} starts and ends at node {node}")]
    SelfLoop { link: String, node: String },

    #[error("Invalid component {id}: {source}")]
    InvalidComponent {
        id: String,
        #[source]
        source: ComponentError,
    },

    #[error("Node {id} has no connected links")]
    IsolatedNode { id: String },

    #[error("Inactive node {id} is connected by link {link}")]
    InactiveNodeLinked { id: String, link: String },

    #[error("Network has no active reservoir or tank")]
    NoBoundarySource,

    #[error("Invalid run option {field}: {reason}")]
    InvalidRunOption { field: &'static str, reason: String },
}

impl ValidationError {
    /// Identifiers of the components the error is about.
    pub fn offending_ids(&self) -> Vec<String> {
        match self {
            ValidationError::DuplicateId { id }
            | ValidationError::InvalidId { id, .. }
            | ValidationError::InvalidComponent { id, .. }
            | ValidationError::IsolatedNode { id } => vec![id.clone()],
            ValidationError::UnknownNode { link, node }
            | ValidationError::SelfLoop { link, node } => vec![link.clone(), node.clone()],
            ValidationError::InactiveNodeLinked { id, link } => vec![id.clone(), link.clone()],
            ValidationError::NoBoundarySource | ValidationError::InvalidRunOption { .. } => {
                Vec::new()
            }
        }
    }

    pub(crate) fn component(id: &str, source: ComponentError) -> Self {
        ValidationError::InvalidComponent {
            id: id.to_string(),
            source,
        }
    }
}

/// Structural checks over the record set: identifiers, link references,
/// isolation, and the presence of a boundary head source.
///
/// Component attributes are checked when the builder constructs each
/// component.
pub fn validate_records(records: &NetworkRecords) -> Result<(), ValidationError> {
    let mut seen = HashSet::new();
    let node_ids = records.node_ids().map(|(id, _)| id);
    let link_ids = records.link_ends().map(|l| l.id);
    for id in node_ids.chain(link_ids) {
        check_id(id)?;
        if !seen.insert(id) {
            return Err(ValidationError::DuplicateId { id: id.to_string() });
        }
    }

    let inactive: HashMap<&str, bool> = records.node_ids().collect();
    let mut degree: HashMap<&str, usize> = HashMap::new();
    for link in records.link_ends() {
        for node in [link.from_node_id, link.to_node_id] {
            match inactive.get(node) {
                None => {
                    return Err(ValidationError::UnknownNode {
                        link: link.id.to_string(),
                        node: node.to_string(),
                    });
                }
                Some(true) => {
                    return Err(ValidationError::InactiveNodeLinked {
                        id: node.to_string(),
                        link: link.id.to_string(),
                    });
                }
                Some(false) => *degree.entry(node).or_default() += 1,
            }
        }
        if link.from_node_id == link.to_node_id {
            return Err(ValidationError::SelfLoop {
                link: link.id.to_string(),
                node: link.from_node_id.to_string(),
            });
        }
    }

    for (id, is_inactive) in records.node_ids() {
        if !is_inactive && !degree.contains_key(id) {
            return Err(ValidationError::IsolatedNode { id: id.to_string() });
        }
    }

    let has_source = records.reservoirs.iter().any(|r| !r.inactive)
        || records.tanks.iter().any(|t| !t.inactive);
    if !has_source {
        return Err(ValidationError::NoBoundarySource);
    }

    Ok(())
}

fn check_id(id: &str) -> Result<(), ValidationError> {
    let reason = if id.is_empty() {
        "empty"
    } else if id.chars().any(|c| c.is_whitespace() || c == ';') {
        "contains whitespace or ';'"
    } else if id.starts_with('[') {
        "starts with '['"
    } else {
        return Ok(());
    };
    Err(ValidationError::InvalidId {
        id: id.to_string(),
        reason,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{JunctionRecord, PipeRecord, ReservoirRecord};
    use hf_components::LinkStatus;

    fn junction(id: &str) -> JunctionRecord {
        JunctionRecord {
            id: id.into(),
            elevation_m: 10.0,
            base_demand_m3s: 0.0,
            inactive: false,
        }
    }

    fn pipe(id: &str, from: &str, to: &str) -> PipeRecord {
        PipeRecord {
            id: id.into(),
            from_node_id: from.into(),
            to_node_id: to.into(),
            length_m: 100.0,
            diameter_m: 0.2,
            roughness: 120.0,
            status: LinkStatus::Open,
        }
    }

    fn base() -> NetworkRecords {
        NetworkRecords {
            junctions: vec![junction("J1")],
            reservoirs: vec![ReservoirRecord {
                id: "R1".into(),
                head_m: 100.0,
                inactive: false,
            }],
            pipes: vec![pipe("P1", "R1", "J1")],
            ..Default::default()
        }
    }

    #[test]
    fn minimal_network_is_valid() {
        validate_records(&base()).unwrap();
    }

    #[test]
    fn duplicate_across_categories() {
        let mut r = base();
        r.pipes[0].id = "J1".into();
        let err = validate_records(&r).unwrap_err();
        assert_eq!(err, ValidationError::DuplicateId { id: "J1".into() });
        assert_eq!(err.offending_ids(), vec!["J1".to_string()]);
    }

    #[test]
    fn unknown_node_is_named() {
        let mut r = base();
        r.pipes.push(pipe("P2", "J1", "J9"));
        let err = validate_records(&r).unwrap_err();
        assert!(matches!(err, ValidationError::UnknownNode { ref node, .. } if node == "J9"));
        assert_eq!(err.offending_ids(), vec!["P2".to_string(), "J9".to_string()]);
    }

    #[test]
    fn isolated_node_unless_inactive() {
        let mut r = base();
        r.junctions.push(junction("J2"));
        assert_eq!(
            validate_records(&r).unwrap_err(),
            ValidationError::IsolatedNode { id: "J2".into() }
        );
        r.junctions[1].inactive = true;
        validate_records(&r).unwrap();
    }

    #[test]
    fn inactive_node_cannot_be_linked() {
        let mut r = base();
        r.junctions[0].inactive = true;
        assert!(matches!(
            validate_records(&r).unwrap_err(),
            ValidationError::InactiveNodeLinked { .. }
        ));
    }

    #[test]
    fn needs_boundary_source() {
        let mut r = base();
        r.reservoirs.clear();
        r.junctions.push(junction("R1"));
        assert_eq!(validate_records(&r).unwrap_err(), ValidationError::NoBoundarySource);
    }

    #[test]
    fn rejects_self_loop_and_bad_ids() {
        let mut r = base();
        r.pipes.push(pipe("P2", "J1", "J1"));
        assert!(matches!(
            validate_records(&r).unwrap_err(),
            ValidationError::SelfLoop { .. }
        ));

        let mut r = base();
        r.junctions.push(junction("J 2"));
        assert!(matches!(
            validate_records(&r).unwrap_err(),
            ValidationError::InvalidId { .. }
        ));
    }
}
