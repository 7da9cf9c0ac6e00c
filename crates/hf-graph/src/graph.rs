//! Core graph data structures.

use hf_core::{LinkId, NodeId};

/// Which end of a link touches a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EndKind {
    /// Link start (positive flow leaves through this end).
    Start,
    /// Link end (positive flow arrives through this end).
    End,
}

impl EndKind {
    /// Sign of a link's positive flow as seen by the node at this end:
    /// `-1` for outflow at the start, `+1` for inflow at the end.
    pub fn inflow_sign(self) -> f64 {
        match self {
            EndKind::Start => -1.0,
            EndKind::End => 1.0,
        }
    }
}

/// A node in the network arena. Hydraulic data lives beside the graph,
/// indexed by the same id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    pub id: NodeId,
    pub name: String,
}

/// A two-ended link between distinct nodes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Link {
    pub id: LinkId,
    pub name: String,
    /// `[start, end]`
    pub ends: [NodeId; 2],
}

impl Link {
    pub fn start(&self) -> NodeId {
        self.ends[0]
    }

    pub fn end(&self) -> NodeId {
        self.ends[1]
    }

    /// The node across the link from `node`, if `node` is one of its ends.
    pub fn other(&self, node: NodeId) -> Option<NodeId> {
        if node == self.ends[0] {
            Some(self.ends[1])
        } else if node == self.ends[1] {
            Some(self.ends[0])
        } else {
            None
        }
    }
}

/// One entry of a node's adjacency list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Incidence {
    pub link: LinkId,
    pub kind: EndKind,
}

/// The graph: a validated, immutable collection of nodes and links.
///
/// Adjacency is stored compactly: node i's incident link ends are
/// `incidences[offsets[i]..offsets[i+1]]`, sorted by link id.
#[derive(Debug, Clone)]
pub struct Graph {
    pub(crate) nodes: Vec<Node>,
    pub(crate) links: Vec<Link>,
    pub(crate) node_offsets: Vec<usize>,
    pub(crate) incidences: Vec<Incidence>,
}

impl Graph {
    /// Return all nodes.
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// Return all links.
    pub fn links(&self) -> &[Link] {
        &self.links
    }

    /// Get a node by ID (returns None if ID out of bounds).
    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.slot())
    }

    /// Get a link by ID (returns None if ID out of bounds).
    pub fn link(&self, id: LinkId) -> Option<&Link> {
        self.links.get(id.slot())
    }

    /// Link ends incident to a given node.
    pub fn incident(&self, node_id: NodeId) -> &[Incidence] {
        let idx = node_id.slot();
        if idx >= self.nodes.len() {
            return &[];
        }
        let start = self.node_offsets[idx];
        let end = self.node_offsets[idx + 1];
        &self.incidences[start..end]
    }

    /// Number of link ends touching a node.
    pub fn degree(&self, node_id: NodeId) -> usize {
        self.incident(node_id).len()
    }

    /// Look up a node by name (linear scan).
    pub fn find_node(&self, name: &str) -> Option<NodeId> {
        self.nodes.iter().find(|n| n.name == name).map(|n| n.id)
    }

    /// Look up a link by name (linear scan).
    pub fn find_link(&self, name: &str) -> Option<LinkId> {
        self.links.iter().find(|l| l.name == name).map(|l| l.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hf_core::Id;

    #[test]
    fn end_kind_signs() {
        assert_eq!(EndKind::Start.inflow_sign(), -1.0);
        assert_eq!(EndKind::End.inflow_sign(), 1.0);
    }

    #[test]
    fn link_accessors() {
        let link = Link {
            id: Id::from_index(0),
            name: "P1".into(),
            ends: [Id::from_index(3), Id::from_index(7)],
        };
        assert_eq!(link.start().index(), 3);
        assert_eq!(link.end().index(), 7);
        assert_eq!(link.other(Id::from_index(3)), Some(Id::from_index(7)));
        assert_eq!(link.other(Id::from_index(1)), None);
    }
}
