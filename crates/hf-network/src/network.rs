//! The built network: graph arena plus hydraulic element data.

use hf_components::{LinkKind, NodeKind, Tank};
use hf_core::{LinkId, NodeId};
use hf_graph::{Graph, Link, Node};

/// Validated, immutable network topology.
///
/// Element data is stored in vectors indexed by the graph's node and link
/// slots. Tank levels are not stored here; they are run state owned by the
/// extended-period controller.
#[derive(Debug, Clone)]
pub struct Network {
    graph: Graph,
    nodes: Vec<NodeKind>,
    links: Vec<LinkKind>,
    active: Vec<bool>,
}

impl Network {
    pub(crate) fn new(
        graph: Graph,
        nodes: Vec<NodeKind>,
        links: Vec<LinkKind>,
        active: Vec<bool>,
    ) -> Self {
        Self {
            graph,
            nodes,
            links,
            active,
        }
    }

    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn link_count(&self) -> usize {
        self.links.len()
    }

    pub fn node_kind(&self, id: NodeId) -> Option<&NodeKind> {
        self.nodes.get(id.slot())
    }

    pub fn link_kind(&self, id: LinkId) -> Option<&LinkKind> {
        self.links.get(id.slot())
    }

    /// Whether a node takes part in the solve.
    pub fn is_active(&self, id: NodeId) -> bool {
        self.active.get(id.slot()).copied().unwrap_or(false)
    }

    pub fn node_name(&self, id: NodeId) -> Option<&str> {
        self.graph.node(id).map(|n| n.name.as_str())
    }

    pub fn link_name(&self, id: LinkId) -> Option<&str> {
        self.graph.link(id).map(|l| l.name.as_str())
    }

    /// All nodes with their element data, in id order.
    pub fn nodes(&self) -> impl Iterator<Item = (&Node, &NodeKind)> {
        self.graph.nodes().iter().zip(&self.nodes)
    }

    /// Active nodes only.
    pub fn active_nodes(&self) -> impl Iterator<Item = (&Node, &NodeKind)> {
        self.nodes().filter(|(n, _)| self.is_active(n.id))
    }

    /// All links with their element data, in id order.
    pub fn links(&self) -> impl Iterator<Item = (&Link, &LinkKind)> {
        self.graph.links().iter().zip(&self.links)
    }

    /// Active tanks.
    pub fn tanks(&self) -> impl Iterator<Item = (NodeId, &Tank)> {
        self.active_nodes()
            .filter_map(|(n, kind)| kind.as_tank().map(|t| (n.id, t)))
    }
}
