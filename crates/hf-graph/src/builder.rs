//! Incremental graph builder.

use hf_core::{LinkId, NodeId};

use crate::error::GraphResult;
use crate::graph::{EndKind, Graph, Incidence, Link, Node};
use crate::validate;

/// Builder for constructing a graph incrementally.
///
/// Use `add_node` and `add_link` to build up the graph,
/// then call `build()` to validate and freeze it into an immutable `Graph`.
#[derive(Debug, Default)]
pub struct GraphBuilder {
    nodes: Vec<Node>,
    links: Vec<Link>,
}

impl GraphBuilder {
    /// Create a new empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a node to the graph and return its ID.
    pub fn add_node(&mut self, name: impl Into<String>) -> NodeId {
        let id = NodeId::from_index(self.nodes.len() as u32);
        self.nodes.push(Node {
            id,
            name: name.into(),
        });
        id
    }

    /// Add a link from `start` to `end` and return its ID.
    ///
    /// Endpoints are checked in `build()`.
    pub fn add_link(&mut self, name: impl Into<String>, start: NodeId, end: NodeId) -> LinkId {
        let id = LinkId::from_index(self.links.len() as u32);
        self.links.push(Link {
            id,
            name: name.into(),
            ends: [start, end],
        });
        id
    }

    /// Build and validate the graph, returning an immutable `Graph`.
    pub fn build(self) -> GraphResult<Graph> {
        validate::validate_structure(&self.nodes, &self.links)?;

        let (node_offsets, incidences) = Self::build_adjacency(&self.nodes, &self.links);

        validate::validate_adjacency(&self.nodes, &self.links, &node_offsets, &incidences)?;

        Ok(Graph {
            nodes: self.nodes,
            links: self.links,
            node_offsets,
            incidences,
        })
    }

    /// Build compact adjacency lists: for each node, collect its incident link ends.
    fn build_adjacency(nodes: &[Node], links: &[Link]) -> (Vec<usize>, Vec<Incidence>) {
        let mut per_node: Vec<Vec<Incidence>> = vec![Vec::new(); nodes.len()];
        for link in links {
            per_node[link.start().slot()].push(Incidence {
                link: link.id,
                kind: EndKind::Start,
            });
            per_node[link.end().slot()].push(Incidence {
                link: link.id,
                kind: EndKind::End,
            });
        }

        let mut offsets = Vec::with_capacity(nodes.len() + 1);
        let mut flat = Vec::with_capacity(links.len() * 2);
        offsets.push(0);
        for list in per_node {
            flat.extend(list);
            offsets.push(flat.len());
        }

        (offsets, flat)
    }
}
