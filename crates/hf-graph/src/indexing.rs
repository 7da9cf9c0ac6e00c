//! Contiguous indexing of node subsets.
//!
//! Solvers only carry unknowns for some nodes (junctions); this maps those
//! node IDs to `0..N` and back.

use hf_core::NodeId;

use crate::error::{GraphError, GraphResult};
use crate::graph::Graph;

/// Bidirectional map between a subset of node IDs and contiguous indices.
#[derive(Debug, Clone)]
pub struct IndexMap {
    /// index -> NodeId
    node_ids: Vec<NodeId>,
    /// NodeId slot -> index (None if the node is not in the subset)
    node_to_idx: Vec<Option<usize>>,
}

impl IndexMap {
    /// Index every node in the graph.
    pub fn from_graph(graph: &Graph) -> Self {
        Self::for_nodes(graph, |_| true)
    }

    /// Index the nodes selected by `keep`, in node-id order.
    pub fn for_nodes(graph: &Graph, mut keep: impl FnMut(NodeId) -> bool) -> Self {
        let mut node_ids = Vec::new();
        let mut node_to_idx = vec![None; graph.nodes().len()];
        for node in graph.nodes() {
            if keep(node.id) {
                node_to_idx[node.id.slot()] = Some(node_ids.len());
                node_ids.push(node.id);
            }
        }
        Self {
            node_ids,
            node_to_idx,
        }
    }

    pub fn len(&self) -> usize {
        self.node_ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.node_ids.is_empty()
    }

    /// Contiguous index of a node, or None if it is not part of the subset.
    pub fn index_of(&self, id: NodeId) -> Option<usize> {
        self.node_to_idx.get(id.slot()).copied().flatten()
    }

    /// Node ID at a contiguous index.
    pub fn node_at(&self, idx: usize) -> GraphResult<NodeId> {
        self.node_ids
            .get(idx)
            .copied()
            .ok_or(GraphError::IdNotFound { what: "node index" })
    }

    /// Node IDs in index order.
    pub fn node_ids(&self) -> &[NodeId] {
        &self.node_ids
    }
}
