//! hf-graph: topology layer for hydroflow.
//!
//! Provides:
//! - Arena graph data structures (Node, Link, Incidence, Graph)
//! - Incremental graph builder with structural validation
//! - Contiguous indexing of node subsets for solver unknowns
//! - Reachability and fundamental-loop queries
//!
//! Parallel links between the same node pair are allowed; self-loops are not.
//!
//! # Example
//!
//! ```
//! use hf_graph::GraphBuilder;
//!
//! let mut builder = GraphBuilder::new();
//! let r = builder.add_node("R1");
//! let j = builder.add_node("J1");
//! builder.add_link("P1", r, j);
//! let graph = builder.build().unwrap();
//!
//! assert_eq!(graph.nodes().len(), 2);
//! assert_eq!(graph.links().len(), 1);
//! ```

pub mod builder;
pub mod connectivity;
pub mod error;
pub mod graph;
pub mod indexing;
pub(crate) mod validate;

// Re-exports for ergonomics
pub use builder::GraphBuilder;
pub use connectivity::{LoopEdge, fundamental_loops, reachable_from};
pub use error::{GraphError, GraphResult};
pub use graph::{EndKind, Graph, Incidence, Link, Node};
pub use indexing::IndexMap;
