//! Graph validation logic.

use hf_core::LinkId;

use crate::error::{GraphError, GraphResult};
use crate::graph::{Incidence, Link, Node};

/// Validate the graph structure: all endpoints exist and are distinct.
pub(crate) fn validate_structure(nodes: &[Node], links: &[Link]) -> GraphResult<()> {
    for link in links {
        for node in link.ends {
            if node.slot() >= nodes.len() {
                return Err(GraphError::InvalidNodeRef {
                    link: link.id,
                    node,
                });
            }
        }
        if link.start() == link.end() {
            return Err(GraphError::SelfLoop {
                link: link.id,
                node: link.start(),
            });
        }
    }
    Ok(())
}

/// Validate adjacency lists for consistency.
pub(crate) fn validate_adjacency(
    nodes: &[Node],
    links: &[Link],
    node_offsets: &[usize],
    incidences: &[Incidence],
) -> GraphResult<()> {
    if node_offsets.len() != nodes.len() + 1 {
        return Err(GraphError::IdNotFound {
            what: "node offset",
        });
    }

    let mut seen = vec![0_u8; links.len()];
    for node in nodes {
        let idx = node.id.slot();
        for inc in &incidences[node_offsets[idx]..node_offsets[idx + 1]] {
            let link = links
                .get(inc.link.slot())
                .ok_or(GraphError::IdNotFound { what: "link" })?;
            if link.other(node.id).is_none() {
                return Err(GraphError::InconsistentAdjacency {
                    link: inc.link,
                    node: node.id,
                });
            }
            seen[inc.link.slot()] += 1;
        }
    }

    // Every link must appear exactly twice (once per end)
    if let Some(pos) = seen.iter().position(|&count| count != 2) {
        let link = &links[pos];
        return Err(GraphError::InconsistentAdjacency {
            link: LinkId::from_index(pos as u32),
            node: link.start(),
        });
    }

    Ok(())
}
