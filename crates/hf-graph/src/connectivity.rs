//! Reachability and loop structure of a graph.

use std::collections::VecDeque;

use hf_core::{LinkId, NodeId};

use crate::graph::Graph;

/// Breadth-first reachability from a set of source nodes.
///
/// Links for which `passable` returns false are treated as absent.
/// Returns a per-node flag indexed by node slot.
pub fn reachable_from(
    graph: &Graph,
    sources: impl IntoIterator<Item = NodeId>,
    mut passable: impl FnMut(LinkId) -> bool,
) -> Vec<bool> {
    let mut seen = vec![false; graph.nodes().len()];
    let mut queue = VecDeque::new();
    for s in sources {
        if s.slot() < seen.len() && !seen[s.slot()] {
            seen[s.slot()] = true;
            queue.push_back(s);
        }
    }

    while let Some(node) = queue.pop_front() {
        for inc in graph.incident(node) {
            if !passable(inc.link) {
                continue;
            }
            let Some(other) = graph.link(inc.link).and_then(|l| l.other(node)) else {
                continue;
            };
            if !seen[other.slot()] {
                seen[other.slot()] = true;
                queue.push_back(other);
            }
        }
    }

    seen
}

/// One link traversed inside a loop. `sign` is `+1.0` when the loop runs
/// start -> end along the link, `-1.0` otherwise.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LoopEdge {
    pub link: LinkId,
    pub sign: f64,
}

/// Independent (fundamental) loops with respect to a BFS spanning forest.
///
/// Each link outside the forest closes exactly one loop, so the number of
/// loops is `links - nodes + components` over the included links.
pub fn fundamental_loops(
    graph: &Graph,
    mut include: impl FnMut(LinkId) -> bool,
) -> Vec<Vec<LoopEdge>> {
    let n = graph.nodes().len();
    let mut visited = vec![false; n];
    let mut depth = vec![0_usize; n];
    let mut parent: Vec<Option<(NodeId, LinkId)>> = vec![None; n];
    let mut in_tree = vec![false; graph.links().len()];
    let included: Vec<bool> = graph.links().iter().map(|l| include(l.id)).collect();

    for root in graph.nodes() {
        if visited[root.id.slot()] {
            continue;
        }
        visited[root.id.slot()] = true;
        let mut queue = VecDeque::from([root.id]);
        while let Some(node) = queue.pop_front() {
            for inc in graph.incident(node) {
                if !included[inc.link.slot()] {
                    continue;
                }
                let Some(other) = graph.link(inc.link).and_then(|l| l.other(node)) else {
                    continue;
                };
                if !visited[other.slot()] {
                    visited[other.slot()] = true;
                    depth[other.slot()] = depth[node.slot()] + 1;
                    parent[other.slot()] = Some((node, inc.link));
                    in_tree[inc.link.slot()] = true;
                    queue.push_back(other);
                }
            }
        }
    }

    let sign_along = |link: LinkId, from: NodeId| -> f64 {
        match graph.link(link) {
            Some(l) if l.start() == from => 1.0,
            _ => -1.0,
        }
    };

    let mut loops = Vec::new();
    for link in graph.links() {
        if !included[link.id.slot()] || in_tree[link.id.slot()] {
            continue;
        }
        let mut up_from_end = Vec::new();
        let mut down_to_start = Vec::new();
        let (mut x, mut y) = (link.end(), link.start());
        while x != y {
            if depth[x.slot()] >= depth[y.slot()] {
                let Some((p, pl)) = parent[x.slot()] else { break };
                up_from_end.push(LoopEdge {
                    link: pl,
                    sign: sign_along(pl, x),
                });
                x = p;
            } else {
                let Some((p, pl)) = parent[y.slot()] else { break };
                down_to_start.push(LoopEdge {
                    link: pl,
                    sign: sign_along(pl, p),
                });
                y = p;
            }
        }

        let mut edges = Vec::with_capacity(1 + up_from_end.len() + down_to_start.len());
        edges.push(LoopEdge {
            link: link.id,
            sign: 1.0,
        });
        edges.extend(up_from_end);
        edges.extend(down_to_start.into_iter().rev());
        loops.push(edges);
    }

    loops
}
