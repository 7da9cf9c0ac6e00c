//! Integration tests for hf-graph.

use hf_graph::{EndKind, GraphBuilder, IndexMap, fundamental_loops, reachable_from};
use proptest::prelude::*;

#[test]
fn build_minimal_graph() {
    // Build: R -> [P1] -> J
    let mut builder = GraphBuilder::new();
    let r = builder.add_node("R");
    let j = builder.add_node("J");
    let p1 = builder.add_link("P1", r, j);

    let graph = builder.build().unwrap();

    assert_eq!(graph.nodes().len(), 2);
    assert_eq!(graph.links().len(), 1);

    let r_inc = graph.incident(r);
    assert_eq!(r_inc.len(), 1);
    assert_eq!(r_inc[0].link, p1);
    assert_eq!(r_inc[0].kind, EndKind::Start);

    let link = graph.link(p1).unwrap();
    assert_eq!(link.start(), r);
    assert_eq!(link.end(), j);
    assert_eq!(graph.find_node("J"), Some(j));
    assert_eq!(graph.find_link("P1"), Some(p1));
}

#[test]
fn chain_adjacency_counts() {
    // N1 -> N2 -> N3
    let mut builder = GraphBuilder::new();
    let n1 = builder.add_node("N1");
    let n2 = builder.add_node("N2");
    let n3 = builder.add_node("N3");
    builder.add_link("L1", n1, n2);
    builder.add_link("L2", n2, n3);
    let graph = builder.build().unwrap();

    assert_eq!(graph.degree(n1), 1);
    assert_eq!(graph.degree(n2), 2);
    assert_eq!(graph.degree(n3), 1);

    let map = IndexMap::from_graph(&graph);
    assert_eq!(map.len(), 3);
}

#[test]
fn two_islands_are_not_mutually_reachable() {
    let mut builder = GraphBuilder::new();
    let a = builder.add_node("A");
    let b = builder.add_node("B");
    let c = builder.add_node("C");
    let d = builder.add_node("D");
    builder.add_link("AB", a, b);
    builder.add_link("CD", c, d);
    let graph = builder.build().unwrap();

    let seen = reachable_from(&graph, [a], |_| true);
    assert_eq!(seen, vec![true, true, false, false]);
}

fn count_components(n: usize, edges: &[(usize, usize)]) -> usize {
    let mut parent: Vec<usize> = (0..n).collect();
    fn find(p: &mut Vec<usize>, x: usize) -> usize {
        if p[x] != x {
            let r = find(p, p[x]);
            p[x] = r;
        }
        p[x]
    }
    for &(a, b) in edges {
        let ra = find(&mut parent, a);
        let rb = find(&mut parent, b);
        if ra != rb {
            parent[ra] = rb;
        }
    }
    (0..n).filter(|&x| find(&mut parent, x) == x).count()
}

proptest! {
    #[test]
    fn loop_count_matches_cyclomatic_number(
        n in 2_usize..12,
        raw in prop::collection::vec((0_usize..12, 0_usize..12), 1..30),
    ) {
        let edges: Vec<(usize, usize)> = raw
            .into_iter()
            .map(|(a, b)| (a % n, b % n))
            .filter(|(a, b)| a != b)
            .collect();

        let mut builder = GraphBuilder::new();
        let ids: Vec<_> = (0..n).map(|i| builder.add_node(format!("N{i}"))).collect();
        for (k, &(a, b)) in edges.iter().enumerate() {
            builder.add_link(format!("L{k}"), ids[a], ids[b]);
        }
        let graph = builder.build().unwrap();

        let loops = fundamental_loops(&graph, |_| true);
        let expected = edges.len() + count_components(n, &edges) - n;
        prop_assert_eq!(loops.len(), expected);

        // Each loop must close: walking it returns to the starting node
        for lp in &loops {
            let first = graph.link(lp[0].link).unwrap();
            let mut at = if lp[0].sign > 0.0 { first.end() } else { first.start() };
            let origin = if lp[0].sign > 0.0 { first.start() } else { first.end() };
            for edge in &lp[1..] {
                let l = graph.link(edge.link).unwrap();
                let (from, to) = if edge.sign > 0.0 { (l.start(), l.end()) } else { (l.end(), l.start()) };
                prop_assert_eq!(from, at);
                at = to;
            }
            prop_assert_eq!(at, origin);
        }
    }
}
