//! Property-based tests for the graph store and detector.
//!
//! Uses proptest to generate random DAGs, random graphs with a planted
//! cycle, and random sequence operation scripts, then checks structural
//! invariants.

use kahn_core::graph::Graph;
use kahn_core::id::VertexId;
use kahn_core::sequence::{Sequence, SequenceError};
use kahn_core::test_utils::*;
use kahn_core::topo::{Detection, detect};
use proptest::prelude::*;
use std::collections::VecDeque;

// ===========================================================================
// Generators
// ===========================================================================

/// A random DAG: every edge goes from a lower to a higher index under a
/// random relabelling, so the graph is acyclic but ids are not pre-sorted.
fn arb_dag(max_vertices: usize) -> impl Strategy<Value = Graph> {
    (1..=max_vertices).prop_flat_map(|n| {
        (
            Just((0..n).collect::<Vec<usize>>()).prop_shuffle(),
            proptest::collection::vec((0..n, 0..n), 0..n * 3),
        )
            .prop_map(move |(labels, pairs)| {
                let mut graph = Graph::new(n).unwrap();
                for (a, b) in pairs {
                    if a == b {
                        continue;
                    }
                    let (lo, hi) = if a < b { (a, b) } else { (b, a) };
                    // Duplicates are rejected; that is fine here.
                    let _ = graph.add_edge(VertexId(labels[lo]), VertexId(labels[hi]));
                }
                graph
            })
    })
}

/// A random graph guaranteed to contain the cycle `0 -> 1 -> ... -> k -> 0`.
fn arb_cyclic(max_vertices: usize) -> impl Strategy<Value = Graph> {
    (2..=max_vertices).prop_flat_map(|n| {
        (
            1..n,
            proptest::collection::vec((0..n, 0..n), 0..n * 2),
        )
            .prop_map(move |(k, pairs)| {
                let mut graph = Graph::new(n).unwrap();
                for i in 0..k {
                    graph.add_edge(VertexId(i), VertexId(i + 1)).unwrap();
                }
                graph.add_edge(VertexId(k), VertexId(0)).unwrap();
                for (a, b) in pairs {
                    let _ = graph.add_edge(VertexId(a), VertexId(b));
                }
                graph
            })
    })
}

#[derive(Debug, Clone)]
enum SeqOp {
    Append(u16),
    PopFront,
    RemoveNth(usize),
}

fn arb_seq_ops(max_ops: usize) -> impl Strategy<Value = Vec<SeqOp>> {
    proptest::collection::vec(
        prop_oneof![
            any::<u16>().prop_map(SeqOp::Append),
            Just(SeqOp::PopFront),
            (0..32usize).prop_map(SeqOp::RemoveNth),
        ],
        1..=max_ops,
    )
}

// ===========================================================================
// Properties
// ===========================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    /// DAG: the order is a permutation and every edge points forward.
    #[test]
    fn dag_order_is_topological(graph in arb_dag(40)) {
        let detection = detect(&graph);
        let order = detection.order().expect("generated graph is acyclic");
        assert_topological(&graph, order);
    }

    /// Any graph holding a cycle is reported as cyclic, with no order.
    #[test]
    fn planted_cycle_is_detected(graph in arb_cyclic(30)) {
        let detection = detect(&graph);
        prop_assert!(detection.order().is_none());
        match detection {
            Detection::Cycle { unresolved } => {
                prop_assert!(unresolved.contains(&VertexId(0)));
                prop_assert!(unresolved.windows(2).all(|w| w[0] < w[1]));
            }
            Detection::Acyclic { .. } => prop_assert!(false, "cycle went unnoticed"),
        }
    }

    /// Detection leaves the graph untouched, so a second run agrees.
    #[test]
    fn detection_is_repeatable(graph in arb_cyclic(20)) {
        let degrees: Vec<usize> = graph.vertices().map(|v| v.in_degree()).collect();
        let first = detect(&graph);
        let second = detect(&graph);
        prop_assert_eq!(first, second);
        let after: Vec<usize> = graph.vertices().map(|v| v.in_degree()).collect();
        prop_assert_eq!(degrees, after);
    }

    /// No edges: ascending ids.
    #[test]
    fn edgeless_graph_is_ascending(n in 1..200usize) {
        let graph = Graph::new(n).unwrap();
        let expected: Vec<VertexId> = (0..n).map(VertexId).collect();
        let detection = detect(&graph);
        prop_assert_eq!(detection.order(), Some(expected.as_slice()));
    }

    /// Adjacency sides stay in sync and the edge count matches.
    #[test]
    fn adjacency_sides_agree(graph in arb_cyclic(25)) {
        let mut out_total = 0;
        for vertex in graph.vertices() {
            out_total += vertex.out_degree();
            for &to in vertex.out_neighbours() {
                let back = graph.in_neighbours(to).unwrap();
                prop_assert!(back.find(&vertex.id()).is_some());
            }
        }
        prop_assert_eq!(out_total, graph.edge_count());
        let in_total: usize = graph.vertices().map(|v| v.in_degree()).sum();
        prop_assert_eq!(in_total, graph.edge_count());
    }

    /// The sequence behaves like a `VecDeque` model under random scripts.
    #[test]
    fn sequence_matches_model(ops in arb_seq_ops(200)) {
        let mut seq = Sequence::new();
        let mut model: VecDeque<u16> = VecDeque::new();
        let mut handles = VecDeque::new();

        for op in ops {
            match op {
                SeqOp::Append(x) => {
                    handles.push_back(seq.append(x));
                    model.push_back(x);
                }
                SeqOp::PopFront => {
                    match model.pop_front() {
                        Some(expected) => {
                            handles.pop_front();
                            prop_assert_eq!(seq.pop_front(), Ok(expected));
                        }
                        None => prop_assert_eq!(seq.pop_front(), Err(SequenceError::Empty)),
                    }
                }
                SeqOp::RemoveNth(idx) => {
                    if !model.is_empty() {
                        let idx = idx % model.len();
                        let handle = handles.remove(idx).unwrap();
                        let expected = model.remove(idx).unwrap();
                        prop_assert_eq!(seq.remove(handle), Ok(expected));
                        // A handle is single-use.
                        prop_assert_eq!(seq.remove(handle), Err(SequenceError::ForeignNode));
                    }
                }
            }

            prop_assert_eq!(seq.len(), model.len());
            let contents: Vec<u16> = seq.iter().copied().collect();
            let expected: Vec<u16> = model.iter().copied().collect();
            prop_assert_eq!(contents, expected);
        }
    }
}
