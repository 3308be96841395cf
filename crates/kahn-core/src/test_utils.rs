//! Shared test helpers for unit tests, integration tests, and benchmarks.
//!
//! Gated behind `#[cfg(any(test, feature = "test-utils"))]` so these helpers
//! are available everywhere tests run (via the `test-utils` feature).

use crate::graph::Graph;
use crate::id::VertexId;
use crate::sequence::Sequence;
use std::collections::HashMap;

// ===========================================================================
// Id helpers
// ===========================================================================

pub fn vids(ids: &[usize]) -> Vec<VertexId> {
    ids.iter().copied().map(VertexId).collect()
}

pub fn neighbours(seq: &Sequence<VertexId>) -> Vec<VertexId> {
    seq.iter().copied().collect()
}

// ===========================================================================
// Graph builders
// ===========================================================================

/// Build a graph from a literal edge list. Panics on a rejected edge.
pub fn graph_with_edges(n: usize, edges: &[(usize, usize)]) -> Graph {
    Graph::from_edges(n, edges.iter().copied()).expect("test edges should be valid")
}

/// `0 -> 1 -> ... -> n-1`.
pub fn chain(n: usize) -> Graph {
    let edges: Vec<(usize, usize)> = (1..n).map(|i| (i - 1, i)).collect();
    graph_with_edges(n, &edges)
}

/// `0 -> 1, 0 -> 2, 1 -> 3, 2 -> 3`.
pub fn diamond() -> Graph {
    graph_with_edges(4, &[(0, 1), (0, 2), (1, 3), (2, 3)])
}

/// `0 -> 1 -> ... -> n-1 -> 0`.
pub fn ring(n: usize) -> Graph {
    let edges: Vec<(usize, usize)> = (0..n).map(|i| (i, (i + 1) % n)).collect();
    graph_with_edges(n, &edges)
}

/// A DAG of `layers` layers with `width` vertices each. Every vertex links to
/// the vertex directly below it and to its right-hand neighbour below.
pub fn layered_dag(layers: usize, width: usize) -> Graph {
    let mut edges = Vec::new();
    for layer in 0..layers.saturating_sub(1) {
        for col in 0..width {
            let from = layer * width + col;
            let below = (layer + 1) * width;
            edges.push((from, below + col));
            if col + 1 < width {
                edges.push((from, below + col + 1));
            }
        }
    }
    graph_with_edges(layers * width, &edges)
}

// ===========================================================================
// Assertions
// ===========================================================================

/// Assert `order` is a permutation of the graph's vertices and every edge
/// points forward in it.
pub fn assert_topological(graph: &Graph, order: &[VertexId]) {
    assert_eq!(
        order.len(),
        graph.vertex_count(),
        "order should contain every vertex exactly once"
    );

    let position: HashMap<VertexId, usize> =
        order.iter().enumerate().map(|(i, &v)| (v, i)).collect();
    assert_eq!(position.len(), order.len(), "duplicate vertex in order");

    for (from, to) in graph.edges() {
        assert!(
            position[&from] < position[&to],
            "edge {from} -> {to} points backwards in {order:?}"
        );
    }
}
