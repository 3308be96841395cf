#![no_main]
use arbitrary::Arbitrary;
use kahn_core::graph::Graph;
use kahn_core::id::VertexId;
use kahn_core::test_utils::assert_topological;
use kahn_core::topo::{Detection, detect};
use libfuzzer_sys::fuzz_target;

/// A structured edge operation for fuzzing.
#[derive(Arbitrary, Debug)]
enum FuzzOp {
    Add { from: u8, to: u8 },
    Remove { from: u8, to: u8 },
    Detect,
}

/// Top-level fuzz input: a vertex count and a sequence of operations.
#[derive(Arbitrary, Debug)]
struct FuzzInput {
    vertices: u8,
    ops: Vec<FuzzOp>,
}

fuzz_target!(|input: FuzzInput| {
    let Ok(mut graph) = Graph::new(usize::from(input.vertices)) else {
        return;
    };

    // Limit operations to prevent timeouts.
    let max_ops = input.ops.len().min(500);

    for op in &input.ops[..max_ops] {
        match *op {
            FuzzOp::Add { from, to } => {
                let _ = graph.add_edge(VertexId(from.into()), VertexId(to.into()));
            }
            FuzzOp::Remove { from, to } => {
                let _ = graph.remove_edge(VertexId(from.into()), VertexId(to.into()));
            }
            FuzzOp::Detect => {
                if let Detection::Acyclic { order } = detect(&graph) {
                    assert_topological(&graph, &order);
                }
            }
        }
    }

    let in_total: usize = graph.vertices().map(|v| v.in_degree()).sum();
    assert_eq!(in_total, graph.edge_count());
});
