//! Kahn Core -- directed graphs with in/out adjacency and cycle detection.
//!
//! This crate provides the vertex store, the linked sequence container it is
//! built on, Kahn's topological sort, and the adjacency-matrix text import.
//!
//! # Pipeline
//!
//! 1. **Build** -- [`graph::Graph::new`] fixes the vertex count, then
//!    [`graph::Graph::add_edge`] inserts edges (or [`matrix::read_graph`]
//!    does both from a file).
//! 2. **Detect** -- [`topo::detect`] runs Kahn's algorithm on an in-degree
//!    snapshot and returns a [`topo::Detection`]: an order or a cycle.
//! 3. **Report** -- `Detection`'s `Display` renders `4, 0, 1, 3, 2` or
//!    `CYCLE DETECTED!`.
//!
//! ```rust
//! use kahn_core::graph::Graph;
//! use kahn_core::id::VertexId;
//! use kahn_core::topo::detect;
//!
//! let mut graph = Graph::new(3)?;
//! graph.add_edge(VertexId(0), VertexId(1))?;
//! graph.add_edge(VertexId(1), VertexId(2))?;
//! assert_eq!(detect(&graph).to_string(), "0, 1, 2");
//! # Ok::<(), kahn_core::graph::GraphError>(())
//! ```
//!
//! # Key Types
//!
//! - [`sequence::Sequence`] -- Doubly linked FIFO sequence with O(1) append,
//!   pop-front, and removal by node handle.
//! - [`graph::Graph`] -- Fixed vertex set; each vertex keeps in- and
//!   out-neighbour sequences of [`id::VertexId`]s.
//! - [`topo::Detection`] -- Result of cycle detection.
//! - [`matrix::ParseError`] -- Failures while importing matrix text.

pub mod graph;
pub mod id;
pub mod matrix;
pub mod sequence;
pub mod topo;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
