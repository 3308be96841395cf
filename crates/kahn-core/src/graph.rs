use crate::id::VertexId;
use crate::sequence::Sequence;
use std::collections::TryReserveError;
use std::fmt;
use tracing::trace;

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Errors that can occur during graph operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GraphError {
    #[error("a graph needs at least one vertex")]
    NoVertices,
    #[error("vertex {vertex} out of range for a graph of {count} vertices")]
    VertexOutOfRange { vertex: VertexId, count: usize },
    #[error("edge already exists between {from} and {to}")]
    DuplicateEdge { from: VertexId, to: VertexId },
    #[error("no edge between {from} and {to}")]
    EdgeNotFound { from: VertexId, to: VertexId },
    #[error("cycle detected")]
    CycleDetected,
    #[error("vertex storage allocation failed: {0}")]
    Allocation(#[from] TryReserveError),
}

// ---------------------------------------------------------------------------
// Core data structures
// ---------------------------------------------------------------------------

/// A single vertex and its adjacency.
///
/// Neighbours are stored as [`VertexId`]s into the owning graph's vertex
/// array; a vertex never owns another vertex.
#[derive(Debug, Clone)]
pub struct Vertex {
    id: VertexId,
    /// Vertices this one has an edge to.
    out_neighbours: Sequence<VertexId>,
    /// Vertices with an edge to this one.
    in_neighbours: Sequence<VertexId>,
}

impl Vertex {
    fn new(id: VertexId) -> Self {
        Self {
            id,
            out_neighbours: Sequence::new(),
            in_neighbours: Sequence::new(),
        }
    }

    pub fn id(&self) -> VertexId {
        self.id
    }

    pub fn out_neighbours(&self) -> &Sequence<VertexId> {
        &self.out_neighbours
    }

    pub fn in_neighbours(&self) -> &Sequence<VertexId> {
        &self.in_neighbours
    }

    pub fn in_degree(&self) -> usize {
        self.in_neighbours.len()
    }

    pub fn out_degree(&self) -> usize {
        self.out_neighbours.len()
    }
}

// ---------------------------------------------------------------------------
// Graph
// ---------------------------------------------------------------------------

/// A directed graph over a fixed set of vertices `0..n`.
///
/// Every edge `from -> to` is recorded twice: `to` in `from`'s out-neighbours
/// and `from` in `to`'s in-neighbours. All mutation goes through
/// [`Graph::add_edge`] and [`Graph::remove_edge`], which keep the two sides in
/// sync. Parallel edges are rejected; self-loops are allowed.
#[derive(Debug, Clone)]
pub struct Graph {
    vertices: Vec<Vertex>,
    edge_count: usize,
}

impl Graph {
    /// Create a graph with `n` vertices, ids `0..n`, and no edges.
    pub fn new(n: usize) -> Result<Self, GraphError> {
        if n == 0 {
            return Err(GraphError::NoVertices);
        }

        let mut vertices = Vec::new();
        vertices.try_reserve_exact(n)?;
        vertices.extend((0..n).map(|i| Vertex::new(VertexId(i))));

        Ok(Self {
            vertices,
            edge_count: 0,
        })
    }

    /// Create a graph with `n` vertices and insert each `(from, to)` pair in
    /// order. Stops at the first rejected edge.
    pub fn from_edges<I>(n: usize, edges: I) -> Result<Self, GraphError>
    where
        I: IntoIterator<Item = (usize, usize)>,
    {
        let mut graph = Self::new(n)?;
        for (from, to) in edges {
            graph.add_edge(VertexId(from), VertexId(to))?;
        }
        Ok(graph)
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Number of distinct directed edges currently recorded.
    pub fn edge_count(&self) -> usize {
        self.edge_count
    }

    /// Add the edge `from -> to`.
    ///
    /// Nothing is mutated if either endpoint is out of range or the edge is
    /// already present.
    pub fn add_edge(&mut self, from: VertexId, to: VertexId) -> Result<(), GraphError> {
        self.check(from)?;
        self.check(to)?;

        if self.vertices[from.0].out_neighbours.find(&to).is_some() {
            return Err(GraphError::DuplicateEdge { from, to });
        }

        self.vertices[from.0].out_neighbours.append(to);
        self.vertices[to.0].in_neighbours.append(from);
        self.edge_count += 1;

        trace!(%from, %to, edges = self.edge_count, "edge added");
        Ok(())
    }

    /// Remove the edge `from -> to` from both adjacency sides.
    pub fn remove_edge(&mut self, from: VertexId, to: VertexId) -> Result<(), GraphError> {
        self.check(from)?;
        self.check(to)?;

        let out_node = self.vertices[from.0]
            .out_neighbours
            .find(&to)
            .ok_or(GraphError::EdgeNotFound { from, to })?;
        let in_node = self.vertices[to.0]
            .in_neighbours
            .find(&from)
            .ok_or(GraphError::EdgeNotFound { from, to })?;

        let missing = |_| GraphError::EdgeNotFound { from, to };
        self.vertices[from.0]
            .out_neighbours
            .remove(out_node)
            .map_err(missing)?;
        self.vertices[to.0]
            .in_neighbours
            .remove(in_node)
            .map_err(missing)?;
        self.edge_count -= 1;

        trace!(%from, %to, edges = self.edge_count, "edge removed");
        Ok(())
    }

    /// Whether the edge `from -> to` exists. Out-of-range ids have no edges.
    pub fn has_edge(&self, from: VertexId, to: VertexId) -> bool {
        self.vertices
            .get(from.0)
            .is_some_and(|v| v.out_neighbours.find(&to).is_some())
    }

    pub fn vertex(&self, id: VertexId) -> Option<&Vertex> {
        self.vertices.get(id.0)
    }

    /// Iterate over all vertices in id order.
    pub fn vertices(&self) -> impl Iterator<Item = &Vertex> {
        self.vertices.iter()
    }

    /// Iterate over all edges, grouped by source in id order and, per source,
    /// in insertion order.
    pub fn edges(&self) -> impl Iterator<Item = (VertexId, VertexId)> + '_ {
        self.vertices
            .iter()
            .flat_map(|v| v.out_neighbours.iter().map(move |&to| (v.id, to)))
    }

    pub fn out_neighbours(&self, id: VertexId) -> Result<&Sequence<VertexId>, GraphError> {
        self.check(id)?;
        Ok(&self.vertices[id.0].out_neighbours)
    }

    pub fn in_neighbours(&self, id: VertexId) -> Result<&Sequence<VertexId>, GraphError> {
        self.check(id)?;
        Ok(&self.vertices[id.0].in_neighbours)
    }

    pub fn in_degree(&self, id: VertexId) -> Result<usize, GraphError> {
        self.in_neighbours(id).map(Sequence::len)
    }

    pub fn out_degree(&self, id: VertexId) -> Result<usize, GraphError> {
        self.out_neighbours(id).map(Sequence::len)
    }

    /// Render the vertex count and every vertex's adjacency, one block per
    /// vertex.
    pub fn display(&self) -> GraphDisplay<'_> {
        GraphDisplay { graph: self }
    }

    fn check(&self, id: VertexId) -> Result<(), GraphError> {
        if id.0 < self.vertices.len() {
            Ok(())
        } else {
            Err(GraphError::VertexOutOfRange {
                vertex: id,
                count: self.vertices.len(),
            })
        }
    }
}

/// Adjacency listing returned by [`Graph::display`].
pub struct GraphDisplay<'a> {
    graph: &'a Graph,
}

impl fmt::Display for GraphDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "number of vertices {}", self.graph.vertex_count())?;

        for vertex in self.graph.vertices() {
            writeln!(f, "Vertex ID: {}", vertex.id)?;

            write!(f, "Out Neighbours: ")?;
            for id in vertex.out_neighbours() {
                write!(f, "{id} ")?;
            }
            writeln!(f)?;

            write!(f, "In Neighbours: ")?;
            for id in vertex.in_neighbours() {
                write!(f, "{id} ")?;
            }
            writeln!(f)?;
            writeln!(f)?;
        }
        Ok(())
    }
}
