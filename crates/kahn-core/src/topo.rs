//! Topological sorting and cycle detection (Kahn's algorithm).
//!
//! Detection works on its own in-degree counters, seeded from the graph's
//! in-neighbour counts, so the graph is only borrowed and every run over the
//! same graph gives the same answer.
//!
//! Ties between vertices that become ready together are broken by id: the
//! initial frontier is seeded in ascending id order and the frontier is FIFO
//! from then on.

use crate::graph::{Graph, GraphError, Vertex};
use crate::id::VertexId;
use crate::sequence::Sequence;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, instrument};

/// Outcome of running cycle detection over a graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum Detection {
    /// The graph is a DAG; `order` lists every vertex with each edge pointing
    /// forward.
    Acyclic { order: Vec<VertexId> },
    /// The graph has at least one cycle. `unresolved` holds, in id order, the
    /// vertices whose in-degree never dropped to zero: every vertex on a
    /// cycle plus everything reachable only through one.
    Cycle { unresolved: Vec<VertexId> },
}

impl Detection {
    pub fn is_acyclic(&self) -> bool {
        matches!(self, Detection::Acyclic { .. })
    }

    /// The topological order, if there is one.
    pub fn order(&self) -> Option<&[VertexId]> {
        match self {
            Detection::Acyclic { order } => Some(order),
            Detection::Cycle { .. } => None,
        }
    }

    pub fn into_order(self) -> Result<Vec<VertexId>, GraphError> {
        match self {
            Detection::Acyclic { order } => Ok(order),
            Detection::Cycle { .. } => Err(GraphError::CycleDetected),
        }
    }
}

/// Either `CYCLE DETECTED!` or the order as `4, 0, 1, 3, 2`, without a
/// trailing line break.
impl fmt::Display for Detection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Detection::Cycle { .. } => f.write_str("CYCLE DETECTED!"),
            Detection::Acyclic { order } => {
                for (i, id) in order.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{id}")?;
                }
                Ok(())
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Kahn's algorithm
// ---------------------------------------------------------------------------

/// Run Kahn's algorithm over `graph`.
#[instrument(skip(graph), fields(vertices = graph.vertex_count(), edges = graph.edge_count()))]
pub fn detect(graph: &Graph) -> Detection {
    let mut in_degree: Vec<usize> = graph.vertices().map(Vertex::in_degree).collect();

    // Seed the frontier with all zero-in-degree vertices, in id order.
    let mut frontier: Sequence<VertexId> = graph
        .vertices()
        .filter(|v| v.in_degree() == 0)
        .map(Vertex::id)
        .collect();
    let mut ordered: Sequence<VertexId> = Sequence::new();

    while let Ok(u) = frontier.pop_front() {
        ordered.append(u);

        let Some(vertex) = graph.vertex(u) else {
            continue;
        };
        for &v in vertex.out_neighbours() {
            let deg = &mut in_degree[v.index()];
            *deg -= 1;
            if *deg == 0 {
                frontier.append(v);
            }
        }
    }

    let unresolved: Vec<VertexId> = in_degree
        .iter()
        .enumerate()
        .filter(|&(_, &deg)| deg != 0)
        .map(|(i, _)| VertexId(i))
        .collect();

    if !unresolved.is_empty() {
        debug!(
            ordered = ordered.len(),
            unresolved = unresolved.len(),
            "cycle detected"
        );
        return Detection::Cycle { unresolved };
    }

    debug!(ordered = ordered.len(), "graph is acyclic");
    Detection::Acyclic {
        order: ordered.iter().copied().collect(),
    }
}

/// The topological order of `graph`, or [`GraphError::CycleDetected`].
pub fn topological_order(graph: &Graph) -> Result<Vec<VertexId>, GraphError> {
    detect(graph).into_order()
}

pub fn has_cycle(graph: &Graph) -> bool {
    !detect(graph).is_acyclic()
}

/// Group vertices by depth: level 0 holds the sources, and every other
/// vertex sits one level below its deepest in-neighbour. Vertices within a
/// level are in id order.
pub fn topological_levels(graph: &Graph) -> Result<Vec<Vec<VertexId>>, GraphError> {
    let order = topological_order(graph)?;

    let mut depth = vec![0usize; graph.vertex_count()];
    let mut levels: Vec<Vec<VertexId>> = Vec::new();

    // Every in-neighbour precedes `u` in `order`, so its depth is final here.
    for &u in &order {
        let d = depth[u.index()];
        if let Some(vertex) = graph.vertex(u) {
            for &v in vertex.out_neighbours() {
                depth[v.index()] = depth[v.index()].max(d + 1);
            }
        }

        if levels.len() <= d {
            levels.resize_with(d + 1, Vec::new);
        }
        levels[d].push(u);
    }

    for level in &mut levels {
        level.sort();
    }
    Ok(levels)
}
