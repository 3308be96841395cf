use serde::{Deserialize, Serialize};
use slotmap::new_key_type;
use std::fmt;

new_key_type! {
    /// Identifies a link node inside a single [`crate::sequence::Sequence`].
    pub struct NodeKey;
}

/// Identifies a vertex in a [`crate::graph::Graph`]. The wrapped value is the
/// vertex's index into the graph's vertex array, in `[0, vertex_count)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VertexId(pub usize);

impl VertexId {
    /// The index of this vertex in the owning graph's vertex array.
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for VertexId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<usize> for VertexId {
    fn from(index: usize) -> Self {
        VertexId(index)
    }
}

/// Identifies one [`crate::sequence::Sequence`] instance. Every sequence gets
/// a fresh id on construction (and on clone), so node handles can be checked
/// for membership.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SequenceId(pub(crate) u64);
