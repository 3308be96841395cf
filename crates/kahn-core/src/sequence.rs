//! Ordered, mutable sequence of element references.
//!
//! A doubly linked list whose nodes live in a `SlotMap`, so append, pop-front
//! and removal by node handle are all O(1) with no shifting. Elements are
//! expected to be cheap, non-owning references (typically [`VertexId`]s);
//! the sequence never interprets them beyond equality in [`Sequence::find`].
//!
//! [`VertexId`]: crate::id::VertexId

use crate::id::{NodeKey, SequenceId};
use slotmap::SlotMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_SEQUENCE_ID: AtomicU64 = AtomicU64::new(0);

fn next_sequence_id() -> SequenceId {
    SequenceId(NEXT_SEQUENCE_ID.fetch_add(1, Ordering::Relaxed))
}

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Errors reported by [`Sequence`] operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SequenceError {
    #[error("sequence is empty")]
    Empty,
    #[error("node does not belong to this sequence")]
    ForeignNode,
}

// ---------------------------------------------------------------------------
// Core data structures
// ---------------------------------------------------------------------------

/// Handle to a node inside a specific [`Sequence`].
///
/// Handles are tagged with the owning sequence and carry a generational key,
/// so a handle from another sequence, or one whose node was already removed,
/// is rejected rather than aliasing a live node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeRef {
    owner: SequenceId,
    key: NodeKey,
}

#[derive(Debug, Clone)]
struct Link<T> {
    elem: T,
    prev: Option<NodeKey>,
    next: Option<NodeKey>,
}

/// A doubly linked, FIFO-ordered sequence.
pub struct Sequence<T> {
    id: SequenceId,
    links: SlotMap<NodeKey, Link<T>>,
    head: Option<NodeKey>,
    tail: Option<NodeKey>,
}

impl<T> Default for Sequence<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone> Clone for Sequence<T> {
    fn clone(&self) -> Self {
        // A clone is a distinct sequence: handles into `self` must not be
        // accepted by it.
        Self {
            id: next_sequence_id(),
            links: self.links.clone(),
            head: self.head,
            tail: self.tail,
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for Sequence<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<T> Sequence<T> {
    /// Create an empty sequence. Nothing is allocated until the first append.
    pub fn new() -> Self {
        Self {
            id: next_sequence_id(),
            links: SlotMap::with_key(),
            head: None,
            tail: None,
        }
    }

    /// Number of elements currently linked.
    pub fn len(&self) -> usize {
        self.links.len()
    }

    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }

    /// Handle to the first node, if any.
    pub fn head(&self) -> Option<NodeRef> {
        self.head.map(|key| self.handle(key))
    }

    /// Handle to the last node, if any.
    pub fn tail(&self) -> Option<NodeRef> {
        self.tail.map(|key| self.handle(key))
    }

    pub fn front(&self) -> Option<&T> {
        self.head.and_then(|key| self.links.get(key)).map(|l| &l.elem)
    }

    pub fn back(&self) -> Option<&T> {
        self.tail.and_then(|key| self.links.get(key)).map(|l| &l.elem)
    }

    /// Whether `node` currently belongs to this sequence.
    pub fn contains(&self, node: NodeRef) -> bool {
        node.owner == self.id && self.links.contains_key(node.key)
    }

    /// The element stored at `node`, or `None` if the node is not part of
    /// this sequence.
    pub fn get(&self, node: NodeRef) -> Option<&T> {
        if node.owner != self.id {
            return None;
        }
        self.links.get(node.key).map(|l| &l.elem)
    }

    /// Link `elem` after the current tail and return a handle to its node.
    pub fn append(&mut self, elem: T) -> NodeRef {
        let prev = self.tail;
        let key = self.links.insert(Link {
            elem,
            prev,
            next: None,
        });

        match prev.and_then(|p| self.links.get_mut(p)) {
            Some(old_tail) => old_tail.next = Some(key),
            None => self.head = Some(key),
        }
        self.tail = Some(key);

        self.handle(key)
    }

    /// Remove and return the first element.
    pub fn pop_front(&mut self) -> Result<T, SequenceError> {
        let key = self.head.ok_or(SequenceError::Empty)?;
        self.unlink(key).ok_or(SequenceError::Empty)
    }

    /// Find the first node (from the head) whose element equals `elem`.
    pub fn find(&self, elem: &T) -> Option<NodeRef>
    where
        T: PartialEq,
    {
        let mut cursor = self.head;
        while let Some(key) = cursor {
            let link = &self.links[key];
            if link.elem == *elem {
                return Some(self.handle(key));
            }
            cursor = link.next;
        }
        None
    }

    /// Unlink `node` and return its element.
    ///
    /// Returns [`SequenceError::ForeignNode`] and leaves the sequence
    /// untouched if `node` is not currently part of this sequence.
    pub fn remove(&mut self, node: NodeRef) -> Result<T, SequenceError> {
        if node.owner != self.id {
            return Err(SequenceError::ForeignNode);
        }
        self.unlink(node.key).ok_or(SequenceError::ForeignNode)
    }

    /// Drop every node. Referenced elements are the caller's concern.
    pub fn clear(&mut self) {
        self.links.clear();
        self.head = None;
        self.tail = None;
    }

    /// Iterate elements from head to tail.
    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            links: &self.links,
            cursor: self.head,
            remaining: self.links.len(),
        }
    }

    fn handle(&self, key: NodeKey) -> NodeRef {
        NodeRef { owner: self.id, key }
    }

    fn unlink(&mut self, key: NodeKey) -> Option<T> {
        let link = self.links.remove(key)?;

        match link.prev {
            Some(prev) => self.links[prev].next = link.next,
            None => self.head = link.next,
        }
        match link.next {
            Some(next) => self.links[next].prev = link.prev,
            None => self.tail = link.prev,
        }

        Some(link.elem)
    }
}

impl<T> FromIterator<T> for Sequence<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut seq = Sequence::new();
        seq.extend(iter);
        seq
    }
}

impl<T> Extend<T> for Sequence<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for elem in iter {
            self.append(elem);
        }
    }
}

impl<'a, T> IntoIterator for &'a Sequence<T> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Head-to-tail iterator over a [`Sequence`].
pub struct Iter<'a, T> {
    links: &'a SlotMap<NodeKey, Link<T>>,
    cursor: Option<NodeKey>,
    remaining: usize,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        let link = self.links.get(self.cursor?)?;
        self.cursor = link.next;
        self.remaining -= 1;
        Some(&link.elem)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<T> ExactSizeIterator for Iter<'_, T> {}
