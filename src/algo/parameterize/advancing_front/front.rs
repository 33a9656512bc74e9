//! FIFO of directed front edges.
//!
//! Entries are not removed when the edge they name stops being a front edge;
//! the driver discards such stale entries when it pops them.

use std::collections::VecDeque;

use crate::mesh::VertexId;

#[derive(Debug, Clone, Default)]
pub(crate) struct FrontQueue {
    edges: VecDeque<(VertexId, VertexId)>,
}

impl FrontQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enqueue the directed edge a -> b, unconquered side on its left.
    #[inline]
    pub fn push(&mut self, a: VertexId, b: VertexId) {
        self.edges.push_back((a, b));
    }

    #[inline]
    pub fn pop(&mut self) -> Option<(VertexId, VertexId)> {
        self.edges.pop_front()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.edges.len()
    }
}
