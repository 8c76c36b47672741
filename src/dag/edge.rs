// src/dag/edge.rs

use std::fmt;

/// Directed edge `tail -> head`: `tail` must complete before `head` may start.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DirectedEdge<T> {
    tail: T,
    head: T,
}

impl<T> DirectedEdge<T> {
    pub fn new(tail: T, head: T) -> Self {
        Self { tail, head }
    }

    pub fn tail(&self) -> &T {
        &self.tail
    }

    pub fn head(&self) -> &T {
        &self.head
    }

    pub fn into_parts(self) -> (T, T) {
        (self.tail, self.head)
    }
}

/// Shorthand for [`DirectedEdge::new`].
pub fn edge<T>(tail: T, head: T) -> DirectedEdge<T> {
    DirectedEdge::new(tail, head)
}

impl<T: fmt::Display> fmt::Display for DirectedEdge<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.tail, self.head)
    }
}
