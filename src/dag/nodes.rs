// src/dag/nodes.rs

//! Bidirectional node <-> index table.

use std::fmt::Debug;
use std::hash::Hash;

use indexmap::IndexSet;

use crate::errors::{DagpipeError, Result};

/// Ordered, duplicate-free node table.
///
/// A node's index is the position at which it was first added and never
/// changes afterwards. Adding a value that is already present is a no-op that
/// returns the existing index.
#[derive(Debug, Clone)]
pub struct Nodes<T: Hash + Eq> {
    values: IndexSet<T>,
}

impl<T: Hash + Eq> Nodes<T> {
    pub fn new() -> Self {
        Self {
            values: IndexSet::new(),
        }
    }

    /// Add `value` if unseen; returns its index either way.
    pub fn add(&mut self, value: T) -> usize {
        self.values.insert_full(value).0
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn contains(&self, value: &T) -> bool {
        self.values.contains(value)
    }

    /// Value stored at `index`.
    pub fn get(&self, index: usize) -> Result<&T> {
        self.values
            .get_index(index)
            .ok_or_else(|| DagpipeError::out_of_bounds("node", index, self.values.len()))
    }

    /// Iterate values in index order.
    pub fn iter(&self) -> impl ExactSizeIterator<Item = &T> + '_ {
        self.values.iter()
    }

    /// Resolve a list of indices to values. Indices must come from this table.
    pub(crate) fn resolve(&self, indices: &[usize]) -> Vec<&T> {
        indices.iter().map(|&i| &self.values[i]).collect()
    }
}

impl<T: Hash + Eq + Debug> Nodes<T> {
    /// Index of `value`, or [`DagpipeError::NodeNotFound`].
    pub fn index_of(&self, value: &T) -> Result<usize> {
        self.values
            .get_index_of(value)
            .ok_or_else(|| DagpipeError::NodeNotFound(format!("{value:?}")))
    }
}

// Index order is part of a node table's identity.
impl<T: Hash + Eq> PartialEq for Nodes<T> {
    fn eq(&self, other: &Self) -> bool {
        self.values.iter().eq(other.values.iter())
    }
}

impl<T: Hash + Eq> Eq for Nodes<T> {}

impl<T: Hash + Eq> Default for Nodes<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Hash + Eq> FromIterator<T> for Nodes<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().collect(),
        }
    }
}

impl<'a, T: Hash + Eq> IntoIterator for &'a Nodes<T> {
    type Item = &'a T;
    type IntoIter = indexmap::set::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.values.iter()
    }
}
