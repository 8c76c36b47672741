// src/dag/fixed.rs

//! Immutable directed acyclic graph.
//!
//! A [`FixedDag`] is assembled once, either directly from an adjacency matrix
//! plus node table or through [`FixedDagBuilder`], and is read-only from then
//! on. Construction runs Kahn's algorithm; if it cannot consume every node the
//! graph has a cycle and construction fails, so a cyclic graph is never
//! observable.

use std::collections::{BTreeSet, VecDeque};
use std::fmt::{Debug, Display};
use std::hash::Hash;

use petgraph::dot::{Config, Dot};
use petgraph::graph::DiGraph;
use tracing::debug;

use crate::dag::edge::DirectedEdge;
use crate::dag::matrix::BinaryMatrix;
use crate::dag::nodes::Nodes;
use crate::errors::{DagpipeError, Result};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixedDag<T: Hash + Eq> {
    nodes: Nodes<T>,
    matrix: BinaryMatrix,
    /// Topological order (node indices), fixed at construction.
    order: Vec<usize>,
}

impl<T: Hash + Eq + Debug> FixedDag<T> {
    /// Build a graph from a square adjacency matrix whose dimension equals the
    /// number of nodes. `matrix[i][j]` set means an edge from node `i` to `j`.
    pub fn new(matrix: BinaryMatrix, nodes: Nodes<T>) -> Result<Self> {
        if nodes.is_empty() {
            return Err(DagpipeError::EmptyGraph);
        }

        if !matrix.is_square() || matrix.rows() != nodes.len() {
            return Err(DagpipeError::DimensionMismatch {
                rows: matrix.rows(),
                columns: matrix.columns(),
                nodes: nodes.len(),
            });
        }

        let order = kahn_order(&matrix);
        if order.len() != nodes.len() {
            let mut sorted = vec![false; nodes.len()];
            for &i in &order {
                sorted[i] = true;
            }
            let stuck: Vec<&T> = nodes
                .iter()
                .zip(sorted)
                .filter_map(|(node, done)| (!done).then_some(node))
                .collect();
            return Err(DagpipeError::Cycle(format!("{stuck:?}")));
        }

        let dag = Self {
            nodes,
            matrix,
            order,
        };
        debug!(
            nodes = dag.node_count(),
            edges = dag.edge_count(),
            "fixed DAG created"
        );
        Ok(dag)
    }

    pub fn builder() -> FixedDagBuilder<T> {
        FixedDagBuilder::new()
    }

    /// Direct successors of `node`, in index order.
    pub fn heads_of(&self, node: &T) -> Result<Vec<&T>> {
        let index = self.nodes.index_of(node)?;
        Ok(self.nodes.resolve(&self.head_indices(index)?))
    }

    /// Direct predecessors of `node`, in index order.
    pub fn tails_of(&self, node: &T) -> Result<Vec<&T>> {
        let index = self.nodes.index_of(node)?;
        Ok(self.nodes.resolve(&self.tail_indices(index)?))
    }

    /// Every node reachable from `node` by following edges forward.
    pub fn all_heads_of(&self, node: &T) -> Result<Vec<&T>> {
        let index = self.nodes.index_of(node)?;
        Ok(self.nodes.resolve(&self.all_head_indices(index)?))
    }

    /// Every node from which `node` is reachable.
    pub fn all_tails_of(&self, node: &T) -> Result<Vec<&T>> {
        let index = self.nodes.index_of(node)?;
        Ok(self.nodes.resolve(&self.all_tail_indices(index)?))
    }

    /// Nodes without predecessors, in index order.
    pub fn no_incoming_edges(&self) -> Vec<&T> {
        let roots: Vec<usize> = (0..self.node_count())
            .filter(|&i| column_predecessors(&self.matrix, i).next().is_none())
            .collect();
        self.nodes.resolve(&roots)
    }

    /// Nodes without successors, in index order.
    pub fn no_outgoing_edges(&self) -> Vec<&T> {
        let leaves: Vec<usize> = (0..self.node_count())
            .filter(|&i| row_successors(&self.matrix, i).next().is_none())
            .collect();
        self.nodes.resolve(&leaves)
    }

    /// All nodes, every edge's tail before its head.
    ///
    /// Ties are broken by node index, so the order is reproducible for a given
    /// graph and insertion order.
    pub fn topological_sort(&self) -> Vec<&T> {
        self.nodes.resolve(&self.order)
    }
}

impl<T: Hash + Eq> FixedDag<T> {
    pub fn nodes(&self) -> &Nodes<T> {
        &self.nodes
    }

    pub fn matrix(&self) -> &BinaryMatrix {
        &self.matrix
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        (0..self.node_count())
            .map(|i| row_successors(&self.matrix, i).count())
            .sum()
    }

    /// All edges, ordered by tail index and then head index.
    pub fn edges(&self) -> Vec<DirectedEdge<&T>> {
        let mut edges = Vec::new();
        for (tail_index, tail) in self.nodes.iter().enumerate() {
            for head_index in row_successors(&self.matrix, tail_index) {
                edges.extend(
                    self.nodes
                        .get(head_index)
                        .ok()
                        .map(|head| DirectedEdge::new(tail, head)),
                );
            }
        }
        edges
    }

    /// Topological order as node indices.
    pub fn topological_order(&self) -> &[usize] {
        &self.order
    }

    pub fn head_indices(&self, index: usize) -> Result<Vec<usize>> {
        Ok(self
            .matrix
            .row_iter(index)?
            .filter(|c| c.value)
            .map(|c| c.column)
            .collect())
    }

    pub fn tail_indices(&self, index: usize) -> Result<Vec<usize>> {
        Ok(self
            .matrix
            .column_iter(index)?
            .filter(|c| c.value)
            .map(|c| c.row)
            .collect())
    }

    /// Descendants of `index` in breadth-first discovery order.
    pub fn all_head_indices(&self, index: usize) -> Result<Vec<usize>> {
        let first = self.head_indices(index)?;
        Ok(self.closure(index, first, |i| row_successors(&self.matrix, i).collect()))
    }

    /// Ancestors of `index` in breadth-first discovery order.
    pub fn all_tail_indices(&self, index: usize) -> Result<Vec<usize>> {
        let first = self.tail_indices(index)?;
        Ok(self.closure(index, first, |i| column_predecessors(&self.matrix, i).collect()))
    }

    fn closure(
        &self,
        start: usize,
        first: Vec<usize>,
        step: impl Fn(usize) -> Vec<usize>,
    ) -> Vec<usize> {
        let mut seen = vec![false; self.node_count()];
        seen[start] = true;

        let mut queue = VecDeque::new();
        for i in first {
            if !seen[i] {
                seen[i] = true;
                queue.push_back(i);
            }
        }

        let mut visited = Vec::new();
        while let Some(i) = queue.pop_front() {
            visited.push(i);
            for next in step(i) {
                if !seen[next] {
                    seen[next] = true;
                    queue.push_back(next);
                }
            }
        }
        visited
    }
}

impl<T: Hash + Eq + Display> FixedDag<T> {
    /// Render the graph in Graphviz DOT format.
    pub fn to_dot(&self) -> String {
        let mut graph: DiGraph<&T, &str> = DiGraph::with_capacity(self.node_count(), 0);
        let ids: Vec<_> = self.nodes.iter().map(|n| graph.add_node(n)).collect();
        for (tail, _) in self.nodes.iter().enumerate() {
            for head in row_successors(&self.matrix, tail) {
                graph.add_edge(ids[tail], ids[head], "");
            }
        }
        format!("{}", Dot::with_config(&graph, &[Config::EdgeNoLabel]))
    }
}

/// Mutable accumulation phase for a [`FixedDag`].
///
/// Nodes get their index the first time they are seen, whether through
/// [`add_node`](Self::add_node) or as an endpoint of
/// [`add_edge`](Self::add_edge). Repeated edges collapse into one.
#[derive(Debug, Clone)]
pub struct FixedDagBuilder<T: Hash + Eq> {
    nodes: Nodes<T>,
    edges: Vec<(usize, usize)>,
}

impl<T: Hash + Eq + Debug> FixedDagBuilder<T> {
    pub fn new() -> Self {
        Self {
            nodes: Nodes::new(),
            edges: Vec::new(),
        }
    }

    pub fn add_node(mut self, node: T) -> Self {
        self.nodes.add(node);
        self
    }

    pub fn add_edge(mut self, edge: DirectedEdge<T>) -> Self {
        let (tail, head) = edge.into_parts();
        let tail = self.nodes.add(tail);
        let head = self.nodes.add(head);
        self.edges.push((tail, head));
        self
    }

    /// Freeze into a [`FixedDag`], rejecting empty or cyclic graphs.
    pub fn create(self) -> Result<FixedDag<T>> {
        if self.nodes.is_empty() {
            return Err(DagpipeError::EmptyGraph);
        }

        let mut matrix = BinaryMatrix::square(self.nodes.len())?;
        for (tail, head) in self.edges {
            matrix.set(tail, head)?;
        }

        FixedDag::new(matrix, self.nodes)
    }
}

impl<T: Hash + Eq + Debug> Default for FixedDagBuilder<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Kahn's algorithm; the ready set is drained smallest index first.
///
/// Returns fewer than `rows` indices when the matrix encodes a cycle.
fn kahn_order(matrix: &BinaryMatrix) -> Vec<usize> {
    let size = matrix.rows();
    let mut awaited: Vec<usize> = (0..size)
        .map(|i| column_predecessors(matrix, i).count())
        .collect();

    let mut ready: BTreeSet<usize> = (0..size).filter(|&i| awaited[i] == 0).collect();
    let mut order = Vec::with_capacity(size);

    while let Some(node) = ready.pop_first() {
        order.push(node);
        for head in row_successors(matrix, node) {
            awaited[head] -= 1;
            if awaited[head] == 0 {
                ready.insert(head);
            }
        }
    }

    order
}

/// Set columns of `row` (successors). Empty for an out-of-range row.
fn row_successors(matrix: &BinaryMatrix, row: usize) -> impl Iterator<Item = usize> + '_ {
    matrix
        .row_iter(row)
        .into_iter()
        .flatten()
        .filter(|c| c.value)
        .map(|c| c.column)
}

/// Set rows of `column` (predecessors). Empty for an out-of-range column.
fn column_predecessors(matrix: &BinaryMatrix, column: usize) -> impl Iterator<Item = usize> + '_ {
    matrix
        .column_iter(column)
        .into_iter()
        .flatten()
        .filter(|c| c.value)
        .map(|c| c.row)
}
