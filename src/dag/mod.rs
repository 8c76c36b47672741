// src/dag/mod.rs

//! Graph primitives.
//!
//! - [`matrix`] holds the fixed-size bit matrix used as adjacency storage.
//! - [`edge`] is the `(tail, head)` pair callers declare relations with.
//! - [`nodes`] maps node values to stable indices in first-seen order.
//! - [`fixed`] is the immutable, cycle-checked DAG built from the above.

pub mod edge;
pub mod fixed;
pub mod matrix;
pub mod nodes;

pub use edge::{edge, DirectedEdge};
pub use fixed::{FixedDag, FixedDagBuilder};
pub use matrix::{BinaryMatrix, ColumnCells, Cursor, RowCells};
pub use nodes::Nodes;
