// src/errors.rs

//! Crate-wide error type and result alias.
//!
//! Construction and bounds errors are returned synchronously by the graph and
//! pipeline builders. Task failures are never wrapped in this type: a failed
//! work closure's own `anyhow::Error` is handed back to the caller unchanged.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DagpipeError {
    #[error("invalid matrix dimensions {rows}x{columns}: both must be >= 1")]
    InvalidDimensions { rows: usize, columns: usize },

    #[error("{axis} index {index} out of bounds (size {size})")]
    IndexOutOfBounds {
        axis: &'static str,
        index: usize,
        size: usize,
    },

    #[error("node not found: {0}")]
    NodeNotFound(String),

    #[error("adjacency matrix is {rows}x{columns} but there are {nodes} nodes")]
    DimensionMismatch {
        rows: usize,
        columns: usize,
        nodes: usize,
    },

    #[error("graph has no nodes")]
    EmptyGraph,

    #[error("graph has a cycle involving {0}")]
    Cycle(String),

    #[error("task registered more than once: {0}")]
    DuplicateTask(String),

    #[error("executor unavailable: {0}")]
    ExecutorUnavailable(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl DagpipeError {
    pub(crate) fn out_of_bounds(axis: &'static str, index: usize, size: usize) -> Self {
        DagpipeError::IndexOutOfBounds { axis, index, size }
    }
}

pub use anyhow::Error;
pub type Result<T> = std::result::Result<T, DagpipeError>;
