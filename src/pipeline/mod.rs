// src/pipeline/mod.rs

//! Task pipelines.
//!
//! Callers wrap work in [`Task`]s, declare which tasks depend on which through
//! a [`TaskPipelineBuilder`], and get back a [`Pipeline`] backed by a
//! [`FixedDag`](crate::dag::FixedDag). Running the pipeline executes every
//! task once, never before all of its dependencies have succeeded.
//!
//! When a task fails, all of its descendants are cancelled (silently skipped)
//! while unrelated branches keep going. The run then reports the first
//! recorded failure.

pub mod builder;
pub mod executor;
pub mod ledger;
pub mod report;
pub mod runner;
pub mod task;

pub use builder::{TaskPipelineBuilder, TaskSpecBuilder};
pub use executor::{Executor, Job, WorkerPool, WorkerPoolConfig};
pub use ledger::TaskRunState;
pub use report::{RunReport, TaskFailure};
pub use runner::Pipeline;
pub use task::Task;
