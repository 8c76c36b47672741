// src/pipeline/executor.rs

//! Pluggable worker pool abstraction.
//!
//! A pipeline without an executor runs every task on the calling thread. With
//! one, each eligible task is wrapped in a [`Job`] and handed to
//! [`Executor::execute`]; the job reports its own completion back to the
//! driving thread, so an executor only has to run closures.
//!
//! - [`WorkerPool`] owns a dedicated tokio runtime and runs jobs on its
//!   blocking thread pool, bounded to `worker_threads` at a time.
//! - `tokio::runtime::Handle` is an executor too, for callers that already
//!   own a runtime.
//! - Tests can provide their own implementation (e.g. run jobs inline).

use std::fmt;
use std::sync::Arc;

use serde::Deserialize;
use tokio::runtime::{Builder, Handle, Runtime};
use tracing::debug;

use crate::errors::{DagpipeError, Result};

/// Type-erased unit of work submitted to an [`Executor`].
pub type Job = Box<dyn FnOnce() + Send + 'static>;

/// Trait abstracting where pipeline tasks run.
///
/// Every job passed to `execute` must eventually be either run or dropped.
/// Dropping a job without running it is reported to the pipeline, which then
/// stops submitting further work. Returning an error has the same effect.
pub trait Executor: Send + Sync {
    fn execute(&self, job: Job) -> Result<()>;
}

impl<E: Executor + ?Sized> Executor for Arc<E> {
    fn execute(&self, job: Job) -> Result<()> {
        (**self).execute(job)
    }
}

impl Executor for Handle {
    fn execute(&self, job: Job) -> Result<()> {
        self.spawn_blocking(job);
        Ok(())
    }
}

/// Settings for a [`WorkerPool`].
///
/// Deserialisable so it can sit inside a TOML `[config]` section.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct WorkerPoolConfig {
    /// Maximum number of tasks running at once.
    #[serde(default = "default_worker_threads")]
    pub worker_threads: usize,

    /// Name given to the pool's threads.
    #[serde(default = "default_thread_name")]
    pub thread_name: String,
}

fn default_worker_threads() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(4)
}

fn default_thread_name() -> String {
    "dagpipe-worker".to_string()
}

impl Default for WorkerPoolConfig {
    fn default() -> Self {
        Self {
            worker_threads: default_worker_threads(),
            thread_name: default_thread_name(),
        }
    }
}

/// Fixed-size worker pool backed by a private tokio runtime.
pub struct WorkerPool {
    runtime: Runtime,
    config: WorkerPoolConfig,
}

impl WorkerPool {
    /// Pool with `worker_threads` threads and the default thread name.
    pub fn new(worker_threads: usize) -> Result<Self> {
        Self::with_config(WorkerPoolConfig {
            worker_threads,
            ..WorkerPoolConfig::default()
        })
    }

    pub fn with_config(config: WorkerPoolConfig) -> Result<Self> {
        if config.worker_threads == 0 {
            return Err(DagpipeError::ConfigError(
                "worker pool needs at least one thread (got 0)".to_string(),
            ));
        }

        let runtime = Builder::new_multi_thread()
            .worker_threads(1)
            .max_blocking_threads(config.worker_threads)
            .thread_name(config.thread_name.clone())
            .build()?;

        debug!(
            worker_threads = config.worker_threads,
            thread_name = %config.thread_name,
            "worker pool started"
        );

        Ok(Self { runtime, config })
    }

    pub fn worker_threads(&self) -> usize {
        self.config.worker_threads
    }

    pub fn handle(&self) -> &Handle {
        self.runtime.handle()
    }
}

impl fmt::Debug for WorkerPool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WorkerPool")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl Executor for WorkerPool {
    fn execute(&self, job: Job) -> Result<()> {
        self.runtime.spawn_blocking(job);
        Ok(())
    }
}
