use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use dagpipe::errors::{DagpipeError, Result};
use dagpipe::pipeline::{Executor, Job};
use tracing::debug;

/// An executor that:
/// - runs each job immediately on the submitting thread
/// - counts how many jobs it was given.
#[derive(Debug, Clone, Default)]
pub struct InlineExecutor {
    submitted: Arc<AtomicUsize>,
}

impl InlineExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn submitted(&self) -> usize {
        self.submitted.load(Ordering::SeqCst)
    }
}

impl Executor for InlineExecutor {
    fn execute(&self, job: Job) -> Result<()> {
        let n = self.submitted.fetch_add(1, Ordering::SeqCst) + 1;
        debug!(submitted = n, "InlineExecutor: running job");
        job();
        Ok(())
    }
}

/// An executor that accepts `capacity` jobs and then behaves as if shut down:
/// it either rejects further jobs or silently drops them.
#[derive(Debug)]
pub struct ExhaustedExecutor {
    remaining: AtomicUsize,
    reject: bool,
}

impl ExhaustedExecutor {
    /// Runs `capacity` jobs inline, then returns an error for every other job.
    pub fn rejecting(capacity: usize) -> Self {
        Self {
            remaining: AtomicUsize::new(capacity),
            reject: true,
        }
    }

    /// Runs `capacity` jobs inline, then drops every other job unrun.
    pub fn dropping(capacity: usize) -> Self {
        Self {
            remaining: AtomicUsize::new(capacity),
            reject: false,
        }
    }
}

impl Executor for ExhaustedExecutor {
    fn execute(&self, job: Job) -> Result<()> {
        let accepted = self
            .remaining
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();

        if accepted {
            debug!("ExhaustedExecutor: running job");
            job();
            return Ok(());
        }

        debug!(reject = self.reject, "ExhaustedExecutor: out of capacity, discarding job");
        drop(job);
        if self.reject {
            Err(DagpipeError::ExecutorUnavailable("executor shut down".to_string()))
        } else {
            Ok(())
        }
    }
}
