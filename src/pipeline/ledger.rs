// src/pipeline/ledger.rs

//! Per-run execution state.
//!
//! A [`Ledger`] is created fresh for every pipeline run and is only ever
//! touched by the thread driving that run. Worker threads never see it; they
//! report completions back to the driver, which applies them here one at a
//! time.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::dag::FixedDag;
use crate::errors::DagpipeError;
use crate::pipeline::report::{RunReport, TaskFailure};
use crate::pipeline::task::Task;

/// State of a task within one pipeline run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskRunState {
    /// Waiting on dependencies, or never reached.
    Pending,
    /// Handed to the caller's thread or the worker pool.
    Running,
    DoneSuccess,
    DoneFailed,
    /// Skipped because an ancestor failed. Not an error.
    Cancelled,
}

pub(crate) struct Ledger {
    dag: Arc<FixedDag<Task>>,
    tasks: Vec<Task>,
    states: Vec<TaskRunState>,
    /// Direct dependencies that have not yet succeeded.
    awaited: Vec<usize>,
    failures: Vec<TaskFailure>,
    aborted: Option<DagpipeError>,
}

impl Ledger {
    pub(crate) fn new(dag: Arc<FixedDag<Task>>) -> Self {
        let tasks: Vec<Task> = dag.nodes().iter().cloned().collect();
        let awaited = (0..tasks.len())
            .map(|i| dag.tail_indices(i).map(|t| t.len()).unwrap_or_default())
            .collect();

        Self {
            states: vec![TaskRunState::Pending; tasks.len()],
            dag,
            tasks,
            awaited,
            failures: Vec::new(),
            aborted: None,
        }
    }

    pub(crate) fn task(&self, index: usize) -> &Task {
        &self.tasks[index]
    }

    pub(crate) fn is_eligible(&self, index: usize) -> bool {
        self.states[index] == TaskRunState::Pending && self.awaited[index] == 0
    }

    /// Tasks eligible before anything has run, in topological order.
    pub(crate) fn initially_eligible(&self) -> Vec<usize> {
        self.dag
            .topological_order()
            .iter()
            .copied()
            .filter(|&i| self.is_eligible(i))
            .collect()
    }

    pub(crate) fn mark_running(&mut self, index: usize) {
        debug!(task = %self.tasks[index], "task running");
        self.states[index] = TaskRunState::Running;
    }

    /// Apply the outcome of a finished task.
    ///
    /// Returns the successors that became eligible, in index order.
    pub(crate) fn record(&mut self, index: usize, result: anyhow::Result<()>) -> Vec<usize> {
        match result {
            Ok(()) => self.mark_succeeded(index),
            Err(error) => {
                self.mark_failed(index, error);
                Vec::new()
            }
        }
    }

    fn mark_succeeded(&mut self, index: usize) -> Vec<usize> {
        debug!(task = %self.tasks[index], "task succeeded");
        self.states[index] = TaskRunState::DoneSuccess;

        let mut newly_eligible = Vec::new();
        for head in self.dag.head_indices(index).unwrap_or_default() {
            self.awaited[head] -= 1;
            if self.is_eligible(head) {
                debug!(task = %self.tasks[head], "dependencies satisfied; task eligible");
                newly_eligible.push(head);
            }
        }
        newly_eligible
    }

    fn mark_failed(&mut self, index: usize, error: anyhow::Error) {
        warn!(task = %self.tasks[index], error = %error, "task failed; cancelling its dependents");
        self.states[index] = TaskRunState::DoneFailed;
        self.failures.push(TaskFailure {
            task: self.tasks[index].clone(),
            error,
        });

        for descendant in self.dag.all_head_indices(index).unwrap_or_default() {
            if self.states[descendant] == TaskRunState::Pending {
                debug!(task = %self.tasks[descendant], "task cancelled by upstream failure");
                self.states[descendant] = TaskRunState::Cancelled;
            }
        }
    }

    /// A submitted job was discarded by the executor without running.
    pub(crate) fn mark_dropped(&mut self, index: usize) {
        warn!(task = %self.tasks[index], "executor dropped task without running it");
        self.states[index] = TaskRunState::Pending;
        self.abort(DagpipeError::ExecutorUnavailable(format!(
            "task '{}' was dropped before it ran",
            self.tasks[index]
        )));
    }

    /// Stop the run from submitting more work. The first reason is kept.
    pub(crate) fn abort(&mut self, reason: DagpipeError) {
        if self.aborted.is_none() {
            warn!(error = %reason, "pipeline run aborted; no further tasks will be submitted");
            self.aborted = Some(reason);
        }
    }

    pub(crate) fn is_aborted(&self) -> bool {
        self.aborted.is_some()
    }

    pub(crate) fn into_report(self) -> RunReport {
        RunReport::new(self.dag, self.states, self.failures, self.aborted)
    }
}
