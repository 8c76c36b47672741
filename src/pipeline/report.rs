// src/pipeline/report.rs

use std::fmt;
use std::sync::Arc;

use crate::dag::FixedDag;
use crate::errors::DagpipeError;
use crate::pipeline::ledger::TaskRunState;
use crate::pipeline::task::Task;

/// A task whose work closure returned an error (or panicked).
pub struct TaskFailure {
    pub task: Task,
    pub error: anyhow::Error,
}

impl fmt::Debug for TaskFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TaskFailure")
            .field("task", &self.task)
            .field("error", &format_args!("{:#}", self.error))
            .finish()
    }
}

/// Outcome of one pipeline run.
#[derive(Debug)]
pub struct RunReport {
    dag: Arc<FixedDag<Task>>,
    states: Vec<TaskRunState>,
    /// In the order the failures were recorded.
    failures: Vec<TaskFailure>,
    aborted: Option<DagpipeError>,
}

impl RunReport {
    pub(crate) fn new(
        dag: Arc<FixedDag<Task>>,
        states: Vec<TaskRunState>,
        failures: Vec<TaskFailure>,
        aborted: Option<DagpipeError>,
    ) -> Self {
        Self {
            dag,
            states,
            failures,
            aborted,
        }
    }

    /// Final state of `task`, or `None` if it is not part of the pipeline.
    pub fn state_of(&self, task: &Task) -> Option<TaskRunState> {
        let index = self.dag.nodes().index_of(task).ok()?;
        self.states.get(index).copied()
    }

    /// Tasks in `state`, in topological order.
    pub fn tasks_in(&self, state: TaskRunState) -> Vec<&Task> {
        self.dag
            .topological_order()
            .iter()
            .filter(|&&i| self.states[i] == state)
            .filter_map(|&i| self.dag.nodes().get(i).ok())
            .collect()
    }

    pub fn completed(&self) -> Vec<&Task> {
        self.tasks_in(TaskRunState::DoneSuccess)
    }

    pub fn failed(&self) -> Vec<&Task> {
        self.tasks_in(TaskRunState::DoneFailed)
    }

    pub fn cancelled(&self) -> Vec<&Task> {
        self.tasks_in(TaskRunState::Cancelled)
    }

    pub fn failures(&self) -> &[TaskFailure] {
        &self.failures
    }

    /// The executor problem that stopped the run early, if any.
    pub fn aborted(&self) -> Option<&DagpipeError> {
        self.aborted.as_ref()
    }

    pub fn is_success(&self) -> bool {
        self.failures.is_empty() && self.aborted.is_none()
    }

    /// Collapse into the caller-facing result.
    ///
    /// An executor abort wins, since some tasks never got to run. Otherwise
    /// the first recorded task failure is returned unchanged.
    pub fn into_result(self) -> anyhow::Result<()> {
        if let Some(reason) = self.aborted {
            return Err(reason.into());
        }
        match self.failures.into_iter().next() {
            Some(failure) => Err(failure.error),
            None => Ok(()),
        }
    }
}
