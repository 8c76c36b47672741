// src/pipeline/runner.rs

//! Executable pipeline.
//!
//! Sequential runs walk the topological order on the caller's thread.
//! Parallel runs hand eligible tasks to an [`Executor`] and wait on a channel
//! for completions; the calling thread is the only one that touches the
//! per-run [`Ledger`], so successor counters are decremented one completion at
//! a time.

use std::collections::VecDeque;
use std::fmt;
use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::dag::FixedDag;
use crate::pipeline::executor::Executor;
use crate::pipeline::ledger::Ledger;
use crate::pipeline::report::RunReport;
use crate::pipeline::task::Task;

/// Events flowing from worker threads back to the driving thread.
#[derive(Debug)]
enum RunEvent {
    /// The task's work closure returned.
    Finished {
        index: usize,
        result: anyhow::Result<()>,
    },
    /// The executor discarded the job without running it.
    Dropped { index: usize },
}

/// Sends exactly one [`RunEvent`] for a submitted job: `Finished` when the
/// job runs, `Dropped` if the job is destroyed first.
struct CompletionGuard {
    index: usize,
    tx: Option<mpsc::UnboundedSender<RunEvent>>,
}

impl CompletionGuard {
    fn finish(mut self, result: anyhow::Result<()>) {
        if let Some(tx) = self.tx.take() {
            let _ = tx.send(RunEvent::Finished {
                index: self.index,
                result,
            });
        }
    }
}

impl Drop for CompletionGuard {
    fn drop(&mut self) {
        if let Some(tx) = self.tx.take() {
            let _ = tx.send(RunEvent::Dropped { index: self.index });
        }
    }
}

/// A compiled task graph, ready to run.
///
/// Cheap to clone; clones share the graph and the executor.
#[derive(Clone)]
pub struct Pipeline {
    dag: Arc<FixedDag<Task>>,
    executor: Option<Arc<dyn Executor>>,
}

impl fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pipeline")
            .field("tasks", &self.dag.node_count())
            .field("edges", &self.dag.edge_count())
            .field("parallel", &self.is_parallel())
            .finish()
    }
}

impl Pipeline {
    pub(crate) fn new(dag: FixedDag<Task>, executor: Option<Arc<dyn Executor>>) -> Self {
        Self {
            dag: Arc::new(dag),
            executor,
        }
    }

    pub fn dag(&self) -> &FixedDag<Task> {
        &self.dag
    }

    pub fn is_parallel(&self) -> bool {
        self.executor.is_some()
    }

    /// Run every task once and return the first recorded failure, if any,
    /// exactly as the failing task produced it.
    ///
    /// Blocks until the run has drained. Must not be called from within an
    /// async context.
    pub fn call(&self) -> anyhow::Result<()> {
        self.execute().into_result()
    }

    /// Run every task once and return the full per-task outcome.
    pub fn execute(&self) -> RunReport {
        info!(
            tasks = self.dag.node_count(),
            parallel = self.is_parallel(),
            "pipeline run started"
        );

        let mut ledger = Ledger::new(Arc::clone(&self.dag));
        match &self.executor {
            Some(executor) => run_parallel(executor.as_ref(), &mut ledger),
            None => run_sequential(&self.dag, &mut ledger),
        }

        let report = ledger.into_report();
        info!(
            completed = report.completed().len(),
            failed = report.failed().len(),
            cancelled = report.cancelled().len(),
            "pipeline run finished"
        );
        report
    }
}

fn run_sequential(dag: &FixedDag<Task>, ledger: &mut Ledger) {
    for &index in dag.topological_order() {
        // Anything not eligible here was cancelled by an upstream failure.
        if !ledger.is_eligible(index) {
            continue;
        }

        ledger.mark_running(index);
        let result = ledger.task(index).run();
        ledger.record(index, result);
    }
}

fn run_parallel(executor: &dyn Executor, ledger: &mut Ledger) {
    let (tx, mut rx) = mpsc::unbounded_channel::<RunEvent>();
    let mut ready: VecDeque<usize> = ledger.initially_eligible().into();
    let mut in_flight = 0usize;

    loop {
        while !ledger.is_aborted() {
            let Some(index) = ready.pop_front() else {
                break;
            };

            ledger.mark_running(index);
            let task = ledger.task(index).clone();
            let guard = CompletionGuard {
                index,
                tx: Some(tx.clone()),
            };

            debug!(task = %task, "submitting task to executor");
            in_flight += 1;
            let submitted = executor.execute(Box::new(move || {
                let result = task.run();
                guard.finish(result);
            }));

            // A rejected job is dropped, and its guard reports it below.
            if let Err(err) = submitted {
                ledger.abort(err);
            }
        }

        if in_flight == 0 {
            break;
        }

        let Some(event) = rx.blocking_recv() else {
            break;
        };
        in_flight -= 1;

        match event {
            RunEvent::Finished { index, result } => {
                ready.extend(ledger.record(index, result));
            }
            RunEvent::Dropped { index } => ledger.mark_dropped(index),
        }
    }
}
