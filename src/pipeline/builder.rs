// src/pipeline/builder.rs

use std::collections::HashSet;
use std::sync::Arc;

use tracing::debug;

use crate::dag::{edge, FixedDag};
use crate::errors::{DagpipeError, Result};
use crate::pipeline::executor::Executor;
use crate::pipeline::runner::Pipeline;
use crate::pipeline::task::Task;

/// Declared relations of one registered task.
#[derive(Debug, Clone)]
struct TaskSpec {
    task: Task,
    /// Must finish before `task` starts.
    dependencies: Vec<Task>,
    /// May only start after `task` finishes.
    dependents: Vec<Task>,
}

/// Collects tasks and their relations and compiles them into a [`Pipeline`].
///
/// ```
/// # use dagpipe::pipeline::{Task, TaskPipelineBuilder, WorkerPool};
/// # fn main() -> anyhow::Result<()> {
/// # let fetch = Task::new("fetch", || Ok(()));
/// # let compile = Task::new("compile", || Ok(()));
/// # let package = Task::new("package", || Ok(()));
/// let mut builder = TaskPipelineBuilder::new();
/// builder.task(&compile).add_dependency(&fetch).add_dependent(&package).add();
/// builder.executor(WorkerPool::new(4)?);
/// builder.create()?.call()?;
/// # Ok(())
/// # }
/// ```
///
/// Tasks that only appear as a dependency or dependent of another task are
/// part of the graph and run like any other.
#[derive(Default)]
pub struct TaskPipelineBuilder {
    specs: Vec<TaskSpec>,
    executor: Option<Arc<dyn Executor>>,
}

impl TaskPipelineBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start registering `task`. Nothing is recorded until
    /// [`TaskSpecBuilder::add`] is called.
    pub fn task(&mut self, task: &Task) -> TaskSpecBuilder<'_> {
        TaskSpecBuilder {
            builder: self,
            spec: TaskSpec {
                task: task.clone(),
                dependencies: Vec::new(),
                dependents: Vec::new(),
            },
        }
    }

    /// Run tasks on `executor` instead of the calling thread.
    pub fn executor(&mut self, executor: impl Executor + 'static) -> &mut Self {
        self.executor = Some(Arc::new(executor));
        self
    }

    /// Like [`executor`](Self::executor), for an executor shared with other
    /// pipelines.
    pub fn shared_executor(&mut self, executor: Arc<dyn Executor>) -> &mut Self {
        self.executor = Some(executor);
        self
    }

    /// Run tasks on the calling thread (the default).
    pub fn sequential(&mut self) -> &mut Self {
        self.executor = None;
        self
    }

    /// Compile the registered tasks into a runnable pipeline.
    ///
    /// Fails if a task was registered twice, if nothing was registered, or if
    /// the declared relations form a cycle.
    pub fn create(&self) -> Result<Pipeline> {
        let mut registered = HashSet::new();
        for spec in &self.specs {
            if !registered.insert(&spec.task) {
                return Err(DagpipeError::DuplicateTask(spec.task.name().to_string()));
            }
        }

        let mut graph = FixedDag::builder();
        for spec in &self.specs {
            graph = graph.add_node(spec.task.clone());
            for dependency in &spec.dependencies {
                graph = graph.add_edge(edge(dependency.clone(), spec.task.clone()));
            }
            for dependent in &spec.dependents {
                graph = graph.add_edge(edge(spec.task.clone(), dependent.clone()));
            }
        }
        let dag = graph.create()?;

        debug!(
            registered = self.specs.len(),
            tasks = dag.node_count(),
            edges = dag.edge_count(),
            parallel = self.executor.is_some(),
            "task pipeline compiled"
        );

        Ok(Pipeline::new(dag, self.executor.clone()))
    }
}

/// Relations of a single task being registered with a
/// [`TaskPipelineBuilder`].
#[must_use = "a task is only registered once `add()` is called"]
pub struct TaskSpecBuilder<'a> {
    builder: &'a mut TaskPipelineBuilder,
    spec: TaskSpec,
}

impl TaskSpecBuilder<'_> {
    /// `dependency` must finish before this task starts.
    pub fn add_dependency(mut self, dependency: &Task) -> Self {
        self.spec.dependencies.push(dependency.clone());
        self
    }

    pub fn add_dependencies<'t>(mut self, dependencies: impl IntoIterator<Item = &'t Task>) -> Self {
        self.spec.dependencies.extend(dependencies.into_iter().cloned());
        self
    }

    /// `dependent` may only start after this task finishes.
    pub fn add_dependent(mut self, dependent: &Task) -> Self {
        self.spec.dependents.push(dependent.clone());
        self
    }

    pub fn add_dependents<'t>(mut self, dependents: impl IntoIterator<Item = &'t Task>) -> Self {
        self.spec.dependents.extend(dependents.into_iter().cloned());
        self
    }

    /// Record the task and its relations with the builder.
    pub fn add(self) {
        self.builder.specs.push(self.spec);
    }
}
