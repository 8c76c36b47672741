// src/pipeline/task.rs

//! Units of work scheduled by a pipeline.

use std::any::Any;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use anyhow::anyhow;

type Work = dyn Fn() -> anyhow::Result<()> + Send + Sync;

/// A named, fallible, argument-less unit of work.
///
/// `Task` is a shared handle: cloning it is cheap and every clone refers to
/// the same task. Identity is the handle itself, not the name, so two tasks
/// created separately are always distinct graph nodes even if they share a
/// display name.
#[derive(Clone)]
pub struct Task {
    inner: Arc<TaskInner>,
}

struct TaskInner {
    name: String,
    work: Box<Work>,
}

impl Task {
    pub fn new<F>(name: impl Into<String>, work: F) -> Self
    where
        F: Fn() -> anyhow::Result<()> + Send + Sync + 'static,
    {
        Self {
            inner: Arc::new(TaskInner {
                name: name.into(),
                work: Box::new(work),
            }),
        }
    }

    pub fn name(&self) -> &str {
        &self.inner.name
    }

    /// Run the work closure once.
    ///
    /// A panic inside the closure is caught and reported as an error, so a
    /// worker thread always gets to report back.
    pub(crate) fn run(&self) -> anyhow::Result<()> {
        match panic::catch_unwind(AssertUnwindSafe(|| (self.inner.work)())) {
            Ok(result) => result,
            Err(payload) => Err(anyhow!(
                "task '{}' panicked: {}",
                self.name(),
                panic_message(payload.as_ref())
            )),
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.as_str()
    } else {
        "<non-string panic payload>"
    }
}

impl PartialEq for Task {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl Eq for Task {}

impl Hash for Task {
    fn hash<H: Hasher>(&self, state: &mut H) {
        (Arc::as_ptr(&self.inner) as *const ()).hash(state);
    }
}

impl fmt::Debug for Task {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Task").field(&self.inner.name).finish()
    }
}

impl fmt::Display for Task {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.inner.name)
    }
}
