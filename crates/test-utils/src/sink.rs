use std::sync::{Arc, Mutex};

use anyhow::bail;
use dagpipe::Task;

/// Shared string that tasks append their names to, so tests can see what ran
/// and in which order.
#[derive(Debug, Clone, Default)]
pub struct Sink {
    buf: Arc<Mutex<String>>,
}

impl Sink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, s: &str) {
        self.buf.lock().unwrap().push_str(s);
    }

    pub fn contents(&self) -> String {
        self.buf.lock().unwrap().clone()
    }

    /// Characters written so far, sorted. Handy for parallel runs where the
    /// order is not fixed.
    pub fn sorted(&self) -> String {
        let mut chars: Vec<char> = self.contents().chars().collect();
        chars.sort_unstable();
        chars.into_iter().collect()
    }

    /// A task that appends `name` to this sink.
    pub fn task(&self, name: &str) -> Task {
        let sink = self.clone();
        let label = name.to_string();
        Task::new(name, move || {
            sink.push(&label);
            Ok(())
        })
    }

    /// A task that fails with `"<name> failed"` without writing anything.
    pub fn failing_task(&self, name: &str) -> Task {
        let label = name.to_string();
        Task::new(name, move || bail!("{label} failed"))
    }
}
