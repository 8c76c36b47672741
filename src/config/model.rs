// src/config/model.rs

use std::collections::BTreeMap;

use serde::Deserialize;

use crate::pipeline::WorkerPoolConfig;

/// Pipeline description as read from a TOML file, before validation.
///
/// ```toml
/// [config]
/// jobs = 4
///
/// [task.fetch]
/// cmd = "git fetch"
///
/// [task.build]
/// cmd = "make"
/// after = ["fetch"]
/// before = ["package"]
///
/// [task.package]
/// cmd = "make dist"
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct RawConfigFile {
    #[serde(default)]
    pub config: ConfigSection,

    /// All tasks from `[task.<name>]`, keyed by task name.
    #[serde(default)]
    pub task: BTreeMap<String, TaskConfig>,
}

/// Validated pipeline description. Only obtainable through
/// `ConfigFile::try_from(RawConfigFile)` or
/// [`load_and_validate`](crate::config::load_and_validate).
#[derive(Debug, Clone)]
pub struct ConfigFile {
    config: ConfigSection,
    task: BTreeMap<String, TaskConfig>,
}

impl ConfigFile {
    pub(crate) fn new_unchecked(config: ConfigSection, task: BTreeMap<String, TaskConfig>) -> Self {
        Self { config, task }
    }

    /// The `[config]` section.
    pub fn settings(&self) -> &ConfigSection {
        &self.config
    }

    /// Tasks keyed by name. Every `after`/`before` entry names one of them.
    pub fn tasks(&self) -> &BTreeMap<String, TaskConfig> {
        &self.task
    }

    pub fn task(&self, name: &str) -> Option<&TaskConfig> {
        self.task.get(name)
    }
}

/// `[config]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct ConfigSection {
    /// Number of tasks allowed to run at once. `0` (the default) runs every
    /// task on the main thread, one after another.
    #[serde(default)]
    pub jobs: usize,

    /// Name given to worker threads when `jobs > 0`.
    #[serde(default = "default_thread_name")]
    pub thread_name: String,
}

fn default_thread_name() -> String {
    WorkerPoolConfig::default().thread_name
}

impl Default for ConfigSection {
    fn default() -> Self {
        Self {
            jobs: 0,
            thread_name: default_thread_name(),
        }
    }
}

impl ConfigSection {
    /// Worker pool settings for `jobs`, or `None` for a sequential run.
    pub fn worker_pool(&self, jobs_override: Option<usize>) -> Option<WorkerPoolConfig> {
        match jobs_override.unwrap_or(self.jobs) {
            0 => None,
            worker_threads => Some(WorkerPoolConfig {
                worker_threads,
                thread_name: self.thread_name.clone(),
            }),
        }
    }
}

/// `[task.<name>]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct TaskConfig {
    /// Shell command to execute.
    pub cmd: String,

    /// Tasks that must finish before this one starts.
    #[serde(default)]
    pub after: Vec<String>,

    /// Tasks that may only start once this one has finished.
    #[serde(default)]
    pub before: Vec<String>,
}
