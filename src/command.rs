// src/command.rs

//! Shell-command tasks for the `dagpipe` binary.

use std::collections::BTreeMap;
use std::process::Command;

use anyhow::{bail, Context};
use tracing::info;

use crate::config::ConfigFile;
use crate::errors::Result;
use crate::pipeline::{Pipeline, Task, TaskPipelineBuilder, WorkerPool};

/// A task that runs `cmd` through the platform shell and fails on a non-zero
/// exit status. Output goes straight to the inherited stdout/stderr.
pub fn shell_task(name: &str, cmd: &str) -> Task {
    let task_name = name.to_string();
    let cmd = cmd.to_string();

    Task::new(name, move || {
        info!(task = %task_name, cmd = %cmd, "starting task process");

        let mut command = if cfg!(windows) {
            let mut c = Command::new("cmd");
            c.arg("/C").arg(&cmd);
            c
        } else {
            let mut c = Command::new("sh");
            c.arg("-c").arg(&cmd);
            c
        };

        let status = command
            .status()
            .with_context(|| format!("spawning process for task '{task_name}'"))?;

        let code = status.code().unwrap_or(-1);
        info!(
            task = %task_name,
            exit_code = code,
            success = status.success(),
            "task process exited"
        );

        if !status.success() {
            bail!("task '{task_name}' exited with code {code}");
        }
        Ok(())
    })
}

/// Compile a validated config into a pipeline.
///
/// `jobs_override` replaces `[config].jobs`; `Some(0)` forces a sequential
/// run.
pub fn build_pipeline(cfg: &ConfigFile, jobs_override: Option<usize>) -> Result<Pipeline> {
    let tasks: BTreeMap<&str, Task> = cfg
        .tasks()
        .iter()
        .map(|(name, tc)| (name.as_str(), shell_task(name, &tc.cmd)))
        .collect();

    // References were checked when the config was validated.
    let mut builder = TaskPipelineBuilder::new();
    for (name, tc) in cfg.tasks() {
        let task = &tasks[name.as_str()];
        builder
            .task(task)
            .add_dependencies(tc.after.iter().filter_map(|d| tasks.get(d.as_str())))
            .add_dependents(tc.before.iter().filter_map(|d| tasks.get(d.as_str())))
            .add();
    }

    if let Some(pool) = cfg.settings().worker_pool(jobs_override) {
        builder.executor(WorkerPool::with_config(pool)?);
    }

    builder.create()
}
