// src/lib.rs

//! Dependency-graph task scheduler.
//!
//! - [`dag`] provides an immutable, cycle-checked DAG over any hashable node
//!   type, with neighbour, transitive-closure and topological-order queries.
//! - [`pipeline`] turns fallible closures plus "depends on" / "is a
//!   dependency of" declarations into a runnable [`Pipeline`] that executes
//!   each task once, sequentially or on a worker pool.
//! - [`config`], [`command`] and [`cli`] back the `dagpipe` binary, which
//!   runs shell commands described in a TOML file.

pub mod cli;
pub mod command;
pub mod config;
pub mod dag;
pub mod errors;
pub mod logging;
pub mod pipeline;

use std::path::PathBuf;

use anyhow::Result;
use tracing::{debug, info};

use crate::cli::CliArgs;
use crate::command::build_pipeline;
use crate::config::load_and_validate;
use crate::config::model::ConfigFile;

pub use crate::dag::{edge, BinaryMatrix, DirectedEdge, FixedDag, FixedDagBuilder, Nodes};
pub use crate::errors::DagpipeError;
pub use crate::pipeline::{
    Executor, Pipeline, RunReport, Task, TaskPipelineBuilder, TaskRunState, WorkerPool,
};

/// High-level entry point used by `main.rs`.
///
/// Loads and validates the config, compiles it into a pipeline, then either
/// prints it (`--dot`, `--dry-run`) or runs it to completion.
pub fn run(args: CliArgs) -> Result<()> {
    let config_path = PathBuf::from(&args.config);
    let cfg = load_and_validate(&config_path)?;
    let pipeline = build_pipeline(&cfg, args.compile_jobs())?;

    if args.dot {
        print!("{}", pipeline.dag().to_dot());
        return Ok(());
    }

    if args.dry_run {
        print_dry_run(&cfg, &pipeline, args.jobs_override());
        return Ok(());
    }

    info!(
        config = %config_path.display(),
        tasks = pipeline.dag().node_count(),
        "running pipeline"
    );
    pipeline.call()
}

/// Simple dry-run output: print settings, then tasks in execution order.
fn print_dry_run(cfg: &ConfigFile, pipeline: &Pipeline, jobs_override: Option<usize>) {
    let workers = cfg
        .settings()
        .worker_pool(jobs_override)
        .map_or(0, |pool| pool.worker_threads);

    println!("dagpipe dry-run");
    println!("  config.jobs = {}", cfg.settings().jobs);
    println!("  workers = {workers} (0 = sequential)");
    println!();

    let dag = pipeline.dag();
    println!("execution order ({} tasks):", dag.node_count());
    for (position, task) in dag.topological_sort().into_iter().enumerate() {
        println!("  {}. {task}", position + 1);
        if let Some(tc) = cfg.task(task.name()) {
            println!("      cmd: {}", tc.cmd);
        }
        let after: Vec<&str> = dag
            .tails_of(task)
            .unwrap_or_default()
            .into_iter()
            .map(Task::name)
            .collect();
        if !after.is_empty() {
            println!("      after: {after:?}");
        }
    }

    debug!("dry-run complete (no execution)");
}
