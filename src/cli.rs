// src/cli.rs

//! CLI argument parsing using `clap`.

use clap::{Parser, ValueEnum};

/// Command-line arguments for `dagpipe`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "dagpipe",
    version,
    about = "Run shell commands once each, in dependency order.",
    long_about = None
)]
pub struct CliArgs {
    /// Path to the pipeline file (TOML).
    #[arg(long, value_name = "PATH", default_value = "Dagpipe.toml")]
    pub config: String,

    /// Number of tasks to run at once; overrides `[config].jobs`.
    #[arg(long, short = 'j', value_name = "N", conflicts_with = "sequential")]
    pub jobs: Option<usize>,

    /// Run every task on the main thread, ignoring `[config].jobs`.
    #[arg(long)]
    pub sequential: bool,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `DAGPIPE_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    /// Parse + validate, print the execution order, but don't run anything.
    #[arg(long)]
    pub dry_run: bool,

    /// Print the task graph in Graphviz DOT format and exit.
    #[arg(long)]
    pub dot: bool,
}

impl CliArgs {
    /// Effective `--jobs` override, with `--sequential` meaning zero.
    pub fn jobs_override(&self) -> Option<usize> {
        if self.sequential { Some(0) } else { self.jobs }
    }

    /// Jobs override used to compile the pipeline. `--dot` and `--dry-run`
    /// never execute anything, so they never start a worker pool.
    pub fn compile_jobs(&self) -> Option<usize> {
        if self.dot || self.dry_run {
            Some(0)
        } else {
            self.jobs_override()
        }
    }
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}
