// src/config/validate.rs

//! Structural checks on a freshly parsed config.
//!
//! Cycles are not checked here: compiling the tasks into a pipeline builds a
//! `FixedDag`, which rejects them with [`DagpipeError::Cycle`].

use crate::config::model::{ConfigFile, RawConfigFile};
use crate::errors::{DagpipeError, Result};

impl TryFrom<RawConfigFile> for ConfigFile {
    type Error = DagpipeError;

    fn try_from(raw: RawConfigFile) -> std::result::Result<Self, Self::Error> {
        validate_raw_config(&raw)?;
        Ok(ConfigFile::new_unchecked(raw.config, raw.task))
    }
}

fn validate_raw_config(cfg: &RawConfigFile) -> Result<()> {
    ensure_has_tasks(cfg)?;
    validate_task_references(cfg)?;
    Ok(())
}

fn ensure_has_tasks(cfg: &RawConfigFile) -> Result<()> {
    if cfg.task.is_empty() {
        return Err(DagpipeError::ConfigError(
            "config must contain at least one [task.<name>] section".to_string(),
        ));
    }
    Ok(())
}

fn validate_task_references(cfg: &RawConfigFile) -> Result<()> {
    for (name, task) in cfg.task.iter() {
        let references = task
            .after
            .iter()
            .map(|r| ("after", r))
            .chain(task.before.iter().map(|r| ("before", r)));

        for (field, reference) in references {
            if !cfg.task.contains_key(reference) {
                return Err(DagpipeError::ConfigError(format!(
                    "task '{}' has unknown task '{}' in `{}`",
                    name, reference, field
                )));
            }
            if reference == name {
                return Err(DagpipeError::ConfigError(format!(
                    "task '{}' cannot reference itself in `{}`",
                    name, field
                )));
            }
        }
    }
    Ok(())
}
