//! CLI module for lockin.
//!
//! This module provides the command-line interface:
//! - `commands`: Command definitions using clap derive
//! - `display`: Output formatting and display logic
//!
//! The task subcommands operate on the same store the TUI uses.

pub mod commands;
pub mod display;

pub use commands::{Cli, Commands, RunArgs, TaskCommand};
pub use display::Display;

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use tracing::debug;

use crate::tasks::{KeyValueStore, TaskList};

/// Name of the data directory under the platform data dir.
pub const APP_DIR_NAME: &str = "lockin";

/// Resolves the data directory: the explicit one, else `<data_dir>/lockin`.
pub fn resolve_data_dir(explicit: Option<PathBuf>) -> Result<PathBuf> {
    if let Some(dir) = explicit {
        return Ok(dir);
    }
    let base = dirs::data_dir().context("Could not determine the data directory, pass --data-dir")?;
    Ok(base.join(APP_DIR_NAME))
}

/// Executes a `tasks` subcommand against `store`.
pub fn execute_task_command(command: &TaskCommand, store: Box<dyn KeyValueStore>) -> Result<()> {
    let mut tasks = TaskList::load(store);
    debug!(?command, count = tasks.len(), "Executing task command");

    match command {
        TaskCommand::List => {
            Display::show_task_list(tasks.tasks());
        }
        TaskCommand::Add { text } => {
            let text = TaskCommand::add_text(text);
            let Some(task) = tasks.add(&text).cloned() else {
                bail!("Task text cannot be empty");
            };
            check_saved(&mut tasks)?;
            Display::show_task_added(tasks.len(), &task);
        }
        TaskCommand::Toggle { task } => {
            let id = tasks.resolve(task)?;
            tasks.toggle(&id);
            check_saved(&mut tasks)?;
            if let Some(position) = tasks.tasks().iter().position(|t| t.id == id) {
                Display::show_task_toggled(position + 1, &tasks.tasks()[position]);
            }
        }
        TaskCommand::Remove { task } => {
            let id = tasks.resolve(task)?;
            let removed = tasks.get(&id).cloned();
            tasks.remove(&id);
            check_saved(&mut tasks)?;
            if let Some(removed) = removed {
                Display::show_task_removed(&removed);
            }
        }
    }

    Ok(())
}

fn check_saved(tasks: &mut TaskList) -> Result<()> {
    match tasks.take_save_error() {
        Some(e) => Err(e).context("Failed to save tasks"),
        None => Ok(()),
    }
}
