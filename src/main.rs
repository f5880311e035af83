//! LOCK IN - a terminal Pomodoro timer
//!
//! Work in focused intervals:
//! - 25 minutes of focus
//! - 5 minutes of short break
//! - 15 minutes of long break

use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser};
use tracing_subscriber::{fmt, EnvFilter};

use lockin::cli::{
    execute_task_command, resolve_data_dir, Cli, Commands, Display, RunArgs,
};
use lockin::tasks::FileStore;

/// Log file written while the TUI owns the screen.
const LOG_FILE_NAME: &str = "lockin.log";

/// Main entry point
#[tokio::main(flavor = "current_thread")]
async fn main() {
    // Parse command line arguments
    let cli = Cli::parse();

    // Execute command
    if let Err(e) = execute(cli).await {
        Display::show_error(&format!("{e:#}"));
        std::process::exit(1);
    }
}

/// Builds the log filter: `RUST_LOG` wins, else warn or debug with `--verbose`.
fn env_filter(verbose: bool) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if verbose {
            EnvFilter::new("lockin=debug,warn")
        } else {
            EnvFilter::new("warn")
        }
    })
}

/// Initializes the tracing subscriber for logging to stderr.
fn init_tracing(verbose: bool) {
    fmt()
        .with_env_filter(env_filter(verbose))
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .init();
}

/// Initializes the tracing subscriber for logging to `<data_dir>/lockin.log`.
fn init_file_tracing(data_dir: &Path, verbose: bool) -> Result<()> {
    std::fs::create_dir_all(data_dir)
        .with_context(|| format!("Failed to create directory: {}", data_dir.display()))?;

    let path = data_dir.join(LOG_FILE_NAME);
    let log_file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("Failed to open log file: {}", path.display()))?;

    fmt()
        .with_env_filter(env_filter(verbose))
        .with_ansi(false)
        .with_writer(Mutex::new(log_file))
        .init();
    Ok(())
}

/// Executes the CLI command.
async fn execute(cli: Cli) -> Result<()> {
    let Cli {
        command,
        verbose,
        data_dir,
    } = cli;

    match command.unwrap_or_else(|| Commands::Run(RunArgs::default())) {
        Commands::Run(args) => {
            let data_dir = resolve_data_dir(data_dir)?;
            init_file_tracing(&data_dir, verbose)?;
            tracing::info!(?args, "Starting timer");
            lockin::app::run(&args.to_config(data_dir)).await?;
        }
        Commands::Tasks { command } => {
            init_tracing(verbose);
            let data_dir = resolve_data_dir(data_dir)?;
            execute_task_command(&command, Box::new(FileStore::new(data_dir)))?;
        }
        Commands::Completions { shell } => {
            generate_completions(shell);
        }
    }

    Ok(())
}

/// Generates shell completion scripts.
fn generate_completions(shell: clap_complete::Shell) {
    use clap_complete::generate;
    use std::io;

    let mut cmd = Cli::command();
    let bin_name = cmd.get_name().to_string();
    generate(shell, &mut cmd, bin_name, &mut io::stdout());
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parse_no_args_runs_timer() {
        let cli = Cli::parse_from(["lockin"]);
        assert!(cli.command.is_none());
    }

    #[test]
    fn test_cli_parse_tasks_list() {
        let cli = Cli::parse_from(["lockin", "tasks", "list"]);
        assert!(matches!(cli.command, Some(Commands::Tasks { .. })));
    }

    #[test]
    fn test_cli_parse_verbose() {
        let cli = Cli::parse_from(["lockin", "--verbose", "tasks", "list"]);
        assert!(cli.verbose);
    }

    #[test]
    fn test_cli_debug_assert() {
        Cli::command().debug_assert();
    }
}
