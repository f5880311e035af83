//! Command definitions for the lockin CLI.
//!
//! Uses clap derive macro for argument parsing.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::app::AppConfig;
use crate::settings::{FOCUS_MAX_MINUTES, LONG_BREAK_MAX_MINUTES, SHORT_BREAK_MAX_MINUTES};
use crate::types::DurationConfig;

// ============================================================================
// CLI Structure
// ============================================================================

/// LOCK IN - a terminal Pomodoro timer
#[derive(Parser, Debug)]
#[command(
    name = "lockin",
    version,
    about = "A terminal Pomodoro timer with a task checklist and fullscreen focus mode",
    long_about = "Work in focused Pomodoro intervals from the terminal.\n\
                  Running without a subcommand opens the timer.",
    propagate_version = true
)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Enable verbose output for debugging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Directory for the task store and log file
    #[arg(long, global = true, env = "LOCKIN_DATA_DIR", value_name = "DIR")]
    pub data_dir: Option<PathBuf>,
}

// ============================================================================
// Subcommands
// ============================================================================

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Open the timer (default)
    Run(RunArgs),

    /// Manage the task checklist
    Tasks {
        #[command(subcommand)]
        command: TaskCommand,
    },

    /// Generate shell completion scripts
    Completions {
        /// Shell type for completion script
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

/// Task checklist subcommands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum TaskCommand {
    /// List all tasks
    List,

    /// Add a task
    Add {
        /// Task description
        #[arg(required = true, num_args = 1..)]
        text: Vec<String>,
    },

    /// Mark a task done, or not done again
    Toggle {
        /// Task position (1-based) or id prefix
        task: String,
    },

    /// Delete a task
    Remove {
        /// Task position (1-based) or id prefix
        task: String,
    },
}

impl TaskCommand {
    /// Text of an `add` command, words joined by single spaces.
    pub fn add_text(words: &[String]) -> String {
        words.join(" ")
    }
}

// ============================================================================
// Run Command Arguments
// ============================================================================

/// Arguments for the run command
#[derive(Args, Debug, Clone, PartialEq, Eq)]
pub struct RunArgs {
    /// Focus duration in minutes (1-90)
    #[arg(
        short,
        long,
        default_value = "25",
        value_parser = clap::value_parser!(u32).range(1..=FOCUS_MAX_MINUTES as i64)
    )]
    pub focus: u32,

    /// Short break duration in minutes (1-30)
    #[arg(
        short,
        long,
        default_value = "5",
        value_parser = clap::value_parser!(u32).range(1..=SHORT_BREAK_MAX_MINUTES as i64)
    )]
    pub short_break: u32,

    /// Long break duration in minutes (1-60)
    #[arg(
        short,
        long,
        default_value = "15",
        value_parser = clap::value_parser!(u32).range(1..=LONG_BREAK_MAX_MINUTES as i64)
    )]
    pub long_break: u32,

    /// Disable the completion sound
    #[arg(long)]
    pub no_sound: bool,

    /// Sound file to play on completion instead of the built-in chime
    #[arg(long, value_name = "FILE", conflicts_with = "no_sound")]
    pub sound: Option<PathBuf>,
}

impl Default for RunArgs {
    fn default() -> Self {
        Self {
            focus: 25,
            short_break: 5,
            long_break: 15,
            no_sound: false,
            sound: None,
        }
    }
}

impl RunArgs {
    /// Mode durations selected on the command line.
    pub fn durations(&self) -> DurationConfig {
        DurationConfig::from_minutes(self.focus, self.short_break, self.long_break)
    }

    /// Builds the TUI configuration.
    pub fn to_config(&self, data_dir: PathBuf) -> AppConfig {
        AppConfig {
            durations: self.durations(),
            sound_enabled: !self.no_sound,
            sound_path: self.sound.clone(),
            data_dir,
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    // ------------------------------------------------------------------------
    // Cli Tests
    // ------------------------------------------------------------------------

    mod cli_tests {
        use super::*;

        #[test]
        fn test_parse_no_args() {
            let cli = Cli::try_parse_from(["lockin"]).unwrap();
            assert!(cli.command.is_none());
            assert!(!cli.verbose);
        }

        #[test]
        fn test_parse_verbose_flag() {
            let cli = Cli::try_parse_from(["lockin", "-v", "tasks", "list"]).unwrap();
            assert!(cli.verbose);
        }

        #[test]
        fn test_parse_data_dir() {
            let cli = Cli::try_parse_from(["lockin", "tasks", "list", "--data-dir", "/tmp/x"]).unwrap();
            assert_eq!(cli.data_dir, Some(PathBuf::from("/tmp/x")));
        }

        #[test]
        fn test_parse_completions_bash() {
            let cli = Cli::try_parse_from(["lockin", "completions", "bash"]).unwrap();
            match cli.command {
                Some(Commands::Completions { shell }) => {
                    assert_eq!(shell, clap_complete::Shell::Bash);
                }
                _ => panic!("Expected Completions command"),
            }
        }

        #[test]
        fn test_invalid_subcommand() {
            assert!(Cli::try_parse_from(["lockin", "nope"]).is_err());
        }
    }

    // ------------------------------------------------------------------------
    // Run Tests
    // ------------------------------------------------------------------------

    mod run_args_tests {
        use super::*;

        fn run_args(args: &[&str]) -> Result<RunArgs, clap::Error> {
            let mut argv = vec!["lockin", "run"];
            argv.extend_from_slice(args);
            match Cli::try_parse_from(argv)?.command {
                Some(Commands::Run(args)) => Ok(args),
                other => panic!("Expected Run command, got {other:?}"),
            }
        }

        #[test]
        fn test_defaults() {
            let args = run_args(&[]).unwrap();
            assert_eq!(args, RunArgs::default());
            assert_eq!(args.durations(), DurationConfig::default());
        }

        #[test]
        fn test_custom_durations() {
            let args = run_args(&["--focus", "50", "-s", "10", "--long-break", "30"]).unwrap();
            assert_eq!(args.durations(), DurationConfig::from_minutes(50, 10, 30));
        }

        #[test]
        fn test_bounds() {
            assert!(run_args(&["--focus", "90"]).is_ok());
            assert!(run_args(&["--focus", "91"]).is_err());
            assert!(run_args(&["--focus", "0"]).is_err());
            assert!(run_args(&["--short-break", "31"]).is_err());
            assert!(run_args(&["--long-break", "61"]).is_err());
        }

        #[test]
        fn test_sound_conflicts_with_no_sound() {
            assert!(run_args(&["--no-sound", "--sound", "bell.wav"]).is_err());
        }

        #[test]
        fn test_to_config() {
            let args = run_args(&["--no-sound"]).unwrap();
            let config = args.to_config(PathBuf::from("/data"));
            assert!(!config.sound_enabled);
            assert_eq!(config.data_dir, PathBuf::from("/data"));
            assert_eq!(config.sound_path, None);
        }
    }

    // ------------------------------------------------------------------------
    // Task Command Tests
    // ------------------------------------------------------------------------

    mod task_command_tests {
        use super::*;

        fn task_command(args: &[&str]) -> Result<TaskCommand, clap::Error> {
            let mut argv = vec!["lockin", "tasks"];
            argv.extend_from_slice(args);
            match Cli::try_parse_from(argv)?.command {
                Some(Commands::Tasks { command }) => Ok(command),
                other => panic!("Expected Tasks command, got {other:?}"),
            }
        }

        #[test]
        fn test_add_joins_words() {
            let command = task_command(&["add", "Write", "the", "report"]).unwrap();
            match command {
                TaskCommand::Add { text } => {
                    assert_eq!(TaskCommand::add_text(&text), "Write the report");
                }
                _ => panic!("Expected Add"),
            }
        }

        #[test]
        fn test_add_requires_text() {
            assert!(task_command(&["add"]).is_err());
        }

        #[test]
        fn test_toggle_and_remove() {
            assert_eq!(
                task_command(&["toggle", "2"]).unwrap(),
                TaskCommand::Toggle {
                    task: "2".to_string()
                }
            );
            assert_eq!(
                task_command(&["remove", "ab12"]).unwrap(),
                TaskCommand::Remove {
                    task: "ab12".to_string()
                }
            );
        }
    }
}
