//! Display utilities for the lockin CLI.
//!
//! Plain-text rendering of the task checklist and command results.

use crate::types::TaskItem;

/// Number of id characters shown in listings.
const SHORT_ID_LEN: usize = 8;

// ============================================================================
// Display
// ============================================================================

/// Display utilities for CLI output.
pub struct Display;

impl Display {
    /// Renders the checklist, one numbered line per task.
    pub fn task_list(tasks: &[TaskItem]) -> String {
        if tasks.is_empty() {
            return "No tasks yet. Add one to get started!\n".to_string();
        }

        let done = tasks.iter().filter(|t| t.completed).count();
        let mut out = format!("Tasks ({done}/{} done)\n", tasks.len());
        for (i, task) in tasks.iter().enumerate() {
            out.push_str(&Self::task_line(i + 1, task));
            out.push('\n');
        }
        out
    }

    /// Renders one task as `  N. [x] text  (id)`.
    pub fn task_line(position: usize, task: &TaskItem) -> String {
        let checkbox = if task.completed { "[x]" } else { "[ ]" };
        format!(
            "{position:>3}. {checkbox} {}  ({})",
            task.text,
            Self::short_id(&task.id)
        )
    }

    /// Shows the checklist.
    pub fn show_task_list(tasks: &[TaskItem]) {
        print!("{}", Self::task_list(tasks));
    }

    /// Shows a success message for an added task.
    pub fn show_task_added(position: usize, task: &TaskItem) {
        println!("+ Added task");
        println!("{}", Self::task_line(position, task));
    }

    /// Shows the new state of a toggled task.
    pub fn show_task_toggled(position: usize, task: &TaskItem) {
        let verb = if task.completed { "Completed" } else { "Reopened" };
        println!("* {verb} task");
        println!("{}", Self::task_line(position, task));
    }

    /// Shows a success message for a removed task.
    pub fn show_task_removed(task: &TaskItem) {
        println!("- Removed task: {}", task.text);
    }

    /// Shows an error message.
    pub fn show_error(message: &str) {
        eprintln!("Error: {}", message);
    }

    fn short_id(id: &str) -> &str {
        id.get(..SHORT_ID_LEN).unwrap_or(id)
    }
}

// ============================================================================
// Tests
// ============================================================================
