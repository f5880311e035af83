//! Core data types for the Lockin timer.
//!
//! This module defines the data structures used for:
//! - Timer modes and their configured durations
//! - Countdown state owned by the timer engine
//! - Persisted task items
//! - Fullscreen presentation state

use serde::{Deserialize, Serialize};

// ============================================================================
// TimerMode
// ============================================================================

/// The three timer modes, shown as tabs in the timer view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimerMode {
    /// Focused work session
    Focus,
    /// Short break between sessions
    ShortBreak,
    /// Long break
    LongBreak,
}

impl TimerMode {
    /// All modes in tab order.
    pub const ALL: [TimerMode; 3] = [TimerMode::Focus, TimerMode::ShortBreak, TimerMode::LongBreak];

    /// Returns the string representation of the mode.
    pub fn as_str(&self) -> &'static str {
        match self {
            TimerMode::Focus => "focus",
            TimerMode::ShortBreak => "short_break",
            TimerMode::LongBreak => "long_break",
        }
    }

    /// Returns the tab caption for the mode.
    pub fn label(&self) -> &'static str {
        match self {
            TimerMode::Focus => "Pomodoro",
            TimerMode::ShortBreak => "Short Break",
            TimerMode::LongBreak => "Long Break",
        }
    }

    /// Position of the mode in [`TimerMode::ALL`].
    pub fn index(&self) -> usize {
        match self {
            TimerMode::Focus => 0,
            TimerMode::ShortBreak => 1,
            TimerMode::LongBreak => 2,
        }
    }

    /// The tab to the right, wrapping around.
    pub fn next(&self) -> Self {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }

    /// The tab to the left, wrapping around.
    pub fn previous(&self) -> Self {
        Self::ALL[(self.index() + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

impl Default for TimerMode {
    fn default() -> Self {
        TimerMode::Focus
    }
}

// ============================================================================
// DurationConfig
// ============================================================================

/// Default focus duration in seconds (25 minutes).
pub const DEFAULT_FOCUS_SECONDS: u32 = 25 * 60;
/// Default short break duration in seconds (5 minutes).
pub const DEFAULT_SHORT_BREAK_SECONDS: u32 = 5 * 60;
/// Default long break duration in seconds (15 minutes).
pub const DEFAULT_LONG_BREAK_SECONDS: u32 = 15 * 60;

/// Configured duration of each timer mode, in seconds.
///
/// Every duration is at least one second; the constructors floor smaller
/// values so a zero-length mode cannot be configured.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DurationConfig {
    focus: u32,
    short_break: u32,
    long_break: u32,
}

impl Default for DurationConfig {
    fn default() -> Self {
        Self {
            focus: DEFAULT_FOCUS_SECONDS,
            short_break: DEFAULT_SHORT_BREAK_SECONDS,
            long_break: DEFAULT_LONG_BREAK_SECONDS,
        }
    }
}

impl DurationConfig {
    /// Creates a configuration from durations in seconds.
    pub fn from_seconds(focus: u32, short_break: u32, long_break: u32) -> Self {
        Self {
            focus: focus.max(1),
            short_break: short_break.max(1),
            long_break: long_break.max(1),
        }
    }

    /// Creates a configuration from durations in minutes.
    pub fn from_minutes(focus: u32, short_break: u32, long_break: u32) -> Self {
        Self::from_seconds(
            focus.saturating_mul(60),
            short_break.saturating_mul(60),
            long_break.saturating_mul(60),
        )
    }

    /// Returns the duration of `mode` in seconds.
    pub fn get(&self, mode: TimerMode) -> u32 {
        match mode {
            TimerMode::Focus => self.focus,
            TimerMode::ShortBreak => self.short_break,
            TimerMode::LongBreak => self.long_break,
        }
    }

    /// Returns a copy with the duration of `mode` replaced.
    pub fn with(mut self, mode: TimerMode, seconds: u32) -> Self {
        let seconds = seconds.max(1);
        match mode {
            TimerMode::Focus => self.focus = seconds,
            TimerMode::ShortBreak => self.short_break = seconds,
            TimerMode::LongBreak => self.long_break = seconds,
        }
        self
    }

    /// Returns the duration of `mode` in whole minutes (rounded down).
    pub fn minutes(&self, mode: TimerMode) -> u32 {
        self.get(mode) / 60
    }
}

// ============================================================================
// TimerState
// ============================================================================

/// Countdown state owned by the timer engine.
///
/// Never persisted; every launch starts from a fresh focus countdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimerState {
    /// Currently selected mode
    pub mode: TimerMode,
    /// Remaining seconds in the current countdown
    pub remaining_seconds: u32,
    /// Whether the countdown is ticking
    pub running: bool,
}

impl TimerState {
    /// Creates the initial state: focus mode, full duration, not running.
    pub fn new(durations: &DurationConfig) -> Self {
        Self {
            mode: TimerMode::Focus,
            remaining_seconds: durations.get(TimerMode::Focus),
            running: false,
        }
    }

    /// Returns true once the countdown has reached zero.
    pub fn is_finished(&self) -> bool {
        self.remaining_seconds == 0
    }

    /// Remaining time rendered as `MM:SS`.
    pub fn display(&self) -> String {
        format_time(self.remaining_seconds)
    }
}

/// Formats seconds as `MM:SS`.
///
/// Both parts are zero-padded to two digits. There is no hour component, so
/// durations of 100 minutes or more render with a wider minute field.
pub fn format_time(total_seconds: u32) -> String {
    let minutes = total_seconds / 60;
    let seconds = total_seconds % 60;
    format!("{:02}:{:02}", minutes, seconds)
}

// ============================================================================
// TaskItem
// ============================================================================

/// A checklist entry persisted between sessions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskItem {
    /// Opaque unique id
    pub id: String,
    /// Task description (never blank)
    pub text: String,
    /// Whether the task has been checked off
    pub completed: bool,
}

impl TaskItem {
    /// Creates an uncompleted task with a fresh UUID.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            text: text.into(),
            completed: false,
        }
    }
}

// ============================================================================
// FullscreenState
// ============================================================================

/// Observed fullscreen presentation state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FullscreenState {
    /// Whether the focus-mode fullscreen view is active
    pub active: bool,
    /// Whether the pointer cursor (and on-screen controls) are shown
    pub cursor_visible: bool,
}

impl Default for FullscreenState {
    fn default() -> Self {
        Self {
            active: false,
            cursor_visible: true,
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
