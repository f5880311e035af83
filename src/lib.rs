//! LOCK IN - a terminal Pomodoro timer
//!
//! This library provides the core functionality for the lockin binary.
//! It includes:
//! - Timer engine with cancellable, generation-tagged tick scheduling
//! - Persisted task checklist over a flat key-value store
//! - Settings form with bounded minute fields
//! - Fullscreen focus mode with idle cursor hiding
//! - Best-effort completion sound (terminal bell, or rodio with `audio`)
//! - ratatui terminal UI and CLI command parsing

pub mod app;
pub mod cli;
pub mod fullscreen;
pub mod settings;
pub mod sound;
pub mod tasks;
pub mod timer;
pub mod types;

// Re-export commonly used types for convenience
pub use types::{format_time, DurationConfig, FullscreenState, TaskItem, TimerMode, TimerState};

pub use timer::{MockTickScheduler, TickHandle, TickScheduler, TickSignal, TimerEngine, TimerEvent};

pub use tasks::{FileStore, KeyValueStore, MemoryStore, StoreError, TaskList, TASKS_KEY};

pub use settings::SettingsEditor;

pub use fullscreen::{
    FullscreenBackend, FullscreenChange, FullscreenController, FullscreenError,
    MockFullscreenBackend,
};

// Re-export sound types
pub use sound::{get_default_sound, CompletionCue, MockSoundPlayer, SoundError, SoundPlayer, SoundSource};
