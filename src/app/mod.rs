//! Terminal user interface.
//!
//! [`App`] owns the timer engine, the task list and the fullscreen
//! controller and translates terminal input into their operations. The
//! event loop in [`terminal`] feeds it and redraws after every event.

pub mod big_text;
pub mod terminal;
pub mod ui;

use std::path::PathBuf;

use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseEventKind};
use tokio::time::Instant;
use tracing::debug;

use crate::fullscreen::{FullscreenChange, FullscreenController};
use crate::settings::SettingsEditor;
use crate::tasks::TaskList;
use crate::timer::{TickSignal, TimerEngine, TimerEvent};
use crate::types::{DurationConfig, TimerMode};

pub use terminal::run;

/// Size assumed until the terminal reports its own.
pub const DEFAULT_TERMINAL_SIZE: (u16, u16) = (80, 24);

/// Settings the TUI is launched with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Initial mode durations
    pub durations: DurationConfig,
    /// Whether the completion cue is played
    pub sound_enabled: bool,
    /// Sound file to play instead of the built-in chime
    pub sound_path: Option<PathBuf>,
    /// Directory holding the task store and the log file
    pub data_dir: PathBuf,
}

/// Top-level screens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    /// Title screen with the "LOCK IN NOW" call to action
    Landing,
    /// Timer, tabs and task list
    Timer,
}

/// What keyboard input is currently directed at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    AddTask,
    Settings,
}

/// TUI state.
pub struct App {
    route: Route,
    input_mode: InputMode,
    engine: TimerEngine,
    tasks: TaskList,
    fullscreen: FullscreenController,
    settings: Option<SettingsEditor>,
    task_input: String,
    selected_task: usize,
    status: Option<String>,
    should_quit: bool,
    /// Last known terminal size, columns by rows
    terminal_size: (u16, u16),
    /// Size before entering fullscreen; shrinking back to it means the
    /// window left fullscreen
    windowed_size: Option<(u16, u16)>,
}

impl App {
    pub fn new(engine: TimerEngine, tasks: TaskList, fullscreen: FullscreenController) -> Self {
        Self {
            route: Route::Landing,
            input_mode: InputMode::Normal,
            engine,
            tasks,
            fullscreen,
            settings: None,
            task_input: String::new(),
            selected_task: 0,
            status: None,
            should_quit: false,
            terminal_size: DEFAULT_TERMINAL_SIZE,
            windowed_size: None,
        }
    }

    /// Sets the terminal size measured at startup.
    #[must_use]
    pub fn with_terminal_size(mut self, size: (u16, u16)) -> Self {
        self.terminal_size = size;
        self
    }

    // ------------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------------

    pub fn route(&self) -> Route {
        self.route
    }

    pub fn input_mode(&self) -> InputMode {
        self.input_mode
    }

    pub fn engine(&self) -> &TimerEngine {
        &self.engine
    }

    pub fn tasks(&self) -> &TaskList {
        &self.tasks
    }

    pub fn fullscreen(&self) -> &FullscreenController {
        &self.fullscreen
    }

    pub fn settings(&self) -> Option<&SettingsEditor> {
        self.settings.as_ref()
    }

    pub fn task_input(&self) -> &str {
        &self.task_input
    }

    pub fn selected_task(&self) -> usize {
        self.selected_task
    }

    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    pub fn terminal_size(&self) -> (u16, u16) {
        self.terminal_size
    }

    /// When the idle cursor is due to hide, for the event loop to sleep on.
    pub fn idle_deadline(&self) -> Option<Instant> {
        self.fullscreen.idle_deadline()
    }

    // ------------------------------------------------------------------------
    // Inbound events
    // ------------------------------------------------------------------------

    /// Dispatches a terminal event.
    pub fn handle_event(&mut self, event: Event, now: Instant) {
        match event {
            Event::Key(key) if key.kind == KeyEventKind::Press => self.handle_key(key, now),
            Event::Mouse(mouse) => match mouse.kind {
                MouseEventKind::Moved
                | MouseEventKind::Drag(_)
                | MouseEventKind::Down(_)
                | MouseEventKind::ScrollUp
                | MouseEventKind::ScrollDown => self.fullscreen.pointer_moved(now),
                _ => {}
            },
            Event::Resize(columns, rows) => self.on_resize((columns, rows), now),
            _ => {}
        }
    }

    /// Tracks the terminal size and detects fullscreen being left from
    /// outside the app.
    ///
    /// Window managers and terminals announce nothing when they drop
    /// fullscreen on their own; the only trace is the window shrinking back
    /// to the size it had before entering.
    fn on_resize(&mut self, size: (u16, u16), now: Instant) {
        self.terminal_size = size;

        let Some((columns, rows)) = self.windowed_size else {
            return;
        };
        if self.fullscreen.is_active() && size.0 <= columns && size.1 <= rows {
            debug!(?size, "Terminal back at its windowed size, leaving focus view");
            self.fullscreen.on_platform_change(false, now);
            self.sync_windowed_size();
        }
    }

    /// Delivers a scheduler tick to the engine.
    pub fn handle_tick(&mut self, signal: TickSignal) {
        self.engine.handle_tick(signal);
    }

    /// Reacts to an engine transition.
    pub fn on_timer_event(&mut self, event: TimerEvent) {
        match event {
            TimerEvent::Completed { mode } => {
                self.status = Some(format!("{} complete!", mode.label()));
            }
            TimerEvent::Started { .. } | TimerEvent::ModeSwitched { .. } | TimerEvent::Reset { .. } => {
                self.status = None;
            }
            _ => {}
        }
    }

    /// Mirrors a fullscreen change reported by the terminal.
    pub fn on_fullscreen_change(&mut self, change: FullscreenChange, now: Instant) {
        self.fullscreen.on_platform_change(change.active, now);
        self.sync_windowed_size();
    }

    /// Fires the idle deadline if due.
    pub fn poll_idle(&mut self, now: Instant) -> bool {
        self.fullscreen.poll_idle(now)
    }

    /// Cancels the tick schedule and leaves fullscreen.
    pub fn shutdown(&mut self) {
        self.engine.shutdown();
        self.fullscreen.shutdown();
        self.windowed_size = None;
    }

    // ------------------------------------------------------------------------
    // Keyboard
    // ------------------------------------------------------------------------

    /// Handles one key press.
    pub fn handle_key(&mut self, key: KeyEvent, now: Instant) {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.should_quit = true;
            return;
        }

        match self.input_mode {
            InputMode::AddTask => self.handle_add_task_key(key),
            InputMode::Settings => self.handle_settings_key(key),
            InputMode::Normal => match self.route {
                Route::Landing => self.handle_landing_key(key),
                Route::Timer if self.fullscreen.is_active() => self.handle_focus_key(key, now),
                Route::Timer => self.handle_timer_key(key, now),
            },
        }
    }

    fn handle_landing_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Enter | KeyCode::Char(' ') => {
                debug!("Entering timer");
                self.route = Route::Timer;
            }
            KeyCode::Char('q') | KeyCode::Esc => self.should_quit = true,
            _ => {}
        }
    }

    fn handle_focus_key(&mut self, key: KeyEvent, now: Instant) {
        match key.code {
            KeyCode::Char(' ') | KeyCode::Char('s') => self.toggle_running(),
            KeyCode::Char('f') | KeyCode::F(11) | KeyCode::Esc => self.toggle_fullscreen(now),
            KeyCode::Char('q') => self.should_quit = true,
            _ => {}
        }
    }

    fn handle_timer_key(&mut self, key: KeyEvent, now: Instant) {
        match key.code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Esc => self.route = Route::Landing,
            KeyCode::Char(' ') | KeyCode::Char('s') => self.toggle_running(),
            KeyCode::Char('r') => self.engine.reset(),
            KeyCode::Tab | KeyCode::Right => self.switch_mode(self.engine.state().mode.next()),
            KeyCode::BackTab | KeyCode::Left => {
                self.switch_mode(self.engine.state().mode.previous())
            }
            KeyCode::Char('1') => self.switch_mode(TimerMode::Focus),
            KeyCode::Char('2') => self.switch_mode(TimerMode::ShortBreak),
            KeyCode::Char('3') => self.switch_mode(TimerMode::LongBreak),
            KeyCode::Char('f') | KeyCode::F(11) => self.toggle_fullscreen(now),
            KeyCode::Char('o') => {
                self.settings = Some(SettingsEditor::open(self.engine.durations()));
                self.input_mode = InputMode::Settings;
            }
            KeyCode::Char('a') => {
                self.task_input.clear();
                self.input_mode = InputMode::AddTask;
            }
            KeyCode::Down | KeyCode::Char('j') => self.select_task(1),
            KeyCode::Up | KeyCode::Char('k') => self.select_task(-1),
            KeyCode::Enter | KeyCode::Char('x') => {
                if let Some(id) = self.selected_task_id() {
                    self.tasks.toggle(&id);
                }
            }
            KeyCode::Char('d') | KeyCode::Delete => {
                if let Some(id) = self.selected_task_id() {
                    self.tasks.remove(&id);
                    self.clamp_selection();
                }
            }
            _ => {}
        }
    }

    fn handle_add_task_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Enter => {
                if self.tasks.add(&self.task_input).is_some() {
                    self.selected_task = self.tasks.len() - 1;
                }
                self.task_input.clear();
                self.input_mode = InputMode::Normal;
            }
            KeyCode::Esc => {
                self.task_input.clear();
                self.input_mode = InputMode::Normal;
            }
            KeyCode::Backspace => {
                self.task_input.pop();
            }
            KeyCode::Char(c) => self.task_input.push(c),
            _ => {}
        }
    }

    fn handle_settings_key(&mut self, key: KeyEvent) {
        if key.code == KeyCode::Enter {
            if let Some(editor) = self.settings.take() {
                editor.apply(&mut self.engine);
            }
            self.input_mode = InputMode::Normal;
            return;
        }
        if key.code == KeyCode::Esc {
            self.settings = None;
            self.input_mode = InputMode::Normal;
            return;
        }

        let Some(editor) = self.settings.as_mut() else {
            self.input_mode = InputMode::Normal;
            return;
        };
        match key.code {
            KeyCode::Tab | KeyCode::Down => editor.focus_next(),
            KeyCode::BackTab | KeyCode::Up => editor.focus_previous(),
            KeyCode::Right | KeyCode::Char('+') => editor.increment(),
            KeyCode::Left | KeyCode::Char('-') => editor.decrement(),
            KeyCode::Backspace => editor.backspace(),
            KeyCode::Char(c) => editor.input_char(c),
            _ => {}
        }
    }

    // ------------------------------------------------------------------------
    // Helpers
    // ------------------------------------------------------------------------

    fn toggle_running(&mut self) {
        if self.engine.state().running {
            self.engine.pause();
        } else {
            self.engine.start();
        }
    }

    fn toggle_fullscreen(&mut self, now: Instant) {
        self.fullscreen.toggle(now);
        self.sync_windowed_size();
    }

    /// Remembers the pre-fullscreen size on entry and forgets it on exit.
    fn sync_windowed_size(&mut self) {
        if !self.fullscreen.is_active() {
            self.windowed_size = None;
        } else if self.windowed_size.is_none() {
            self.windowed_size = Some(self.terminal_size);
        }
    }

    fn switch_mode(&mut self, mode: TimerMode) {
        self.engine.switch_mode(mode);
    }

    fn selected_task_id(&self) -> Option<String> {
        self.tasks.tasks().get(self.selected_task).map(|t| t.id.clone())
    }

    fn select_task(&mut self, delta: isize) {
        if self.tasks.is_empty() {
            self.selected_task = 0;
            return;
        }
        let last = self.tasks.len() - 1;
        self.selected_task = self.selected_task.saturating_add_signed(delta).min(last);
    }

    fn clamp_selection(&mut self) {
        self.selected_task = self.selected_task.min(self.tasks.len().saturating_sub(1));
    }
}

impl std::fmt::Debug for App {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("App")
            .field("route", &self.route)
            .field("input_mode", &self.input_mode)
            .field("engine", &self.engine)
            .field("fullscreen", &self.fullscreen)
            .finish_non_exhaustive()
    }
}
