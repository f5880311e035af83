//! Fullscreen focus view.
//!
//! [`FullscreenController`] owns the fullscreen state machine. It asks a
//! [`FullscreenBackend`] to enter or leave fullscreen, mirrors what the
//! terminal reports back, and hides the cursor after a few idle seconds
//! while fullscreen is active.
//!
//! The controller only changes `state.active` once the backend confirms a
//! change, either synchronously after a successful request or through a
//! [`FullscreenChange`] notification (e.g. the user left fullscreen with
//! the window manager).

mod backend;
mod error;
mod idle;

pub use backend::{
    select_backend, BackendKind, ChangeNotifier, MockFullscreenBackend, TerminalEnv,
    Unsupported, VteMaximize, XtermFullscreen,
};
pub use error::FullscreenError;
pub use idle::{IdleCursor, IDLE_CURSOR_WINDOW};

use std::rc::Rc;
use std::sync::Arc;

use tokio::time::{Duration, Instant};
use tracing::{debug, warn};

use crate::types::FullscreenState;

/// Platform notification that fullscreen was entered or left.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FullscreenChange {
    pub active: bool,
}

/// A way of putting the terminal into fullscreen.
pub trait FullscreenBackend {
    /// Short identifier used in logs.
    fn name(&self) -> &'static str;

    /// Returns true if this backend can enter fullscreen at all.
    fn is_supported(&self) -> bool;

    /// Asks the terminal to enter fullscreen.
    fn request(&self) -> Result<(), FullscreenError>;

    /// Asks the terminal to leave fullscreen.
    fn exit(&self) -> Result<(), FullscreenError>;

    /// Whether the terminal is currently fullscreen, as far as the backend knows.
    fn is_fullscreen(&self) -> bool;
}

impl<T: FullscreenBackend + ?Sized> FullscreenBackend for Arc<T> {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn is_supported(&self) -> bool {
        (**self).is_supported()
    }

    fn request(&self) -> Result<(), FullscreenError> {
        (**self).request()
    }

    fn exit(&self) -> Result<(), FullscreenError> {
        (**self).exit()
    }

    fn is_fullscreen(&self) -> bool {
        (**self).is_fullscreen()
    }
}

impl<T: FullscreenBackend + ?Sized> FullscreenBackend for Rc<T> {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn is_supported(&self) -> bool {
        (**self).is_supported()
    }

    fn request(&self) -> Result<(), FullscreenError> {
        (**self).request()
    }

    fn exit(&self) -> Result<(), FullscreenError> {
        (**self).exit()
    }

    fn is_fullscreen(&self) -> bool {
        (**self).is_fullscreen()
    }
}

/// Fullscreen state machine with idle cursor hiding.
pub struct FullscreenController {
    backend: Box<dyn FullscreenBackend>,
    state: FullscreenState,
    idle: IdleCursor,
}

impl FullscreenController {
    /// Creates a controller with the default 3 second idle window.
    pub fn new(backend: Box<dyn FullscreenBackend>) -> Self {
        Self::with_idle_window(backend, IDLE_CURSOR_WINDOW)
    }

    pub fn with_idle_window(backend: Box<dyn FullscreenBackend>, window: Duration) -> Self {
        Self {
            backend,
            state: FullscreenState::default(),
            idle: IdleCursor::new(window),
        }
    }

    /// Requests fullscreen when inactive, exits it when active.
    ///
    /// A failed request is logged and leaves the state unchanged.
    pub fn toggle(&mut self, now: Instant) {
        let result = if self.state.active {
            self.backend.exit()
        } else {
            self.backend.request()
        };

        match result {
            Ok(()) => {
                let active = self.backend.is_fullscreen();
                self.apply(active, now);
            }
            Err(e) => {
                warn!(
                    backend = self.backend.name(),
                    error = %e,
                    suggestion = e.suggestion(),
                    "Fullscreen toggle failed"
                );
            }
        }
    }

    /// Mirrors a fullscreen change reported by the terminal.
    pub fn on_platform_change(&mut self, active: bool, now: Instant) {
        self.apply(active, now);
    }

    /// Shows the cursor and restarts the idle window.
    ///
    /// Ignored outside fullscreen.
    pub fn pointer_moved(&mut self, now: Instant) {
        if !self.state.active {
            return;
        }
        self.idle.arm(now);
        self.state.cursor_visible = true;
    }

    /// Hides the cursor once the idle window has elapsed.
    ///
    /// Returns true when the visible state changed and a redraw is needed.
    pub fn poll_idle(&mut self, now: Instant) -> bool {
        if !self.state.active {
            return false;
        }
        if self.idle.poll(now) {
            self.state.cursor_visible = self.idle.is_visible();
            debug!("Cursor hidden after idle window");
            return true;
        }
        false
    }

    /// When the cursor is due to hide, if the idle timer is armed.
    pub fn idle_deadline(&self) -> Option<Instant> {
        self.idle.deadline()
    }

    pub fn state(&self) -> FullscreenState {
        self.state
    }

    pub fn is_active(&self) -> bool {
        self.state.active
    }

    pub fn cursor_visible(&self) -> bool {
        self.state.cursor_visible
    }

    pub fn backend_name(&self) -> &'static str {
        self.backend.name()
    }

    pub fn is_supported(&self) -> bool {
        self.backend.is_supported()
    }

    /// Leaves fullscreen if active and stops the idle timer.
    pub fn shutdown(&mut self) {
        if self.state.active {
            if let Err(e) = self.backend.exit() {
                warn!(backend = self.backend.name(), error = %e, "Failed to leave fullscreen on shutdown");
            }
        }
        self.idle.cancel();
        self.state = FullscreenState::default();
    }

    fn apply(&mut self, active: bool, now: Instant) {
        if active == self.state.active {
            return;
        }

        self.state.active = active;
        if active {
            self.idle.arm(now);
        } else {
            self.idle.cancel();
        }
        self.state.cursor_visible = true;
        debug!(active, backend = self.backend.name(), "Fullscreen state changed");
    }
}

impl std::fmt::Debug for FullscreenController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FullscreenController")
            .field("backend", &self.backend.name())
            .field("state", &self.state)
            .field("idle", &self.idle)
            .finish()
    }
}
