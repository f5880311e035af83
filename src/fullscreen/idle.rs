//! Idle cursor hiding.
//!
//! While fullscreen is active the cursor and on-screen controls disappear
//! after a short period without pointer activity. The timer is a deadline
//! rather than a spawned task: the event loop sleeps until
//! [`IdleCursor::deadline`] and then calls [`IdleCursor::poll`].

use tokio::time::{Duration, Instant};

/// Inactivity period after which the cursor is hidden.
pub const IDLE_CURSOR_WINDOW: Duration = Duration::from_secs(3);

/// Deadline-based idle timer controlling cursor visibility.
#[derive(Debug, Clone)]
pub struct IdleCursor {
    window: Duration,
    deadline: Option<Instant>,
    visible: bool,
}

impl Default for IdleCursor {
    fn default() -> Self {
        Self::new(IDLE_CURSOR_WINDOW)
    }
}

impl IdleCursor {
    /// Creates a disarmed idle timer with a visible cursor.
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            deadline: None,
            visible: true,
        }
    }

    /// Shows the cursor and (re)starts the idle window from `now`.
    pub fn arm(&mut self, now: Instant) {
        self.visible = true;
        self.deadline = Some(now + self.window);
    }

    /// Stops the idle timer and forces the cursor visible.
    pub fn cancel(&mut self) {
        self.deadline = None;
        self.visible = true;
    }

    /// Hides the cursor if the deadline has passed.
    ///
    /// Returns true when visibility changed.
    pub fn poll(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                let changed = self.visible;
                self.visible = false;
                changed
            }
            _ => false,
        }
    }

    /// When the cursor will be hidden, if armed.
    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn window(&self) -> Duration {
        self.window
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_is_visible_and_disarmed() {
        let idle = IdleCursor::default();
        assert!(idle.is_visible());
        assert!(idle.deadline().is_none());
        assert_eq!(idle.window(), Duration::from_secs(3));
    }

    #[test]
    fn test_hides_after_window() {
        let start = Instant::now();
        let mut idle = IdleCursor::default();
        idle.arm(start);

        assert!(!idle.poll(start + Duration::from_millis(2999)));
        assert!(idle.is_visible());

        assert!(idle.poll(start + Duration::from_secs(3)));
        assert!(!idle.is_visible());
        assert!(idle.deadline().is_none());
    }

    #[test]
    fn test_rearm_restarts_window() {
        let start = Instant::now();
        let mut idle = IdleCursor::default();
        idle.arm(start);
        idle.arm(start + Duration::from_secs(2));

        assert!(!idle.poll(start + Duration::from_secs(4)));
        assert!(idle.poll(start + Duration::from_secs(5)));
    }

    #[test]
    fn test_cancel_forces_visible() {
        let start = Instant::now();
        let mut idle = IdleCursor::default();
        idle.arm(start);
        idle.poll(start + Duration::from_secs(3));
        assert!(!idle.is_visible());

        idle.cancel();

        assert!(idle.is_visible());
        assert!(!idle.poll(start + Duration::from_secs(10)));
    }
}
