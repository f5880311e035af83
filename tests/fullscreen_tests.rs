//! Integration tests for the fullscreen focus mode.
//!
//! These tests wire a backend's change notifications into the controller
//! the way the event loop does:
//! - Idle cursor hiding after the 3 second window
//! - Pointer activity restoring the cursor
//! - Exits the app did not initiate
//! - Control sequences written by the terminal backends

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::time::{Duration, Instant};

use lockin::fullscreen::{
    FullscreenChange, FullscreenController, MockFullscreenBackend, XtermFullscreen,
    IDLE_CURSOR_WINDOW,
};

// ============================================================================
// Test Helpers
// ============================================================================

fn create_controller() -> (
    FullscreenController,
    Arc<MockFullscreenBackend>,
    mpsc::UnboundedReceiver<FullscreenChange>,
) {
    let (tx, rx) = mpsc::unbounded_channel();
    let mock = Arc::new(MockFullscreenBackend::new().with_notifier(tx));
    let controller = FullscreenController::new(Box::new(Arc::clone(&mock)));
    (controller, mock, rx)
}

/// Feeds pending notifications to the controller.
fn pump(
    controller: &mut FullscreenController,
    rx: &mut mpsc::UnboundedReceiver<FullscreenChange>,
    now: Instant,
) {
    while let Ok(change) = rx.try_recv() {
        controller.on_platform_change(change.active, now);
    }
}

// ============================================================================
// Idle cursor scenario
// ============================================================================

#[test]
fn test_idle_cursor_scenario() {
    let (mut fs, _mock, mut rx) = create_controller();
    let start = Instant::now();

    fs.toggle(start);
    pump(&mut fs, &mut rx, start);
    assert!(fs.is_active());
    assert!(fs.cursor_visible());

    // No movement for the whole window hides the cursor.
    assert_eq!(fs.idle_deadline(), Some(start + IDLE_CURSOR_WINDOW));
    assert!(fs.poll_idle(start + IDLE_CURSOR_WINDOW));
    assert!(!fs.cursor_visible());

    // Any movement shows it again and restarts the window.
    let moved_at = start + Duration::from_secs(10);
    fs.pointer_moved(moved_at);
    assert!(fs.cursor_visible());
    assert_eq!(fs.idle_deadline(), Some(moved_at + IDLE_CURSOR_WINDOW));

    assert!(!fs.poll_idle(moved_at + Duration::from_secs(2)));
    assert!(fs.poll_idle(moved_at + Duration::from_secs(3)));
    assert!(!fs.cursor_visible());
}

#[test]
fn test_continuous_movement_keeps_cursor() {
    let (mut fs, _mock, mut rx) = create_controller();
    let start = Instant::now();
    fs.toggle(start);
    pump(&mut fs, &mut rx, start);

    for second in 1..=10 {
        let now = start + Duration::from_secs(second);
        fs.pointer_moved(now);
        assert!(!fs.poll_idle(now));
    }

    assert!(fs.cursor_visible());
}

// ============================================================================
// Platform notifications
// ============================================================================

#[test]
fn test_external_exit_is_reconciled() {
    let (mut fs, mock, mut rx) = create_controller();
    let start = Instant::now();
    fs.toggle(start);
    pump(&mut fs, &mut rx, start);
    fs.poll_idle(start + IDLE_CURSOR_WINDOW);

    mock.simulate_external_exit();
    pump(&mut fs, &mut rx, start + Duration::from_secs(5));

    assert!(!fs.is_active());
    assert!(fs.cursor_visible());
    assert!(fs.idle_deadline().is_none());

    // The next toggle enters again rather than exiting.
    fs.toggle(start + Duration::from_secs(6));
    assert!(fs.is_active());
    assert_eq!(mock.request_call_count(), 2);
}

#[test]
fn test_rejected_request_changes_nothing() {
    let (mut fs, mock, mut rx) = create_controller();
    mock.set_should_fail_request(true);

    fs.toggle(Instant::now());
    pump(&mut fs, &mut rx, Instant::now());

    assert!(!fs.is_active());
    assert!(rx.try_recv().is_err());
}

// ============================================================================
// Terminal backends
// ============================================================================

#[test]
fn test_xterm_backend_round_trip() {
    let (tx, mut rx) = mpsc::unbounded_channel();
    let backend = Arc::new(XtermFullscreen::new(Vec::new(), Some(tx)));
    let mut fs = FullscreenController::new(Box::new(Arc::clone(&backend)));
    let now = Instant::now();

    fs.toggle(now);
    pump(&mut fs, &mut rx, now);
    assert!(fs.is_active());

    fs.shutdown();
    assert!(!fs.is_active());

    drop(fs);
    let backend = Arc::try_unwrap(backend).expect("controller dropped");
    assert_eq!(backend.into_inner(), b"\x1b[10;1t\x1b[10;0t".to_vec());
}
