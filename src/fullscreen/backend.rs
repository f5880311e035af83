//! Fullscreen backends, one per terminal family.
//!
//! Terminals expose fullscreen through xterm "window manipulation" control
//! sequences (`CSI Ps ; Ps t`), and not every family honours the same one:
//!
//! | backend           | enter        | exit         |
//! |-------------------|--------------|--------------|
//! | `XtermFullscreen` | `CSI 10;1 t` | `CSI 10;0 t` |
//! | `VteMaximize`     | `CSI 9;1 t`  | `CSI 9;0 t`  |
//! | `Unsupported`     | error        | error        |
//!
//! The backend is picked once at startup from the environment.

use std::io::{self, IsTerminal, Stdout, Write};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

use tokio::sync::mpsc;
use tracing::{debug, trace};

use super::error::FullscreenError;
use super::{FullscreenBackend, FullscreenChange};

const XTERM_ENTER: &[u8] = b"\x1b[10;1t";
const XTERM_EXIT: &[u8] = b"\x1b[10;0t";
const VTE_ENTER: &[u8] = b"\x1b[9;1t";
const VTE_EXIT: &[u8] = b"\x1b[9;0t";

/// Channel on which backends announce confirmed fullscreen changes.
pub type ChangeNotifier = mpsc::UnboundedSender<FullscreenChange>;

// ============================================================================
// Backend selection
// ============================================================================

/// The parts of the environment that decide which backend to use.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TerminalEnv {
    /// Whether stdout is a terminal
    pub is_terminal: bool,
    /// `$TERM`
    pub term: Option<String>,
    /// `$VTE_VERSION`, set by GNOME Terminal, Tilix and friends
    pub vte_version: Option<String>,
}

impl TerminalEnv {
    /// Reads the environment of the current process.
    pub fn detect() -> Self {
        Self {
            is_terminal: io::stdout().is_terminal(),
            term: std::env::var("TERM").ok().filter(|t| !t.is_empty()),
            vte_version: std::env::var("VTE_VERSION").ok().filter(|v| !v.is_empty()),
        }
    }
}

/// Which backend implementation a terminal gets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendKind {
    Xterm,
    Vte,
    Unsupported,
}

impl BackendKind {
    /// Picks the backend for `env`.
    pub fn select(env: &TerminalEnv) -> Self {
        if !env.is_terminal {
            return Self::Unsupported;
        }
        match env.term.as_deref() {
            None | Some("dumb") | Some("linux") => Self::Unsupported,
            Some(_) if env.vte_version.is_some() => Self::Vte,
            Some(_) => Self::Xterm,
        }
    }
}

/// Builds the backend for `env`, writing control sequences to stdout.
pub fn select_backend(env: &TerminalEnv, notifier: Option<ChangeNotifier>) -> Box<dyn FullscreenBackend> {
    let kind = BackendKind::select(env);
    debug!(?kind, term = ?env.term, "Fullscreen backend selected");

    match kind {
        BackendKind::Xterm => Box::new(XtermFullscreen::new(io::stdout(), notifier)),
        BackendKind::Vte => Box::new(VteMaximize::new(io::stdout(), notifier)),
        BackendKind::Unsupported => {
            let reason = if env.is_terminal {
                format!("terminal '{}' has no window operations", env.term.as_deref().unwrap_or("unknown"))
            } else {
                "stdout is not a terminal".to_string()
            };
            Box::new(Unsupported::new(reason))
        }
    }
}

// ============================================================================
// Window-operation backends
// ============================================================================

/// Shared plumbing for backends that write a control sequence.
#[derive(Debug)]
struct WindowOps<W: Write> {
    out: Mutex<W>,
    active: AtomicBool,
    notifier: Option<ChangeNotifier>,
}

impl<W: Write> WindowOps<W> {
    fn new(out: W, notifier: Option<ChangeNotifier>) -> Self {
        Self {
            out: Mutex::new(out),
            active: AtomicBool::new(false),
            notifier,
        }
    }

    fn send(&self, sequence: &[u8], active: bool) -> Result<(), FullscreenError> {
        {
            let mut out = self
                .out
                .lock()
                .map_err(|_| FullscreenError::Rejected("terminal writer poisoned".to_string()))?;
            out.write_all(sequence)?;
            out.flush()?;
        }

        self.active.store(active, Ordering::SeqCst);
        if let Some(notifier) = &self.notifier {
            if notifier.send(FullscreenChange { active }).is_err() {
                trace!("Fullscreen change receiver dropped");
            }
        }
        Ok(())
    }

    fn is_active(&self) -> bool {
        self.active.load(Ordering::SeqCst)
    }

    fn into_inner(self) -> W {
        match self.out.into_inner() {
            Ok(out) => out,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

/// xterm-style terminals: true fullscreen via `CSI 10 t`.
#[derive(Debug)]
pub struct XtermFullscreen<W: Write = Stdout> {
    ops: WindowOps<W>,
}

impl<W: Write> XtermFullscreen<W> {
    pub fn new(out: W, notifier: Option<ChangeNotifier>) -> Self {
        Self {
            ops: WindowOps::new(out, notifier),
        }
    }

    /// Consumes the backend and returns the writer.
    pub fn into_inner(self) -> W {
        self.ops.into_inner()
    }
}

impl<W: Write> FullscreenBackend for XtermFullscreen<W> {
    fn name(&self) -> &'static str {
        "xterm"
    }

    fn is_supported(&self) -> bool {
        true
    }

    fn request(&self) -> Result<(), FullscreenError> {
        self.ops.send(XTERM_ENTER, true)
    }

    fn exit(&self) -> Result<(), FullscreenError> {
        self.ops.send(XTERM_EXIT, false)
    }

    fn is_fullscreen(&self) -> bool {
        self.ops.is_active()
    }
}

/// VTE-based terminals: they ignore `CSI 10 t`, so maximize instead.
#[derive(Debug)]
pub struct VteMaximize<W: Write = Stdout> {
    ops: WindowOps<W>,
}

impl<W: Write> VteMaximize<W> {
    pub fn new(out: W, notifier: Option<ChangeNotifier>) -> Self {
        Self {
            ops: WindowOps::new(out, notifier),
        }
    }

    /// Consumes the backend and returns the writer.
    pub fn into_inner(self) -> W {
        self.ops.into_inner()
    }
}

impl<W: Write> FullscreenBackend for VteMaximize<W> {
    fn name(&self) -> &'static str {
        "vte"
    }

    fn is_supported(&self) -> bool {
        true
    }

    fn request(&self) -> Result<(), FullscreenError> {
        self.ops.send(VTE_ENTER, true)
    }

    fn exit(&self) -> Result<(), FullscreenError> {
        self.ops.send(VTE_EXIT, false)
    }

    fn is_fullscreen(&self) -> bool {
        self.ops.is_active()
    }
}

/// Backend for environments without fullscreen support.
#[derive(Debug, Clone)]
pub struct Unsupported {
    reason: String,
}

impl Unsupported {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

impl FullscreenBackend for Unsupported {
    fn name(&self) -> &'static str {
        "unsupported"
    }

    fn is_supported(&self) -> bool {
        false
    }

    fn request(&self) -> Result<(), FullscreenError> {
        Err(FullscreenError::Unsupported(self.reason.clone()))
    }

    fn exit(&self) -> Result<(), FullscreenError> {
        Err(FullscreenError::Unsupported(self.reason.clone()))
    }

    fn is_fullscreen(&self) -> bool {
        false
    }
}

// ============================================================================
// Mock
// ============================================================================

/// Mock backend for testing.
#[derive(Debug, Default)]
pub struct MockFullscreenBackend {
    active: AtomicBool,
    should_fail_request: AtomicBool,
    should_fail_exit: AtomicBool,
    request_calls: AtomicUsize,
    exit_calls: AtomicUsize,
    notifier: Mutex<Option<ChangeNotifier>>,
}

impl MockFullscreenBackend {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Announces changes on `notifier`, like a real terminal would.
    #[must_use]
    pub fn with_notifier(self, notifier: ChangeNotifier) -> Self {
        *self.notifier.lock().unwrap() = Some(notifier);
        self
    }

    pub fn set_should_fail_request(&self, should_fail: bool) {
        self.should_fail_request.store(should_fail, Ordering::SeqCst);
    }

    pub fn set_should_fail_exit(&self, should_fail: bool) {
        self.should_fail_exit.store(should_fail, Ordering::SeqCst);
    }

    #[must_use]
    pub fn request_call_count(&self) -> usize {
        self.request_calls.load(Ordering::SeqCst)
    }

    #[must_use]
    pub fn exit_call_count(&self) -> usize {
        self.exit_calls.load(Ordering::SeqCst)
    }

    /// Leaves fullscreen without going through the app, e.g. the user
    /// pressed the window manager's fullscreen key.
    pub fn simulate_external_exit(&self) {
        self.set_active(false);
    }

    fn set_active(&self, active: bool) {
        self.active.store(active, Ordering::SeqCst);
        if let Some(notifier) = self.notifier.lock().unwrap().as_ref() {
            let _ = notifier.send(FullscreenChange { active });
        }
    }
}

impl FullscreenBackend for MockFullscreenBackend {
    fn name(&self) -> &'static str {
        "mock"
    }

    fn is_supported(&self) -> bool {
        true
    }

    fn request(&self) -> Result<(), FullscreenError> {
        self.request_calls.fetch_add(1, Ordering::SeqCst);
        if self.should_fail_request.load(Ordering::SeqCst) {
            return Err(FullscreenError::Rejected("simulated failure".to_string()));
        }
        self.set_active(true);
        Ok(())
    }

    fn exit(&self) -> Result<(), FullscreenError> {
        self.exit_calls.fetch_add(1, Ordering::SeqCst);
        if self.should_fail_exit.load(Ordering::SeqCst) {
            return Err(FullscreenError::Rejected("simulated failure".to_string()));
        }
        self.set_active(false);
        Ok(())
    }

    fn is_fullscreen(&self) -> bool {
        self.active.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn env(is_terminal: bool, term: Option<&str>, vte: Option<&str>) -> TerminalEnv {
        TerminalEnv {
            is_terminal,
            term: term.map(str::to_string),
            vte_version: vte.map(str::to_string),
        }
    }

    mod selection_tests {
        use super::*;

        #[test]
        fn test_not_a_terminal() {
            assert_eq!(
                BackendKind::select(&env(false, Some("xterm-256color"), None)),
                BackendKind::Unsupported
            );
        }

        #[test]
        fn test_dumb_and_console_terminals() {
            assert_eq!(BackendKind::select(&env(true, None, None)), BackendKind::Unsupported);
            assert_eq!(BackendKind::select(&env(true, Some("dumb"), None)), BackendKind::Unsupported);
            assert_eq!(BackendKind::select(&env(true, Some("linux"), None)), BackendKind::Unsupported);
        }

        #[test]
        fn test_vte_terminal() {
            assert_eq!(
                BackendKind::select(&env(true, Some("xterm-256color"), Some("7600"))),
                BackendKind::Vte
            );
        }

        #[test]
        fn test_xterm_terminal() {
            assert_eq!(
                BackendKind::select(&env(true, Some("xterm-256color"), None)),
                BackendKind::Xterm
            );
        }

        #[test]
        fn test_select_backend_unsupported_reason() {
            let backend = select_backend(&env(false, None, None), None);
            assert_eq!(backend.name(), "unsupported");
            assert!(!backend.is_supported());
            let err = backend.request().unwrap_err();
            assert!(err.to_string().contains("not a terminal"));
        }
    }

    mod window_ops_tests {
        use super::*;

        #[test]
        fn test_xterm_sequences() {
            let backend = XtermFullscreen::new(Vec::new(), None);
            backend.request().unwrap();
            assert!(backend.is_fullscreen());
            backend.exit().unwrap();
            assert!(!backend.is_fullscreen());

            assert_eq!(backend.into_inner(), b"\x1b[10;1t\x1b[10;0t".to_vec());
        }

        #[test]
        fn test_vte_sequences() {
            let backend = VteMaximize::new(Vec::new(), None);
            backend.request().unwrap();
            assert_eq!(backend.name(), "vte");
            assert_eq!(backend.into_inner(), b"\x1b[9;1t".to_vec());
        }

        #[test]
        fn test_changes_are_announced() {
            let (tx, mut rx) = mpsc::unbounded_channel();
            let backend = XtermFullscreen::new(Vec::new(), Some(tx));

            backend.request().unwrap();
            backend.exit().unwrap();

            assert_eq!(rx.try_recv().unwrap(), FullscreenChange { active: true });
            assert_eq!(rx.try_recv().unwrap(), FullscreenChange { active: false });
        }

        struct Closed;

        impl Write for Closed {
            fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
                Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
            }

            fn flush(&mut self) -> io::Result<()> {
                Ok(())
            }
        }

        #[test]
        fn test_write_failure_keeps_state() {
            let backend = XtermFullscreen::new(Closed, None);
            let err = backend.request().unwrap_err();
            assert!(matches!(err, FullscreenError::Io(_)));
            assert!(!backend.is_fullscreen());
        }
    }

    #[test]
    fn test_mock_external_exit_notifies() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mock = MockFullscreenBackend::new().with_notifier(tx);

        mock.request().unwrap();
        mock.simulate_external_exit();

        assert!(!mock.is_fullscreen());
        assert_eq!(rx.try_recv().unwrap(), FullscreenChange { active: true });
        assert_eq!(rx.try_recv().unwrap(), FullscreenChange { active: false });
        assert_eq!(mock.request_call_count(), 1);
        assert_eq!(mock.exit_call_count(), 0);
    }
}
