//! Fullscreen error types.
//!
//! Fullscreen is a convenience: every error here is recoverable and only
//! ever logged. A failed request leaves the observed state untouched.

use thiserror::Error;

/// Errors that can occur when entering or leaving fullscreen.
#[derive(Debug, Error)]
pub enum FullscreenError {
    /// The terminal cannot be switched to fullscreen.
    #[error("fullscreen is not supported: {0}")]
    Unsupported(String),

    /// The terminal rejected the request.
    #[error("fullscreen request rejected: {0}")]
    Rejected(String),

    /// Writing the control sequence failed.
    #[error("failed to write fullscreen control sequence: {0}")]
    Io(#[from] std::io::Error),
}

impl FullscreenError {
    /// Returns true if the backend does not support fullscreen at all.
    #[must_use]
    pub fn is_unsupported(&self) -> bool {
        matches!(self, Self::Unsupported(_))
    }

    /// Returns true if the error is recoverable and the app should continue.
    ///
    /// Always true: the timer keeps working without fullscreen.
    #[must_use]
    pub fn is_recoverable(&self) -> bool {
        true
    }

    /// Returns a user-friendly suggestion for resolving this error.
    #[must_use]
    pub fn suggestion(&self) -> &'static str {
        match self {
            Self::Unsupported(_) => "run lockin in an xterm-compatible terminal",
            Self::Rejected(_) => "allow window manipulation in the terminal settings",
            Self::Io(_) => "check that the terminal is still attached",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = FullscreenError::Unsupported("dumb terminal".to_string());
        assert_eq!(err.to_string(), "fullscreen is not supported: dumb terminal");

        let err = FullscreenError::Rejected("denied".to_string());
        assert!(err.to_string().contains("denied"));
    }

    #[test]
    fn test_from_io_error() {
        let io = std::io::Error::new(std::io::ErrorKind::BrokenPipe, "closed");
        let err: FullscreenError = io.into();
        assert!(matches!(err, FullscreenError::Io(_)));
        assert!(err.to_string().contains("closed"));
    }

    #[test]
    fn test_classification() {
        assert!(FullscreenError::Unsupported("x".into()).is_unsupported());
        assert!(!FullscreenError::Rejected("x".into()).is_unsupported());

        let errors = [
            FullscreenError::Unsupported("x".into()),
            FullscreenError::Rejected("x".into()),
            FullscreenError::Io(std::io::Error::other("x")),
        ];
        for err in errors {
            assert!(err.is_recoverable());
            assert!(!err.suggestion().is_empty());
        }
    }
}
