//! Sound source selection.
//!
//! A completion cue is either a user-supplied sound file or a generated
//! chime. The chime needs no assets, so it is always available as the
//! fallback.

use std::path::{Path, PathBuf};

use super::error::SoundError;

/// Frequency of the built-in chime.
pub const CHIME_FREQUENCY_HZ: u32 = 880;

/// Length of the built-in chime.
pub const CHIME_DURATION_MS: u64 = 600;

/// Represents the source of a sound to be played.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SoundSource {
    /// A sound file on disk (WAV, FLAC, MP3, ...).
    File {
        /// Display name, usually the file stem.
        name: String,
        /// Full path to the sound file.
        path: PathBuf,
    },
    /// A generated sine tone.
    Tone {
        /// Display name.
        name: String,
        /// Tone frequency in Hz.
        frequency_hz: u32,
        /// Tone length in milliseconds.
        duration_ms: u64,
    },
}

impl SoundSource {
    /// Creates a file sound source without checking the path.
    #[must_use]
    pub fn file(name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self::File {
            name: name.into(),
            path: path.into(),
        }
    }

    /// Creates a file sound source from a path, naming it after the file stem.
    ///
    /// # Errors
    ///
    /// Returns `SoundError::FileNotFound` if the path is not an existing file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, SoundError> {
        let path = path.as_ref();
        if !path.is_file() {
            return Err(SoundError::FileNotFound(path.display().to_string()));
        }
        let name = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("sound")
            .to_string();
        Ok(Self::file(name, path))
    }

    /// Creates a generated tone source.
    #[must_use]
    pub fn tone(name: impl Into<String>, frequency_hz: u32, duration_ms: u64) -> Self {
        Self::Tone {
            name: name.into(),
            frequency_hz,
            duration_ms,
        }
    }

    /// Returns the name of the sound source.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::File { name, .. } | Self::Tone { name, .. } => name,
        }
    }

    /// Returns true if this source is backed by a file.
    #[must_use]
    pub fn is_file(&self) -> bool {
        matches!(self, Self::File { .. })
    }

    /// Returns the file path if this is a file source.
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::File { path, .. } => Some(path),
            Self::Tone { .. } => None,
        }
    }
}

/// Returns the built-in completion chime.
#[must_use]
pub fn get_default_sound() -> SoundSource {
    SoundSource::tone("chime", CHIME_FREQUENCY_HZ, CHIME_DURATION_MS)
}
