//! Sound cue for completed countdowns.
//!
//! This module provides:
//!
//! - The [`SoundPlayer`] trait and its implementations
//! - A terminal bell player that works everywhere
//! - A rodio player for real audio (feature `audio`)
//! - [`CompletionCue`], the best-effort signal the timer engine fires
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────┐
//! │  CompletionCue   │ ← fired by TimerEngine, never fails
//! └────────┬─────────┘
//!          │
//!          ▼
//! ┌──────────────────┐     ┌──────────────────┐
//! │   SoundPlayer    │────▶│ RodioSoundPlayer │ (feature "audio")
//! │                  │     ├──────────────────┤
//! │                  │────▶│ BellSoundPlayer  │ (fallback)
//! └──────────────────┘     └──────────────────┘
//! ```

mod bell;
mod error;
#[cfg(feature = "audio")]
mod player;
mod source;

use std::rc::Rc;

use tracing::warn;

pub use bell::BellSoundPlayer;
pub use error::SoundError;
#[cfg(feature = "audio")]
pub use player::RodioSoundPlayer;
pub use source::{get_default_sound, SoundSource, CHIME_DURATION_MS, CHIME_FREQUENCY_HZ};

/// Trait for sound playback implementations.
pub trait SoundPlayer {
    /// Plays a sound from the given source.
    ///
    /// This method should be non-blocking; the sound plays in the background.
    ///
    /// # Errors
    ///
    /// Returns an error if playback fails.
    fn play(&self, source: &SoundSource) -> Result<(), SoundError>;

    /// Returns true if sound playback is disabled.
    fn is_disabled(&self) -> bool;

    /// Disables sound playback.
    fn disable(&self);
}

#[cfg(feature = "audio")]
impl SoundPlayer for RodioSoundPlayer {
    fn play(&self, source: &SoundSource) -> Result<(), SoundError> {
        RodioSoundPlayer::play(self, source)
    }

    fn is_disabled(&self) -> bool {
        RodioSoundPlayer::is_disabled(self)
    }

    fn disable(&self) {
        RodioSoundPlayer::disable(self)
    }
}

/// Mock sound player for testing.
#[derive(Debug, Default)]
pub struct MockSoundPlayer {
    play_calls: std::sync::Mutex<Vec<SoundSource>>,
    disabled: std::sync::atomic::AtomicBool,
    should_fail: std::sync::atomic::AtomicBool,
}

impl MockSoundPlayer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_should_fail(&self, should_fail: bool) {
        self.should_fail
            .store(should_fail, std::sync::atomic::Ordering::SeqCst);
    }

    /// Number of play attempts, including failed ones.
    #[must_use]
    pub fn play_count(&self) -> usize {
        self.play_calls.lock().unwrap().len()
    }

    #[must_use]
    pub fn get_play_calls(&self) -> Vec<SoundSource> {
        self.play_calls.lock().unwrap().clone()
    }
}

impl SoundPlayer for MockSoundPlayer {
    fn play(&self, source: &SoundSource) -> Result<(), SoundError> {
        if self.disabled.load(std::sync::atomic::Ordering::SeqCst) {
            return Ok(());
        }
        self.play_calls.lock().unwrap().push(source.clone());
        if self.should_fail.load(std::sync::atomic::Ordering::SeqCst) {
            return Err(SoundError::PlaybackError("Mock failure".to_string()));
        }
        Ok(())
    }

    fn is_disabled(&self) -> bool {
        self.disabled.load(std::sync::atomic::Ordering::SeqCst)
    }

    fn disable(&self) {
        self.disabled
            .store(true, std::sync::atomic::Ordering::SeqCst);
    }
}

// ============================================================================
// CompletionCue
// ============================================================================

/// Best-effort sound played when a countdown reaches zero.
///
/// Playback failures are logged and swallowed; the timer's completion state
/// does not depend on the cue.
#[derive(Clone)]
pub struct CompletionCue {
    player: Option<Rc<dyn SoundPlayer>>,
    source: SoundSource,
}

impl CompletionCue {
    /// Creates a cue that plays `source` on `player`.
    pub fn new(player: Rc<dyn SoundPlayer>, source: SoundSource) -> Self {
        Self {
            player: Some(player),
            source,
        }
    }

    /// Creates a cue that does nothing.
    #[must_use]
    pub fn silent() -> Self {
        Self {
            player: None,
            source: get_default_sound(),
        }
    }

    /// Plays the cue, logging any failure.
    pub fn fire(&self) {
        let Some(player) = &self.player else {
            return;
        };
        if let Err(e) = player.play(&self.source) {
            warn!(
                error = %e,
                suggestion = e.suggestion(),
                "Completion sound could not be played"
            );
        }
    }
}

impl Default for CompletionCue {
    fn default() -> Self {
        Self::silent()
    }
}

impl std::fmt::Debug for CompletionCue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CompletionCue")
            .field("enabled", &self.player.is_some())
            .field("source", &self.source)
            .finish()
    }
}

/// Creates the player used for completion cues.
///
/// With the `audio` feature a rodio player is tried first; if no audio
/// device is available, or without the feature, the terminal bell is used.
#[must_use]
pub fn create_player(enabled: bool) -> Rc<dyn SoundPlayer> {
    if let Some(player) = try_create_audio_player(enabled) {
        return player;
    }

    let bell = BellSoundPlayer::stdout();
    if !enabled {
        bell.disable();
    }
    Rc::new(bell)
}

#[cfg(feature = "audio")]
fn try_create_audio_player(enabled: bool) -> Option<Rc<dyn SoundPlayer>> {
    match RodioSoundPlayer::new(!enabled) {
        Ok(player) => Some(Rc::new(player)),
        Err(e) => {
            warn!("Audio not available, using terminal bell: {}", e);
            None
        }
    }
}

#[cfg(not(feature = "audio"))]
fn try_create_audio_player(_enabled: bool) -> Option<Rc<dyn SoundPlayer>> {
    None
}
