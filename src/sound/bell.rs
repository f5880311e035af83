//! Terminal bell player.
//!
//! Rings the terminal bell (BEL, `0x07`). Needs no audio device, so it is the
//! default cue and the fallback whenever rodio is unavailable.

use std::io::{self, Stdout, Write};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use tracing::debug;

use super::error::SoundError;
use super::source::SoundSource;
use super::SoundPlayer;

const BEL: &[u8] = b"\x07";

/// Sound player that writes the bell character to a terminal.
#[derive(Debug)]
pub struct BellSoundPlayer<W: Write = Stdout> {
    out: Mutex<W>,
    disabled: AtomicBool,
}

impl BellSoundPlayer<Stdout> {
    /// Creates a bell player on standard output.
    #[must_use]
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> BellSoundPlayer<W> {
    /// Creates a bell player writing to `out`.
    pub fn new(out: W) -> Self {
        Self {
            out: Mutex::new(out),
            disabled: AtomicBool::new(false),
        }
    }

    /// Consumes the player and returns the writer.
    pub fn into_inner(self) -> W {
        match self.out.into_inner() {
            Ok(out) => out,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

impl<W: Write> SoundPlayer for BellSoundPlayer<W> {
    fn play(&self, source: &SoundSource) -> Result<(), SoundError> {
        if self.is_disabled() {
            return Ok(());
        }
        debug!("Ringing terminal bell for '{}'", source.name());

        let mut out = self
            .out
            .lock()
            .map_err(|_| SoundError::PlaybackError("bell writer poisoned".to_string()))?;
        out.write_all(BEL)
            .and_then(|()| out.flush())
            .map_err(|e| SoundError::DeviceNotAvailable(e.to_string()))
    }

    fn is_disabled(&self) -> bool {
        self.disabled.load(Ordering::SeqCst)
    }

    fn disable(&self) {
        self.disabled.store(true, Ordering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sound::get_default_sound;

    #[test]
    fn test_play_writes_bel() {
        let player = BellSoundPlayer::new(Vec::new());
        player.play(&get_default_sound()).unwrap();
        player.play(&get_default_sound()).unwrap();
        assert_eq!(player.into_inner(), b"\x07\x07".to_vec());
    }

    #[test]
    fn test_disabled_writes_nothing() {
        let player = BellSoundPlayer::new(Vec::new());
        player.disable();
        player.play(&get_default_sound()).unwrap();
        assert!(player.is_disabled());
        assert!(player.into_inner().is_empty());
    }

    struct BrokenPipe;

    impl Write for BrokenPipe {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_write_failure_is_reported() {
        let player = BellSoundPlayer::new(BrokenPipe);
        let err = player.play(&get_default_sound()).unwrap_err();
        assert!(err.is_device_error());
    }
}
