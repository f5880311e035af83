//! Timer engine for the Lockin timer.
//!
//! This module provides the countdown state machine:
//! - Mode switching between focus, short break and long break
//! - Start / pause / reset transitions
//! - Countdown driven by a cancellable tick schedule
//! - Completion signal (event plus best-effort sound cue)
//! - Live duration updates from the settings editor

use tokio::sync::mpsc;
use tracing::{debug, info, trace};

use super::scheduler::{TickHandle, TickScheduler, TickSignal};
use crate::sound::CompletionCue;
use crate::types::{DurationConfig, TimerMode, TimerState};

// ============================================================================
// TimerEvent
// ============================================================================

/// Events published by the engine after each transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TimerEvent {
    /// Another tab was selected
    ModeSwitched {
        /// Newly selected mode
        mode: TimerMode,
        /// Freshly seeded countdown
        remaining_seconds: u32,
    },
    /// Countdown started or resumed
    Started {
        /// Mode of the countdown
        mode: TimerMode,
        /// Seconds left at start
        remaining_seconds: u32,
    },
    /// Countdown paused
    Paused {
        /// Seconds left at pause
        remaining_seconds: u32,
    },
    /// Countdown reset to the full duration
    Reset {
        /// Mode of the countdown
        mode: TimerMode,
        /// Full duration
        remaining_seconds: u32,
    },
    /// One second elapsed
    Tick {
        /// Remaining seconds
        remaining_seconds: u32,
    },
    /// Countdown reached zero
    Completed {
        /// Mode that finished
        mode: TimerMode,
    },
    /// Durations were replaced
    DurationsUpdated {
        /// New configuration
        durations: DurationConfig,
        /// Whether the active countdown was reseeded
        reseeded: bool,
    },
}

// ============================================================================
// TimerEngine
// ============================================================================

/// Countdown state machine with exactly one active tick schedule.
pub struct TimerEngine {
    /// Current countdown state
    state: TimerState,
    /// Configured duration of each mode
    durations: DurationConfig,
    /// Source of ticks
    scheduler: Box<dyn TickScheduler>,
    /// Live schedule, if any
    ticker: Option<TickHandle>,
    /// Generation of the most recently armed schedule
    generation: u64,
    /// Event sender channel
    event_tx: mpsc::UnboundedSender<TimerEvent>,
    /// Sound played on completion
    cue: CompletionCue,
}

impl TimerEngine {
    /// Creates an engine in focus mode with the full focus duration, paused.
    pub fn new(
        durations: DurationConfig,
        scheduler: Box<dyn TickScheduler>,
        event_tx: mpsc::UnboundedSender<TimerEvent>,
    ) -> Self {
        Self {
            state: TimerState::new(&durations),
            durations,
            scheduler,
            ticker: None,
            generation: 0,
            event_tx,
            cue: CompletionCue::silent(),
        }
    }

    /// Sets the sound played when a countdown completes.
    #[must_use]
    pub fn with_cue(mut self, cue: CompletionCue) -> Self {
        self.cue = cue;
        self
    }

    /// Selects `mode`, stopping any countdown and reseeding it.
    pub fn switch_mode(&mut self, mode: TimerMode) {
        self.cancel_ticking();
        self.state.mode = mode;
        self.state.remaining_seconds = self.durations.get(mode);
        self.state.running = false;

        debug!(mode = mode.as_str(), "Mode switched");
        self.emit(TimerEvent::ModeSwitched {
            mode,
            remaining_seconds: self.state.remaining_seconds,
        });
    }

    /// Starts the countdown.
    ///
    /// Does nothing when the countdown has already reached zero or is
    /// already running.
    pub fn start(&mut self) {
        if self.state.is_finished() {
            debug!("Countdown already finished, start ignored");
            return;
        }
        if self.state.running {
            return;
        }

        self.state.running = true;
        self.arm_ticking();

        info!(
            mode = self.state.mode.as_str(),
            remaining = self.state.remaining_seconds,
            "Countdown started"
        );
        self.emit(TimerEvent::Started {
            mode: self.state.mode,
            remaining_seconds: self.state.remaining_seconds,
        });
    }

    /// Pauses the countdown. Does nothing when already paused.
    pub fn pause(&mut self) {
        if !self.state.running && self.ticker.is_none() {
            return;
        }

        self.state.running = false;
        self.cancel_ticking();

        debug!(remaining = self.state.remaining_seconds, "Countdown paused");
        self.emit(TimerEvent::Paused {
            remaining_seconds: self.state.remaining_seconds,
        });
    }

    /// Stops the countdown and restores the full duration of the current mode.
    pub fn reset(&mut self) {
        self.cancel_ticking();
        self.state.remaining_seconds = self.durations.get(self.state.mode);
        self.state.running = false;

        debug!(mode = self.state.mode.as_str(), "Countdown reset");
        self.emit(TimerEvent::Reset {
            mode: self.state.mode,
            remaining_seconds: self.state.remaining_seconds,
        });
    }

    /// Advances the countdown by one second.
    ///
    /// This is the scheduler's entry point. Ticks while paused are ignored,
    /// and the countdown never goes below zero. Reaching zero stops the
    /// schedule and fires the completion signal exactly once.
    pub fn tick(&mut self) {
        if !self.state.running {
            trace!("Tick while paused ignored");
            return;
        }
        if self.state.remaining_seconds == 0 {
            self.state.running = false;
            self.cancel_ticking();
            return;
        }

        self.state.remaining_seconds -= 1;
        self.emit(TimerEvent::Tick {
            remaining_seconds: self.state.remaining_seconds,
        });

        if self.state.remaining_seconds == 0 {
            self.handle_completion();
        }
    }

    /// Delivers a tick from the scheduler, dropping ticks from cancelled
    /// schedules.
    pub fn handle_tick(&mut self, signal: TickSignal) {
        let live = self
            .ticker
            .as_ref()
            .is_some_and(|handle| handle.generation() == signal.generation);
        if !live {
            trace!(
                generation = signal.generation,
                current = self.generation,
                "Stale tick dropped"
            );
            return;
        }
        self.tick();
    }

    /// Replaces the configured durations.
    ///
    /// When the active mode's duration changes, the countdown is stopped
    /// and reseeded right away, even mid-countdown. Changes to other modes
    /// leave the countdown alone.
    pub fn update_durations(&mut self, durations: DurationConfig) {
        let mode = self.state.mode;
        let reseeded = durations.get(mode) != self.durations.get(mode);
        self.durations = durations;

        if reseeded {
            self.cancel_ticking();
            self.state.running = false;
            self.state.remaining_seconds = durations.get(mode);
        }

        info!(
            focus = durations.get(TimerMode::Focus),
            short_break = durations.get(TimerMode::ShortBreak),
            long_break = durations.get(TimerMode::LongBreak),
            reseeded,
            "Durations updated"
        );
        self.emit(TimerEvent::DurationsUpdated {
            durations,
            reseeded,
        });
    }

    /// Returns the current countdown state.
    pub fn state(&self) -> &TimerState {
        &self.state
    }

    /// Returns the configured durations.
    pub fn durations(&self) -> &DurationConfig {
        &self.durations
    }

    /// Returns true while a tick schedule is armed.
    pub fn is_ticking(&self) -> bool {
        self.ticker.is_some()
    }

    /// Generation of the most recently armed schedule.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Cancels the tick schedule. Called on teardown.
    pub fn shutdown(&mut self) {
        self.state.running = false;
        self.cancel_ticking();
    }

    fn handle_completion(&mut self) {
        self.state.running = false;
        self.cancel_ticking();

        info!(mode = self.state.mode.as_str(), "Countdown completed");
        self.cue.fire();
        self.emit(TimerEvent::Completed {
            mode: self.state.mode,
        });
    }

    fn arm_ticking(&mut self) {
        self.cancel_ticking();
        self.generation += 1;
        self.ticker = Some(self.scheduler.arm(self.generation));
    }

    fn cancel_ticking(&mut self) {
        if let Some(mut handle) = self.ticker.take() {
            handle.cancel();
        }
    }

    fn emit(&self, event: TimerEvent) {
        if self.event_tx.send(event).is_err() {
            trace!("Timer event receiver dropped");
        }
    }
}

impl Drop for TimerEngine {
    fn drop(&mut self) {
        self.cancel_ticking();
    }
}

impl std::fmt::Debug for TimerEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TimerEngine")
            .field("state", &self.state)
            .field("durations", &self.durations)
            .field("generation", &self.generation)
            .field("ticking", &self.ticker.is_some())
            .finish_non_exhaustive()
    }
}

// ============================================================================
// Tests
// ============================================================================
