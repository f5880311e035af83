//! Countdown timer.
//!
//! This module contains:
//! - `engine`: the countdown state machine and its events
//! - `scheduler`: cancellable 1-second tick schedules

pub mod engine;
pub mod scheduler;

pub use engine::{TimerEngine, TimerEvent};
pub use scheduler::{
    MockTickScheduler, TickHandle, TickScheduler, TickSignal, TokioTickScheduler, TICK_PERIOD,
};
