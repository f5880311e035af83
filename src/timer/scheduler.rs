//! Tick scheduling for the timer engine.
//!
//! A schedule is a repeating 1-second tick tagged with a generation number.
//! The engine bumps the generation every time it arms a new schedule, so a
//! tick that was already queued when its schedule got cancelled can be told
//! apart from a live one and dropped.

use std::sync::{Arc, Mutex};

use tokio::sync::mpsc;
use tokio::task::AbortHandle;
use tokio::time::{interval_at, Duration, Instant, MissedTickBehavior};
use tracing::{debug, trace};

/// Period of the countdown tick.
pub const TICK_PERIOD: Duration = Duration::from_secs(1);

/// One tick delivered by a schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickSignal {
    /// Generation of the schedule that produced this tick
    pub generation: u64,
}

// ============================================================================
// TickHandle
// ============================================================================

/// Handle to an armed tick schedule.
///
/// Cancelling is idempotent, and dropping the handle cancels the schedule.
#[derive(Debug)]
pub struct TickHandle {
    generation: u64,
    abort: Option<AbortHandle>,
    cancelled: bool,
}

impl TickHandle {
    /// Creates a handle for a schedule driven by a spawned task.
    pub fn new(generation: u64, abort: AbortHandle) -> Self {
        Self {
            generation,
            abort: Some(abort),
            cancelled: false,
        }
    }

    /// Creates a handle with no background task behind it.
    pub fn detached(generation: u64) -> Self {
        Self {
            generation,
            abort: None,
            cancelled: false,
        }
    }

    /// Generation this handle was armed with.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Returns true once [`cancel`](Self::cancel) has been called.
    pub fn is_cancelled(&self) -> bool {
        self.cancelled
    }

    /// Stops the schedule. Safe to call more than once.
    pub fn cancel(&mut self) {
        if self.cancelled {
            return;
        }
        self.cancelled = true;
        if let Some(abort) = self.abort.take() {
            abort.abort();
        }
        trace!(generation = self.generation, "Tick schedule cancelled");
    }
}

impl Drop for TickHandle {
    fn drop(&mut self) {
        self.cancel();
    }
}

// ============================================================================
// TickScheduler
// ============================================================================

/// Source of repeating ticks for the timer engine.
pub trait TickScheduler {
    /// Arms a repeating tick tagged with `generation`.
    fn arm(&mut self, generation: u64) -> TickHandle;
}

/// Scheduler backed by a tokio interval task.
///
/// Must be armed from within a tokio runtime.
#[derive(Debug, Clone)]
pub struct TokioTickScheduler {
    tx: mpsc::UnboundedSender<TickSignal>,
    period: Duration,
}

impl TokioTickScheduler {
    /// Creates a scheduler that delivers ticks on `tx` every second.
    pub fn new(tx: mpsc::UnboundedSender<TickSignal>) -> Self {
        Self::with_period(tx, TICK_PERIOD)
    }

    /// Creates a scheduler with a custom period.
    pub fn with_period(tx: mpsc::UnboundedSender<TickSignal>, period: Duration) -> Self {
        Self { tx, period }
    }
}

impl TickScheduler for TokioTickScheduler {
    fn arm(&mut self, generation: u64) -> TickHandle {
        let tx = self.tx.clone();
        let period = self.period;

        let task = tokio::spawn(async move {
            // First tick one full period after arming, not immediately.
            let mut ticker = interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                ticker.tick().await;
                if tx.send(TickSignal { generation }).is_err() {
                    debug!("Tick receiver dropped, stopping schedule");
                    break;
                }
            }
        });

        debug!(generation, "Tick schedule armed");
        TickHandle::new(generation, task.abort_handle())
    }
}

/// Scheduler that records arm calls without producing ticks.
///
/// Tests drive the engine by calling `tick()` or `handle_tick()` directly.
#[derive(Debug, Clone, Default)]
pub struct MockTickScheduler {
    armed: Arc<Mutex<Vec<u64>>>,
}

impl MockTickScheduler {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Generations armed so far, in order.
    #[must_use]
    pub fn armed_generations(&self) -> Vec<u64> {
        self.armed.lock().unwrap().clone()
    }

    #[must_use]
    pub fn arm_count(&self) -> usize {
        self.armed.lock().unwrap().len()
    }
}

impl TickScheduler for MockTickScheduler {
    fn arm(&mut self, generation: u64) -> TickHandle {
        self.armed.lock().unwrap().push(generation);
        TickHandle::detached(generation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    mod tick_handle_tests {
        use super::*;

        #[test]
        fn test_cancel_is_idempotent() {
            let mut handle = TickHandle::detached(3);
            assert!(!handle.is_cancelled());

            handle.cancel();
            handle.cancel();

            assert!(handle.is_cancelled());
            assert_eq!(handle.generation(), 3);
        }

        #[test]
        fn test_mock_records_generations() {
            let mut scheduler = MockTickScheduler::new();
            let _a = scheduler.arm(1);
            let _b = scheduler.arm(2);
            assert_eq!(scheduler.armed_generations(), vec![1, 2]);
            assert_eq!(scheduler.arm_count(), 2);
        }
    }

    mod tokio_scheduler_tests {
        use super::*;
        use tokio::time::timeout;

        #[tokio::test]
        async fn test_ticks_carry_generation() {
            let (tx, mut rx) = mpsc::unbounded_channel();
            let mut scheduler = TokioTickScheduler::with_period(tx, Duration::from_millis(20));

            let _handle = scheduler.arm(7);

            let signal = timeout(Duration::from_secs(2), rx.recv())
                .await
                .expect("tick should arrive")
                .expect("channel open");
            assert_eq!(signal, TickSignal { generation: 7 });
        }

        #[tokio::test]
        async fn test_cancel_stops_ticks() {
            let (tx, mut rx) = mpsc::unbounded_channel();
            let mut scheduler = TokioTickScheduler::with_period(tx, Duration::from_millis(20));

            let mut handle = scheduler.arm(1);
            let _ = timeout(Duration::from_secs(2), rx.recv()).await;
            handle.cancel();

            // Let the aborted task wind down, then drain anything already queued.
            tokio::time::sleep(Duration::from_millis(50)).await;
            while rx.try_recv().is_ok() {}

            tokio::time::sleep(Duration::from_millis(100)).await;
            assert!(rx.try_recv().is_err(), "no ticks after cancel");
        }

        #[tokio::test]
        async fn test_drop_cancels() {
            let (tx, mut rx) = mpsc::unbounded_channel();
            let mut scheduler = TokioTickScheduler::with_period(tx, Duration::from_millis(20));

            drop(scheduler.arm(1));

            tokio::time::sleep(Duration::from_millis(100)).await;
            assert!(rx.try_recv().is_err());
        }
    }
}
