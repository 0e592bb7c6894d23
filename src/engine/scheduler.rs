//! Tick scheduling for the timer engine.
//!
//! A scheduler owns at most one repeating one-second callback. The engine
//! starts it on `start()` and cancels it on pause, reset, and completion.
//!
//! - [`IntervalScheduler`] drives real sessions with `tokio::time::interval`
//!   and delivers ticks over a channel.
//! - [`ManualScheduler`] is a virtual clock for deterministic tests: it only
//!   tracks whether a callback is active, and tests call `tick()` themselves.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use tokio::runtime::Handle;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Duration, Instant, MissedTickBehavior};
use tracing::debug;

use super::error::TimerError;

/// Tick period used for real sessions.
pub const TICK_PERIOD: Duration = Duration::from_secs(1);

/// A source of repeating ticks that can be started and cancelled.
pub trait TickScheduler {
    /// Starts the repeating callback. Starting an active scheduler is a no-op.
    ///
    /// # Errors
    ///
    /// Returns an error if the callback cannot be scheduled.
    fn start(&mut self) -> Result<(), TimerError>;

    /// Cancels the repeating callback, if any.
    fn cancel(&mut self);

    /// Returns true while a callback is active.
    fn is_active(&self) -> bool;
}

// ============================================================================
// IntervalScheduler
// ============================================================================

/// Tokio-backed scheduler delivering `()` on a channel every period.
#[derive(Debug)]
pub struct IntervalScheduler {
    period: Duration,
    tick_tx: mpsc::UnboundedSender<()>,
    handle: Option<JoinHandle<()>>,
}

impl IntervalScheduler {
    /// Creates a one-second scheduler and the receiver its ticks arrive on.
    pub fn new() -> (Self, mpsc::UnboundedReceiver<()>) {
        Self::with_period(TICK_PERIOD)
    }

    /// Creates a scheduler with a custom period.
    pub fn with_period(period: Duration) -> (Self, mpsc::UnboundedReceiver<()>) {
        let (tick_tx, tick_rx) = mpsc::unbounded_channel();
        (
            Self {
                period,
                tick_tx,
                handle: None,
            },
            tick_rx,
        )
    }
}

impl TickScheduler for IntervalScheduler {
    fn start(&mut self) -> Result<(), TimerError> {
        if self.is_active() {
            return Ok(());
        }

        let runtime = Handle::try_current().map_err(|e| TimerError::Scheduler(e.to_string()))?;
        let period = self.period;
        let tick_tx = self.tick_tx.clone();

        self.handle = Some(runtime.spawn(async move {
            // First tick fires one full period after start
            let mut ticker = interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

            loop {
                ticker.tick().await;
                if tick_tx.send(()).is_err() {
                    break;
                }
            }
        }));

        debug!("Tick scheduler started");
        Ok(())
    }

    fn cancel(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
            debug!("Tick scheduler cancelled");
        }
    }

    fn is_active(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| !h.is_finished())
    }
}

impl Drop for IntervalScheduler {
    fn drop(&mut self) {
        self.cancel();
    }
}

// ============================================================================
// ManualScheduler
// ============================================================================

#[derive(Debug, Default)]
struct ManualState {
    active: AtomicBool,
    started: AtomicUsize,
    cancelled: AtomicUsize,
}

/// Virtual clock for tests.
///
/// Clones share state, so a test can keep a handle after moving one clone
/// into the engine.
#[derive(Debug, Clone, Default)]
pub struct ManualScheduler {
    state: Arc<ManualState>,
}

impl ManualScheduler {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of callbacks actually spawned.
    #[must_use]
    pub fn start_count(&self) -> usize {
        self.state.started.load(Ordering::SeqCst)
    }

    /// Number of active callbacks cancelled.
    #[must_use]
    pub fn cancel_count(&self) -> usize {
        self.state.cancelled.load(Ordering::SeqCst)
    }
}

impl TickScheduler for ManualScheduler {
    fn start(&mut self) -> Result<(), TimerError> {
        if !self.state.active.swap(true, Ordering::SeqCst) {
            self.state.started.fetch_add(1, Ordering::SeqCst);
        }
        Ok(())
    }

    fn cancel(&mut self) {
        if self.state.active.swap(false, Ordering::SeqCst) {
            self.state.cancelled.fetch_add(1, Ordering::SeqCst);
        }
    }

    fn is_active(&self) -> bool {
        self.state.active.load(Ordering::SeqCst)
    }
}
