//! Session runner driving a timer engine from commands and ticks.
//!
//! The runner owns the engine and multiplexes two inputs:
//! - User commands (start, pause, reset, visibility, quit)
//! - Ticks from the engine's scheduler
//!
//! Both arrive over channels, so the engine itself stays synchronous and is
//! only ever touched from the runner's task.

use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use super::error::TimerError;
use super::timer::TimerEngine;

/// A user command delivered to a running session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionCommand {
    /// Start, or resume when paused
    Start,
    /// Pause the countdown
    Pause,
    /// Return to the ready phase
    Reset,
    /// The session's surface became visible (`true`) or hidden (`false`)
    VisibilityChanged(bool),
    /// Stop the session and exit
    Quit,
}

/// Why a session run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionOutcome {
    /// The workout completed
    Completed,
    /// A quit command was received
    Quit,
    /// Command input closed while the timer was not running
    InputClosed,
}

/// Drives a [`TimerEngine`] until completion or quit.
pub struct SessionRunner {
    engine: TimerEngine,
    ticks: mpsc::UnboundedReceiver<()>,
}

impl SessionRunner {
    /// Creates a runner for `engine`, receiving its scheduler's ticks on `ticks`.
    pub fn new(engine: TimerEngine, ticks: mpsc::UnboundedReceiver<()>) -> Self {
        Self { engine, ticks }
    }

    /// Returns the engine being driven.
    pub fn engine(&self) -> &TimerEngine {
        &self.engine
    }

    /// Runs until the workout completes, a quit command arrives, or both
    /// inputs are exhausted.
    ///
    /// Closing the command channel does not stop a running workout; it runs
    /// to completion. On exit the engine's scheduler and wake lock are
    /// released.
    ///
    /// # Errors
    ///
    /// Returns an error if the tick scheduler cannot be started. An invalid
    /// preset is not fatal: the start is rejected and the session keeps
    /// waiting for commands.
    pub async fn run(
        &mut self,
        mut commands: mpsc::UnboundedReceiver<SessionCommand>,
    ) -> Result<SessionOutcome, TimerError> {
        let mut input_open = true;
        let mut ticks_open = true;

        let outcome = loop {
            if !input_open && !ticks_open {
                break SessionOutcome::InputClosed;
            }

            tokio::select! {
                biased;

                command = commands.recv(), if input_open => match command {
                    Some(SessionCommand::Quit) => {
                        info!("Quit requested");
                        break SessionOutcome::Quit;
                    }
                    Some(command) => {
                        if let Err(e) = self.apply(command) {
                            self.engine.shutdown();
                            return Err(e);
                        }
                    }
                    None => {
                        debug!("Command input closed");
                        input_open = false;
                        if !self.engine.is_running() {
                            break SessionOutcome::InputClosed;
                        }
                    }
                },

                tick = self.ticks.recv(), if ticks_open => match tick {
                    Some(()) => {
                        self.engine.tick();
                        if self.engine.is_complete() {
                            break SessionOutcome::Completed;
                        }
                    }
                    None => {
                        debug!("Tick source closed");
                        ticks_open = false;
                    }
                },
            }
        };

        self.engine.shutdown();
        Ok(outcome)
    }

    fn apply(&mut self, command: SessionCommand) -> Result<(), TimerError> {
        debug!(?command, "Applying command");

        match command {
            SessionCommand::Start => match self.engine.start() {
                Ok(_) => {}
                Err(e) if e.is_configuration_error() => {
                    warn!("Start rejected: {}", e);
                }
                Err(e) => return Err(e),
            },
            SessionCommand::Pause => {
                self.engine.pause();
                self.drain_ticks();
            }
            SessionCommand::Reset => {
                self.engine.reset();
                self.drain_ticks();
            }
            SessionCommand::VisibilityChanged(visible) => {
                self.engine.set_visibility(visible);
            }
            SessionCommand::Quit => {}
        }

        Ok(())
    }

    /// Discards ticks queued before the scheduler was cancelled.
    fn drain_ticks(&mut self) {
        let mut dropped = 0;
        while self.ticks.try_recv().is_ok() {
            dropped += 1;
        }
        if dropped > 0 {
            debug!(dropped, "Discarded stale ticks");
        }
    }
}
