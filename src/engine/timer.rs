//! Timer engine for interval workouts.
//!
//! This module provides the phase state machine:
//! - State transitions (Ready → Preparing → Exercising ⇄ Resting → Complete)
//! - Countdown driven by an injected tick scheduler
//! - Audio/speech cues near phase expiry and on completion
//! - Wake lock handling
//! - A single completion signal per session

use tokio::sync::mpsc;
use tracing::{debug, info, trace, warn};

use crate::completion::{CompletionRecord, CompletionSink, DiscardSink};
use crate::cue::{phrases, Cue, CueEmitter, SilentCueEmitter};
use crate::types::{
    format_mm_ss, DisplaySnapshot, ExercisePreset, Phase, Position, TimerConfig, TimerSession,
};
use crate::wakelock::{NoopWakeLock, WakeLock};

use super::error::TimerError;
use super::policy::{StandardPolicy, Transition, TransitionPolicy};
use super::scheduler::TickScheduler;

/// Number of final seconds of a phase that play the short tick cue.
pub const FINAL_SECONDS_CUE: u32 = 3;

// ============================================================================
// TimerEvent
// ============================================================================

/// Timer events for renderers and external integrations.
#[derive(Debug, Clone, PartialEq)]
pub enum TimerEvent {
    /// A session was started from the ready phase
    Started,
    /// A paused session resumed
    Resumed,
    /// The session was paused
    Paused,
    /// The session was reset to the ready phase
    Reset,
    /// A start request was refused
    StartRejected {
        /// Why the start was refused
        reason: String,
    },
    /// A countdown phase began
    PhaseStarted {
        /// Phase entered
        phase: Phase,
        /// 1-indexed round
        round: u32,
        /// 0-indexed exercise
        exercise_index: usize,
        /// Length of the phase in seconds
        seconds: u32,
    },
    /// One second elapsed
    Tick {
        /// Remaining seconds after the tick
        remaining_seconds: u32,
    },
    /// The workout finished
    Completed {
        /// Record handed to the completion sink
        record: CompletionRecord,
    },
    /// Display state after a command, tick, or transition
    Display(DisplaySnapshot),
}

/// Whether a command changed the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandOutcome {
    /// The command was applied
    Applied,
    /// The command was not valid in the current state and did nothing
    Ignored,
}

// ============================================================================
// Capabilities
// ============================================================================

/// Side-effecting collaborators injected into the engine.
pub struct Capabilities {
    /// Repeating one-second tick source
    pub scheduler: Box<dyn TickScheduler>,
    /// Tone and speech output
    pub cues: Box<dyn CueEmitter>,
    /// Display wake lock
    pub wake_lock: Box<dyn WakeLock>,
    /// Receiver of the completion signal
    pub sink: Box<dyn CompletionSink>,
}

impl Capabilities {
    /// Creates capabilities around `scheduler` with silent cues, no wake
    /// lock, and a sink that discards completions.
    pub fn new(scheduler: impl TickScheduler + 'static) -> Self {
        Self {
            scheduler: Box::new(scheduler),
            cues: Box::new(SilentCueEmitter),
            wake_lock: Box::new(NoopWakeLock),
            sink: Box::new(DiscardSink),
        }
    }

    /// Replaces the cue emitter.
    pub fn with_cues(mut self, cues: impl CueEmitter + 'static) -> Self {
        self.cues = Box::new(cues);
        self
    }

    /// Replaces the wake lock.
    pub fn with_wake_lock(mut self, wake_lock: impl WakeLock + 'static) -> Self {
        self.wake_lock = Box::new(wake_lock);
        self
    }

    /// Replaces the completion sink.
    pub fn with_sink(mut self, sink: impl CompletionSink + 'static) -> Self {
        self.sink = Box::new(sink);
        self
    }
}

// ============================================================================
// TimerEngine
// ============================================================================

/// Timer engine that owns one workout session and its transitions.
pub struct TimerEngine {
    /// Workout being run
    preset: ExercisePreset,
    /// Timer configuration
    config: TimerConfig,
    /// Transition table
    policy: Box<dyn TransitionPolicy>,
    /// Current session state
    session: TimerSession,
    /// Injected collaborators
    caps: Capabilities,
    /// Event sender channel
    event_tx: mpsc::UnboundedSender<TimerEvent>,
}

impl TimerEngine {
    /// Creates a new engine in the ready phase.
    ///
    /// The preset is validated on `start()`, not here, so an invalid preset
    /// can still be displayed.
    pub fn new(
        preset: ExercisePreset,
        config: TimerConfig,
        caps: Capabilities,
        event_tx: mpsc::UnboundedSender<TimerEvent>,
    ) -> Self {
        let policy = StandardPolicy {
            skip_final_rest: config.skip_final_rest,
        };
        let session = TimerSession::new(first_exercise_seconds(&preset));

        Self {
            preset,
            config,
            policy: Box::new(policy),
            session,
            caps,
            event_tx,
        }
    }

    /// Replaces the transition policy.
    pub fn with_policy(mut self, policy: impl TransitionPolicy + 'static) -> Self {
        self.policy = Box::new(policy);
        self
    }

    // ------------------------------------------------------------------------
    // Commands
    // ------------------------------------------------------------------------

    /// Starts the session from ready, or resumes it when paused.
    ///
    /// Ignored while running or once complete.
    ///
    /// # Errors
    ///
    /// Returns `TimerError::InvalidPreset` if the preset cannot be run, and
    /// `TimerError::Scheduler` if ticking cannot begin. The session is left
    /// unchanged in both cases.
    pub fn start(&mut self) -> Result<CommandOutcome, TimerError> {
        if self.session.running || self.session.is_complete() {
            debug!(phase = self.session.phase.as_str(), "start ignored");
            return Ok(CommandOutcome::Ignored);
        }

        if let Err(e) = self.preset.validate() {
            warn!("Refusing to start preset '{}': {}", self.preset.name, e);
            self.emit(TimerEvent::StartRejected {
                reason: e.to_string(),
            });
            return Err(e.into());
        }

        self.caps.scheduler.start()?;
        self.session.running = true;
        self.acquire_wake_lock();

        if self.session.phase == Phase::Ready {
            info!(
                preset = %self.preset.name,
                rounds = self.preset.rounds,
                exercises = self.preset.exercises.len(),
                "Workout started"
            );
            self.emit(TimerEvent::Started);
            self.enter_preparation();
        } else {
            debug!(remaining = self.session.remaining_seconds, "Workout resumed");
            self.emit(TimerEvent::Resumed);
        }

        self.emit_display();
        Ok(CommandOutcome::Applied)
    }

    /// Pauses a running session, preserving its position and remaining time.
    pub fn pause(&mut self) -> CommandOutcome {
        if !self.session.running {
            debug!(phase = self.session.phase.as_str(), "pause ignored");
            return CommandOutcome::Ignored;
        }

        self.session.running = false;
        self.caps.scheduler.cancel();
        self.release_wake_lock();

        debug!(remaining = self.session.remaining_seconds, "Workout paused");
        self.emit(TimerEvent::Paused);
        self.emit_display();
        CommandOutcome::Applied
    }

    /// Returns to the ready phase with a fresh session. Always applied.
    pub fn reset(&mut self) -> CommandOutcome {
        self.caps.scheduler.cancel();
        self.release_wake_lock();
        self.session = TimerSession::new(first_exercise_seconds(&self.preset));

        debug!("Workout reset");
        self.emit(TimerEvent::Reset);
        self.emit_display();
        CommandOutcome::Applied
    }

    /// Advances the countdown by one second.
    ///
    /// Ticks arriving while the session is not running are dropped.
    pub fn tick(&mut self) {
        if !self.session.running {
            trace!("stale tick dropped");
            return;
        }

        self.session.remaining_seconds = self.session.remaining_seconds.saturating_sub(1);
        let remaining = self.session.remaining_seconds;

        if remaining > 0 && remaining <= FINAL_SECONDS_CUE {
            self.play(Cue::ShortTone);
        }
        self.emit(TimerEvent::Tick {
            remaining_seconds: remaining,
        });

        if remaining == 0 {
            self.play(Cue::LongTone);
            self.advance_phase();
        }
        self.emit_display();
    }

    /// Reports a visibility change of the session's surface.
    ///
    /// Regaining visibility while running re-acquires the wake lock, which
    /// platforms may drop while the surface is hidden.
    pub fn set_visibility(&mut self, visible: bool) {
        if visible && self.session.running {
            debug!("Visibility regained, re-acquiring wake lock");
            self.acquire_wake_lock();
        }
    }

    /// Cancels ticking and releases the wake lock as one unit.
    ///
    /// Called when the session is torn down; also runs on drop.
    pub fn shutdown(&mut self) {
        self.session.running = false;
        self.caps.scheduler.cancel();
        self.release_wake_lock();
    }

    // ------------------------------------------------------------------------
    // Transitions
    // ------------------------------------------------------------------------

    fn enter_preparation(&mut self) {
        self.session.phase = Phase::Preparing;
        self.session.move_to(Position::START);
        self.session.remaining_seconds = self.config.prep_seconds;

        if self.session.remaining_seconds == 0 {
            debug!("Preparation disabled, starting first exercise");
            self.advance_phase();
        } else {
            self.on_phase_entered();
        }
    }

    /// Moves to the next phase according to the policy.
    ///
    /// Zero-length phases (a rest of 0 seconds) are still entered and
    /// announced, but passed through without consuming a tick.
    fn advance_phase(&mut self) {
        loop {
            let transition =
                self.policy
                    .next(self.session.phase, self.session.position(), &self.preset);

            match transition {
                Transition::Complete => {
                    self.complete();
                    return;
                }
                Transition::Enter { phase, position } => {
                    self.session.phase = phase;
                    self.session.move_to(position);
                    self.session.remaining_seconds = self.phase_total_seconds();
                    self.on_phase_entered();

                    if self.session.remaining_seconds == 0 {
                        debug!(phase = phase.as_str(), "Passing through zero-length phase");
                        continue;
                    }
                    return;
                }
            }
        }
    }

    fn on_phase_entered(&mut self) {
        let phase = self.session.phase;
        debug!(
            phase = phase.as_str(),
            round = self.session.current_round,
            exercise = self.session.current_exercise_index,
            seconds = self.session.remaining_seconds,
            "Phase started"
        );

        self.emit(TimerEvent::PhaseStarted {
            phase,
            round: self.session.current_round,
            exercise_index: self.session.current_exercise_index,
            seconds: self.session.remaining_seconds,
        });

        if phase == Phase::Resting && self.config.voice_announcements {
            if let Some(name) = self.next_exercise_name() {
                let text = phrases::next_exercise(&self.config.locale, name);
                self.speak(&text);
            }
        }
    }

    fn complete(&mut self) {
        self.session.phase = Phase::Complete;
        self.session.remaining_seconds = 0;
        self.session.running = false;
        self.caps.scheduler.cancel();
        self.release_wake_lock();

        self.play(Cue::CompletionChime);
        if self.config.voice_announcements {
            let text = phrases::workout_complete(&self.config.locale);
            self.speak(&text);
        }

        if self.session.completion_notified {
            return;
        }
        self.session.completion_notified = true;

        let record = self.completion_record();
        info!(preset = %record.preset_name, session = %record.session_id, "Workout complete");

        if let Err(e) = self.caps.sink.workout_completed(&record) {
            warn!("Completion sink failed: {}", e);
        }
        self.emit(TimerEvent::Completed { record });
    }

    fn completion_record(&self) -> CompletionRecord {
        CompletionRecord {
            session_id: self.session.id,
            preset_id: self.preset.assigned_id(),
            preset_name: self.preset.name.clone(),
            rounds: self.preset.rounds,
            exercise_count: self.preset.exercises.len(),
        }
    }

    // ------------------------------------------------------------------------
    // Side effects (best-effort)
    // ------------------------------------------------------------------------

    fn play(&self, cue: Cue) {
        if let Err(e) = self.caps.cues.play(cue) {
            warn!("Failed to play {:?}: {}", cue, e);
        }
    }

    fn speak(&self, text: &str) {
        if let Err(e) = self.caps.cues.speak(text, &self.config.locale) {
            warn!("Failed to speak '{}': {}", text, e);
        }
    }

    fn acquire_wake_lock(&self) {
        if let Err(e) = self.caps.wake_lock.acquire() {
            warn!("Wake lock not acquired: {}", e);
        }
    }

    fn release_wake_lock(&self) {
        if let Err(e) = self.caps.wake_lock.release() {
            warn!("Wake lock not released: {}", e);
        }
    }

    fn emit(&self, event: TimerEvent) {
        if self.event_tx.send(event).is_err() {
            trace!("event receiver dropped");
        }
    }

    fn emit_display(&self) {
        self.emit(TimerEvent::Display(self.snapshot()));
    }

    // ------------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------------

    /// Returns the current session state.
    pub fn session(&self) -> &TimerSession {
        &self.session
    }

    /// Returns the current phase.
    pub fn phase(&self) -> Phase {
        self.session.phase
    }

    /// Returns true while the clock is ticking.
    pub fn is_running(&self) -> bool {
        self.session.running
    }

    /// Returns true once the workout has finished.
    pub fn is_complete(&self) -> bool {
        self.session.is_complete()
    }

    /// Returns true while the tick scheduler has an active callback.
    pub fn is_ticking(&self) -> bool {
        self.caps.scheduler.is_active()
    }

    /// Returns the label for the current phase.
    pub fn phase_label(&self) -> &'static str {
        self.session.phase.label()
    }

    /// Returns the remaining time as `MM:SS`.
    pub fn formatted_remaining(&self) -> String {
        format_mm_ss(self.session.remaining_seconds)
    }

    /// Returns the name of the current exercise.
    pub fn current_exercise_name(&self) -> Option<&str> {
        self.preset
            .exercise(self.session.current_exercise_index)
            .map(|e| e.name.as_str())
    }

    /// Returns the name of the exercise that begins after the current rest.
    ///
    /// `None` once there is nothing left, i.e. after the final exercise of
    /// the final round.
    pub fn next_exercise_name(&self) -> Option<&str> {
        if self.session.is_complete() {
            return None;
        }

        match self
            .policy
            .next(Phase::Resting, self.session.position(), &self.preset)
        {
            Transition::Enter {
                phase: Phase::Exercising,
                position,
            } => self
                .preset
                .exercise(position.exercise_index)
                .map(|e| e.name.as_str()),
            _ => None,
        }
    }

    /// Returns the configured length of the current phase in seconds.
    pub fn phase_total_seconds(&self) -> u32 {
        let exercise = self.preset.exercise(self.session.current_exercise_index);
        match self.session.phase {
            Phase::Preparing => self.config.prep_seconds,
            Phase::Resting => exercise.map_or(0, |e| e.rest_seconds),
            Phase::Ready | Phase::Exercising => exercise.map_or(0, |e| e.exercise_seconds),
            Phase::Complete => 0,
        }
    }

    /// Returns the fraction of the current phase already elapsed, in `[0, 1]`.
    pub fn progress(&self) -> f64 {
        if self.session.is_complete() {
            return 1.0;
        }

        let total = self.phase_total_seconds();
        if total == 0 {
            return 0.0;
        }

        let remaining = self.session.remaining_seconds.min(total);
        f64::from(total - remaining) / f64::from(total)
    }

    /// Builds the display snapshot for the current state.
    pub fn snapshot(&self) -> DisplaySnapshot {
        let session = &self.session;
        let complete = session.is_complete();

        DisplaySnapshot {
            phase: session.phase,
            phase_label: session.phase.label().to_string(),
            color: session.phase.color_token().to_string(),
            round: format!("{} / {}", session.current_round, self.preset.rounds),
            exercise: format!(
                "{} / {}",
                session.current_exercise_index + 1,
                self.preset.exercises.len()
            ),
            current_exercise_index: session.current_exercise_index,
            current_exercise: self.current_exercise_name().map(str::to_string),
            next_exercise: self.next_exercise_name().map(str::to_string),
            time: self.formatted_remaining(),
            remaining_seconds: session.remaining_seconds,
            progress_percent: self.progress() * 100.0,
            running: session.running,
            completed: complete,
            can_start: !session.running && !complete,
            can_pause: session.running,
            can_reset: !complete,
        }
    }

    /// Returns a mutable reference to the session (for testing).
    #[cfg(test)]
    pub(crate) fn session_mut(&mut self) -> &mut TimerSession {
        &mut self.session
    }
}

impl Drop for TimerEngine {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn first_exercise_seconds(preset: &ExercisePreset) -> u32 {
    preset.exercise(0).map_or(0, |e| e.exercise_seconds)
}

// ============================================================================
// Tests
// ============================================================================
