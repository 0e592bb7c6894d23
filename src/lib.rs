//! Interval Trainer Library
//!
//! This library provides the core functionality for the interval trainer CLI.
//! It includes:
//! - Timer engine driving preparation, exercise and rest phases
//! - Audio tones and spoken announcements
//! - Display wake lock while a workout runs
//! - Workout journal recording completed sessions
//! - Configuration and presets
//! - CLI command parsing and display utilities

pub mod cli;
pub mod completion;
pub mod config;
pub mod cue;
pub mod engine;
pub mod types;
pub mod wakelock;

// Re-export commonly used types for convenience
pub use types::{
    DisplaySnapshot, Exercise, ExercisePreset, Phase, PresetError, TimerConfig, TimerSession,
};

pub use engine::{
    Capabilities, CommandOutcome, IntervalScheduler, ManualScheduler, SessionCommand,
    SessionOutcome, SessionRunner, TimerEngine, TimerError, TimerEvent,
};

pub use cue::{Cue, CueEmitter, CueError, MockCueEmitter, SilentCueEmitter, SystemCueEmitter};

pub use wakelock::{MockWakeLock, NoopWakeLock, ProcessWakeLock, WakeLock, WakeLockError};

pub use completion::{
    CompletionRecord, CompletionSink, DiscardSink, MockCompletionSink, SinkError, WorkoutJournal,
};

pub use config::{AppConfig, ConfigError};
