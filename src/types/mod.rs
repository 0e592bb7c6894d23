//! Core data types for the interval trainer.
//!
//! This module defines the data structures used for:
//! - Workout presets (exercises, rest intervals, rounds) with validation
//! - Timer configuration
//! - Session state owned by the timer engine
//! - Display snapshots consumed by renderers

use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

// ============================================================================
// Phase
// ============================================================================

/// Represents the current phase of a workout session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// Nothing started yet
    #[default]
    Ready,
    /// Countdown before the first exercise
    Preparing,
    /// An exercise interval is running
    Exercising,
    /// A rest interval is running
    Resting,
    /// Terminal state, the workout is finished
    Complete,
}

impl Phase {
    /// Returns the string representation of the phase.
    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Ready => "ready",
            Phase::Preparing => "preparing",
            Phase::Exercising => "exercising",
            Phase::Resting => "resting",
            Phase::Complete => "complete",
        }
    }

    /// Returns the label shown to the user for this phase.
    pub fn label(&self) -> &'static str {
        match self {
            Phase::Ready => "Ready",
            Phase::Preparing => "Get Ready!",
            Phase::Exercising => "Exercise",
            Phase::Resting => "Rest",
            Phase::Complete => "Complete!",
        }
    }

    /// Returns the color/category token a renderer uses to style the phase.
    pub fn color_token(&self) -> &'static str {
        match self {
            Phase::Ready | Phase::Complete => "blue",
            Phase::Preparing => "purple",
            Phase::Exercising => "green",
            Phase::Resting => "yellow",
        }
    }

    /// Returns true for phases that carry their own countdown.
    pub fn is_countdown(&self) -> bool {
        matches!(
            self,
            Phase::Preparing | Phase::Exercising | Phase::Resting
        )
    }
}

// ============================================================================
// Exercise / ExercisePreset
// ============================================================================

/// One timed exercise followed by a rest interval.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Exercise {
    /// Display name, also used for spoken announcements
    pub name: String,
    /// Exercise duration in seconds (> 0)
    #[serde(rename = "exerciseSeconds")]
    pub exercise_seconds: u32,
    /// Rest duration in seconds after this exercise (>= 0)
    #[serde(rename = "restSeconds", default)]
    pub rest_seconds: u32,
}

impl Exercise {
    /// Creates a new exercise.
    pub fn new(name: impl Into<String>, exercise_seconds: u32, rest_seconds: u32) -> Self {
        Self {
            name: name.into(),
            exercise_seconds,
            rest_seconds,
        }
    }
}

/// Errors describing an unusable preset.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PresetError {
    /// The preset has no name.
    #[error("プリセット名を入力してください")]
    EmptyName,

    /// The preset contains no exercises.
    #[error("プリセット '{0}' に種目がありません")]
    NoExercises(String),

    /// The preset has zero rounds.
    #[error("プリセット '{0}' のラウンド数は1以上にしてください")]
    ZeroRounds(String),

    /// An exercise has no name.
    #[error("{0}番目の種目名を入力してください")]
    UnnamedExercise(usize),

    /// An exercise has a zero-second duration.
    #[error("種目 '{0}' の運動時間は1秒以上にしてください")]
    ZeroExerciseSeconds(String),
}

/// A named, reusable workout definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExercisePreset {
    /// Identifier carried into workout journal records; 0 means unassigned
    #[serde(default)]
    pub id: u32,
    /// Display label
    pub name: String,
    /// Number of times the full exercise sequence repeats
    #[serde(default = "default_rounds")]
    pub rounds: u32,
    /// Whether this preset is selected when none is requested
    #[serde(default)]
    pub default: bool,
    /// Ordered exercise sequence
    #[serde(default)]
    pub exercises: Vec<Exercise>,
}

fn default_rounds() -> u32 {
    1
}

impl ExercisePreset {
    /// Creates a new preset with the given rounds and exercises.
    pub fn new(name: impl Into<String>, rounds: u32, exercises: Vec<Exercise>) -> Self {
        Self {
            id: 0,
            name: name.into(),
            rounds,
            default: false,
            exercises,
        }
    }

    /// Sets the preset identifier.
    pub fn with_id(mut self, id: u32) -> Self {
        self.id = id;
        self
    }

    /// Returns the configured id, or `None` when the preset has none.
    pub fn assigned_id(&self) -> Option<u32> {
        (self.id != 0).then_some(self.id)
    }

    /// Marks the preset as the default one.
    pub fn as_default(mut self) -> Self {
        self.default = true;
        self
    }

    /// Validates the preset.
    ///
    /// A preset must be named, contain at least one exercise, run at least
    /// one round, and every exercise must be named and last at least one second.
    pub fn validate(&self) -> Result<(), PresetError> {
        if self.name.trim().is_empty() {
            return Err(PresetError::EmptyName);
        }
        if self.exercises.is_empty() {
            return Err(PresetError::NoExercises(self.name.clone()));
        }
        if self.rounds == 0 {
            return Err(PresetError::ZeroRounds(self.name.clone()));
        }
        for (index, exercise) in self.exercises.iter().enumerate() {
            if exercise.name.trim().is_empty() {
                return Err(PresetError::UnnamedExercise(index + 1));
            }
            if exercise.exercise_seconds == 0 {
                return Err(PresetError::ZeroExerciseSeconds(exercise.name.clone()));
            }
        }
        Ok(())
    }

    /// Returns the exercise at `index`, if any.
    pub fn exercise(&self, index: usize) -> Option<&Exercise> {
        self.exercises.get(index)
    }

    /// Returns true if `index` points at the last exercise of a round.
    pub fn is_last_exercise(&self, index: usize) -> bool {
        index + 1 >= self.exercises.len()
    }

    /// Returns true if `round` (1-indexed) is the final round.
    pub fn is_last_round(&self, round: u32) -> bool {
        round >= self.rounds
    }

    /// Total workout length in seconds, excluding preparation.
    ///
    /// The trailing rest of the final round is skipped when `skip_final_rest`
    /// is set.
    pub fn total_seconds(&self, skip_final_rest: bool) -> u64 {
        let per_round: u64 = self
            .exercises
            .iter()
            .map(|e| u64::from(e.exercise_seconds) + u64::from(e.rest_seconds))
            .sum();
        let mut total = per_round * u64::from(self.rounds);
        if skip_final_rest {
            if let Some(last) = self.exercises.last() {
                total = total.saturating_sub(u64::from(last.rest_seconds));
            }
        }
        total
    }
}

// ============================================================================
// TimerConfig
// ============================================================================

/// Default preparation countdown in seconds.
pub const DEFAULT_PREP_SECONDS: u32 = 5;

/// Default locale used for spoken announcements.
pub const DEFAULT_LOCALE: &str = "ja-JP";

fn default_prep_seconds() -> u32 {
    DEFAULT_PREP_SECONDS
}

fn default_true() -> bool {
    true
}

fn default_locale() -> String {
    DEFAULT_LOCALE.to_string()
}

/// Configuration for the timer engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerConfig {
    /// Preparation countdown before the first exercise (0 skips it)
    #[serde(rename = "prepSeconds", default = "default_prep_seconds")]
    pub prep_seconds: u32,
    /// Whether the rest after the last exercise of the last round is skipped
    #[serde(rename = "skipFinalRest", default = "default_true")]
    pub skip_final_rest: bool,
    /// Whether upcoming exercises and completion are announced by voice
    #[serde(rename = "voiceAnnouncements", default = "default_true")]
    pub voice_announcements: bool,
    /// Locale passed to the speech synthesizer
    #[serde(default = "default_locale")]
    pub locale: String,
}

impl Default for TimerConfig {
    fn default() -> Self {
        Self {
            prep_seconds: DEFAULT_PREP_SECONDS,
            skip_final_rest: true,
            voice_announcements: true,
            locale: default_locale(),
        }
    }
}

impl TimerConfig {
    /// Returns a configuration with the specified preparation countdown.
    pub fn with_prep_seconds(mut self, seconds: u32) -> Self {
        self.prep_seconds = seconds;
        self
    }

    /// Returns a configuration with voice announcements toggled.
    pub fn with_voice_announcements(mut self, enabled: bool) -> Self {
        self.voice_announcements = enabled;
        self
    }

    /// Returns a configuration that plays (or skips) the final rest.
    pub fn with_skip_final_rest(mut self, skip: bool) -> Self {
        self.skip_final_rest = skip;
        self
    }
}

// ============================================================================
// Position / TimerSession
// ============================================================================

/// Where a session is within a preset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Position {
    /// 1-indexed round
    pub round: u32,
    /// 0-indexed exercise
    pub exercise_index: usize,
}

impl Position {
    /// The first exercise of the first round.
    pub const START: Position = Position {
        round: 1,
        exercise_index: 0,
    };

    /// Creates a new position.
    pub fn new(round: u32, exercise_index: usize) -> Self {
        Self {
            round,
            exercise_index,
        }
    }
}

impl Default for Position {
    fn default() -> Self {
        Self::START
    }
}

/// Ephemeral state of one workout run.
///
/// Mutated only by the timer engine's own transition logic.
#[derive(Debug, Clone, Serialize)]
pub struct TimerSession {
    /// Identifier of this run, regenerated on reset
    pub id: Uuid,
    /// Current phase
    pub phase: Phase,
    /// 1-indexed round
    pub current_round: u32,
    /// 0-indexed exercise
    pub current_exercise_index: usize,
    /// Seconds left in the current phase
    pub remaining_seconds: u32,
    /// Whether the clock is actively ticking
    pub running: bool,
    /// Whether the completion sink has been notified for this run
    #[serde(skip)]
    pub(crate) completion_notified: bool,
}

impl TimerSession {
    /// Creates a session in the ready phase.
    pub fn new(first_exercise_seconds: u32) -> Self {
        Self {
            id: Uuid::new_v4(),
            phase: Phase::Ready,
            current_round: 1,
            current_exercise_index: 0,
            remaining_seconds: first_exercise_seconds,
            running: false,
            completion_notified: false,
        }
    }

    /// Returns the current position within the preset.
    pub fn position(&self) -> Position {
        Position::new(self.current_round, self.current_exercise_index)
    }

    /// Moves the session to `position`.
    pub fn move_to(&mut self, position: Position) {
        self.current_round = position.round;
        self.current_exercise_index = position.exercise_index;
    }

    /// Returns true if the session was started and is currently halted.
    pub fn is_paused(&self) -> bool {
        !self.running && self.phase.is_countdown()
    }

    /// Returns true once the terminal phase is reached.
    pub fn is_complete(&self) -> bool {
        self.phase == Phase::Complete
    }
}

// ============================================================================
// DisplaySnapshot
// ============================================================================

/// Formats a number of seconds as `MM:SS`.
pub fn format_mm_ss(total_seconds: u32) -> String {
    format!("{:02}:{:02}", total_seconds / 60, total_seconds % 60)
}

/// Everything a rendering layer needs to draw the timer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DisplaySnapshot {
    /// Current phase
    pub phase: Phase,
    /// Phase label ("Ready", "Get Ready!", ...)
    #[serde(rename = "phaseLabel")]
    pub phase_label: String,
    /// Color/category token for the phase
    pub color: String,
    /// Round counter, "X / N"
    pub round: String,
    /// Exercise counter, "X / N"
    pub exercise: String,
    /// Index of the exercise to highlight in a list
    #[serde(rename = "currentExerciseIndex")]
    pub current_exercise_index: usize,
    /// Name of the current exercise
    #[serde(rename = "currentExercise", skip_serializing_if = "Option::is_none")]
    pub current_exercise: Option<String>,
    /// Name of the exercise that follows the current rest
    #[serde(rename = "nextExercise", skip_serializing_if = "Option::is_none")]
    pub next_exercise: Option<String>,
    /// Remaining time, "MM:SS"
    pub time: String,
    /// Remaining time in seconds
    #[serde(rename = "remainingSeconds")]
    pub remaining_seconds: u32,
    /// Progress within the current phase, 0.0 - 100.0
    #[serde(rename = "progressPercent")]
    pub progress_percent: f64,
    /// Whether the clock is ticking
    pub running: bool,
    /// Whether the workout has finished
    pub completed: bool,
    /// Whether a start/resume control should be offered
    #[serde(rename = "canStart")]
    pub can_start: bool,
    /// Whether a pause control should be offered
    #[serde(rename = "canPause")]
    pub can_pause: bool,
    /// Whether a reset control should be offered
    #[serde(rename = "canReset")]
    pub can_reset: bool,
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_preset() -> ExercisePreset {
        ExercisePreset::new(
            "Tabata",
            2,
            vec![
                Exercise::new("Squat", 20, 10),
                Exercise::new("Push-up", 20, 10),
            ],
        )
    }

    // ------------------------------------------------------------------------
    // Phase Tests
    // ------------------------------------------------------------------------

    mod phase_tests {
        use super::*;

        #[test]
        fn test_default_is_ready() {
            assert_eq!(Phase::default(), Phase::Ready);
        }

        #[test]
        fn test_labels() {
            assert_eq!(Phase::Ready.label(), "Ready");
            assert_eq!(Phase::Preparing.label(), "Get Ready!");
            assert_eq!(Phase::Exercising.label(), "Exercise");
            assert_eq!(Phase::Resting.label(), "Rest");
            assert_eq!(Phase::Complete.label(), "Complete!");
        }

        #[test]
        fn test_color_tokens() {
            assert_eq!(Phase::Ready.color_token(), "blue");
            assert_eq!(Phase::Preparing.color_token(), "purple");
            assert_eq!(Phase::Exercising.color_token(), "green");
            assert_eq!(Phase::Resting.color_token(), "yellow");
            assert_eq!(Phase::Complete.color_token(), "blue");
        }

        #[test]
        fn test_is_countdown() {
            assert!(!Phase::Ready.is_countdown());
            assert!(Phase::Preparing.is_countdown());
            assert!(Phase::Exercising.is_countdown());
            assert!(Phase::Resting.is_countdown());
            assert!(!Phase::Complete.is_countdown());
        }

        #[test]
        fn test_serialize() {
            let json = serde_json::to_string(&Phase::Exercising).unwrap();
            assert_eq!(json, "\"exercising\"");
            let phase: Phase = serde_json::from_str("\"resting\"").unwrap();
            assert_eq!(phase, Phase::Resting);
        }
    }

    // ------------------------------------------------------------------------
    // ExercisePreset Tests
    // ------------------------------------------------------------------------

    mod preset_tests {
        use super::*;

        #[test]
        fn test_validate_success() {
            assert!(sample_preset().validate().is_ok());
        }

        #[test]
        fn test_validate_empty_exercises() {
            let preset = ExercisePreset::new("Empty", 1, vec![]);
            assert_eq!(
                preset.validate(),
                Err(PresetError::NoExercises("Empty".to_string()))
            );
        }

        #[test]
        fn test_validate_zero_rounds() {
            let preset = ExercisePreset {
                rounds: 0,
                ..sample_preset()
            };
            assert_eq!(
                preset.validate(),
                Err(PresetError::ZeroRounds("Tabata".to_string()))
            );
        }

        #[test]
        fn test_validate_zero_exercise_seconds() {
            let preset = ExercisePreset::new("Bad", 1, vec![Exercise::new("Plank", 0, 10)]);
            assert_eq!(
                preset.validate(),
                Err(PresetError::ZeroExerciseSeconds("Plank".to_string()))
            );
        }

        #[test]
        fn test_validate_zero_rest_is_allowed() {
            let preset = ExercisePreset::new("NoRest", 1, vec![Exercise::new("Plank", 30, 0)]);
            assert!(preset.validate().is_ok());
        }

        #[test]
        fn test_validate_blank_names() {
            let preset = ExercisePreset::new("  ", 1, vec![Exercise::new("Plank", 30, 0)]);
            assert_eq!(preset.validate(), Err(PresetError::EmptyName));

            let preset = ExercisePreset::new("Core", 1, vec![Exercise::new("", 30, 0)]);
            assert_eq!(preset.validate(), Err(PresetError::UnnamedExercise(1)));
        }

        #[test]
        fn test_last_exercise_and_round() {
            let preset = sample_preset();
            assert!(!preset.is_last_exercise(0));
            assert!(preset.is_last_exercise(1));
            assert!(!preset.is_last_round(1));
            assert!(preset.is_last_round(2));
        }

        #[test]
        fn test_assigned_id() {
            assert_eq!(sample_preset().assigned_id(), None);
            assert_eq!(sample_preset().with_id(5).assigned_id(), Some(5));
        }

        #[test]
        fn test_total_seconds() {
            let preset = sample_preset();
            assert_eq!(preset.total_seconds(false), 120);
            assert_eq!(preset.total_seconds(true), 110);
        }

        #[test]
        fn test_deserialize_with_defaults() {
            let json = r#"{
                "name": "Quick",
                "exercises": [{"name": "Jumping Jack", "exerciseSeconds": 30}]
            }"#;
            let preset: ExercisePreset = serde_json::from_str(json).unwrap();
            assert_eq!(preset.id, 0);
            assert_eq!(preset.rounds, 1);
            assert!(!preset.default);
            assert_eq!(preset.exercises[0].rest_seconds, 0);
        }
    }

    // ------------------------------------------------------------------------
    // TimerConfig Tests
    // ------------------------------------------------------------------------

    mod timer_config_tests {
        use super::*;

        #[test]
        fn test_default_values() {
            let config = TimerConfig::default();
            assert_eq!(config.prep_seconds, 5);
            assert!(config.skip_final_rest);
            assert!(config.voice_announcements);
            assert_eq!(config.locale, "ja-JP");
        }

        #[test]
        fn test_builder_pattern() {
            let config = TimerConfig::default()
                .with_prep_seconds(0)
                .with_voice_announcements(false)
                .with_skip_final_rest(false);
            assert_eq!(config.prep_seconds, 0);
            assert!(!config.voice_announcements);
            assert!(!config.skip_final_rest);
        }

        #[test]
        fn test_deserialize_empty_object() {
            let config: TimerConfig = serde_json::from_str("{}").unwrap();
            assert_eq!(config, TimerConfig::default());
        }
    }

    // ------------------------------------------------------------------------
    // TimerSession Tests
    // ------------------------------------------------------------------------

    mod timer_session_tests {
        use super::*;

        #[test]
        fn test_new_session() {
            let session = TimerSession::new(20);
            assert_eq!(session.phase, Phase::Ready);
            assert_eq!(session.current_round, 1);
            assert_eq!(session.current_exercise_index, 0);
            assert_eq!(session.remaining_seconds, 20);
            assert!(!session.running);
            assert!(!session.is_paused());
        }

        #[test]
        fn test_move_to() {
            let mut session = TimerSession::new(20);
            session.move_to(Position::new(2, 1));
            assert_eq!(session.position(), Position::new(2, 1));
        }

        #[test]
        fn test_is_paused() {
            let mut session = TimerSession::new(20);
            session.phase = Phase::Resting;
            assert!(session.is_paused());
            session.running = true;
            assert!(!session.is_paused());
        }
    }

    // ------------------------------------------------------------------------
    // Formatting Tests
    // ------------------------------------------------------------------------

    mod format_tests {
        use super::*;

        #[test]
        fn test_format_mm_ss() {
            assert_eq!(format_mm_ss(0), "00:00");
            assert_eq!(format_mm_ss(45), "00:45");
            assert_eq!(format_mm_ss(90), "01:30");
            assert_eq!(format_mm_ss(3599), "59:59");
            assert_eq!(format_mm_ss(6000), "100:00");
        }
    }
}
