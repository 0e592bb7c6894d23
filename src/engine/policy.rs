//! Phase transition policy.
//!
//! The policy is a pure function from the expiring phase and position to the
//! next phase. Keeping it behind a trait lets simpler workouts (no trailing
//! rest skip, single round) be expressed as configuration.

use crate::types::{ExercisePreset, Phase, Position};

/// Result of a phase expiring.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// Enter `phase` at `position`
    Enter {
        /// Phase to enter
        phase: Phase,
        /// Position within the preset
        position: Position,
    },
    /// The workout is finished
    Complete,
}

impl Transition {
    fn enter(phase: Phase, position: Position) -> Self {
        Self::Enter { phase, position }
    }
}

/// Decides what follows an expiring phase.
pub trait TransitionPolicy {
    /// Returns the transition out of `phase` at `position`.
    fn next(&self, phase: Phase, position: Position, preset: &ExercisePreset) -> Transition;
}

/// Preparation, then exercise/rest pairs across every exercise and round.
///
/// With `skip_final_rest` set, the last exercise of the last round completes
/// the workout directly instead of entering a trailing rest.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StandardPolicy {
    /// Skip the rest after the last exercise of the last round
    pub skip_final_rest: bool,
}

impl Default for StandardPolicy {
    fn default() -> Self {
        Self {
            skip_final_rest: true,
        }
    }
}

impl TransitionPolicy for StandardPolicy {
    fn next(&self, phase: Phase, position: Position, preset: &ExercisePreset) -> Transition {
        let last_exercise = preset.is_last_exercise(position.exercise_index);
        let last_round = preset.is_last_round(position.round);

        match phase {
            Phase::Ready => Transition::enter(Phase::Preparing, Position::START),
            Phase::Preparing => Transition::enter(Phase::Exercising, Position::START),
            Phase::Exercising => {
                if last_exercise && last_round && self.skip_final_rest {
                    Transition::Complete
                } else {
                    Transition::enter(Phase::Resting, position)
                }
            }
            Phase::Resting => {
                if !last_exercise {
                    Transition::enter(
                        Phase::Exercising,
                        Position::new(position.round, position.exercise_index + 1),
                    )
                } else if !last_round {
                    Transition::enter(Phase::Exercising, Position::new(position.round + 1, 0))
                } else {
                    Transition::Complete
                }
            }
            Phase::Complete => Transition::Complete,
        }
    }
}
