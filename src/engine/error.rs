//! Timer engine error types.

use thiserror::Error;

use crate::types::PresetError;

/// Errors returned by timer engine commands.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TimerError {
    /// The loaded preset cannot be run.
    #[error("プリセットが不正なため開始できません: {0}")]
    InvalidPreset(#[from] PresetError),

    /// The tick scheduler could not be started.
    #[error("タイマーのスケジュールに失敗しました: {0}")]
    Scheduler(String),
}

impl TimerError {
    /// Returns true if the error comes from the preset definition.
    #[must_use]
    pub fn is_configuration_error(&self) -> bool {
        matches!(self, Self::InvalidPreset(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_preset_error() {
        let err: TimerError = PresetError::NoExercises("Empty".to_string()).into();
        assert!(err.is_configuration_error());
        assert!(err.to_string().contains("Empty"));
    }

    #[test]
    fn test_scheduler_error_is_not_configuration() {
        let err = TimerError::Scheduler("no runtime".to_string());
        assert!(!err.is_configuration_error());
        assert!(err.to_string().contains("no runtime"));
    }
}
