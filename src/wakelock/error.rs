//! Wake lock error types.

use thiserror::Error;

/// Errors that can occur while holding the display awake.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum WakeLockError {
    /// No inhibitor tool exists on this system.
    #[error("スリープ抑止ツールが見つかりません: {0}")]
    Unsupported(String),

    /// The inhibitor process could not be started.
    #[error("スリープ抑止の開始に失敗しました: {0}")]
    AcquireFailed(String),

    /// The inhibitor process could not be stopped.
    #[error("スリープ抑止の解除に失敗しました: {0}")]
    ReleaseFailed(String),
}

impl WakeLockError {
    /// Returns a user-friendly suggestion for resolving this error.
    #[must_use]
    pub fn suggestion(&self) -> &'static str {
        match self {
            Self::Unsupported(_) => "--no-wake-lock を指定するとこの警告を抑止できます",
            Self::AcquireFailed(_) => "画面の自動ロック設定を確認してください",
            Self::ReleaseFailed(_) => "残ったプロセスを手動で終了してください",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = WakeLockError::Unsupported("caffeinate".to_string());
        assert!(err.to_string().contains("caffeinate"));
    }

    #[test]
    fn test_suggestion_not_empty() {
        for err in [
            WakeLockError::Unsupported("x".into()),
            WakeLockError::AcquireFailed("x".into()),
            WakeLockError::ReleaseFailed("x".into()),
        ] {
            assert!(!err.suggestion().is_empty());
        }
    }
}
