//! Cue system error types.
//!
//! Every cue is best-effort: these errors are logged by the timer engine
//! and never interrupt the countdown.

use thiserror::Error;

/// Errors that can occur while emitting an audio or speech cue.
#[derive(Debug, Error)]
pub enum CueError {
    /// Audio device is not available (e.g., no speakers connected).
    #[error("オーディオデバイスが利用できません: {0}")]
    DeviceNotAvailable(String),

    /// Failed to create or use the audio output stream.
    #[error("オーディオストリームの作成に失敗しました: {0}")]
    StreamError(String),

    /// No speech synthesizer could be found on this system.
    #[error("音声合成が利用できません: {0}")]
    SpeechUnavailable(String),

    /// The speech synthesizer could not be launched.
    #[error("音声合成の起動に失敗しました: {0}")]
    SpeechFailed(String),
}

impl CueError {
    /// Returns true if this error is related to audio device availability.
    #[must_use]
    pub fn is_device_error(&self) -> bool {
        matches!(self, Self::DeviceNotAvailable(_) | Self::StreamError(_))
    }

    /// Returns true if this error came from speech synthesis.
    #[must_use]
    pub fn is_speech_error(&self) -> bool {
        matches!(self, Self::SpeechUnavailable(_) | Self::SpeechFailed(_))
    }
}
