//! Audio and speech cues for the interval timer.
//!
//! This module provides the cue capability the timer engine talks to:
//!
//! - Short tick tones in the last seconds of a phase
//! - A longer tone when a phase expires
//! - A completion chime
//! - Spoken announcements (upcoming exercise, completion)
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────┐
//! │   TimerEngine    │
//! └────────┬─────────┘
//!          │ CueEmitter
//!          ▼
//! ┌──────────────────┐     ┌──────────────────┐
//! │ SystemCueEmitter │────▶│ RodioTonePlayer  │
//! │                  │     │  (sine tones)    │
//! │                  │     ├──────────────────┤
//! │                  │────▶│  CommandSpeaker  │
//! └──────────────────┘     │ (say / espeak)   │
//!                          └──────────────────┘
//! ```
//!
//! Every cue is best-effort. Failures are returned to the engine, which logs
//! and ignores them.

mod error;
pub mod phrases;
mod speech;
mod tones;

use std::sync::{Arc, Mutex};

use tracing::warn;

pub use error::CueError;
pub use speech::CommandSpeaker;
pub use tones::{try_create_tone_player, RodioTonePlayer, Tone};

/// An audible cue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Cue {
    /// Tick played during the final seconds of a phase
    ShortTone,
    /// Beep played when a phase expires
    LongTone,
    /// Chime played when the workout completes
    CompletionChime,
}

/// Capability for emitting tones and spoken phrases.
///
/// Implementations must not block; the sound plays in the background.
pub trait CueEmitter {
    /// Plays a tone cue.
    ///
    /// # Errors
    ///
    /// Returns an error if playback fails.
    fn play(&self, cue: Cue) -> Result<(), CueError>;

    /// Speaks `text` in `locale`.
    ///
    /// # Errors
    ///
    /// Returns an error if speech synthesis is unavailable or fails.
    fn speak(&self, text: &str, locale: &str) -> Result<(), CueError>;
}

impl<T: CueEmitter + ?Sized> CueEmitter for Arc<T> {
    fn play(&self, cue: Cue) -> Result<(), CueError> {
        (**self).play(cue)
    }

    fn speak(&self, text: &str, locale: &str) -> Result<(), CueError> {
        (**self).speak(text, locale)
    }
}

// ============================================================================
// SystemCueEmitter
// ============================================================================

/// Cue emitter backed by the audio device and the system synthesizer.
///
/// Either half may be missing (disabled or unavailable); the corresponding
/// cues are then skipped silently.
#[derive(Debug, Default)]
pub struct SystemCueEmitter {
    tones: Option<RodioTonePlayer>,
    speaker: Option<CommandSpeaker>,
}

impl SystemCueEmitter {
    /// Creates an emitter, initializing only the enabled backends.
    ///
    /// Backends that cannot be initialized are logged and left out.
    pub fn new(sound: bool, voice: bool) -> Self {
        let tones = if sound { try_create_tone_player() } else { None };
        let speaker = if voice {
            match CommandSpeaker::detect() {
                Ok(speaker) => Some(speaker),
                Err(e) => {
                    warn!("Speech not available, announcements disabled: {}", e);
                    None
                }
            }
        } else {
            None
        };
        Self { tones, speaker }
    }

    /// Returns true if tones will be played.
    pub fn has_tones(&self) -> bool {
        self.tones.is_some()
    }

    /// Returns true if phrases will be spoken.
    pub fn has_speech(&self) -> bool {
        self.speaker.is_some()
    }
}

impl CueEmitter for SystemCueEmitter {
    fn play(&self, cue: Cue) -> Result<(), CueError> {
        match &self.tones {
            Some(player) => player.play(cue),
            None => Ok(()),
        }
    }

    fn speak(&self, text: &str, locale: &str) -> Result<(), CueError> {
        match &self.speaker {
            Some(speaker) => speaker.speak(text, locale),
            None => Ok(()),
        }
    }
}

// ============================================================================
// SilentCueEmitter
// ============================================================================

/// Cue emitter that does nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct SilentCueEmitter;

impl CueEmitter for SilentCueEmitter {
    fn play(&self, _cue: Cue) -> Result<(), CueError> {
        Ok(())
    }

    fn speak(&self, _text: &str, _locale: &str) -> Result<(), CueError> {
        Ok(())
    }
}

// ============================================================================
// MockCueEmitter
// ============================================================================

/// A recorded cue request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CueCall {
    /// A tone was requested
    Play(Cue),
    /// A phrase was requested
    Speak {
        /// Phrase text
        text: String,
        /// Requested locale
        locale: String,
    },
}

/// Mock cue emitter for testing.
#[derive(Debug, Default)]
pub struct MockCueEmitter {
    calls: Mutex<Vec<CueCall>>,
    should_fail: std::sync::atomic::AtomicBool,
}

impl MockCueEmitter {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every subsequent request fail (requests are still recorded).
    pub fn set_should_fail(&self, should_fail: bool) {
        self.should_fail
            .store(should_fail, std::sync::atomic::Ordering::SeqCst);
    }

    #[must_use]
    pub fn calls(&self) -> Vec<CueCall> {
        self.calls.lock().unwrap().clone()
    }

    #[must_use]
    pub fn count(&self, cue: Cue) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|call| **call == CueCall::Play(cue))
            .count()
    }

    #[must_use]
    pub fn spoken(&self) -> Vec<String> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter_map(|call| match call {
                CueCall::Speak { text, .. } => Some(text.clone()),
                CueCall::Play(_) => None,
            })
            .collect()
    }

    pub fn clear_calls(&self) {
        self.calls.lock().unwrap().clear();
    }

    fn record(&self, call: CueCall) -> Result<(), CueError> {
        self.calls.lock().unwrap().push(call);
        if self.should_fail.load(std::sync::atomic::Ordering::SeqCst) {
            return Err(CueError::StreamError("Mock failure".to_string()));
        }
        Ok(())
    }
}

impl CueEmitter for MockCueEmitter {
    fn play(&self, cue: Cue) -> Result<(), CueError> {
        self.record(CueCall::Play(cue))
    }

    fn speak(&self, text: &str, locale: &str) -> Result<(), CueError> {
        self.record(CueCall::Speak {
            text: text.to_string(),
            locale: locale.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_silent_emitter_always_succeeds() {
        let emitter = SilentCueEmitter;
        assert!(emitter.play(Cue::LongTone).is_ok());
        assert!(emitter.speak("hello", "en-US").is_ok());
    }

    #[test]
    fn test_system_emitter_disabled_backends() {
        let emitter = SystemCueEmitter::new(false, false);
        assert!(!emitter.has_tones());
        assert!(!emitter.has_speech());
        assert!(emitter.play(Cue::ShortTone).is_ok());
        assert!(emitter.speak("hello", "en-US").is_ok());
    }

    #[test]
    fn test_mock_records_calls() {
        let mock = MockCueEmitter::new();
        mock.play(Cue::ShortTone).unwrap();
        mock.play(Cue::ShortTone).unwrap();
        mock.speak("次はランジ", "ja-JP").unwrap();

        assert_eq!(mock.count(Cue::ShortTone), 2);
        assert_eq!(mock.count(Cue::LongTone), 0);
        assert_eq!(mock.spoken(), vec!["次はランジ".to_string()]);
        assert_eq!(
            mock.calls()[2],
            CueCall::Speak {
                text: "次はランジ".to_string(),
                locale: "ja-JP".to_string(),
            }
        );
    }

    #[test]
    fn test_mock_failure_still_records() {
        let mock = MockCueEmitter::new();
        mock.set_should_fail(true);
        assert!(mock.play(Cue::LongTone).is_err());
        assert_eq!(mock.count(Cue::LongTone), 1);
    }

    #[test]
    fn test_arc_forwarding() {
        let mock = Arc::new(MockCueEmitter::new());
        let boxed: Box<dyn CueEmitter> = Box::new(mock.clone());
        boxed.play(Cue::CompletionChime).unwrap();
        assert_eq!(mock.count(Cue::CompletionChime), 1);
    }
}
