//! Tone generation using rodio.
//!
//! Cues are short sine waves queued on a detached sink, so playback never
//! blocks the caller.

use std::time::Duration;

use rodio::source::{SineWave, Source};
use rodio::{OutputStream, OutputStreamHandle, Sink};
use tracing::{debug, warn};

use super::error::CueError;
use super::Cue;

/// Output volume applied to every tone.
const TONE_AMPLITUDE: f32 = 0.3;

/// A single sine tone.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tone {
    /// Frequency in Hz
    pub frequency: f32,
    /// Duration in milliseconds
    pub duration_ms: u64,
}

impl Tone {
    /// Creates a new tone.
    pub const fn new(frequency: f32, duration_ms: u64) -> Self {
        Self {
            frequency,
            duration_ms,
        }
    }
}

impl Cue {
    /// Returns the tone sequence for this cue.
    pub fn tones(&self) -> Vec<Tone> {
        match self {
            Cue::ShortTone => vec![Tone::new(440.0, 100)],
            Cue::LongTone => vec![Tone::new(880.0, 300)],
            Cue::CompletionChime => vec![
                Tone::new(523.25, 200),
                Tone::new(659.25, 200),
                Tone::new(783.99, 400),
            ],
        }
    }
}

/// A tone player backed by the default audio output device.
pub struct RodioTonePlayer {
    /// The audio output stream (must be kept alive for playback).
    _stream: OutputStream,
    /// Handle to the output stream for creating sinks.
    stream_handle: OutputStreamHandle,
}

impl RodioTonePlayer {
    /// Opens the default audio output device.
    ///
    /// # Errors
    ///
    /// Returns `CueError::DeviceNotAvailable` if no audio output device
    /// is available.
    pub fn new() -> Result<Self, CueError> {
        let (stream, stream_handle) = OutputStream::try_default()
            .map_err(|e| CueError::DeviceNotAvailable(e.to_string()))?;

        debug!("Audio output stream initialized");

        Ok(Self {
            _stream: stream,
            stream_handle,
        })
    }

    /// Plays the tones of `cue` back to back without blocking.
    ///
    /// # Errors
    ///
    /// Returns `CueError::StreamError` if a sink cannot be created.
    pub fn play(&self, cue: Cue) -> Result<(), CueError> {
        let sink =
            Sink::try_new(&self.stream_handle).map_err(|e| CueError::StreamError(e.to_string()))?;

        for tone in cue.tones() {
            let source = SineWave::new(tone.frequency)
                .take_duration(Duration::from_millis(tone.duration_ms))
                .amplify(TONE_AMPLITUDE);
            sink.append(source);
        }
        sink.detach();

        debug!(?cue, "Tone playback started (detached)");
        Ok(())
    }
}

impl std::fmt::Debug for RodioTonePlayer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RodioTonePlayer").finish_non_exhaustive()
    }
}

/// Creates a tone player, returning None if audio is unavailable.
#[must_use]
pub fn try_create_tone_player() -> Option<RodioTonePlayer> {
    match RodioTonePlayer::new() {
        Ok(player) => Some(player),
        Err(e) => {
            warn!("Audio not available, tones disabled: {}", e);
            None
        }
    }
}
