//! Spoken announcements through the platform's command-line synthesizer.
//!
//! Uses `say` on macOS and `espeak-ng`/`espeak` elsewhere. The synthesizer
//! process is spawned and reaped on a background thread, so speaking never
//! blocks the timer.

use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use tracing::{debug, warn};

use super::error::CueError;

/// Candidate synthesizer binaries, in order of preference.
#[cfg(target_os = "macos")]
const SYNTHESIZERS: &[&str] = &["/usr/bin/say"];

#[cfg(not(target_os = "macos"))]
const SYNTHESIZERS: &[&str] = &["/usr/bin/espeak-ng", "/usr/bin/espeak"];

/// Speaks phrases by launching a synthesizer process.
#[derive(Debug, Clone)]
pub struct CommandSpeaker {
    program: PathBuf,
}

impl CommandSpeaker {
    /// Creates a speaker for a specific synthesizer binary.
    pub fn with_program(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// Finds the first available synthesizer on this system.
    ///
    /// # Errors
    ///
    /// Returns `CueError::SpeechUnavailable` if none is installed.
    pub fn detect() -> Result<Self, CueError> {
        SYNTHESIZERS
            .iter()
            .map(Path::new)
            .find(|path| path.exists())
            .map(Self::with_program)
            .ok_or_else(|| CueError::SpeechUnavailable(SYNTHESIZERS.join(", ")))
    }

    /// Builds the argument list for `text` in `locale`.
    fn args(&self, text: &str, locale: &str) -> Vec<String> {
        let is_say = self
            .program
            .file_name()
            .is_some_and(|name| name == "say");

        if is_say {
            // `say` picks a voice from the system language settings
            vec![text.to_string()]
        } else {
            vec!["-v".to_string(), espeak_voice(locale), text.to_string()]
        }
    }

    /// Speaks `text` without waiting for the synthesizer to finish.
    ///
    /// # Errors
    ///
    /// Returns `CueError::SpeechFailed` if the process cannot be spawned.
    pub fn speak(&self, text: &str, locale: &str) -> Result<(), CueError> {
        let mut child = Command::new(&self.program)
            .args(self.args(text, locale))
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|e| CueError::SpeechFailed(format!("{}: {}", self.program.display(), e)))?;

        debug!("Speaking: {}", text);

        std::thread::spawn(move || {
            if let Err(e) = child.wait() {
                warn!("Speech synthesizer did not exit cleanly: {}", e);
            }
        });

        Ok(())
    }
}

/// Maps a BCP 47 locale ("ja-JP") to an espeak voice name ("ja").
fn espeak_voice(locale: &str) -> String {
    locale
        .split(['-', '_'])
        .next()
        .filter(|lang| !lang.is_empty())
        .unwrap_or("en")
        .to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_espeak_voice() {
        assert_eq!(espeak_voice("ja-JP"), "ja");
        assert_eq!(espeak_voice("en_US"), "en");
        assert_eq!(espeak_voice("DE"), "de");
        assert_eq!(espeak_voice(""), "en");
    }

    #[test]
    fn test_args_for_say() {
        let speaker = CommandSpeaker::with_program("/usr/bin/say");
        assert_eq!(speaker.args("次はスクワット", "ja-JP"), vec!["次はスクワット"]);
    }

    #[test]
    fn test_args_for_espeak() {
        let speaker = CommandSpeaker::with_program("/usr/bin/espeak-ng");
        assert_eq!(
            speaker.args("Next: Squat", "en-US"),
            vec!["-v", "en", "Next: Squat"]
        );
    }

    #[test]
    fn test_speak_missing_program_fails() {
        let speaker = CommandSpeaker::with_program("/nonexistent/synthesizer");
        let err = speaker.speak("hello", "en-US").unwrap_err();
        assert!(err.is_speech_error());
    }

    #[test]
    fn test_detect_no_panic() {
        // Depends on the host; only verify it does not panic
        let _ = CommandSpeaker::detect();
    }
}
