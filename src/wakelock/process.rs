//! Process-backed wake lock.
//!
//! Keeps the display awake by running an inhibitor process for as long as
//! the lock is held: `caffeinate -d` on macOS, `systemd-inhibit` elsewhere.

use std::path::{Path, PathBuf};
use std::process::{Child, Command, Stdio};
use std::sync::Mutex;

use tracing::debug;

use super::error::WakeLockError;
use super::WakeLock;

#[cfg(target_os = "macos")]
const INHIBITOR: &str = "/usr/bin/caffeinate";

#[cfg(target_os = "macos")]
fn inhibitor_args() -> Vec<String> {
    vec!["-d".to_string()]
}

#[cfg(not(target_os = "macos"))]
const INHIBITOR: &str = "/usr/bin/systemd-inhibit";

#[cfg(not(target_os = "macos"))]
fn inhibitor_args() -> Vec<String> {
    [
        "--what=idle",
        "--who=interval-trainer",
        "--why=Workout in progress",
        "sleep",
        "infinity",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

/// A wake lock held by a child process.
#[derive(Debug)]
pub struct ProcessWakeLock {
    program: PathBuf,
    args: Vec<String>,
    child: Mutex<Option<Child>>,
}

impl ProcessWakeLock {
    /// Creates a wake lock using the platform inhibitor.
    ///
    /// # Errors
    ///
    /// Returns `WakeLockError::Unsupported` if the inhibitor is not installed.
    pub fn platform() -> Result<Self, WakeLockError> {
        if !Path::new(INHIBITOR).exists() {
            return Err(WakeLockError::Unsupported(INHIBITOR.to_string()));
        }
        Ok(Self::with_command(INHIBITOR, inhibitor_args()))
    }

    /// Creates a wake lock that runs an arbitrary command while held.
    pub fn with_command(program: impl Into<PathBuf>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
            child: Mutex::new(None),
        }
    }

    /// Returns true while the inhibitor process is running.
    pub fn is_held(&self) -> bool {
        self.child
            .lock()
            .map(|mut guard| match guard.as_mut() {
                Some(child) => matches!(child.try_wait(), Ok(None)),
                None => false,
            })
            .unwrap_or(false)
    }
}

impl WakeLock for ProcessWakeLock {
    fn acquire(&self) -> Result<(), WakeLockError> {
        let mut guard = self
            .child
            .lock()
            .map_err(|e| WakeLockError::AcquireFailed(e.to_string()))?;

        if let Some(child) = guard.as_mut() {
            if matches!(child.try_wait(), Ok(None)) {
                return Ok(());
            }
        }

        let child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|e| WakeLockError::AcquireFailed(format!("{}: {}", self.program.display(), e)))?;

        debug!(pid = child.id(), "Wake lock acquired");
        *guard = Some(child);
        Ok(())
    }

    fn release(&self) -> Result<(), WakeLockError> {
        let mut guard = self
            .child
            .lock()
            .map_err(|e| WakeLockError::ReleaseFailed(e.to_string()))?;

        let Some(mut child) = guard.take() else {
            return Ok(());
        };

        if matches!(child.try_wait(), Ok(None)) {
            child
                .kill()
                .map_err(|e| WakeLockError::ReleaseFailed(e.to_string()))?;
        }
        let _ = child.wait();

        debug!("Wake lock released");
        Ok(())
    }
}

impl Drop for ProcessWakeLock {
    fn drop(&mut self) {
        let _ = self.release();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_program_fails_to_acquire() {
        let lock = ProcessWakeLock::with_command("/nonexistent/inhibitor", vec![]);
        let result = lock.acquire();
        assert!(matches!(result, Err(WakeLockError::AcquireFailed(_))));
        assert!(!lock.is_held());
    }

    #[test]
    fn test_release_without_acquire_is_ok() {
        let lock = ProcessWakeLock::with_command("/nonexistent/inhibitor", vec![]);
        assert!(lock.release().is_ok());
    }

    #[cfg(unix)]
    #[test]
    fn test_acquire_and_release_child_process() {
        if !Path::new("/bin/sleep").exists() {
            return;
        }
        let lock = ProcessWakeLock::with_command("/bin/sleep", vec!["30".to_string()]);

        lock.acquire().unwrap();
        assert!(lock.is_held());

        // Acquiring again keeps the same process
        lock.acquire().unwrap();
        assert!(lock.is_held());

        lock.release().unwrap();
        assert!(!lock.is_held());
    }

    #[test]
    fn test_platform_no_panic() {
        let _ = ProcessWakeLock::platform();
    }
}
