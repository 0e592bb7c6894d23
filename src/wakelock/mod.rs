//! Keeping the display awake during a workout.
//!
//! The timer engine acquires the lock on start, releases it on pause, reset,
//! and completion, and re-acquires it when the session regains visibility
//! while still running. All wake lock failures are recoverable: the engine
//! logs them and keeps counting down.

mod error;
mod process;

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

pub use error::WakeLockError;
pub use process::ProcessWakeLock;

/// Capability for holding the display awake.
pub trait WakeLock {
    /// Acquires the lock. Acquiring a held lock is a no-op.
    ///
    /// # Errors
    ///
    /// Returns an error if the platform refuses or cannot provide the lock.
    fn acquire(&self) -> Result<(), WakeLockError>;

    /// Releases the lock. Releasing a free lock is a no-op.
    ///
    /// # Errors
    ///
    /// Returns an error if the lock could not be released.
    fn release(&self) -> Result<(), WakeLockError>;
}

impl<T: WakeLock + ?Sized> WakeLock for Arc<T> {
    fn acquire(&self) -> Result<(), WakeLockError> {
        (**self).acquire()
    }

    fn release(&self) -> Result<(), WakeLockError> {
        (**self).release()
    }
}

/// Wake lock that does nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopWakeLock;

impl WakeLock for NoopWakeLock {
    fn acquire(&self) -> Result<(), WakeLockError> {
        Ok(())
    }

    fn release(&self) -> Result<(), WakeLockError> {
        Ok(())
    }
}

/// Mock wake lock for testing.
#[derive(Debug, Default)]
pub struct MockWakeLock {
    held: AtomicBool,
    acquire_calls: AtomicUsize,
    release_calls: AtomicUsize,
    should_fail: AtomicBool,
}

impl MockWakeLock {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes acquire requests fail, as on a platform that denies the lock.
    pub fn set_should_fail(&self, should_fail: bool) {
        self.should_fail.store(should_fail, Ordering::SeqCst);
    }

    #[must_use]
    pub fn is_held(&self) -> bool {
        self.held.load(Ordering::SeqCst)
    }

    #[must_use]
    pub fn acquire_count(&self) -> usize {
        self.acquire_calls.load(Ordering::SeqCst)
    }

    #[must_use]
    pub fn release_count(&self) -> usize {
        self.release_calls.load(Ordering::SeqCst)
    }
}

impl WakeLock for MockWakeLock {
    fn acquire(&self) -> Result<(), WakeLockError> {
        self.acquire_calls.fetch_add(1, Ordering::SeqCst);
        if self.should_fail.load(Ordering::SeqCst) {
            return Err(WakeLockError::AcquireFailed("mock".to_string()));
        }
        self.held.store(true, Ordering::SeqCst);
        Ok(())
    }

    fn release(&self) -> Result<(), WakeLockError> {
        self.release_calls.fetch_add(1, Ordering::SeqCst);
        self.held.store(false, Ordering::SeqCst);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_noop_wake_lock() {
        let lock = NoopWakeLock;
        assert!(lock.acquire().is_ok());
        assert!(lock.release().is_ok());
    }

    #[test]
    fn test_mock_tracks_state() {
        let lock = MockWakeLock::new();
        lock.acquire().unwrap();
        assert!(lock.is_held());
        lock.release().unwrap();
        assert!(!lock.is_held());
        assert_eq!(lock.acquire_count(), 1);
        assert_eq!(lock.release_count(), 1);
    }

    #[test]
    fn test_mock_failure() {
        let lock = MockWakeLock::new();
        lock.set_should_fail(true);
        assert!(lock.acquire().is_err());
        assert!(!lock.is_held());
    }
}
