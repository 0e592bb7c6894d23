//! Completion sink: the bridge from a finished timer session to storage.
//!
//! The timer engine invokes its sink exactly once per session, when the
//! session reaches the complete phase. The engine does not retry and does not
//! roll back on failure; the sink owns persistence.

mod error;
mod journal;

use std::sync::{Arc, Mutex};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub use error::SinkError;
pub use journal::{WorkoutJournal, WorkoutLogRecord, DEFAULT_JOURNAL_PATH};

/// Summary of a finished session handed to the sink.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletionRecord {
    /// Timer session identifier
    #[serde(rename = "sessionId")]
    pub session_id: Uuid,
    /// Identifier of the preset that was run, if it has one
    #[serde(rename = "presetId", skip_serializing_if = "Option::is_none")]
    pub preset_id: Option<u32>,
    /// Name of the preset that was run
    #[serde(rename = "presetName")]
    pub preset_name: String,
    /// Rounds completed
    pub rounds: u32,
    /// Exercises per round
    #[serde(rename = "exerciseCount")]
    pub exercise_count: usize,
}

/// Capability receiving the "workout finished" signal.
pub trait CompletionSink {
    /// Persists (or otherwise handles) a finished workout.
    ///
    /// # Errors
    ///
    /// Returns an error if the record could not be handled.
    fn workout_completed(&self, record: &CompletionRecord) -> Result<(), SinkError>;
}

impl<T: CompletionSink + ?Sized> CompletionSink for Arc<T> {
    fn workout_completed(&self, record: &CompletionRecord) -> Result<(), SinkError> {
        (**self).workout_completed(record)
    }
}

/// Sink that discards completions.
#[derive(Debug, Clone, Copy, Default)]
pub struct DiscardSink;

impl CompletionSink for DiscardSink {
    fn workout_completed(&self, _record: &CompletionRecord) -> Result<(), SinkError> {
        Ok(())
    }
}

/// Mock sink for testing.
#[derive(Debug, Default)]
pub struct MockCompletionSink {
    records: Mutex<Vec<CompletionRecord>>,
    should_fail: std::sync::atomic::AtomicBool,
}

impl MockCompletionSink {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_should_fail(&self, should_fail: bool) {
        self.should_fail
            .store(should_fail, std::sync::atomic::Ordering::SeqCst);
    }

    #[must_use]
    pub fn records(&self) -> Vec<CompletionRecord> {
        self.records.lock().unwrap().clone()
    }

    #[must_use]
    pub fn count(&self) -> usize {
        self.records.lock().unwrap().len()
    }
}

impl CompletionSink for MockCompletionSink {
    fn workout_completed(&self, record: &CompletionRecord) -> Result<(), SinkError> {
        self.records.lock().unwrap().push(record.clone());
        if self.should_fail.load(std::sync::atomic::Ordering::SeqCst) {
            return Err(SinkError::Rejected("mock".to_string()));
        }
        Ok(())
    }
}
