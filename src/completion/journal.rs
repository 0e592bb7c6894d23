//! JSON-lines workout journal.
//!
//! One line per day: recording a workout on a date that already has an entry
//! replaces that entry.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use chrono::{Datelike, Local, NaiveDate};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use super::error::SinkError;
use super::{CompletionRecord, CompletionSink};

/// Default journal location relative to the home directory.
pub const DEFAULT_JOURNAL_PATH: &str = ".interval-trainer/workouts.jsonl";

/// A persisted workout log entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkoutLogRecord {
    /// Calendar day the workout was done
    pub date: NaiveDate,
    /// Whether the workout was completed
    pub completed: bool,
    /// Preset the workout ran, if known
    #[serde(rename = "presetId", skip_serializing_if = "Option::is_none")]
    pub preset_id: Option<u32>,
    /// Preset name at the time of the workout
    #[serde(rename = "presetName", skip_serializing_if = "Option::is_none")]
    pub preset_name: Option<String>,
    /// Timer session that produced this entry
    #[serde(rename = "sessionId", skip_serializing_if = "Option::is_none")]
    pub session_id: Option<Uuid>,
}

impl WorkoutLogRecord {
    /// Builds a completed entry for `date` from a completion record.
    pub fn completed_on(date: NaiveDate, record: &CompletionRecord) -> Self {
        Self {
            date,
            completed: true,
            preset_id: record.preset_id,
            preset_name: Some(record.preset_name.clone()),
            session_id: Some(record.session_id),
        }
    }
}

/// File-backed workout journal.
#[derive(Debug, Clone)]
pub struct WorkoutJournal {
    path: PathBuf,
}

impl WorkoutJournal {
    /// Opens (lazily) the journal at `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Returns the journal in the user's home directory.
    pub fn default_path() -> Option<PathBuf> {
        dirs::home_dir().map(|home| home.join(DEFAULT_JOURNAL_PATH))
    }

    /// Returns the journal file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads every entry. A missing file reads as an empty journal.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or a line is malformed.
    pub fn entries(&self) -> Result<Vec<WorkoutLogRecord>, SinkError> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(source) => {
                return Err(SinkError::Io {
                    path: self.path.clone(),
                    source,
                })
            }
        };

        content
            .lines()
            .filter(|line| !line.trim().is_empty())
            .map(|line| serde_json::from_str(line).map_err(SinkError::from))
            .collect()
    }

    /// Returns the entries that fall in the month containing `day`.
    ///
    /// # Errors
    ///
    /// Returns an error if the journal cannot be read.
    pub fn in_month(&self, day: NaiveDate) -> Result<Vec<WorkoutLogRecord>, SinkError> {
        Ok(self
            .entries()?
            .into_iter()
            .filter(|entry| entry.date.year() == day.year() && entry.date.month() == day.month())
            .collect())
    }

    /// Returns true if a completed workout is logged on `date`.
    ///
    /// # Errors
    ///
    /// Returns an error if the journal cannot be read.
    pub fn is_completed_on(&self, date: NaiveDate) -> Result<bool, SinkError> {
        Ok(self
            .entries()?
            .iter()
            .any(|entry| entry.date == date && entry.completed))
    }

    /// Inserts `entry`, replacing any entry on the same date.
    ///
    /// # Errors
    ///
    /// Returns an error if the journal cannot be read or written.
    pub fn upsert(&self, entry: WorkoutLogRecord) -> Result<(), SinkError> {
        let mut entries = self.entries()?;
        entries.retain(|existing| existing.date != entry.date);
        entries.push(entry);
        entries.sort_by_key(|e| e.date);
        self.write_all(&entries)
    }

    fn write_all(&self, entries: &[WorkoutLogRecord]) -> Result<(), SinkError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|source| SinkError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        let mut content = String::new();
        for entry in entries {
            content.push_str(&serde_json::to_string(entry)?);
            content.push('\n');
        }

        fs::write(&self.path, content).map_err(|source| SinkError::Io {
            path: self.path.clone(),
            source,
        })
    }
}

impl CompletionSink for WorkoutJournal {
    fn workout_completed(&self, record: &CompletionRecord) -> Result<(), SinkError> {
        let today = Local::now().date_naive();
        self.upsert(WorkoutLogRecord::completed_on(today, record))?;
        info!(date = %today, preset = %record.preset_name, "Workout recorded");
        Ok(())
    }
}
