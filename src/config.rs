//! Application configuration.
//!
//! Settings are read from a JSON file (by default
//! `~/.interval-trainer/config.json`). Every field is optional; a missing
//! file yields the default configuration with a built-in sample preset.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::completion::WorkoutJournal;
use crate::types::{Exercise, ExercisePreset, TimerConfig};

/// Default configuration file location, relative to the home directory.
pub const DEFAULT_CONFIG_PATH: &str = ".interval-trainer/config.json";

// ============================================================================
// ConfigError
// ============================================================================

/// Errors raised while loading configuration or selecting a preset.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file exists but could not be read.
    #[error("設定ファイルを読み込めません ({path}): {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The configuration file is not valid JSON for this schema.
    #[error("設定ファイルの形式が不正です ({path}): {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// More than one preset is marked as the default.
    #[error("デフォルトのプリセットは1つだけ指定できます: {}", .0.join(", "))]
    MultipleDefaults(Vec<String>),

    /// No preset matches the requested name or id.
    #[error("プリセットが見つかりません: {0}")]
    PresetNotFound(String),
}

// ============================================================================
// AppConfig
// ============================================================================

fn default_true() -> bool {
    true
}

/// Top-level configuration for the CLI.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AppConfig {
    /// Timer behavior
    #[serde(default)]
    pub timer: TimerConfig,

    /// Whether tones are played
    #[serde(default = "default_true")]
    pub sound: bool,

    /// Whether the display is kept awake while a workout runs
    #[serde(rename = "wakeLock", default = "default_true")]
    pub wake_lock: bool,

    /// Workout journal location; `None` uses the default under the home
    /// directory
    #[serde(rename = "journalPath", default, skip_serializing_if = "Option::is_none")]
    pub journal_path: Option<PathBuf>,

    /// Saved presets
    #[serde(default)]
    pub presets: Vec<ExercisePreset>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            timer: TimerConfig::default(),
            sound: true,
            wake_lock: true,
            journal_path: None,
            presets: Vec::new(),
        }
    }
}

impl AppConfig {
    /// Returns the default configuration file path, if a home directory exists.
    pub fn default_path() -> Option<PathBuf> {
        dirs::home_dir().map(|home| home.join(DEFAULT_CONFIG_PATH))
    }

    /// Loads configuration from `path`.
    ///
    /// A missing file is not an error and yields [`AppConfig::default`].
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, or if more than
    /// one preset is marked as default.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "No config file, using defaults");
                return Ok(Self::default());
            }
            Err(source) => {
                return Err(ConfigError::Io {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };

        let config: Self = serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;

        debug!(
            path = %path.display(),
            presets = config.presets.len(),
            "Configuration loaded"
        );
        Ok(config)
    }

    /// Checks cross-preset rules.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::MultipleDefaults` if more than one preset is
    /// marked as default.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let defaults: Vec<String> = self
            .presets
            .iter()
            .filter(|p| p.default)
            .map(|p| p.name.clone())
            .collect();

        if defaults.len() > 1 {
            return Err(ConfigError::MultipleDefaults(defaults));
        }
        Ok(())
    }

    /// Returns the configured presets, or the sample preset when none exist.
    pub fn presets(&self) -> Vec<ExercisePreset> {
        if self.presets.is_empty() {
            vec![sample_preset()]
        } else {
            self.presets.clone()
        }
    }

    /// Selects a preset by name or numeric id.
    ///
    /// Without a query, returns the default preset, falling back to the first.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::PresetNotFound` if nothing matches `query`.
    pub fn select_preset(&self, query: Option<&str>) -> Result<ExercisePreset, ConfigError> {
        let presets = self.presets();

        let found = match query {
            Some(query) => {
                let id = query.parse::<u32>().ok();
                presets
                    .iter()
                    .find(|p| p.name == query || Some(p.id) == id)
            }
            None => presets.iter().find(|p| p.default).or_else(|| presets.first()),
        };

        found
            .cloned()
            .ok_or_else(|| ConfigError::PresetNotFound(query.unwrap_or_default().to_string()))
    }

    /// Returns the journal path, resolving the default location.
    pub fn journal_path(&self) -> Option<PathBuf> {
        self.journal_path
            .clone()
            .or_else(WorkoutJournal::default_path)
    }
}

/// Built-in preset used when none are configured.
pub fn sample_preset() -> ExercisePreset {
    ExercisePreset::new(
        "サンプル",
        3,
        vec![
            Exercise::new("スクワット", 30, 10),
            Exercise::new("腕立て伏せ", 30, 10),
            Exercise::new("プランク", 30, 10),
        ],
    )
    .with_id(1)
    .as_default()
}
