//! Command definitions for the interval trainer CLI.
//!
//! Uses clap derive macro for argument parsing.

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};

use crate::config::AppConfig;
use crate::types::ExercisePreset;

// ============================================================================
// CLI Structure
// ============================================================================

/// Interval Trainer CLI - exercise/rest interval timer
#[derive(Parser, Debug)]
#[command(
    name = "interval-trainer",
    version,
    about = "インターバルトレーニング用タイマーCLI",
    long_about = "準備・運動・休憩を繰り返すインターバルタイマー。\n\
                  音と音声で切り替えを知らせ、完了したトレーニングを記録します。",
    propagate_version = true
)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Enable verbose output for debugging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to the configuration file
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,
}

// ============================================================================
// Subcommands
// ============================================================================

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Run a workout interactively
    Run(RunArgs),

    /// List configured presets
    Presets,

    /// Show completed workouts for a month (defaults to this month)
    History {
        /// Month to show
        #[arg(short, long, value_name = "YYYY-MM", value_parser = parse_month)]
        month: Option<NaiveDate>,
    },

    /// Generate shell completion scripts
    Completions {
        /// Shell type for completion script
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

// ============================================================================
// Run Command Arguments
// ============================================================================

/// Arguments for the run command
#[derive(Args, Debug, Clone, Default)]
pub struct RunArgs {
    /// Preset name or id (defaults to the default preset)
    #[arg(short, long)]
    pub preset: Option<String>,

    /// Preparation countdown in seconds (0-600, 0 disables it)
    #[arg(long, value_parser = clap::value_parser!(u32).range(0..=600))]
    pub prep: Option<u32>,

    /// Number of rounds (1-100)
    #[arg(short, long, value_parser = clap::value_parser!(u32).range(1..=100))]
    pub rounds: Option<u32>,

    /// Disable tones
    #[arg(long)]
    pub no_sound: bool,

    /// Disable voice announcements
    #[arg(long)]
    pub no_voice: bool,

    /// Do not keep the display awake
    #[arg(long)]
    pub no_wake_lock: bool,

    /// Start immediately instead of waiting for the start key
    #[arg(short, long)]
    pub autostart: bool,
}

impl RunArgs {
    /// Applies command-line overrides on top of the loaded configuration.
    pub fn apply(&self, config: &mut AppConfig, preset: &mut ExercisePreset) {
        if let Some(prep) = self.prep {
            config.timer.prep_seconds = prep;
        }
        if let Some(rounds) = self.rounds {
            preset.rounds = rounds;
        }
        if self.no_sound {
            config.sound = false;
        }
        if self.no_voice {
            config.timer.voice_announcements = false;
        }
        if self.no_wake_lock {
            config.wake_lock = false;
        }
    }
}

/// Parses `YYYY-MM` into the first day of that month.
fn parse_month(value: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(&format!("{}-01", value.trim()), "%Y-%m-%d")
        .map_err(|_| format!("月は YYYY-MM 形式で指定してください: {}", value))
}

// ============================================================================
// Tests
// ============================================================================
