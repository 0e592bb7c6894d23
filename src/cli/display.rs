//! Display utilities for the interval trainer CLI.
//!
//! This module provides formatted output for:
//! - The live timer line (phase, time, counters, progress bar)
//! - Session event messages
//! - Preset and history listings
//! - Error messages

use std::io::{self, Write};

use chrono::{Months, NaiveDate};

use crate::completion::WorkoutLogRecord;
use crate::engine::TimerEvent;
use crate::types::{format_mm_ss, DisplaySnapshot, ExercisePreset, Phase};

/// Width of the progress bar in characters.
const PROGRESS_WIDTH: usize = 20;

// ============================================================================
// Display
// ============================================================================

/// Display utilities for CLI output.
pub struct Display;

impl Display {
    /// Redraws the live timer line in place.
    pub fn show_snapshot(snapshot: &DisplaySnapshot) {
        let mut stdout = io::stdout();
        // \x1b[2K clears the previous line before redrawing
        let _ = write!(stdout, "\r\x1b[2K{}", Self::status_line(snapshot));
        let _ = stdout.flush();
    }

    /// Prints a message for events that deserve their own line.
    pub fn show_event(event: &TimerEvent) {
        if let Some(message) = Self::event_message(event) {
            println!("\r\x1b[2K{}", message);
        }
    }

    /// Shows the key bindings for an interactive session.
    pub fn show_controls() {
        println!("操作: [s] 開始/再開  [p] 一時停止  [r] リセット  [q] 終了  (Enterで確定)");
    }

    /// Shows the preset about to run and whether today's workout is done.
    pub fn show_preset_header(preset: &ExercisePreset, skip_final_rest: bool, completed_today: bool) {
        println!(
            "{} ({}ラウンド, 合計 {})",
            preset.name,
            preset.rounds,
            Self::format_duration(preset.total_seconds(skip_final_rest))
        );
        for (i, exercise) in preset.exercises.iter().enumerate() {
            println!(
                "  {}. {} {}s / 休憩 {}s",
                i + 1,
                exercise.name,
                exercise.exercise_seconds,
                exercise.rest_seconds
            );
        }
        if completed_today {
            println!("✓ 本日のトレーニングは完了済みです");
        }
    }

    /// Lists presets, marking the default one.
    pub fn show_presets(presets: &[ExercisePreset], skip_final_rest: bool) {
        println!("プリセット一覧");
        println!("─────────────────────────────");
        for preset in presets {
            println!("{}", Self::preset_line(preset, skip_final_rest));
        }
    }

    /// Lists workouts completed in `month`.
    pub fn show_history(month: NaiveDate, entries: &[WorkoutLogRecord]) {
        println!("{} のトレーニング記録", month.format("%Y年%m月"));
        println!("─────────────────────────────");

        if entries.is_empty() {
            println!("記録はありません");
        } else {
            for entry in entries {
                let name = entry.preset_name.as_deref().unwrap_or("-");
                let mark = if entry.completed { "✓" } else { " " };
                println!("{} {} {}", mark, entry.date.format("%m/%d"), name);
            }
            println!("合計: {}日", entries.iter().filter(|e| e.completed).count());
        }
        println!("{}", Self::month_navigation(month));
    }

    /// Shows an error message.
    pub fn show_error(message: &str) {
        eprintln!("エラー: {}", message);
    }

    // ------------------------------------------------------------------------
    // Formatting
    // ------------------------------------------------------------------------

    /// Hints for showing the months around `month`.
    pub fn month_navigation(month: NaiveDate) -> String {
        let label = |date: Option<NaiveDate>| {
            date.map_or_else(|| "-".to_string(), |d| d.format("%Y-%m").to_string())
        };
        format!(
            "前月: --month {}  翌月: --month {}",
            label(month.checked_sub_months(Months::new(1))),
            label(month.checked_add_months(Months::new(1)))
        )
    }

    // ------------------------------------------------------------------------
    // Live Line
    // ------------------------------------------------------------------------

    /// Formats the single-line timer view.
    pub fn status_line(snapshot: &DisplaySnapshot) -> String {
        let mut line = format!(
            "[{}] {}  ラウンド {}  種目 {}",
            snapshot.phase_label, snapshot.time, snapshot.round, snapshot.exercise
        );

        if let Some(current) = &snapshot.current_exercise {
            if snapshot.phase != Phase::Complete {
                line.push_str(&format!("  {}", current));
            }
        }
        if snapshot.phase == Phase::Resting {
            if let Some(next) = &snapshot.next_exercise {
                line.push_str(&format!("  次: {}", next));
            }
        }

        line.push_str(&format!(
            "  {} {:>3.0}%",
            Self::progress_bar(snapshot.progress_percent),
            snapshot.progress_percent
        ));

        if !snapshot.running && !snapshot.completed && snapshot.phase != Phase::Ready {
            line.push_str("  (一時停止中)");
        }
        line
    }

    /// Renders `percent` as a fixed-width bar.
    pub fn progress_bar(percent: f64) -> String {
        let ratio = (percent / 100.0).clamp(0.0, 1.0);
        let filled = (ratio * PROGRESS_WIDTH as f64).round() as usize;
        format!(
            "{}{}",
            "█".repeat(filled),
            "░".repeat(PROGRESS_WIDTH - filled)
        )
    }

    /// Formats seconds as `MM:SS`, or `H:MM:SS` past an hour.
    pub fn format_duration(total_seconds: u64) -> String {
        let hours = total_seconds / 3600;
        if hours == 0 {
            format_mm_ss(total_seconds as u32)
        } else {
            format!(
                "{}:{:02}:{:02}",
                hours,
                (total_seconds % 3600) / 60,
                total_seconds % 60
            )
        }
    }

    fn preset_line(preset: &ExercisePreset, skip_final_rest: bool) -> String {
        let marker = if preset.default { "*" } else { " " };
        let names: Vec<&str> = preset.exercises.iter().map(|e| e.name.as_str()).collect();
        format!(
            "{} [{}] {}  {}ラウンド  {}  ({})",
            marker,
            preset.id,
            preset.name,
            preset.rounds,
            Self::format_duration(preset.total_seconds(skip_final_rest)),
            names.join(", ")
        )
    }

    fn event_message(event: &TimerEvent) -> Option<String> {
        match event {
            TimerEvent::Started => Some("> トレーニングを開始しました".to_string()),
            TimerEvent::Resumed => Some("> 再開しました".to_string()),
            TimerEvent::Paused => Some("|| 一時停止しました".to_string()),
            TimerEvent::Reset => Some("[] リセットしました".to_string()),
            TimerEvent::StartRejected { reason } => Some(format!("開始できません: {}", reason)),
            TimerEvent::Completed { record } => Some(format!(
                "* {} 完了! お疲れ様でした ({}ラウンド)",
                record.preset_name, record.rounds
            )),
            TimerEvent::PhaseStarted { .. } | TimerEvent::Tick { .. } | TimerEvent::Display(_) => {
                None
            }
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
