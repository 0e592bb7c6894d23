//! CLI module for the interval trainer.
//!
//! This module provides the command-line interface:
//! - `commands`: Command definitions using clap derive
//! - `display`: Output formatting and display logic
//! - `input`: Keyboard command parsing for interactive sessions

pub mod commands;
pub mod display;
pub mod input;

pub use commands::{Cli, Commands, RunArgs};
pub use display::Display;
pub use input::{parse_command, spawn_stdin_reader};
