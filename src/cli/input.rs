//! Keyboard input for interactive sessions.
//!
//! Commands are read line by line from stdin, so they work both in a
//! terminal and when piped (`printf 's\n' | interval-trainer run`).
//! Reading happens on a plain thread: a blocking stdin read must not keep
//! the runtime from shutting down when the session ends.

use std::io::{self, BufRead};
use std::thread;

use tokio::sync::mpsc;
use tracing::debug;

use crate::engine::SessionCommand;

/// Parses one input line into a session command.
///
/// Matching is case-insensitive and ignores surrounding whitespace.
/// Unknown input yields `None`.
pub fn parse_command(line: &str) -> Option<SessionCommand> {
    match line.trim().to_lowercase().as_str() {
        "s" | "start" | "resume" => Some(SessionCommand::Start),
        "p" | "pause" => Some(SessionCommand::Pause),
        "r" | "reset" => Some(SessionCommand::Reset),
        "v" | "show" => Some(SessionCommand::VisibilityChanged(true)),
        "h" | "hide" => Some(SessionCommand::VisibilityChanged(false)),
        "q" | "quit" | "exit" => Some(SessionCommand::Quit),
        _ => None,
    }
}

/// Forwards commands parsed from `reader` until it ends or the receiver
/// is dropped. The sender is dropped on return, closing the channel.
pub fn forward_commands<R: BufRead>(reader: R, tx: mpsc::UnboundedSender<SessionCommand>) {
    for line in reader.lines() {
        let Ok(line) = line else { break };

        match parse_command(&line) {
            Some(command) => {
                if tx.send(command).is_err() {
                    break;
                }
            }
            None if line.trim().is_empty() => {}
            None => debug!(input = %line.trim(), "Unknown command"),
        }
    }
    debug!("Input reader finished");
}

/// Spawns a detached thread reading commands from stdin.
pub fn spawn_stdin_reader(tx: mpsc::UnboundedSender<SessionCommand>) -> io::Result<()> {
    thread::Builder::new()
        .name("stdin-commands".to_string())
        .spawn(move || forward_commands(io::stdin().lock(), tx))
        .map(|_| ())
}
