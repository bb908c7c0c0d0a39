//! Interactive command parsing

use crate::error::{CliError, Result};
use tunebox_playback::PlayerCommand;

pub const HELP: &str = "\
commands:
  play N          play entry N of the visible list
  toggle          pause / resume
  next | prev     skip forward / back (prev restarts past 3s)
  seek S          jump to S seconds
  shuffle on|off  toggle shuffle
  repeat          cycle repeat off -> all -> one
  search [Q]      filter the list (no query clears it)
  list            show the visible list
  status          show the transport
  help            this text
  quit            exit";

/// A line typed at the prompt
#[derive(Debug, Clone, PartialEq)]
pub enum ReplCommand {
    Player(PlayerCommand),
    List,
    Status,
    Help,
    Quit,
}

/// Parse one input line; blank lines yield `None`
pub fn parse(line: &str) -> Result<Option<ReplCommand>> {
    let line = line.trim();
    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    };

    let command = match word.to_ascii_lowercase().as_str() {
        "" => return Ok(None),
        "play" | "p" => {
            let number: usize = rest.parse().map_err(|_| CliError::InvalidArgument {
                command: "play",
                reason: format!("expected a list number, got {rest:?}"),
            })?;
            let position = number.checked_sub(1).ok_or(CliError::InvalidArgument {
                command: "play",
                reason: "list numbers start at 1".to_string(),
            })?;
            ReplCommand::Player(PlayerCommand::SelectVisible(position))
        }
        "toggle" | "t" | "pause" => ReplCommand::Player(PlayerCommand::TogglePlay),
        "next" | "n" => ReplCommand::Player(PlayerCommand::Next),
        "prev" | "previous" => ReplCommand::Player(PlayerCommand::Previous),
        "seek" => {
            let seconds: f64 = rest
                .parse()
                .ok()
                .filter(|s: &f64| s.is_finite())
                .ok_or_else(|| CliError::InvalidArgument {
                    command: "seek",
                    reason: format!("expected seconds, got {rest:?}"),
                })?;
            ReplCommand::Player(PlayerCommand::SeekTo(seconds))
        }
        "shuffle" => {
            let enabled = match rest.to_ascii_lowercase().as_str() {
                "on" | "true" | "1" => true,
                "off" | "false" | "0" => false,
                other => {
                    return Err(CliError::InvalidArgument {
                        command: "shuffle",
                        reason: format!("expected on or off, got {other:?}"),
                    })
                }
            };
            ReplCommand::Player(PlayerCommand::SetShuffle(enabled))
        }
        "repeat" | "r" => ReplCommand::Player(PlayerCommand::CycleRepeat),
        "search" | "/" => ReplCommand::Player(PlayerCommand::SetQuery(rest.to_string())),
        "list" | "ls" => ReplCommand::List,
        "status" | "s" => ReplCommand::Status,
        "help" | "?" => ReplCommand::Help,
        "quit" | "q" | "exit" => ReplCommand::Quit,
        other => return Err(CliError::UnknownCommand(other.to_string())),
    };

    Ok(Some(command))
}
