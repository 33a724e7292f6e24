//! Parsing of lines typed at the prompt.

use std::path::PathBuf;

use chess_core::{parse_move_text, MoveError, MoveRequest, TimeControl};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq)]
pub enum UserCommand {
    Move(MoveRequest),
    Pause,
    Restart,
    TimeControl { minutes: u32, increment: u32 },
    Board,
    History,
    Clock,
    Save(PathBuf),
    Help,
    Quit,
}

#[derive(Debug, Error, PartialEq)]
pub enum InputError {
    #[error("empty input")]
    Empty,
    #[error("unknown command '{0}' (type 'help')")]
    Unknown(String),
    #[error("usage: {0}")]
    Usage(&'static str),
    #[error(transparent)]
    Move(#[from] MoveError),
}

pub fn parse_command(line: &str) -> Result<UserCommand, InputError> {
    let mut words = line.split_whitespace();
    let Some(head) = words.next() else {
        return Err(InputError::Empty);
    };
    let rest: Vec<&str> = words.collect();
    let word = head.to_lowercase();

    let cmd = match word.as_str() {
        "pause" | "p" => UserCommand::Pause,
        "restart" | "new" => UserCommand::Restart,
        "board" | "b" => UserCommand::Board,
        "history" | "moves" => UserCommand::History,
        "clock" => UserCommand::Clock,
        "help" | "?" => UserCommand::Help,
        "quit" | "exit" | "q" => UserCommand::Quit,
        "time" | "tc" => {
            const USAGE: &str = "time <minutes> <increment>";
            let [minutes, increment] = rest.as_slice() else {
                return Err(InputError::Usage(USAGE));
            };
            let minutes = minutes.parse().map_err(|_| InputError::Usage(USAGE))?;
            let increment = increment.parse().map_err(|_| InputError::Usage(USAGE))?;
            if minutes == 0 || minutes > TimeControl::MAX_MINUTES {
                return Err(InputError::Usage(USAGE));
            }
            UserCommand::TimeControl { minutes, increment }
        }
        "save" => {
            let [path] = rest.as_slice() else {
                return Err(InputError::Usage("save <path>"));
            };
            UserCommand::Save(PathBuf::from(path))
        }
        // four characters that start with a file letter are a move
        _ if word.len() == 4 && word.starts_with(|c: char| ('a'..='h').contains(&c)) => {
            UserCommand::Move(parse_move_text(&word)?)
        }
        _ => return Err(InputError::Unknown(head.to_string())),
    };
    Ok(cmd)
}

pub fn help_text() -> &'static str {
    "Commands:
  e2e4              move a piece (origin then destination)
  pause             pause or resume the clocks
  restart           start a new game
  time <m> <inc>    reset both clocks to <m> minutes, <inc> seconds per move
  board             show the board
  history           show the move list
  clock             show both clocks
  save <path>       write the game to a JSON file
  help              show this text
  quit              leave"
}

#[cfg(test)]
#[path = "input_tests.rs"]
mod input_tests;
