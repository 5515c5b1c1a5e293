//! Parsing of the human's input lines.

use okey_core::GameAction;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CommandError {
    #[error("Empty command")]
    Empty,

    #[error("Unknown command: {0}")]
    Unknown(String),

    #[error("Missing tile id, e.g. `discard red-5-1`")]
    MissingTile,

    #[error("Unexpected argument: {0}")]
    UnexpectedArgument(String),
}

/// A line of input from the human
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// A move for seat 1
    Play(GameAction),
    /// Highlight a tile
    Select(String),
    /// Suggested move for seat 1
    Hint,
    /// Dump the state as JSON
    State,
    /// Deal again
    Deal,
    Help,
    Quit,
}

impl Command {
    pub fn parse(line: &str) -> Result<Self, CommandError> {
        let mut words = line.split_whitespace();
        let verb = words.next().ok_or(CommandError::Empty)?;
        let argument = words.next();

        let command = match verb.to_ascii_lowercase().as_str() {
            "draw" | "d" => Command::Play(GameAction::Draw),
            "pass" | "p" => Command::Play(GameAction::Pass),
            "discard" | "x" => Command::Play(GameAction::Discard {
                tile_id: argument.ok_or(CommandError::MissingTile)?.to_string(),
            }),
            "select" | "s" => Command::Select(argument.ok_or(CommandError::MissingTile)?.to_string()),
            "hint" | "h" => Command::Hint,
            "state" => Command::State,
            "deal" | "new" => Command::Deal,
            "help" | "?" => Command::Help,
            "quit" | "q" | "exit" => Command::Quit,
            other => return Err(CommandError::Unknown(other.to_string())),
        };

        let takes_argument = matches!(
            command,
            Command::Play(GameAction::Discard { .. }) | Command::Select(_)
        );
        let extra = if takes_argument { words.next() } else { argument };
        if let Some(extra) = extra {
            return Err(CommandError::UnexpectedArgument(extra.to_string()));
        }

        Ok(command)
    }
}

pub const HELP: &str = "\
Commands:
  draw | d              draw from the pile
  discard | x <tile>    discard a tile, e.g. `x red-5-1`
  pass | p              pass the turn
  select | s <tile>     highlight a tile
  hint | h              suggest a move
  state                 print the game state as JSON
  deal | new            start the next deal
  quit | q              leave the table";
