//! Line-oriented text console for playing a [`Game`].
//!
//! Each request is one line, optionally prefixed by a numeric id. Responses
//! start with `=` on success or `?` on failure, followed by the id and the
//! payload, and end with a blank line.
//!
//! ## Commands
//!
//! - `name`, `version`, `protocol_version`
//! - `list_commands`, `known_command <cmd>`
//! - `quit`
//! - `showboard` - Render the board
//! - `status` - Game status, player to move and winner
//! - `place <row> <col>` - Play for the current player; computer seats reply
//! - `genmove` - Let the current computer player move
//! - `reset` - Clear a finished game
//! - `start` - Begin the next match after a reset
//!
//! ## Example
//!
//! ```no_run
//! use chain_capture::console::Console;
//! use chain_capture::game::{Game, PlayerSpec};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let game = Game::new(PlayerSpec::roster(2))?;
//!     Console::new(game).run(std::io::stdin().lock(), std::io::stdout())?;
//!     Ok(())
//! }
//! ```

use std::io::{self, BufRead, Write};

use crate::game::{Game, MoveOutcome, TurnRecord};

const KNOWN_COMMANDS: &[&str] = &[
    "genmove",
    "known_command",
    "list_commands",
    "name",
    "place",
    "protocol_version",
    "quit",
    "reset",
    "showboard",
    "start",
    "status",
];

/// Console state: the game being driven.
pub struct Console {
    game: Game,
}

impl Console {
    pub fn new(game: Game) -> Self {
        Self { game }
    }

    pub fn game(&self) -> &Game {
        &self.game
    }

    /// Read commands from `input` until `quit` or end of input.
    pub fn run<R: BufRead, W: Write>(&mut self, input: R, mut output: W) -> io::Result<()> {
        for line in input.lines() {
            let line = line?;

            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let (id, command_line) = Self::parse_id(line);
            let parts: Vec<&str> = command_line.split_whitespace().collect();
            if parts.is_empty() {
                continue;
            }

            let command = parts[0].to_lowercase();
            let (success, message) = self.execute(&command, &parts[1..]);
            let prefix = if success { '=' } else { '?' };
            let id_str = id.map(|i| i.to_string()).unwrap_or_default();

            writeln!(output, "{prefix}{id_str} {message}\n")?;
            output.flush()?;

            if command == "quit" {
                break;
            }
        }
        Ok(())
    }

    /// Split an optional numeric id off the front of the line.
    fn parse_id(line: &str) -> (Option<u32>, &str) {
        let trimmed = line.trim();
        let end = trimmed
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(trimmed.len());
        if end > 0 {
            if let Ok(id) = trimmed[..end].parse::<u32>() {
                return (Some(id), trimmed[end..].trim());
            }
        }
        (None, trimmed)
    }

    /// Execute a command and return (success, response).
    fn execute(&mut self, command: &str, args: &[&str]) -> (bool, String) {
        match command {
            "name" => (true, env!("CARGO_PKG_NAME").to_string()),

            "version" => (true, env!("CARGO_PKG_VERSION").to_string()),

            "protocol_version" => (true, "1".to_string()),

            "list_commands" => (true, KNOWN_COMMANDS.join("\n")),

            "known_command" => {
                let Some(name) = args.first() else {
                    return (false, "missing argument".to_string());
                };
                let known = KNOWN_COMMANDS.contains(&name.to_lowercase().as_str());
                (true, known.to_string())
            }

            "quit" => (true, String::new()),

            "showboard" => (true, format!("\n{}", self.game.board())),

            "status" => (true, self.describe_status()),

            "place" => {
                let (row, col) = match args {
                    [row, col, ..] => match (row.parse::<usize>(), col.parse::<usize>()) {
                        (Ok(row), Ok(col)) => (row, col),
                        _ => return (false, "invalid coordinates".to_string()),
                    },
                    _ => return (false, "missing arguments".to_string()),
                };
                match self.game.submit_and_respond(row, col) {
                    Ok(records) => report(&records),
                    Err(err) => (false, err.to_string()),
                }
            }

            "genmove" => {
                if !self.game.current_player().is_computer() {
                    return (false, "current player is not computer-controlled".to_string());
                }
                match self.game.play_computer_turns(1) {
                    Ok(records) if records.is_empty() => (false, "no move available".to_string()),
                    Ok(records) => report(&records),
                    Err(err) => (false, err.to_string()),
                }
            }

            "reset" => match self.game.reset() {
                Ok(()) => (true, String::new()),
                Err(reason) => (false, reason.to_string()),
            },

            "start" => match self.game.start() {
                Ok(()) => (true, String::new()),
                Err(reason) => (false, reason.to_string()),
            },

            _ => (false, format!("unknown command: {command}")),
        }
    }

    fn describe_status(&self) -> String {
        let player = self.game.current_player();
        match self.game.winner() {
            Some(victory) => format!("{} winner {} {}", self.game.status(), victory.winner, victory.color),
            None => format!("{} to-move {} {}", self.game.status(), player.id, player.color),
        }
    }
}

/// One line per turn; the first turn decides success.
fn report(records: &[TurnRecord]) -> (bool, String) {
    let lines: Vec<String> = records
        .iter()
        .map(|record| {
            let (row, col) = record.point;
            let what = match &record.outcome {
                MoveOutcome::Rejected(reason) => format!("rejected: {reason}"),
                MoveOutcome::Placed { tokens, .. } => format!("placed {tokens}"),
                MoveOutcome::Exploded(steps) => format!("exploded {}", steps.len()),
                MoveOutcome::Won { color, steps, .. } => {
                    format!("exploded {} {color} wins", steps.len())
                }
            };
            format!("{} {row} {col} {what}", record.player)
        })
        .collect();
    let success = records.first().is_some_and(|r| r.outcome.is_accepted());
    (success, lines.join("\n"))
}
