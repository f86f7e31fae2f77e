//! Error types shared across the engine.
//!
//! Illegal player actions are not errors: they come back as
//! [`MoveOutcome::Rejected`](crate::game::MoveOutcome::Rejected). The types
//! here cover contract failures and configuration problems.

use thiserror::Error;

use crate::board::{Color, Point};

/// Contract violation of a direct board mutation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BoardError {
    #[error("cell ({row}, {col}) is outside the {size}x{size} board")]
    OutOfBounds { row: usize, col: usize, size: usize },
    #[error("cell ({row}, {col}) is owned by {owner}, not {color}")]
    ForeignOwner {
        row: usize,
        col: usize,
        owner: Color,
        color: Color,
    },
}

/// Rejected game setup. The game is not created.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("a game needs between {min} and {max} players, got {got}")]
    PlayerCount { got: usize, min: usize, max: usize },
    #[error("color {0} is assigned to more than one player")]
    DuplicateColor(Color),
    #[error("board size must be between {min} and {max}, got {got}")]
    BoardSize { got: usize, min: usize, max: usize },
    #[error("starting board has an unstable cell at ({row}, {col})")]
    UnstableCell { row: usize, col: usize },
    #[error("starting board holds {0}, which no player is using")]
    UnseatedColor(Color),
    #[error("players can only be changed while the game is waiting")]
    RosterLocked,
}

/// A programming-contract failure inside the engine.
///
/// These are never caused by player input. The operation that hit one is
/// aborted and the board is left as it was before that operation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvariantViolation {
    #[error("coordinate {0:?} reached the cascade but is off the board")]
    OutOfBounds(Point),
    #[error("cascade did not settle within {0} waves")]
    CascadeOverrun(usize),
    #[error("cell {0:?} is still unstable after its epoch")]
    UnstableBoard(Point),
}

/// Failure of a game-level operation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    #[error("engine invariant violated: {0}")]
    Invariant(#[from] InvariantViolation),
}
