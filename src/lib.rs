//! chain-capture: a chain-reaction capture board game engine.
//!
//! Players take turns adding tokens to cells of a square board. A cell that
//! holds more than [`constants::THRESHOLD`] tokens explodes: it empties and
//! hands one token to each orthogonal neighbor, converting those neighbors to
//! the exploding color. Explosions can set off further explosions. The last
//! color left on the board wins.
//!
//! ## Modules
//!
//! - [`constants`] - Threshold, board bounds and heuristic weights
//! - [`error`] - Error types
//! - [`board`] - Board model: colors, cells, the grid
//! - [`cascade`] - Explosion propagation
//! - [`win`] - Win detection
//! - [`game`] - Turn controller and game lifecycle
//! - [`analysis`] - Board analysis for the computer player
//! - [`scoring`] - Move scoring factors
//! - [`difficulty`] - Difficulty profiles
//! - [`strategy`] - Computer move selection
//! - [`console`] - Line-oriented text console
//!
//! ## Example
//!
//! ```
//! use chain_capture::game::{Game, MoveOutcome, PlayerSpec};
//!
//! let mut game = Game::new(PlayerSpec::roster(2)).unwrap();
//!
//! // Blue drops a token in the corner
//! let outcome = game.submit_move(0, 0).unwrap();
//! assert_eq!(outcome, MoveOutcome::Placed { row: 0, col: 0, tokens: 1 });
//!
//! // Red cannot play on a blue cell
//! assert!(!game.submit_move(0, 0).unwrap().is_accepted());
//! ```

pub mod analysis;
pub mod board;
pub mod cascade;
pub mod console;
pub mod constants;
pub mod difficulty;
pub mod error;
pub mod game;
pub mod scoring;
pub mod strategy;
pub mod win;
