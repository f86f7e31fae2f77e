//! Constants for board geometry, game rules, and heuristic parameters.
//!
//! Everything the engine and the computer player tune lives here so the
//! numbers can be read (and changed) in one place.

// =============================================================================
// Board Geometry
// =============================================================================

/// Default board size (NxN).
pub const DEFAULT_SIZE: usize = 6;

/// Smallest accepted board size.
pub const MIN_BOARD_SIZE: usize = 2;

/// Largest accepted board size.
pub const MAX_BOARD_SIZE: usize = 12;

/// Orthogonal neighbor offsets as (row, col) deltas.
/// Order: Up, Down, Left, Right
pub const DIRECTIONS: [(isize, isize); 4] = [(-1, 0), (1, 0), (0, -1), (0, 1)];

// =============================================================================
// Game Rules
// =============================================================================

/// Stability threshold. A cell holding more than this many tokens explodes.
pub const THRESHOLD: u32 = 3;

/// Minimum number of players in a game.
pub const MIN_PLAYERS: usize = 2;

/// Maximum number of players in a game (one per palette color).
pub const MAX_PLAYERS: usize = 5;

/// Tokens per player required on the board before a win can be declared.
pub const WIN_GRACE_TOKENS_PER_PLAYER: u32 = 2;

/// Upper bound on re-seeded cascade waves within one epoch.
pub const MAX_CASCADE_WAVES: usize = 256;

// =============================================================================
// Game Stage Classification
// =============================================================================

/// Board fill ratio (tokens / N*N*T) below which the game is in its opening.
pub const OPENING_FILL_RATIO: f64 = 0.2;

/// Board fill ratio at or above which the game is in its endgame.
pub const ENDGAME_FILL_RATIO: f64 = 0.6;

// =============================================================================
// Vulnerability
// =============================================================================

/// Owning this many cells or fewer makes the computer player vulnerable.
pub const VULNERABLE_MAX_CELLS: usize = 3;

/// Opponent-to-own token ratio at which the computer player is vulnerable.
pub const VULNERABLE_TOKEN_RATIO: f64 = 2.5;

/// Opponent token count that, paired with a small own count, signals danger.
pub const VULNERABLE_OPPONENT_TOKENS: u32 = 8;

/// Own token count at or below which a large opponent is dangerous.
pub const VULNERABLE_OWN_TOKENS: u32 = 4;

// =============================================================================
// Scoring Weights
// =============================================================================

/// Capture-risk weight of an adjacent opponent cell, indexed by its tokens.
/// Cells closer to exploding weigh more.
pub const RISK_WEIGHTS: [f64; 4] = [0.0, 1.0, 1.5, 3.0];

/// Risk at or below which a move counts as safe.
pub const SAFE_RISK: f64 = 0.0;

/// Base score of each move category, indexed by `Category::priority() - 1`.
pub const CATEGORY_BASE: [f64; 4] = [2.0, 4.0, 6.0, 10.0];

/// Score added to a ready cell whose cascade removes every opponent.
pub const WINNING_BONUS: f64 = 1000.0;

/// Score per opponent token captured by a simulated explosion.
pub const CAPTURE_TOKEN_VALUE: f64 = 2.0;

/// Score per opponent cell captured by a simulated explosion.
pub const CAPTURE_CELL_VALUE: f64 = 1.5;

/// Penalty multiplier applied to capture risk.
pub const RISK_PENALTY: f64 = 1.5;

/// Number of near-top candidates a medium player may pick from.
pub const NEAR_TOP_WINDOW: usize = 3;
