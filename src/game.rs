//! Turn controller: the game state machine.
//!
//! A [`Game`] owns its board, roster, and RNG. It is `Playing` from creation,
//! becomes `Finished` when a single color remains, and returns to `Waiting`
//! only through [`Game::reset`]; [`Game::start`] begins the next match.
//!
//! Moves are validated here and nowhere else. Computer players pick a target
//! with [`strategy::choose_move`] and then submit it through
//! [`Game::submit_move`] exactly like a human would.

use std::collections::HashSet;
use std::fmt;

use tracing::{debug, error, info, instrument, warn};

use crate::board::{Board, Color, Point};
use crate::cascade::{Cascade, CascadeObserver, CellChange, ExplosionStep, Unpaced};
use crate::constants::{
    DEFAULT_SIZE, MAX_BOARD_SIZE, MAX_CASCADE_WAVES, MAX_PLAYERS, MIN_BOARD_SIZE, MIN_PLAYERS,
    THRESHOLD,
};
use crate::difficulty::Difficulty;
use crate::error::{ConfigError, EngineError, InvariantViolation};
use crate::strategy;
use crate::win::{self, Victory};

/// Stable player identifier, `player-<seat>`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct PlayerId(String);

impl PlayerId {
    pub fn for_seat(seat: usize) -> Self {
        PlayerId(format!("player-{seat}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A seat requested at game creation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PlayerSpec {
    pub name: String,
    pub color: Color,
    /// `Some` for a computer-controlled seat.
    pub computer: Option<Difficulty>,
}

impl PlayerSpec {
    pub fn human(name: impl Into<String>, color: Color) -> Self {
        Self {
            name: name.into(),
            color,
            computer: None,
        }
    }

    pub fn computer(name: impl Into<String>, color: Color, difficulty: Difficulty) -> Self {
        Self {
            name: name.into(),
            color,
            computer: Some(difficulty),
        }
    }

    /// `n` unnamed human seats with palette colors in order.
    pub fn roster(n: usize) -> Vec<PlayerSpec> {
        Color::PALETTE
            .into_iter()
            .take(n)
            .map(|color| PlayerSpec::human("", color))
            .collect()
    }
}

/// A seated player.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    pub color: Color,
    pub difficulty: Option<Difficulty>,
}

impl Player {
    /// Seat `spec`; a blank name becomes `Player <seat + 1>`.
    pub fn from_spec(seat: usize, spec: PlayerSpec) -> Self {
        let name = match spec.name.trim() {
            "" => format!("Player {}", seat + 1),
            name => name.to_string(),
        };
        Self {
            id: PlayerId::for_seat(seat),
            name,
            color: spec.color,
            difficulty: spec.computer,
        }
    }

    pub fn is_computer(&self) -> bool {
        self.difficulty.is_some()
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Status {
    Waiting,
    Playing,
    Finished,
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Status::Waiting => "waiting",
            Status::Playing => "playing",
            Status::Finished => "finished",
        })
    }
}

/// Game setup options.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct GameConfig {
    pub board_size: usize,
    /// Seed for the computer players' RNG; random when `None`.
    pub seed: Option<u64>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            board_size: DEFAULT_SIZE,
            seed: None,
        }
    }
}

/// Why an action was refused. Nothing changed and no turn was used.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RejectReason {
    /// The game is not in `playing` status.
    NotPlaying,
    /// A propagation epoch is still running.
    EpochActive,
    /// The target is off the board.
    OutOfBounds,
    /// The target cell belongs to another player.
    ForeignCell(Color),
    /// Reset or start while a game is in progress.
    GameInProgress,
    /// Start requested on a game that is not waiting.
    NotWaiting,
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RejectReason::NotPlaying => write!(f, "game is not in progress"),
            RejectReason::EpochActive => write!(f, "an explosion is still resolving"),
            RejectReason::OutOfBounds => write!(f, "cell is off the board"),
            RejectReason::ForeignCell(owner) => write!(f, "cell belongs to {owner}"),
            RejectReason::GameInProgress => write!(f, "game is still in progress"),
            RejectReason::NotWaiting => write!(f, "game is not waiting to start"),
        }
    }
}

/// Result of a submitted move.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MoveOutcome {
    Rejected(RejectReason),
    /// Accepted without an explosion.
    Placed { row: usize, col: usize, tokens: u32 },
    /// Accepted; the explosion steps in the order they resolved.
    Exploded(Vec<ExplosionStep>),
    /// The move ended the game.
    Won {
        winner: PlayerId,
        color: Color,
        steps: Vec<ExplosionStep>,
    },
}

impl MoveOutcome {
    pub fn is_accepted(&self) -> bool {
        !matches!(self, MoveOutcome::Rejected(_))
    }

    /// Every cell change caused by explosions, in order.
    pub fn changes(&self) -> impl Iterator<Item = &CellChange> {
        let steps: &[ExplosionStep] = match self {
            MoveOutcome::Exploded(steps) | MoveOutcome::Won { steps, .. } => steps,
            _ => &[],
        };
        steps.iter().flat_map(|s| s.changes.iter())
    }
}

/// One move played on a player's behalf.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TurnRecord {
    pub player: PlayerId,
    pub point: Point,
    pub outcome: MoveOutcome,
}

/// A match in progress (or waiting, or finished).
#[derive(Clone, Debug)]
pub struct Game {
    status: Status,
    players: Vec<Player>,
    current: usize,
    board: Board,
    victory: Option<Victory>,
    epoch_active: bool,
    moves: usize,
    config: GameConfig,
    rng: fastrand::Rng,
    wave_limit: usize,
}

impl Game {
    /// Create a game on the default 6x6 board.
    pub fn new(specs: Vec<PlayerSpec>) -> Result<Self, ConfigError> {
        Self::with_config(specs, GameConfig::default())
    }

    /// Create a game. It starts in `playing` status with seat 0 to move.
    ///
    /// # Errors
    /// - [`ConfigError::PlayerCount`] unless there are 2 to 5 players
    /// - [`ConfigError::DuplicateColor`] if two players share a color
    /// - [`ConfigError::BoardSize`] if the board size is out of range
    pub fn with_config(specs: Vec<PlayerSpec>, config: GameConfig) -> Result<Self, ConfigError> {
        validate_roster(&specs)?;
        if !(MIN_BOARD_SIZE..=MAX_BOARD_SIZE).contains(&config.board_size) {
            return Err(ConfigError::BoardSize {
                got: config.board_size,
                min: MIN_BOARD_SIZE,
                max: MAX_BOARD_SIZE,
            });
        }
        let players = seat(specs);
        let rng = match config.seed {
            Some(seed) => fastrand::Rng::with_seed(seed),
            None => fastrand::Rng::new(),
        };
        info!(
            players = players.len(),
            size = config.board_size,
            "game created"
        );
        Ok(Self {
            status: Status::Playing,
            players,
            current: 0,
            board: Board::new(config.board_size),
            victory: None,
            epoch_active: false,
            moves: 0,
            config,
            rng,
            wave_limit: MAX_CASCADE_WAVES,
        })
    }

    /// Create a game from a prepared position, seat 0 to move.
    ///
    /// # Errors
    /// As [`Game::with_config`], plus [`ConfigError::UnstableCell`] if any
    /// cell of `board` holds more than the threshold and
    /// [`ConfigError::UnseatedColor`] if a color on the board has no player.
    pub fn with_board(specs: Vec<PlayerSpec>, board: Board, seed: Option<u64>) -> Result<Self, ConfigError> {
        if let Some((row, col)) = board.first_unstable() {
            return Err(ConfigError::UnstableCell { row, col });
        }
        let config = GameConfig {
            board_size: board.size(),
            seed,
        };
        let mut game = Self::with_config(specs, config)?;
        if let Some(&color) = board
            .colors_present()
            .iter()
            .find(|&&c| game.players.iter().all(|p| p.color != c))
        {
            return Err(ConfigError::UnseatedColor(color));
        }
        game.board = board;
        Ok(game)
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    /// An independent copy of the board for rendering.
    pub fn board_snapshot(&self) -> Board {
        self.board.clone()
    }

    pub fn current_player(&self) -> &Player {
        &self.players[self.current]
    }

    pub fn winner(&self) -> Option<&Victory> {
        self.victory.as_ref()
    }

    pub fn is_epoch_active(&self) -> bool {
        self.epoch_active
    }

    /// Accepted moves since the game started.
    pub fn move_count(&self) -> usize {
        self.moves
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Submit a move for the current player.
    pub fn submit_move(&mut self, row: usize, col: usize) -> Result<MoveOutcome, EngineError> {
        self.submit_move_with(row, col, &mut Unpaced)
    }

    /// Submit a move, calling `observer` after every explosion step.
    ///
    /// Illegal moves come back as [`MoveOutcome::Rejected`]. An `Err` means an
    /// engine invariant broke; the board is restored to its state before the
    /// move and the turn is not consumed.
    #[instrument(level = "debug", skip(self, observer))]
    pub fn submit_move_with<O: CascadeObserver>(
        &mut self,
        row: usize,
        col: usize,
        observer: &mut O,
    ) -> Result<MoveOutcome, EngineError> {
        if let Some(reason) = self.check_move(row, col) {
            warn!(row, col, %reason, "move rejected");
            return Ok(MoveOutcome::Rejected(reason));
        }
        let color = self.current_player().color;
        let snapshot = self.board.clone();
        let tokens = match self.board.place(row, col, color) {
            Ok(tokens) => tokens,
            Err(err) => {
                warn!(%err, "move rejected");
                return Ok(MoveOutcome::Rejected(RejectReason::OutOfBounds));
            }
        };
        self.moves += 1;

        if tokens <= THRESHOLD {
            if let Some(victory) = self.check_win() {
                return Ok(won(victory, Vec::new()));
            }
            self.advance();
            return Ok(MoveOutcome::Placed { row, col, tokens });
        }

        self.epoch_active = true;
        let result = self.run_epoch((row, col), color, observer);
        self.epoch_active = false;
        result.map_err(|violation| {
            error!(%violation, "aborting move, board restored");
            self.board = snapshot;
            self.moves -= 1;
            EngineError::Invariant(violation)
        })
    }

    fn check_move(&self, row: usize, col: usize) -> Option<RejectReason> {
        if self.status != Status::Playing {
            return Some(RejectReason::NotPlaying);
        }
        if self.epoch_active {
            return Some(RejectReason::EpochActive);
        }
        let Some(cell) = self.board.get(row, col) else {
            return Some(RejectReason::OutOfBounds);
        };
        match cell.owner() {
            Some(owner) if owner != self.current_player().color => {
                Some(RejectReason::ForeignCell(owner))
            }
            _ => None,
        }
    }

    /// Drain one propagation epoch, checking for a win after every step.
    fn run_epoch<O: CascadeObserver>(
        &mut self,
        origin: Point,
        color: Color,
        observer: &mut O,
    ) -> Result<MoveOutcome, InvariantViolation> {
        let mut cascade = Cascade::new(&self.board, origin, color)?.with_wave_limit(self.wave_limit);
        let mut steps = Vec::new();
        while let Some(step) = cascade.step(&mut self.board)? {
            observer.after_step(&self.board, &step);
            steps.push(step);
            if let Some(victory) = self.check_win() {
                debug!(
                    explosions = cascade.explosions(),
                    dropped = cascade.pending(),
                    "win mid-cascade, dropping the rest"
                );
                return Ok(won(victory, steps));
            }
        }
        if let Some(pt) = self.board.first_unstable() {
            return Err(InvariantViolation::UnstableBoard(pt));
        }
        let resolution = cascade.finish(&self.board, steps);
        for color in &resolution.eliminated {
            info!(%color, "color eliminated");
        }
        if let Some(victory) = self.check_win() {
            return Ok(won(victory, resolution.steps));
        }
        self.advance();
        Ok(MoveOutcome::Exploded(resolution.steps))
    }

    /// Consult the win evaluator; on a win, finish the game.
    fn check_win(&mut self) -> Option<Victory> {
        if self.status != Status::Playing {
            return None;
        }
        let victory = win::evaluate(&self.board, &self.players)?;
        info!(winner = %victory.winner, color = %victory.color, "game won");
        self.status = Status::Finished;
        self.victory = Some(victory.clone());
        Some(victory)
    }

    fn advance(&mut self) {
        self.current = (self.current + 1) % self.players.len();
        debug!(player = %self.current_player().id, "turn advanced");
    }

    /// The heuristic move for the current player, if it is computer-controlled.
    pub fn computer_move(&mut self) -> Option<Point> {
        if self.status != Status::Playing {
            return None;
        }
        let player = &self.players[self.current];
        let difficulty = player.difficulty?;
        let me = player.color;
        let roster: Vec<Color> = self.players.iter().map(|p| p.color).collect();
        strategy::choose_move(&self.board, &roster, me, difficulty, &mut self.rng)
    }

    /// Let computer players move until a human is up, the game ends, or
    /// `max_turns` moves have been played.
    pub fn play_computer_turns(&mut self, max_turns: usize) -> Result<Vec<TurnRecord>, EngineError> {
        let mut records = Vec::new();
        while records.len() < max_turns {
            let player = self.current_player().id.clone();
            let Some(point) = self.computer_move() else {
                break;
            };
            let outcome = self.submit_move(point.0, point.1)?;
            let accepted = outcome.is_accepted();
            records.push(TurnRecord {
                player,
                point,
                outcome,
            });
            if !accepted {
                warn!(row = point.0, col = point.1, "computer move rejected");
                break;
            }
        }
        Ok(records)
    }

    /// Submit a human move, then let any computer players that follow reply.
    pub fn submit_and_respond(&mut self, row: usize, col: usize) -> Result<Vec<TurnRecord>, EngineError> {
        let player = self.current_player().id.clone();
        let outcome = self.submit_move(row, col)?;
        let accepted = outcome.is_accepted();
        let mut records = vec![TurnRecord {
            player,
            point: (row, col),
            outcome,
        }];
        if accepted {
            let seats = self.players.len();
            records.extend(self.play_computer_turns(seats)?);
        }
        Ok(records)
    }

    /// Clear the board and winner and go back to `waiting`.
    ///
    /// Only allowed once the game is finished (or already waiting), and never
    /// while an epoch is resolving.
    pub fn reset(&mut self) -> Result<(), RejectReason> {
        if self.epoch_active {
            return Err(RejectReason::EpochActive);
        }
        if self.status == Status::Playing {
            return Err(RejectReason::GameInProgress);
        }
        self.board = Board::new(self.config.board_size);
        self.victory = None;
        self.current = 0;
        self.moves = 0;
        self.status = Status::Waiting;
        info!("game reset");
        Ok(())
    }

    /// Replace the roster while waiting.
    pub fn set_players(&mut self, specs: Vec<PlayerSpec>) -> Result<(), ConfigError> {
        if self.status != Status::Waiting {
            return Err(ConfigError::RosterLocked);
        }
        validate_roster(&specs)?;
        self.players = seat(specs);
        Ok(())
    }

    /// Begin the next match with the current roster.
    pub fn start(&mut self) -> Result<(), RejectReason> {
        if self.status != Status::Waiting {
            return Err(RejectReason::NotWaiting);
        }
        self.status = Status::Playing;
        info!(players = self.players.len(), "game started");
        Ok(())
    }
}

fn won(victory: Victory, steps: Vec<ExplosionStep>) -> MoveOutcome {
    MoveOutcome::Won {
        winner: victory.winner,
        color: victory.color,
        steps,
    }
}

fn seat(specs: Vec<PlayerSpec>) -> Vec<Player> {
    specs
        .into_iter()
        .enumerate()
        .map(|(i, spec)| Player::from_spec(i, spec))
        .collect()
}

/// Check player count and color uniqueness.
pub fn validate_roster(specs: &[PlayerSpec]) -> Result<(), ConfigError> {
    if !(MIN_PLAYERS..=MAX_PLAYERS).contains(&specs.len()) {
        return Err(ConfigError::PlayerCount {
            got: specs.len(),
            min: MIN_PLAYERS,
            max: MAX_PLAYERS,
        });
    }
    let mut seen = HashSet::new();
    for spec in specs {
        if !seen.insert(spec.color) {
            return Err(ConfigError::DuplicateColor(spec.color));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Cell;

    fn two_player() -> Game {
        Game::with_config(
            PlayerSpec::roster(2),
            GameConfig {
                board_size: 6,
                seed: Some(1),
            },
        )
        .unwrap()
    }

    #[test]
    fn test_create_defaults() {
        let game = two_player();
        assert_eq!(game.status(), Status::Playing);
        assert_eq!(game.players()[0].name, "Player 1");
        assert_eq!(game.players()[1].id.as_str(), "player-1");
        assert_eq!(game.current_player().color, Color::Blue);
        assert_eq!(game.board().total_tokens(), 0);
    }

    #[test]
    fn test_config_errors() {
        assert!(matches!(
            Game::new(PlayerSpec::roster(1)),
            Err(ConfigError::PlayerCount { got: 1, .. })
        ));
        let six = (0..6).map(|i| PlayerSpec::human(format!("p{i}"), Color::Blue)).collect();
        assert!(matches!(Game::new(six), Err(ConfigError::PlayerCount { got: 6, .. })));
        let dup = vec![
            PlayerSpec::human("a", Color::Red),
            PlayerSpec::human("b", Color::Red),
        ];
        assert_eq!(Game::new(dup).unwrap_err(), ConfigError::DuplicateColor(Color::Red));
        let bad_size = GameConfig {
            board_size: 1,
            seed: None,
        };
        assert!(matches!(
            Game::with_config(PlayerSpec::roster(2), bad_size),
            Err(ConfigError::BoardSize { got: 1, .. })
        ));
    }

    #[test]
    fn test_with_board_rejects_unstable_cell() {
        let mut board = Board::new(4);
        board.set(1, 2, Cell::occupied(Color::Red, THRESHOLD + 1)).unwrap();
        assert_eq!(
            Game::with_board(PlayerSpec::roster(2), board, None).unwrap_err(),
            ConfigError::UnstableCell { row: 1, col: 2 }
        );
        let mut board = Board::new(4);
        board.set(1, 2, Cell::occupied(Color::Red, THRESHOLD)).unwrap();
        let game = Game::with_board(PlayerSpec::roster(2), board, Some(2)).unwrap();
        assert_eq!(game.config().board_size, 4);
        assert_eq!(game.board().tokens_of(Color::Red), THRESHOLD);
    }

    #[test]
    fn test_with_board_rejects_unseated_color() {
        let mut board = Board::new(4);
        board.set(0, 0, Cell::occupied(Color::Blue, 1)).unwrap();
        board.set(3, 3, Cell::occupied(Color::Purple, 2)).unwrap();
        assert_eq!(
            Game::with_board(PlayerSpec::roster(2), board.clone(), None).unwrap_err(),
            ConfigError::UnseatedColor(Color::Purple)
        );
        let specs = vec![
            PlayerSpec::human("", Color::Blue),
            PlayerSpec::human("", Color::Purple),
        ];
        assert!(Game::with_board(specs, board, None).is_ok());
    }

    #[test]
    fn test_cascade_overrun_restores_board() {
        // (2,2) refills from its four neighbors and needs a second wave.
        let mut board = Board::new(6);
        board.set(2, 2, Cell::occupied(Color::Blue, 3)).unwrap();
        for (r, c) in [(1, 2), (3, 2), (2, 1), (2, 3)] {
            board.set(r, c, Cell::occupied(Color::Blue, 3)).unwrap();
        }
        board.set(5, 5, Cell::occupied(Color::Red, 1)).unwrap();
        let mut game = Game::with_board(PlayerSpec::roster(2), board, Some(1)).unwrap();
        game.wave_limit = 1;
        let before = game.board_snapshot();

        let err = game.submit_move(2, 2).unwrap_err();
        assert_eq!(err, EngineError::Invariant(InvariantViolation::CascadeOverrun(1)));
        assert_eq!(game.board(), &before);
        assert_eq!(game.move_count(), 0);
        assert_eq!(game.current_player().color, Color::Blue);
        assert_eq!(game.status(), Status::Playing);
        assert!(!game.is_epoch_active());

        game.wave_limit = MAX_CASCADE_WAVES;
        let outcome = game.submit_move(2, 2).unwrap();
        let MoveOutcome::Exploded(steps) = outcome else {
            panic!("expected an explosion, got {outcome:?}");
        };
        assert_eq!(steps.len(), 6);
        assert_eq!(game.board().first_unstable(), None);
        assert_eq!(game.current_player().color, Color::Red);
    }

    #[test]
    fn test_place_advances_turn() {
        let mut game = two_player();
        let outcome = game.submit_move(0, 0).unwrap();
        assert_eq!(outcome, MoveOutcome::Placed { row: 0, col: 0, tokens: 1 });
        assert_eq!(game.current_player().color, Color::Red);
        assert_eq!(game.move_count(), 1);
    }

    #[test]
    fn test_foreign_cell_rejected_without_consuming_turn() {
        let mut game = two_player();
        game.submit_move(0, 0).unwrap();
        let before = game.board_snapshot();
        let outcome = game.submit_move(0, 0).unwrap();
        assert_eq!(outcome, MoveOutcome::Rejected(RejectReason::ForeignCell(Color::Blue)));
        assert_eq!(game.current_player().color, Color::Red);
        assert_eq!(game.board(), &before);
        assert_eq!(game.move_count(), 1);
    }

    #[test]
    fn test_out_of_bounds_rejected() {
        let mut game = two_player();
        let outcome = game.submit_move(6, 0).unwrap();
        assert_eq!(outcome, MoveOutcome::Rejected(RejectReason::OutOfBounds));
        assert_eq!(game.current_player().color, Color::Blue);
    }

    #[test]
    fn test_epoch_active_rejects_moves_and_reset() {
        let mut game = two_player();
        game.epoch_active = true;
        assert_eq!(
            game.submit_move(0, 0).unwrap(),
            MoveOutcome::Rejected(RejectReason::EpochActive)
        );
        game.status = Status::Finished;
        assert_eq!(game.reset(), Err(RejectReason::EpochActive));
        game.epoch_active = false;
        assert_eq!(game.reset(), Ok(()));
        assert_eq!(game.status(), Status::Waiting);
    }

    #[test]
    fn test_reset_rejected_while_playing() {
        let mut game = two_player();
        assert_eq!(game.reset(), Err(RejectReason::GameInProgress));
    }

    #[test]
    fn test_explosion_then_turn_advance() {
        let mut game = two_player();
        game.board.set(2, 2, Cell::occupied(Color::Blue, 3)).unwrap();
        game.board.set(5, 5, Cell::occupied(Color::Red, 3)).unwrap();
        let outcome = game.submit_move(2, 2).unwrap();
        let MoveOutcome::Exploded(steps) = outcome else {
            panic!("expected an explosion, got {outcome:?}");
        };
        assert_eq!(steps.len(), 1);
        assert_eq!(game.current_player().color, Color::Red);
        assert!(!game.is_epoch_active());
    }

    #[test]
    fn test_win_finishes_game_and_blocks_moves() {
        let mut game = two_player();
        game.board.set(2, 2, Cell::occupied(Color::Blue, 3)).unwrap();
        game.board.set(2, 3, Cell::occupied(Color::Red, 1)).unwrap();
        let outcome = game.submit_move(2, 2).unwrap();
        assert!(matches!(outcome, MoveOutcome::Won { color: Color::Blue, .. }));
        assert_eq!(game.status(), Status::Finished);
        assert_eq!(game.winner().map(|v| v.color), Some(Color::Blue));
        assert_eq!(
            game.submit_move(0, 0).unwrap(),
            MoveOutcome::Rejected(RejectReason::NotPlaying)
        );
    }

    #[test]
    fn test_reset_and_restart() {
        let mut game = two_player();
        game.status = Status::Finished;
        game.board.set(0, 0, Cell::occupied(Color::Blue, 2)).unwrap();
        game.reset().unwrap();
        assert_eq!(game.board().total_tokens(), 0);
        assert!(game.winner().is_none());
        assert_eq!(
            game.submit_move(0, 0).unwrap(),
            MoveOutcome::Rejected(RejectReason::NotPlaying)
        );
        game.set_players(PlayerSpec::roster(3)).unwrap();
        game.start().unwrap();
        assert_eq!(game.players().len(), 3);
        assert_eq!(game.start(), Err(RejectReason::NotWaiting));
        assert_eq!(game.set_players(PlayerSpec::roster(2)), Err(ConfigError::RosterLocked));
    }

    #[test]
    fn test_computer_move_only_for_computer_seat() {
        let mut game = Game::with_config(
            vec![
                PlayerSpec::human("ann", Color::Blue),
                PlayerSpec::computer("bot", Color::Red, Difficulty::Hard),
            ],
            GameConfig {
                board_size: 6,
                seed: Some(9),
            },
        )
        .unwrap();
        assert_eq!(game.computer_move(), None);
        let records = game.submit_and_respond(0, 0).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].player.as_str(), "player-1");
        assert!(records[1].outcome.is_accepted());
        assert_eq!(game.current_player().color, Color::Blue);
    }

    #[test]
    fn test_rejected_human_move_gets_no_reply() {
        let mut game = Game::new(vec![
            PlayerSpec::human("ann", Color::Blue),
            PlayerSpec::computer("bot", Color::Red, Difficulty::Easy),
        ])
        .unwrap();
        let records = game.submit_and_respond(9, 9).unwrap();
        assert_eq!(records.len(), 1);
        assert!(!records[0].outcome.is_accepted());
    }

    #[test]
    fn test_outcome_changes_flatten_steps() {
        let mut game = two_player();
        game.board.set(2, 2, Cell::occupied(Color::Blue, 3)).unwrap();
        game.board.set(5, 5, Cell::occupied(Color::Red, 3)).unwrap();
        let outcome = game.submit_move(2, 2).unwrap();
        let changes: Vec<_> = outcome.changes().collect();
        assert_eq!(changes.len(), 5);
        assert_eq!((changes[0].row, changes[0].col, changes[0].tokens), (2, 2, 0));
        assert!(changes[1..].iter().all(|c| c.owner == Some(Color::Blue) && c.tokens == 1));
    }
}
