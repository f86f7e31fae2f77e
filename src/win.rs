//! Win detection.
//!
//! A player wins when theirs is the only color left on the board. Nothing is
//! declared until the board holds at least two tokens per player, so the
//! first few placements (when one color may briefly be alone) do not end the
//! game.

use crate::board::{Board, Color};
use crate::constants::WIN_GRACE_TOKENS_PER_PLAYER;
use crate::game::{Player, PlayerId};

/// A declared winner.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Victory {
    pub winner: PlayerId,
    pub color: Color,
}

/// Check whether exactly one registered color remains.
///
/// Returns `None` during the grace period, when several colors are present,
/// or when the only color present belongs to no registered player.
pub fn evaluate(board: &Board, players: &[Player]) -> Option<Victory> {
    let grace = WIN_GRACE_TOKENS_PER_PLAYER * players.len() as u32;
    if board.total_tokens() < grace {
        return None;
    }
    let present = board.colors_present();
    if present.len() != 1 {
        return None;
    }
    let color = present.into_iter().next()?;
    players.iter().find(|p| p.color == color).map(|p| Victory {
        winner: p.id.clone(),
        color,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Cell;
    use crate::game::PlayerSpec;

    fn players(n: usize) -> Vec<Player> {
        PlayerSpec::roster(n)
            .into_iter()
            .enumerate()
            .map(|(i, spec)| Player::from_spec(i, spec))
            .collect()
    }

    #[test]
    fn test_grace_period_blocks_early_win() {
        let mut board = Board::new(6);
        board.set(0, 0, Cell::occupied(Color::Blue, 3)).unwrap();
        assert_eq!(evaluate(&board, &players(2)), None);
        board.set(0, 1, Cell::occupied(Color::Blue, 1)).unwrap();
        let victory = evaluate(&board, &players(2)).unwrap();
        assert_eq!(victory.color, Color::Blue);
        assert_eq!(victory.winner.as_str(), "player-0");
    }

    #[test]
    fn test_two_colors_no_win() {
        let mut board = Board::new(6);
        board.set(0, 0, Cell::occupied(Color::Blue, 3)).unwrap();
        board.set(5, 5, Cell::occupied(Color::Red, 3)).unwrap();
        assert_eq!(evaluate(&board, &players(2)), None);
    }

    #[test]
    fn test_sole_color_in_three_player_game() {
        let mut board = Board::new(6);
        for c in 0..6 {
            board.set(0, c, Cell::occupied(Color::Green, 1)).unwrap();
        }
        let victory = evaluate(&board, &players(3)).unwrap();
        assert_eq!(victory.color, Color::Green);
        assert_eq!(victory.winner.as_str(), "player-2");
    }

    #[test]
    fn test_unregistered_color_never_wins() {
        let mut board = Board::new(6);
        board.set(0, 0, Cell::occupied(Color::Purple, 3)).unwrap();
        board.set(0, 1, Cell::occupied(Color::Purple, 3)).unwrap();
        assert_eq!(evaluate(&board, &players(2)), None);
    }

    #[test]
    fn test_empty_board_no_win() {
        assert_eq!(evaluate(&Board::new(6), &players(2)), None);
    }
}
