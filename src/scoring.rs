//! Move scoring for the computer player.
//!
//! Each factor is a pure function of the board and a target cell. The
//! category scorers combine them with stage-dependent weights:
//! - Opening: centrality and spreading out
//! - Midgame: building connected structure
//! - Endgame: aggression toward opponent cells

use crate::analysis::{BoardAnalysis, Stage, capture_risk, defensive_value, own_distance};
use crate::board::{Board, Cell, Color, Point};
use crate::cascade::simulate_move;
use crate::constants::{
    CAPTURE_CELL_VALUE, CAPTURE_TOKEN_VALUE, CATEGORY_BASE, RISK_PENALTY, THRESHOLD,
    WINNING_BONUS,
};

/// Move categories, from lowest to highest priority.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Category {
    /// Placing on an empty cell.
    Empty,
    /// Adding to an own one-token cell.
    Single,
    /// Adding to an own two-token cell.
    Double,
    /// Adding to an own cell at the threshold, which explodes.
    Ready,
}

impl Category {
    pub const ALL: [Category; 4] = [
        Category::Empty,
        Category::Single,
        Category::Double,
        Category::Ready,
    ];

    /// Category of a move on `cell` by `me`; `None` if the move is illegal.
    pub fn of(cell: Cell, me: Color) -> Option<Category> {
        match cell.owner() {
            None => Some(Category::Empty),
            Some(owner) if owner != me => None,
            Some(_) => match cell.tokens() {
                1 => Some(Category::Single),
                2 => Some(Category::Double),
                t if t >= THRESHOLD => Some(Category::Ready),
                _ => None,
            },
        }
    }

    /// Selection priority, 1 (empty) to 4 (ready).
    pub fn priority(self) -> u8 {
        self as u8 + 1
    }

    pub(crate) fn index(self) -> usize {
        self as usize
    }
}

/// Factor weights for a game stage.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct StageWeights {
    pub centrality: f64,
    pub spread: f64,
    pub structure: f64,
    pub aggression: f64,
}

impl StageWeights {
    pub fn for_stage(stage: Stage) -> Self {
        match stage {
            Stage::Opening => Self {
                centrality: 2.0,
                spread: 1.5,
                structure: 0.5,
                aggression: 0.5,
            },
            Stage::Midgame => Self {
                centrality: 0.8,
                spread: 0.5,
                structure: 1.5,
                aggression: 1.0,
            },
            Stage::Endgame => Self {
                centrality: 0.3,
                spread: 0.2,
                structure: 0.8,
                aggression: 2.0,
            },
        }
    }
}

/// Inputs shared by all scorers for one decision.
pub struct ScoreContext<'a> {
    pub board: &'a Board,
    pub analysis: &'a BoardAnalysis,
    pub me: Color,
    pub weights: StageWeights,
}

impl<'a> ScoreContext<'a> {
    pub fn new(board: &'a Board, analysis: &'a BoardAnalysis, me: Color) -> Self {
        Self {
            board,
            analysis,
            me,
            weights: StageWeights::for_stage(analysis.stage),
        }
    }
}

/// A scored move.
#[derive(Clone, Debug, PartialEq)]
pub struct Scored {
    pub category: Category,
    pub score: f64,
    pub risk: f64,
    /// Whether the move's cascade leaves no opponent on the board.
    pub wins: bool,
}

// =============================================================================
// Factors
// =============================================================================

/// 1.0 at the center, falling to 0.0 at the corners.
pub fn centrality(board: &Board, pt: Point) -> f64 {
    let center = (board.size() as f64 - 1.0) / 2.0;
    let max = 2.0 * center;
    if max <= 0.0 {
        return 1.0;
    }
    let dist = (pt.0 as f64 - center).abs() + (pt.1 as f64 - center).abs();
    1.0 - dist / max
}

/// Opponent tokens adjacent to `pt`, i.e. what an explosion there would take.
pub fn capture_value(board: &Board, pt: Point, me: Color) -> f64 {
    board
        .neighbors(pt.0, pt.1)
        .filter_map(|(r, c)| board.get(r, c))
        .filter(|cell| cell.owner().is_some_and(|o| o != me))
        .map(|cell| cell.tokens() as f64)
        .sum()
}

/// Neighbors at the threshold, which an explosion at `pt` would set off.
pub fn chain_potential(board: &Board, pt: Point) -> f64 {
    board
        .neighbors(pt.0, pt.1)
        .filter_map(|(r, c)| board.get(r, c))
        .filter(|cell| cell.tokens() >= THRESHOLD)
        .count() as f64
}

/// Reward for joining or growing own clusters.
pub fn cluster_bonus(ctx: &ScoreContext<'_>, pt: Point) -> f64 {
    let stats = ctx.analysis.stats.get(&ctx.me);
    let mut adjacent = 0usize;
    let mut largest = 0usize;
    for (r, c) in ctx.board.neighbors(pt.0, pt.1) {
        if ctx.board.get(r, c).and_then(|cell| cell.owner()) == Some(ctx.me) {
            adjacent += 1;
            let size = stats.map_or(0, |s| s.cluster_size_at((r, c)));
            largest = largest.max(size);
        }
    }
    adjacent as f64 + 0.25 * largest.min(8) as f64
}

/// 1.0 when `pt` is at least three steps from every own cell.
pub fn spread(board: &Board, pt: Point, me: Color) -> f64 {
    match own_distance(board, pt, me) {
        None => 1.0,
        Some(d) => d.min(3) as f64 / 3.0,
    }
}

// =============================================================================
// Category scorers
// =============================================================================

fn base(category: Category) -> f64 {
    CATEGORY_BASE[category.index()]
}

/// Exploding an own threshold cell: value of the simulated cascade.
pub fn score_ready(ctx: &ScoreContext<'_>, pt: Point) -> Scored {
    let me = ctx.me;
    let (opp_tokens_before, opp_cells_before) = opponent_holdings(ctx.board, me);
    let mut score = base(Category::Ready);
    let mut wins = false;
    if let Some((after, _)) = simulate_move(ctx.board, pt, me) {
        let (opp_tokens_after, opp_cells_after) = opponent_holdings(&after, me);
        let tokens = opp_tokens_before.saturating_sub(opp_tokens_after) as f64;
        let cells = opp_cells_before.saturating_sub(opp_cells_after) as f64;
        score += ctx.weights.aggression * (CAPTURE_TOKEN_VALUE * tokens + CAPTURE_CELL_VALUE * cells);
        wins = opp_cells_before > 0 && opp_cells_after == 0;
        if wins {
            score += WINNING_BONUS;
        }
    }
    score += 0.5 * chain_potential(ctx.board, pt);
    Scored {
        category: Category::Ready,
        score,
        risk: if wins { 0.0 } else { capture_risk(ctx.board, pt, me) },
        wins,
    }
}

/// Raising an own cell to the threshold.
pub fn score_double(ctx: &ScoreContext<'_>, pt: Point) -> Scored {
    let w = ctx.weights;
    let risk = capture_risk(ctx.board, pt, ctx.me);
    let score = base(Category::Double)
        + w.structure * cluster_bonus(ctx, pt)
        + w.aggression * 0.5 * capture_value(ctx.board, pt, ctx.me)
        + 0.5 * chain_potential(ctx.board, pt)
        - RISK_PENALTY * 1.5 * risk;
    Scored {
        category: Category::Double,
        score,
        risk,
        wins: false,
    }
}

/// Growing an own single-token cell.
pub fn score_single(ctx: &ScoreContext<'_>, pt: Point) -> Scored {
    let w = ctx.weights;
    let risk = capture_risk(ctx.board, pt, ctx.me);
    let score = base(Category::Single)
        + w.structure * cluster_bonus(ctx, pt)
        + 0.5 * w.centrality * centrality(ctx.board, pt)
        - RISK_PENALTY * risk;
    Scored {
        category: Category::Single,
        score,
        risk,
        wins: false,
    }
}

/// Claiming an empty cell.
pub fn score_empty(ctx: &ScoreContext<'_>, pt: Point) -> Scored {
    let w = ctx.weights;
    let risk = capture_risk(ctx.board, pt, ctx.me);
    let score = base(Category::Empty)
        + w.centrality * centrality(ctx.board, pt)
        + w.spread * spread(ctx.board, pt, ctx.me)
        + 0.5 * w.structure * defensive_value(ctx.board, pt, ctx.me)
        - RISK_PENALTY * risk;
    Scored {
        category: Category::Empty,
        score,
        risk,
        wins: false,
    }
}

/// Score a move by `ctx.me` at `pt`; `None` if it is not a legal move.
pub fn score_move(ctx: &ScoreContext<'_>, pt: Point) -> Option<Scored> {
    let cell = ctx.board.get(pt.0, pt.1)?;
    let scored = match Category::of(cell, ctx.me)? {
        Category::Ready => score_ready(ctx, pt),
        Category::Double => score_double(ctx, pt),
        Category::Single => score_single(ctx, pt),
        Category::Empty => score_empty(ctx, pt),
    };
    Some(scored)
}

/// Total tokens and cells held by colors other than `me`.
fn opponent_holdings(board: &Board, me: Color) -> (u32, usize) {
    board
        .points()
        .filter_map(|(r, c)| board.get(r, c))
        .filter(|cell| cell.owner().is_some_and(|o| o != me))
        .fold((0, 0), |(t, n), cell| (t + cell.tokens(), n + 1))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn board_with(cells: &[(Point, Color, u32)]) -> Board {
        let mut board = Board::new(6);
        for &((r, c), color, tokens) in cells {
            board.set(r, c, Cell::occupied(color, tokens)).unwrap();
        }
        board
    }

    const ROSTER: [Color; 2] = [Color::Blue, Color::Red];

    #[test]
    fn test_category_of() {
        let me = Color::Blue;
        assert_eq!(Category::of(Cell::EMPTY, me), Some(Category::Empty));
        assert_eq!(Category::of(Cell::occupied(me, 1), me), Some(Category::Single));
        assert_eq!(Category::of(Cell::occupied(me, 2), me), Some(Category::Double));
        assert_eq!(Category::of(Cell::occupied(me, 3), me), Some(Category::Ready));
        assert_eq!(Category::of(Cell::occupied(Color::Red, 1), me), None);
        assert_eq!(Category::Ready.priority(), 4);
        assert_eq!(Category::Empty.priority(), 1);
    }

    #[test]
    fn test_centrality() {
        let board = Board::new(6);
        assert_eq!(centrality(&board, (0, 0)), 0.0);
        assert_eq!(centrality(&board, (5, 5)), 0.0);
        assert!(centrality(&board, (2, 2)) > centrality(&board, (1, 2)));
        assert_eq!(centrality(&board, (2, 3)), centrality(&board, (3, 2)));
    }

    #[test]
    fn test_capture_and_chain_factors() {
        let board = board_with(&[
            ((1, 2), Color::Red, 3),
            ((2, 1), Color::Red, 2),
            ((2, 3), Color::Blue, 3),
        ]);
        assert_eq!(capture_value(&board, (2, 2), Color::Blue), 5.0);
        assert_eq!(chain_potential(&board, (2, 2)), 2.0);
    }

    #[test]
    fn test_cluster_bonus_and_spread() {
        let board = board_with(&[((2, 1), Color::Blue, 1), ((2, 0), Color::Blue, 1)]);
        let analysis = BoardAnalysis::new(&board, &ROSTER);
        let ctx = ScoreContext::new(&board, &analysis, Color::Blue);
        assert_eq!(cluster_bonus(&ctx, (2, 2)), 1.5);
        assert_eq!(cluster_bonus(&ctx, (5, 5)), 0.0);
        assert_eq!(spread(&board, (2, 2), Color::Blue), 1.0 / 3.0);
        assert_eq!(spread(&board, (5, 5), Color::Blue), 1.0);
    }

    #[test]
    fn test_ready_capture_outscores_quiet_explosion() {
        let board = board_with(&[
            ((1, 1), Color::Blue, 3),
            ((1, 2), Color::Red, 2),
            ((4, 4), Color::Blue, 3),
            ((5, 0), Color::Red, 1),
        ]);
        let analysis = BoardAnalysis::new(&board, &ROSTER);
        let ctx = ScoreContext::new(&board, &analysis, Color::Blue);
        let capture = score_ready(&ctx, (1, 1));
        let quiet = score_ready(&ctx, (4, 4));
        assert!(capture.score > quiet.score);
        assert!(!capture.wins);
    }

    #[test]
    fn test_ready_winning_move_flagged() {
        let board = board_with(&[((1, 1), Color::Blue, 3), ((1, 2), Color::Red, 2), ((4, 4), Color::Blue, 1)]);
        let analysis = BoardAnalysis::new(&board, &ROSTER);
        let ctx = ScoreContext::new(&board, &analysis, Color::Blue);
        let scored = score_ready(&ctx, (1, 1));
        assert!(scored.wins);
        assert_eq!(scored.risk, 0.0);
        assert!(scored.score > WINNING_BONUS);
    }

    #[test]
    fn test_risk_penalizes_empty_cell() {
        let board = board_with(&[((2, 3), Color::Red, 3), ((3, 3), Color::Blue, 1)]);
        let analysis = BoardAnalysis::new(&board, &ROSTER);
        let ctx = ScoreContext::new(&board, &analysis, Color::Blue);
        let exposed = score_empty(&ctx, (2, 2));
        let sheltered = score_empty(&ctx, (3, 2));
        assert!(exposed.risk > 0.0);
        assert!(sheltered.score > exposed.score);
    }

    #[test]
    fn test_score_move_rejects_foreign_cell() {
        let board = board_with(&[((0, 0), Color::Red, 1)]);
        let analysis = BoardAnalysis::new(&board, &ROSTER);
        let ctx = ScoreContext::new(&board, &analysis, Color::Blue);
        assert!(score_move(&ctx, (0, 0)).is_none());
        assert!(score_move(&ctx, (9, 9)).is_none());
        assert_eq!(score_move(&ctx, (0, 1)).map(|s| s.category), Some(Category::Empty));
    }
}
