//! Move selection for computer-controlled players.
//!
//! One decision runs this pipeline:
//! 1. Analyze the board (per-color stats, clusters, game stage)
//! 2. In the endgame, or whenever vulnerable, look for an explosion that
//!    wipes out every opponent
//! 3. When vulnerable, maybe switch to the survival branch
//! 4. Score every legal move and apply the difficulty multipliers
//! 5. Rank and pick, with difficulty-dependent slack
//!
//! The result is a plain (row, col) target. It goes through the same
//! validation as a human move.

use tracing::{debug, instrument};

use crate::analysis::{BoardAnalysis, Stage, capture_risk, defensive_value, opponent_distance};
use crate::board::{Board, Color, Point};
use crate::cascade::simulate_move;
use crate::constants::{NEAR_TOP_WINDOW, SAFE_RISK, THRESHOLD};
use crate::difficulty::Difficulty;
use crate::scoring::{Category, ScoreContext, score_move};

/// A legal move with its final (difficulty-scaled) score.
#[derive(Clone, Debug, PartialEq)]
pub struct Candidate {
    pub point: Point,
    pub category: Category,
    pub score: f64,
    pub risk: f64,
}

impl Candidate {
    pub fn is_safe(&self) -> bool {
        self.risk <= SAFE_RISK
    }
}

/// Pick a move for `me`, or `None` if it has no legal move.
#[instrument(level = "debug", skip(board, roster, rng))]
pub fn choose_move(
    board: &Board,
    roster: &[Color],
    me: Color,
    difficulty: Difficulty,
    rng: &mut fastrand::Rng,
) -> Option<Point> {
    let legal = legal_moves(board, me);
    if legal.is_empty() {
        return None;
    }
    let analysis = BoardAnalysis::new(board, roster);

    // A vulnerable player always looks, so survival never hides a win.
    let vulnerable = analysis.is_vulnerable(me);
    let look_for_win = vulnerable
        || (analysis.stage == Stage::Endgame
            && rng.f64() < difficulty.winning_check_probability());
    if look_for_win {
        if let Some(pt) = find_winning_move(board, me) {
            debug!(row = pt.0, col = pt.1, "winning move");
            return Some(pt);
        }
    }

    if vulnerable && rng.f64() < difficulty.survival_probability() {
        if let Some(pt) = survival_move(board, me) {
            debug!(row = pt.0, col = pt.1, "survival move");
            return Some(pt);
        }
    }

    let mut candidates = candidates(board, &analysis, me, difficulty);
    rank(&mut candidates, vulnerable);
    select(&candidates, difficulty, rng).or_else(|| {
        debug!("no candidate qualified, playing at random");
        rng.choice(legal)
    })
}

/// Every cell `me` may play: empty cells and own cells.
pub fn legal_moves(board: &Board, me: Color) -> Vec<Point> {
    board
        .points()
        .filter(|&(r, c)| {
            board
                .get(r, c)
                .is_some_and(|cell| cell.owner().is_none_or(|o| o == me))
        })
        .collect()
}

/// An own threshold cell whose cascade leaves no opponent on the board.
pub fn find_winning_move(board: &Board, me: Color) -> Option<Point> {
    let opponents_present = board.colors_present().iter().any(|&c| c != me);
    if !opponents_present {
        return None;
    }
    board
        .cells_of(me)
        .into_iter()
        .filter(|&(r, c)| board.get(r, c).is_some_and(|cell| cell.tokens() == THRESHOLD))
        .find(|&pt| {
            simulate_move(board, pt, me)
                .is_some_and(|(after, _)| after.colors_present().iter().all(|&c| c == me))
        })
}

/// Conservative move for a weak position.
///
/// Tries, in order: the safest empty cell with the best defensive value; the
/// fullest safe own cell holding at least two tokens; the empty cell farthest
/// from any opponent.
pub fn survival_move(board: &Board, me: Color) -> Option<Point> {
    let empties: Vec<Point> = board
        .points()
        .filter(|&(r, c)| board.get(r, c).is_some_and(|cell| cell.is_empty()))
        .collect();

    let safe_empty = empties
        .iter()
        .copied()
        .filter(|&pt| capture_risk(board, pt, me) <= SAFE_RISK)
        .map(|pt| (pt, defensive_value(board, pt, me)))
        .fold(None, |best: Option<(Point, f64)>, (pt, value)| match best {
            Some((_, v)) if v >= value => best,
            _ => Some((pt, value)),
        });
    if let Some((pt, _)) = safe_empty {
        return Some(pt);
    }

    let build = board
        .cells_of(me)
        .into_iter()
        .filter(|&pt| capture_risk(board, pt, me) <= SAFE_RISK)
        .filter_map(|pt| {
            let tokens = board.get(pt.0, pt.1)?.tokens();
            (tokens >= 2).then_some((pt, tokens))
        })
        .fold(None, |best: Option<(Point, u32)>, (pt, tokens)| match best {
            Some((_, t)) if t >= tokens => best,
            _ => Some((pt, tokens)),
        });
    if let Some((pt, _)) = build {
        return Some(pt);
    }

    empties
        .into_iter()
        .map(|pt| (pt, opponent_distance(board, pt, me)))
        .fold(None, |best: Option<(Point, usize)>, (pt, d)| match best {
            Some((_, bd)) if bd >= d => best,
            _ => Some((pt, d)),
        })
        .map(|(pt, _)| pt)
}

/// Score every legal move and scale by the difficulty profile.
pub fn candidates(
    board: &Board,
    analysis: &BoardAnalysis,
    me: Color,
    difficulty: Difficulty,
) -> Vec<Candidate> {
    let ctx = ScoreContext::new(board, analysis, me);
    legal_moves(board, me)
        .into_iter()
        .filter_map(|pt| {
            let scored = score_move(&ctx, pt)?;
            Some(Candidate {
                point: pt,
                category: scored.category,
                score: scored.score * difficulty.multiplier(scored.category),
                risk: scored.risk,
            })
        })
        .collect()
}

/// Order candidates best first.
///
/// Normally by category priority, then score. A vulnerable player puts every
/// safe move ahead of every risky one, then orders by score.
pub fn rank(candidates: &mut [Candidate], vulnerable: bool) {
    if vulnerable {
        candidates.sort_by(|a, b| {
            b.is_safe()
                .cmp(&a.is_safe())
                .then_with(|| b.score.total_cmp(&a.score))
        });
    } else {
        candidates.sort_by(|a, b| {
            b.category
                .priority()
                .cmp(&a.category.priority())
                .then_with(|| b.score.total_cmp(&a.score))
        });
    }
}

/// Pick from ranked candidates according to the difficulty profile.
///
/// Hard always takes the top. Medium otherwise takes one of the next few;
/// easy otherwise takes one from the bottom half.
pub fn select(ranked: &[Candidate], difficulty: Difficulty, rng: &mut fastrand::Rng) -> Option<Point> {
    let top = ranked.first()?;
    if ranked.len() == 1 || rng.f64() < difficulty.top_pick_probability() {
        return Some(top.point);
    }
    let pick = match difficulty {
        Difficulty::Hard => 0,
        Difficulty::Medium => rng.usize(1..ranked.len().min(1 + NEAR_TOP_WINDOW)),
        Difficulty::Easy => rng.usize(ranked.len() / 2..ranked.len()),
    };
    Some(ranked[pick].point)
}
