//! Board analysis for the computer player.
//!
//! Per-color token totals, owned cells and clusters, the stage of the game,
//! and the local danger measures the move scorers build on.

use std::collections::BTreeMap;

use crate::board::{Board, Color, Point};
use crate::constants::{
    ENDGAME_FILL_RATIO, OPENING_FILL_RATIO, RISK_WEIGHTS, THRESHOLD, VULNERABLE_MAX_CELLS,
    VULNERABLE_OPPONENT_TOKENS, VULNERABLE_OWN_TOKENS, VULNERABLE_TOKEN_RATIO,
};

/// Game stage, by how full the board is.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Stage {
    Opening,
    Midgame,
    Endgame,
}

impl Stage {
    /// Classify by total tokens relative to the board's capacity (N*N*T).
    pub fn classify(total_tokens: u32, size: usize) -> Stage {
        let capacity = (size * size) as f64 * THRESHOLD as f64;
        let fill = if capacity > 0.0 {
            total_tokens as f64 / capacity
        } else {
            0.0
        };
        if fill < OPENING_FILL_RATIO {
            Stage::Opening
        } else if fill < ENDGAME_FILL_RATIO {
            Stage::Midgame
        } else {
            Stage::Endgame
        }
    }
}

/// What one color holds.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ColorStats {
    pub tokens: u32,
    pub cells: Vec<Point>,
    /// 4-connected groups of owned cells.
    pub clusters: Vec<Vec<Point>>,
}

impl ColorStats {
    fn collect(board: &Board, color: Color) -> Self {
        Self {
            tokens: board.tokens_of(color),
            cells: board.cells_of(color),
            clusters: clusters(board, color),
        }
    }

    /// Size of the cluster containing `pt`, or 0.
    pub fn cluster_size_at(&self, pt: Point) -> usize {
        self.clusters
            .iter()
            .find(|cluster| cluster.contains(&pt))
            .map_or(0, Vec::len)
    }
}

/// Snapshot analysis of a board for a given roster.
#[derive(Clone, Debug)]
pub struct BoardAnalysis {
    pub stats: BTreeMap<Color, ColorStats>,
    pub total_tokens: u32,
    pub stage: Stage,
}

impl BoardAnalysis {
    /// Analyze `board`; every roster color gets an entry, present or not.
    pub fn new(board: &Board, roster: &[Color]) -> Self {
        let stats = roster
            .iter()
            .map(|&color| (color, ColorStats::collect(board, color)))
            .collect();
        let total_tokens = board.total_tokens();
        Self {
            stats,
            total_tokens,
            stage: Stage::classify(total_tokens, board.size()),
        }
    }

    /// Stats for `color`; empty if it is not on the roster.
    pub fn stats(&self, color: Color) -> ColorStats {
        self.stats.get(&color).cloned().unwrap_or_default()
    }

    /// Token total of the strongest opponent of `me`.
    pub fn opponent_tokens(&self, me: Color) -> u32 {
        self.stats
            .iter()
            .filter(|&(&c, _)| c != me)
            .map(|(_, s)| s.tokens)
            .max()
            .unwrap_or(0)
    }

    /// Whether `me` is in a weak position.
    pub fn is_vulnerable(&self, me: Color) -> bool {
        let own = self.stats(me);
        is_vulnerable(own.cells.len(), own.tokens, self.opponent_tokens(me))
    }
}

/// Vulnerable when holding few cells, or when heavily outnumbered in tokens.
pub fn is_vulnerable(own_cells: usize, own_tokens: u32, opponent_tokens: u32) -> bool {
    own_cells <= VULNERABLE_MAX_CELLS
        || opponent_tokens as f64 >= VULNERABLE_TOKEN_RATIO * own_tokens as f64
        || (opponent_tokens >= VULNERABLE_OPPONENT_TOKENS && own_tokens <= VULNERABLE_OWN_TOKENS)
}

/// Same-color clusters of `color`, in row-major order of their first cell.
pub fn clusters(board: &Board, color: Color) -> Vec<Vec<Point>> {
    let mut seen = vec![false; board.size() * board.size()];
    let mut groups = Vec::new();
    for pt in board.cells_of(color) {
        if seen[pt.0 * board.size() + pt.1] {
            continue;
        }
        let group = board.collect_group(pt);
        for &(r, c) in &group {
            seen[r * board.size() + c] = true;
        }
        groups.push(group);
    }
    groups
}

/// Weighted count of opponent cells next to `pt`.
///
/// Opponent cells closer to exploding weigh more.
pub fn capture_risk(board: &Board, pt: Point, me: Color) -> f64 {
    board
        .neighbors(pt.0, pt.1)
        .filter_map(|(r, c)| board.get(r, c))
        .filter(|cell| cell.owner().is_some_and(|o| o != me))
        .map(|cell| RISK_WEIGHTS[(cell.tokens() as usize).min(RISK_WEIGHTS.len() - 1)])
        .sum()
}

/// Manhattan distance from `pt` to the nearest opponent cell.
///
/// Returns `2 * size` when no opponent is on the board.
pub fn opponent_distance(board: &Board, pt: Point, me: Color) -> usize {
    board
        .points()
        .filter(|&(r, c)| board.get(r, c).and_then(|cell| cell.owner()).is_some_and(|o| o != me))
        .map(|q| pt.0.abs_diff(q.0) + pt.1.abs_diff(q.1))
        .min()
        .unwrap_or(2 * board.size())
}

/// Manhattan distance from `pt` to the nearest cell of `me`, if any.
pub fn own_distance(board: &Board, pt: Point, me: Color) -> Option<usize> {
    board
        .cells_of(me)
        .into_iter()
        .map(|q| pt.0.abs_diff(q.0) + pt.1.abs_diff(q.1))
        .min()
}

/// How much `pt` shores up `me`: own neighbors, plus opponent cells two steps
/// away whose expansion lane it blocks.
pub fn defensive_value(board: &Board, pt: Point, me: Color) -> f64 {
    let own_adjacent = board
        .neighbors(pt.0, pt.1)
        .filter(|&(r, c)| board.get(r, c).and_then(|cell| cell.owner()) == Some(me))
        .count();
    let blocked = board
        .points()
        .filter(|q| pt.0.abs_diff(q.0) + pt.1.abs_diff(q.1) == 2)
        .filter(|&(r, c)| board.get(r, c).and_then(|cell| cell.owner()).is_some_and(|o| o != me))
        .count();
    own_adjacent as f64 + 0.5 * blocked as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Cell;

    fn place(board: &mut Board, cells: &[(Point, Color, u32)]) {
        for &((r, c), color, tokens) in cells {
            board.set(r, c, Cell::occupied(color, tokens)).unwrap();
        }
    }

    #[test]
    fn test_stage_thresholds() {
        // 6x6x3 = 108 capacity
        assert_eq!(Stage::classify(0, 6), Stage::Opening);
        assert_eq!(Stage::classify(21, 6), Stage::Opening);
        assert_eq!(Stage::classify(22, 6), Stage::Midgame);
        assert_eq!(Stage::classify(64, 6), Stage::Midgame);
        assert_eq!(Stage::classify(65, 6), Stage::Endgame);
    }

    #[test]
    fn test_clusters() {
        let mut board = Board::new(6);
        place(
            &mut board,
            &[
                ((0, 0), Color::Blue, 1),
                ((0, 1), Color::Blue, 2),
                ((2, 2), Color::Blue, 1),
                ((2, 3), Color::Blue, 3),
                ((3, 3), Color::Blue, 1),
                ((5, 5), Color::Red, 1),
            ],
        );
        let groups = clusters(&board, Color::Blue);
        assert_eq!(groups.len(), 2);
        let analysis = BoardAnalysis::new(&board, &[Color::Blue, Color::Red]);
        let blue = analysis.stats(Color::Blue);
        assert_eq!(blue.tokens, 8);
        assert_eq!(blue.cells.len(), 5);
        assert_eq!(blue.cluster_size_at((3, 3)), 3);
        assert_eq!(blue.cluster_size_at((5, 5)), 0);
        assert_eq!(analysis.opponent_tokens(Color::Blue), 1);
    }

    #[test]
    fn test_vulnerability_rules() {
        assert!(is_vulnerable(3, 9, 1));
        assert!(is_vulnerable(6, 4, 10));
        assert!(is_vulnerable(6, 4, 8));
        assert!(!is_vulnerable(6, 8, 10));
        assert!(!is_vulnerable(4, 6, 7));
    }

    #[test]
    fn test_capture_risk_weights() {
        let mut board = Board::new(6);
        place(
            &mut board,
            &[((1, 2), Color::Red, 3), ((2, 1), Color::Red, 1), ((2, 3), Color::Blue, 2)],
        );
        assert_eq!(capture_risk(&board, (2, 2), Color::Blue), 4.0);
        assert_eq!(capture_risk(&board, (2, 2), Color::Red), 1.5);
        assert_eq!(capture_risk(&board, (5, 5), Color::Blue), 0.0);
    }

    #[test]
    fn test_distances() {
        let mut board = Board::new(6);
        assert_eq!(opponent_distance(&board, (0, 0), Color::Blue), 12);
        assert_eq!(own_distance(&board, (0, 0), Color::Blue), None);
        place(&mut board, &[((5, 5), Color::Red, 1), ((0, 2), Color::Blue, 1)]);
        assert_eq!(opponent_distance(&board, (0, 0), Color::Blue), 10);
        assert_eq!(own_distance(&board, (0, 0), Color::Blue), Some(2));
    }

    #[test]
    fn test_defensive_value() {
        let mut board = Board::new(6);
        place(&mut board, &[((2, 1), Color::Blue, 1), ((2, 4), Color::Red, 1)]);
        assert_eq!(defensive_value(&board, (2, 2), Color::Blue), 1.5);
    }
}
