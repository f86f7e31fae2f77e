//! Board model: a square grid of cells, each with a token count and an owner.
//!
//! Cells keep their fields private so the ownership invariant holds at all
//! times: a cell with zero tokens has no owner, and an owned cell holds at
//! least one token.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use crate::constants::{DIRECTIONS, THRESHOLD};
use crate::error::BoardError;

/// Player colors, in palette order.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Color {
    Blue,
    Red,
    Green,
    Yellow,
    Purple,
}

impl Color {
    /// The fixed palette. Players are assigned colors from it in this order.
    pub const PALETTE: [Color; 5] = [
        Color::Blue,
        Color::Red,
        Color::Green,
        Color::Yellow,
        Color::Purple,
    ];

    /// Lowercase color name.
    pub fn name(self) -> &'static str {
        match self {
            Color::Blue => "blue",
            Color::Red => "red",
            Color::Green => "green",
            Color::Yellow => "yellow",
            Color::Purple => "purple",
        }
    }

    /// Single-letter tag used when printing the board.
    pub fn symbol(self) -> char {
        match self {
            Color::Blue => 'B',
            Color::Red => 'R',
            Color::Green => 'G',
            Color::Yellow => 'Y',
            Color::Purple => 'P',
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Color {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Color::PALETTE
            .into_iter()
            .find(|c| c.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown color: {s}"))
    }
}

/// A cell coordinate as (row, col).
pub type Point = (usize, usize);

/// One grid square.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Cell {
    tokens: u32,
    owner: Option<Color>,
}

impl Cell {
    /// An empty cell.
    pub const EMPTY: Cell = Cell {
        tokens: 0,
        owner: None,
    };

    /// A cell owned by `color` holding `tokens` tokens.
    /// Zero tokens yields an empty cell.
    pub fn occupied(color: Color, tokens: u32) -> Self {
        if tokens == 0 {
            Cell::EMPTY
        } else {
            Cell {
                tokens,
                owner: Some(color),
            }
        }
    }

    pub fn tokens(&self) -> u32 {
        self.tokens
    }

    pub fn owner(&self) -> Option<Color> {
        self.owner
    }

    pub fn is_empty(&self) -> bool {
        self.owner.is_none()
    }

    /// True when the cell holds more than [`THRESHOLD`] tokens.
    pub fn is_unstable(&self) -> bool {
        self.tokens > THRESHOLD
    }

    /// Add one token and hand the cell to `color`.
    pub(crate) fn receive(&mut self, color: Color) {
        self.tokens += 1;
        self.owner = Some(color);
    }
}

/// Square grid of cells.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Board {
    size: usize,
    cells: Vec<Cell>,
}

impl Board {
    /// An empty `size`x`size` board.
    pub fn new(size: usize) -> Self {
        Self {
            size,
            cells: vec![Cell::EMPTY; size * size],
        }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    #[inline]
    fn idx(&self, row: usize, col: usize) -> usize {
        row * self.size + col
    }

    /// Bounds check for signed coordinates.
    pub fn is_in_bounds(&self, row: isize, col: isize) -> bool {
        row >= 0 && col >= 0 && (row as usize) < self.size && (col as usize) < self.size
    }

    /// Bounds check for a point.
    #[inline]
    pub fn contains(&self, (row, col): Point) -> bool {
        row < self.size && col < self.size
    }

    /// The cell at (row, col), or `None` off the board.
    pub fn get(&self, row: usize, col: usize) -> Option<Cell> {
        if !self.contains((row, col)) {
            return None;
        }
        Some(self.cells[self.idx(row, col)])
    }

    pub(crate) fn cell_mut(&mut self, (row, col): Point) -> Option<&mut Cell> {
        if !self.contains((row, col)) {
            return None;
        }
        let i = self.idx(row, col);
        Some(&mut self.cells[i])
    }

    /// Overwrite a cell. Intended for setting up positions.
    pub fn set(&mut self, row: usize, col: usize, cell: Cell) -> Result<(), BoardError> {
        let size = self.size;
        let slot = self
            .cell_mut((row, col))
            .ok_or(BoardError::OutOfBounds { row, col, size })?;
        *slot = cell;
        Ok(())
    }

    /// In-bounds orthogonal neighbors (up, down, left, right).
    pub fn neighbors(&self, row: usize, col: usize) -> impl Iterator<Item = Point> + '_ {
        DIRECTIONS.iter().filter_map(move |&(dr, dc)| {
            let r = row as isize + dr;
            let c = col as isize + dc;
            self.is_in_bounds(r, c).then_some((r as usize, c as usize))
        })
    }

    /// All coordinates in row-major order.
    pub fn points(&self) -> impl Iterator<Item = Point> + '_ {
        let size = self.size;
        (0..size).flat_map(move |r| (0..size).map(move |c| (r, c)))
    }

    /// Put one token of `color` at (row, col).
    ///
    /// An empty cell becomes `{1, color}`; a cell already owned by `color`
    /// gains a token. Returns the new token count.
    ///
    /// # Errors
    /// - [`BoardError::OutOfBounds`] if the point is off the board
    /// - [`BoardError::ForeignOwner`] if another color owns the cell
    pub fn place(&mut self, row: usize, col: usize, color: Color) -> Result<u32, BoardError> {
        let size = self.size;
        let cell = self
            .cell_mut((row, col))
            .ok_or(BoardError::OutOfBounds { row, col, size })?;
        match cell.owner {
            Some(owner) if owner != color => Err(BoardError::ForeignOwner {
                row,
                col,
                owner,
                color,
            }),
            _ => {
                cell.receive(color);
                Ok(cell.tokens)
            }
        }
    }

    /// Total tokens on the board.
    pub fn total_tokens(&self) -> u32 {
        self.cells.iter().map(|c| c.tokens).sum()
    }

    /// Total tokens owned by `color`.
    pub fn tokens_of(&self, color: Color) -> u32 {
        self.cells
            .iter()
            .filter(|c| c.owner == Some(color))
            .map(|c| c.tokens)
            .sum()
    }

    /// Coordinates of every cell owned by `color`, row-major.
    pub fn cells_of(&self, color: Color) -> Vec<Point> {
        self.points()
            .filter(|&(r, c)| self.cells[self.idx(r, c)].owner == Some(color))
            .collect()
    }

    /// True if `color` owns at least one cell.
    pub fn owns_any(&self, color: Color) -> bool {
        self.cells.iter().any(|c| c.owner == Some(color))
    }

    /// Colors owning at least one cell.
    pub fn colors_present(&self) -> BTreeSet<Color> {
        self.cells.iter().filter_map(|c| c.owner).collect()
    }

    /// First unstable cell, if any.
    pub fn first_unstable(&self) -> Option<Point> {
        self.points()
            .find(|&(r, c)| self.cells[self.idx(r, c)].is_unstable())
    }

    /// Collect the same-owner group containing `start` (4-connected).
    ///
    /// Uses flood-fill; returns an empty group for an empty cell.
    pub fn collect_group(&self, start: Point) -> Vec<Point> {
        let Some(color) = self.get(start.0, start.1).and_then(|c| c.owner) else {
            return Vec::new();
        };
        let mut stack = vec![start];
        let mut visited = vec![false; self.size * self.size];
        let mut group = Vec::new();
        while let Some((r, c)) = stack.pop() {
            let i = self.idx(r, c);
            if visited[i] {
                continue;
            }
            visited[i] = true;
            if self.cells[i].owner == Some(color) {
                group.push((r, c));
                for (nr, nc) in self.neighbors(r, c) {
                    if !visited[self.idx(nr, nc)] {
                        stack.push((nr, nc));
                    }
                }
            }
        }
        group
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in 0..self.size {
            for col in 0..self.size {
                let cell = self.cells[self.idx(row, col)];
                match cell.owner {
                    Some(color) => write!(f, "{}{} ", color.symbol(), cell.tokens)?,
                    None => write!(f, ".  ")?,
                }
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_board() {
        let board = Board::new(6);
        assert_eq!(board.size(), 6);
        assert_eq!(board.total_tokens(), 0);
        assert!(board.points().all(|(r, c)| board.get(r, c) == Some(Cell::EMPTY)));
    }

    #[test]
    fn test_bounds() {
        let board = Board::new(6);
        assert!(board.is_in_bounds(0, 0));
        assert!(board.is_in_bounds(5, 5));
        assert!(!board.is_in_bounds(-1, 0));
        assert!(!board.is_in_bounds(0, 6));
        assert_eq!(board.get(6, 0), None);
    }

    #[test]
    fn test_neighbors_corner_edge_center() {
        let board = Board::new(6);
        let corner: Vec<_> = board.neighbors(0, 0).collect();
        assert_eq!(corner, vec![(1, 0), (0, 1)]);
        assert_eq!(board.neighbors(0, 3).count(), 3);
        let center: Vec<_> = board.neighbors(2, 2).collect();
        assert_eq!(center, vec![(1, 2), (3, 2), (2, 1), (2, 3)]);
    }

    #[test]
    fn test_place_empty_and_own() {
        let mut board = Board::new(6);
        assert_eq!(board.place(1, 1, Color::Blue), Ok(1));
        assert_eq!(board.place(1, 1, Color::Blue), Ok(2));
        let cell = board.get(1, 1).unwrap();
        assert_eq!(cell.tokens(), 2);
        assert_eq!(cell.owner(), Some(Color::Blue));
    }

    #[test]
    fn test_place_foreign_cell_fails() {
        let mut board = Board::new(6);
        board.place(1, 1, Color::Blue).unwrap();
        let err = board.place(1, 1, Color::Red).unwrap_err();
        assert!(matches!(err, BoardError::ForeignOwner { owner: Color::Blue, .. }));
        assert_eq!(board.get(1, 1).unwrap().tokens(), 1);
    }

    #[test]
    fn test_place_out_of_bounds() {
        let mut board = Board::new(6);
        assert!(matches!(
            board.place(6, 0, Color::Blue),
            Err(BoardError::OutOfBounds { .. })
        ));
    }

    #[test]
    fn test_occupied_zero_is_empty() {
        assert_eq!(Cell::occupied(Color::Red, 0), Cell::EMPTY);
        assert!(Cell::occupied(Color::Red, 4).is_unstable());
        assert!(!Cell::occupied(Color::Red, 3).is_unstable());
    }

    #[test]
    fn test_collect_group() {
        let mut board = Board::new(6);
        for pt in [(0, 0), (0, 1), (1, 1), (3, 3)] {
            board.set(pt.0, pt.1, Cell::occupied(Color::Green, 1)).unwrap();
        }
        board.set(0, 2, Cell::occupied(Color::Red, 1)).unwrap();
        let mut group = board.collect_group((0, 0));
        group.sort();
        assert_eq!(group, vec![(0, 0), (0, 1), (1, 1)]);
        assert!(board.collect_group((4, 4)).is_empty());
    }

    #[test]
    fn test_color_roundtrip_names() {
        for color in Color::PALETTE {
            assert_eq!(color.name().parse::<Color>(), Ok(color));
        }
        assert!("orange".parse::<Color>().is_err());
    }

    #[test]
    fn test_display() {
        let mut board = Board::new(2);
        board.place(0, 1, Color::Red).unwrap();
        assert_eq!(board.to_string(), ".  R1 \n.  .  \n");
    }
}
