//! Explosion propagation (chain reactions).
//!
//! A [`Cascade`] is one propagation epoch: the explosion triggered by a single
//! move plus everything it sets off. It owns the FIFO work queue and the
//! "already resolved" set, both created fresh per epoch and dropped with it,
//! so nothing leaks from one move into the next.
//!
//! Staleness is checked when a cell is popped, not when it is queued: a cell
//! can be queued by two explosions, or drained by a third, before its turn.
//! A resolved cell never explodes again in the same wave. If resolved cells
//! end up refilled past the threshold, the drained queue is re-seeded with
//! them under a fresh resolved set (a new wave), up to [`MAX_CASCADE_WAVES`].

use std::collections::{BTreeSet, VecDeque};

use tracing::debug;

use crate::board::{Board, Cell, Color, Point};
use crate::constants::{MAX_CASCADE_WAVES, THRESHOLD};
use crate::error::InvariantViolation;

/// New state of one cell after an explosion step.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct CellChange {
    pub row: usize,
    pub col: usize,
    pub owner: Option<Color>,
    pub tokens: u32,
}

impl CellChange {
    fn of(pt: Point, cell: Cell) -> Self {
        Self {
            row: pt.0,
            col: pt.1,
            owner: cell.owner(),
            tokens: cell.tokens(),
        }
    }
}

/// One explosion: the origin reset followed by each neighbor it fed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExplosionStep {
    pub origin: Point,
    pub color: Color,
    /// `changes[0]` is the emptied origin.
    pub changes: Vec<CellChange>,
}

/// Summary of a finished epoch.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Resolution {
    pub steps: Vec<ExplosionStep>,
    /// Colors that lost at least one cell during the epoch.
    pub captured: BTreeSet<Color>,
    /// Captured colors left without any cell.
    pub eliminated: BTreeSet<Color>,
}

/// Hook called after every explosion step, e.g. to pace animations.
pub trait CascadeObserver {
    fn after_step(&mut self, board: &Board, step: &ExplosionStep);
}

/// Observer that does nothing.
#[derive(Copy, Clone, Debug, Default)]
pub struct Unpaced;

impl CascadeObserver for Unpaced {
    fn after_step(&mut self, _board: &Board, _step: &ExplosionStep) {}
}

/// One propagation epoch.
#[derive(Debug)]
pub struct Cascade {
    color: Color,
    size: usize,
    resolved: Vec<bool>,
    queue: VecDeque<Point>,
    captured: BTreeSet<Color>,
    explosions: usize,
    waves: usize,
    max_waves: usize,
}

impl Cascade {
    /// Start an epoch seeded at `origin`, attributing every explosion to `color`.
    ///
    /// # Errors
    /// [`InvariantViolation::OutOfBounds`] if `origin` is off the board.
    pub fn new(board: &Board, origin: Point, color: Color) -> Result<Self, InvariantViolation> {
        if !board.contains(origin) {
            return Err(InvariantViolation::OutOfBounds(origin));
        }
        let size = board.size();
        Ok(Self {
            color,
            size,
            resolved: vec![false; size * size],
            queue: VecDeque::from([origin]),
            captured: BTreeSet::new(),
            explosions: 0,
            waves: 1,
            max_waves: MAX_CASCADE_WAVES,
        })
    }

    /// Cap the number of waves below [`MAX_CASCADE_WAVES`].
    pub(crate) fn with_wave_limit(mut self, max_waves: usize) -> Self {
        self.max_waves = max_waves.min(MAX_CASCADE_WAVES);
        self
    }

    /// Waves started so far, counting the first.
    pub(crate) fn waves(&self) -> usize {
        self.waves
    }

    /// Number of explosions so far.
    pub fn explosions(&self) -> usize {
        self.explosions
    }

    /// Number of pending queue entries (some may turn out stale).
    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    /// Resolve the next explosion.
    ///
    /// Returns `Ok(None)` once nothing is left to explode.
    pub fn step(&mut self, board: &mut Board) -> Result<Option<ExplosionStep>, InvariantViolation> {
        loop {
            let Some(pt) = self.queue.pop_front() else {
                if !self.reseed(board)? {
                    return Ok(None);
                }
                continue;
            };
            let i = self.idx(pt)?;
            if self.resolved[i] {
                continue;
            }
            let Some(cell) = board.get(pt.0, pt.1) else {
                return Err(InvariantViolation::OutOfBounds(pt));
            };
            if !cell.is_unstable() {
                continue;
            }
            self.resolved[i] = true;
            return self.explode(board, pt).map(Some);
        }
    }

    /// Start another wave if resolved cells were refilled past the threshold.
    fn reseed(&mut self, board: &Board) -> Result<bool, InvariantViolation> {
        if self.explosions == 0 {
            return Ok(false);
        }
        let unstable: Vec<Point> = board
            .points()
            .filter(|&(r, c)| board.get(r, c).is_some_and(|cell| cell.is_unstable()))
            .collect();
        if unstable.is_empty() {
            return Ok(false);
        }
        if self.waves >= self.max_waves {
            return Err(InvariantViolation::CascadeOverrun(self.max_waves));
        }
        self.waves += 1;
        debug!(wave = self.waves, cells = unstable.len(), "re-seeding cascade");
        self.resolved.fill(false);
        self.queue.extend(unstable);
        Ok(true)
    }

    fn explode(&mut self, board: &mut Board, origin: Point) -> Result<ExplosionStep, InvariantViolation> {
        let color = self.color;
        let Some(cell) = board.cell_mut(origin) else {
            return Err(InvariantViolation::OutOfBounds(origin));
        };
        debug!(row = origin.0, col = origin.1, tokens = cell.tokens(), %color, "exploding cell");
        if let Some(prev) = cell.owner().filter(|&o| o != color) {
            self.captured.insert(prev);
        }
        *cell = Cell::EMPTY;

        let mut changes = vec![CellChange::of(origin, Cell::EMPTY)];
        let neighbors: Vec<Point> = board.neighbors(origin.0, origin.1).collect();
        for pt in neighbors {
            let Some(n) = board.cell_mut(pt) else {
                return Err(InvariantViolation::OutOfBounds(pt));
            };
            if let Some(prev) = n.owner().filter(|&o| o != color) {
                self.captured.insert(prev);
            }
            n.receive(color);
            let n = *n;
            changes.push(CellChange::of(pt, n));
            if n.is_unstable() && !self.resolved[self.idx(pt)?] {
                debug!(row = pt.0, col = pt.1, tokens = n.tokens(), "queueing explosion");
                self.queue.push_back(pt);
            }
        }
        self.explosions += 1;
        Ok(ExplosionStep {
            origin,
            color,
            changes,
        })
    }

    /// Close the epoch and work out which captured colors were wiped out.
    pub fn finish(self, board: &Board, steps: Vec<ExplosionStep>) -> Resolution {
        let eliminated = self
            .captured
            .iter()
            .copied()
            .filter(|&c| !board.owns_any(c))
            .collect();
        Resolution {
            steps,
            captured: self.captured,
            eliminated,
        }
    }

    #[inline]
    fn idx(&self, (row, col): Point) -> Result<usize, InvariantViolation> {
        if row >= self.size || col >= self.size {
            return Err(InvariantViolation::OutOfBounds((row, col)));
        }
        Ok(row * self.size + col)
    }
}

/// Resolve the explosion at (row, col) and every cascade it causes.
///
/// A stable origin is a no-op.
pub fn resolve(
    board: &mut Board,
    row: usize,
    col: usize,
    color: Color,
) -> Result<Resolution, InvariantViolation> {
    resolve_with(board, row, col, color, &mut Unpaced)
}

/// Like [`resolve`], calling `observer` after each explosion step.
pub fn resolve_with<O: CascadeObserver>(
    board: &mut Board,
    row: usize,
    col: usize,
    color: Color,
    observer: &mut O,
) -> Result<Resolution, InvariantViolation> {
    let mut cascade = Cascade::new(board, (row, col), color)?;
    let mut steps = Vec::new();
    while let Some(step) = cascade.step(board)? {
        observer.after_step(board, &step);
        steps.push(step);
    }
    Ok(cascade.finish(board, steps))
}

/// Play `color` at `pt` on a copy of `board` and resolve any cascade.
///
/// Leaves `board` untouched. Returns `None` if the placement is illegal.
pub fn simulate_move(board: &Board, pt: Point, color: Color) -> Option<(Board, Resolution)> {
    let mut copy = board.clone();
    let tokens = copy.place(pt.0, pt.1, color).ok()?;
    if tokens <= THRESHOLD {
        return Some((copy, Resolution::default()));
    }
    let resolution = resolve(&mut copy, pt.0, pt.1, color).ok()?;
    Some((copy, resolution))
}
