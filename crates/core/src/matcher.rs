//! Match detection - directional run scanning over the grid
//!
//! All queries are pure reads of the occupancy array. A "run" is a straight
//! line of pieces sharing one [`MatchValue`](crate::types::MatchValue),
//! starting at (and including) the scanned cell.
//!
//! "No match" is `None` from [`scan_direction`]; the merging queries coalesce it
//! with the empty set so callers only ever see a [`PieceSet`].

use arrayvec::ArrayVec;

use crate::grid::Grid;
use crate::piece_set::PieceSet;
use crate::types::{Coord, MIN_MATCH_LEN};

/// Unit step along one axis.
pub type Direction = (i32, i32);

pub const UP: Direction = (0, 1);
pub const DOWN: Direction = (0, -1);
pub const LEFT: Direction = (-1, 0);
pub const RIGHT: Direction = (1, 0);

/// Collect the run starting at `start` and walking along `dir`.
///
/// Each component of `dir` is clamped to `-1..=1`. The walk stops at the first
/// cell that is out of range, empty, or holds a different value, and covers at
/// most `max(width, height) - 1` steps. Returns the run only when it has at
/// least `min_len` pieces.
pub fn scan_direction(grid: &Grid, start: Coord, dir: Direction, min_len: usize) -> Option<PieceSet> {
    let start_piece = grid.piece_at(start)?;
    let value = start_piece.value();
    let (dx, dy) = (dir.0.signum(), dir.1.signum());

    let mut run = PieceSet::new();
    run.insert(start_piece.id());

    let max_steps = grid.width().max(grid.height()) - 1;
    for step in 1..=max_steps {
        let at = start.offset(dx * step, dy * step);
        if !grid.is_within_bounds(at) {
            break;
        }
        let Some(next) = grid.piece_at(at) else {
            break;
        };
        if next.value() != value {
            break;
        }
        // A zero direction revisits the start; skip instead of stopping.
        run.insert(next.id());
    }

    (run.len() >= min_len).then_some(run)
}

// Union of two opposite half-scans (each at least 2 long), kept if the
// combined run reaches `min_len`.
fn merge_axis(grid: &Grid, at: Coord, a: Direction, b: Direction, min_len: usize) -> PieceSet {
    let mut line = PieceSet::new();
    line.union_opt(scan_direction(grid, at, a, 2).as_ref());
    line.union_opt(scan_direction(grid, at, b, 2).as_ref());
    if line.len() >= min_len {
        line
    } else {
        PieceSet::new()
    }
}

/// Every piece in a horizontal or vertical run of at least `min_len` passing
/// through `at`. Empty when there is none (or `at` holds no piece).
pub fn matches_through_cell(grid: &Grid, at: Coord, min_len: usize) -> PieceSet {
    let mut found = merge_axis(grid, at, UP, DOWN, min_len);
    found.union_with(&merge_axis(grid, at, RIGHT, LEFT, min_len));
    found
}

/// Union of [`matches_through_cell`] over every cell, column by column.
pub fn all_matches(grid: &Grid) -> PieceSet {
    let mut found = PieceSet::new();
    for x in 0..grid.width() {
        for y in 0..grid.height() {
            found.union_with(&matches_through_cell(grid, Coord::new(x, y), MIN_MATCH_LEN));
        }
    }
    found
}

/// Union of [`matches_through_cell`] at each piece's current coordinates.
/// Pieces no longer on the grid are skipped.
pub fn matches_for_pieces(grid: &Grid, pieces: &PieceSet) -> PieceSet {
    let mut found = PieceSet::new();
    for &id in pieces {
        let Some(piece) = grid.piece(id) else {
            continue;
        };
        let at = piece.coord();
        if grid.get(at) != Some(id) {
            continue;
        }
        found.union_with(&matches_through_cell(grid, at, MIN_MATCH_LEN));
    }
    found
}

/// True when the piece at `at` completes a run to its left or below.
///
/// Only the already-filled directions are checked (fill walks left to right,
/// bottom to top), so this is cheaper than [`matches_through_cell`] and
/// deliberately not equivalent to it.
pub fn has_match_on_fill(grid: &Grid, at: Coord) -> bool {
    let scans: ArrayVec<Direction, 2> = [LEFT, DOWN].into_iter().collect();
    scans
        .into_iter()
        .any(|dir| scan_direction(grid, at, dir, MIN_MATCH_LEN).is_some())
}
