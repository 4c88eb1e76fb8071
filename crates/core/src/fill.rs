//! Refill - populate empty cells with random pieces
//!
//! Fill walks column-major (left to right, bottom to top) and rerolls any piece
//! that would complete a run with the already-filled cells to its left or
//! below. Rerolls are capped per cell so a tiny palette cannot hang the board.

use tracing::{debug, info};

use crate::grid::Grid;
use crate::matcher::has_match_on_fill;
use crate::rng::SimpleRng;
use crate::types::{Coord, PieceId, FILL_MAX_ITERATIONS};

/// Outcome of a [`fill_board`] pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FillReport {
    /// Cells that received a piece
    pub filled: u32,
    /// Pieces discarded and rerolled because they completed a run
    pub refills: u32,
    /// Cells that hit the reroll cap and kept their last value
    pub exhausted: u32,
}

/// Spawn a random piece at `at`.
///
/// With a non-zero `fall_offset` the piece starts rendered `fall_offset` rows
/// above its slot and drops in over `move_ms`.
pub fn fill_random_at(
    grid: &mut Grid,
    rng: &mut SimpleRng,
    palette_size: u8,
    at: Coord,
    fall_offset: i32,
    move_ms: u32,
) -> Option<PieceId> {
    let value = rng.pick_value(palette_size);
    let id = grid.spawn_piece(value, at)?;
    if fall_offset != 0 {
        grid.set_piece_position(id, at.x as f32, (at.y + fall_offset) as f32);
        grid.move_piece(id, at, move_ms);
    }
    Some(id)
}

/// Fill every empty, non-obstacle cell.
pub fn fill_board(
    grid: &mut Grid,
    rng: &mut SimpleRng,
    palette_size: u8,
    fall_offset: i32,
    move_ms: u32,
) -> FillReport {
    let mut report = FillReport::default();

    for x in 0..grid.width() {
        for y in 0..grid.height() {
            let at = Coord::new(x, y);
            if grid.get(at).is_some() || grid.is_obstacle(at) {
                continue;
            }
            if fill_random_at(grid, rng, palette_size, at, fall_offset, move_ms).is_none() {
                continue;
            }
            report.filled += 1;

            let mut iterations = 0;
            while has_match_on_fill(grid, at) {
                grid.clear(at);
                fill_random_at(grid, rng, palette_size, at, fall_offset, move_ms);
                iterations += 1;
                report.refills += 1;

                if iterations >= FILL_MAX_ITERATIONS {
                    info!(%at, iterations, "fill: reroll cap reached, keeping current piece");
                    report.exhausted += 1;
                    break;
                }
            }
        }
    }

    debug!(
        filled = report.filled,
        refills = report.refills,
        exhausted = report.exhausted,
        "fill complete"
    );
    report
}
