//! Gravity collapse - pull pieces down into empty cells
//!
//! Each empty, non-obstacle cell (bottom upward) is filled by the nearest piece
//! above it. Pieces may drop past obstacles. The relocation is logical right
//! away; the fall itself is a motion lasting `base_ms` per row.

use tracing::{trace, warn};

use crate::grid::Grid;
use crate::piece_set::PieceSet;
use crate::types::Coord;

/// Collapse one column. Returns the pieces that were moved.
///
/// The top row is never a destination. Each empty cell takes one piece from
/// above and the column is not re-scanned afterwards.
pub fn collapse_column(grid: &mut Grid, column: i32, base_ms: u32) -> PieceSet {
    let mut moved = PieceSet::new();
    if column < 0 || column >= grid.width() {
        warn!(column, "collapse: column out of range");
        return moved;
    }

    let height = grid.height();
    for i in 0..height - 1 {
        let target = Coord::new(column, i);
        if grid.get(target).is_some() || grid.is_obstacle(target) {
            continue;
        }
        for j in (i + 1)..height {
            let Some(id) = grid.get(Coord::new(column, j)) else {
                continue;
            };
            let rows = (j - i) as u32;
            if grid.move_piece(id, target, base_ms.saturating_mul(rows)) {
                trace!(?id, column, from = j, to = i, "collapse");
                moved.insert(id);
            }
            break;
        }
    }
    moved
}

/// Collapse every distinct column touched by `coords`, in first-seen order.
///
/// Takes coordinates rather than pieces because the cleared pieces no longer
/// exist by the time their columns collapse.
pub fn collapse_columns(grid: &mut Grid, coords: &[Coord], base_ms: u32) -> PieceSet {
    let mut columns: Vec<i32> = Vec::new();
    for at in coords {
        if !columns.contains(&at.x) {
            columns.push(at.x);
        }
    }

    let mut moved = PieceSet::new();
    for column in columns {
        moved.union_with(&collapse_column(grid, column, base_ms));
    }
    moved
}
