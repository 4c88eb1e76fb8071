//! Property tests for board invariants.
//!
//! Invariants covered:
//! - A scanned run is never shorter than the requested minimum and never
//!   repeats a piece.
//! - Match detection through a cell is unchanged by rotating the board 90°.
//! - Filling an empty board leaves no runs unless a cell hit the reroll cap.
//! - Random swap sequences always settle back to an idle board with an open
//!   gate, with grid invariants holding after every tick.

use std::collections::HashSet;

use proptest::prelude::*;

use match3::core::{
    all_matches, fill_board, matches_through_cell, scan_direction, Board, BoardConfig, Coordinator,
    Grid, SimpleRng,
};
use match3::types::{Coord, InputEvent, TICK_MS};

fn layout_strategy() -> impl Strategy<Value = Vec<String>> {
    (2usize..7, 2usize..7).prop_flat_map(|(w, h)| {
        prop::collection::vec(
            prop::collection::vec(prop::sample::select(vec!['.', '#', '0', '1', '2']), w)
                .prop_map(|cells| cells.into_iter().collect::<String>()),
            h,
        )
    })
}

fn parse(rows: &[String]) -> Grid {
    let refs: Vec<&str> = rows.iter().map(String::as_str).collect();
    Grid::from_ascii(&refs).unwrap()
}

/// Rotate a layout 90° clockwise. Board cell (x, y) of a `w x h` grid ends up
/// at (y, w - 1 - x).
fn rotate(rows: &[String]) -> Vec<String> {
    let cells: Vec<Vec<char>> = rows.iter().map(|r| r.chars().collect()).collect();
    let h = cells.len();
    let w = cells[0].len();
    // Output has w rows (top first) and h columns.
    (0..w)
        .map(|r| (0..h).map(|c| cells[h - 1 - c][r]).collect())
        .collect()
}

fn value_coords(grid: &Grid, at: Coord) -> Vec<Coord> {
    let found = matches_through_cell(grid, at, 3);
    let mut out: Vec<Coord> = found
        .iter()
        .filter_map(|id| grid.piece(*id).map(|p| p.coord()))
        .collect();
    out.sort();
    out
}

proptest! {
    #[test]
    fn scan_respects_min_len_and_uniqueness(
        rows in layout_strategy(),
        dx in -2i32..=2,
        dy in -2i32..=2,
        min_len in 1usize..5,
    ) {
        let grid = parse(&rows);
        for x in 0..grid.width() {
            for y in 0..grid.height() {
                if let Some(run) = scan_direction(&grid, Coord::new(x, y), (dx, dy), min_len) {
                    prop_assert!(run.len() >= min_len);
                    let unique: HashSet<_> = run.iter().collect();
                    prop_assert_eq!(unique.len(), run.len());
                }
            }
        }
    }

    #[test]
    fn matches_are_rotation_invariant(rows in layout_strategy()) {
        let grid = parse(&rows);
        let rotated_rows = rotate(&rows);
        let rotated = parse(&rotated_rows);
        let w = grid.width();

        for x in 0..grid.width() {
            for y in 0..grid.height() {
                let original = value_coords(&grid, Coord::new(x, y));
                let mut mapped: Vec<Coord> = original
                    .iter()
                    .map(|c| Coord::new(c.y, w - 1 - c.x))
                    .collect();
                mapped.sort();
                let turned = value_coords(&rotated, Coord::new(y, w - 1 - x));
                prop_assert_eq!(mapped, turned);
            }
        }
    }

    #[test]
    fn fill_leaves_no_runs(seed in any::<u32>(), w in 3u16..10, h in 3u16..10, palette in 3u8..8) {
        let mut grid = Grid::new(w, h);
        let mut rng = SimpleRng::new(seed);
        let report = fill_board(&mut grid, &mut rng, palette, 0, 0);
        prop_assert_eq!(report.filled as usize, w as usize * h as usize);
        if report.exhausted == 0 {
            prop_assert!(all_matches(&grid).is_empty());
        }
        prop_assert!(grid.verify().is_ok());
    }

    #[test]
    fn random_swaps_always_settle(
        seed in any::<u32>(),
        swaps in prop::collection::vec((0i32..6, 0i32..6, any::<bool>()), 1..8),
    ) {
        let config = BoardConfig { width: 6, height: 6, ..Default::default() };
        let mut game = Coordinator::from_board(Board::new(config, seed).unwrap());

        for (x, y, horizontal) in swaps {
            let from = Coord::new(x, y);
            let to = if horizontal { from.offset(1, 0) } else { from.offset(0, 1) };
            game.handle_input(InputEvent::TileTapped(from));
            game.handle_input(InputEvent::TileDraggedOnto(to));
            game.handle_input(InputEvent::Released);

            let mut ticks = 0;
            while !game.is_stable() {
                game.tick(TICK_MS);
                prop_assert!(game.grid().verify().is_ok());
                ticks += 1;
                prop_assert!(ticks < 20_000);
            }
            prop_assert_eq!(game.grid().piece_count(), 36);
        }
    }
}
