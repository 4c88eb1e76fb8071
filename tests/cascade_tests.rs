//! Cascade coordinator tests - swaps, waves, chains and the input gate

use match3::core::{
    Board, BoardConfig, Coordinator, Grid, NullSink, PhaseKind, Selection, VisualRequest,
};
use match3::types::{Coord, InputEvent, SWAP_MS, TICK_MS};

fn coordinator(rows: &[&str], palette_size: u8) -> Coordinator {
    let grid = Grid::from_ascii(rows).unwrap();
    let config = BoardConfig {
        palette_size,
        ..Default::default()
    };
    Coordinator::from_board(Board::from_grid(grid, config, 2024))
}

fn drag(game: &mut Coordinator, from: Coord, to: Coord) -> bool {
    game.handle_input(InputEvent::TileTapped(from));
    game.handle_input(InputEvent::TileDraggedOnto(to));
    game.handle_input(InputEvent::Released)
}

/// Tick until stable, checking grid invariants every tick. Returns ticks used.
fn run_until_stable(game: &mut Coordinator, max_ticks: u32) -> u32 {
    for tick in 1..=max_ticks {
        game.tick(TICK_MS);
        assert_eq!(game.grid().verify(), Ok(()), "invariant broken at tick {}", tick);
        if game.is_stable() {
            return tick;
        }
    }
    panic!("still in phase {:?} after {} ticks", game.phase(), max_ticks);
}

// Swapping (1,2) with (2,2) makes a vertical run of 1s in column 1. Clearing
// it drops the 2 above onto row 0, where it chains with the 2s beside it.
const CHAIN_BOARD: [&str; 5] = ["675", "526", "601", "516", "212"];

#[test]
fn test_swap_moves_both_pieces_immediately() {
    let mut game = coordinator(&["12", "34"], 6);
    let a = game.grid().get(Coord::new(0, 0)).unwrap();
    let b = game.grid().get(Coord::new(1, 0)).unwrap();
    game.board_mut().grid_mut().discard_requests();

    assert!(drag(&mut game, Coord::new(0, 0), Coord::new(1, 0)));
    assert_eq!(game.phase(), PhaseKind::Swapping);
    assert_eq!(game.grid().get(Coord::new(1, 0)), Some(a));
    assert_eq!(game.grid().get(Coord::new(0, 0)), Some(b));

    let mut sink: Vec<VisualRequest> = Vec::new();
    game.drain_visual_requests(&mut sink);
    assert_eq!(
        sink,
        vec![
            VisualRequest::MovePiece {
                id: a,
                to: Coord::new(1, 0),
                duration_ms: SWAP_MS
            },
            VisualRequest::MovePiece {
                id: b,
                to: Coord::new(0, 0),
                duration_ms: SWAP_MS
            },
        ]
    );
}

#[test]
fn test_non_adjacent_swap_is_a_no_op() {
    let mut game = coordinator(&["123", "456"], 6);
    let before = game.grid().to_ascii();
    game.board_mut().grid_mut().discard_requests();

    assert!(!drag(&mut game, Coord::new(0, 0), Coord::new(2, 0)));
    assert!(!drag(&mut game, Coord::new(0, 0), Coord::new(1, 1)));

    assert_eq!(game.grid().to_ascii(), before);
    assert!(game.grid().pending_requests().is_empty());
    assert!(game.input_enabled());
    assert_eq!(game.selection(), Selection::Idle);
}

#[test]
fn test_release_without_drag_clears_selection() {
    let mut game = coordinator(&["12"], 6);
    game.handle_input(InputEvent::TileTapped(Coord::new(0, 0)));
    assert!(!game.handle_input(InputEvent::Released));
    assert_eq!(game.selection(), Selection::Idle);
    assert_eq!(game.phase(), PhaseKind::Idle);
}

#[test]
fn test_swap_with_empty_cell_is_discarded() {
    let mut game = coordinator(&["1."], 6);
    assert!(!drag(&mut game, Coord::new(0, 0), Coord::new(1, 0)));
    assert_eq!(game.phase(), PhaseKind::Idle);
}

#[test]
fn test_unmatched_swap_reverts_after_swap_time() {
    let mut game = coordinator(&["12", "34"], 6);
    let before = game.grid().to_ascii();
    let a = game.grid().get(Coord::new(0, 0)).unwrap();

    assert!(drag(&mut game, Coord::new(0, 0), Coord::new(1, 0)));
    let ticks = run_until_stable(&mut game, 200);

    // Swap out, then swap back.
    assert!(ticks * TICK_MS >= 2 * SWAP_MS);
    assert_eq!(game.grid().to_ascii(), before);
    let piece = game.grid().piece(a).unwrap();
    assert_eq!(piece.coord(), Coord::new(0, 0));
    assert_eq!(piece.position(), (0.0, 0.0));
    assert!(game.take_report().is_none());
}

#[test]
fn test_chain_reaction_runs_two_waves() {
    let mut game = coordinator(&CHAIN_BOARD, 8);
    assert!(drag(&mut game, Coord::new(1, 2), Coord::new(2, 2)));

    run_until_stable(&mut game, 2000);

    let report = game.take_report().unwrap();
    assert_eq!(report.waves, 2);
    assert_eq!(report.pieces_cleared, 6);
    assert_eq!(report.refills, 1);

    let rows = game.grid().to_ascii();
    assert_eq!(rows[4], "576");
    assert!(rows[3].starts_with('6') && rows[3].ends_with('0'));
    assert_eq!(game.grid().piece_count(), 15);
}

#[test]
fn test_gate_is_closed_for_the_whole_cascade() {
    let mut game = coordinator(&CHAIN_BOARD, 8);
    assert!(drag(&mut game, Coord::new(1, 2), Coord::new(2, 2)));

    // Still swapping: gate open, but the turn is busy.
    assert!(game.input_enabled());
    assert!(!drag(&mut game, Coord::new(0, 0), Coord::new(0, 1)));

    game.tick(SWAP_MS);
    assert_eq!(game.phase(), PhaseKind::Highlighting);
    assert!(!game.input_enabled());

    let mut seen = Vec::new();
    while !game.is_stable() {
        assert!(!game.input_enabled());
        assert!(!drag(&mut game, Coord::new(0, 0), Coord::new(0, 1)));
        if seen.last() != Some(&game.phase()) {
            seen.push(game.phase());
        }
        game.tick(TICK_MS);
    }
    assert!(game.input_enabled());
    assert!(seen.contains(&PhaseKind::Collapsing));
    assert!(seen.contains(&PhaseKind::Refilling));
    assert!(seen.contains(&PhaseKind::Settling));
}

#[test]
fn test_matched_pieces_are_highlighted_then_destroyed() {
    let mut game = coordinator(&["21", "12", "11"], 6);
    assert!(drag(&mut game, Coord::new(0, 1), Coord::new(1, 1)));
    game.board_mut().grid_mut().discard_requests();

    game.tick(SWAP_MS);
    let mut sink: Vec<VisualRequest> = Vec::new();
    game.drain_visual_requests(&mut sink);
    let highlights = sink
        .iter()
        .filter(|r| matches!(r, VisualRequest::SetHighlight { value: Some(_), .. }))
        .count();
    assert_eq!(highlights, 3);

    game.tick(game.board().config().highlight_ms);
    assert_eq!(game.phase(), PhaseKind::Clearing);
    sink.clear();
    game.drain_visual_requests(&mut sink);
    let destroyed = sink
        .iter()
        .filter(|r| matches!(r, VisualRequest::DestroyPiece { .. }))
        .count();
    assert_eq!(destroyed, 3);
}

#[test]
fn test_random_boards_always_settle() {
    for seed in 1..=5 {
        let mut game = Coordinator::new(BoardConfig::default(), seed).unwrap();
        let width = game.grid().width();
        let height = game.grid().height();
        for x in 0..width - 1 {
            for y in 0..height {
                if drag(&mut game, Coord::new(x, y), Coord::new(x + 1, y)) {
                    run_until_stable(&mut game, 20_000);
                }
            }
        }
        assert_eq!(game.grid().piece_count(), (width * height) as usize);
    }
}

#[test]
fn test_draining_every_tick_keeps_the_outbox_bounded() {
    let mut game = Coordinator::new(BoardConfig::default(), 77).unwrap();
    game.drain_visual_requests(&mut NullSink);
    assert!(game.grid().pending_requests().is_empty());

    for turn in 0..20 {
        let from = Coord::new(turn % 7, (turn / 7) % 8);
        drag(&mut game, from, from.offset(1, 0));

        let mut delivered: Vec<VisualRequest> = Vec::new();
        game.drain_visual_requests(&mut delivered);
        for _ in 0..20_000 {
            if game.is_stable() {
                break;
            }
            game.tick(TICK_MS);
            game.drain_visual_requests(&mut delivered);
        }
        assert!(game.is_stable());
        assert!(game.grid().pending_requests().is_empty());

        // A reverted swap costs exactly two moves out and two back.
        if game.take_report().is_none() {
            assert_eq!(delivered.len(), 4, "turn {}", turn);
        }
    }
}

#[test]
fn test_collapse_waits_for_externally_held_pieces() {
    // Swapping (1,0) with (1,1) completes the bottom row; the two rows above
    // then fall one row each.
    let mut game = coordinator(&["565", "314", "121"], 7);
    let held = game.grid().get(Coord::new(0, 1)).unwrap();
    assert!(drag(&mut game, Coord::new(1, 0), Coord::new(1, 1)));

    for _ in 0..2000 {
        if game.phase() == PhaseKind::Collapsing {
            break;
        }
        game.tick(TICK_MS);
    }
    assert_eq!(game.phase(), PhaseKind::Collapsing);
    assert_eq!(game.grid().piece(held).unwrap().coord(), Coord::new(0, 0));

    // A host keeps the piece drawn at its old row: no timeout may fire.
    for _ in 0..200 {
        game.board_mut().grid_mut().set_piece_position(held, 0.0, 1.0);
        game.tick(TICK_MS);
        assert_eq!(game.phase(), PhaseKind::Collapsing);
        assert!(!game.input_enabled());
    }

    // Letting it land resumes the cascade.
    game.board_mut().grid_mut().set_piece_position(held, 0.0, 0.0);
    run_until_stable(&mut game, 2000);
    let report = game.take_report().unwrap();
    assert_eq!(report.waves, 1);
    assert_eq!(report.pieces_cleared, 3);
}
