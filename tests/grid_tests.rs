//! Grid tests - bounds, occupancy and piece bookkeeping

use std::io::Write;
use std::sync::{Arc, Mutex};

use match3::core::{Grid, GridError, PieceSet, StartingTile, VisualRequest};
use match3::types::{Coord, MatchValue, PieceId, TileKind};

/// Log writer shared with the test body.
#[derive(Clone, Default)]
struct CapturedLog(Arc<Mutex<Vec<u8>>>);

impl Write for CapturedLog {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

impl CapturedLog {
    fn text(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }
}

/// Run `f` with WARN-level logs captured.
fn with_captured_warnings(f: impl FnOnce()) -> String {
    let log = CapturedLog::default();
    let writer = log.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::WARN)
        .with_ansi(false)
        .with_writer(move || writer.clone())
        .finish();
    tracing::subscriber::with_default(subscriber, f);
    log.text()
}

#[test]
fn test_grid_new_has_one_tile_per_cell() {
    let grid = Grid::new(5, 4);
    assert_eq!(grid.width(), 5);
    assert_eq!(grid.height(), 4);
    assert_eq!(grid.tiles().count(), 20);

    for y in 0..4 {
        for x in 0..5 {
            let at = Coord::new(x, y);
            assert!(grid.is_within_bounds(at), "Cell {} should be in bounds", at);
            assert_eq!(grid.tile(at).map(|t| t.kind), Some(TileKind::Normal));
            assert_eq!(grid.get(at), None);
        }
    }
}

#[test]
fn test_grid_out_of_bounds_is_never_a_panic() {
    let mut grid = Grid::new(3, 3);
    for at in [
        Coord::new(-1, 0),
        Coord::new(0, -1),
        Coord::new(3, 0),
        Coord::new(0, 3),
    ] {
        assert!(!grid.is_within_bounds(at));
        assert_eq!(grid.get(at), None);
        assert!(!grid.set(at, Some(PieceId(0))));
        assert!(grid.clear(at).is_none());
        assert!(grid.spawn_piece(MatchValue(1), at).is_none());
    }
    assert_eq!(grid.piece_count(), 0);
}

#[test]
fn test_starting_tiles_are_laid_out_first() {
    let tiles = [
        StartingTile::obstacle(1, 1),
        // Outside the grid: skipped.
        StartingTile::obstacle(9, 9),
        // Repeated position: skipped.
        StartingTile {
            x: 1,
            y: 1,
            z: 3,
            kind: TileKind::Normal,
        },
    ];
    let grid = Grid::with_tiles(3, 3, &tiles);
    assert!(grid.is_obstacle(Coord::new(1, 1)));

    let created: Vec<_> = grid
        .pending_requests()
        .iter()
        .filter(|r| matches!(r, VisualRequest::InstantiateTile { .. }))
        .collect();
    assert_eq!(created.len(), 9);
    assert_eq!(
        *created[0],
        VisualRequest::InstantiateTile {
            kind: TileKind::Obstacle,
            at: Coord::new(1, 1),
            z: 0
        }
    );
}

#[test]
fn test_obstacles_refuse_pieces() {
    let mut grid = Grid::from_ascii(&["#1"]).unwrap();
    let obstacle = Coord::new(0, 0);
    assert!(grid.spawn_piece(MatchValue(2), obstacle).is_none());

    let id = grid.get(Coord::new(1, 0)).unwrap();
    assert!(!grid.set(obstacle, Some(id)));
    assert!(!grid.move_piece(id, obstacle, 100));

    grid.place(id, obstacle);
    assert_eq!(grid.get(obstacle), None);
    assert_eq!(grid.verify(), Ok(()));
}

#[test]
fn test_place_snaps_position_and_updates_coords() {
    let mut grid = Grid::from_ascii(&["1.", ".."]).unwrap();
    let id = grid.get(Coord::new(0, 1)).unwrap();
    grid.discard_requests();

    grid.place(id, Coord::new(1, 0));

    let piece = grid.piece(id).unwrap();
    assert_eq!(piece.coord(), Coord::new(1, 0));
    assert_eq!(piece.position(), (1.0, 0.0));
    assert_eq!(grid.get(Coord::new(0, 1)), None);
    assert_eq!(grid.get(Coord::new(1, 0)), Some(id));
    assert_eq!(
        grid.pending_requests(),
        &[VisualRequest::SetPiecePosition { id, x: 1.0, y: 0.0 }]
    );
}

#[test]
fn test_place_out_of_bounds_leaves_piece_off_the_board() {
    let mut grid = Grid::from_ascii(&["1"]).unwrap();
    let id = grid.get(Coord::new(0, 0)).unwrap();
    grid.place(id, Coord::new(4, 4));

    assert_eq!(grid.piece(id).map(|p| p.coord()), Some(Coord::new(4, 4)));
    assert_eq!(grid.get(Coord::new(0, 0)), None);
    assert_eq!(grid.verify(), Ok(()));
}

#[test]
fn test_place_unknown_piece_is_skipped() {
    let mut grid = Grid::new(2, 2);
    grid.discard_requests();
    grid.place(PieceId(42), Coord::new(0, 0));
    assert_eq!(grid.get(Coord::new(0, 0)), None);
    assert!(grid.pending_requests().is_empty());
}

#[test]
fn test_clear_always_resets_the_highlight() {
    let mut grid = Grid::from_ascii(&["1."]).unwrap();
    let id = grid.get(Coord::new(0, 0)).unwrap();
    grid.discard_requests();

    let removed = grid.clear(Coord::new(0, 0));
    assert_eq!(removed.map(|p| p.id()), Some(id));
    assert!(grid.clear(Coord::new(1, 0)).is_none());

    assert_eq!(
        grid.pending_requests(),
        &[
            VisualRequest::DestroyPiece { id },
            VisualRequest::SetHighlight {
                at: Coord::new(0, 0),
                value: None
            },
            VisualRequest::SetHighlight {
                at: Coord::new(1, 0),
                value: None
            },
        ]
    );
    assert!(grid.piece(id).is_none());
}

#[test]
fn test_clear_pieces_reports_cleared_coordinates() {
    let mut grid = Grid::from_ascii(&["123"]).unwrap();
    let a = grid.get(Coord::new(0, 0)).unwrap();
    let c = grid.get(Coord::new(2, 0)).unwrap();
    let set: PieceSet = [c, a, PieceId(99)].into_iter().collect();

    let cleared = grid.clear_pieces(&set);
    assert_eq!(cleared, vec![Coord::new(2, 0), Coord::new(0, 0)]);
    assert_eq!(grid.to_ascii(), vec![".2.".to_string()]);
}

#[test]
fn test_highlight_pieces_uses_piece_values() {
    let mut grid = Grid::from_ascii(&["45"]).unwrap();
    let a = grid.get(Coord::new(0, 0)).unwrap();
    grid.discard_requests();

    grid.highlight_pieces(&[a].into_iter().collect());
    assert_eq!(
        grid.pending_requests(),
        &[VisualRequest::SetHighlight {
            at: Coord::new(0, 0),
            value: Some(MatchValue(4))
        }]
    );
}

#[test]
fn test_drain_requests_empties_the_outbox() {
    let mut grid = Grid::from_ascii(&["1"]).unwrap();
    let mut sink: Vec<VisualRequest> = Vec::new();
    grid.drain_requests(&mut sink);

    assert_eq!(sink.len(), 3); // tile, piece, snap
    assert!(grid.pending_requests().is_empty());
}

#[test]
fn test_clear_all_empties_the_board() {
    let mut grid = Grid::from_ascii(&["12", "3#"]).unwrap();
    grid.clear_all();
    assert_eq!(grid.piece_count(), 0);
    assert_eq!(grid.to_ascii(), vec!["..".to_string(), ".#".to_string()]);
}

#[test]
fn test_ascii_parse_errors() {
    assert_eq!(Grid::from_ascii(&[]).unwrap_err(), GridError::EmptyLayout);
    assert_eq!(
        Grid::from_ascii(&["12", "1"]).unwrap_err(),
        GridError::RaggedRow {
            row: 1,
            expected: 2,
            found: 1
        }
    );
    assert_eq!(
        Grid::from_ascii(&["1x"]).unwrap_err(),
        GridError::InvalidChar {
            ch: 'x',
            row: 0,
            col: 1
        }
    );
}

#[test]
fn test_verify_detects_coordinate_mismatch() {
    let mut grid = Grid::from_ascii(&["1."]).unwrap();
    let id = grid.get(Coord::new(0, 0)).unwrap();
    // Raw occupancy write without moving the piece.
    assert!(grid.set(Coord::new(1, 0), Some(id)));
    assert_eq!(
        grid.verify(),
        Err(GridError::CoordMismatch {
            at: Coord::new(1, 0),
            id,
            found: Coord::new(0, 0)
        })
    );
}

#[test]
fn test_place_onto_a_live_piece_displaces_it_with_a_warning() {
    let mut grid = Grid::from_ascii(&["12"]).unwrap();
    let a = grid.get(Coord::new(0, 0)).unwrap();
    let b = grid.get(Coord::new(1, 0)).unwrap();

    let log = with_captured_warnings(|| grid.place(a, Coord::new(1, 0)));

    assert!(log.contains("overwriting a live piece"), "log was: {log}");
    assert_eq!(grid.get(Coord::new(1, 0)), Some(a));
    assert_eq!(grid.get(Coord::new(0, 0)), None);
    // The displaced piece keeps its record but no slot references it.
    assert_eq!(grid.piece(b).map(|p| p.coord()), Some(Coord::new(1, 0)));
    assert_eq!(grid.piece_count(), 2);
    assert_eq!(grid.verify(), Ok(()));
}

#[test]
fn test_place_back_into_own_slot_is_silent() {
    let mut grid = Grid::from_ascii(&["1"]).unwrap();
    let a = grid.get(Coord::new(0, 0)).unwrap();

    let log = with_captured_warnings(|| grid.place(a, Coord::new(0, 0)));

    assert!(log.is_empty(), "log was: {log}");
    assert_eq!(grid.get(Coord::new(0, 0)), Some(a));
}
