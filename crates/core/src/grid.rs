//! Grid module - tiles, piece occupancy and piece records
//!
//! The grid is a `width x height` array of [`Tile`]s plus a parallel occupancy
//! array of optional [`PieceId`]s. Piece records live in a map keyed by id; the
//! occupancy array only references them.
//!
//! Both arrays are flat, row-major (`y * width + x`). Row 0 is the bottom row.
//!
//! Two invariants hold at every public method boundary:
//!
//! - an occupied slot `(x, y)` references a piece whose `coord()` is `(x, y)`
//! - obstacle slots are never occupied
//!
//! Coordinates outside the grid are never a fault: every coordinate-taking
//! method logs and does nothing (or returns `None`/`false`).

use std::collections::HashMap;

use thiserror::Error;
use tracing::{trace, warn};

use crate::config::StartingTile;
use crate::piece_set::PieceSet;
use crate::types::{Coord, MatchValue, PieceId, TileKind, SETTLE_EPSILON};
use crate::visual::{VisualRequest, VisualSink};

/// One board cell. Created once at setup and never destroyed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tile {
    pub coord: Coord,
    pub kind: TileKind,
}

impl Tile {
    pub fn is_obstacle(&self) -> bool {
        self.kind == TileKind::Obstacle
    }
}

/// Eased movement from one rendered position to another.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Motion {
    from: (f32, f32),
    to: (f32, f32),
    elapsed_ms: u32,
    duration_ms: u32,
}

impl Motion {
    fn sample(&self) -> (f32, f32) {
        if self.duration_ms == 0 || self.elapsed_ms >= self.duration_ms {
            return self.to;
        }
        let t = self.elapsed_ms as f32 / self.duration_ms as f32;
        // smoothstep
        let t = t * t * (3.0 - 2.0 * t);
        (
            self.from.0 + (self.to.0 - self.from.0) * t,
            self.from.1 + (self.to.1 - self.from.1) * t,
        )
    }

    fn is_finished(&self) -> bool {
        self.elapsed_ms >= self.duration_ms
    }
}

/// A live piece: its value, logical slot and rendered position.
#[derive(Debug, Clone, PartialEq)]
pub struct Piece {
    id: PieceId,
    value: MatchValue,
    coord: Coord,
    position: (f32, f32),
    motion: Option<Motion>,
}

impl Piece {
    pub fn id(&self) -> PieceId {
        self.id
    }

    pub fn value(&self) -> MatchValue {
        self.value
    }

    /// Logical slot. Always equal to the occupancy index referencing the piece.
    pub fn coord(&self) -> Coord {
        self.coord
    }

    /// Rendered position; lags behind `coord()` while a motion is running.
    pub fn position(&self) -> (f32, f32) {
        self.position
    }

    pub fn is_moving(&self) -> bool {
        self.motion.is_some()
    }

    /// Rendered row is within [`SETTLE_EPSILON`] of the logical row.
    pub fn is_settled(&self) -> bool {
        (self.position.1 - self.coord.y as f32).abs() < SETTLE_EPSILON
    }

    fn step_motion(&mut self, elapsed_ms: u32) {
        if let Some(motion) = self.motion.as_mut() {
            motion.elapsed_ms = motion.elapsed_ms.saturating_add(elapsed_ms);
            self.position = motion.sample();
            if motion.is_finished() {
                self.motion = None;
            }
        }
    }
}

/// Errors from parsing layouts or checking grid invariants.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum GridError {
    #[error("layout has no rows")]
    EmptyLayout,
    #[error("layout row {row} has {found} cells, expected {expected}")]
    RaggedRow {
        row: usize,
        expected: usize,
        found: usize,
    },
    #[error("unexpected character {ch:?} at layout row {row}, column {col}")]
    InvalidChar { ch: char, row: usize, col: usize },
    #[error("slot {at} references missing piece {id:?}")]
    DanglingReference { at: Coord, id: PieceId },
    #[error("slot {at} references piece {id:?} whose coordinates are {found}")]
    CoordMismatch { at: Coord, id: PieceId, found: Coord },
    #[error("obstacle at {at} holds piece {id:?}")]
    OccupiedObstacle { at: Coord, id: PieceId },
}

/// The board grid. See the module docs for layout and invariants.
#[derive(Debug, Clone)]
pub struct Grid {
    width: i32,
    height: i32,
    tiles: Vec<Tile>,
    occupancy: Vec<Option<PieceId>>,
    pieces: HashMap<PieceId, Piece>,
    next_piece_id: u32,
    requests: Vec<VisualRequest>,
}

impl Grid {
    /// Create a grid of normal tiles.
    pub fn new(width: u16, height: u16) -> Self {
        Self::with_tiles(width, height, &[])
    }

    /// Create a grid, laying out `starting_tiles` first and filling every
    /// remaining position with a normal tile.
    ///
    /// Starting tiles outside the grid, or repeating an earlier position, are
    /// logged and skipped.
    pub fn with_tiles(width: u16, height: u16, starting_tiles: &[StartingTile]) -> Self {
        let w = width as i32;
        let h = height as i32;
        let len = (width as usize) * (height as usize);

        let mut requests = Vec::with_capacity(len);
        let mut kinds: Vec<Option<TileKind>> = vec![None; len];

        for st in starting_tiles {
            let at = Coord::new(st.x, st.y);
            let Some(idx) = Self::index_in(w, h, at) else {
                warn!(%at, "starting tile outside the grid, skipped");
                continue;
            };
            if kinds[idx].is_some() {
                warn!(%at, "duplicate starting tile, skipped");
                continue;
            }
            kinds[idx] = Some(st.kind);
            requests.push(VisualRequest::InstantiateTile {
                kind: st.kind,
                at,
                z: st.z,
            });
        }

        for x in 0..w {
            for y in 0..h {
                let idx = (y * w + x) as usize;
                if kinds[idx].is_none() {
                    kinds[idx] = Some(TileKind::Normal);
                    requests.push(VisualRequest::InstantiateTile {
                        kind: TileKind::Normal,
                        at: Coord::new(x, y),
                        z: 0,
                    });
                }
            }
        }

        let tiles = kinds
            .into_iter()
            .enumerate()
            .map(|(idx, kind)| Tile {
                coord: Coord::new(idx as i32 % w.max(1), idx as i32 / w.max(1)),
                kind: kind.unwrap_or_default(),
            })
            .collect();

        Self {
            width: w,
            height: h,
            tiles,
            occupancy: vec![None; len],
            pieces: HashMap::new(),
            next_piece_id: 0,
            requests,
        }
    }

    /// Parse a layout, top row first.
    ///
    /// `.` is an empty normal tile, `#` an obstacle, `0`-`9` a piece with that
    /// value. Whitespace between cells is ignored.
    ///
    /// ```
    /// use match3_core::Grid;
    ///
    /// let grid = Grid::from_ascii(&["1.#", "001"]).unwrap();
    /// assert_eq!(grid.width(), 3);
    /// assert_eq!(grid.to_ascii(), vec!["1.#".to_string(), "001".to_string()]);
    /// ```
    pub fn from_ascii(rows: &[&str]) -> Result<Self, GridError> {
        let parsed: Vec<Vec<char>> = rows
            .iter()
            .map(|r| r.chars().filter(|c| !c.is_whitespace()).collect())
            .collect();
        let Some(first) = parsed.first() else {
            return Err(GridError::EmptyLayout);
        };
        let width = first.len();
        if width == 0 {
            return Err(GridError::EmptyLayout);
        }
        let height = parsed.len();

        let mut obstacles = Vec::new();
        let mut placements = Vec::new();
        for (row, cells) in parsed.iter().enumerate() {
            if cells.len() != width {
                return Err(GridError::RaggedRow {
                    row,
                    expected: width,
                    found: cells.len(),
                });
            }
            let y = (height - 1 - row) as i32;
            for (col, &ch) in cells.iter().enumerate() {
                let at = Coord::new(col as i32, y);
                match ch {
                    '.' => {}
                    '#' => obstacles.push(StartingTile::obstacle(at.x, at.y)),
                    '0'..='9' => placements.push((at, MatchValue(ch as u8 - b'0'))),
                    _ => return Err(GridError::InvalidChar { ch, row, col }),
                }
            }
        }

        let mut grid = Grid::with_tiles(width as u16, height as u16, &obstacles);
        for (at, value) in placements {
            grid.spawn_piece(value, at);
        }
        Ok(grid)
    }

    /// Render the grid in the [`Grid::from_ascii`] format, top row first.
    pub fn to_ascii(&self) -> Vec<String> {
        (0..self.height)
            .rev()
            .map(|y| {
                (0..self.width)
                    .map(|x| {
                        let at = Coord::new(x, y);
                        if self.is_obstacle(at) {
                            '#'
                        } else {
                            match self.value_at(at) {
                                Some(v) if v.0 < 10 => (b'0' + v.0) as char,
                                Some(_) => '?',
                                None => '.',
                            }
                        }
                    })
                    .collect()
            })
            .collect()
    }

    #[inline(always)]
    fn index_in(width: i32, height: i32, at: Coord) -> Option<usize> {
        if at.x < 0 || at.x >= width || at.y < 0 || at.y >= height {
            return None;
        }
        Some((at.y * width + at.x) as usize)
    }

    #[inline(always)]
    fn index(&self, at: Coord) -> Option<usize> {
        Self::index_in(self.width, self.height, at)
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    pub fn is_within_bounds(&self, at: Coord) -> bool {
        self.index(at).is_some()
    }

    pub fn tile(&self, at: Coord) -> Option<&Tile> {
        self.index(at).map(|idx| &self.tiles[idx])
    }

    pub fn tiles(&self) -> impl Iterator<Item = &Tile> {
        self.tiles.iter()
    }

    /// True only for in-bounds obstacle tiles.
    pub fn is_obstacle(&self, at: Coord) -> bool {
        self.tile(at).is_some_and(Tile::is_obstacle)
    }

    /// Occupancy at `at`; `None` for empty or out-of-range slots.
    pub fn get(&self, at: Coord) -> Option<PieceId> {
        self.index(at).and_then(|idx| self.occupancy[idx])
    }

    /// Raw occupancy write. Returns false (and logs) for out-of-range slots or
    /// for an attempt to occupy an obstacle.
    ///
    /// This does not touch the piece's coordinates; prefer [`Grid::place`] or
    /// [`Grid::move_piece`] which keep the two in step.
    pub fn set(&mut self, at: Coord, id: Option<PieceId>) -> bool {
        let Some(idx) = self.index(at) else {
            warn!(%at, "occupancy write out of bounds");
            return false;
        };
        if id.is_some() && self.tiles[idx].is_obstacle() {
            warn!(%at, "refusing to occupy an obstacle");
            return false;
        }
        self.occupancy[idx] = id;
        true
    }

    pub fn piece(&self, id: PieceId) -> Option<&Piece> {
        self.pieces.get(&id)
    }

    pub fn piece_at(&self, at: Coord) -> Option<&Piece> {
        self.get(at).and_then(|id| self.pieces.get(&id))
    }

    pub fn value_at(&self, at: Coord) -> Option<MatchValue> {
        self.piece_at(at).map(Piece::value)
    }

    pub fn pieces(&self) -> impl Iterator<Item = &Piece> {
        self.pieces.values()
    }

    pub fn piece_count(&self) -> usize {
        self.pieces.len()
    }

    /// Instantiate a piece and place it at `at`.
    ///
    /// Returns `None` (and logs) when `at` is outside the grid or an obstacle,
    /// in which case no piece is created.
    pub fn spawn_piece(&mut self, value: MatchValue, at: Coord) -> Option<PieceId> {
        if !self.is_within_bounds(at) {
            warn!(%at, "spawn out of bounds");
            return None;
        }
        if self.is_obstacle(at) {
            warn!(%at, "spawn on an obstacle");
            return None;
        }

        let id = PieceId(self.next_piece_id);
        self.next_piece_id = self.next_piece_id.wrapping_add(1);
        self.pieces.insert(
            id,
            Piece {
                id,
                value,
                coord: at,
                position: (at.x as f32, at.y as f32),
                motion: None,
            },
        );
        self.requests
            .push(VisualRequest::InstantiatePiece { id, value, at });
        self.place(id, at);
        Some(id)
    }

    /// Put a piece at `at`, snapping its rendered position there.
    ///
    /// The piece's coordinates are always updated. The occupancy array is only
    /// written when `at` is inside the grid and not an obstacle; otherwise the
    /// failure is logged and the piece is left off the board. A different live
    /// piece already in the slot is displaced (logged): it keeps its record and
    /// coordinates but no slot references it any more.
    pub fn place(&mut self, id: PieceId, at: Coord) {
        let Some(piece) = self.pieces.get_mut(&id) else {
            warn!(?id, %at, "place: invalid piece");
            return;
        };
        let previous = piece.coord;
        piece.coord = at;
        piece.position = (at.x as f32, at.y as f32);
        piece.motion = None;
        self.requests.push(VisualRequest::SetPiecePosition {
            id,
            x: at.x as f32,
            y: at.y as f32,
        });

        self.release_slot(previous, id);
        match self.index(at) {
            Some(idx) if self.tiles[idx].is_obstacle() => {
                warn!(?id, %at, "place: target is an obstacle");
            }
            Some(idx) => {
                if let Some(other) = self.occupancy[idx] {
                    if other != id && self.pieces.contains_key(&other) {
                        warn!(?id, %at, displaced = ?other, "place: overwriting a live piece");
                    }
                }
                self.occupancy[idx] = Some(id);
            }
            None => warn!(?id, %at, "place: out of bounds"),
        }
    }

    /// Relocate a piece logically right away and animate it there.
    ///
    /// Returns false (and logs) for an unknown piece or an unusable target, in
    /// which case nothing changes.
    pub fn move_piece(&mut self, id: PieceId, to: Coord, duration_ms: u32) -> bool {
        let Some(idx) = self.index(to) else {
            warn!(?id, %to, "move: out of bounds");
            return false;
        };
        if self.tiles[idx].is_obstacle() {
            warn!(?id, %to, "move: target is an obstacle");
            return false;
        }
        let Some(piece) = self.pieces.get_mut(&id) else {
            warn!(?id, %to, "move: invalid piece");
            return false;
        };

        let previous = piece.coord;
        piece.coord = to;
        piece.motion = Some(Motion {
            from: piece.position,
            to: (to.x as f32, to.y as f32),
            elapsed_ms: 0,
            duration_ms,
        });
        trace!(?id, from = %previous, %to, duration_ms, "move");

        self.release_slot(previous, id);
        self.occupancy[idx] = Some(id);
        self.requests.push(VisualRequest::MovePiece {
            id,
            to,
            duration_ms,
        });
        true
    }

    /// Snap a piece's rendered position, cancelling any running motion.
    ///
    /// Used for drop-in effects and by hosts that drive animation themselves.
    pub fn set_piece_position(&mut self, id: PieceId, x: f32, y: f32) {
        let Some(piece) = self.pieces.get_mut(&id) else {
            warn!(?id, "set position: invalid piece");
            return;
        };
        piece.position = (x, y);
        piece.motion = None;
        self.requests
            .push(VisualRequest::SetPiecePosition { id, x, y });
    }

    // Empty `at` if it still references `id`.
    fn release_slot(&mut self, at: Coord, id: PieceId) {
        if let Some(idx) = self.index(at) {
            if self.occupancy[idx] == Some(id) {
                self.occupancy[idx] = None;
            }
        }
    }

    /// Destroy the piece at `at` (if any) and reset the tile highlight.
    pub fn clear(&mut self, at: Coord) -> Option<Piece> {
        let Some(idx) = self.index(at) else {
            warn!(%at, "clear out of bounds");
            return None;
        };
        let removed = self.occupancy[idx]
            .take()
            .and_then(|id| self.pieces.remove(&id));
        if let Some(piece) = &removed {
            self.requests
                .push(VisualRequest::DestroyPiece { id: piece.id });
        }
        self.requests
            .push(VisualRequest::SetHighlight { at, value: None });
        removed
    }

    /// Clear every piece of `set` still on the grid.
    ///
    /// Returns the coordinates that were cleared, in set order.
    pub fn clear_pieces(&mut self, set: &PieceSet) -> Vec<Coord> {
        let mut cleared = Vec::with_capacity(set.len());
        for &id in set {
            let Some(at) = self.pieces.get(&id).map(Piece::coord) else {
                continue;
            };
            if self.get(at) == Some(id) && self.clear(at).is_some() {
                cleared.push(at);
            }
        }
        cleared
    }

    /// Clear the whole board.
    pub fn clear_all(&mut self) {
        for x in 0..self.width {
            for y in 0..self.height {
                self.clear(Coord::new(x, y));
            }
        }
    }

    pub fn highlight(&mut self, at: Coord, value: Option<MatchValue>) {
        if !self.is_within_bounds(at) {
            warn!(%at, "highlight out of bounds");
            return;
        }
        self.requests.push(VisualRequest::SetHighlight { at, value });
    }

    /// Highlight every piece of `set` with its own colour.
    pub fn highlight_pieces(&mut self, set: &PieceSet) {
        for &id in set {
            if let Some((at, value)) = self.pieces.get(&id).map(|p| (p.coord, p.value)) {
                self.highlight(at, Some(value));
            }
        }
    }

    /// Advance every running motion by `elapsed_ms`.
    pub fn advance_motion(&mut self, elapsed_ms: u32) {
        for piece in self.pieces.values_mut() {
            piece.step_motion(elapsed_ms);
        }
    }

    /// True when every live piece of `set` has reached its row.
    /// Pieces no longer on the board are ignored.
    pub fn is_settled(&self, set: &PieceSet) -> bool {
        set.iter()
            .filter_map(|id| self.pieces.get(id))
            .all(Piece::is_settled)
    }

    /// Requests queued since the last drain.
    pub fn pending_requests(&self) -> &[VisualRequest] {
        &self.requests
    }

    /// Hand every queued request to `sink`, emptying the outbox.
    pub fn drain_requests(&mut self, sink: &mut impl VisualSink) {
        for request in self.requests.drain(..) {
            sink.handle(&request);
        }
    }

    /// Drop queued requests without delivering them.
    pub fn discard_requests(&mut self) {
        self.requests.clear();
    }

    /// Check the occupancy invariants.
    pub fn verify(&self) -> Result<(), GridError> {
        for (idx, slot) in self.occupancy.iter().enumerate() {
            let Some(id) = *slot else { continue };
            let tile = &self.tiles[idx];
            let at = tile.coord;
            if tile.is_obstacle() {
                return Err(GridError::OccupiedObstacle { at, id });
            }
            let Some(piece) = self.pieces.get(&id) else {
                return Err(GridError::DanglingReference { at, id });
            };
            if piece.coord != at {
                return Err(GridError::CoordMismatch {
                    at,
                    id,
                    found: piece.coord,
                });
            }
        }
        Ok(())
    }
}
