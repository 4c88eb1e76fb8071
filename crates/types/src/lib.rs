//! Core types module - shared data structures and constants
//!
//! This module defines the plain data used throughout the workspace.
//! Nothing here has behaviour beyond small conversions, so the types are
//! usable by the simulation core, the input mapping and the terminal view alike.
//!
//! # Coordinates
//!
//! Boards are addressed with signed [`Coord`]s so that out-of-range requests
//! (negative or past the edge) can be represented and rejected gracefully.
//!
//! - `x` grows to the right (column index)
//! - `y` grows upward (row index); row 0 is the bottom row and gravity pulls toward it
//!
//! # Timing Constants
//!
//! Timing values are in milliseconds:
//!
//! | Constant | Value | Description |
//! |----------|-------|-------------|
//! | `TICK_MS` | 16 | Fixed timestep interval (~60 FPS) |
//! | `SWAP_MS` | 300 | Duration of a swap (and of its revert) |
//! | `COLLAPSE_BASE_MS` | 100 | Fall time per row during collapse |
//! | `HIGHLIGHT_MS` | 500 | Highlight shown before a wave is cleared |
//! | `CLEAR_DELAY_MS` | 250 | Pause between clearing and collapsing |
//! | `COLLAPSE_SETTLE_MS` | 250 | Pause after collapsed pieces settle |
//! | `REFILL_SETTLE_MS` | 250 | Pause after a refill before re-matching |
//! | `FILL_MOVE_MS` | 500 | Drop-in animation of freshly filled pieces |
//!
//! # Examples
//!
//! ```
//! use match3_types::{Coord, InputEvent, TileKind};
//!
//! let a = Coord::new(2, 3);
//! assert!(a.is_adjacent(Coord::new(2, 4)));
//! assert!(!a.is_adjacent(Coord::new(3, 4)));
//!
//! assert_eq!(TileKind::from_str("obstacle"), Some(TileKind::Obstacle));
//! assert_eq!(InputEvent::Released.as_str(), "released");
//! ```

use serde::{Deserialize, Serialize};

/// Default board width in cells
pub const DEFAULT_WIDTH: u16 = 8;

/// Default board height in cells
pub const DEFAULT_HEIGHT: u16 = 8;

/// Default margin (in cells) kept around the board when framing the camera
pub const DEFAULT_BORDER_SIZE: u16 = 2;

/// Default number of distinct piece values
pub const DEFAULT_PALETTE_SIZE: u8 = 6;

/// Fixed timestep interval in milliseconds (16ms ≈ 60 FPS)
pub const TICK_MS: u32 = 16;

/// Swap animation duration
pub const SWAP_MS: u32 = 300;

/// Collapse time per row fallen
pub const COLLAPSE_BASE_MS: u32 = 100;

/// Highlight duration before a wave is cleared
pub const HIGHLIGHT_MS: u32 = 500;

/// Pause between clearing a wave and collapsing its columns
pub const CLEAR_DELAY_MS: u32 = 250;

/// Pause after every collapsed piece has settled
pub const COLLAPSE_SETTLE_MS: u32 = 250;

/// Pause after a refill before the next wave starts
pub const REFILL_SETTLE_MS: u32 = 250;

/// Rows above its slot a refilled piece starts from
pub const FILL_FALL_OFFSET: i32 = 10;

/// Drop-in animation duration for refilled pieces
pub const FILL_MOVE_MS: u32 = 500;

/// Refill attempts per cell before a matching value is accepted
pub const FILL_MAX_ITERATIONS: u32 = 100;

/// Minimum run length that counts as a match
pub const MIN_MATCH_LEN: usize = 3;

/// Tolerance for "piece has reached its row"
pub const SETTLE_EPSILON: f32 = 0.001;


/// A board position. See the module docs for axis orientation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub struct Coord {
    pub x: i32,
    pub y: i32,
}

impl Coord {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Offset by `(dx, dy)`.
    pub const fn offset(self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }

    /// True when exactly one axis distance is 1 and the other is 0.
    pub fn is_adjacent(self, other: Coord) -> bool {
        let dx = (self.x - other.x).abs();
        let dy = (self.y - other.y).abs();
        (dx == 1 && dy == 0) || (dx == 0 && dy == 1)
    }
}

impl std::fmt::Display for Coord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Tile kinds
///
/// - **Normal**: can hold a piece
/// - **Obstacle**: never holds a piece; skipped by fill, collapse and matching
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TileKind {
    #[default]
    Normal,
    Obstacle,
}

impl TileKind {
    /// Parse tile kind from string (case-insensitive)
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "normal" => Some(TileKind::Normal),
            "obstacle" => Some(TileKind::Obstacle),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TileKind::Normal => "normal",
            TileKind::Obstacle => "obstacle",
        }
    }
}

/// A piece's colour/kind, an index into the palette.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MatchValue(pub u8);

impl MatchValue {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Stable handle of a live piece.
///
/// Handles are never reused within one grid, so a handle to a cleared piece
/// simply stops resolving.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PieceId(pub u32);

/// Pointer gestures fed to the coordinator by the input layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    /// Pointer pressed on a tile
    TileTapped(Coord),
    /// Pointer entered a tile while a gesture is in progress
    TileDraggedOnto(Coord),
    /// Pointer released
    Released,
}

impl InputEvent {
    /// Event name for logs and scripted input
    pub fn as_str(&self) -> &'static str {
        match self {
            InputEvent::TileTapped(_) => "tileTapped",
            InputEvent::TileDraggedOnto(_) => "tileDraggedOnto",
            InputEvent::Released => "released",
        }
    }

    /// Board coordinate carried by the event, if any
    pub fn coord(&self) -> Option<Coord> {
        match self {
            InputEvent::TileTapped(c) | InputEvent::TileDraggedOnto(c) => Some(*c),
            InputEvent::Released => None,
        }
    }
}

/// Where the board sits on a character screen.
///
/// Shared by the renderer (which computes it) and the pointer mapping (which
/// turns mouse cells back into board coordinates).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ScreenLayout {
    /// Screen column of the board's left edge
    pub origin_x: u16,
    /// Screen row of the board's top edge
    pub origin_y: u16,
    /// Terminal columns per board cell
    pub cell_w: u16,
    /// Terminal rows per board cell
    pub cell_h: u16,
    /// Board width in cells
    pub columns: u16,
    /// Board height in cells
    pub rows: u16,
}

impl ScreenLayout {
    /// Board coordinate under screen cell `(col, row)`, if any.
    pub fn coord_at(&self, col: u16, row: u16) -> Option<Coord> {
        if self.cell_w == 0 || self.cell_h == 0 {
            return None;
        }
        if col < self.origin_x || row < self.origin_y {
            return None;
        }
        let cx = (col - self.origin_x) / self.cell_w;
        let cy = (row - self.origin_y) / self.cell_h;
        if cx >= self.columns || cy >= self.rows {
            return None;
        }
        Some(Coord::new(cx as i32, (self.rows - 1 - cy) as i32))
    }

    /// Top-left screen cell of a board coordinate.
    pub fn screen_origin(&self, at: Coord) -> Option<(u16, u16)> {
        if at.x < 0 || at.y < 0 || at.x >= self.columns as i32 || at.y >= self.rows as i32 {
            return None;
        }
        let sx = self.origin_x + at.x as u16 * self.cell_w;
        let sy = self.origin_y + (self.rows - 1 - at.y as u16) * self.cell_h;
        Some((sx, sy))
    }
}
