//! Core game logic module - pure, deterministic, and testable
//!
//! This crate contains the match-3 rules and the turn-resolution state machine.
//! It has no dependencies on terminals or input devices, which makes it:
//!
//! - **Deterministic**: Same seed produces identical boards and cascades
//! - **Testable**: Every rule is a plain function over a [`Grid`]
//! - **Portable**: Runs in any host (terminal, headless simulation, benches)
//!
//! # Module Structure
//!
//! - [`grid`]: tiles, piece occupancy, piece records and the visual outbox
//! - [`matcher`]: directional run scanning and match merging
//! - [`collapse`]: gravity collapse of emptied columns
//! - [`fill`]: random refill that avoids creating runs
//! - [`board`]: the board context (grid, input gate, RNG, config)
//! - [`cascade`]: the [`Coordinator`] state machine driving turns
//! - [`config`]: serde configuration and environment overrides
//! - [`visual`]: requests the core sends to a renderer
//!
//! # Game Rules
//!
//! - Swapping two adjacent pieces is kept only if it creates a run of three or more
//! - Runs are highlighted, cleared, and the columns above them collapse
//! - Pieces moved by a collapse are re-checked; new runs chain into another wave
//! - When nothing chains, empty cells are refilled and the whole board is re-checked
//! - Input is gated off for the whole cascade
//!
//! # Example
//!
//! ```
//! use match3_core::{BoardConfig, Coordinator};
//! use match3_types::{Coord, InputEvent, TICK_MS};
//!
//! let mut game = Coordinator::new(BoardConfig::default(), 12345).unwrap();
//! assert!(game.is_stable());
//!
//! game.handle_input(InputEvent::TileTapped(Coord::new(0, 0)));
//! game.handle_input(InputEvent::TileDraggedOnto(Coord::new(1, 0)));
//! game.handle_input(InputEvent::Released);
//!
//! for _ in 0..1000 {
//!     game.tick(TICK_MS);
//! }
//! assert!(game.is_stable());
//! assert!(game.grid().verify().is_ok());
//! ```
//!
//! # Timing
//!
//! The coordinator uses a fixed timestep. Call
//! [`Coordinator::tick`](cascade::Coordinator::tick) every frame with the
//! elapsed time; motion advances first, then the phase machine.

pub mod board;
pub mod cascade;
pub mod collapse;
pub mod config;
pub mod fill;
pub mod grid;
pub mod matcher;
pub mod piece_set;
pub mod rng;
pub mod visual;

pub use match3_types as types;

pub use board::{Board, InputGate};
pub use cascade::{CascadeReport, Coordinator, PhaseKind, Selection};
pub use collapse::{collapse_column, collapse_columns};
pub use config::{BoardConfig, ConfigError, StartingTile};
pub use fill::{fill_board, fill_random_at, FillReport};
pub use grid::{Grid, GridError, Piece, Tile};
pub use matcher::{
    all_matches, has_match_on_fill, matches_for_pieces, matches_through_cell, scan_direction,
    Direction,
};
pub use piece_set::PieceSet;
pub use rng::SimpleRng;
pub use visual::{NullSink, VisualRequest, VisualSink};
