//! Terminal "game renderer" module.
//!
//! This is a small, game-oriented rendering layer for terminal gameplay.
//! It intentionally avoids widget toolkits and instead renders into a simple
//! framebuffer that is flushed to a terminal backend.
//!
//! - [`BoardView`] draws a [`Coordinator`](core::Coordinator) (tiles, pieces
//!   at their rendered positions, highlights, status panel)
//! - [`HighlightLayer`] is the [`VisualSink`](core::VisualSink) that tracks
//!   tile highlights
//! - [`CameraFrame`] frames the board and picks the cell size
//! - [`TerminalRenderer`] diffs frames and writes them out

pub mod board_view;
pub mod camera;
pub mod fb;
pub mod highlight;
pub mod renderer;

pub use match3_core as core;
pub use match3_types as types;

pub use board_view::{value_color, BoardView, StatusView, Viewport};
pub use camera::CameraFrame;
pub use fb::{Cell, CellStyle, FrameBuffer, Rgb};
pub use highlight::HighlightLayer;
pub use renderer::{encode_diff_into, encode_full_into, TerminalRenderer};
