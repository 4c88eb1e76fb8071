//! Visual requests - what the core asks of the rendering layer.
//!
//! The core never draws anything. Every grid mutation that a renderer would
//! care about is queued as a [`VisualRequest`] in the grid's outbox, and the
//! host drains the outbox into a [`VisualSink`] once per frame. Requests are
//! fire-and-forget: the core does not wait for acknowledgement, it only polls
//! piece positions when it needs to know that a fall has finished.

use crate::types::{Coord, MatchValue, PieceId, TileKind};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum VisualRequest {
    /// A tile was created during board setup.
    InstantiateTile { kind: TileKind, at: Coord, z: i32 },
    /// A piece was created and placed at `at`.
    InstantiatePiece {
        id: PieceId,
        value: MatchValue,
        at: Coord,
    },
    /// Snap a piece's rendered position.
    SetPiecePosition { id: PieceId, x: f32, y: f32 },
    /// Animate a piece to `to` over `duration_ms`.
    MovePiece {
        id: PieceId,
        to: Coord,
        duration_ms: u32,
    },
    /// Highlight a tile with a piece colour, or reset it with `None`.
    SetHighlight { at: Coord, value: Option<MatchValue> },
    /// A piece was removed from play.
    DestroyPiece { id: PieceId },
}

/// Consumer of visual requests.
pub trait VisualSink {
    fn handle(&mut self, request: &VisualRequest);
}

/// Recording sink, handy for tests and replay tooling.
impl VisualSink for Vec<VisualRequest> {
    fn handle(&mut self, request: &VisualRequest) {
        self.push(*request);
    }
}

/// Sink that drops everything (headless runs).
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl VisualSink for NullSink {
    fn handle(&mut self, _request: &VisualRequest) {}
}
