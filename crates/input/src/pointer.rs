//! Pointer tracking: crossterm mouse events -> board input events.
//!
//! Terminals report presses, drags and releases as separate events with screen
//! coordinates. The tracker remembers whether the left button is down and which
//! board cell the pointer was last over, so a drag only produces an event when
//! it enters a new cell.

use arrayvec::ArrayVec;
use crossterm::event::{MouseButton, MouseEvent, MouseEventKind};

use crate::types::{Coord, InputEvent, ScreenLayout};

/// At most two board events come out of one mouse event
/// (a missed release followed by a new tap).
pub type PointerEvents = ArrayVec<InputEvent, 2>;

#[derive(Debug, Clone, Default)]
pub struct PointerTracker {
    pressed: bool,
    last_cell: Option<Coord>,
}

impl PointerTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_pressed(&self) -> bool {
        self.pressed
    }

    /// Translate one mouse event.
    pub fn handle(&mut self, event: &MouseEvent, layout: &ScreenLayout) -> PointerEvents {
        let mut out = PointerEvents::new();
        let cell = layout.coord_at(event.column, event.row);

        match event.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                // Some terminals drop the release when the pointer leaves the window.
                if self.pressed {
                    out.push(InputEvent::Released);
                }
                self.pressed = true;
                self.last_cell = cell;
                if let Some(at) = cell {
                    out.push(InputEvent::TileTapped(at));
                }
            }
            MouseEventKind::Drag(MouseButton::Left) => {
                if !self.pressed {
                    return out;
                }
                if let Some(at) = cell {
                    if self.last_cell != Some(at) {
                        out.push(InputEvent::TileDraggedOnto(at));
                    }
                }
                self.last_cell = cell;
            }
            MouseEventKind::Up(MouseButton::Left) => {
                self.pressed = false;
                self.last_cell = None;
                out.push(InputEvent::Released);
            }
            _ => {}
        }
        out
    }

    /// Forget any gesture in progress (e.g. after a restart).
    pub fn reset(&mut self) {
        self.pressed = false;
        self.last_cell = None;
    }
}
