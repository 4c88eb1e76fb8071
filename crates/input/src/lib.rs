//! Terminal input module (engine-facing).
//!
//! This module is intentionally independent of any UI framework. It maps
//! `crossterm` mouse events into board [`InputEvent`](crate::types::InputEvent)s
//! through a [`ScreenLayout`](crate::types::ScreenLayout), and key events into
//! a few host commands.

pub mod map;
pub mod pointer;

pub use match3_types as types;

pub use map::{handle_key_event, should_quit, KeyCommand};
pub use pointer::PointerTracker;
