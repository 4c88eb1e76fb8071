//! HighlightLayer: tile highlight state fed by the core's visual requests.

use std::collections::HashMap;

use crate::core::{VisualRequest, VisualSink};
use crate::types::{Coord, MatchValue};

/// Which tiles are highlighted, and with which piece colour.
///
/// Everything other than highlight requests is ignored: pieces are drawn from
/// the grid directly.
#[derive(Debug, Clone, Default)]
pub struct HighlightLayer {
    tiles: HashMap<Coord, MatchValue>,
}

impl HighlightLayer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, at: Coord) -> Option<MatchValue> {
        self.tiles.get(&at).copied()
    }

    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    pub fn clear(&mut self) {
        self.tiles.clear();
    }
}

impl VisualSink for HighlightLayer {
    fn handle(&mut self, request: &VisualRequest) {
        if let VisualRequest::SetHighlight { at, value } = *request {
            match value {
                Some(v) => {
                    self.tiles.insert(at, v);
                }
                None => {
                    self.tiles.remove(&at);
                }
            }
        }
    }
}
