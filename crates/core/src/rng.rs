//! RNG module - deterministic value generation
//!
//! A small LCG drives every random choice in the simulation (piece values on
//! fill, scripted swaps in the headless runner), so the same seed always
//! replays the same board.

use crate::types::MatchValue;

/// Simple LCG (Linear Congruential Generator) RNG
/// Uses constants from Numerical Recipes
#[derive(Debug, Clone)]
pub struct SimpleRng {
    state: u32,
}

impl SimpleRng {
    /// Create a new RNG with the given seed
    pub fn new(seed: u32) -> Self {
        // Avoid 0 seed which would produce all zeros
        let state = if seed == 0 { 1 } else { seed };
        Self { state }
    }

    /// Generate next random u32
    pub fn next_u32(&mut self) -> u32 {
        self.state = self.state.wrapping_mul(1664525).wrapping_add(1013904223);
        self.state
    }

    /// Generate random value in range [0, max)
    ///
    /// The low bits of an LCG cycle with a short period, so the high half is used.
    pub fn next_range(&mut self, max: u32) -> u32 {
        if max == 0 {
            return 0;
        }
        (self.next_u32() >> 16) % max
    }

    /// Uniformly pick a value from a palette of `palette_size` entries.
    ///
    /// A zero-sized palette degenerates to value 0.
    pub fn pick_value(&mut self, palette_size: u8) -> MatchValue {
        MatchValue(self.next_range(palette_size as u32) as u8)
    }

    /// Shuffle a slice using Fisher-Yates
    pub fn shuffle<T>(&mut self, slice: &mut [T]) {
        for i in (1..slice.len()).rev() {
            let j = self.next_range((i + 1) as u32) as usize;
            slice.swap(i, j);
        }
    }
}

impl Default for SimpleRng {
    fn default() -> Self {
        Self::new(1)
    }
}
