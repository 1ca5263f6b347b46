//! RNG module - deterministic color generation
//!
//! Populate and top-row refills draw uniformly from the configured palette.
//! A small LCG keeps the whole simulation reproducible from a seed, which is
//! what tests and benches rely on.

use std::time::{SystemTime, UNIX_EPOCH};

use crate::types::Color;

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

    /// Seed from the wall clock, for hosts that did not configure a seed.
    pub fn from_entropy() -> Self {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.subsec_nanos() ^ (d.as_secs() as u32))
            .unwrap_or(1);
        Self::new(nanos)
    }

    /// Generate next random u32
    pub fn next_u32(&mut self) -> u32 {
        // LCG formula: (a * state + c) mod m
        // Using Numerical Recipes constants: a=1664525, c=1013904223, m=2^32
        self.state = self.state.wrapping_mul(1664525).wrapping_add(1013904223);
        self.state
    }

    /// Generate random value in range [0, max)
    pub fn next_range(&mut self, max: u32) -> u32 {
        // Low bits of an LCG cycle with a short period.
        (self.next_u32() >> 16) % max.max(1)
    }

    /// Draw a color from the first `palette` colors of [`Color::ALL`].
    pub fn next_color(&mut self, palette: u8) -> Color {
        let palette = palette.clamp(1, Color::COUNT);
        let index = self.next_range(palette as u32) as u8;
        Color::from_index(index).unwrap_or(Color::Red)
    }

    /// Current RNG state (restarting from it replays the same colors)
    pub fn state(&self) -> u32 {
        self.state
    }
}

impl Default for SimpleRng {
    fn default() -> Self {
        Self::new(1)
    }
}
