//! Die-roll abstraction for determinism.
//!
//! In production, this wraps a real RNG. In tests and replays,
//! a seeded or recorded implementation is injected.

use rand::Rng;

/// Abstraction over the random die faces the engine consumes.
pub trait DiceRng: Send + Sync {
    /// Generate a random `u32` in the range `[min, max]` inclusive.
    fn next_u32_range(&mut self, min: u32, max: u32) -> u32;
}

/// Production dice source backed by the thread-local RNG.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemDice;

impl DiceRng for SystemDice {
    fn next_u32_range(&mut self, min: u32, max: u32) -> u32 {
        rand::rng().random_range(min..=max)
    }
}
