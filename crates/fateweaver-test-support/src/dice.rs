//! Test dice — deterministic `DiceRng` implementations for tests.

use fateweaver_core::rng::DiceRng;

/// A no-op dice source that always returns `min`. With two dice that means a
/// raw sum of 2, i.e. a critical fail. Suitable for tests that do not depend
/// on specific faces.
#[derive(Debug)]
pub struct MockDice;

impl DiceRng for MockDice {
    fn next_u32_range(&mut self, min: u32, _max: u32) -> u32 {
        min
    }
}

/// A dice source that returns faces from a predetermined sequence. Panics if
/// the sequence is exhausted. Used in tests that need specific, repeatable
/// roll outcomes.
#[derive(Debug)]
pub struct SequenceDice {
    faces: Vec<u32>,
    index: usize,
}

impl SequenceDice {
    /// Create a new `SequenceDice` with the given faces.
    #[must_use]
    pub fn new(faces: Vec<u32>) -> Self {
        Self { faces, index: 0 }
    }
}

impl DiceRng for SequenceDice {
    fn next_u32_range(&mut self, _min: u32, _max: u32) -> u32 {
        let face = self.faces[self.index];
        self.index += 1;
        face
    }
}
