//! Domain types for turn resolution.

pub mod dice;
pub mod entity;
pub mod turn;
