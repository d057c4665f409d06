//! Fateweaver Core — shared domain abstractions.
//!
//! This crate defines the fundamental traits and types the turn-resolution
//! engine and its adapters depend on: the engine error type, clock and dice
//! abstractions for determinism, and the collaborator ports (player state,
//! catalogs, story interpreter). It contains no infrastructure code.

pub mod catalog;
pub mod clock;
pub mod error;
pub mod interpreter;
pub mod phase;
pub mod player;
pub mod rng;
