//! Fateweaver — turn-resolution bounded context.
//!
//! Adjudicates a single narrated turn: classifies the scene into a phase,
//! categorizes the entities present, routes to the matching phase resolver,
//! and assembles the proposed state changes (diffs and relation updates)
//! together with a human-readable log trace.

pub mod classify;
pub mod domain;
pub mod orchestrator;
pub mod resolvers;

pub use domain::turn::{StageUpdate, TurnRequest, TurnResult, TurnState};
pub use orchestrator::TurnEngine;
