//! Shared application state.

use std::sync::Arc;

use fateweaver_core::clock::Clock;
use fateweaver_engine::TurnEngine;

/// Application state shared across all request handlers.
#[derive(Clone)]
pub struct AppState {
    /// The turn engine with its wired collaborators.
    pub engine: TurnEngine,
    /// Clock used to stamp responses.
    pub clock: Arc<dyn Clock>,
}

impl AppState {
    /// Create new application state.
    #[must_use]
    pub fn new(engine: TurnEngine, clock: Arc<dyn Clock>) -> Self {
        Self { engine, clock }
    }
}
