//! Test player directories — deterministic `PlayerDirectory` implementations.

use std::collections::HashMap;

use async_trait::async_trait;
use fateweaver_core::error::EngineError;
use fateweaver_core::player::{PlayerDirectory, PlayerSnapshot};

/// A player directory backed by a fixed map. Unknown ids yield
/// `EngineError::PlayerNotFound`, like the real state-manager service.
#[derive(Debug, Default)]
pub struct StaticPlayerDirectory {
    players: HashMap<String, PlayerSnapshot>,
}

impl StaticPlayerDirectory {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a snapshot under the given player id.
    #[must_use]
    pub fn with_player(mut self, player_id: &str, snapshot: PlayerSnapshot) -> Self {
        self.players.insert(player_id.to_owned(), snapshot);
        self
    }
}

#[async_trait]
impl PlayerDirectory for StaticPlayerDirectory {
    async fn fetch_player(&self, player_id: &str) -> Result<PlayerSnapshot, EngineError> {
        self.players
            .get(player_id)
            .cloned()
            .ok_or_else(|| EngineError::PlayerNotFound(player_id.to_owned()))
    }
}

/// A player directory whose fetch always fails in transport. Used to verify
/// that collaborator failures surface as turn-level errors.
#[derive(Debug, Default)]
pub struct FailingPlayerDirectory;

#[async_trait]
impl PlayerDirectory for FailingPlayerDirectory {
    async fn fetch_player(&self, _player_id: &str) -> Result<PlayerSnapshot, EngineError> {
        Err(EngineError::Collaborator(
            "player-state service unreachable".to_owned(),
        ))
    }
}
