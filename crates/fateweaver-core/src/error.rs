//! Engine error types.

use thiserror::Error;

/// Top-level error type for turn resolution.
#[derive(Debug, Error)]
pub enum EngineError {
    /// The turn request violates a structural invariant.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// The player-state collaborator does not know the given player id.
    #[error("player not found: {0}")]
    PlayerNotFound(String),

    /// The language-understanding capability failed.
    #[error("interpreter error: {0}")]
    Interpreter(String),

    /// A collaborator call (player state, catalog) failed in transport.
    #[error("collaborator error: {0}")]
    Collaborator(String),

    /// An infrastructure error (pool, serialization, poisoned lock).
    #[error("infrastructure error: {0}")]
    Infrastructure(String),
}
