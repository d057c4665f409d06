//! Story interpreter port — the language-understanding capability.
//!
//! Constructed once at process start and passed by dependency injection into
//! the classifier and recovery components. Treated as an opaque, possibly
//! slow, possibly failing remote call.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::EngineError;
use crate::phase::Phase;

/// The interpreter's reading of a scene.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SceneAnalysis {
    /// The classified phase of the turn.
    pub phase: Phase,
    /// Why the interpreter (or the hint table) chose that phase.
    pub reason: String,
    /// Confidence in `[0, 1]`.
    pub confidence: f64,
}

/// Port to the language-understanding capability.
#[async_trait]
pub trait StoryInterpreter: Send + Sync {
    /// Classifies a free-text scene into a phase with reason and confidence.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Interpreter`] when the capability fails; the
    /// caller does not fabricate a fallback phase.
    async fn classify_story(&self, story: &str) -> Result<SceneAnalysis, EngineError>;

    /// Picks one candidate name given the story context. Callers fall back
    /// to the first candidate when this fails or answers off-list.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Interpreter`] when the capability fails.
    async fn choose_item(&self, candidates: &[String], story: &str)
    -> Result<String, EngineError>;
}
