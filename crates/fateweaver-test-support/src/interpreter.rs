//! Test interpreters — deterministic `StoryInterpreter` implementations.

use async_trait::async_trait;
use fateweaver_core::error::EngineError;
use fateweaver_core::interpreter::{SceneAnalysis, StoryInterpreter};
use fateweaver_core::phase::Phase;

/// An interpreter that always returns a fixed analysis and, optionally, a
/// fixed item choice. With no configured choice, `choose_item` errors so the
/// caller exercises its first-candidate fallback.
#[derive(Debug)]
pub struct FixedInterpreter {
    analysis: SceneAnalysis,
    choice: Option<String>,
}

impl FixedInterpreter {
    #[must_use]
    pub fn new(phase: Phase, reason: &str, confidence: f64) -> Self {
        Self {
            analysis: SceneAnalysis {
                phase,
                reason: reason.to_owned(),
                confidence,
            },
            choice: None,
        }
    }

    /// Sets the name `choose_item` will answer with.
    #[must_use]
    pub fn with_choice(mut self, choice: &str) -> Self {
        self.choice = Some(choice.to_owned());
        self
    }
}

#[async_trait]
impl StoryInterpreter for FixedInterpreter {
    async fn classify_story(&self, _story: &str) -> Result<SceneAnalysis, EngineError> {
        Ok(self.analysis.clone())
    }

    async fn choose_item(
        &self,
        _candidates: &[String],
        _story: &str,
    ) -> Result<String, EngineError> {
        self.choice
            .clone()
            .ok_or_else(|| EngineError::Interpreter("no choice configured".to_owned()))
    }
}

/// An interpreter whose calls always fail. Used to verify that classification
/// failures propagate and that potion selection falls back deterministically.
#[derive(Debug, Default)]
pub struct FailingInterpreter;

#[async_trait]
impl StoryInterpreter for FailingInterpreter {
    async fn classify_story(&self, _story: &str) -> Result<SceneAnalysis, EngineError> {
        Err(EngineError::Interpreter(
            "language capability unreachable".to_owned(),
        ))
    }

    async fn choose_item(
        &self,
        _candidates: &[String],
        _story: &str,
    ) -> Result<String, EngineError> {
        Err(EngineError::Interpreter(
            "language capability unreachable".to_owned(),
        ))
    }
}
