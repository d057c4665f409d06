//! Scene classifier: phase hint table first, interpreter otherwise.

use fateweaver_core::error::EngineError;
use fateweaver_core::interpreter::{SceneAnalysis, StoryInterpreter};
use fateweaver_core::phase::Phase;

use crate::domain::turn::{StageUpdate, TurnState, push_log};

/// Determines the phase of the turn.
///
/// A caller-supplied hint that matches the keyword table short-circuits with
/// confidence 1.0 and no external call; otherwise the story is handed to the
/// language-understanding capability.
///
/// # Errors
///
/// Propagates [`EngineError::Interpreter`] from the capability; no fallback
/// phase is fabricated.
pub async fn classify_scene(
    state: &TurnState,
    interpreter: &dyn StoryInterpreter,
) -> Result<StageUpdate, EngineError> {
    let mut logs = state.logs.clone();

    if let Some(hint) = state.request.phase_hint.as_deref() {
        if let Some(phase) = Phase::from_hint(hint) {
            push_log(&mut logs, format!("phase hint applied: '{hint}' -> {phase}"));
            return Ok(StageUpdate {
                analysis: Some(SceneAnalysis {
                    phase,
                    reason: "phase hint applied".to_owned(),
                    confidence: 1.0,
                }),
                logs: Some(logs),
                ..StageUpdate::default()
            });
        }
        push_log(
            &mut logs,
            format!("phase hint '{hint}' matched no known phase, consulting interpreter"),
        );
    }

    let analysis = interpreter.classify_story(&state.request.story).await?;
    push_log(&mut logs, format!("classified phase: {}", analysis.phase));
    push_log(&mut logs, format!("reason: {}", analysis.reason));
    push_log(&mut logs, format!("confidence: {}", analysis.confidence));

    Ok(StageUpdate {
        analysis: Some(analysis),
        logs: Some(logs),
        ..StageUpdate::default()
    })
}
