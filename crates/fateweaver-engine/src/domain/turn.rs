//! Turn request, working state, stage updates, and the final result.

use fateweaver_core::interpreter::SceneAnalysis;
use fateweaver_core::phase::Phase;
use fateweaver_core::player::PlayerSnapshot;
use serde::{Deserialize, Serialize};

use crate::domain::entity::{CategorizedEntities, EntityDiff, EntityUnit, RelationUpdate};

/// A single narrated turn to adjudicate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TurnRequest {
    pub session_id: String,
    pub scenario_id: String,
    pub locale_id: i64,
    /// Explicit phase hint; when it matches the keyword table the
    /// interpreter is never consulted.
    #[serde(default)]
    pub phase_hint: Option<String>,
    /// Free-text name or id of the intended target (combat).
    #[serde(default)]
    pub target: Option<String>,
    pub entities: Vec<EntityUnit>,
    /// Relationships known to exist before this turn.
    pub relations: Vec<RelationUpdate>,
    pub story: String,
}

/// Mutable working context threaded through the pipeline.
///
/// Created once per request and discarded after the response is built.
/// Each stage reads the prior state and returns a [`StageUpdate`]; the
/// orchestrator merges updates into the next state value. Accumulated
/// relations start empty: prior relations are read from the request and
/// never echoed into the output.
#[derive(Debug, Clone)]
pub struct TurnState {
    pub request: TurnRequest,
    pub analysis: Option<SceneAnalysis>,
    pub entities: CategorizedEntities,
    pub player_id: Option<String>,
    pub player: Option<PlayerSnapshot>,
    pub diffs: Vec<EntityDiff>,
    pub relations: Vec<RelationUpdate>,
    pub logs: Vec<String>,
    pub is_success: bool,
}

impl TurnState {
    /// Fresh state for one request.
    #[must_use]
    pub fn new(request: TurnRequest) -> Self {
        Self {
            request,
            analysis: None,
            entities: CategorizedEntities::default(),
            player_id: None,
            player: None,
            diffs: Vec::new(),
            relations: Vec::new(),
            logs: Vec::new(),
            is_success: false,
        }
    }

    /// Merges a partial stage update into the next state value. Fields the
    /// stage did not set carry over unchanged.
    #[must_use]
    pub fn apply(mut self, update: StageUpdate) -> Self {
        if let Some(analysis) = update.analysis {
            self.analysis = Some(analysis);
        }
        if let Some(entities) = update.entities {
            self.entities = entities;
        }
        if let Some(player_id) = update.player_id {
            self.player_id = Some(player_id);
        }
        if let Some(player) = update.player {
            self.player = Some(player);
        }
        if let Some(diffs) = update.diffs {
            self.diffs = diffs;
        }
        if let Some(relations) = update.relations {
            self.relations = relations;
        }
        if let Some(logs) = update.logs {
            self.logs = logs;
        }
        if let Some(is_success) = update.is_success {
            self.is_success = is_success;
        }
        self
    }
}

/// Partial update returned by one pipeline stage. Vector fields are whole
/// replacements: a stage copies the prior vector, appends, and returns it.
#[derive(Debug, Clone, Default)]
pub struct StageUpdate {
    pub analysis: Option<SceneAnalysis>,
    pub entities: Option<CategorizedEntities>,
    pub player_id: Option<String>,
    pub player: Option<PlayerSnapshot>,
    pub diffs: Option<Vec<EntityDiff>>,
    pub relations: Option<Vec<RelationUpdate>>,
    pub logs: Option<Vec<String>>,
    pub is_success: Option<bool>,
}

/// The adjudicated turn, returned to the caller.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TurnResult {
    pub phase: Phase,
    pub reason: String,
    pub is_success: bool,
    pub diffs: Vec<EntityDiff>,
    pub relations: Vec<RelationUpdate>,
    pub logs: Vec<String>,
}

/// Appends a line to the turn log, mirroring it to the tracing output.
pub(crate) fn push_log(logs: &mut Vec<String>, message: impl Into<String>) {
    let message = message.into();
    tracing::debug!("{message}");
    logs.push(message);
}

#[cfg(test)]
mod tests {
    use fateweaver_core::phase::Phase;

    use super::*;

    fn request() -> TurnRequest {
        TurnRequest {
            session_id: "sess-1".to_owned(),
            scenario_id: "scn-1".to_owned(),
            locale_id: 1,
            phase_hint: None,
            target: None,
            entities: vec![],
            relations: vec![],
            story: "a quiet road".to_owned(),
        }
    }

    #[test]
    fn test_apply_merges_only_set_fields() {
        let state = TurnState::new(request());
        let state = state.apply(StageUpdate {
            logs: Some(vec!["first".to_owned()]),
            ..StageUpdate::default()
        });

        assert_eq!(state.logs, vec!["first".to_owned()]);
        assert!(state.analysis.is_none());
        assert!(!state.is_success);

        let state = state.apply(StageUpdate {
            analysis: Some(SceneAnalysis {
                phase: Phase::Rest,
                reason: "calm".to_owned(),
                confidence: 0.9,
            }),
            is_success: Some(true),
            ..StageUpdate::default()
        });

        // The earlier log survives an update that does not touch logs.
        assert_eq!(state.logs, vec!["first".to_owned()]);
        assert_eq!(state.analysis.as_ref().map(|a| a.phase), Some(Phase::Rest));
        assert!(state.is_success);
    }

    #[test]
    fn test_vector_fields_are_whole_replacements() {
        let state = TurnState::new(request());
        let state = state.apply(StageUpdate {
            logs: Some(vec!["a".to_owned(), "b".to_owned()]),
            ..StageUpdate::default()
        });
        let state = state.apply(StageUpdate {
            logs: Some(vec!["c".to_owned()]),
            ..StageUpdate::default()
        });
        assert_eq!(state.logs, vec!["c".to_owned()]);
    }

    #[test]
    fn test_new_state_starts_with_empty_accumulators() {
        let mut req = request();
        req.relations = vec![];
        let state = TurnState::new(req);
        assert!(state.diffs.is_empty());
        assert!(state.relations.is_empty());
        assert!(state.logs.is_empty());
    }
}
