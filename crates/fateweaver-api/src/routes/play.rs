//! Route for single-turn adjudication.

use axum::extract::State;
use axum::{Json, Router, routing::post};
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{info, instrument};
use uuid::Uuid;

use fateweaver_core::phase::Phase;
use fateweaver_engine::domain::entity::{EntityDiff, RelationUpdate};
use fateweaver_engine::{TurnRequest, TurnResult};

use crate::error::ApiError;
use crate::state::AppState;

/// Response body for POST /turn.
#[derive(Debug, Serialize)]
pub struct TurnResponse {
    /// The phase the turn was classified into.
    pub phase: Phase,
    /// Why that phase was chosen.
    pub reason: String,
    /// Whether the turn's roll succeeded.
    pub is_success: bool,
    /// Proposed attribute changes, relative and additive.
    pub diffs: Vec<EntityDiff>,
    /// Proposed relationship updates.
    pub relations: Vec<RelationUpdate>,
    /// Human-readable adjudication trail.
    pub logs: Vec<String>,
    /// When the engine resolved the turn.
    pub resolved_at: DateTime<Utc>,
}

impl TurnResponse {
    fn from_result(result: TurnResult, resolved_at: DateTime<Utc>) -> Self {
        Self {
            phase: result.phase,
            reason: result.reason,
            is_success: result.is_success,
            diffs: result.diffs,
            relations: result.relations,
            logs: result.logs,
            resolved_at,
        }
    }
}

/// POST /turn
#[instrument(skip(state, request), fields(session_id = %request.session_id))]
async fn resolve_turn(
    State(state): State<AppState>,
    Json(request): Json<TurnRequest>,
) -> Result<Json<TurnResponse>, ApiError> {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "handling turn request");

    let result = state.engine.resolve_turn(request).await?;
    let resolved_at = state.clock.now();

    Ok(Json(TurnResponse::from_result(result, resolved_at)))
}

/// Returns the router for turn adjudication.
pub fn router() -> Router<AppState> {
    Router::new().route("/turn", post(resolve_turn))
}
