//! Turn orchestrator: classification, world context, categorization, routing.

use std::sync::{Arc, Mutex};

use fateweaver_core::catalog::{EnemyCatalog, ItemCatalog, LocaleDirectory};
use fateweaver_core::error::EngineError;
use fateweaver_core::interpreter::StoryInterpreter;
use fateweaver_core::phase::Phase;
use fateweaver_core::player::PlayerDirectory;
use fateweaver_core::rng::DiceRng;
use tracing::warn;

use crate::classify::classify_scene;
use crate::domain::entity::{CategorizedEntities, EntityRole};
use crate::domain::turn::{StageUpdate, TurnRequest, TurnResult, TurnState, push_log};
use crate::resolvers;

/// The engine entry point: wires the collaborators into the turn pipeline.
///
/// Shared across requests. Every call builds a fresh [`TurnState`], so no
/// mutable state crosses turns; the RNG behind the mutex is the only locked
/// resource.
#[derive(Clone)]
pub struct TurnEngine {
    interpreter: Arc<dyn StoryInterpreter>,
    players: Arc<dyn PlayerDirectory>,
    items: Arc<dyn ItemCatalog>,
    enemies: Arc<dyn EnemyCatalog>,
    locales: Arc<dyn LocaleDirectory>,
    rng: Arc<Mutex<dyn DiceRng + Send>>,
}

impl TurnEngine {
    #[must_use]
    pub fn new(
        interpreter: Arc<dyn StoryInterpreter>,
        players: Arc<dyn PlayerDirectory>,
        items: Arc<dyn ItemCatalog>,
        enemies: Arc<dyn EnemyCatalog>,
        locales: Arc<dyn LocaleDirectory>,
        rng: Arc<Mutex<dyn DiceRng + Send>>,
    ) -> Self {
        Self {
            interpreter,
            players,
            items,
            enemies,
            locales,
            rng,
        }
    }

    /// Resolves one narrated turn end to end.
    ///
    /// Runs classification, the locale lookup, entity categorization with the
    /// player snapshot fetch, and the matched phase resolver, merging each
    /// stage's partial update into the next state value. A missing or
    /// unrecognized phase routes to the unknown resolver.
    ///
    /// # Errors
    ///
    /// Returns `InvalidRequest` when more than one player entity is present;
    /// interpreter and collaborator transport failures surface unchanged.
    pub async fn resolve_turn(&self, request: TurnRequest) -> Result<TurnResult, EngineError> {
        let state = TurnState::new(request);

        let update = classify_scene(&state, self.interpreter.as_ref()).await?;
        let state = state.apply(update);

        let update = self.fetch_locale(&state).await?;
        let state = state.apply(update);

        let update = self.categorize(&state).await?;
        let state = state.apply(update);

        let phase = state.analysis.as_ref().map_or(Phase::Unknown, |a| a.phase);
        let update = match phase {
            Phase::Combat => {
                resolvers::combat::resolve(
                    &state,
                    self.items.as_ref(),
                    self.enemies.as_ref(),
                    &self.rng,
                )
                .await?
            }
            Phase::Dialogue => resolvers::dialogue::resolve(&state, &self.rng)?,
            Phase::Negotiation => {
                resolvers::negotiation::resolve(&state, self.items.as_ref(), &self.rng).await?
            }
            Phase::Exploration => resolvers::exploration::resolve(&state, &self.rng)?,
            Phase::Rest => resolvers::rest::resolve(&state, &self.rng)?,
            Phase::Recovery => {
                resolvers::recovery::resolve(
                    &state,
                    self.items.as_ref(),
                    self.interpreter.as_ref(),
                    &self.rng,
                )
                .await?
            }
            Phase::Unknown => resolvers::unknown::resolve(&state, &self.rng)?,
        };
        let state = state.apply(update);

        let (phase, reason) = state
            .analysis
            .as_ref()
            .map_or((Phase::Unknown, String::new()), |a| {
                (a.phase, a.reason.clone())
            });
        Ok(TurnResult {
            phase,
            reason,
            is_success: state.is_success,
            diffs: state.diffs,
            relations: state.relations,
            logs: state.logs,
        })
    }

    /// World-context lookup, log-only: a missing locale adds a log line while
    /// transport failures surface.
    async fn fetch_locale(&self, state: &TurnState) -> Result<StageUpdate, EngineError> {
        let mut logs = state.logs.clone();
        match self.locales.locale_by_id(state.request.locale_id).await? {
            Some(locale) => push_log(&mut logs, format!("scene set in '{}'", locale.name)),
            None => push_log(
                &mut logs,
                format!("locale {} not found in the catalog", state.request.locale_id),
            ),
        }
        Ok(StageUpdate {
            logs: Some(logs),
            ..StageUpdate::default()
        })
    }

    /// Buckets the request entities, enforces the single-player invariant,
    /// and fetches the player snapshot when a player is present.
    async fn categorize(&self, state: &TurnState) -> Result<StageUpdate, EngineError> {
        let mut logs = state.logs.clone();

        let player_count = state
            .request
            .entities
            .iter()
            .filter(|e| e.role == EntityRole::Player)
            .count();
        if player_count > 1 {
            return Err(EngineError::InvalidRequest(format!(
                "expected at most one player entity, got {player_count}"
            )));
        }

        let entities = CategorizedEntities::from_entities(&state.request.entities);
        let player_id = entities.player_id.clone();
        let player = match player_id.as_deref() {
            Some(id) => {
                let snapshot = self.players.fetch_player(id).await?;
                push_log(&mut logs, format!("player '{id}' snapshot fetched"));
                Some(snapshot)
            }
            None => {
                warn!("turn without a player entity");
                push_log(&mut logs, "no player entity in this turn");
                None
            }
        };

        Ok(StageUpdate {
            entities: Some(entities),
            player_id,
            player,
            logs: Some(logs),
            ..StageUpdate::default()
        })
    }
}
