//! Entities, relations, and diffs — the turn's working vocabulary.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Declared role of an entity within the turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EntityRole {
    Player,
    Npc,
    Enemy,
    Item,
    Object,
}

/// One entity present in the narrated scene.
///
/// `state_entity_id` is the transient identifier, stable within the session;
/// `catalog_id` links to a persisted item/enemy/NPC record when one exists.
/// Created per request by the caller and never persisted by this engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntityUnit {
    pub state_entity_id: String,
    #[serde(default)]
    pub catalog_id: Option<i64>,
    pub name: String,
    pub role: EntityRole,
    #[serde(default)]
    pub quantity: Option<i64>,
}

/// Typed, directed link between two entities, with optional magnitude.
///
/// The same shape serves both directions: prior-state input on the request
/// and proposed updates on the result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RelationKind {
    Hostile,
    LittleHostile,
    Neutral,
    LittleFriendly,
    Friendly,
    Ownership,
    Consume,
}

impl RelationKind {
    /// Bands a cumulative affinity into a qualitative relation kind.
    /// Values beyond the ±100 scale clamp to the nearest extreme band.
    #[must_use]
    pub fn from_affinity(total_affinity: i64) -> Self {
        match total_affinity {
            i64::MIN..=-61 => Self::Hostile,
            -60..=-21 => Self::LittleHostile,
            -20..=20 => Self::Neutral,
            21..=60 => Self::LittleFriendly,
            61..=i64::MAX => Self::Friendly,
        }
    }
}

impl fmt::Display for RelationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Hostile => "HOSTILE",
            Self::LittleHostile => "LITTLE_HOSTILE",
            Self::Neutral => "NEUTRAL",
            Self::LittleFriendly => "LITTLE_FRIENDLY",
            Self::Friendly => "FRIENDLY",
            Self::Ownership => "OWNERSHIP",
            Self::Consume => "CONSUME",
        };
        write!(f, "{name}")
    }
}

/// A relationship, existing before the turn or proposed by it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelationUpdate {
    pub cause_entity_id: String,
    pub effect_entity_id: String,
    pub kind: RelationKind,
    #[serde(default)]
    pub affinity_delta: Option<i64>,
    #[serde(default)]
    pub quantity: Option<i64>,
}

/// A proposed relative change to one entity's numeric attributes.
/// Always additive, never absolute.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityDiff {
    pub state_entity_id: String,
    pub changes: BTreeMap<String, i64>,
}

impl EntityDiff {
    /// A diff touching a single attribute.
    #[must_use]
    pub fn single(state_entity_id: &str, attribute: &str, delta: i64) -> Self {
        let mut changes = BTreeMap::new();
        changes.insert(attribute.to_owned(), delta);
        Self {
            state_entity_id: state_entity_id.to_owned(),
            changes,
        }
    }
}

/// The turn's entities, partitioned by role in a single pass.
#[derive(Debug, Clone, Default)]
pub struct CategorizedEntities {
    pub player_id: Option<String>,
    pub npcs: Vec<EntityUnit>,
    pub enemies: Vec<EntityUnit>,
    pub items: Vec<EntityUnit>,
    pub objects: Vec<EntityUnit>,
}

impl CategorizedEntities {
    /// Buckets entities by declared role, preserving request order within
    /// each bucket. At most one Player entity is expected; callers validate
    /// that invariant before bucketing.
    #[must_use]
    pub fn from_entities(entities: &[EntityUnit]) -> Self {
        let mut categorized = Self::default();
        for entity in entities {
            match entity.role {
                EntityRole::Player => {
                    categorized.player_id = Some(entity.state_entity_id.clone());
                }
                EntityRole::Npc => categorized.npcs.push(entity.clone()),
                EntityRole::Enemy => categorized.enemies.push(entity.clone()),
                EntityRole::Item => categorized.items.push(entity.clone()),
                EntityRole::Object => categorized.objects.push(entity.clone()),
            }
        }
        categorized
    }
}
