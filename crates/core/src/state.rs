use serde::{Deserialize, Serialize};
use slotmap::SlotMap;

use crate::config::SimConfig;
use crate::grid::TileRecord;
use crate::types::*;

/// Anything that takes turns: actors with a body, and hazards without one.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    pub id: EntityId,
    pub pos: Pos,
    /// May dip below zero after an expensive command.
    pub energy: i32,
    pub refresh_rate: i32,
    pub kind: EntityKind,
    pub body: Option<Body>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum EntityKind {
    Player,
    Monster { kind: MonsterKind, attack_cursor: usize },
    Fire,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Body {
    pub hp: i32,
    pub max_hp: i32,
    pub armor: i32,
    pub attack: i32,
    pub blocks_light: bool,
    pub reaction: ReactionProfile,
}

impl Entity {
    pub fn is_player(&self) -> bool {
        self.kind == EntityKind::Player
    }

    pub fn is_actor(&self) -> bool {
        self.body.is_some()
    }

    pub fn is_fire(&self) -> bool {
        self.kind == EntityKind::Fire
    }

    pub fn is_hostile(&self) -> bool {
        matches!(self.kind, EntityKind::Monster { .. })
    }

    pub fn hp(&self) -> Option<i32> {
        self.body.as_ref().map(|body| body.hp)
    }
}

/// Persistent state of one level. The turn queue and both distance fields
/// are rebuilt after loading, never stored.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LevelSnapshot {
    pub seed: u64,
    pub rng_draws: u64,
    pub turn: u64,
    pub config: SimConfig,
    pub width: usize,
    pub height: usize,
    pub tiles: Vec<TileRecord>,
    pub entities: SlotMap<EntityId, Entity>,
    pub player: Option<EntityId>,
    pub auto_explore: bool,
    pub outcome: Option<RunOutcome>,
}
