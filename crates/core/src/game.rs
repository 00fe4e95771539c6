use std::collections::VecDeque;

use rand_chacha::ChaCha8Rng;
use rand_chacha::rand_core::{Rng, SeedableRng};
use slotmap::SlotMap;
use tracing::{debug, trace, warn};

use crate::config::SimConfig;
use crate::content::*;
use crate::error::SimError;
use crate::grid::Grid;
use crate::state::{Body, Entity, EntityKind, LevelSnapshot};
use crate::types::*;

mod actions;
mod advance;
mod auto_explore;
mod behavior;
mod bootstrap;
mod commands;
mod distance;
mod hash;
mod scheduler;
#[cfg(test)]
mod test_support;
mod turn_heap;
mod visibility;

pub use actions::{Action, ActionCommand, ActionStep, Effect, Reaction, TargetZone};
pub use commands::{Command, Validation};
pub use distance::{DistanceField, Step};
pub use scheduler::Scheduler;
pub use turn_heap::{Proximity, TurnHeap, TurnKey};
pub use visibility::SweepMode;

/// The simulation context for one loaded level.
///
/// Owns the grid, every live entity, the turn scheduler, both distance
/// fields and the random stream. Input layers talk to it through
/// [`Game::submit_intent`] and [`Game::advance`]; rendering layers read the
/// grid and fields through the accessors below.
pub struct Game {
    config: SimConfig,
    seed: u64,
    rng: ChaCha8Rng,
    rng_draws: u64,
    turn: u64,
    grid: Grid,
    entities: SlotMap<EntityId, Entity>,
    scheduler: Scheduler,
    player_field: DistanceField,
    explore_field: DistanceField,
    player: Option<EntityId>,
    intents: VecDeque<PlayerIntent>,
    // Entity that stopped the loop for input; asked again before the heap.
    waiting_on: Option<EntityId>,
    auto_explore: bool,
    log: Vec<LogEvent>,
    // Nonzero while a reaction command is resolving; reactions are never intercepted.
    reaction_depth: u8,
    outcome: Option<RunOutcome>,
}

impl Game {
    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn turn(&self) -> u64 {
        self.turn
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn log(&self) -> &[LogEvent] {
        &self.log
    }

    pub fn drain_log(&mut self) -> Vec<LogEvent> {
        std::mem::take(&mut self.log)
    }

    pub fn outcome(&self) -> Option<RunOutcome> {
        self.outcome
    }

    pub fn player_id(&self) -> Option<EntityId> {
        self.player
    }

    pub fn player(&self) -> Option<&Entity> {
        self.player.and_then(|id| self.entities.get(id))
    }

    pub fn entity(&self, id: EntityId) -> Option<&Entity> {
        self.entities.get(id)
    }

    /// The actor standing on `pos`, if any. Fires never occupy a tile.
    pub fn entity_at(&self, pos: Pos) -> Option<&Entity> {
        self.grid.occupant(pos).and_then(|id| self.entities.get(id))
    }

    pub fn fire_at(&self, pos: Pos) -> Option<&Entity> {
        self.entities.values().find(|entity| entity.is_fire() && entity.pos == pos)
    }

    pub fn entities(&self) -> impl Iterator<Item = &Entity> {
        self.entities.values()
    }

    pub fn scheduler(&self) -> &Scheduler {
        &self.scheduler
    }

    pub fn player_field(&self) -> &DistanceField {
        &self.player_field
    }

    pub fn explore_field(&self) -> &DistanceField {
        &self.explore_field
    }

    pub fn is_auto_exploring(&self) -> bool {
        self.auto_explore
    }

    pub fn set_auto_explore(&mut self, enabled: bool) {
        self.auto_explore = enabled;
    }

    pub fn submit_intent(&mut self, intent: PlayerIntent) {
        self.intents.push_back(intent);
    }

    pub fn pending_intents(&self) -> usize {
        self.intents.len()
    }

    /// Uniform float in `[0, 1)`; every draw is counted so snapshots can
    /// resume the stream.
    fn roll(&mut self) -> f64 {
        self.rng_draws += 1;
        (self.rng.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }
}
