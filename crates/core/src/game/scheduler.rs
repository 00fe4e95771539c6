//! Live-entity membership and energy accrual for the turn loop.
//! This module exists to decide which entities enter the turn heap and in what order.
//! It does not own command validation or what an entity chooses to do.

use std::collections::BTreeSet;

use super::*;

/// Live schedulable entities plus the heap of those ready in the current pass.
///
/// Membership is tracked separately from the heap: an entity is live from
/// spawn to removal, and is queued only once its energy clears the turn
/// threshold.
#[derive(Clone, Debug, Default)]
pub struct Scheduler {
    live: BTreeSet<EntityId>,
    queue: TurnHeap<EntityId>,
    halted: bool,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, id: EntityId) {
        self.live.insert(id);
    }

    /// Drops `id` from the live set and from the heap.
    pub fn remove(&mut self, id: EntityId) {
        self.live.remove(&id);
        while self.queue.remove(&id) {}
    }

    pub fn clear(&mut self) {
        self.live.clear();
        self.queue.clear();
        self.halted = false;
    }

    pub fn contains(&self, id: EntityId) -> bool {
        self.live.contains(&id)
    }

    pub fn is_queued(&self, id: EntityId) -> bool {
        self.queue.contains(&id)
    }

    pub fn live(&self) -> impl Iterator<Item = EntityId> + '_ {
        self.live.iter().copied()
    }

    pub fn live_count(&self) -> usize {
        self.live.len()
    }

    pub fn queued_count(&self) -> usize {
        self.queue.len()
    }

    /// Asks the turn loop to yield after the current command.
    pub fn halt(&mut self) {
        self.halted = true;
    }

    fn take_halt(&mut self) -> bool {
        std::mem::take(&mut self.halted)
    }
}

impl Game {
    /// Accrues energy tick by tick until at least one live entity is queued.
    ///
    /// Returns `false` when that can never happen: nobody is live, or nobody
    /// qualifies and no one gains energy.
    pub(super) fn refill_turn_queue(&mut self) -> bool {
        let threshold = self.config.min_turn_energy;
        let mut ticks = 0u32;
        while self.scheduler.queue.is_empty() {
            let live: Vec<EntityId> = self.scheduler.live().collect();
            let mut accrues = false;
            for id in live {
                let Some(key) = self.turn_key(id) else {
                    continue;
                };
                if key.energy > threshold {
                    self.scheduler.queue.insert(id, key);
                }
                if let Some(entity) = self.entities.get_mut(id) {
                    entity.energy += entity.refresh_rate;
                    accrues |= entity.refresh_rate > 0;
                }
            }
            ticks += 1;
            if self.scheduler.queue.is_empty() && !accrues {
                warn!(live = self.scheduler.live_count(), "no entity can become ready");
                return false;
            }
        }
        trace!(ticks, queued = self.scheduler.queue.len(), "turn queue refilled");
        true
    }

    pub(super) fn next_ready(&mut self) -> Option<EntityId> {
        self.scheduler.queue.pop_max()
    }

    pub(super) fn take_halt(&mut self) -> bool {
        self.scheduler.take_halt()
    }

    /// Heap key for `id` as of now.
    pub fn turn_key(&self, id: EntityId) -> Option<TurnKey> {
        let entity = self.entities.get(id)?;
        let proximity = if entity.is_player() || !entity.is_actor() {
            Proximity::Exempt
        } else {
            match self.player_field.cost(entity.pos) {
                Some(cost) => Proximity::Known(cost),
                None => Proximity::Unknown,
            }
        };
        Some(TurnKey { energy: entity.energy, proximity })
    }
}
