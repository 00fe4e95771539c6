//! Targeted effects, their target zones, and reaction interception.
//! This module exists so every damaging or igniting effect resolves through one path.
//! It does not own command validation or which action an entity picks.

use super::*;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Effect {
    Damage { power: i32 },
    Ignite,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TargetZone {
    /// Only the aimed tile.
    Single,
    /// Straight line from the source toward the aim, stopping before walls.
    Line { range: u32 },
    /// Every tile within `radius` of the source, excluding the source itself.
    Burst { radius: u32 },
}

impl TargetZone {
    pub fn targets(self, grid: &Grid, source: Pos, aim: Pos) -> Vec<Pos> {
        match self {
            TargetZone::Single => {
                if grid.in_bounds(aim) {
                    vec![aim]
                } else {
                    Vec::new()
                }
            }
            TargetZone::Line { range } => straight_line(source, aim)
                .into_iter()
                .take(range as usize)
                .take_while(|pos| grid.tile(*pos).is_some_and(|tile| !tile.is_wall()))
                .collect(),
            TargetZone::Burst { radius } => {
                let r = radius as i32;
                let mut targets = Vec::new();
                for y in (source.y - r)..=(source.y + r) {
                    for x in (source.x - r)..=(source.x + r) {
                        let pos = Pos { y, x };
                        if pos != source && grid.in_bounds(pos) {
                            targets.push(pos);
                        }
                    }
                }
                targets
            }
        }
    }
}

/// An effect with the shape it lands in and what it costs to use.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Action {
    pub effect: Effect,
    pub zone: TargetZone,
    pub energy_cost: i32,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ActionStep {
    pub action: Action,
    pub targets: Vec<Pos>,
}

/// One or more actions resolved in order under one aggregate cost.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ActionCommand {
    pub steps: Vec<ActionStep>,
}

impl ActionCommand {
    pub fn single(action: Action, targets: Vec<Pos>) -> Self {
        Self { steps: vec![ActionStep { action, targets }] }
    }

    pub fn energy_cost(&self) -> i32 {
        self.steps.iter().map(|step| step.action.energy_cost).sum()
    }

    pub fn has_targets(&self) -> bool {
        self.steps.iter().any(|step| !step.targets.is_empty())
    }
}

/// What a targeted actor does before an action lands on it.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Reaction {
    pub command: Option<Command>,
    /// Yield the turn loop once the current command finishes.
    pub delayed: bool,
    /// Cancel the incoming action on this tile.
    pub negating: bool,
}

impl Reaction {
    pub fn is_passive(&self) -> bool {
        self.command.is_none() && !self.delayed && !self.negating
    }
}

/// Bresenham line from `source` to `target`, excluding `source`.
pub fn straight_line(source: Pos, target: Pos) -> Vec<Pos> {
    let dx = (target.x - source.x).abs();
    let dy = (target.y - source.y).abs();
    let sx = if target.x < source.x { -1 } else { 1 };
    let sy = if target.y < source.y { -1 } else { 1 };
    let mut err = dx - dy;
    let mut current = source;
    let mut line = Vec::with_capacity(dx.max(dy) as usize);

    while current != target {
        let e2 = 2 * err;
        if e2 > -dy {
            err -= dy;
            current.x += sx;
        }
        if e2 < dx {
            err += dx;
            current.y += sy;
        }
        line.push(current);
    }
    line
}

impl Game {
    pub(super) fn resolve_action_command(&mut self, source: EntityId, command: &ActionCommand) {
        for step in &command.steps {
            for &pos in &step.targets {
                self.resolve_action_at(source, step.action, pos);
            }
        }
    }

    /// Gives the occupant of `pos` a chance to react, then applies the effect
    /// unless the reaction negated it.
    fn resolve_action_at(&mut self, source: EntityId, action: Action, pos: Pos) {
        if self.reaction_depth == 0
            && let Some(target) = self.grid.occupant(pos)
            && target != source
        {
            let reaction = self.reaction(target, source);
            if !reaction.is_passive() {
                let profile = self
                    .entities
                    .get(target)
                    .and_then(|entity| entity.body.as_ref())
                    .map_or(ReactionProfile::None, |body| body.reaction);
                debug!(?target, ?profile, "reaction triggered");
                self.log.push(LogEvent::Reacted { entity: target, profile });
            }
            if let Some(command) = reaction.command {
                self.reaction_depth += 1;
                self.execute_command(target, Some(command));
                self.reaction_depth -= 1;
            }
            if reaction.delayed {
                self.scheduler.halt();
            }
            if reaction.negating {
                self.log.push(LogEvent::ActionNegated { target, at: pos });
                return;
            }
        }
        self.apply_effect(source, action.effect, pos);
    }

    fn apply_effect(&mut self, source: EntityId, effect: Effect, pos: Pos) {
        match effect {
            Effect::Damage { power } => {
                if let Some(target) = self.grid.occupant(pos) {
                    self.deal_damage(source, target, power);
                }
            }
            Effect::Ignite => {
                self.try_ignite(pos);
            }
        }
    }

    /// Armor absorbs `power * armor / 30` and wears down by the same amount.
    fn deal_damage(&mut self, source: EntityId, target: EntityId, power: i32) {
        let Some(body) = self.entities.get_mut(target).and_then(|entity| entity.body.as_mut())
        else {
            return;
        };
        let blocked = power * body.armor / 30;
        let damage = (power - blocked).max(0);
        body.armor = (body.armor - blocked).max(0);
        body.hp -= damage;
        let dead = body.hp <= 0;
        self.log.push(LogEvent::Hit { source, target, damage });
        if dead {
            self.kill(target);
        }
    }

    fn kill(&mut self, id: EntityId) {
        let Some(entity) = self.remove_entity(id) else {
            return;
        };
        self.log.push(LogEvent::Died { entity: id });
        if entity.is_player() {
            debug!(?id, "player died");
            self.outcome = Some(RunOutcome::Defeat);
        }
    }

    /// Rolls the terrain's ignite chance and starts a fire on success.
    /// Walls, burnt-out tiles and tiles already burning never roll.
    pub(super) fn try_ignite(&mut self, pos: Pos) -> bool {
        let Some(tile) = self.grid.tile(pos) else {
            return false;
        };
        if tile.is_wall() || tile.fuel == 0 || self.fire_at(pos).is_some() {
            return false;
        }
        let chance = tile.kind.flammability().ignite_chance();
        if self.roll() >= chance {
            return false;
        }
        self.insert_fire(pos);
        true
    }
}
