//! Two-phase commands: validation with redirection, then execution and energy accounting.
//! This module exists so every turn-consuming intention passes the same legality checks.
//! It does not own how entities choose commands or how effects land on targets.

use super::*;

#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    Wait { cost: i32 },
    Move { to: Pos },
    OpenDoor { at: Pos },
    Act(ActionCommand),
    /// A fire spends one unit of its tile's fuel and resolves its actions.
    Burn(ActionCommand),
    /// A fire with no fuel left burns out.
    Extinguish,
}

impl Command {
    pub fn wait() -> Self {
        Command::Wait { cost: FULL_TURN }
    }

    pub fn energy_cost(&self) -> i32 {
        match self {
            Command::Wait { cost } => *cost,
            Command::Move { .. } | Command::OpenDoor { .. } => FULL_TURN,
            Command::Act(action) | Command::Burn(action) => action.energy_cost(),
            Command::Extinguish => 0,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Validation {
    Accepted,
    Rejected,
    /// Rejected, but this substitute may be tried instead.
    Redirect(Command),
}

impl Game {
    /// Checks `command` for `actor` against the current state without changing it.
    pub fn validate(&self, actor: EntityId, command: &Command) -> Validation {
        let Some(entity) = self.entities.get(actor) else {
            return Validation::Rejected;
        };
        match command {
            Command::Wait { .. } => Validation::Accepted,
            Command::Move { to } => self.validate_move(entity, *to),
            Command::OpenDoor { at } => match self.grid.kind_at(*at) {
                TileKind::ClosedDoor if entity.pos.chebyshev(*at) == 1 => Validation::Accepted,
                TileKind::OpenDoor => Validation::Redirect(Command::wait()),
                _ => Validation::Rejected,
            },
            Command::Act(action) => {
                if action.has_targets() {
                    Validation::Accepted
                } else {
                    Validation::Rejected
                }
            }
            Command::Burn(_) => {
                if entity.is_fire() && self.grid.tile(entity.pos).is_some_and(|tile| tile.fuel > 0) {
                    Validation::Accepted
                } else {
                    Validation::Redirect(Command::Extinguish)
                }
            }
            Command::Extinguish => {
                if entity.is_fire() {
                    Validation::Accepted
                } else {
                    Validation::Rejected
                }
            }
        }
    }

    fn validate_move(&self, mover: &Entity, to: Pos) -> Validation {
        let Some(tile) = self.grid.tile(to) else {
            return Validation::Redirect(Command::wait());
        };
        // Something stuck inside a wall may always step out of it.
        if tile.is_wall() && self.grid.clamped(mover.pos).is_some_and(|here| !here.is_wall()) {
            return if mover.is_player() {
                Validation::Rejected
            } else {
                Validation::Redirect(Command::wait())
            };
        }
        if tile.kind == TileKind::ClosedDoor {
            return Validation::Redirect(Command::OpenDoor { at: to });
        }
        if let Some(occupant) = tile.occupant {
            if occupant == mover.id {
                return Validation::Redirect(Command::wait());
            }
            let attack = ActionCommand::single(self.basic_attack_of(mover), vec![to]);
            return Validation::Redirect(Command::Act(attack));
        }
        if mover.pos.chebyshev(to) != 1 {
            return Validation::Rejected;
        }
        Validation::Accepted
    }

    fn basic_attack_of(&self, entity: &Entity) -> Action {
        basic_attack(entity.body.as_ref().map_or(DEFAULT_DAMAGE, |body| body.attack))
    }

    /// Runs the command protocol for `actor`.
    ///
    /// Returns `false` when the turn loop should stop and wait for input: the
    /// player produced no command, or its command could not be made valid.
    /// Failures of any other entity are contained by zeroing its energy.
    pub fn execute_command(&mut self, actor: EntityId, command: Option<Command>) -> bool {
        let is_player = self.player == Some(actor);
        let Some(mut command) = command else {
            if is_player {
                return false;
            }
            warn!(?actor, "non-player entity produced no command");
            self.zero_energy(actor);
            return true;
        };

        let mut redirects = 0;
        let accepted = loop {
            match self.validate(actor, &command) {
                Validation::Accepted => break true,
                Validation::Rejected => break false,
                Validation::Redirect(alternative) => {
                    redirects += 1;
                    if redirects > self.config.max_redirects {
                        warn!(?actor, redirects, "redirect chain exceeded its cap");
                        break false;
                    }
                    debug!(?actor, from = ?command, to = ?alternative, "command redirected");
                    command = alternative;
                }
            }
        };

        if !accepted {
            if is_player {
                self.log.push(LogEvent::InvalidAction { entity: actor });
                return false;
            }
            warn!(?actor, ?command, "AI chose a command with no valid alternative");
            self.zero_energy(actor);
            return true;
        }

        self.execute(actor, &command);
        if let Some(entity) = self.entities.get_mut(actor) {
            entity.energy -= command.energy_cost();
        }
        if self.reaction_depth == 0 {
            self.refresh();
        }
        true
    }

    /// Applies an accepted command. Only called after validation succeeded.
    fn execute(&mut self, actor: EntityId, command: &Command) {
        match command {
            Command::Wait { .. } => {
                self.log.push(LogEvent::Waited { entity: actor });
            }
            Command::Move { to } => {
                let Some(entity) = self.entities.get_mut(actor) else {
                    return;
                };
                let from = entity.pos;
                entity.pos = *to;
                let blocks_light = entity.body.as_ref().is_some_and(|body| body.blocks_light);
                self.grid.vacate(from);
                self.grid.occupy(*to, actor, blocks_light);
                self.log.push(LogEvent::Moved { entity: actor, to: *to });
            }
            Command::OpenDoor { at } => {
                self.grid.set_kind(*at, TileKind::OpenDoor);
                self.log.push(LogEvent::DoorOpened { by: actor, at: *at });
            }
            Command::Act(action) => self.resolve_action_command(actor, action),
            Command::Burn(action) => {
                let pos = self.entities.get(actor).map(|fire| fire.pos);
                if let Some(tile) = pos.and_then(|pos| self.grid.tile_mut(pos)) {
                    tile.fuel = tile.fuel.saturating_sub(1);
                }
                self.resolve_action_command(actor, action);
            }
            Command::Extinguish => self.extinguish(actor),
        }
    }

    fn zero_energy(&mut self, actor: EntityId) {
        if let Some(entity) = self.entities.get_mut(actor) {
            entity.energy = 0;
        }
    }
}
