//! Per-kind decision making: what each entity wants to do and how it reacts when targeted.
//! This module exists so the scheduler can ask any entity for a command without knowing its kind.
//! It does not own validation, redirection, or effect resolution.

use super::*;

impl Game {
    /// The next command `id` wants to run, or `None` when the player has
    /// nothing to do until more input arrives.
    pub(super) fn act(&mut self, id: EntityId) -> Option<Command> {
        let kind = self.entities.get(id)?.kind.clone();
        match kind {
            EntityKind::Player => self.player_command(id),
            EntityKind::Monster { kind, .. } => Some(self.monster_command(id, kind)),
            EntityKind::Fire => Some(self.fire_command(id)),
        }
    }

    fn player_command(&mut self, id: EntityId) -> Option<Command> {
        let pos = self.entities.get(id)?.pos;
        let Some(intent) = self.intents.pop_front() else {
            return if self.auto_explore { self.auto_explore_command(pos) } else { None };
        };
        if intent != PlayerIntent::AutoExplore {
            self.auto_explore = false;
        }
        match intent {
            PlayerIntent::Move(dir) => Some(Command::Move { to: pos.offset(dir) }),
            PlayerIntent::Wait => Some(Command::wait()),
            PlayerIntent::Ability { action, aim } => {
                let targets = action.zone.targets(&self.grid, pos, aim);
                Some(Command::Act(ActionCommand::single(action, targets)))
            }
            PlayerIntent::AutoExplore => {
                self.auto_explore = true;
                self.auto_explore_command(pos)
            }
        }
    }

    fn monster_command(&mut self, id: EntityId, kind: MonsterKind) -> Command {
        let Some(monster) = self.entities.get(id) else {
            return Command::wait();
        };
        let pos = monster.pos;
        let stats = get_monster_stats(kind);
        let Some(target) = self.player().map(|player| player.pos) else {
            return Command::wait();
        };
        let Some(distance) = self.player_field.cost(pos) else {
            return Command::wait();
        };

        match kind {
            MonsterKind::Goblin => {
                if distance <= stats.awareness {
                    self.chase(pos, target)
                } else {
                    Command::wait()
                }
            }
            MonsterKind::Titan => {
                if distance <= 2
                    && let Some(attack) = self.titan_attack(id, pos, target)
                {
                    attack
                } else if distance < stats.awareness {
                    self.chase(pos, target)
                } else {
                    Command::wait()
                }
            }
            MonsterKind::Sentinel => {
                if distance <= stats.awareness && pos.chebyshev(target) == 1 {
                    Command::Move { to: target }
                } else {
                    Command::wait()
                }
            }
        }
    }

    /// Steps down the player field; bumping into the player becomes an attack
    /// during validation.
    fn chase(&self, pos: Pos, target: Pos) -> Command {
        if pos.chebyshev(target) == 1 {
            return Command::Move { to: target };
        }
        let grid = &self.grid;
        match self.player_field.move_toward_where(pos, |next| next == target || grid.is_walkable(next)) {
            Some(step) => Command::Move { to: step.pos },
            None => Command::wait(),
        }
    }

    /// The next attack in the titan's cycle, if it would land on `target`.
    /// The cycle only advances when the attack is used.
    fn titan_attack(&mut self, id: EntityId, pos: Pos, target: Pos) -> Option<Command> {
        let Some(EntityKind::Monster { attack_cursor, .. }) =
            self.entities.get(id).map(|titan| &titan.kind)
        else {
            return None;
        };
        let attacks = titan_attacks();
        let cursor = *attack_cursor % attacks.len();
        let action = attacks[cursor];
        let targets = action.zone.targets(&self.grid, pos, target);
        if !targets.contains(&target) {
            return None;
        }

        if let Some(EntityKind::Monster { attack_cursor, .. }) =
            self.entities.get_mut(id).map(|titan| &mut titan.kind)
        {
            *attack_cursor = (cursor + 1) % attacks.len();
        }
        Some(Command::Act(ActionCommand::single(action, targets)))
    }

    /// Burns on while its tile has fuel, scorching the tile and threatening
    /// every neighbor. With no fuel left the fire goes out instead.
    fn fire_command(&self, id: EntityId) -> Command {
        let Some(pos) = self.entities.get(id).map(|fire| fire.pos) else {
            return Command::Extinguish;
        };
        if self.grid.tile(pos).is_none_or(|tile| tile.fuel == 0) {
            return Command::Extinguish;
        }

        let scorch = Action {
            effect: Effect::Damage { power: self.config.fire_damage },
            zone: TargetZone::Single,
            energy_cost: FULL_TURN,
        };
        let spread = Action { effect: Effect::Ignite, zone: TargetZone::Burst { radius: 1 }, energy_cost: 0 };
        Command::Burn(ActionCommand {
            steps: vec![
                ActionStep { action: scorch, targets: vec![pos] },
                ActionStep { action: spread, targets: spread.zone.targets(&self.grid, pos, pos) },
            ],
        })
    }

    /// How `target` responds to an action from `source` landing on it.
    pub(super) fn reaction(&self, target: EntityId, source: EntityId) -> Reaction {
        let Some(reactor) = self.entities.get(target) else {
            return Reaction::default();
        };
        let Some(body) = reactor.body.as_ref() else {
            return Reaction::default();
        };

        // Only actors standing next to the reactor can be struck back.
        let counter = self
            .entities
            .get(source)
            .filter(|attacker| attacker.is_actor() && attacker.pos.chebyshev(reactor.pos) == 1)
            .map(|attacker| {
                Command::Act(ActionCommand::single(basic_attack(body.attack), vec![attacker.pos]))
            });

        match body.reaction {
            ReactionProfile::None => Reaction::default(),
            ReactionProfile::Counter => Reaction { command: counter, delayed: false, negating: false },
            ReactionProfile::Block => Reaction { command: None, delayed: false, negating: true },
            ReactionProfile::Brace => Reaction { command: counter, delayed: false, negating: true },
            ReactionProfile::Prompt => Reaction { command: None, delayed: true, negating: false },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::test_support::*;

    #[test]
    fn goblin_steps_toward_the_player() {
        let mut game = arena_game(open_room_fixture());
        let goblin = game.spawn_monster(MonsterKind::Goblin, Pos { y: 5, x: 8 }).expect("goblin");
        // SW and W both lead to cost 2; SW comes first in enumeration order.
        assert_eq!(game.act(goblin), Some(Command::Move { to: Pos { y: 6, x: 7 } }));
    }

    #[test]
    fn goblin_next_to_the_player_attacks_through_its_move() {
        let mut game = arena_game(open_room_fixture());
        let player = game.player_id().expect("player");
        let goblin = game.spawn_monster(MonsterKind::Goblin, Pos { y: 4, x: 4 }).expect("goblin");
        let command = game.act(goblin).expect("command");
        assert_eq!(command, Command::Move { to: Pos { y: 5, x: 5 } });

        let hp = game.player().and_then(Entity::hp).expect("hp");
        assert!(game.execute_command(goblin, Some(command)));
        assert!(game.player().and_then(Entity::hp).expect("hp") < hp);
        assert_eq!(game.entity(goblin).map(|goblin| goblin.pos), Some(Pos { y: 4, x: 4 }));
        assert!(game.log().iter().any(
            |event| matches!(event, LogEvent::Hit { source, target, .. } if *source == goblin && *target == player)
        ));
    }

    #[test]
    fn monsters_outside_the_explored_area_wait() {
        let (grid, _) = open_room_fixture();
        let mut game = Game::new(grid, 3, SimConfig::default());
        let goblin = game.spawn_monster(MonsterKind::Goblin, Pos { y: 2, x: 2 }).expect("goblin");
        assert_eq!(game.act(goblin), Some(Command::wait()), "no player to chase");
    }

    #[test]
    fn titan_cycles_through_its_attacks() {
        let mut game = arena_game(open_room_fixture());
        let titan = game.spawn_monster(MonsterKind::Titan, Pos { y: 5, x: 6 }).expect("titan");
        let attacks = titan_attacks();

        for expected in [attacks[0], attacks[1], attacks[2], attacks[0]] {
            let Some(Command::Act(command)) = game.act(titan) else {
                panic!("adjacent titan should attack");
            };
            assert_eq!(command.steps[0].action, expected);
        }
    }

    #[test]
    fn titan_walks_around_a_corner_its_line_cannot_cross() {
        let (grid, _) = open_room_fixture();
        let mut grid = explored(grid);
        grid.set_kind(Pos { y: 4, x: 3 }, TileKind::Wall);
        let mut game = arena_game((grid, Pos { y: 5, x: 4 }));
        let titan = game.spawn_monster(MonsterKind::Titan, Pos { y: 3, x: 3 }).expect("titan");
        assert_eq!(game.player_field().cost(Pos { y: 3, x: 3 }), Some(2));

        let command = game.act(titan).expect("command");
        assert_eq!(command, Command::Move { to: Pos { y: 4, x: 4 } });
        assert_eq!(game.validate(titan, &command), Validation::Accepted);
        assert!(
            matches!(game.entity(titan).map(|titan| &titan.kind), Some(EntityKind::Monster { attack_cursor: 0, .. })),
            "an unused attack keeps its place in the cycle"
        );
    }

    #[test]
    fn titan_heavy_attack_waits_until_adjacent() {
        let mut game = arena_game(open_room_fixture());
        let titan = game.spawn_monster(MonsterKind::Titan, Pos { y: 5, x: 7 }).expect("titan");
        assert!(matches!(game.act(titan), Some(Command::Act(_))));
        assert!(matches!(game.act(titan), Some(Command::Act(_))));
        // The burst only covers the titan's neighbors, so it closes in instead.
        assert!(matches!(game.act(titan), Some(Command::Move { .. })));
    }

    #[test]
    fn titan_line_attack_reaches_the_player_two_tiles_away() {
        let mut game = arena_game(open_room_fixture());
        let titan = game.spawn_monster(MonsterKind::Titan, Pos { y: 5, x: 7 }).expect("titan");
        let Some(Command::Act(command)) = game.act(titan) else {
            panic!("titan in range should attack");
        };
        assert_eq!(command.steps[0].targets, vec![Pos { y: 5, x: 6 }, Pos { y: 5, x: 5 }]);
    }

    #[test]
    fn sentinel_only_strikes_adjacent_players() {
        let mut game = arena_game(open_room_fixture());
        let far = game.spawn_monster(MonsterKind::Sentinel, Pos { y: 5, x: 7 }).expect("far");
        let near = game.spawn_monster(MonsterKind::Sentinel, Pos { y: 6, x: 6 }).expect("near");
        assert_eq!(game.act(far), Some(Command::wait()));
        assert_eq!(game.act(near), Some(Command::Move { to: Pos { y: 5, x: 5 } }));
    }

    #[test]
    fn player_follows_queued_intents_then_yields() {
        let mut game = arena_game(open_room_fixture());
        let player = game.player_id().expect("player");
        game.submit_intent(PlayerIntent::Move(Direction::NE));
        game.submit_intent(PlayerIntent::Wait);

        assert_eq!(game.act(player), Some(Command::Move { to: Pos { y: 4, x: 6 } }));
        assert_eq!(game.act(player), Some(Command::wait()));
        assert_eq!(game.act(player), None);
    }

    #[test]
    fn ability_intent_is_aimed_from_the_player() {
        let mut game = arena_game(open_room_fixture());
        let player = game.player_id().expect("player");
        let bolt = Action {
            effect: Effect::Damage { power: 15 },
            zone: TargetZone::Line { range: 3 },
            energy_cost: HALF_TURN,
        };
        game.submit_intent(PlayerIntent::Ability { action: bolt, aim: Pos { y: 2, x: 5 } });

        let Some(Command::Act(command)) = game.act(player) else {
            panic!("ability should become an action command");
        };
        assert_eq!(
            command.steps[0].targets,
            vec![Pos { y: 4, x: 5 }, Pos { y: 3, x: 5 }, Pos { y: 2, x: 5 }]
        );
        assert_eq!(command.energy_cost(), HALF_TURN);
    }

    #[test]
    fn fire_consumes_fuel_only_when_it_burns() {
        let mut game = arena_game(open_room_fixture());
        let spot = Pos { y: 2, x: 2 };
        let fire = game.spawn_fire(spot).expect("fire");
        game.grid.tile_mut(spot).expect("tile").fuel = 1;

        let burn = game.act(fire).expect("command");
        assert!(matches!(burn, Command::Burn(_)));
        assert_eq!(game.act(fire), Some(burn.clone()), "deciding leaves the fuel alone");
        assert_eq!(game.grid().tile(spot).map(|tile| tile.fuel), Some(1));

        assert!(game.execute_command(fire, Some(burn)));
        assert_eq!(game.grid().tile(spot).map(|tile| tile.fuel), Some(0));
        assert_eq!(game.act(fire), Some(Command::Extinguish));
    }

    #[test]
    fn reactions_follow_the_profile() {
        let mut game = arena_game(open_room_fixture());
        let player = game.player_id().expect("player");
        let titan = game.spawn_monster(MonsterKind::Titan, Pos { y: 5, x: 6 }).expect("titan");

        let counter = game.reaction(titan, player);
        assert!(matches!(counter.command, Some(Command::Act(_))));
        assert!(!counter.negating);

        set_reaction(&mut game, titan, ReactionProfile::Brace);
        let brace = game.reaction(titan, player);
        assert!(brace.command.is_some() && brace.negating);

        let far_titan = game.spawn_monster(MonsterKind::Titan, Pos { y: 2, x: 2 }).expect("titan");
        assert_eq!(game.reaction(far_titan, player), Reaction::default(), "no counter at range");
    }
}
