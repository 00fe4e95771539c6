//! Level construction, entity lifecycle, and rebuilding transient state after a load.
//! This module exists to keep every spawn and removal consistent across grid, store and scheduler.
//! It does not own turn advancement or what spawned entities decide to do.

use super::*;
use crate::grid::parse_layout;

impl Game {
    /// A fresh level on `grid` with no entities. Every tile gets the
    /// configured fire fuel.
    pub fn new(mut grid: Grid, seed: u64, config: SimConfig) -> Self {
        for tile in grid.tiles_mut() {
            tile.fuel = config.fire_fuel;
        }
        let mut game = Self::assemble(grid, ChaCha8Rng::seed_from_u64(seed), seed, config);
        game.refresh();
        game
    }

    /// Builds a level from an ASCII layout and spawns its markers.
    pub fn from_layout(text: &str, seed: u64, config: SimConfig) -> Result<Self, SimError> {
        let layout = parse_layout(text)?;
        let mut game = Self::new(layout.grid, seed, config);
        if let Some(pos) = layout.player {
            game.spawn_player(pos)?;
        }
        for (kind, pos) in layout.monsters {
            game.spawn_monster(kind, pos)?;
        }
        for pos in layout.fires {
            game.spawn_fire(pos)?;
        }
        Ok(game)
    }

    fn assemble(mut grid: Grid, rng: ChaCha8Rng, seed: u64, config: SimConfig) -> Self {
        grid.set_visible_threshold(config.min_visible_light);
        let (width, height) = (grid.width(), grid.height());
        Self {
            config,
            seed,
            rng,
            rng_draws: 0,
            turn: 0,
            grid,
            entities: SlotMap::with_key(),
            scheduler: Scheduler::new(),
            player_field: DistanceField::unreached(width, height),
            explore_field: DistanceField::unreached(width, height),
            player: None,
            intents: VecDeque::new(),
            waiting_on: None,
            auto_explore: false,
            log: Vec::new(),
            reaction_depth: 0,
            outcome: None,
        }
    }

    pub fn spawn_player(&mut self, pos: Pos) -> Result<EntityId, SimError> {
        if self.player().is_some() {
            return Err(SimError::PlayerExists);
        }
        self.check_spawn(pos)?;
        let body = Body {
            hp: PLAYER_HP,
            max_hp: PLAYER_HP,
            armor: PLAYER_ARMOR,
            attack: PLAYER_ATTACK,
            blocks_light: false,
            reaction: ReactionProfile::None,
        };
        let refresh_rate = self.config.default_refresh_rate;
        let id = self.insert_entity(pos, EntityKind::Player, Some(body), refresh_rate);
        self.player = Some(id);
        self.refresh();
        Ok(id)
    }

    pub fn spawn_monster(&mut self, kind: MonsterKind, pos: Pos) -> Result<EntityId, SimError> {
        self.check_spawn(pos)?;
        let stats = get_monster_stats(kind);
        let body = Body {
            hp: stats.hp,
            max_hp: stats.hp,
            armor: stats.armor,
            attack: monster_attack_power(kind),
            blocks_light: stats.blocks_light,
            reaction: stats.reaction,
        };
        let id = self.insert_entity(
            pos,
            EntityKind::Monster { kind, attack_cursor: 0 },
            Some(body),
            stats.refresh_rate,
        );
        self.refresh();
        Ok(id)
    }

    pub fn spawn_fire(&mut self, pos: Pos) -> Result<EntityId, SimError> {
        let tile = self.grid.tile(pos).ok_or(SimError::OutOfBounds { pos })?;
        if tile.is_wall() {
            return Err(SimError::SpawnBlocked { pos });
        }
        if self.fire_at(pos).is_some() {
            return Err(SimError::AlreadyBurning { pos });
        }
        let id = self.insert_fire(pos);
        self.refresh();
        Ok(id)
    }

    pub(super) fn insert_fire(&mut self, pos: Pos) -> EntityId {
        let refresh_rate = self.config.default_refresh_rate;
        let id = self.insert_entity(pos, EntityKind::Fire, None, refresh_rate);
        self.log.push(LogEvent::FireStarted { at: pos });
        id
    }

    /// Removes a burnt-out fire; grass under it is left as bare floor.
    pub(super) fn extinguish(&mut self, fire: EntityId) {
        let Some(pos) = self.entities.get(fire).map(|fire| fire.pos) else {
            return;
        };
        if self.grid.kind_at(pos) == TileKind::Grass {
            self.grid.set_kind(pos, TileKind::Floor);
        }
        self.remove_entity(fire);
        self.log.push(LogEvent::FireBurnedOut { at: pos });
    }

    fn check_spawn(&self, pos: Pos) -> Result<(), SimError> {
        let tile = self.grid.tile(pos).ok_or(SimError::OutOfBounds { pos })?;
        if !tile.is_walkable() {
            return Err(SimError::SpawnBlocked { pos });
        }
        Ok(())
    }

    fn insert_entity(
        &mut self,
        pos: Pos,
        kind: EntityKind,
        body: Option<Body>,
        refresh_rate: i32,
    ) -> EntityId {
        let occupies = body.as_ref().map(|body| body.blocks_light);
        let id = self.entities.insert(Entity {
            id: EntityId::default(),
            pos,
            energy: 0,
            refresh_rate,
            kind,
            body,
        });
        self.entities[id].id = id;
        if let Some(blocks_light) = occupies {
            self.grid.occupy(pos, id, blocks_light);
        }
        self.scheduler.add(id);
        id
    }

    pub fn despawn(&mut self, id: EntityId) -> Result<Entity, SimError> {
        let entity = self.remove_entity(id).ok_or(SimError::UnknownEntity(id))?;
        self.refresh();
        Ok(entity)
    }

    /// Takes `id` out of the store, its tile, the live set and the heap at once.
    pub(super) fn remove_entity(&mut self, id: EntityId) -> Option<Entity> {
        let entity = self.entities.remove(id)?;
        if self.grid.occupant(entity.pos) == Some(id) {
            self.grid.vacate(entity.pos);
        }
        self.scheduler.remove(id);
        if self.waiting_on == Some(id) {
            self.waiting_on = None;
        }
        if self.player == Some(id) {
            self.player = None;
            self.intents.clear();
            self.auto_explore = false;
        }
        Some(entity)
    }

    /// Moves the player onto a new level at `entry`. Every other entity, the
    /// live set, the heap and both fields are replaced together.
    pub fn reset_level(&mut self, mut grid: Grid, entry: Pos) -> Result<(), SimError> {
        let player = self.player.filter(|id| self.entities.contains_key(*id)).ok_or(SimError::MissingPlayer)?;
        let tile = grid.tile(entry).ok_or(SimError::OutOfBounds { pos: entry })?;
        if !tile.is_walkable() {
            return Err(SimError::SpawnBlocked { pos: entry });
        }

        for tile in grid.tiles_mut() {
            tile.fuel = self.config.fire_fuel;
        }
        grid.set_visible_threshold(self.config.min_visible_light);
        self.grid = grid;
        self.entities.retain(|id, _| id == player);
        self.intents.clear();
        self.auto_explore = false;
        if let Some(entity) = self.entities.get_mut(player) {
            entity.pos = entry;
        }
        debug!(?entry, "level reset");
        self.rebuild_derived_state();
        Ok(())
    }

    /// Re-registers every live entity with the grid and scheduler, then
    /// recomputes sight and both fields. Used after loading and level changes.
    pub fn rebuild_derived_state(&mut self) {
        self.scheduler.clear();
        self.waiting_on = None;
        self.grid.clear_occupants();
        for entity in self.entities.values() {
            if let Some(body) = entity.body.as_ref() {
                self.grid.occupy(entity.pos, entity.id, body.blocks_light);
            }
            self.scheduler.add(entity.id);
        }
        self.refresh();
    }

    pub fn snapshot(&self) -> LevelSnapshot {
        LevelSnapshot {
            seed: self.seed,
            rng_draws: self.rng_draws,
            turn: self.turn,
            config: self.config.clone(),
            width: self.grid.width(),
            height: self.grid.height(),
            tiles: self.grid.records(),
            entities: self.entities.clone(),
            player: self.player,
            auto_explore: self.auto_explore,
            outcome: self.outcome,
        }
    }

    /// Restores a level and rebuilds the heap and fields from it.
    pub fn from_snapshot(snapshot: LevelSnapshot) -> Result<Self, SimError> {
        let LevelSnapshot {
            seed,
            rng_draws,
            turn,
            config,
            width,
            height,
            tiles,
            entities,
            player,
            auto_explore,
            outcome,
        } = snapshot;

        if tiles.len() != width * height {
            return Err(SimError::SnapshotShape { found: tiles.len(), width, height });
        }
        match player {
            Some(id) if !entities.contains_key(id) => return Err(SimError::UnknownEntity(id)),
            None if outcome.is_none() => return Err(SimError::MissingPlayer),
            _ => {}
        }

        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        for _ in 0..rng_draws {
            rng.next_u64();
        }
        let grid = Grid::from_records(width, height, &tiles);
        let mut game = Self::assemble(grid, rng, seed, config);
        game.rng_draws = rng_draws;
        game.turn = turn;
        game.entities = entities;
        game.player = player;
        game.auto_explore = auto_explore;
        game.outcome = outcome;
        game.rebuild_derived_state();
        Ok(game)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::test_support::*;

    #[test]
    fn spawning_rejects_walls_occupied_tiles_and_second_players() {
        let mut game = arena_game(open_room_fixture());
        assert_eq!(
            game.spawn_monster(MonsterKind::Goblin, Pos { y: 0, x: 0 }),
            Err(SimError::SpawnBlocked { pos: Pos { y: 0, x: 0 } })
        );
        assert_eq!(
            game.spawn_monster(MonsterKind::Goblin, Pos { y: 5, x: 5 }),
            Err(SimError::SpawnBlocked { pos: Pos { y: 5, x: 5 } })
        );
        assert_eq!(
            game.spawn_monster(MonsterKind::Goblin, Pos { y: 20, x: 5 }),
            Err(SimError::OutOfBounds { pos: Pos { y: 20, x: 5 } })
        );
        assert_eq!(game.spawn_player(Pos { y: 2, x: 2 }), Err(SimError::PlayerExists));
    }

    #[test]
    fn fires_do_not_occupy_and_cannot_stack() {
        let mut game = arena_game(open_room_fixture());
        let spot = Pos { y: 3, x: 3 };
        game.spawn_fire(spot).expect("fire");
        assert!(game.entity_at(spot).is_none());
        assert!(game.fire_at(spot).is_some());
        assert_eq!(game.spawn_fire(spot), Err(SimError::AlreadyBurning { pos: spot }));
    }

    #[test]
    fn from_layout_spawns_every_marker() {
        let game = Game::from_layout(
            "#######\n#@..g.#\n#..\"..#\n#T.^.S#\n#######\n",
            9,
            SimConfig::default(),
        )
        .expect("layout");
        assert_eq!(game.player().map(|player| player.pos), Some(Pos { y: 1, x: 1 }));
        assert_eq!(game.entities().filter(|entity| entity.is_hostile()).count(), 3);
        assert!(game.fire_at(Pos { y: 3, x: 3 }).is_some());
        assert_eq!(game.scheduler().live_count(), 5);
    }

    #[test]
    fn despawning_an_unknown_entity_is_an_error() {
        let mut game = arena_game(open_room_fixture());
        let goblin = game.spawn_monster(MonsterKind::Goblin, Pos { y: 2, x: 2 }).expect("goblin");
        game.despawn(goblin).expect("first despawn");
        assert_eq!(game.despawn(goblin), Err(SimError::UnknownEntity(goblin)));
    }

    #[test]
    fn reset_level_keeps_only_the_player() {
        let mut game = arena_game(open_room_fixture());
        let player = game.player_id().expect("player");
        game.spawn_monster(MonsterKind::Goblin, Pos { y: 2, x: 2 }).expect("goblin");
        game.spawn_fire(Pos { y: 7, x: 7 }).expect("fire");

        let (next, _) = wall_occlusion_fixture();
        game.reset_level(next, Pos { y: 5, x: 2 }).expect("reset");

        assert_eq!(game.entities().count(), 1);
        assert_eq!(game.scheduler().live_count(), 1);
        assert_eq!(game.player().map(|player| player.pos), Some(Pos { y: 5, x: 2 }));
        assert_eq!(game.entity_at(Pos { y: 5, x: 2 }).map(|entity| entity.id), Some(player));
        assert_eq!(game.player_field().cost(Pos { y: 5, x: 2 }), Some(0));
        assert_eq!(game.player_field().cost(Pos { y: 5, x: 4 }), Some(2));
    }

    #[test]
    fn reset_level_rejects_a_blocked_entry() {
        let mut game = arena_game(open_room_fixture());
        let (next, _) = wall_occlusion_fixture();
        assert_eq!(
            game.reset_level(next, Pos { y: 1, x: 1 }),
            Err(SimError::SpawnBlocked { pos: Pos { y: 1, x: 1 } })
        );
        assert_eq!(game.grid().width(), 10, "the old level stays in place");
    }

    #[test]
    fn snapshot_round_trip_rebuilds_transient_state() {
        let mut game = arena_game(open_room_fixture());
        let goblin = game.spawn_monster(MonsterKind::Goblin, Pos { y: 2, x: 7 }).expect("goblin");
        game.spawn_fire(Pos { y: 7, x: 2 }).expect("fire");
        for _ in 0..4 {
            game.submit_intent(PlayerIntent::Wait);
        }
        game.advance(40);

        let json = serde_json::to_string(&game.snapshot()).expect("serialize");
        let snapshot: LevelSnapshot = serde_json::from_str(&json).expect("deserialize");
        let restored = Game::from_snapshot(snapshot).expect("restore");

        assert_eq!(restored.snapshot_hash(), game.snapshot_hash());
        assert_eq!(restored.entity(goblin).map(|goblin| goblin.pos), game.entity(goblin).map(|goblin| goblin.pos));
        assert_eq!(restored.scheduler().live_count(), game.scheduler().live_count());
        assert_eq!(restored.scheduler().queued_count(), 0, "the heap is rebuilt lazily");
        assert_eq!(restored.player_field(), game.player_field());
        assert_eq!(restored.explore_field(), game.explore_field());
    }

    #[test]
    fn snapshot_without_a_player_is_rejected() {
        let mut game = arena_game(open_room_fixture());
        let mut snapshot = game.snapshot();
        snapshot.player = None;
        assert_eq!(Game::from_snapshot(snapshot).err(), Some(SimError::MissingPlayer));

        let player = game.player_id().expect("player");
        game.despawn(player).expect("despawn");
        let mut snapshot = game.snapshot();
        snapshot.player = Some(player);
        assert_eq!(Game::from_snapshot(snapshot).err(), Some(SimError::UnknownEntity(player)));
    }
}
