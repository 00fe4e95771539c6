//! Shared test fixtures for the `game` submodule test suites.
//! This module exists to avoid repeating grid and entity setup across many tests.
//! It does not own production simulation logic.

use super::*;

pub(super) fn open_room_fixture() -> (Grid, Pos) {
    (Grid::new(10, 10), Pos { y: 5, x: 5 })
}

/// A one-row corridor along y = 5 with a wall at x = 6.
pub(super) fn wall_occlusion_fixture() -> (Grid, Pos) {
    let mut grid = Grid::new(11, 11);
    for y in 1..10 {
        for x in 1..10 {
            grid.set_kind(Pos { y, x }, TileKind::Wall);
        }
    }
    for x in 1..10 {
        grid.set_kind(Pos { y: 5, x }, TileKind::Floor);
    }
    grid.set_kind(Pos { y: 5, x: 6 }, TileKind::Wall);
    (grid, Pos { y: 5, x: 3 })
}

/// Corridor along y = 5 split by a closed door. Returns grid, origin and door.
pub(super) fn closed_door_fixture() -> (Grid, Pos, Pos) {
    let mut grid = Grid::new(10, 10);
    for pos in grid.positions() {
        let open = pos.y == 5 && (1..=8).contains(&pos.x);
        grid.set_kind(pos, if open { TileKind::Floor } else { TileKind::Wall });
    }
    let door = Pos { y: 5, x: 6 };
    grid.set_kind(door, TileKind::ClosedDoor);
    (grid, Pos { y: 5, x: 5 }, door)
}

/// Two rooms separated by an unbroken wall column at x = 4.
pub(super) fn divided_room_fixture() -> Grid {
    let mut grid = Grid::new(9, 5);
    for y in 0..5 {
        grid.set_kind(Pos { y, x: 4 }, TileKind::Wall);
    }
    grid
}

pub(super) fn long_hall_fixture() -> (Grid, Pos) {
    (Grid::new(30, 5), Pos { y: 2, x: 2 })
}

pub(super) fn explored(mut grid: Grid) -> Grid {
    grid.reveal_all();
    grid
}

pub(super) fn arena_game((grid, origin): (Grid, Pos)) -> Game {
    let mut game = Game::new(grid, 7, SimConfig::default());
    game.spawn_player(origin).expect("player spawn");
    game
}

pub(super) fn set_energy(game: &mut Game, id: EntityId, energy: i32, refresh_rate: i32) {
    let entity = game.entities.get_mut(id).expect("entity");
    entity.energy = energy;
    entity.refresh_rate = refresh_rate;
}

pub(super) fn set_reaction(game: &mut Game, id: EntityId, reaction: ReactionProfile) {
    let body = game.entities.get_mut(id).and_then(|entity| entity.body.as_mut()).expect("body");
    body.reaction = reaction;
}

pub(super) fn set_hp(game: &mut Game, id: EntityId, hp: i32) {
    let body = game.entities.get_mut(id).and_then(|entity| entity.body.as_mut()).expect("body");
    body.hp = hp;
}

/// Teleports an actor, keeping grid occupancy and derived state in step.
pub(super) fn set_position(game: &mut Game, id: EntityId, pos: Pos) {
    let entity = game.entities.get_mut(id).expect("entity");
    let from = std::mem::replace(&mut entity.pos, pos);
    let blocks_light = entity.body.as_ref().is_some_and(|body| body.blocks_light);
    game.grid.vacate(from);
    game.grid.occupy(pos, id, blocks_light);
    game.refresh();
}
