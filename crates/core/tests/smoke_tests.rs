use rogue_core::{
    AutoExploreStop, Direction, Game, LogEvent, MonsterKind, PlayerIntent, Pos, ReactionProfile,
    SimConfig, StopReason, TileKind,
};

fn game_from(layout: &str) -> Game {
    Game::from_layout(layout, 7, SimConfig::default()).expect("layout")
}

fn index_of(log: &[LogEvent], wanted: impl Fn(&LogEvent) -> bool) -> usize {
    log.iter().position(|event| wanted(event)).expect("event in log")
}

#[test]
fn player_cuts_down_a_goblin_then_walks_on() {
    let mut game = game_from(
        "
#######
#.....#
#.@g..#
#.....#
#######
",
    );
    let goblin = game.entity_at(Pos { y: 2, x: 3 }).map(|goblin| goblin.id).expect("goblin");
    for _ in 0..4 {
        game.submit_intent(PlayerIntent::Move(Direction::E));
    }

    let result = game.advance(50);
    assert_eq!(result.stop_reason, StopReason::AwaitingInput);
    assert!(game.entity(goblin).is_none());
    assert!(game.log().contains(&LogEvent::Died { entity: goblin }));
    assert_eq!(game.player().map(|player| player.pos), Some(Pos { y: 2, x: 4 }));
    assert!(game.outcome().is_none());
}

#[test]
fn titan_counters_before_the_blow_lands() {
    let mut game = game_from(
        "
#######
#.....#
#.@T..#
#.....#
#######
",
    );
    let player = game.player_id().expect("player");
    let titan = game.entity_at(Pos { y: 2, x: 3 }).map(|titan| titan.id).expect("titan");
    game.submit_intent(PlayerIntent::Move(Direction::E));

    let result = game.advance(1);
    assert_eq!(result.turns_taken, 1);

    let log = game.log();
    let reacted =
        index_of(log, |event| *event == LogEvent::Reacted { entity: titan, profile: ReactionProfile::Counter });
    let counter = index_of(
        log,
        |event| matches!(event, LogEvent::Hit { source, target, .. } if *source == titan && *target == player),
    );
    let blow = index_of(
        log,
        |event| matches!(event, LogEvent::Hit { source, target, .. } if *source == player && *target == titan),
    );
    assert!(reacted < counter && counter < blow);
}

#[test]
fn sealed_fire_burns_out_and_leaves_floor() {
    let mut game = game_from(
        "
#######
#@.#\"##
#..####
#######
",
    );
    let pocket = Pos { y: 1, x: 4 };
    game.spawn_fire(pocket).expect("fire");
    for _ in 0..30 {
        game.submit_intent(PlayerIntent::Wait);
    }

    let result = game.advance(100);
    assert_eq!(result.stop_reason, StopReason::AwaitingInput);
    assert!(game.fire_at(pocket).is_none());
    assert!(game.log().contains(&LogEvent::FireBurnedOut { at: pocket }));
    assert_eq!(game.grid().kind_at(pocket), TileKind::Floor);
    assert_eq!(game.grid().tile(pocket).map(|tile| tile.fuel), Some(0));
    assert_eq!(game.scheduler().live_count(), 1);
}

#[test]
fn auto_explore_maps_both_rooms_through_a_door() {
    let mut game = game_from(
        "
##########
#@...#...#
#....+...#
#....#...#
##########
",
    );
    game.submit_intent(PlayerIntent::AutoExplore);

    let result = game.advance(500);
    assert_eq!(result.stop_reason, StopReason::AwaitingInput);
    assert_eq!(
        game.log().last(),
        Some(&LogEvent::AutoExploreStopped { reason: AutoExploreStop::NothingLeft })
    );
    assert_eq!(game.grid().kind_at(Pos { y: 2, x: 5 }), TileKind::OpenDoor);
    let grid = game.grid();
    assert!(grid.positions().all(|pos| grid.kind_at(pos) == TileKind::Wall || grid.is_explored(pos)));
}

#[test]
fn spawned_monsters_join_the_schedule() {
    let mut game = game_from(
        "
#####
#@..#
#...#
#####
",
    );
    let sentinel = game.spawn_monster(MonsterKind::Sentinel, Pos { y: 2, x: 3 }).expect("sentinel");
    assert!(game.scheduler().contains(sentinel));
    game.despawn(sentinel).expect("despawn");
    assert!(!game.scheduler().contains(sentinel));
    assert!(game.entity_at(Pos { y: 2, x: 3 }).is_none());
}
