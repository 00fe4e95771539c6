//! Player auto-explore driven by the distance field to unexplored cells.
//! This module exists to turn the explore field into one step at a time and to decide when to stop.
//! It does not own the field computation or how the step is validated.

use super::*;

impl Game {
    /// One step toward the nearest unexplored cell, or `None` after logging
    /// why exploring stopped.
    pub(super) fn auto_explore_command(&mut self, pos: Pos) -> Option<Command> {
        if self.hostile_in_view() {
            return self.stop_auto_explore(AutoExploreStop::HostileInView);
        }
        let grid = &self.grid;
        let step = self.explore_field.move_toward_where(pos, |next| {
            grid.is_walkable(next) || grid.kind_at(next) == TileKind::ClosedDoor
        });
        match step {
            Some(step) => Some(Command::Move { to: step.pos }),
            None => self.stop_auto_explore(AutoExploreStop::NothingLeft),
        }
    }

    fn stop_auto_explore(&mut self, reason: AutoExploreStop) -> Option<Command> {
        debug!(?reason, "auto-explore stopped");
        self.auto_explore = false;
        self.log.push(LogEvent::AutoExploreStopped { reason });
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::test_support::*;

    #[test]
    fn explores_until_nothing_reachable_is_left() {
        let (grid, origin) = long_hall_fixture();
        let mut game = arena_game((grid, origin));
        game.submit_intent(PlayerIntent::AutoExplore);

        let result = game.advance(500);
        assert_eq!(result.stop_reason, StopReason::AwaitingInput);
        assert!(!game.is_auto_exploring());
        assert_eq!(
            game.log().last(),
            Some(&LogEvent::AutoExploreStopped { reason: AutoExploreStop::NothingLeft })
        );
        let floor_unexplored = game
            .grid()
            .positions()
            .filter(|pos| game.grid().kind_at(*pos) != TileKind::Wall && !game.grid().is_explored(*pos))
            .count();
        assert_eq!(floor_unexplored, 0);
        assert!(game.player().is_some_and(|player| player.pos != origin), "player should have walked");
    }

    #[test]
    fn opens_doors_on_the_way() {
        let (grid, origin, door) = closed_door_fixture();
        let mut game = arena_game((grid, origin));
        game.submit_intent(PlayerIntent::AutoExplore);

        game.advance(200);
        assert_ne!(game.grid().kind_at(door), TileKind::ClosedDoor);
        assert!(game.grid().is_explored(Pos { y: 5, x: 8 }));
    }

    #[test]
    fn stops_when_a_hostile_is_visible() {
        let mut game = arena_game(open_room_fixture());
        game.spawn_monster(MonsterKind::Goblin, Pos { y: 2, x: 2 }).expect("goblin");
        let player = game.player_id().expect("player");

        assert_eq!(game.auto_explore_command(Pos { y: 5, x: 5 }), None);
        assert_eq!(
            game.log().last(),
            Some(&LogEvent::AutoExploreStopped { reason: AutoExploreStop::HostileInView })
        );
        assert!(game.entity(player).is_some());
    }

    #[test]
    fn manual_intent_cancels_exploring() {
        let (grid, origin) = long_hall_fixture();
        let mut game = arena_game((grid, origin));
        game.set_auto_explore(true);
        game.submit_intent(PlayerIntent::Wait);
        let player = game.player_id().expect("player");

        assert_eq!(game.act(player), Some(Command::wait()));
        assert!(!game.is_auto_exploring());
    }
}
