use serde::{Deserialize, Serialize};
use slotmap::new_key_type;

new_key_type! {
    pub struct EntityId;
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Pos {
    pub y: i32,
    pub x: i32,
}

impl Pos {
    pub fn offset(self, dir: Direction) -> Pos {
        let (dy, dx) = dir.delta();
        Pos { y: self.y + dy, x: self.x + dx }
    }

    pub fn chebyshev(self, other: Pos) -> u32 {
        self.x.abs_diff(other.x).max(self.y.abs_diff(other.y))
    }
}

/// The eight principal directions, in the enumeration order used for
/// neighbor scans, octant sweeps and tie-breaking.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    N,
    NE,
    E,
    SE,
    S,
    SW,
    W,
    NW,
}

impl Direction {
    pub const ALL: [Direction; 8] = [
        Direction::N,
        Direction::NE,
        Direction::E,
        Direction::SE,
        Direction::S,
        Direction::SW,
        Direction::W,
        Direction::NW,
    ];

    /// `(dy, dx)` with y growing southwards.
    pub fn delta(self) -> (i32, i32) {
        match self {
            Direction::N => (-1, 0),
            Direction::NE => (-1, 1),
            Direction::E => (0, 1),
            Direction::SE => (1, 1),
            Direction::S => (1, 0),
            Direction::SW => (1, -1),
            Direction::W => (0, -1),
            Direction::NW => (-1, -1),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum TileKind {
    Wall,
    Floor,
    Grass,
    ClosedDoor,
    OpenDoor,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Flammability {
    None,
    Low,
    Medium,
    High,
}

impl TileKind {
    pub fn flammability(self) -> Flammability {
        match self {
            TileKind::Wall => Flammability::None,
            TileKind::Floor => Flammability::Low,
            TileKind::ClosedDoor | TileKind::OpenDoor => Flammability::Medium,
            TileKind::Grass => Flammability::High,
        }
    }
}

impl Flammability {
    pub fn ignite_chance(self) -> f64 {
        match self {
            Flammability::None => 0.0,
            Flammability::Low => crate::content::LOW_BURN_CHANCE,
            Flammability::Medium => crate::content::MEDIUM_BURN_CHANCE,
            Flammability::High => crate::content::HIGH_BURN_CHANCE,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum MonsterKind {
    Goblin,
    Titan,
    Sentinel,
}

/// How an actor responds when an action lands on its tile.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ReactionProfile {
    None,
    /// Strike back at the source before the action resolves.
    Counter,
    /// Absorb the action completely.
    Block,
    /// Strike back and absorb.
    Brace,
    /// Hand control back to the input layer before the action resolves.
    Prompt,
}

/// What the input layer asks the player character to do next.
#[derive(Clone, Debug, PartialEq)]
pub enum PlayerIntent {
    Move(Direction),
    Wait,
    Ability { action: crate::game::Action, aim: Pos },
    AutoExplore,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum RunOutcome {
    Defeat,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StopReason {
    /// The player has no command queued, or the last one was invalid.
    AwaitingInput,
    /// A delayed reaction asked the loop to yield.
    Halted,
    Finished(RunOutcome),
    /// No live entity can ever accumulate enough energy to act.
    Stalled,
    BudgetExhausted,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AdvanceResult {
    pub turns_taken: u32,
    pub stop_reason: StopReason,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum AutoExploreStop {
    NothingLeft,
    HostileInView,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum LogEvent {
    Moved { entity: EntityId, to: Pos },
    Waited { entity: EntityId },
    DoorOpened { by: EntityId, at: Pos },
    Hit { source: EntityId, target: EntityId, damage: i32 },
    Reacted { entity: EntityId, profile: ReactionProfile },
    ActionNegated { target: EntityId, at: Pos },
    Died { entity: EntityId },
    InvalidAction { entity: EntityId },
    FireStarted { at: Pos },
    FireBurnedOut { at: Pos },
    AutoExploreStopped { reason: AutoExploreStop },
}
