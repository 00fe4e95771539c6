use crate::game::{Action, Effect, TargetZone};
use crate::types::{MonsterKind, ReactionProfile};

pub const FULL_TURN: i32 = 120;
pub const HALF_TURN: i32 = FULL_TURN / 2;
pub const DOUBLE_TURN: i32 = FULL_TURN * 2;

pub const DEFAULT_DAMAGE: i32 = 5;

pub const LOW_BURN_CHANCE: f64 = 0.2;
pub const MEDIUM_BURN_CHANCE: f64 = 0.4;
pub const HIGH_BURN_CHANCE: f64 = 0.8;

pub const PLAYER_HP: i32 = 100;
pub const PLAYER_ARMOR: i32 = 2;
pub const PLAYER_ATTACK: i32 = 20;

pub struct MonsterStats {
    pub hp: i32,
    pub armor: i32,
    pub refresh_rate: i32,
    /// Player-field distance beyond which the monster ignores the player.
    pub awareness: u32,
    pub reaction: ReactionProfile,
    pub blocks_light: bool,
}

pub fn get_monster_stats(kind: MonsterKind) -> MonsterStats {
    match kind {
        MonsterKind::Goblin => MonsterStats {
            hp: 30,
            armor: 0,
            refresh_rate: 12,
            awareness: 10,
            reaction: ReactionProfile::None,
            blocks_light: false,
        },
        MonsterKind::Titan => MonsterStats {
            hp: 200,
            armor: 5,
            refresh_rate: 8,
            awareness: 12,
            reaction: ReactionProfile::Counter,
            blocks_light: true,
        },
        MonsterKind::Sentinel => MonsterStats {
            hp: 60,
            armor: 3,
            refresh_rate: 10,
            awareness: 1,
            reaction: ReactionProfile::Block,
            blocks_light: true,
        },
    }
}

/// Melee strike every actor falls back to when it bumps into another one.
pub fn basic_attack(power: i32) -> Action {
    Action { effect: Effect::Damage { power }, zone: TargetZone::Single, energy_cost: FULL_TURN }
}

/// The titan cycles through these in order.
pub fn titan_attacks() -> [Action; 3] {
    [
        Action {
            effect: Effect::Damage { power: 25 },
            zone: TargetZone::Line { range: 2 },
            energy_cost: FULL_TURN,
        },
        Action {
            effect: Effect::Damage { power: 25 },
            zone: TargetZone::Line { range: 2 },
            energy_cost: FULL_TURN,
        },
        Action {
            effect: Effect::Damage { power: 50 },
            zone: TargetZone::Burst { radius: 1 },
            energy_cost: DOUBLE_TURN,
        },
    ]
}

pub fn monster_attack_power(kind: MonsterKind) -> i32 {
    match kind {
        MonsterKind::Goblin => 8,
        MonsterKind::Titan => 25,
        MonsterKind::Sentinel => 12,
    }
}

/// Two rooms joined by a door, a grass patch around a fire, and one of each monster.
pub const DEMO_ARENA: &str = "
####################
#@.....#....\"\"\"....#
#......#....\"^\"....#
#......+....\"\"\"...g#
#......#...........#
####.#####.....S...#
#........#.........#
#..g.....#.....T...#
####################
";
