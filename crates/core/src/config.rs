//! Tunable simulation parameters.
//! Every field has a default so partial configuration files stay valid.

use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// Entities enter the turn queue once their energy is strictly above this.
    pub min_turn_energy: i32,
    pub default_refresh_rate: i32,
    /// Fraction of light lost per distance band when sweeping from the player.
    pub light_decay: f64,
    pub fire_light_decay: f64,
    pub min_visible_light: f32,
    /// Distance band at which an octant sweep gives up regardless of grid size.
    pub fov_distance_cap: i32,
    /// Upper bound on alternative substitutions while validating one command.
    pub max_redirects: u32,
    pub fire_damage: i32,
    pub fire_fuel: u8,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            min_turn_energy: 0,
            default_refresh_rate: 10,
            light_decay: 0.1,
            fire_light_decay: 0.3,
            min_visible_light: 0.25,
            fov_distance_cap: 100,
            max_redirects: 16,
            fire_damage: 10,
            fire_fuel: 10,
        }
    }
}
