//! Stable snapshot hashing for deterministic verification.
//! This module exists to keep hashing concerns separate from simulation control code.
//! It does not own snapshot serialization or how runs are replayed.

use std::hash::Hasher;

use super::*;
use xxhash_rust::xxh3::Xxh3;

impl Game {
    /// Digest of everything a snapshot persists plus tile occupancy. Two runs
    /// from the same seed and intents produce the same value.
    pub fn snapshot_hash(&self) -> u64 {
        let mut hasher = Xxh3::new();
        hasher.write_u64(self.seed);
        hasher.write_u64(self.turn);
        hasher.write_u64(self.rng_draws);
        hasher.write_u8(match self.outcome {
            None => 0,
            Some(RunOutcome::Defeat) => 1,
        });

        for entity in self.entities.values() {
            hasher.write_i32(entity.pos.y);
            hasher.write_i32(entity.pos.x);
            hasher.write_i32(entity.energy);
            hasher.write_i32(entity.refresh_rate);
            hasher.write_i32(entity.hp().unwrap_or(-1));
            match entity.kind {
                EntityKind::Player => hasher.write_u8(0),
                EntityKind::Monster { kind, attack_cursor } => {
                    hasher.write_u8(1);
                    hasher.write_u8(kind as u8);
                    hasher.write_usize(attack_cursor);
                }
                EntityKind::Fire => hasher.write_u8(2),
            }
        }

        for tile in self.grid.tiles() {
            hasher.write_u8(tile.kind as u8);
            hasher.write_u8(u8::from(tile.explored));
            hasher.write_u8(tile.fuel);
            hasher.write_u8(u8::from(tile.is_occupied()));
        }
        hasher.finish()
    }
}
