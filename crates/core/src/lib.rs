pub mod config;
pub mod content;
pub mod error;
pub mod game;
pub mod grid;
pub mod state;
pub mod types;

pub use config::SimConfig;
pub use error::SimError;
pub use game::Game;
pub use grid::{Grid, Layout, Tile, TileRecord, parse_layout};
pub use state::{Body, Entity, EntityKind, LevelSnapshot};
pub use types::*;
