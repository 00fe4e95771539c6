use crate::types::{EntityId, Pos};

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum SimError {
    #[error("position {pos:?} is outside the grid")]
    OutOfBounds { pos: Pos },

    #[error("cannot place an entity at {pos:?}: tile is not walkable")]
    SpawnBlocked { pos: Pos },

    #[error("a fire is already burning at {pos:?}")]
    AlreadyBurning { pos: Pos },

    #[error("unknown entity {0:?}")]
    UnknownEntity(EntityId),

    #[error("a player is already present")]
    PlayerExists,

    #[error("level has no player")]
    MissingPlayer,

    #[error("layout is empty or ragged (row {row} has width {width}, expected {expected})")]
    RaggedLayout { row: usize, width: usize, expected: usize },

    #[error("snapshot holds {found} tiles for a {width}x{height} grid")]
    SnapshotShape { found: usize, width: usize, height: usize },

    #[error("unknown layout glyph {glyph:?} at row {row}, column {column}")]
    UnknownGlyph { glyph: char, row: usize, column: usize },
}
