//! Tile storage and the walkability, occupancy and lighting queries every
//! other component reads.
//! Cells reference occupants by id only; entities own their positions.

use serde::{Deserialize, Serialize};

use crate::error::SimError;
use crate::types::{Direction, EntityId, MonsterKind, Pos, TileKind};

#[derive(Clone, Debug, PartialEq)]
pub struct Tile {
    pub kind: TileKind,
    pub occupant: Option<EntityId>,
    pub explored: bool,
    pub los: bool,
    /// Burn time left for a fire on this tile.
    pub fuel: u8,
    occupant_blocks_light: bool,
    light: f32,
}

impl Tile {
    pub fn new(kind: TileKind, fuel: u8) -> Self {
        Self {
            kind,
            occupant: None,
            explored: false,
            los: false,
            fuel,
            occupant_blocks_light: false,
            light: 0.0,
        }
    }

    pub fn light(&self) -> f32 {
        self.light
    }

    pub fn set_light(&mut self, value: f32) {
        self.light = value.clamp(0.0, 1.0);
    }

    pub fn add_light(&mut self, value: f32) {
        self.set_light(self.light + value);
    }

    pub fn is_wall(&self) -> bool {
        self.kind == TileKind::Wall
    }

    pub fn is_occupied(&self) -> bool {
        self.occupant.is_some()
    }

    pub fn is_walkable(&self) -> bool {
        !self.is_wall() && !self.is_occupied() && self.kind != TileKind::ClosedDoor
    }

    pub fn blocks_light(&self) -> bool {
        self.kind == TileKind::ClosedDoor || self.occupant_blocks_light
    }

    pub fn is_lightable(&self) -> bool {
        !self.is_wall() && !self.blocks_light()
    }
}

#[derive(Clone, Debug)]
pub struct Grid {
    width: usize,
    height: usize,
    tiles: Vec<Tile>,
    visible_threshold: f32,
}

impl Grid {
    /// Open floor surrounded by a one-tile wall border.
    pub fn new(width: usize, height: usize) -> Self {
        let mut tiles = Vec::with_capacity(width * height);
        for y in 0..height {
            for x in 0..width {
                let border = x == 0 || y == 0 || x + 1 == width || y + 1 == height;
                let kind = if border { TileKind::Wall } else { TileKind::Floor };
                tiles.push(Tile::new(kind, DEFAULT_FUEL));
            }
        }
        Self { width, height, tiles, visible_threshold: DEFAULT_VISIBLE_THRESHOLD }
    }

    /// Terrain only; spawn markers become floor. See [`parse_layout`].
    pub fn from_ascii(text: &str) -> Result<Self, SimError> {
        parse_layout(text).map(|layout| layout.grid)
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn in_bounds(&self, pos: Pos) -> bool {
        pos.x >= 0 && pos.y >= 0 && (pos.x as usize) < self.width && (pos.y as usize) < self.height
    }

    pub fn tile(&self, pos: Pos) -> Option<&Tile> {
        self.in_bounds(pos).then(|| &self.tiles[self.index(pos)])
    }

    pub fn tile_mut(&mut self, pos: Pos) -> Option<&mut Tile> {
        if !self.in_bounds(pos) {
            return None;
        }
        let idx = self.index(pos);
        Some(&mut self.tiles[idx])
    }

    /// The tile at `pos`, or the nearest in-bounds tile when `pos` is outside.
    /// `None` only for an empty grid.
    pub fn clamped(&self, pos: Pos) -> Option<&Tile> {
        if self.tiles.is_empty() {
            return None;
        }
        let x = pos.x.clamp(0, self.width as i32 - 1);
        let y = pos.y.clamp(0, self.height as i32 - 1);
        self.tile(Pos { y, x })
    }

    pub fn kind_at(&self, pos: Pos) -> TileKind {
        self.tile(pos).map_or(TileKind::Wall, |tile| tile.kind)
    }

    pub fn set_kind(&mut self, pos: Pos, kind: TileKind) {
        if let Some(tile) = self.tile_mut(pos) {
            tile.kind = kind;
        }
    }

    pub fn is_walkable(&self, pos: Pos) -> bool {
        self.tile(pos).is_some_and(Tile::is_walkable)
    }

    pub fn is_explored(&self, pos: Pos) -> bool {
        self.tile(pos).is_some_and(|tile| tile.explored)
    }

    pub fn is_visible(&self, pos: Pos) -> bool {
        self.tile(pos).is_some_and(|tile| tile.los && tile.light() > self.visible_threshold)
    }

    pub fn occupant(&self, pos: Pos) -> Option<EntityId> {
        self.tile(pos).and_then(|tile| tile.occupant)
    }

    pub fn visible_threshold(&self) -> f32 {
        self.visible_threshold
    }

    pub fn set_visible_threshold(&mut self, threshold: f32) {
        self.visible_threshold = threshold;
    }

    pub fn occupy(&mut self, pos: Pos, entity: EntityId, blocks_light: bool) {
        if let Some(tile) = self.tile_mut(pos) {
            tile.occupant = Some(entity);
            tile.occupant_blocks_light = blocks_light;
        }
    }

    pub fn vacate(&mut self, pos: Pos) {
        if let Some(tile) = self.tile_mut(pos) {
            tile.occupant = None;
            tile.occupant_blocks_light = false;
        }
    }

    pub fn clear_occupants(&mut self) {
        for tile in &mut self.tiles {
            tile.occupant = None;
            tile.occupant_blocks_light = false;
        }
    }

    /// In-bounds neighbors within Chebyshev radius 1, in `Direction::ALL` order.
    pub fn neighbors(&self, pos: Pos) -> impl Iterator<Item = Pos> + '_ {
        Direction::ALL.into_iter().map(move |dir| pos.offset(dir)).filter(|p| self.in_bounds(*p))
    }

    /// Row-major positions of every cell.
    pub fn positions(&self) -> impl Iterator<Item = Pos> + use<> {
        let width = self.width as i32;
        let height = self.height as i32;
        (0..height).flat_map(move |y| (0..width).map(move |x| Pos { y, x }))
    }

    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    pub fn tiles_mut(&mut self) -> &mut [Tile] {
        &mut self.tiles
    }

    pub fn clear_sight(&mut self) {
        for tile in &mut self.tiles {
            tile.set_light(0.0);
            tile.los = false;
        }
    }

    pub fn reveal_all(&mut self) {
        for tile in &mut self.tiles {
            tile.explored = true;
        }
    }

    pub(crate) fn index(&self, pos: Pos) -> usize {
        (pos.y as usize) * self.width + (pos.x as usize)
    }

    pub(crate) fn from_records(width: usize, height: usize, records: &[TileRecord]) -> Self {
        let tiles = records
            .iter()
            .map(|record| {
                let mut tile = Tile::new(record.kind, record.fuel);
                tile.explored = record.explored;
                tile
            })
            .collect();
        Self { width, height, tiles, visible_threshold: DEFAULT_VISIBLE_THRESHOLD }
    }

    pub(crate) fn records(&self) -> Vec<TileRecord> {
        self.tiles
            .iter()
            .map(|tile| TileRecord { kind: tile.kind, explored: tile.explored, fuel: tile.fuel })
            .collect()
    }
}

const DEFAULT_FUEL: u8 = 10;
const DEFAULT_VISIBLE_THRESHOLD: f32 = 0.25;

/// Persistent part of a tile. Light, line of sight and occupancy are derived.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileRecord {
    pub kind: TileKind,
    pub explored: bool,
    pub fuel: u8,
}

/// A parsed ASCII level: terrain plus the spawn markers found in it.
#[derive(Clone, Debug)]
pub struct Layout {
    pub grid: Grid,
    pub player: Option<Pos>,
    pub monsters: Vec<(MonsterKind, Pos)>,
    pub fires: Vec<Pos>,
}

/// Parses a rectangular ASCII layout.
///
/// Terrain glyphs: `#` wall, `.` floor, `"` grass, `+` closed door, `'` open
/// door. Spawn glyphs (standing on floor): `@` player, `g` goblin, `T` titan,
/// `S` sentinel, `^` fire. Leading and trailing blank lines are ignored.
pub fn parse_layout(text: &str) -> Result<Layout, SimError> {
    let rows: Vec<&str> = text.lines().map(str::trim_end).filter(|row| !row.is_empty()).collect();
    let expected = rows.first().map_or(0, |row| row.chars().count());
    if expected == 0 {
        return Err(SimError::RaggedLayout { row: 0, width: 0, expected: 0 });
    }

    let mut grid = Grid::new(expected, rows.len());
    let mut player = None;
    let mut monsters = Vec::new();
    let mut fires = Vec::new();

    for (row, line) in rows.iter().enumerate() {
        let width = line.chars().count();
        if width != expected {
            return Err(SimError::RaggedLayout { row, width, expected });
        }
        for (column, glyph) in line.chars().enumerate() {
            let pos = Pos { y: row as i32, x: column as i32 };
            let kind = match glyph {
                '#' => TileKind::Wall,
                '"' => TileKind::Grass,
                '+' => TileKind::ClosedDoor,
                '\'' => TileKind::OpenDoor,
                '.' | '@' | 'g' | 'T' | 'S' | '^' => TileKind::Floor,
                _ => return Err(SimError::UnknownGlyph { glyph, row, column }),
            };
            grid.set_kind(pos, kind);
            match glyph {
                '@' => player = Some(pos),
                'g' => monsters.push((MonsterKind::Goblin, pos)),
                'T' => monsters.push((MonsterKind::Titan, pos)),
                'S' => monsters.push((MonsterKind::Sentinel, pos)),
                '^' => fires.push(pos),
                _ => {}
            }
        }
    }

    Ok(Layout { grid, player, monsters, fires })
}
