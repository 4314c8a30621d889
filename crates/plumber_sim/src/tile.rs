//! Tile grid and special-block metadata.
//!
//! The grid's shape is fixed once a level is loaded; only cell values change
//! (a struck QuestionBlock becomes UsedBlock, a broken Brick becomes Air).
//! Lookups outside the grid read as Air so edge-of-world collision needs no
//! special cases.

use std::collections::BTreeMap;
use std::f32::consts::PI;

use serde::{Deserialize, Serialize};

use crate::consts::TILE_SIZE;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum TileKind {
    #[default]
    Air,
    Ground,
    Brick,
    HardBlock,
    QuestionBlock,
    UsedBlock,
    PipeLeft,
    PipeRight,
    PipeTopLeft,
    PipeTopRight,
    FlagPole,
    FlagTop,
}

impl TileKind {
    pub fn is_solid(self) -> bool {
        !matches!(self, Self::Air | Self::FlagPole | Self::FlagTop)
    }

    pub fn is_flagpole(self) -> bool {
        matches!(self, Self::FlagPole | Self::FlagTop)
    }

    pub fn code(self) -> u8 {
        match self {
            Self::Air => 0,
            Self::Ground => 1,
            Self::Brick => 2,
            Self::HardBlock => 3,
            Self::QuestionBlock => 4,
            Self::UsedBlock => 5,
            Self::PipeLeft => 6,
            Self::PipeRight => 7,
            Self::PipeTopLeft => 8,
            Self::PipeTopRight => 9,
            Self::FlagPole => 10,
            Self::FlagTop => 11,
        }
    }
}

impl TryFrom<u8> for TileKind {
    type Error = String;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        Ok(match code {
            0 => Self::Air,
            1 => Self::Ground,
            2 => Self::Brick,
            3 => Self::HardBlock,
            4 => Self::QuestionBlock,
            5 => Self::UsedBlock,
            6 => Self::PipeLeft,
            7 => Self::PipeRight,
            8 => Self::PipeTopLeft,
            9 => Self::PipeTopRight,
            10 => Self::FlagPole,
            11 => Self::FlagTop,
            other => return Err(format!("unknown tile code {other}")),
        })
    }
}

impl From<TileKind> for u8 {
    fn from(kind: TileKind) -> Self {
        kind.code()
    }
}

/// Grid coordinate, column `x` and row `y` (row 0 is the top of the level).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Cell {
    pub x: i32,
    pub y: i32,
}

impl Cell {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// The cell containing the pixel at (`px`, `py`).
    pub fn containing(px: f32, py: f32) -> Self {
        Self {
            x: pixel_to_cell(px),
            y: pixel_to_cell(py),
        }
    }

    pub fn left(self) -> f32 {
        self.x as f32 * TILE_SIZE
    }

    pub fn right(self) -> f32 {
        (self.x + 1) as f32 * TILE_SIZE
    }

    pub fn top(self) -> f32 {
        self.y as f32 * TILE_SIZE
    }

    pub fn bottom(self) -> f32 {
        (self.y + 1) as f32 * TILE_SIZE
    }
}

pub fn pixel_to_cell(p: f32) -> i32 {
    (p / TILE_SIZE).floor() as i32
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TileGrid {
    width: i32,
    height: i32,
    tiles: Vec<TileKind>,
}

impl TileGrid {
    /// An all-Air grid of `width` x `height` cells.
    pub fn new(width: i32, height: i32) -> Self {
        let width = width.max(0);
        let height = height.max(0);
        Self {
            width,
            height,
            tiles: vec![TileKind::Air; (width * height) as usize],
        }
    }

    /// Build from rows. Rows shorter than the first are padded with Air.
    pub fn from_rows(rows: &[Vec<TileKind>]) -> Self {
        let height = rows.len() as i32;
        let width = rows.first().map_or(0, |row| row.len()) as i32;
        let mut grid = Self::new(width, height);
        for (y, row) in rows.iter().enumerate() {
            for (x, kind) in row.iter().take(width as usize).enumerate() {
                grid.tiles[y * width as usize + x] = *kind;
            }
        }
        grid
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    pub fn pixel_width(&self) -> f32 {
        self.width as f32 * TILE_SIZE
    }

    pub fn pixel_height(&self) -> f32 {
        self.height as f32 * TILE_SIZE
    }

    pub fn in_bounds(&self, cell: Cell) -> bool {
        cell.x >= 0 && cell.x < self.width && cell.y >= 0 && cell.y < self.height
    }

    fn index(&self, cell: Cell) -> Option<usize> {
        self.in_bounds(cell)
            .then(|| (cell.y * self.width + cell.x) as usize)
    }

    pub fn get(&self, cell: Cell) -> TileKind {
        self.index(cell)
            .map_or(TileKind::Air, |index| self.tiles[index])
    }

    /// Overwrite one cell. Writes outside the grid are dropped.
    pub fn set(&mut self, cell: Cell, kind: TileKind) {
        match self.index(cell) {
            Some(index) => self.tiles[index] = kind,
            None => log::warn!("Ignoring tile write outside grid at ({}, {})", cell.x, cell.y),
        }
    }

    pub fn is_solid(&self, cell: Cell) -> bool {
        self.get(cell).is_solid()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Cell, TileKind)> + '_ {
        let width = self.width.max(1);
        self.tiles
            .iter()
            .enumerate()
            .map(move |(i, kind)| (Cell::new(i as i32 % width, i as i32 / width), *kind))
    }

    /// Rows of the grid, top first.
    pub fn rows(&self) -> impl Iterator<Item = &[TileKind]> {
        self.tiles.chunks(self.width.max(1) as usize)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlockContent {
    Empty,
    #[default]
    Coin,
    Mushroom,
    Star,
    OneUp,
}

/// Per-cell metadata for blocks that react to being struck.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BlockState {
    pub content: BlockContent,
    pub bump_timer: u32,
    pub bump_offset: f32,
}

impl BlockState {
    pub fn new(content: BlockContent) -> Self {
        Self {
            content,
            bump_timer: 0,
            bump_offset: 0.0,
        }
    }
}

/// Special-block side table, iterated in (column, row) order.
#[derive(Debug, Clone, Default)]
pub struct BlockTable {
    entries: BTreeMap<Cell, BlockState>,
}

impl BlockTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Table for a freshly loaded grid: every QuestionBlock gets an entry,
    /// explicit overrides win, anything not overridden holds a coin.
    pub fn for_grid(grid: &TileGrid, overrides: impl IntoIterator<Item = (Cell, BlockContent)>) -> Self {
        let mut table = Self::new();
        for (cell, content) in overrides {
            table.entries.insert(cell, BlockState::new(content));
        }
        for (cell, kind) in grid.iter() {
            if kind == TileKind::QuestionBlock {
                table
                    .entries
                    .entry(cell)
                    .or_insert_with(|| BlockState::new(BlockContent::Coin));
            }
        }
        table
    }

    pub fn get(&self, cell: Cell) -> Option<&BlockState> {
        self.entries.get(&cell)
    }

    pub fn get_mut(&mut self, cell: Cell) -> Option<&mut BlockState> {
        self.entries.get_mut(&cell)
    }

    pub fn remove(&mut self, cell: Cell) -> Option<BlockState> {
        self.entries.remove(&cell)
    }

    /// Take the content out of a block, leaving it empty.
    pub fn take_content(&mut self, cell: Cell) -> BlockContent {
        match self.entries.get_mut(&cell) {
            Some(state) => std::mem::replace(&mut state.content, BlockContent::Empty),
            None => BlockContent::Coin,
        }
    }

    /// Kick off the bump animation, creating an empty entry if needed.
    pub fn start_bump(&mut self, cell: Cell, frames: u32) {
        self.entries
            .entry(cell)
            .or_insert_with(|| BlockState::new(BlockContent::Empty))
            .bump_timer = frames;
    }

    /// Advance every bump animation by one tick.
    pub fn animate(&mut self, frames: u32, height: f32) {
        for state in self.entries.values_mut() {
            if state.bump_timer > 0 {
                state.bump_timer -= 1;
                let t = state.bump_timer as f32 / frames.max(1) as f32;
                state.bump_offset = (t * PI).sin() * height;
            } else {
                state.bump_offset = 0.0;
            }
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (Cell, &BlockState)> {
        self.entries.iter().map(|(cell, state)| (*cell, state))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
