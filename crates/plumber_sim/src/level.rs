//! Level data: the tile rows, enemy spawns and block-content overrides an
//! engine is built from, plus the JSON loader and a builder for the
//! demonstration stage and tests.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::TILE_SIZE;
use crate::enemy::EnemyKind;
use crate::error::{read_json, LoadError};
use crate::tile::{BlockContent, BlockTable, Cell, TileGrid, TileKind};

pub const DEFAULT_PLAYER_START: [f32; 2] = [40.0, 192.0];

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Spawn {
    pub kind: EnemyKind,
    pub x: f32,
    /// Top of the 16 px cell the enemy stands in.
    pub y: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockOverride {
    pub x: i32,
    pub y: i32,
    pub content: BlockContent,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelData {
    #[serde(default = "default_world")]
    pub world: String,
    /// Tile codes, top row first.
    pub tiles: Vec<Vec<TileKind>>,
    #[serde(default)]
    pub spawns: Vec<Spawn>,
    #[serde(default)]
    pub blocks: Vec<BlockOverride>,
    #[serde(default = "default_player_start")]
    pub player_start: [f32; 2],
}

fn default_world() -> String {
    "1-1".to_string()
}

fn default_player_start() -> [f32; 2] {
    DEFAULT_PLAYER_START
}

impl LevelData {
    pub fn width(&self) -> usize {
        self.tiles.first().map_or(0, Vec::len)
    }

    pub fn height(&self) -> usize {
        self.tiles.len()
    }

    pub fn grid(&self) -> TileGrid {
        TileGrid::from_rows(&self.tiles)
    }

    /// Block metadata for a fresh copy of this level's grid.
    pub fn block_table(&self, grid: &TileGrid) -> BlockTable {
        BlockTable::for_grid(
            grid,
            self.blocks
                .iter()
                .map(|block| (Cell::new(block.x, block.y), block.content)),
        )
    }

    pub fn validate(&self) -> Result<(), LoadError> {
        let width = self.width();
        if self.tiles.is_empty() || width == 0 {
            return Err(LoadError::invalid("level has no tiles"));
        }
        if let Some((row, tiles)) = self
            .tiles
            .iter()
            .enumerate()
            .find(|(_, tiles)| tiles.len() != width)
        {
            return Err(LoadError::invalid(format!(
                "row {row} has {} tiles, expected {width}",
                tiles.len()
            )));
        }

        let grid = self.grid();
        for block in &self.blocks {
            let cell = Cell::new(block.x, block.y);
            if !grid.in_bounds(cell) {
                return Err(LoadError::invalid(format!(
                    "block override at ({}, {}) is outside the grid",
                    block.x, block.y
                )));
            }
            let kind = grid.get(cell);
            if !matches!(kind, TileKind::QuestionBlock | TileKind::Brick) {
                return Err(LoadError::invalid(format!(
                    "block override at ({}, {}) points at {kind:?}, not a question block or brick",
                    block.x, block.y
                )));
            }
        }

        for (index, spawn) in self.spawns.iter().enumerate() {
            if !spawn.x.is_finite() || !spawn.y.is_finite() {
                return Err(LoadError::invalid(format!("spawn {index} has a non-finite position")));
            }
        }
        if !self.player_start.iter().all(|v| v.is_finite()) {
            return Err(LoadError::invalid("player_start is not finite"));
        }
        if !self.tiles.iter().flatten().any(|kind| kind.is_flagpole()) {
            log::warn!("Level '{}' has no flagpole; it cannot be cleared.", self.world);
        }
        Ok(())
    }

    /// World 1-1 style demonstration stage.
    pub fn demo() -> Self {
        use BlockContent::{Mushroom, OneUp, Star};
        use EnemyKind::{Goomba, Koopa, RedKoopa};

        LevelBuilder::new(212, 15)
            .world("1-1")
            .ground(0, 68)
            .ground(71, 85)
            .ground(89, 151)
            .ground(154, 211)
            // Opening blocks.
            .question(16, 9, BlockContent::Coin)
            .tile(20, 9, TileKind::Brick)
            .question(21, 9, Mushroom)
            .tile(22, 9, TileKind::Brick)
            .question(23, 9, BlockContent::Coin)
            .tile(24, 9, TileKind::Brick)
            .question(22, 5, BlockContent::Coin)
            .pipe(28, 2)
            .pipe(38, 3)
            .pipe(46, 4)
            .pipe(57, 4)
            .question(64, 8, OneUp)
            .tile(77, 9, TileKind::Brick)
            .question(78, 9, Mushroom)
            .tile(79, 9, TileKind::Brick)
            .fill(80, 5, 87, 5, TileKind::Brick)
            .fill(91, 5, 93, 5, TileKind::Brick)
            .question(94, 5, BlockContent::Coin)
            .tile(94, 9, TileKind::Brick)
            .tile(100, 9, TileKind::Brick)
            .block(101, 9, TileKind::Brick, Star)
            .question(106, 9, BlockContent::Coin)
            .question(109, 9, BlockContent::Coin)
            .question(109, 5, Mushroom)
            .question(112, 9, BlockContent::Coin)
            .tile(118, 9, TileKind::Brick)
            .fill(121, 5, 123, 5, TileKind::Brick)
            .tile(128, 5, TileKind::Brick)
            .question(129, 5, BlockContent::Coin)
            .question(130, 5, BlockContent::Coin)
            .tile(131, 5, TileKind::Brick)
            .fill(129, 9, 130, 9, TileKind::Brick)
            // Staircases.
            .stairs_up(134, 4)
            .stairs_down(140, 4)
            .stairs_up(148, 4)
            .stairs_down(154, 4)
            .pipe(163, 2)
            .fill(168, 9, 169, 9, TileKind::Brick)
            .question(170, 9, BlockContent::Coin)
            .tile(171, 9, TileKind::Brick)
            .pipe(179, 2)
            .stairs_up(181, 8)
            .fill(189, 5, 189, 12, TileKind::HardBlock)
            .flagpole(198, 3)
            // Enemies.
            .enemy(Goomba, 22, 12)
            .enemy(Goomba, 40, 12)
            .enemy(Goomba, 51, 12)
            .enemy(Goomba, 53, 12)
            .enemy(Goomba, 80, 4)
            .enemy(Goomba, 82, 4)
            .enemy(RedKoopa, 92, 4)
            .enemy(Goomba, 97, 12)
            .enemy(Goomba, 99, 12)
            .enemy(Koopa, 107, 12)
            .enemy(Goomba, 114, 12)
            .enemy(Goomba, 116, 12)
            .enemy(Goomba, 124, 12)
            .enemy(Goomba, 126, 12)
            .enemy(Goomba, 128, 12)
            .enemy(Goomba, 130, 12)
            .enemy(Goomba, 174, 12)
            .enemy(Goomba, 176, 12)
            .build()
    }
}

pub fn load_level_from_path(path: &Path) -> Result<LevelData, LoadError> {
    let level: LevelData = read_json(path)?;
    level.validate()?;
    log::info!(
        "Loaded level '{}' ({}x{} tiles, {} spawns) from {}",
        level.world,
        level.width(),
        level.height(),
        level.spawns.len(),
        path.display()
    );
    Ok(level)
}

/// Assembles [`LevelData`] cell by cell. Writes outside the grid are dropped.
///
/// The bottom two rows are the ground band; pipes, stairs and the flagpole
/// are planted on top of it.
#[derive(Debug, Clone)]
pub struct LevelBuilder {
    world: String,
    width: usize,
    height: usize,
    tiles: Vec<Vec<TileKind>>,
    spawns: Vec<Spawn>,
    blocks: Vec<BlockOverride>,
    player_start: [f32; 2],
}

impl LevelBuilder {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            world: default_world(),
            width,
            height,
            tiles: vec![vec![TileKind::Air; width]; height],
            spawns: Vec::new(),
            blocks: Vec::new(),
            player_start: DEFAULT_PLAYER_START,
        }
    }

    pub fn world(mut self, id: impl Into<String>) -> Self {
        self.world = id.into();
        self
    }

    /// First row of the ground band.
    fn ground_row(&self) -> i32 {
        self.height as i32 - 2
    }

    pub fn tile(mut self, x: i32, y: i32, kind: TileKind) -> Self {
        self.put(x, y, kind);
        self
    }

    fn put(&mut self, x: i32, y: i32, kind: TileKind) {
        if x < 0 || y < 0 || x as usize >= self.width || y as usize >= self.height {
            log::warn!("LevelBuilder ignoring tile outside grid at ({x}, {y})");
            return;
        }
        self.tiles[y as usize][x as usize] = kind;
    }

    /// Fill the inclusive rectangle from (`x0`, `y0`) to (`x1`, `y1`).
    pub fn fill(mut self, x0: i32, y0: i32, x1: i32, y1: i32, kind: TileKind) -> Self {
        for y in y0..=y1 {
            for x in x0..=x1 {
                self.put(x, y, kind);
            }
        }
        self
    }

    /// Ground band across columns `x0..=x1`.
    pub fn ground(self, x0: i32, x1: i32) -> Self {
        let top = self.ground_row();
        let bottom = self.height as i32 - 1;
        self.fill(x0, top, x1, bottom, TileKind::Ground)
    }

    /// Question block with explicit content.
    pub fn question(self, x: i32, y: i32, content: BlockContent) -> Self {
        self.block(x, y, TileKind::QuestionBlock, content)
    }

    /// Any struck-from-below block carrying `content`.
    pub fn block(mut self, x: i32, y: i32, kind: TileKind, content: BlockContent) -> Self {
        self.put(x, y, kind);
        self.blocks.push(BlockOverride { x, y, content });
        self
    }

    /// Two-wide pipe standing on the ground, `height` tiles tall.
    pub fn pipe(mut self, x: i32, height: i32) -> Self {
        let top = self.ground_row() - height;
        self.put(x, top, TileKind::PipeTopLeft);
        self.put(x + 1, top, TileKind::PipeTopRight);
        for y in top + 1..self.ground_row() {
            self.put(x, y, TileKind::PipeLeft);
            self.put(x + 1, y, TileKind::PipeRight);
        }
        self
    }

    /// Hard-block staircase rising to the right, `steps` columns wide.
    pub fn stairs_up(mut self, x: i32, steps: i32) -> Self {
        let ground = self.ground_row();
        for step in 0..steps {
            for y in ground - step - 1..ground {
                self.put(x + step, y, TileKind::HardBlock);
            }
        }
        self
    }

    /// Hard-block staircase falling to the right, `steps` columns wide.
    pub fn stairs_down(mut self, x: i32, steps: i32) -> Self {
        let ground = self.ground_row();
        for step in 0..steps {
            for y in ground - (steps - step)..ground {
                self.put(x + step, y, TileKind::HardBlock);
            }
        }
        self
    }

    /// Flagpole in column `x` with its top at `top_row` and a hard block at
    /// its foot.
    pub fn flagpole(mut self, x: i32, top_row: i32) -> Self {
        let base = self.ground_row() - 1;
        self.put(x, top_row, TileKind::FlagTop);
        for y in top_row + 1..base {
            self.put(x, y, TileKind::FlagPole);
        }
        self.put(x, base, TileKind::HardBlock);
        self
    }

    /// Enemy standing in cell (`x`, `y`).
    pub fn enemy(mut self, kind: EnemyKind, x: i32, y: i32) -> Self {
        self.spawns.push(Spawn {
            kind,
            x: x as f32 * TILE_SIZE,
            y: y as f32 * TILE_SIZE,
        });
        self
    }

    pub fn player_start(mut self, x: f32, y: f32) -> Self {
        self.player_start = [x, y];
        self
    }

    pub fn build(self) -> LevelData {
        LevelData {
            world: self.world,
            tiles: self.tiles,
            spawns: self.spawns,
            blocks: self.blocks,
            player_start: self.player_start,
        }
    }
}
