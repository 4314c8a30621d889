//! Frame-accurate side-scrolling platformer simulation.
//!
//! One [`Engine`] owns a tile grid, the block metadata table and every entity
//! collection. The host calls [`Engine::tick`] exactly once per fixed 1/60 s
//! quantum with the intents observed for that tick, then reads back a
//! [`Snapshot`] to draw and drains [`Cue`]s to play sounds. Nothing here
//! renders, plays audio or reads keys.
//!
//! Per tick, while playing: timers, player, enemies, power-ups, particles,
//! block bump animation, camera, then global state transitions.
//!
//! Every mover integrates X, resolves X, integrates Y, resolves Y; see
//! [`collision`].

pub mod body;
pub mod camera;
pub mod collision;
pub mod config;
pub mod enemy;
pub mod engine;
pub mod error;
pub mod events;
mod interact;
pub mod level;
pub mod particle;
pub mod player;
pub mod powerup;
pub mod replay;
pub mod scoring;
mod sequence;
pub mod session;
pub mod snapshot;
pub mod tile;

pub use body::{Body, Facing};
pub use config::{load_config_from_path, EngineConfig, SessionPolicy, Tuning};
pub use engine::Engine;
pub use error::LoadError;
pub use events::Cue;
pub use level::{load_level_from_path, LevelBuilder, LevelData};
pub use sequence::ClearPhase;
pub use session::{GameState, Session};
pub use snapshot::Snapshot;
pub use tile::{BlockContent, Cell, TileGrid, TileKind};

/// Fixed display and grid geometry.
pub mod consts {
    /// Edge length of one grid cell in pixels.
    pub const TILE_SIZE: f32 = 16.0;
    pub const SCREEN_WIDTH: f32 = 256.0;
    pub const SCREEN_HEIGHT: f32 = 240.0;
}
