//! Read-only view of one tick for renderers and tooling.

use serde::Serialize;

use crate::body::{Body, Facing};
use crate::engine::Engine;
use crate::enemy::{EnemyKind, EnemyState};
use crate::particle::ParticleKind;
use crate::player::{Action, PowerState};
use crate::powerup::PowerUpKind;
use crate::sequence::ClearPhase;
use crate::session::GameState;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl From<&Body> for Rect {
    fn from(body: &Body) -> Self {
        Self {
            x: body.pos.x,
            y: body.pos.y,
            w: body.size.x,
            h: body.size.y,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Hud {
    pub score: u32,
    pub coins: u32,
    pub world: String,
    pub time_left: u32,
    pub lives: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PlayerView {
    pub rect: Rect,
    pub facing: Facing,
    pub power: PowerState,
    pub action: Action,
    /// Damage invincibility; renderers usually blink the sprite.
    pub invincible: bool,
    pub star: bool,
    pub walk_frame: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct EnemyView {
    pub kind: EnemyKind,
    pub rect: Rect,
    pub facing: Facing,
    pub state: EnemyState,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PowerUpView {
    pub kind: PowerUpKind,
    pub rect: Rect,
    pub emerged: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ParticleView {
    pub kind: ParticleKind,
    pub rect: Rect,
}

/// Upward draw offset of a block that is mid-bump.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BumpView {
    pub x: i32,
    pub y: i32,
    pub offset: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Snapshot {
    pub frame: u64,
    pub state: GameState,
    pub clear_phase: Option<ClearPhase>,
    pub camera_x: f32,
    pub hud: Hud,
    pub player: PlayerView,
    pub enemies: Vec<EnemyView>,
    pub power_ups: Vec<PowerUpView>,
    pub particles: Vec<ParticleView>,
    pub bumps: Vec<BumpView>,
}

impl Snapshot {
    pub(crate) fn capture(engine: &Engine) -> Self {
        let session = engine.session();
        let player = engine.player();

        Self {
            frame: engine.frame(),
            state: engine.state(),
            clear_phase: engine.clear_phase(),
            camera_x: engine.camera().x(),
            hud: Hud {
                score: session.score,
                coins: session.coins,
                world: session.world.clone(),
                time_left: session.time_left,
                lives: session.lives,
            },
            player: PlayerView {
                rect: Rect::from(&player.body),
                facing: player.body.facing,
                power: player.power,
                action: player.action,
                invincible: player.iframe_timer > 0,
                star: player.has_star(),
                walk_frame: player.anim_frame,
            },
            enemies: engine
                .enemies()
                .iter()
                .filter(|enemy| enemy.body.active && !enemy.body.dead)
                .map(|enemy| EnemyView {
                    kind: enemy.kind,
                    rect: Rect::from(&enemy.body),
                    facing: enemy.body.facing,
                    state: enemy.state,
                })
                .collect(),
            power_ups: engine
                .power_ups()
                .iter()
                .map(|power_up| PowerUpView {
                    kind: power_up.kind,
                    rect: Rect::from(&power_up.body),
                    emerged: power_up.emerged,
                })
                .collect(),
            particles: engine
                .particles()
                .iter()
                .map(|particle| ParticleView {
                    kind: particle.kind,
                    rect: Rect::from(&particle.body),
                })
                .collect(),
            bumps: engine
                .blocks()
                .iter()
                .filter(|(_, block)| block.bump_timer > 0)
                .map(|(cell, block)| BumpView {
                    x: cell.x,
                    y: cell.y,
                    offset: block.bump_offset,
                })
                .collect(),
        }
    }
}
