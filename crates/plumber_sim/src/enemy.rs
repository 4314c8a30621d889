//! Enemy kinds and the walk / squish / shell state machine.
//!
//! ```text
//! Walking --stomp--> Squished --timer--> removed          (no shell)
//! Walking --stomp--> Shell --kick--> ShellMoving          (shelled kinds)
//!                    Shell --wake timer--> Emerging --timer--> Walking
//! ```
//!
//! `state_timer` counts down in every timed state: the squish delay, the
//! shell wake delay, the emerge delay, and the kick grace window of a freshly
//! kicked shell.

use serde::{Deserialize, Serialize};

use crate::body::{Body, Facing};
use crate::camera::Camera;
use crate::collision::{ledge_ahead, move_and_collide, Contacts};
use crate::config::Tuning;
use crate::consts::{SCREEN_HEIGHT, TILE_SIZE};
use crate::tile::TileGrid;

pub const ENEMY_WIDTH: f32 = 16.0;
pub const SHELL_HEIGHT: f32 = 16.0;
pub const SQUISHED_HEIGHT: f32 = 8.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EnemyKind {
    Goomba,
    Koopa,
    RedKoopa,
}

impl EnemyKind {
    pub fn walk_speed(self, tuning: &Tuning) -> f32 {
        match self {
            Self::Goomba => tuning.goomba_speed,
            Self::Koopa | Self::RedKoopa => tuning.koopa_speed,
        }
    }

    pub fn height(self) -> f32 {
        match self {
            Self::Goomba => 16.0,
            Self::Koopa | Self::RedKoopa => 24.0,
        }
    }

    pub fn turns_at_ledges(self) -> bool {
        matches!(self, Self::RedKoopa)
    }

    pub fn has_shell(self) -> bool {
        !matches!(self, Self::Goomba)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum EnemyState {
    Walking,
    Squished,
    Shell,
    ShellMoving,
    Emerging,
}

/// Result of the player landing on an enemy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StompEffect {
    Squished,
    Shelled,
    Kicked,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Enemy {
    pub kind: EnemyKind,
    pub body: Body,
    pub state: EnemyState,
    pub state_timer: u32,
    pub origin_x: f32,
}

impl Enemy {
    /// Spawn with its feet on the bottom of the 16 px cell whose top is `y`,
    /// walking left.
    pub fn spawn(kind: EnemyKind, x: f32, y: f32, tuning: &Tuning) -> Self {
        let height = kind.height();
        let mut body = Body::new(x, y + TILE_SIZE - height, ENEMY_WIDTH, height);
        body.facing = Facing::Left;
        body.vel.x = -kind.walk_speed(tuning);
        Self {
            kind,
            body,
            state: EnemyState::Walking,
            state_timer: 0,
            origin_x: x,
        }
    }

    /// Active, alive and not squished.
    pub fn is_collidable(&self) -> bool {
        self.body.active && !self.body.dead && self.state != EnemyState::Squished
    }

    pub fn is_stationary_shell(&self) -> bool {
        self.state == EnemyState::Shell
    }

    pub fn is_moving_shell(&self) -> bool {
        self.state == EnemyState::ShellMoving
    }

    /// Whether touching this enemy outside stomp geometry hurts the player.
    pub fn is_harmful(&self) -> bool {
        match self.state {
            EnemyState::Walking | EnemyState::Emerging => true,
            EnemyState::ShellMoving => self.state_timer == 0,
            EnemyState::Squished | EnemyState::Shell => false,
        }
    }

    /// Wake up once inside the camera window; die once left behind or
    /// fallen out of the world. Returns whether the enemy should be
    /// simulated this tick.
    pub fn update_activation(&mut self, camera: &Camera, tuning: &Tuning) -> bool {
        if self.body.dead {
            return false;
        }
        let margin = tuning.activation_margin;
        if !self.body.active {
            if !camera.window_contains(self.body.pos.x, margin) {
                return false;
            }
            self.body.active = true;
            log::debug!("{:?} activated at x {:.1}", self.kind, self.body.pos.x);
        }
        if self.body.pos.x < camera.x() - margin || self.body.pos.y > SCREEN_HEIGHT + margin {
            self.body.dead = true;
            log::debug!("{:?} despawned at ({:.1}, {:.1})", self.kind, self.body.pos.x, self.body.pos.y);
            return false;
        }
        true
    }

    pub fn step(&mut self, grid: &TileGrid, tuning: &Tuning) {
        match self.state {
            EnemyState::Walking => self.walk(grid, tuning),
            EnemyState::Squished => {
                self.state_timer = self.state_timer.saturating_sub(1);
                if self.state_timer == 0 {
                    self.body.dead = true;
                }
            }
            EnemyState::Shell => {
                self.fall(grid, tuning);
                self.state_timer = self.state_timer.saturating_sub(1);
                if self.state_timer == 0 {
                    self.state = EnemyState::Emerging;
                    self.state_timer = tuning.emerge_frames;
                }
            }
            EnemyState::Emerging => {
                self.fall(grid, tuning);
                self.state_timer = self.state_timer.saturating_sub(1);
                if self.state_timer == 0 {
                    self.state = EnemyState::Walking;
                    self.body.set_height_keep_feet(self.kind.height());
                    self.body.vel.x = self.body.facing.sign() * self.kind.walk_speed(tuning);
                    log::debug!("{:?} walks out of its shell", self.kind);
                }
            }
            EnemyState::ShellMoving => {
                self.state_timer = self.state_timer.saturating_sub(1);
                self.travel(grid, tuning, tuning.shell_speed);
            }
        }
    }

    fn walk(&mut self, grid: &TileGrid, tuning: &Tuning) {
        let speed = self.kind.walk_speed(tuning);
        if self.kind.turns_at_ledges() && self.body.grounded && ledge_ahead(&self.body, grid) {
            self.body.facing = self.body.facing.flipped();
            self.body.vel.x = self.body.facing.sign() * speed;
        }
        self.travel(grid, tuning, speed);
    }

    /// Gravity plus move-and-collide, bouncing off walls at `speed`.
    fn travel(&mut self, grid: &TileGrid, tuning: &Tuning, speed: f32) -> Contacts {
        self.apply_gravity(tuning);
        let contacts = move_and_collide(&mut self.body, grid);
        if let Some(wall) = contacts.wall {
            self.body.facing = wall.moving.flipped();
            self.body.vel.x = self.body.facing.sign() * speed;
        }
        contacts
    }

    fn fall(&mut self, grid: &TileGrid, tuning: &Tuning) {
        self.body.vel.x = 0.0;
        self.apply_gravity(tuning);
        move_and_collide(&mut self.body, grid);
    }

    fn apply_gravity(&mut self, tuning: &Tuning) {
        self.body.vel.y = (self.body.vel.y + tuning.gravity_falling).min(tuning.max_fall_speed);
    }

    /// React to a stomp from a player centred at `player_x`.
    pub fn stomp(&mut self, player_x: f32, tuning: &Tuning) -> StompEffect {
        match self.state {
            EnemyState::Walking if !self.kind.has_shell() => {
                self.squish(tuning);
                StompEffect::Squished
            }
            EnemyState::Walking | EnemyState::Emerging => {
                self.enter_shell(tuning);
                StompEffect::Shelled
            }
            EnemyState::Shell | EnemyState::ShellMoving => {
                self.kick(player_x, tuning);
                StompEffect::Kicked
            }
            EnemyState::Squished => StompEffect::Squished,
        }
    }

    fn squish(&mut self, tuning: &Tuning) {
        self.state = EnemyState::Squished;
        self.state_timer = tuning.squish_frames;
        self.body.vel = glam::Vec2::ZERO;
        self.body.set_height_keep_feet(SQUISHED_HEIGHT);
        log::debug!("{:?} squished", self.kind);
    }

    fn enter_shell(&mut self, tuning: &Tuning) {
        self.state = EnemyState::Shell;
        self.state_timer = tuning.shell_wake_frames;
        self.body.vel.x = 0.0;
        self.body.set_height_keep_feet(SHELL_HEIGHT);
        log::debug!("{:?} retreats into its shell", self.kind);
    }

    /// Send the shell sliding away from `from_x`.
    pub fn kick(&mut self, from_x: f32, tuning: &Tuning) {
        let dir = if self.body.center_x() >= from_x {
            Facing::Right
        } else {
            Facing::Left
        };
        self.state = EnemyState::ShellMoving;
        self.state_timer = tuning.kick_grace_frames;
        self.body.facing = dir;
        self.body.vel.x = dir.sign() * tuning.shell_speed;
        log::debug!("{:?} shell kicked {:?}", self.kind, dir);
    }

    /// Killed by a shell, a star or a bump from below.
    pub fn knock_out(&mut self) {
        self.body.dead = true;
        log::debug!("{:?} knocked out at x {:.1}", self.kind, self.body.pos.x);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tile::{Cell, TileKind};

    fn floor(width: i32) -> TileGrid {
        let mut grid = TileGrid::new(width, 15);
        for x in 0..width {
            grid.set(Cell::new(x, 13), TileKind::Ground);
        }
        grid
    }

    fn active(kind: EnemyKind, x: f32, tuning: &Tuning) -> Enemy {
        let mut enemy = Enemy::spawn(kind, x, 192.0, tuning);
        enemy.body.active = true;
        enemy
    }

    #[test]
    fn tall_kinds_spawn_with_feet_on_the_cell_floor() {
        let tuning = Tuning::default();
        let goomba = Enemy::spawn(EnemyKind::Goomba, 100.0, 192.0, &tuning);
        let koopa = Enemy::spawn(EnemyKind::Koopa, 100.0, 192.0, &tuning);
        assert_eq!(goomba.body.bottom(), 208.0);
        assert_eq!(koopa.body.bottom(), 208.0);
        assert_eq!(koopa.body.size.y, 24.0);
        assert_eq!(koopa.body.vel.x, -tuning.koopa_speed);
        assert_eq!(koopa.body.facing, Facing::Left);
    }

    #[test]
    fn walker_turns_around_at_walls() {
        let tuning = Tuning::default();
        let mut grid = floor(20);
        grid.set(Cell::new(3, 12), TileKind::HardBlock);
        let mut goomba = active(EnemyKind::Goomba, 64.3, &tuning);
        for _ in 0..10 {
            goomba.step(&grid, &tuning);
        }
        assert_eq!(goomba.body.facing, Facing::Right);
        assert_eq!(goomba.body.vel.x, tuning.goomba_speed);
        assert!(goomba.body.left() >= 64.0);
    }

    #[test]
    fn goomba_walks_off_ledges_but_red_koopa_turns() {
        let tuning = Tuning::default();
        let mut grid = TileGrid::new(20, 15);
        for x in 5..10 {
            grid.set(Cell::new(x, 13), TileKind::Ground);
        }
        let mut goomba = active(EnemyKind::Goomba, 84.0, &tuning);
        let mut red = active(EnemyKind::RedKoopa, 84.0, &tuning);
        for _ in 0..120 {
            goomba.step(&grid, &tuning);
            red.step(&grid, &tuning);
        }
        assert!(goomba.body.top() > 208.0);
        assert!(red.body.grounded);
        assert!(red.body.left() >= 80.0 - 1.0);
    }

    #[test]
    fn squished_goomba_is_removed_after_delay() {
        let tuning = Tuning::default();
        let grid = floor(20);
        let mut goomba = active(EnemyKind::Goomba, 100.0, &tuning);
        assert_eq!(goomba.stomp(90.0, &tuning), StompEffect::Squished);
        assert_eq!(goomba.body.size.y, SQUISHED_HEIGHT);
        assert_eq!(goomba.body.bottom(), 208.0);
        assert!(!goomba.is_collidable());
        for _ in 0..tuning.squish_frames - 1 {
            goomba.step(&grid, &tuning);
        }
        assert!(!goomba.body.dead);
        goomba.step(&grid, &tuning);
        assert!(goomba.body.dead);
    }

    #[test]
    fn shell_wakes_emerges_and_walks() {
        let tuning = Tuning::default();
        let grid = floor(20);
        let mut koopa = active(EnemyKind::Koopa, 100.0, &tuning);
        assert_eq!(koopa.stomp(90.0, &tuning), StompEffect::Shelled);
        assert_eq!(koopa.body.vel.x, 0.0);
        assert_eq!(koopa.body.size.y, SHELL_HEIGHT);
        assert!(!koopa.is_harmful());

        for _ in 0..tuning.shell_wake_frames {
            koopa.step(&grid, &tuning);
        }
        assert_eq!(koopa.state, EnemyState::Emerging);
        assert_eq!(koopa.body.pos.x, 100.0);

        assert_eq!(koopa.stomp(90.0, &tuning), StompEffect::Shelled);
        assert_eq!(koopa.state, EnemyState::Shell);

        for _ in 0..(tuning.shell_wake_frames + tuning.emerge_frames) {
            koopa.step(&grid, &tuning);
        }
        assert_eq!(koopa.state, EnemyState::Walking);
        assert_eq!(koopa.body.size.y, 24.0);
        assert_eq!(koopa.body.bottom(), 208.0);
        assert_eq!(koopa.body.vel.x, -tuning.koopa_speed);
    }

    #[test]
    fn kicked_shell_leaves_the_player_and_has_grace() {
        let tuning = Tuning::default();
        let grid = floor(20);
        let mut koopa = active(EnemyKind::Koopa, 100.0, &tuning);
        koopa.stomp(90.0, &tuning);
        assert_eq!(koopa.stomp(90.0, &tuning), StompEffect::Kicked);
        assert_eq!(koopa.body.vel.x, tuning.shell_speed);
        assert!(!koopa.is_harmful());
        for _ in 0..tuning.kick_grace_frames {
            koopa.step(&grid, &tuning);
        }
        assert!(koopa.is_harmful());

        let mut other = active(EnemyKind::Koopa, 100.0, &tuning);
        other.stomp(130.0, &tuning);
        other.kick(130.0, &tuning);
        assert_eq!(other.body.vel.x, -tuning.shell_speed);
        assert_eq!(other.body.facing, Facing::Left);
    }

    #[test]
    fn moving_shell_rebounds_off_walls() {
        let tuning = Tuning::default();
        let mut grid = floor(20);
        grid.set(Cell::new(10, 12), TileKind::HardBlock);
        let mut koopa = active(EnemyKind::Koopa, 120.0, &tuning);
        koopa.stomp(100.0, &tuning);
        koopa.kick(100.0, &tuning);
        for _ in 0..15 {
            koopa.step(&grid, &tuning);
        }
        assert_eq!(koopa.state, EnemyState::ShellMoving);
        assert_eq!(koopa.body.vel.x, -tuning.shell_speed);
        assert!(koopa.body.right() <= 160.0);
    }

    #[test]
    fn activation_follows_the_camera_window() {
        let tuning = Tuning::default();
        let mut camera = Camera::new(256.0);
        let mut far = Enemy::spawn(EnemyKind::Goomba, 400.0, 192.0, &tuning);
        assert!(!far.update_activation(&camera, &tuning));
        assert!(!far.body.active);

        camera.follow(300.0, 100.0, 2000.0);
        assert!(far.update_activation(&camera, &tuning));
        assert!(far.body.active);

        camera.follow(800.0, 100.0, 2000.0);
        assert!(!far.update_activation(&camera, &tuning));
        assert!(far.body.dead);
    }

    #[test]
    fn falling_out_of_the_world_despawns() {
        let tuning = Tuning::default();
        let camera = Camera::new(256.0);
        let mut goomba = active(EnemyKind::Goomba, 100.0, &tuning);
        goomba.body.pos.y = SCREEN_HEIGHT + tuning.activation_margin + 1.0;
        assert!(!goomba.update_activation(&camera, &tuning));
        assert!(goomba.body.dead);
    }
}
