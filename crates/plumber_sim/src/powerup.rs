//! Items released from question blocks.
//!
//! A power-up first rises out of its block at a fixed speed and cannot be
//! touched until it has fully emerged; after that it moves under the same
//! axis-separated collision as everything else.

use serde::Serialize;

use crate::body::{Body, Facing};
use crate::camera::Camera;
use crate::collision::move_and_collide;
use crate::config::Tuning;
use crate::consts::{SCREEN_HEIGHT, TILE_SIZE};
use crate::tile::{Cell, TileGrid};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PowerUpKind {
    Mushroom,
    FireFlower,
    Star,
    OneUp,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PowerUp {
    pub kind: PowerUpKind,
    pub body: Body,
    pub emerged: bool,
    pub emerge_y: f32,
    /// Ticks spent rising out of the block.
    pub spawn_timer: u32,
}

impl PowerUp {
    /// Start `kind` rising out of the block at `cell`.
    pub fn sprout(kind: PowerUpKind, cell: Cell) -> Self {
        let mut body = Body::new(cell.left(), cell.top(), TILE_SIZE, TILE_SIZE);
        body.facing = Facing::Right;
        Self {
            kind,
            body,
            emerged: false,
            emerge_y: cell.top() - TILE_SIZE,
            spawn_timer: 0,
        }
    }

    pub fn is_collectable(&self) -> bool {
        self.emerged && !self.body.dead
    }

    pub fn step(&mut self, grid: &TileGrid, camera: &Camera, tuning: &Tuning) {
        if !self.emerged {
            self.rise(tuning);
            return;
        }

        match self.kind {
            PowerUpKind::FireFlower => {}
            PowerUpKind::Mushroom | PowerUpKind::OneUp => {
                self.travel(grid, tuning, tuning.mushroom_speed);
            }
            PowerUpKind::Star => {
                if self.travel(grid, tuning, tuning.star_speed) {
                    self.body.vel.y = tuning.star_bounce;
                }
            }
        }

        if self.body.pos.y > SCREEN_HEIGHT + TILE_SIZE
            || self.body.pos.x < camera.x() - tuning.activation_margin
        {
            self.body.dead = true;
            log::debug!("{:?} left the screen uncollected", self.kind);
        }
    }

    fn rise(&mut self, tuning: &Tuning) {
        self.spawn_timer += 1;
        self.body.pos.y -= tuning.power_up_rise_speed;
        if self.body.pos.y <= self.emerge_y {
            self.body.pos.y = self.emerge_y;
            self.emerged = true;
            self.body.active = true;
            self.body.vel.x = match self.kind {
                PowerUpKind::Mushroom | PowerUpKind::OneUp => tuning.mushroom_speed,
                PowerUpKind::Star => tuning.star_speed,
                PowerUpKind::FireFlower => 0.0,
            };
            log::debug!("{:?} emerged after {} ticks", self.kind, self.spawn_timer);
        }
    }

    /// Gravity plus move-and-collide, turning at walls. Returns whether it
    /// landed this tick.
    fn travel(&mut self, grid: &TileGrid, tuning: &Tuning, speed: f32) -> bool {
        self.body.vel.y = (self.body.vel.y + tuning.gravity_falling).min(tuning.max_fall_speed);
        let contacts = move_and_collide(&mut self.body, grid);
        if let Some(wall) = contacts.wall {
            self.body.facing = wall.moving.flipped();
            self.body.vel.x = self.body.facing.sign() * speed;
        }
        contacts.landed()
    }
}
