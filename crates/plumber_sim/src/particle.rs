//! Cosmetic particles. They fall under gravity, ignore tiles and expire.

use serde::Serialize;

use crate::body::Body;
use crate::config::Tuning;
use crate::tile::Cell;

pub const PARTICLE_SIZE: f32 = 8.0;
pub const COIN_POP_LIFE: u32 = 20;
pub const DEBRIS_LIFE: u32 = 60;

const DEBRIS_VELOCITIES: [(f32, f32); 4] = [(-1.5, -4.0), (1.5, -4.0), (-1.0, -3.0), (1.0, -3.0)];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ParticleKind {
    CoinPop,
    BrickDebris,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Particle {
    pub kind: ParticleKind,
    pub body: Body,
    pub life: u32,
}

impl Particle {
    pub fn new(kind: ParticleKind, x: f32, y: f32, vx: f32, vy: f32, life: u32) -> Self {
        let mut body = Body::new(x, y, PARTICLE_SIZE, PARTICLE_SIZE);
        body.vel = glam::Vec2::new(vx, vy);
        body.active = true;
        Self { kind, body, life }
    }

    /// Coin flying out of the top of a struck block.
    pub fn coin_pop(cell: Cell) -> Self {
        Self::new(ParticleKind::CoinPop, cell.left() + 4.0, cell.top() - 16.0, 0.0, -4.0, COIN_POP_LIFE)
    }

    /// Four fragments of a broken brick, thrown from its centre.
    pub fn brick_debris(cell: Cell) -> [Self; 4] {
        let x = cell.left() + 8.0;
        let y = cell.top() + 8.0;
        DEBRIS_VELOCITIES.map(|(vx, vy)| Self::new(ParticleKind::BrickDebris, x, y, vx, vy, DEBRIS_LIFE))
    }

    pub fn step(&mut self, tuning: &Tuning) {
        self.body.pos += self.body.vel;
        self.body.vel.y += tuning.gravity_falling;
        self.life = self.life.saturating_sub(1);
    }

    pub fn is_expired(&self) -> bool {
        self.life == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coin_pop_expires_after_its_life() {
        let tuning = Tuning::default();
        let mut coin = Particle::coin_pop(Cell::new(3, 9));
        assert_eq!(coin.body.pos, glam::Vec2::new(52.0, 128.0));
        for _ in 0..COIN_POP_LIFE - 1 {
            coin.step(&tuning);
        }
        assert!(!coin.is_expired());
        coin.step(&tuning);
        assert!(coin.is_expired());
    }

    #[test]
    fn debris_scatters_both_ways() {
        let tuning = Tuning::default();
        let mut pieces = Particle::brick_debris(Cell::new(3, 9));
        assert!(pieces.iter().all(|p| p.body.pos == glam::Vec2::new(56.0, 152.0)));
        for piece in &mut pieces {
            piece.step(&tuning);
        }
        let left = pieces.iter().filter(|p| p.body.pos.x < 56.0).count();
        let right = pieces.iter().filter(|p| p.body.pos.x > 56.0).count();
        assert_eq!((left, right), (2, 2));
        assert!(pieces.iter().all(|p| p.body.pos.y < 152.0));
    }
}
