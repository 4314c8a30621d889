//! Physical state shared by every mover.

use glam::Vec2;
use serde::Serialize;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub enum Facing {
    Left,
    #[default]
    Right,
}

impl Facing {
    pub fn sign(self) -> f32 {
        match self {
            Self::Left => -1.0,
            Self::Right => 1.0,
        }
    }

    pub fn flipped(self) -> Self {
        match self {
            Self::Left => Self::Right,
            Self::Right => Self::Left,
        }
    }

    /// Direction of `vx`, or `fallback` when it is zero.
    pub fn of_velocity(vx: f32, fallback: Self) -> Self {
        if vx < 0.0 {
            Self::Left
        } else if vx > 0.0 {
            Self::Right
        } else {
            fallback
        }
    }
}

/// Axis-aligned box with a top-left origin, in sub-pixel floats.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Body {
    pub pos: Vec2,
    pub vel: Vec2,
    pub size: Vec2,
    pub facing: Facing,
    /// Removal marker.
    pub dead: bool,
    /// Written only by the vertical collision pass.
    pub grounded: bool,
    /// Simulation and draw gating by camera proximity.
    pub active: bool,
}

impl Body {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            pos: Vec2::new(x, y),
            vel: Vec2::ZERO,
            size: Vec2::new(width, height),
            facing: Facing::Right,
            dead: false,
            grounded: false,
            active: false,
        }
    }

    pub fn left(&self) -> f32 {
        self.pos.x
    }

    pub fn right(&self) -> f32 {
        self.pos.x + self.size.x
    }

    pub fn top(&self) -> f32 {
        self.pos.y
    }

    pub fn bottom(&self) -> f32 {
        self.pos.y + self.size.y
    }

    pub fn center_x(&self) -> f32 {
        self.pos.x + self.size.x / 2.0
    }

    /// Strict overlap: boxes that only share an edge do not overlap.
    pub fn overlaps(&self, other: &Body) -> bool {
        self.pos.x < other.pos.x + other.size.x
            && self.pos.x + self.size.x > other.pos.x
            && self.pos.y < other.pos.y + other.size.y
            && self.pos.y + self.size.y > other.pos.y
    }

    /// Change height while keeping the bottom edge where it is.
    pub fn set_height_keep_feet(&mut self, height: f32) {
        let bottom = self.bottom();
        self.size.y = height;
        self.pos.y = bottom - height;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overlap_is_strict_on_shared_edges() {
        let a = Body::new(0.0, 0.0, 16.0, 16.0);
        let touching_right = Body::new(16.0, 0.0, 16.0, 16.0);
        let touching_below = Body::new(0.0, 16.0, 16.0, 16.0);
        let overlapping = Body::new(15.5, 15.5, 16.0, 16.0);
        assert!(!a.overlaps(&touching_right));
        assert!(!a.overlaps(&touching_below));
        assert!(a.overlaps(&overlapping));
        assert!(overlapping.overlaps(&a));
    }

    #[test]
    fn height_change_keeps_feet() {
        let mut body = Body::new(10.0, 176.0, 12.0, 32.0);
        body.set_height_keep_feet(16.0);
        assert_eq!(body.bottom(), 208.0);
        assert_eq!(body.top(), 192.0);
    }

    #[test]
    fn facing_from_velocity() {
        assert_eq!(Facing::of_velocity(-0.1, Facing::Right), Facing::Left);
        assert_eq!(Facing::of_velocity(0.1, Facing::Left), Facing::Right);
        assert_eq!(Facing::of_velocity(0.0, Facing::Left), Facing::Left);
        assert_eq!(Facing::Left.flipped().sign(), 1.0);
    }
}
