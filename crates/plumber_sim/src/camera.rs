//! Horizontal follow camera.
//!
//! Tracks the player at a fixed lead, never scrolls back within an attempt,
//! and never shows anything outside the level.

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    x: f32,
    viewport_width: f32,
}

impl Camera {
    pub fn new(viewport_width: f32) -> Self {
        Self {
            x: 0.0,
            viewport_width,
        }
    }

    pub fn x(&self) -> f32 {
        self.x
    }

    pub fn viewport_width(&self) -> f32 {
        self.viewport_width
    }

    /// Largest camera X for a level `level_width` pixels wide.
    pub fn max_x(&self, level_width: f32) -> f32 {
        (level_width - self.viewport_width).max(0.0)
    }

    pub fn follow(&mut self, target_x: f32, lead: f32, level_width: f32) {
        let wanted = target_x - lead;
        if wanted > self.x {
            self.x = wanted;
        }
        self.x = self.x.clamp(0.0, self.max_x(level_width));
    }

    /// Whether `x` lies within the viewport widened by `margin` on each side.
    pub fn window_contains(&self, x: f32, margin: f32) -> bool {
        x > self.x - margin && x < self.x + self.viewport_width + margin
    }

    pub fn reset(&mut self) {
        self.x = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn follows_forward_only() {
        let mut camera = Camera::new(256.0);
        camera.follow(300.0, 100.0, 3000.0);
        assert_eq!(camera.x(), 200.0);
        camera.follow(150.0, 100.0, 3000.0);
        assert_eq!(camera.x(), 200.0);
        camera.follow(310.5, 100.0, 3000.0);
        assert_eq!(camera.x(), 210.5);
    }

    #[test]
    fn stays_inside_level() {
        let mut camera = Camera::new(256.0);
        camera.follow(20.0, 100.0, 3000.0);
        assert_eq!(camera.x(), 0.0);
        camera.follow(5000.0, 100.0, 3000.0);
        assert_eq!(camera.x(), 3000.0 - 256.0);
    }

    #[test]
    fn narrow_level_pins_to_zero() {
        let mut camera = Camera::new(256.0);
        camera.follow(400.0, 100.0, 128.0);
        assert_eq!(camera.x(), 0.0);
    }

    #[test]
    fn activation_window_has_margins() {
        let mut camera = Camera::new(256.0);
        camera.follow(600.0, 100.0, 3000.0);
        assert!(camera.window_contains(500.0 - 31.0, 32.0));
        assert!(!camera.window_contains(500.0 - 32.0, 32.0));
        assert!(camera.window_contains(500.0 + 256.0 + 31.0, 32.0));
        assert!(!camera.window_contains(500.0 + 256.0 + 32.0, 32.0));
    }
}
